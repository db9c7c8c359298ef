// Menu cache loader.
// Ensures the menu table exists, serves cached rows, and fetches the remote feed only on an empty cache.

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::{CacheState, MenuStore};
use crate::error::{LemonError, Result};
use crate::feed::MenuFeed;

use super::MenuItem;

/// Where the loaded rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    Cache,
    Remote,
}

/// Phases of a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Start,
    SchemaReady,
    CacheHit,
    CacheMissFetching,
    Ready,
    FetchFailed,
}

impl LoadPhase {
    /// Move to `next`, rejecting transitions the load never makes.
    pub fn advance(self, next: LoadPhase) -> Result<LoadPhase> {
        use LoadPhase::*;

        let legal = matches!(
            (self, next),
            (Start, SchemaReady)
                | (SchemaReady, CacheHit)
                | (SchemaReady, CacheMissFetching)
                | (CacheHit, Ready)
                | (CacheMissFetching, Ready)
                | (CacheMissFetching, FetchFailed)
        );

        if legal {
            Ok(next)
        } else {
            Err(LemonError::Other(format!(
                "illegal menu load transition {self:?} -> {next:?}"
            )))
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMenu {
    pub items: Vec<MenuItem>,
    /// Distinct category labels across `items`, sorted.
    pub categories: Vec<String>,
    pub source: MenuSource,
}

/// Loads the menu into the local cache at most once per cache lifetime.
pub struct MenuLoader<F> {
    store: MenuStore,
    feed: F,
    /// Serializes loads so two callers cannot both see an empty table and fetch.
    load_lock: Mutex<()>,
}

impl<F: MenuFeed> MenuLoader<F> {
    pub fn new(store: MenuStore, feed: F) -> Self {
        Self {
            store,
            feed,
            load_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &MenuStore {
        &self.store
    }

    /// Ensure the schema, then serve cached rows or fetch and persist the feed.
    pub async fn load(&self) -> Result<LoadedMenu> {
        let _guard = self.load_lock.lock().await;

        let mut phase = LoadPhase::Start;

        let store = self.store.clone();
        let state = blocking(move || {
            store.init_schema()?;
            store.cache_state()
        })
        .await?;
        phase = phase.advance(LoadPhase::SchemaReady)?;

        if let CacheState::Populated(count) = state {
            phase = phase.advance(LoadPhase::CacheHit)?;
            let store = self.store.clone();
            let menu = blocking(move || snapshot(&store, MenuSource::Cache)).await?;
            info!(count, "Menu served from cache");
            phase.advance(LoadPhase::Ready)?;
            return Ok(menu);
        }

        phase = phase.advance(LoadPhase::CacheMissFetching)?;
        info!("Menu cache empty, fetching feed");
        self.fetch_and_store(phase).await
    }

    /// Download the feed again and swap it in for the cached rows.
    /// The old rows stay if the fetch or the write fails.
    pub async fn refresh(&self) -> Result<LoadedMenu> {
        let _guard = self.load_lock.lock().await;

        let store = self.store.clone();
        blocking(move || store.init_schema()).await?;
        let phase = LoadPhase::Start
            .advance(LoadPhase::SchemaReady)?
            .advance(LoadPhase::CacheMissFetching)?;

        info!("Refreshing menu from feed");
        self.fetch_and_store(phase).await
    }

    /// Fetch the feed and replace the cached rows in one transaction.
    async fn fetch_and_store(&self, phase: LoadPhase) -> Result<LoadedMenu> {
        let fetched = match self.feed.fetch_menu().await {
            Ok(items) => items,
            Err(e) => {
                phase.advance(LoadPhase::FetchFailed)?;
                warn!(error = %e, "Menu feed fetch failed");
                return Err(e);
            }
        };

        let store = self.store.clone();
        let menu = blocking(move || {
            store.replace_all(&fetched)?;
            snapshot(&store, MenuSource::Remote)
        })
        .await;

        match menu {
            Ok(menu) => {
                phase.advance(LoadPhase::Ready)?;
                Ok(menu)
            }
            Err(e) => {
                phase.advance(LoadPhase::FetchFailed)?;
                warn!(error = %e, "Persisting fetched menu failed");
                Err(e)
            }
        }
    }
}

fn snapshot(store: &MenuStore, source: MenuSource) -> Result<LoadedMenu> {
    Ok(LoadedMenu {
        items: store.get_all()?,
        categories: store.categories()?,
        source,
    })
}

/// Run a store call off the async worker threads.
pub(crate) async fn blocking<T, C>(call: C) -> Result<T>
where
    T: Send + 'static,
    C: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| LemonError::Other(format!("store task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::normalize_feed;
    use crate::menu::NewMenuItem;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const FEED: &str = r#"{"menu":[
        {"name":"Greek Salad","description":"Fresh salad","price":12.5,"image":"greek.jpg","category":"Starters"},
        {"name":"Lemon Dessert","description":"Lemon cake","price":"6.99","image":"lemon.jpg","category":"Desserts"}
    ]}"#;
    const BASE: &str = "https://img.example/images";

    enum Response {
        Body(&'static str),
        Offline,
    }

    struct FakeFeed {
        response: Response,
        calls: Arc<AtomicUsize>,
        /// Forces `Offline` regardless of `response` while set.
        offline: Arc<AtomicBool>,
    }

    impl MenuFeed for FakeFeed {
        async fn fetch_menu(&self) -> Result<Vec<NewMenuItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.offline.load(Ordering::SeqCst) {
                return Err(LemonError::FeedStatus { status: 503 });
            }
            match self.response {
                Response::Body(body) => normalize_feed(body, BASE),
                Response::Offline => Err(LemonError::FeedStatus { status: 503 }),
            }
        }
    }

    fn loader(response: Response) -> (MenuLoader<FakeFeed>, Arc<AtomicUsize>) {
        let (loader, calls, _offline) = switchable_loader(response);
        (loader, calls)
    }

    fn switchable_loader(
        response: Response,
    ) -> (MenuLoader<FakeFeed>, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let offline = Arc::new(AtomicBool::new(false));
        let feed = FakeFeed {
            response,
            calls: calls.clone(),
            offline: offline.clone(),
        };
        let store = MenuStore::open_in_memory().unwrap();
        (MenuLoader::new(store, feed), calls, offline)
    }

    #[test]
    fn test_phase_transitions() {
        let phase = LoadPhase::Start.advance(LoadPhase::SchemaReady).unwrap();
        let phase = phase.advance(LoadPhase::CacheMissFetching).unwrap();
        assert_eq!(
            phase.advance(LoadPhase::FetchFailed).unwrap(),
            LoadPhase::FetchFailed
        );

        assert!(LoadPhase::Start.advance(LoadPhase::Ready).is_err());
        assert!(LoadPhase::CacheHit.advance(LoadPhase::FetchFailed).is_err());
        assert!(LoadPhase::Ready.advance(LoadPhase::CacheMissFetching).is_err());
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_and_persists() {
        let (loader, calls) = loader(Response::Body(FEED));

        let menu = loader.load().await.unwrap();
        assert_eq!(menu.source, MenuSource::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(menu.categories, ["Desserts", "Starters"]);

        let rows = loader.store().get_all().unwrap();
        assert_eq!(rows.len(), 2);
        let salad = rows.iter().find(|r| r.name == "Greek Salad").unwrap();
        assert_eq!(salad.price, 12.5);
        assert_eq!(salad.image, "https://img.example/images/greek.jpg?raw=true");
    }

    #[tokio::test]
    async fn test_second_load_served_from_cache() {
        let (loader, calls) = loader(Response::Body(FEED));

        loader.load().await.unwrap();
        let menu = loader.load().await.unwrap();

        assert_eq!(menu.source, MenuSource::Cache);
        assert_eq!(menu.items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_fetch_once() {
        let (loader, calls) = loader(Response::Body(FEED));
        let loader = Arc::new(loader);

        let a = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        let b = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.store().count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_populated_cache_never_fetches() {
        let (loader, calls) = loader(Response::Offline);
        loader.store().init_schema().unwrap();
        loader
            .store()
            .replace_all(&normalize_feed(FEED, BASE).unwrap())
            .unwrap();

        let menu = loader.load().await.unwrap();
        assert_eq!(menu.source, MenuSource::Cache);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_failure_leaves_cache_empty() {
        let (loader, calls) = loader(Response::Offline);

        let err = loader.load().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(loader.store().count().unwrap(), 0);

        // A manual retry issues a new fetch.
        assert!(loader.load().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_feed_is_data_format_error() {
        let (loader, _calls) = loader(Response::Body(r#"{"menu":"soon"}"#));

        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LemonError::DataFormat(_)));
        assert_eq!(loader.store().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_refresh_refetches() {
        let (loader, calls) = loader(Response::Body(FEED));

        loader.load().await.unwrap();
        let menu = loader.refresh().await.unwrap();

        assert_eq!(menu.source, MenuSource::Remote);
        assert_eq!(menu.items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_rows() {
        let (loader, calls, offline) = switchable_loader(Response::Body(FEED));

        loader.load().await.unwrap();
        assert_eq!(loader.store().count().unwrap(), 2);

        offline.store(true, Ordering::SeqCst);
        let err = loader.refresh().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(loader.store().count().unwrap(), 2);

        // Still served from cache without another fetch.
        let menu = loader.load().await.unwrap();
        assert_eq!(menu.source, MenuSource::Cache);
        assert_eq!(menu.items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_on_empty_store_fetches() {
        let (loader, calls) = loader(Response::Body(FEED));

        let menu = loader.refresh().await.unwrap();
        assert_eq!(menu.source, MenuSource::Remote);
        assert_eq!(menu.categories, ["Desserts", "Starters"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
