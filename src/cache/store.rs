// Menu store backed by SQLite.
// Owns the on-disk menu rows; every read and write of the menu table goes through here.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, info};

use crate::error::{LemonError, Result};
use crate::menu::{FilterCriteria, FilterEngine, MenuItem, NewMenuItem};

const CREATE_MENU_TABLE: &str = "CREATE TABLE IF NOT EXISTS menu (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (name <> ''),
    description TEXT,
    price REAL NOT NULL CHECK (price >= 0),
    image TEXT,
    category TEXT NOT NULL CHECK (category <> '')
);";

const SELECT_COLUMNS: &str = "SELECT id, name, description, price, image, category FROM menu";

/// Observed state of the menu table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The table does not exist yet.
    Uninitialized,
    Empty,
    Populated(usize),
}

/// Handle to the menu database. Clones share one connection.
#[derive(Clone)]
pub struct MenuStore {
    conn: Arc<Mutex<Connection>>,
}

impl MenuStore {
    /// Open (or create) the database file. The schema is not touched.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LemonError::Schema(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| LemonError::Schema(format!("cannot open {}: {e}", path.display())))?;
        info!(path = %path.display(), "Opened menu database");
        Ok(Self::from_connection(conn))
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LemonError::Schema(format!("cannot open in-memory database: {e}")))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LemonError::Other("Menu store lock poisoned".into()))
    }

    /// Create the menu table if it is missing. Safe to call repeatedly.
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(CREATE_MENU_TABLE)
            .map_err(|e| LemonError::Schema(format!("cannot create menu table: {e}")))?;
        Ok(())
    }

    /// Replace every row with `items` in a single transaction.
    /// On failure the previous rows are left untouched.
    pub fn replace_all(&self, items: &[NewMenuItem]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM menu", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO menu (name, description, price, image, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for item in items {
                insert.execute(params![
                    item.name,
                    item.description,
                    item.price,
                    item.image,
                    item.category
                ])?;
            }
        }
        tx.commit()?;

        info!(count = items.len(), "Replaced cached menu");
        Ok(())
    }

    /// Every row, in storage order.
    pub fn get_all(&self) -> Result<Vec<MenuItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_COLUMNS)?;
        let rows = stmt
            .query_map([], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Rows matching `criteria`, ordered by name then id.
    /// SQLite narrows by category and orders; the text match runs here so case
    /// folding covers non-ASCII names (SQLite's `lower()` does not).
    pub fn query(&self, criteria: &FilterCriteria) -> Result<Vec<MenuItem>> {
        let mut sql = SELECT_COLUMNS.to_string();
        if !criteria.categories.is_empty() {
            let placeholders: Vec<String> = (1..=criteria.categories.len())
                .map(|i| format!("?{i}"))
                .collect();
            sql.push_str(&format!(
                " WHERE category IN ({})",
                placeholders.join(", ")
            ));
        }
        sql.push_str(" ORDER BY name ASC, id ASC");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = Vec::new();
        for row in stmt.query_map(params_from_iter(criteria.categories.iter()), row_to_item)? {
            let item = row?;
            if criteria.matches(&item) {
                rows.push(item);
            }
        }

        debug!(
            query = %criteria.query,
            categories = criteria.categories.len(),
            matched = rows.len(),
            "Filtered menu"
        );
        Ok(rows)
    }

    /// Delete every row; the table stays.
    pub fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM menu", [])?;
        info!(deleted, "Cleared cached menu");
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn cache_state(&self) -> Result<CacheState> {
        let exists = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'menu'",
                [],
                |_| Ok(()),
            )
            .optional()?
            .is_some()
        };

        if !exists {
            return Ok(CacheState::Uninitialized);
        }

        Ok(match self.count()? {
            0 => CacheState::Empty,
            n => CacheState::Populated(n),
        })
    }

    /// Distinct category labels, sorted.
    pub fn categories(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT category FROM menu ORDER BY category")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
    }
}

impl FilterEngine for MenuStore {
    fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<MenuItem>> {
        self.query(criteria)
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        price: row.get(3)?,
        image: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        category: row.get(5)?,
    })
}
