// Menu feed payload types.
// Deserializes the remote `{ menu: [...] }` document and normalizes entries into cache rows.

use serde::Deserialize;

use crate::error::{LemonError, Result};
use crate::menu::NewMenuItem;

/// Query suffix that makes GitHub serve the raw image bytes.
const RAW_IMAGE_SUFFIX: &str = "?raw=true";

/// Top-level feed document.
#[derive(Debug, Deserialize)]
struct FeedDocument {
    menu: Option<serde_json::Value>,
}

/// Price as published: the public feed uses strings, other feeds use numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedPrice {
    Number(f64),
    Text(String),
}

impl FeedPrice {
    fn value(&self) -> Option<f64> {
        match self {
            FeedPrice::Number(n) => Some(*n),
            FeedPrice::Text(s) => s.trim().trim_start_matches('$').parse().ok(),
        }
    }
}

/// One entry of the feed's `menu` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: FeedPrice,
    /// Bare filename, e.g. `greekSalad.jpg`.
    #[serde(default)]
    pub image: String,
    pub category: String,
}

impl FeedItem {
    /// Validate and turn into a cache row with an absolute image URL.
    pub fn normalize(self, image_base_url: &str) -> Result<NewMenuItem> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(LemonError::DataFormat("menu entry without a name".into()));
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(LemonError::DataFormat(format!("{name}: empty category")));
        }

        let price = self
            .price
            .value()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| LemonError::DataFormat(format!("{name}: invalid price")))?;

        Ok(NewMenuItem {
            name,
            description: self.description,
            price,
            image: resolve_image_url(image_base_url, &self.image),
            category,
        })
    }
}

/// Resolve a bare image filename against the image base URL.
pub fn resolve_image_url(base: &str, file: &str) -> String {
    if file.is_empty() {
        return String::new();
    }
    format!(
        "{}/{}{}",
        base.trim_end_matches('/'),
        file.trim_start_matches('/'),
        RAW_IMAGE_SUFFIX
    )
}

/// Parse a feed body into its entries.
/// A missing or non-array `menu` field is a data format error.
pub fn parse_feed(body: &str) -> Result<Vec<FeedItem>> {
    let document: FeedDocument = serde_json::from_str(body)
        .map_err(|e| LemonError::DataFormat(format!("not a menu document: {e}")))?;

    let menu = match document.menu {
        Some(menu @ serde_json::Value::Array(_)) => menu,
        Some(_) => return Err(LemonError::DataFormat("`menu` is not an array".into())),
        None => return Err(LemonError::DataFormat("missing `menu` field".into())),
    };

    serde_json::from_value(menu).map_err(|e| LemonError::DataFormat(format!("bad menu entry: {e}")))
}

/// Parse and normalize a whole feed body.
pub fn normalize_feed(body: &str, image_base_url: &str) -> Result<Vec<NewMenuItem>> {
    parse_feed(body)?
        .into_iter()
        .map(|item| item.normalize(image_base_url))
        .collect()
}
