use crate::domain::product::Store;
use serde::{Deserialize, Serialize};
use url::Url;

/// Result of mapping a free-form retailer name. Unmapped names stay visible as
/// `Unknown` instead of collapsing into a default store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Retailer {
    Known(Store),
    Unknown(String),
}

impl Retailer {
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let key = key.strip_prefix("www").unwrap_or(&key);
        let key = key
            .strip_suffix("com")
            .or_else(|| key.strip_suffix("in"))
            .unwrap_or(key);

        let store = match key {
            "amazon" => Store::Amazon,
            "flipkart" => Store::Flipkart,
            "walmart" => Store::Walmart,
            "target" => Store::Target,
            "bestbuy" => Store::BestBuy,
            _ => {
                tracing::debug!(name, "unmapped retailer name");
                return Retailer::Unknown(name.trim().to_string());
            }
        };
        Retailer::Known(store)
    }

    pub fn store(&self) -> Option<Store> {
        match self {
            Retailer::Known(store) => Some(*store),
            Retailer::Unknown(_) => None,
        }
    }
}

/// Pulls the retailer's listing id out of a product URL.
///
/// Amazon uses a `/dp/<ID>` path segment, Flipkart a `pid=<ID>` query parameter.
/// Other stores have no known scheme.
pub fn extract_listing_id(product_url: &str, store: Store) -> Option<String> {
    let url = Url::parse(product_url.trim()).ok()?;
    let id = match store {
        Store::Amazon => {
            let mut segments = url.path_segments()?;
            segments.by_ref().find(|s| s.eq_ignore_ascii_case("dp"))?;
            segments.next()?.to_string()
        }
        Store::Flipkart => url
            .query_pairs()
            .find(|(k, _)| k == "pid")
            .map(|(_, v)| v.into_owned())?,
        Store::Walmart | Store::Target | Store::BestBuy => return None,
    };

    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(id)
}
