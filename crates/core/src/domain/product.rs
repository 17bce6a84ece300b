use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Store {
    Amazon,
    Flipkart,
    Walmart,
    Target,
    BestBuy,
}

impl Store {
    pub const ALL: [Store; 5] = [
        Store::Amazon,
        Store::Flipkart,
        Store::Walmart,
        Store::Target,
        Store::BestBuy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Store::Amazon => "Amazon",
            Store::Flipkart => "Flipkart",
            Store::Walmart => "Walmart",
            Store::Target => "Target",
            Store::BestBuy => "BestBuy",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Store {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        match Store::ALL
            .iter()
            .find(|store| store.as_str().eq_ignore_ascii_case(s))
        {
            Some(store) => Ok(*store),
            None => bail!("unknown store: {s:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub amount: f64,
    pub direction: PriceDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image: String,
    pub current_price: f64,
    pub original_price: f64,
    pub store: Store,
    pub rating: f64,
    pub price_change: PriceChange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_best_deal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_recommendation: Option<String>,
}

impl Product {
    /// Absolute saving against the original price.
    pub fn discount(&self) -> f64 {
        self.original_price - self.current_price
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.id.trim().is_empty(), "product id must be non-empty");
        ensure!(
            !self.title.trim().is_empty(),
            "product {} title must be non-empty",
            self.id
        );
        ensure!(
            self.current_price.is_finite() && self.current_price >= 0.0,
            "product {} current_price must be non-negative (got {})",
            self.id,
            self.current_price
        );
        ensure!(
            self.original_price.is_finite() && self.original_price >= self.current_price,
            "product {} original_price must be >= current_price (got {} < {})",
            self.id,
            self.original_price,
            self.current_price
        );
        ensure!(
            (0.0..=5.0).contains(&self.rating),
            "product {} rating must be between 0 and 5 (got {})",
            self.id,
            self.rating
        );
        ensure!(
            self.price_change.amount.is_finite() && self.price_change.amount >= 0.0,
            "product {} price_change.amount must be non-negative (got {})",
            self.id,
            self.price_change.amount
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample(
    id: &str,
    title: &str,
    store: Store,
    current: f64,
    original: f64,
    rating: f64,
) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        image: String::new(),
        current_price: current,
        original_price: original,
        store,
        rating,
        price_change: PriceChange {
            amount: original - current,
            direction: PriceDirection::Down,
        },
        description: None,
        category: None,
        link: None,
        is_best_deal: false,
        ai_recommendation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_parses_case_insensitively() {
        assert_eq!("bestbuy".parse::<Store>().unwrap(), Store::BestBuy);
        assert_eq!(" Amazon ".parse::<Store>().unwrap(), Store::Amazon);
        assert!("Apple Store".parse::<Store>().is_err());
    }

    #[test]
    fn deserializes_minimal_product() {
        let v = json!({
            "id": "1",
            "title": "Sony WH-1000XM5",
            "image": "https://example.com/sony.jpg",
            "current_price": 348.0,
            "original_price": 399.99,
            "store": "Amazon",
            "rating": 4.6,
            "price_change": {"amount": 51.99, "direction": "down"}
        });

        let product: Product = serde_json::from_value(v).unwrap();
        assert_eq!(product.store, Store::Amazon);
        assert_eq!(product.price_change.direction, PriceDirection::Down);
        assert!(product.description.is_none());
        assert!(!product.is_best_deal);
        product.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_store_via_deserialize() {
        let v = json!({
            "id": "1",
            "title": "x",
            "image": "",
            "current_price": 1.0,
            "original_price": 1.0,
            "store": "Apple Store",
            "rating": 4.0,
            "price_change": {"amount": 0.0, "direction": "stable"}
        });
        assert!(serde_json::from_value::<Product>(v).is_err());
    }

    #[test]
    fn validate_rejects_original_below_current() {
        let p = sample("1", "x", Store::Target, 100.0, 90.0, 4.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_rejects_rating_out_of_range() {
        let p = sample("1", "x", Store::Target, 100.0, 120.0, 5.5);
        assert!(p.validate().is_err());
    }

    #[test]
    fn discount_is_original_minus_current() {
        let p = sample("1", "x", Store::Walmart, 999.0, 1199.0, 4.9);
        assert_eq!(p.discount(), 200.0);
    }
}
