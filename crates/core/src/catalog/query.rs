use crate::domain::product::{Product, Store};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderKey {
    #[default]
    BestMatch,
    #[serde(alias = "priceLow")]
    PriceAsc,
    #[serde(alias = "priceHigh")]
    PriceDesc,
    #[serde(alias = "bestDiscount")]
    DiscountDesc,
    #[serde(alias = "rating")]
    RatingDesc,
}

impl OrderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKey::BestMatch => "bestMatch",
            OrderKey::PriceAsc => "priceAsc",
            OrderKey::PriceDesc => "priceDesc",
            OrderKey::DiscountDesc => "discountDesc",
            OrderKey::RatingDesc => "ratingDesc",
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        // Also accepts the storefront's legacy select values.
        Ok(match s.trim() {
            "" | "bestMatch" => OrderKey::BestMatch,
            "priceAsc" | "priceLow" => OrderKey::PriceAsc,
            "priceDesc" | "priceHigh" => OrderKey::PriceDesc,
            "discountDesc" | "bestDiscount" => OrderKey::DiscountDesc,
            "ratingDesc" | "rating" => OrderKey::RatingDesc,
            other => bail!("unknown sort key: {other:?}"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub price_min: f64,
    pub price_max: f64,
    /// Empty means any store.
    #[serde(default)]
    pub stores: BTreeSet<Store>,
    /// Integer rating floors; empty means any rating.
    #[serde(default)]
    pub min_ratings: BTreeSet<u8>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            price_min: 0.0,
            price_max: f64::INFINITY,
            stores: BTreeSet::new(),
            min_ratings: BTreeSet::new(),
        }
    }
}

impl FilterOptions {
    pub fn matches(&self, product: &Product) -> bool {
        let in_range =
            product.current_price >= self.price_min && product.current_price <= self.price_max;
        let store_ok = self.stores.is_empty() || self.stores.contains(&product.store);
        let rating_ok = self.min_ratings.is_empty()
            || self.min_ratings.contains(&(product.rating.floor() as u8));
        in_range && store_ok && rating_ok
    }
}

/// Case-insensitive substring search over title, description and category.
///
/// An empty or whitespace-only query matches the whole catalog.
pub fn search(query: &str, catalog: &[Product]) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.to_vec();
    }

    catalog
        .iter()
        .filter(|product| {
            let fields = [
                Some(product.title.as_str()),
                product.description.as_deref(),
                product.category.as_deref(),
            ];
            fields
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Stable sort; equal keys keep their input order.
pub fn sort(products: &[Product], key: OrderKey) -> Vec<Product> {
    let mut out = products.to_vec();
    match key {
        OrderKey::BestMatch => {}
        OrderKey::PriceAsc => out.sort_by(|a, b| a.current_price.total_cmp(&b.current_price)),
        OrderKey::PriceDesc => out.sort_by(|a, b| b.current_price.total_cmp(&a.current_price)),
        OrderKey::DiscountDesc => out.sort_by(|a, b| b.discount().total_cmp(&a.discount())),
        OrderKey::RatingDesc => out.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    out
}

pub fn filter(products: &[Product], opts: &FilterOptions) -> Vec<Product> {
    products
        .iter()
        .filter(|product| opts.matches(product))
        .cloned()
        .collect()
}

/// search -> filter -> sort in one pass over a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub order: OrderKey,
    #[serde(default)]
    pub filter: FilterOptions,
}

impl CatalogQuery {
    pub fn run(&self, catalog: &[Product]) -> Vec<Product> {
        let found = search(&self.text, catalog);
        let kept = filter(&found, &self.filter);
        let out = sort(&kept, self.order);

        tracing::debug!(
            query = %self.text,
            order = %self.order,
            matched = found.len(),
            returned = out.len(),
            "catalog query"
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::sample;

    fn fixture() -> Vec<Product> {
        let mut phone = sample("1", "Apple iPhone 13 Pro", Store::Amazon, 899.0, 999.0, 4.8);
        phone.category = Some("Phones".to_string());
        let mut galaxy = sample("2", "Samsung Galaxy S22", Store::BestBuy, 799.0, 899.0, 4.6);
        galaxy.description = Some("Android flagship with a great camera".to_string());
        vec![
            phone,
            galaxy,
            sample("3", "Sony WH-1000XM4", Store::Amazon, 279.0, 349.0, 4.5),
            sample("4", "Dell XPS 13", Store::Walmart, 899.0, 1099.0, 4.3),
            sample("5", "Apple Watch SE", Store::Target, 279.0, 299.0, 3.9),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_title() {
        let catalog = fixture();
        assert_eq!(ids(&search("APPLE", &catalog)), vec!["1", "5"]);
    }

    #[test]
    fn search_matches_description_and_category() {
        let catalog = fixture();
        assert_eq!(ids(&search("android", &catalog)), vec!["2"]);
        assert_eq!(ids(&search("phones", &catalog)), vec!["1"]);
    }

    #[test]
    fn empty_and_whitespace_queries_return_everything() {
        let catalog = fixture();
        let empty = search("", &catalog);
        let blank = search("   ", &catalog);
        assert_eq!(empty, catalog);
        assert_eq!(empty, blank);
    }

    #[test]
    fn price_asc_is_stable() {
        let sorted = sort(&fixture(), OrderKey::PriceAsc);
        // 3 and 5 tie at 279, 1 and 4 tie at 899.
        assert_eq!(ids(&sorted), vec!["3", "5", "2", "1", "4"]);
        for pair in sorted.windows(2) {
            assert!(pair[0].current_price <= pair[1].current_price);
        }
    }

    #[test]
    fn price_desc_is_stable() {
        let sorted = sort(&fixture(), OrderKey::PriceDesc);
        assert_eq!(ids(&sorted), vec!["1", "4", "2", "3", "5"]);
    }

    #[test]
    fn discount_and_rating_orderings() {
        let catalog = fixture();
        assert_eq!(
            ids(&sort(&catalog, OrderKey::DiscountDesc)),
            vec!["4", "1", "2", "3", "5"]
        );
        assert_eq!(
            ids(&sort(&catalog, OrderKey::RatingDesc)),
            vec!["1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn best_match_keeps_input_order() {
        let catalog = fixture();
        assert_eq!(sort(&catalog, OrderKey::BestMatch), catalog);
    }

    #[test]
    fn filter_ands_all_predicates() {
        let opts = FilterOptions {
            price_min: 200.0,
            price_max: 900.0,
            stores: [Store::Amazon, Store::Target].into_iter().collect(),
            min_ratings: [4].into_iter().collect(),
        };
        assert_eq!(ids(&filter(&fixture(), &opts)), vec!["1", "3"]);
    }

    #[test]
    fn filter_uses_rating_floor() {
        let opts = FilterOptions {
            min_ratings: [3].into_iter().collect(),
            ..FilterOptions::default()
        };
        assert_eq!(ids(&filter(&fixture(), &opts)), vec!["5"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let opts = FilterOptions {
            price_min: 250.0,
            price_max: 850.0,
            stores: [Store::Amazon, Store::BestBuy].into_iter().collect(),
            min_ratings: BTreeSet::new(),
        };
        let once = filter(&fixture(), &opts);
        let twice = filter(&once, &opts);
        assert_eq!(once, twice);
    }

    #[test]
    fn inverted_bounds_yield_empty() {
        let opts = FilterOptions {
            price_min: 500.0,
            price_max: 400.0,
            ..FilterOptions::default()
        };
        assert!(filter(&fixture(), &opts).is_empty());
    }

    #[test]
    fn order_key_parses_names_and_legacy_aliases() {
        assert_eq!("priceAsc".parse::<OrderKey>().unwrap(), OrderKey::PriceAsc);
        assert_eq!("priceHigh".parse::<OrderKey>().unwrap(), OrderKey::PriceDesc);
        assert_eq!("bestDiscount".parse::<OrderKey>().unwrap(), OrderKey::DiscountDesc);
        assert_eq!("".parse::<OrderKey>().unwrap(), OrderKey::BestMatch);
        assert!("cheapest".parse::<OrderKey>().is_err());

        let key: OrderKey = serde_json::from_str("\"ratingDesc\"").unwrap();
        assert_eq!(key, OrderKey::RatingDesc);
    }

    #[test]
    fn query_runs_search_filter_sort() {
        let q = CatalogQuery {
            text: "apple".to_string(),
            order: OrderKey::PriceAsc,
            filter: FilterOptions::default(),
        };
        assert_eq!(ids(&q.run(&fixture())), vec!["5", "1"]);
    }
}
