pub mod query;
mod seed;

use crate::advisor;
use crate::domain::price::PricePoint;
use crate::domain::product::{PriceDirection, Product};
use crate::domain::recommendation::Recommendation;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable product catalog plus per-product price histories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    #[serde(default)]
    histories: BTreeMap<String, Vec<PricePoint>>,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        histories: BTreeMap<String, Vec<PricePoint>>,
    ) -> anyhow::Result<Self> {
        let mut seen = BTreeSet::<String>::new();
        for product in &products {
            product.validate()?;
            ensure!(
                seen.insert(product.id.clone()),
                "duplicate product id: {}",
                product.id
            );
        }

        for (id, history) in &histories {
            ensure!(
                seen.contains(id),
                "price history for unknown product id: {id}"
            );
            for point in history {
                point
                    .validate()
                    .with_context(|| format!("price history for {id}"))?;
            }
        }

        Ok(Self {
            products,
            histories,
        })
    }

    /// The built-in demo catalog.
    pub fn seeded() -> Self {
        let (products, histories) = seed::data();
        Self {
            products,
            histories,
        }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let raw: Catalog = serde_json::from_str(json).context("catalog is not valid JSON")?;
        Self::new(raw.products, raw.histories)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Empty when the product has no recorded history.
    pub fn history(&self, id: &str) -> &[PricePoint] {
        self.histories.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn trending(&self, limit: usize) -> Vec<Product> {
        self.products.iter().take(limit).cloned().collect()
    }

    /// Products whose price dropped, biggest drop first.
    pub fn deals(&self) -> Vec<Product> {
        let mut out: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.price_change.direction == PriceDirection::Down)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.price_change.amount.total_cmp(&a.price_change.amount));
        out
    }

    /// Listings of the same product across stores, matched by title.
    pub fn comparison(&self, title: &str) -> Vec<Product> {
        let needle = title.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn similar(&self, id: &str, limit: usize) -> Vec<Product> {
        let Some(category) = self.find(id).and_then(|p| p.category.as_deref()) else {
            return Vec::new();
        };

        self.products
            .iter()
            .filter(|p| p.id != id && p.category.as_deref() == Some(category))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn advise(&self, id: &str) -> Option<Recommendation> {
        let product = self.find(id)?;
        Some(advisor::advise(self.history(id), product.current_price))
    }
}
