use anyhow::ensure;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed price. Histories are kept in chronological insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            store: None,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.price.is_finite() && self.price >= 0.0,
            "price on {} must be a non-negative number (got {})",
            self.date,
            self.price
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
    }

    #[test]
    fn accepts_zero_and_positive_prices() {
        assert!(PricePoint::new(day(), 0.0).validate().is_ok());
        assert!(PricePoint::new(day(), 349.99).validate().is_ok());
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        for price in [-500.0, f64::NAN, f64::INFINITY] {
            let err = PricePoint::new(day(), price).validate().unwrap_err();
            assert!(err.to_string().contains("2023-06-01"), "{err}");
        }
    }
}
