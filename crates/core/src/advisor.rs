use crate::domain::price::PricePoint;
use crate::domain::recommendation::{Advice, Recommendation};

const BUY_BELOW: f64 = 0.2;
const WAIT_ABOVE: f64 = 0.8;
const FLAT_RANGE_POSITION: f64 = 0.5;

// Placeholder competitor names; nothing here does a similarity search.
const ALTERNATIVES: [&str; 3] = ["Samsung Galaxy S23", "Google Pixel 7 Pro", "OnePlus 11"];

/// Where the current price sits inside the observed historical range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePosition {
    pub lowest: f64,
    pub highest: f64,
    /// Normalized to [0, 1]. A flat history is 0.5.
    pub position: f64,
}

impl PricePosition {
    pub fn from_history(history: &[PricePoint], current_price: f64) -> Option<Self> {
        let first = history.first()?.price;
        let (lowest, highest) = history
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.price), hi.max(p.price)));

        let range = highest - lowest;
        let position = if range > 0.0 {
            ((current_price - lowest) / range).clamp(0.0, 1.0)
        } else {
            FLAT_RANGE_POSITION
        };

        Some(Self {
            lowest,
            highest,
            position,
        })
    }
}

pub fn advise(history: &[PricePoint], current_price: f64) -> Recommendation {
    let Some(pos) = PricePosition::from_history(history, current_price) else {
        tracing::debug!(current_price, "no price history; returning neutral advice");
        return no_history(current_price);
    };

    tracing::debug!(
        current_price,
        lowest = pos.lowest,
        highest = pos.highest,
        position = pos.position,
        "price position"
    );

    if pos.position < BUY_BELOW {
        Recommendation {
            advice: Advice::Buy,
            confidence: 0.9,
            reasoning: format!(
                "The current price ({current_price}) is close to the historical low ({}) from the last 6 months. This is a good time to buy.",
                pos.lowest
            ),
            expected_price_change: Some(15.0),
            best_time_to_buy: Some("now".to_string()),
            alternatives: None,
        }
    } else if pos.position > WAIT_ABOVE {
        Recommendation {
            advice: Advice::Wait,
            confidence: 0.85,
            reasoning: format!(
                "The current price ({current_price}) is close to the historical high ({}). Based on past trends, the price is likely to drop in the next 30 days.",
                pos.highest
            ),
            expected_price_change: Some(-50.0),
            best_time_to_buy: Some("in 3-4 weeks".to_string()),
            alternatives: None,
        }
    } else {
        Recommendation {
            advice: Advice::ConsiderAlternatives,
            confidence: 0.75,
            reasoning: format!(
                "The current price ({current_price}) is average compared to historical data. Consider comparing with similar products or waiting for upcoming sales events."
            ),
            expected_price_change: None,
            best_time_to_buy: None,
            alternatives: Some(ALTERNATIVES.iter().map(|s| s.to_string()).collect()),
        }
    }
}

fn no_history(current_price: f64) -> Recommendation {
    Recommendation {
        advice: Advice::ConsiderAlternatives,
        confidence: 0.0,
        reasoning: format!(
            "There is no price history for this product yet, so the current price ({current_price}) cannot be compared."
        ),
        expected_price_change: None,
        best_time_to_buy: None,
        alternatives: None,
    }
}
