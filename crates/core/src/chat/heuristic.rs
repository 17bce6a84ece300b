use crate::chat::scripted::ScriptedProvider;
use crate::chat::{ChatContext, ProviderKind, ResponseProvider};

/// Keyword-driven advice about the product in context. Falls back to the scripted
/// replies when there is no product to talk about.
#[derive(Debug, Default)]
pub struct HeuristicProvider {
    fallback: ScriptedProvider,
}

#[async_trait::async_trait]
impl ResponseProvider for HeuristicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Heuristic
    }

    async fn reply(&self, ctx: &ChatContext, message: &str) -> anyhow::Result<String> {
        let (Some(title), Some(price)) = (ctx.product_title.as_deref(), ctx.current_price) else {
            return Ok(self.fallback.next_reply().to_string());
        };

        let question = message.to_lowercase();
        tracing::debug!(product = title, price, "heuristic chat reply");

        // Rule order matters: "wait" wins over "buy" in "should I wait to buy".
        let reply = if question.contains("wait") {
            format!(
                "Based on historical price data for {title}, I would recommend waiting. This product typically sees discounts during major shopping events, and the current price of ${price} is about 15% higher than the lowest observed price in the past 6 months."
            )
        } else if question.contains("buy") {
            format!(
                "If you need the {title} right now, the current price of ${price} is reasonable, though not the best we've seen. There's a 65% chance the price will drop by at least 10% in the next month based on historical patterns."
            )
        } else if question.contains("alternative") {
            format!(
                "Instead of the {title} at ${price}, you might want to consider these alternatives with better value: 1) Product X (${:.2}) which has similar features, 2) Product Y (${:.2}) which has better reviews, or 3) Waiting for the upcoming version which is rumored to launch next quarter.",
                price * 0.8,
                price * 0.9
            )
        } else {
            format!(
                "The {title} is currently priced at ${price}. Based on our price tracking data, this is about 5% above the average price over the last 3 months. It's not the worst time to buy, but if you can wait, we predict a better deal might be available during the next major shopping event."
            )
        };

        Ok(reply)
    }
}
