use crate::chat::{ChatContext, ProviderKind, ResponseProvider};
use std::sync::atomic::{AtomicUsize, Ordering};

const CANNED_REPLIES: [&str; 5] = [
    "Based on historical price data, this product is currently at a good price point. It's about 15% lower than its average price over the last 3 months.",
    "I'd recommend waiting if you can. Looking at price trends, this product typically goes on sale during end-of-month promotions.",
    "There are similar products with better ratings at the same price point. Would you like me to suggest alternatives?",
    "This is actually the lowest price this product has been in the last 6 months! It's a great time to buy.",
    "While this store has it for $199, I found the same model on another site for $179. Would you like me to share that link?",
];

/// Rotates through a fixed list of replies, ignoring the message.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    cursor: AtomicUsize,
}

impl ScriptedProvider {
    pub fn next_reply(&self) -> &'static str {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        CANNED_REPLIES[i % CANNED_REPLIES.len()]
    }
}

#[async_trait::async_trait]
impl ResponseProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Scripted
    }

    async fn reply(&self, _ctx: &ChatContext, _message: &str) -> anyhow::Result<String> {
        Ok(self.next_reply().to_string())
    }
}
