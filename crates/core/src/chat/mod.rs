pub mod conversation;
pub mod heuristic;
pub mod scripted;

use crate::domain::session::Session;
use anyhow::bail;
use std::str::FromStr;
use std::sync::Arc;

pub use conversation::{ChatMessage, Conversation, Sender};
pub use heuristic::HeuristicProvider;
pub use scripted::ScriptedProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Scripted,
    Heuristic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Scripted => "scripted",
            ProviderKind::Heuristic => "heuristic",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripted" => Ok(ProviderKind::Scripted),
            "heuristic" => Ok(ProviderKind::Heuristic),
            other => bail!("unknown chat provider: {other:?} (expected scripted or heuristic)"),
        }
    }
}

/// What the assistant knows about the conversation it is answering in.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub product_title: Option<String>,
    pub current_price: Option<f64>,
    pub session: Option<Session>,
}

#[async_trait::async_trait]
pub trait ResponseProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn reply(&self, ctx: &ChatContext, message: &str) -> anyhow::Result<String>;
}

pub fn provider_for(kind: ProviderKind) -> Arc<dyn ResponseProvider> {
    match kind {
        ProviderKind::Scripted => Arc::new(ScriptedProvider::default()),
        ProviderKind::Heuristic => Arc::new(HeuristicProvider::default()),
    }
}

pub fn greeting(ctx: &ChatContext) -> String {
    let hello = match &ctx.session {
        Some(session) => format!("Hello {}!", session.first_name()),
        None => "Hello!".to_string(),
    };

    match ctx.product_title.as_deref() {
        Some(title) => format!(
            "{hello} I'm your AI shopping assistant. I can help you decide if now is a good time to buy {title} or if you should wait for a better price. What would you like to know?"
        ),
        None => format!(
            "{hello} I'm your AI shopping assistant. I can help you find the best deals, compare prices, or give advice on when to buy. What would you like to know?"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses() {
        assert_eq!("Scripted".parse::<ProviderKind>().unwrap(), ProviderKind::Scripted);
        assert_eq!(" heuristic".parse::<ProviderKind>().unwrap(), ProviderKind::Heuristic);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_for_builds_requested_kind() {
        assert_eq!(provider_for(ProviderKind::Scripted).kind(), ProviderKind::Scripted);
        assert_eq!(provider_for(ProviderKind::Heuristic).kind(), ProviderKind::Heuristic);
    }

    #[test]
    fn greeting_mentions_product_and_user() {
        let ctx = ChatContext {
            product_title: Some("Sony WH-1000XM5".to_string()),
            current_price: Some(348.0),
            session: Some(Session::sign_in("Ann Lee", "ann@example.com").unwrap()),
        };
        let text = greeting(&ctx);
        assert!(text.starts_with("Hello Ann!"));
        assert!(text.contains("good time to buy Sony WH-1000XM5"));
    }

    #[test]
    fn generic_greeting_without_context() {
        let text = greeting(&ChatContext::default());
        assert!(text.starts_with("Hello!"));
        assert!(text.contains("find the best deals"));
    }
}
