use crate::chat::{greeting, ChatContext, ResponseProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// A chat transcript, opened with a greeting from the assistant.
#[derive(Debug, Clone)]
pub struct Conversation {
    ctx: ChatContext,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(ctx: ChatContext) -> Self {
        let hello = ChatMessage::new(Sender::Bot, greeting(&ctx));
        Self {
            ctx,
            messages: vec![hello],
        }
    }

    pub fn context(&self) -> &ChatContext {
        &self.ctx
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends the user's message and the provider's reply. Blank input is ignored
    /// and returns `None`. If the provider fails, the user message stays in the
    /// transcript and the error is returned.
    pub async fn send(
        &mut self,
        provider: &dyn ResponseProvider,
        text: &str,
    ) -> anyhow::Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.messages.push(ChatMessage::new(Sender::User, text.to_string()));

        let reply = provider.reply(&self.ctx, text).await.map_err(|err| {
            tracing::warn!(provider = provider.kind().as_str(), error = %err, "chat reply failed");
            err
        })?;

        self.messages.push(ChatMessage::new(Sender::Bot, reply.clone()));
        Ok(Some(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{HeuristicProvider, ProviderKind, ScriptedProvider};

    struct Failing;

    #[async_trait::async_trait]
    impl ResponseProvider for Failing {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Scripted
        }

        async fn reply(&self, _ctx: &ChatContext, _message: &str) -> anyhow::Result<String> {
            anyhow::bail!("provider offline")
        }
    }

    #[test]
    fn starts_with_greeting() {
        let convo = Conversation::new(ChatContext::default());
        assert_eq!(convo.messages().len(), 1);
        assert_eq!(convo.messages()[0].sender, Sender::Bot);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut convo = Conversation::new(ChatContext::default());
        let out = convo.send(&ScriptedProvider::default(), "   ").await.unwrap();
        assert!(out.is_none());
        assert_eq!(convo.messages().len(), 1);
    }

    #[tokio::test]
    async fn send_appends_user_then_bot() {
        let ctx = ChatContext {
            product_title: Some("LG C2".to_string()),
            current_price: Some(1599.99),
            session: None,
        };
        let mut convo = Conversation::new(ctx);
        let reply = convo
            .send(&HeuristicProvider::default(), "  should I wait?  ")
            .await
            .unwrap()
            .unwrap();

        let messages = convo.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].content, "should I wait?");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].content, reply);
    }

    #[tokio::test]
    async fn provider_error_keeps_user_message() {
        let mut convo = Conversation::new(ChatContext::default());
        assert!(convo.send(&Failing, "hello").await.is_err());
        assert_eq!(convo.messages().len(), 2);
        assert_eq!(convo.messages()[1].sender, Sender::User);
    }
}
