pub mod advisor;
pub mod catalog;
pub mod chat;
pub mod domain;
pub mod retailer;

pub mod config {
    use crate::chat::ProviderKind;
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_TRENDING_LIMIT: usize = 3;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: u16,
        pub chat_provider: ProviderKind,
        pub trending_limit: usize,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let port = match lookup("PORT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT must be a port number (got {v:?})"))?,
                None => DEFAULT_PORT,
            };

            let chat_provider = match lookup("CHAT_PROVIDER") {
                Some(v) => v.parse().context("invalid CHAT_PROVIDER")?,
                None => ProviderKind::Heuristic,
            };

            let trending_limit = match lookup("TRENDING_LIMIT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("TRENDING_LIMIT must be a count (got {v:?})"))?,
                None => DEFAULT_TRENDING_LIMIT,
            };

            Ok(Self {
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                port,
                chat_provider,
                trending_limit,
            })
        }
    }

}
