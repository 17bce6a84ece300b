use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bargain_core::catalog::Catalog;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bargain")]
struct Args {
    /// JSON catalog file ({"products": [...], "histories": {...}}). Defaults to the
    /// built-in demo catalog.
    #[arg(long, global = true)]
    catalog: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search, filter and sort the catalog.
    Search(commands::SearchArgs),
    /// Buy/wait advice for a catalog product or an ad-hoc price history.
    Advise(commands::AdviseArgs),
    /// Products whose price dropped, biggest drop first.
    Deals,
    /// Ask the shopping assistant one question.
    Chat(commands::ChatArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = bargain_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            Catalog::from_json_str(&raw)
                .with_context(|| format!("invalid catalog {}", path.display()))?
        }
        None => Catalog::seeded(),
    };

    tracing::debug!(products = catalog.products().len(), "catalog loaded");

    let result = match args.command {
        Command::Search(a) => commands::search(&catalog, a),
        Command::Advise(a) => commands::advise(&catalog, a),
        Command::Deals => Ok(serde_json::to_value(catalog.deals())?),
        Command::Chat(a) => commands::chat(&catalog, settings.chat_provider, a).await,
    };

    let value = match result {
        Ok(v) => v,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn init_sentry(settings: &bargain_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
