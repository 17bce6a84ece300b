use anyhow::{ensure, Context};
use chrono::{Duration, NaiveDate};
use clap::Args;
use serde_json::Value;

use bargain_core::advisor;
use bargain_core::catalog::query::{CatalogQuery, FilterOptions, OrderKey};
use bargain_core::catalog::Catalog;
use bargain_core::chat::{provider_for, ChatContext, Conversation, ProviderKind};
use bargain_core::domain::price::PricePoint;
use bargain_core::domain::product::Store;
use bargain_core::domain::session::Session;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query; empty matches everything.
    #[arg(long, short, default_value = "")]
    query: String,

    /// bestMatch, priceAsc, priceDesc, discountDesc or ratingDesc.
    #[arg(long, default_value = "bestMatch")]
    sort: OrderKey,

    #[arg(long)]
    price_min: Option<f64>,

    #[arg(long)]
    price_max: Option<f64>,

    /// Allowed store; repeat for several.
    #[arg(long = "store")]
    stores: Vec<Store>,

    /// Integer rating floor; repeat for several.
    #[arg(long = "rating", value_parser = clap::value_parser!(u8).range(0..=5))]
    ratings: Vec<u8>,
}

pub fn search(catalog: &Catalog, args: SearchArgs) -> anyhow::Result<Value> {
    let defaults = FilterOptions::default();
    let query = CatalogQuery {
        text: args.query,
        order: args.sort,
        filter: FilterOptions {
            price_min: args.price_min.unwrap_or(defaults.price_min),
            price_max: args.price_max.unwrap_or(defaults.price_max),
            stores: args.stores.into_iter().collect(),
            min_ratings: args.ratings.into_iter().collect(),
        },
    };

    let found = query.run(catalog.products());
    tracing::info!(returned = found.len(), "search finished");
    Ok(serde_json::to_value(found)?)
}

#[derive(Debug, Args)]
pub struct AdviseArgs {
    /// Catalog product to advise on.
    #[arg(long, conflicts_with = "prices")]
    product_id: Option<String>,

    /// Comma-separated historical prices, oldest first.
    #[arg(long, requires = "current_price")]
    prices: Option<String>,

    #[arg(long)]
    current_price: Option<f64>,

    /// Date of the first price (YYYY-MM-DD); later prices are one day apart.
    /// Defaults to today.
    #[arg(long)]
    start_date: Option<String>,
}

pub fn advise(catalog: &Catalog, args: AdviseArgs) -> anyhow::Result<Value> {
    if let Some(id) = args.product_id.as_deref() {
        let recommendation = catalog
            .advise(id)
            .with_context(|| format!("unknown product id: {id}"))?;
        return Ok(serde_json::to_value(recommendation)?);
    }

    let current_price = args
        .current_price
        .context("--current-price is required without --product-id")?;
    ensure!(
        current_price.is_finite() && current_price >= 0.0,
        "--current-price must be non-negative (got {current_price})"
    );

    let start = resolve_start_date(args.start_date.as_deref())?;
    let history = parse_history(args.prices.as_deref().unwrap_or_default(), start)?;
    Ok(serde_json::to_value(advisor::advise(&history, current_price))?)
}

fn resolve_start_date(arg: Option<&str>) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --start-date {s:?} (expected YYYY-MM-DD)")),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

fn parse_history(raw: &str, start: NaiveDate) -> anyhow::Result<Vec<PricePoint>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| -> anyhow::Result<PricePoint> {
            let price: f64 = s.parse().with_context(|| format!("invalid price {s:?}"))?;
            let date = start
                .checked_add_signed(Duration::days(i as i64))
                .context("price dates overflow the calendar")?;
            let point = PricePoint::new(date, price);
            point.validate()?;
            Ok(point)
        })
        .collect()
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[arg(long, short)]
    message: String,

    /// Catalog product the question is about.
    #[arg(long)]
    product_id: Option<String>,

    /// Sign in as this name for the conversation (requires --email).
    #[arg(long, requires = "email")]
    name: Option<String>,

    #[arg(long, requires = "name")]
    email: Option<String>,
}

pub async fn chat(
    catalog: &Catalog,
    provider: ProviderKind,
    args: ChatArgs,
) -> anyhow::Result<Value> {
    let mut ctx = ChatContext::default();
    if let Some(id) = args.product_id.as_deref() {
        let product = catalog
            .find(id)
            .with_context(|| format!("unknown product id: {id}"))?;
        ctx.product_title = Some(product.title.clone());
        ctx.current_price = Some(product.current_price);
    }
    if let (Some(name), Some(email)) = (args.name.as_deref(), args.email.as_deref()) {
        ctx.session = Some(Session::sign_in(name, email)?);
    }

    let provider = provider_for(provider);
    let mut conversation = Conversation::new(ctx);
    let reply = conversation.send(provider.as_ref(), &args.message).await?;
    ensure!(reply.is_some(), "message must not be blank");

    Ok(serde_json::to_value(conversation.messages())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn parses_comma_separated_history() {
        let h = parse_history("200, 150 ,100,", start()).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(h[2].price, 100.0);
        assert_eq!(h[2].date, NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
    }

    #[test]
    fn rejects_bad_prices() {
        assert!(parse_history("100,abc", start()).is_err());
        assert!(parse_history("100,-5", start()).is_err());
    }

    #[test]
    fn empty_price_list_is_empty_history() {
        assert!(parse_history("", start()).unwrap().is_empty());
    }

    #[test]
    fn advise_from_ad_hoc_prices() {
        let args = AdviseArgs {
            product_id: None,
            prices: Some("100,200".to_string()),
            current_price: Some(190.0),
            start_date: Some("2023-06-01".to_string()),
        };
        let v = advise(&Catalog::seeded(), args).unwrap();
        assert_eq!(v["advice"], "wait");
    }

    #[test]
    fn advise_rejects_start_date_at_calendar_end() {
        let args = AdviseArgs {
            product_id: None,
            prices: Some("100,200".to_string()),
            current_price: Some(150.0),
            start_date: Some(NaiveDate::MAX.format("%Y-%m-%d").to_string()),
        };
        let err = advise(&Catalog::seeded(), args).unwrap_err();
        assert!(err.to_string().contains("overflow"), "{err:#}");
        assert!(parse_history("100", NaiveDate::MAX).is_ok());
    }

    #[test]
    fn advise_unknown_product_fails() {
        let args = AdviseArgs {
            product_id: Some("nope".to_string()),
            prices: None,
            current_price: None,
            start_date: None,
        };
        assert!(advise(&Catalog::seeded(), args).is_err());
    }

    #[test]
    fn search_with_store_filter() {
        let args = SearchArgs {
            query: "sony".to_string(),
            sort: OrderKey::PriceDesc,
            price_min: None,
            price_max: None,
            stores: vec![Store::Amazon, Store::BestBuy],
            ratings: vec![],
        };
        let v = search(&Catalog::seeded(), args).unwrap();
        let ids: Vec<&str> = v
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["9", "3"]);
    }

    #[tokio::test]
    async fn chat_blank_message_fails() {
        let args = ChatArgs {
            message: "  ".to_string(),
            product_id: None,
            name: None,
            email: None,
        };
        assert!(chat(&Catalog::seeded(), ProviderKind::Scripted, args)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn chat_returns_transcript() {
        let args = ChatArgs {
            message: "any alternatives?".to_string(),
            product_id: Some("4".to_string()),
            name: Some("Ann".to_string()),
            email: Some("ann@example.com".to_string()),
        };
        let v = chat(&Catalog::seeded(), ProviderKind::Heuristic, args)
            .await
            .unwrap();
        let messages = v.as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages[2]["content"]
            .as_str()
            .unwrap()
            .contains("Product X ($799.20)"));
    }
}
