use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use bargain_core::advisor;
use bargain_core::catalog::query::{CatalogQuery, FilterOptions};
use bargain_core::catalog::Catalog;
use bargain_core::chat::{ChatContext, ChatMessage, Conversation, ResponseProvider};
use bargain_core::domain::price::PricePoint;
use bargain_core::domain::product::{Product, Store};
use bargain_core::domain::recommendation::Recommendation;
use bargain_core::domain::session::Session;
use bargain_core::retailer::{self, Retailer};

const SIMILAR_LIMIT: usize = 4;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub chat: Arc<dyn ResponseProvider>,
    pub trending_limit: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/products/search", get(search_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/history", get(get_history))
        .route("/products/:id/advice", get(get_product_advice))
        .route("/products/:id/comparison", get(get_comparison))
        .route("/products/:id/similar", get(get_similar))
        .route("/products/:id/listing", get(get_listing))
        .route("/trending", get(get_trending))
        .route("/deals", get(get_deals))
        .route("/advice", post(post_advice))
        .route("/session", post(post_session))
        .route("/chat", post(post_chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Comma-separated store names.
    pub stores: Option<String>,
    /// Comma-separated integer rating floors.
    pub ratings: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> anyhow::Result<CatalogQuery> {
        let mut filter = FilterOptions::default();
        if let Some(min) = self.price_min {
            filter.price_min = min;
        }
        if let Some(max) = self.price_max {
            filter.price_max = max;
        }
        for name in split_list(self.stores.as_deref()) {
            match Retailer::from_name(name) {
                Retailer::Known(store) => filter.stores.insert(store),
                Retailer::Unknown(name) => anyhow::bail!("unknown store: {name:?}"),
            };
        }
        for rating in split_list(self.ratings.as_deref()) {
            let floor: u8 = rating
                .parse()
                .map_err(|_| anyhow::anyhow!("rating floor must be 0..=5 (got {rating:?})"))?;
            anyhow::ensure!(floor <= 5, "rating floor must be 0..=5 (got {floor})");
            filter.min_ratings.insert(floor);
        }

        Ok(CatalogQuery {
            text: self.q.unwrap_or_default(),
            order: self.sort.as_deref().unwrap_or_default().parse()?,
            filter,
        })
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let query = params.into_query().map_err(|e| {
        tracing::debug!(error = %e, "rejecting search params");
        StatusCode::BAD_REQUEST
    })?;

    Ok(Json(query.run(state.catalog.products())))
}

fn find_product<'a>(state: &'a AppState, id: &str) -> Result<&'a Product, StatusCode> {
    state.catalog.find(id).ok_or(StatusCode::NOT_FOUND)
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, StatusCode> {
    Ok(Json(find_product(&state, &id)?.clone()))
}

async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PricePoint>>, StatusCode> {
    find_product(&state, &id)?;
    Ok(Json(state.catalog.history(&id).to_vec()))
}

async fn get_product_advice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recommendation>, StatusCode> {
    let recommendation = state.catalog.advise(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(product_id = %id, advice = ?recommendation.advice, "advice served");
    Ok(Json(recommendation))
}

async fn get_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let title = find_product(&state, &id)?.title.clone();
    Ok(Json(state.catalog.comparison(&title)))
}

async fn get_similar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    find_product(&state, &id)?;
    Ok(Json(state.catalog.similar(&id, SIMILAR_LIMIT)))
}

#[derive(Debug, Serialize)]
pub struct Listing {
    pub store: Store,
    pub link: Option<String>,
    pub listing_id: Option<String>,
}

async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, StatusCode> {
    let product = find_product(&state, &id)?;
    let listing_id = product
        .link
        .as_deref()
        .and_then(|link| retailer::extract_listing_id(link, product.store));

    Ok(Json(Listing {
        store: product.store,
        link: product.link.clone(),
        listing_id,
    }))
}

async fn get_trending(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.trending(state.trending_limit))
}

async fn get_deals(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.deals())
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub history: Vec<PricePoint>,
    pub current_price: f64,
}

async fn post_advice(
    Json(req): Json<AdviceRequest>,
) -> Result<Json<Recommendation>, StatusCode> {
    if !(req.current_price.is_finite() && req.current_price >= 0.0) {
        return Err(StatusCode::BAD_REQUEST);
    }
    for point in &req.history {
        point.validate().map_err(|e| {
            tracing::debug!(error = %e, "rejecting price history");
            StatusCode::BAD_REQUEST
        })?;
    }
    Ok(Json(advisor::advise(&req.history, req.current_price)))
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub name: String,
    pub email: String,
}

async fn post_session(Json(req): Json<SessionRequest>) -> Result<Json<Session>, StatusCode> {
    let session = Session::sign_in(&req.name, &req.email).map_err(|e| {
        tracing::debug!(error = %e, "rejecting sign-in");
        StatusCode::BAD_REQUEST
    })?;

    tracing::info!(session_id = %session.id, "session opened");
    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub product_id: Option<String>,
    pub session: Option<Session>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub messages: Vec<ChatMessage>,
}

async fn post_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let mut ctx = ChatContext {
        session: req.session,
        ..ChatContext::default()
    };
    if let Some(id) = req.product_id.as_deref() {
        let product = find_product(&state, id)?;
        ctx.product_title = Some(product.title.clone());
        ctx.current_price = Some(product.current_price);
    }

    let mut conversation = Conversation::new(ctx);
    let reply = conversation
        .send(state.chat.as_ref(), &req.message)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::BAD_REQUEST)?;

    Ok(Json(ChatResponse {
        reply,
        messages: conversation.messages().to_vec(),
    }))
}
