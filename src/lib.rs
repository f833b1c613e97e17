use axum::{
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod analysis;
pub mod chat;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod matching;
pub mod routes;
pub mod seed;

use config::Config;
use matching::{build_embedder, EmbedderError, TextEmbedder};
use routes::{chat as chat_routes, companies, dashboard, deals, embeddings, thesis};

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub embedder: Arc<dyn TextEmbedder>,
}

impl AppState {
    /// Builds state with the embedder the configuration names.
    pub fn new(db: DatabaseConnection, config: Config) -> Result<Self, EmbedderError> {
        let embedder = build_embedder(config.embedder, config.model_cache_dir.as_deref())?;
        Ok(Self::with_embedder(db, config, embedder))
    }

    pub fn with_embedder(db: DatabaseConnection, config: Config, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            embedder,
        }
    }
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        thesis::analyze_thesis,
        thesis::list_theses,
        thesis::get_thesis,
        thesis::delete_thesis,
        thesis::thesis_history,
        thesis::thesis_details,
        companies::list_companies,
        companies::get_company,
        deals::list_deals,
        deals::create_deal,
        deals::update_deal,
        deals::deal_analysis,
        embeddings::update_embeddings,
        dashboard::dashboard_stats,
        chat_routes::chat,
    ),
    components(
        schemas(
            entities::company::Model,
            entities::deal::Model,
            entities::investment_thesis::Model,
            entities::Industry,
            entities::FundingStage,
            entities::RevenueRange,
            entities::DealStatus,
            entities::DealType,
            analysis::ThesisAnalysis,
            analysis::ThesisCriteria,
            matching::CompanyMatch,
            matching::Recommendation,
            thesis::AnalyzeThesisRequest,
            thesis::AnalyzeThesisResponse,
            thesis::ThesisList,
            thesis::ThesisHistoryEntry,
            thesis::ThesisDetails,
            companies::CompanyList,
            deals::DealList,
            deals::CreateDealRequest,
            deals::CreateDealResponse,
            deals::UpdateDealRequest,
            deals::DealAnalysis,
            embeddings::UpdateEmbeddingsResponse,
            dashboard::DashboardStats,
            chat_routes::ChatRequest,
            chat_routes::ChatResponse,
            chat::Intent,
        )
    ),
    tags(
        (name = "thesis", description = "Thesis analysis and history"),
        (name = "companies", description = "Company catalog"),
        (name = "deals", description = "Deal pipeline"),
        (name = "dashboard", description = "Aggregate statistics"),
        (name = "chat", description = "Q&A over the stored data")
    ),
    info(
        title = "Dealflow API",
        version = "0.1.0",
        description = "Investment thesis analysis and company matching"
    )
)]
pub struct ApiDoc;

pub fn create_app(state: AppState) -> Router {
    let api_doc = ApiDoc::openapi();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze-thesis", post(thesis::analyze_thesis))
        .route("/api/theses", get(thesis::list_theses))
        .route("/api/theses/{id}", get(thesis::get_thesis).delete(thesis::delete_thesis))
        .route("/api/thesis-history", get(thesis::thesis_history))
        .route("/api/thesis/{id}/details", get(thesis::thesis_details))
        .route("/api/companies", get(companies::list_companies))
        .route("/api/companies/{id}", get(companies::get_company))
        .route("/api/deals", get(deals::list_deals))
        .route("/api/create-deal", post(deals::create_deal))
        .route("/api/deals/{id}", patch(deals::update_deal))
        .route("/api/deals/{id}/analysis", get(deals::deal_analysis))
        .route("/api/update-embeddings", post(embeddings::update_embeddings))
        .route("/api/dashboard-stats", get(dashboard::dashboard_stats))
        .route("/api/chat", post(chat_routes::chat))
        .with_state(state.clone());

    // Rate limiting only applies to the API routes, not the docs
    let api_routes = match state.config.rate_limit_per_minute {
        Some(per_minute) => {
            let governor_conf = GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(Duration::from_millis(60_000 / u64::from(per_minute.max(1))))
                .burst_size(state.config.rate_limit_burst)
                .finish();
            match governor_conf {
                Some(conf) => {
                    tracing::info!(per_minute, burst = state.config.rate_limit_burst, "rate limiting enabled");
                    api_routes.layer(GovernorLayer { config: Arc::new(conf) })
                }
                None => {
                    tracing::warn!("invalid rate limit settings, rate limiting disabled");
                    api_routes
                }
            }
        }
        None => api_routes,
    };

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

    Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
