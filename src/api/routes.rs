//! API route definitions

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::error::ErrorResponse;
use super::handlers::{
    self, HealthResponse, ImageAnalysisResponse, ImageUpload, RecommendationRequest,
    RecommendationResponse, StoredResponse, UploadResponse,
};
use crate::classify::Classifiers;
use crate::conditions::ConditionCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::llm::{ChatClient, OpenAiClient};
use crate::store::ResultStore;
use crate::types::{AnalysisResult, ConditionInfo};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skinsight API",
        version = "0.1.0",
        description = "Skin image classification and dermatology guidance"
    ),
    tags(
        (name = "analysis", description = "Image classification"),
        (name = "conditions", description = "Educational condition content"),
        (name = "language-model", description = "Language model analysis and recommendations"),
        (name = "pages", description = "Pages served by the frontend"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::index,
        handlers::results_page,
        handlers::upload_image,
        handlers::analyze,
        handlers::analyze_lunares,
        handlers::get_lunares_result,
        handlers::analyze_acne,
        handlers::analyze_rosacea,
        handlers::get_condition,
        handlers::openai_analyze,
        handlers::openai_recommend,
    ),
    components(schemas(
        AnalysisResult,
        ConditionInfo,
        UploadResponse,
        StoredResponse,
        ImageUpload,
        ImageAnalysisResponse,
        RecommendationRequest,
        RecommendationResponse,
        HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifiers: Classifiers,
    pub results: Arc<ResultStore>,
    pub conditions: Arc<ConditionCatalog>,
    pub llm: Arc<dyn ChatClient>,
    /// Output token bound for language model calls
    pub max_tokens: u32,
    /// Request body limit, covering uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// State backed by the model servers and language model named in the config
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            classifiers: Classifiers::remote(http.clone(), &config.classifiers),
            results: Arc::new(ResultStore::new()),
            conditions: Arc::new(ConditionCatalog::builtin()),
            llm: Arc::new(OpenAiClient::new(http, &config.llm)),
            max_tokens: config.llm.max_tokens,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Pages owned by the frontend
        .route("/", get(handlers::index))
        .route("/results", get(handlers::results_page))

        // Classification
        .route("/upload", post(handlers::upload_image))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analyze-lunares", post(handlers::analyze_lunares))
        .route("/api/analyze-lunares/{id}", get(handlers::get_lunares_result))
        .route("/api/analyze-acne", post(handlers::analyze_acne))
        .route("/api/analyze-rosacea", post(handlers::analyze_rosacea))

        // Conditions
        .route("/api/condition/{name}", get(handlers::get_condition))

        // Language model
        .route("/openai-analizar", post(handlers::openai_analyze))
        .route("/openai-recomendaciones", post(handlers::openai_recommend))

        // Health
        .route("/health", get(handlers::health))

        // OpenAPI document and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .fallback(handlers::not_found)

        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
