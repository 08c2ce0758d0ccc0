//! API request handlers

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::error::{ApiError, ErrorResponse};
use super::routes::AppState;
use crate::classify::ClassifierKind;
use crate::llm::dermatologist;
use crate::types::{AnalysisResult, ConditionInfo, Probabilities};

const FRONTEND_ONLY: &str = "No implementado: la vista HTML es manejada por el frontend.";

// Query parameters

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResultsPageParams {
    /// Name of the analysed image
    pub image_name: Option<String>,
    /// Analysis status shown by the page
    pub analysis_status: Option<String>,
}

// Request bodies

/// Multipart form with one image file
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUpload {
    /// Image to analyse
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// Label obtained from a previous analysis
    pub prediccion: String,
}

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Client-supplied file name
    pub filename: Option<String>,
    /// Predicted label
    pub prediccion: String,
    /// Per-class probabilities
    #[schema(value_type = Object)]
    pub probabilidades: Probabilities,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredResponse {
    /// Identifier for fetching the stored result
    pub id: String,
}

/// Answer of the image analysis. Fields mirror whatever the model returned.
#[derive(Serialize, ToSchema)]
#[allow(dead_code)]
pub struct ImageAnalysisResponse {
    pub afeccion: String,
    pub descripcion: Option<String>,
    pub recomendaciones: Vec<String>,
}

/// Answer of the recommendation request. Fields mirror whatever the model returned.
#[derive(Serialize, ToSchema)]
#[allow(dead_code)]
pub struct RecommendationResponse {
    pub descripcion: String,
    pub recomendaciones: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
}

// Upload helpers

/// The `file` part of a multipart upload
pub(crate) struct UploadedImage {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedImage, ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        return Ok(UploadedImage {
            filename,
            content_type,
            bytes,
        });
    }

    Err(ApiError::MissingFile)
}

/// Messages reported when classification fails
struct FailureTexts {
    undecided: &'static str,
    internal_prefix: &'static str,
}

const FORM_FAILURES: FailureTexts = FailureTexts {
    undecided: "Error al procesar la imagen: No se pudo predecir la clase.",
    internal_prefix: "Error crítico al procesar la imagen",
};

const API_FAILURES: FailureTexts = FailureTexts {
    undecided: "No se pudo predecir la clase para la imagen.",
    internal_prefix: "Error interno del servidor al analizar la imagen",
};

async fn classify(
    state: &AppState,
    kind: ClassifierKind,
    upload: UploadedImage,
    texts: &FailureTexts,
) -> Result<AnalysisResult, ApiError> {
    let content_type = match upload.content_type {
        Some(ct) if ct.starts_with("image/") => ct,
        other => {
            tracing::debug!("Rejected upload with content type {:?}", other);
            return Err(ApiError::InvalidContentType);
        }
    };

    let prediction = state
        .classifiers
        .get(kind)
        .predict(&upload.bytes)
        .await
        .map_err(|e| {
            tracing::error!("Classifier {} failed: {}", kind, e);
            ApiError::Internal(format!("{}: {}", texts.internal_prefix, e))
        })?;

    let Some(label) = prediction.label else {
        tracing::warn!("Classifier {} gave no label for {:?}", kind, upload.filename);
        return Err(ApiError::InferenceFailed(texts.undecided.into()));
    };

    tracing::info!("Prediction for {:?} ({}): {}", upload.filename, kind, label);

    Ok(AnalysisResult {
        filename: upload.filename,
        content_type,
        prediction: label,
        probabilities: prediction.probabilities,
    })
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Upload page, served by the frontend
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 404, description = "Page is served by the frontend", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn index() -> ApiError {
    ApiError::NotFound(FRONTEND_ONLY.into())
}

/// Results page, served by the frontend
#[utoipa::path(
    get,
    path = "/results",
    params(ResultsPageParams),
    responses(
        (status = 404, description = "Page is served by the frontend", body = ErrorResponse)
    ),
    tag = "pages"
)]
pub async fn results_page(Query(_params): Query<ResultsPageParams>) -> ApiError {
    ApiError::NotFound(FRONTEND_ONLY.into())
}

/// Classify a mole image submitted from the upload form
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Prediction", body = UploadResponse),
        (status = 400, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Classification failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let result = classify(&state, ClassifierKind::Lunares, upload, &FORM_FAILURES).await?;

    Ok(Json(UploadResponse {
        filename: result.filename,
        prediccion: result.prediction,
        probabilidades: result.probabilities,
    }))
}

/// Classify a mole image
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Classification failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    let result = classify(&state, ClassifierKind::Lunares, upload, &API_FAILURES).await?;
    Ok(Json(result))
}

/// Classify a mole image and keep the result for later retrieval
#[utoipa::path(
    post,
    path = "/api/analyze-lunares",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Identifier of the stored result", body = StoredResponse),
        (status = 400, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Classification failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze_lunares(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let result = classify(&state, ClassifierKind::Lunares, upload, &API_FAILURES).await?;
    let id = state.results.put(result).await;
    Ok(Json(StoredResponse { id }))
}

/// Get a stored mole analysis by id
#[utoipa::path(
    get,
    path = "/api/analyze-lunares/{id}",
    params(
        ("id" = String, Path, description = "Result identifier")
    ),
    responses(
        (status = 200, description = "Stored result", body = AnalysisResult),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn get_lunares_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    state
        .results
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Resultado no encontrado".into()))
}

/// Classify an acne image
#[utoipa::path(
    post,
    path = "/api/analyze-acne",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Classification failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze_acne(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    let result = classify(&state, ClassifierKind::Acne, upload, &API_FAILURES).await?;
    Ok(Json(result))
}

/// Classify a rosacea image
#[utoipa::path(
    post,
    path = "/api/analyze-rosacea",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Classification failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze_rosacea(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    let result = classify(&state, ClassifierKind::Rosacea, upload, &API_FAILURES).await?;
    Ok(Json(result))
}

/// Educational content for a condition
#[utoipa::path(
    get,
    path = "/api/condition/{name}",
    params(
        ("name" = String, Path, description = "Condition name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Condition found", body = ConditionInfo),
        (status = 404, description = "Condition not found", body = ErrorResponse)
    ),
    tag = "conditions"
)]
pub async fn get_condition(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ConditionInfo>, ApiError> {
    state
        .conditions
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Condición no encontrada".into()))
}

/// Identify the condition in an image with the language model
#[utoipa::path(
    post,
    path = "/openai-analizar",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model answer, or a fixed fallback", body = ImageAnalysisResponse),
        (status = 422, description = "Missing or malformed upload", body = ErrorResponse),
        (status = 500, description = "Language model unreachable", body = ErrorResponse)
    ),
    tag = "language-model"
)]
pub async fn openai_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let content_type = upload
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let outcome = dermatologist::analyze_image(
        state.llm.as_ref(),
        &upload.bytes,
        content_type,
        state.max_tokens,
    )
    .await?;

    Ok(Json(outcome.into_value(dermatologist::image_fallback())))
}

/// Description and recommendations for a predicted label
#[utoipa::path(
    post,
    path = "/openai-recomendaciones",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Model answer, or a fixed fallback", body = RecommendationResponse),
        (status = 422, description = "Body is not a valid request", body = ErrorResponse),
        (status = 500, description = "Language model unreachable", body = ErrorResponse)
    ),
    tag = "language-model"
)]
pub async fn openai_recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    let outcome =
        dermatologist::recommend(state.llm.as_ref(), &req.prediccion, state.max_tokens).await?;

    Ok(Json(outcome.into_value(dermatologist::recommendation_fallback())))
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}
