use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::error::EstimateError;
use crate::models::{EstimateIn, EstimationResult, HealthStatus};
use crate::services::EstimationService;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

impl IntoResponse for EstimateError {
    fn into_response(self) -> Response {
        let status = match &self {
            EstimateError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EstimateError::Upstream(_) => StatusCode::BAD_GATEWAY,
            EstimateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EstimateError::UnsupportedImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        };

        if self.is_configuration() {
            log::error!("🔑 Model client unusable: {}", self);
        } else if status.is_server_error() {
            log::error!("❌ Estimation failed: {}", self);
        } else {
            log::warn!("⚠️ Rejected request: {}", self);
        }

        error_response(status, self.to_string())
    }
}

pub fn create_router(service: Arc<EstimationService>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/estimate", post(estimate_text))
        .route("/estimate/image", post(estimate_image))
        .with_state(service)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

async fn estimate_text(
    State(service): State<Arc<EstimationService>>,
    payload: Result<Json<EstimateIn>, JsonRejection>,
) -> Result<Json<EstimationResult>, Response> {
    let Json(data) = payload.map_err(|rejection| {
        log::warn!("⚠️ Rejected /estimate body: {}", rejection.body_text());
        error_response(rejection.status(), rejection.body_text())
    })?;

    log::info!("🔍 POST /estimate dish={:?}", data.dish);
    let result = service
        .estimate_dish(&data.dish)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(result))
}

async fn estimate_image(
    State(service): State<Arc<EstimationService>>,
    mut multipart: Multipart,
) -> Result<Json<EstimationResult>, Response> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error_response(e.status(), e.body_text()))?
    {
        if field.name() == Some("image") {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| error_response(e.status(), e.body_text()))?;
            upload = Some((bytes.to_vec(), content_type));
            break;
        }
    }

    let Some((bytes, content_type)) = upload else {
        return Err(EstimateError::InvalidInput("Missing 'image' form field".to_string()).into_response());
    };

    log::info!(
        "📸 POST /estimate/image {} bytes, declared type {:?}",
        bytes.len(),
        content_type
    );

    let result = service
        .estimate_image(bytes, content_type.as_deref())
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(result))
}

async fn health_check(State(service): State<Arc<EstimationService>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        model: service.model_name().to_string(),
        configured: service.is_configured(),
    })
}

async fn root_handler() -> &'static str {
    "Foodprint Estimator - POST /estimate with {\"dish\": ...} or /estimate/image with an 'image' upload"
}
