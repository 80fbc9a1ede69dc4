use crate::catalog::Capability;
use crate::core::error::ForgeError;
use crate::service::{GenerationRequest, GenerationService};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    status: &'static str,
    healthy: bool,
    available_models: Vec<ModelSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelSummary {
    id: String,
    name: String,
    description: String,
    is_active: bool,
    capabilities: Vec<Capability>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

struct ApiError(ForgeError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ForgeError::Input(_) => StatusCode::BAD_REQUEST,
            ForgeError::ModelNotFound(_) | ForgeError::PersonalityNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let details = match &self.0 {
            ForgeError::Network(detail) | ForgeError::Serialization(detail) => {
                Some(detail.clone())
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the service router. One route, two methods: `GET` reports status and
/// the model catalog, `POST` runs a generation.
pub fn router(service: Arc<GenerationService>) -> Router {
    let status_service = service.clone();
    Router::new().route(
        "/api/ai-generate",
        get(move || {
            let this = status_service.clone();
            async move { status(this).await }
        })
        .post(move |Json(request): Json<GenerationRequest>| {
            let this = service.clone();
            async move { generate(this, request).await }
        }),
    )
}

async fn status(service: Arc<GenerationService>) -> Json<StatusBody> {
    let healthy = service.health_check().await;
    let available_models = service
        .catalog()
        .models()
        .iter()
        .map(|m| ModelSummary {
            id: m.id.clone(),
            name: m.name.clone(),
            description: m.description.clone(),
            is_active: m.is_active,
            capabilities: m.capabilities.clone(),
        })
        .collect();

    Json(StatusBody {
        status: "operational",
        healthy,
        available_models,
    })
}

async fn generate(
    service: Arc<GenerationService>,
    request: GenerationRequest,
) -> Result<Json<crate::service::GenerationResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError(ForgeError::Input(
            "Prompt is required and must be a non-empty string".to_string(),
        )));
    }

    match service.generate_content(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "generation failed");
            Err(ApiError(e))
        }
    }
}
