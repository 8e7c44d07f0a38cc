use crate::core::{MatchError, Matcher, ScoreMapError};
use crate::models::{ErrorResponse, HealthResponse, InitMatchRequest, MatchIdentity};
use crate::services::{CatalogClient, ClassifierClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ClassifierClient>,
    pub catalog: Arc<CatalogClient>,
    pub matcher: Matcher,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match/init", web::post().to(init_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.catalog.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Start the matching pipeline for an authenticated caller
///
/// POST /api/v1/match/init
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "company": "string",
///   "problem": "string"
/// }
/// ```
///
/// Response: JSON array of `{"area": {"name", "rating", "contacts": [...]}}`
/// in ranking order. An empty array is a valid result.
async fn init_match(
    state: web::Data<AppState>,
    req: web::Json<InitMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for init_match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let identity = MatchIdentity {
        username: req.username.clone(),
        company: req.company.clone(),
        problem: req.problem.clone(),
    };

    tracing::info!("Running match pipeline for user: {}", identity.username);

    // Catalog snapshot for this request; the vocabulary is never cached
    let catalog = match state.catalog.list_areas().await {
        Ok(areas) => areas,
        Err(e) => {
            tracing::error!("Failed to load area catalog: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "catalog_unavailable".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let result = state
        .matcher
        .run_match(
            &identity,
            &catalog,
            state.classifier.as_ref(),
            state.catalog.as_ref(),
        )
        .await;

    match result {
        Ok(matches) => {
            tracing::info!(
                "Returning {} matched areas for user {} (catalog: {} areas)",
                matches.len(),
                identity.username,
                catalog.len()
            );
            HttpResponse::Ok().json(matches)
        }
        Err(err) => match_error_response(err),
    }
}

/// Map terminal pipeline errors to distinct HTTP responses.
///
/// Unreachable service maps to 503 (infrastructure incident); unusable
/// responses map to 502 with per-condition error codes (prompt/model drift).
/// Parse and shape errors log the normalized classifier text for diagnosis.
fn match_error_response(err: MatchError) -> HttpResponse {
    match err {
        MatchError::ClassifierUnavailable(message) => {
            tracing::error!("Classifier unavailable: {}", message);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "classifier_unavailable".to_string(),
                message,
                status_code: 503,
            })
        }
        MatchError::ClassifierEmptyResponse => {
            tracing::error!("Classifier returned an empty completion");
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "classifier_empty_response".to_string(),
                message: "classifier returned an empty completion".to_string(),
                status_code: 502,
            })
        }
        MatchError::ScoreMap(inner @ ScoreMapError::Parse { .. }) => {
            tracing::error!("Score map rejected: {}", inner);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "score_map_parse_error".to_string(),
                message: inner.to_string(),
                status_code: 502,
            })
        }
        MatchError::ScoreMap(inner @ ScoreMapError::Shape { .. }) => {
            tracing::error!("Score map rejected: {}", inner);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "score_map_shape_error".to_string(),
                message: inner.to_string(),
                status_code: 502,
            })
        }
        MatchError::Directory(inner) => {
            tracing::error!("Directory lookup failed: {}", inner);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "directory_error".to_string(),
                message: inner.to_string(),
                status_code: 500,
            })
        }
    }
}
