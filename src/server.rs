use crate::app::DirectoryService;
use crate::config::ServerConfig;
use crate::error::DirectoryError;
use crate::metrics;
use crate::search::SearchFilters;
use axum::{
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

type Service = Extension<Arc<DirectoryService>>;

/// Failure envelope. Only raised when there is no data to serve at all, or
/// for an unknown id.
struct ApiError {
    context: &'static str,
    error: DirectoryError,
}

impl ApiError {
    fn with_context(context: &'static str) -> impl FnOnce(DirectoryError) -> ApiError {
        move |error| ApiError { context, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            DirectoryError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": "Benefit not found" })),
            )
                .into_response(),
            DirectoryError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "Query is required" })),
            )
                .into_response(),
            e => {
                error!(error = %e, "{}", self.context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": self.context,
                        "message": e.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

async fn health(Extension(svc): Service) -> impl IntoResponse {
    Json(svc.health().await)
}

async fn benefits(Extension(svc): Service) -> Result<impl IntoResponse, ApiError> {
    let records = svc
        .get_records()
        .await
        .map_err(ApiError::with_context("Failed to fetch benefits data"))?;
    Ok(Json(json!({
        "success": true,
        "data": records.as_ref(),
        "count": records.len(),
    })))
}

async fn enhanced(Extension(svc): Service) -> Result<impl IntoResponse, ApiError> {
    let data = svc
        .enhanced()
        .await
        .map_err(ApiError::with_context("Failed to fetch enhanced benefits data"))?;
    Ok(Json(json!({
        "success": true,
        "count": data.len(),
        "data": data,
    })))
}

async fn search(
    Extension(svc): Service,
    Query(filters): Query<SearchFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let data = svc
        .search(&filters)
        .await
        .map_err(ApiError::with_context("Failed to search benefits"))?;
    Ok(Json(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "filters": {
            "searchQuery": filters.query(),
            "category": filters.category(),
            "audience": filters.audience(),
        },
    })))
}

async fn benefit_by_id(
    Extension(svc): Service,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let benefit = svc
        .find_by_id(&id)
        .await
        .map_err(ApiError::with_context("Failed to fetch benefit details"))?;
    Ok(Json(json!({ "success": true, "benefit": benefit })))
}

async fn categories(Extension(svc): Service) -> Result<impl IntoResponse, ApiError> {
    let entries = svc
        .categories()
        .await
        .map_err(ApiError::with_context("Failed to fetch categories"))?;
    Ok(Json(json!({ "success": true, "total": entries.len(), "categories": entries })))
}

async fn audiences(Extension(svc): Service) -> Result<impl IntoResponse, ApiError> {
    let entries = svc
        .audiences()
        .await
        .map_err(ApiError::with_context("Failed to fetch audiences"))?;
    Ok(Json(json!({ "success": true, "total": entries.len(), "audiences": entries })))
}

async fn organizations(Extension(svc): Service) -> Result<impl IntoResponse, ApiError> {
    let entries = svc
        .organizations()
        .await
        .map_err(ApiError::with_context("Failed to fetch organizations"))?;
    Ok(Json(json!({ "success": true, "total": entries.len(), "organizations": entries })))
}

#[derive(Debug, Deserialize)]
struct SuggestRequest {
    #[serde(default)]
    query: String,
}

async fn suggest(
    Extension(svc): Service,
    Json(request): Json<SuggestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let suggestion = svc
        .suggest(&request.query)
        .await
        .map_err(ApiError::with_context("Failed to generate suggestions"))?;
    Ok(Json(json!({
        "success": true,
        "query": suggestion.query,
        "keywords": suggestion.keywords,
        "suggestions": suggestion.suggestions,
        "explanation": suggestion.explanation,
        "total_found": suggestion.total_found,
    })))
}

async fn metrics_text() -> Response {
    match metrics::render() {
        Some(body) => body.into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Build the JSON API
pub fn create_router(svc: Arc<DirectoryService>, static_dir: Option<&std::path::Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/health", get(health))
        .route("/api/benefits", get(benefits))
        .route("/api/benefits/enhanced", get(enhanced))
        .route("/api/benefits/search", get(search))
        .route("/api/search", get(search))
        .route("/api/benefits/:id", get(benefit_by_id))
        .route("/api/categories", get(categories))
        .route("/api/audiences", get(audiences))
        .route("/api/organizations", get(organizations))
        .route("/api/ai/suggest", post(suggest))
        .route("/metrics", get(metrics_text))
        .layer(Extension(svc));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(ServiceBuilder::new().layer(cors))
}

/// Serve the API until the process stops
pub async fn start_server(
    svc: Arc<DirectoryService>,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| DirectoryError::Config(format!("invalid listen address: {}", e)))?;

    let app = create_router(svc, config.static_dir.as_deref());

    info!(%addr, "benefits directory API listening");
    println!("🚀 HTTP server running on http://{addr}");
    println!("💚 Health check: http://{addr}/api/health");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
