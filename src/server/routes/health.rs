//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health status information
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub git_hash: Cow<'static, str>,
    pub active_jobs: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Liveness plus the number of registered jobs
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        git_hash: Cow::Borrowed(crate::GIT_HASH),
        active_jobs: state.orchestrator.registry().len(),
        timestamp: chrono::Utc::now(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}
