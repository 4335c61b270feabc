//! Job listing endpoints

use crate::core::jobs::JobId;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::BulkError;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(list_jobs))
            .route(
                "/{connection}/{profile}/{job_type}",
                web::get().to(get_job),
            ),
    );
}

/// Snapshot of every registered job
pub async fn list_jobs(state: web::Data<AppState>) -> HttpResponse {
    let mut jobs = state.orchestrator.jobs();
    jobs.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
    HttpResponse::Ok().json(ApiResponse::success(jobs))
}

pub async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, BulkError> {
    let (connection, profile, job_type) = path.into_inner();
    let id = JobId::new(connection, profile, job_type);
    let job = state
        .orchestrator
        .registry()
        .get(&id)
        .ok_or_else(|| BulkError::not_found(format!("No active job {}", id)))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(job.snapshot())))
}
