//! Results report API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ResultRow, ResultsReportListResponse, ResultsReportResponse};
use crate::services::results;

/// Live score rows for the calling supervisor.
#[utoipa::path(
    get,
    path = "/api/v1/results/preview",
    tag = "Results",
    responses(
        (status = 200, description = "Live score rows", body = [ResultRow]),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn preview(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let rows = results::build_rows(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Submit the caller's results report.
#[utoipa::path(
    post,
    path = "/api/v1/results/submit",
    tag = "Results",
    responses(
        (status = 200, description = "Report submitted", body = ResultsReportResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let model = results::submit_report(&pool, &auth.principal).await?;
    let response = results::report_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// The caller's latest report.
#[utoipa::path(
    get,
    path = "/api/v1/results/latest",
    tag = "Results",
    responses(
        (status = 200, description = "Latest report", body = ResultsReportResponse),
        (status = 404, description = "No report yet", body = crate::error::ErrorResponse),
    )
)]
pub async fn latest(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    match results::latest_report(&pool, &auth.principal).await? {
        Some(model) => {
            let response = results::report_response(&pool, model).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        None => Err(crate::error::AppError::NotFound(
            "Results report".to_string(),
        )),
    }
}

/// Export the caller's live rows as a text document.
#[utoipa::path(
    get,
    path = "/api/v1/results/export",
    tag = "Results",
    responses(
        (status = 200, description = "Rendered document", content_type = "text/plain"),
    )
)]
pub async fn export_live(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let document = results::export_live_document(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"results_report.txt\"",
        ))
        .body(document))
}

/// Coordinator list of submitted and received reports.
#[utoipa::path(
    get,
    path = "/api/v1/results/reports",
    tag = "Results",
    responses(
        (status = 200, description = "Reports", body = ResultsReportListResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_reports(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let response = results::coordinator_list(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// One submitted or received report.
#[utoipa::path(
    get,
    path = "/api/v1/results/reports/{report_id}",
    tag = "Results",
    responses(
        (status = 200, description = "The report", body = ResultsReportResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn report_detail(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = results::coordinator_detail(&pool, &auth.principal, path.into_inner()).await?;
    let response = results::report_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Acknowledge a submitted report.
#[utoipa::path(
    post,
    path = "/api/v1/results/reports/{report_id}/receive",
    tag = "Results",
    responses(
        (status = 200, description = "Report received", body = ResultsReportResponse),
        (status = 409, description = "Not in submitted status", body = crate::error::ErrorResponse),
    )
)]
pub async fn receive_report(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = results::mark_received(&pool, &auth.principal, path.into_inner()).await?;
    let response = results::report_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Export a stored report's snapshot as a text document.
#[utoipa::path(
    get,
    path = "/api/v1/results/reports/{report_id}/export",
    tag = "Results",
    responses(
        (status = 200, description = "Rendered document", content_type = "text/plain"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn export_report(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let document = results::export_report_document(&pool, &auth.principal, report_id).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"submitted_report_{}.txt\"", report_id),
        ))
        .body(document))
}

/// Configure results routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/results/preview").route(web::get().to(preview)))
        .service(web::resource("/results/submit").route(web::post().to(submit)))
        .service(web::resource("/results/latest").route(web::get().to(latest)))
        .service(web::resource("/results/export").route(web::get().to(export_live)))
        .service(web::resource("/results/reports").route(web::get().to(list_reports)))
        .service(web::resource("/results/reports/{report_id}").route(web::get().to(report_detail)))
        .service(
            web::resource("/results/reports/{report_id}/receive")
                .route(web::post().to(receive_report)),
        )
        .service(
            web::resource("/results/reports/{report_id}/export")
                .route(web::get().to(export_report)),
        );
}
