//! Weekly log API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CompanyLogActionBody, MissingLogsResponse, UpdateWeeklyLogBody, WeeklyLogResponse,
};
use crate::services::attachments::{read_multipart_files, single_file};
use crate::services::storage::Storage;
use crate::services::weekly_log as logs;

async fn log_list_response(
    pool: &DbPool,
    models: Vec<crate::entity::weekly_log::Model>,
) -> AppResult<Vec<WeeklyLogResponse>> {
    let mut responses = Vec::with_capacity(models.len());
    for model in models {
        responses.push(logs::log_response(pool, model).await?);
    }
    Ok(responses)
}

/// List the caller's weekly logs.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/me",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "The caller's logs", body = [WeeklyLogResponse]),
        (status = 404, description = "No active placement", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_my_logs(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let models = logs::list_my_logs(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(log_list_response(&pool, models).await?))
}

/// Create the next weekly log with pre-seeded weekday entries.
#[utoipa::path(
    post,
    path = "/api/v1/weekly-logs",
    tag = "Weekly logs",
    responses(
        (status = 201, description = "Log created", body = WeeklyLogResponse),
        (status = 404, description = "No active placement", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_log(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let model = logs::create_log(&pool, &auth.principal).await?;
    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Fetch one of the caller's logs.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/{log_id}",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "The log", body = WeeklyLogResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_log(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = logs::get_my_log(&pool, &auth.principal, path.into_inner()).await?;
    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Save a log's fields and per-day entries.
#[utoipa::path(
    put,
    path = "/api/v1/weekly-logs/{log_id}",
    tag = "Weekly logs",
    request_body = UpdateWeeklyLogBody,
    responses(
        (status = 200, description = "Log saved", body = WeeklyLogResponse),
        (status = 409, description = "Log is approved and read-only", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_log(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateWeeklyLogBody>,
) -> AppResult<HttpResponse> {
    let model = logs::update_log(&pool, &auth.principal, path.into_inner(), body.into_inner()).await?;
    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Submit a log for company review.
#[utoipa::path(
    post,
    path = "/api/v1/weekly-logs/{log_id}/submit",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Log submitted", body = WeeklyLogResponse),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_log(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = logs::submit_log(&pool, &auth.principal, path.into_inner()).await?;
    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Attach a file to a log.
#[utoipa::path(
    post,
    path = "/api/v1/weekly-logs/{log_id}/attachment",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Attachment stored", body = WeeklyLogResponse),
        (status = 400, description = "Invalid upload", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_log_attachment(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let files = read_multipart_files(payload, config.max_attachment_size).await?;
    let file = single_file(files, "attachment")?;

    let model = logs::upload_log_attachment(
        &pool,
        storage.get_ref(),
        &auth.principal,
        path.into_inner(),
        file,
    )
    .await?;

    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Delete a draft log.
#[utoipa::path(
    delete,
    path = "/api/v1/weekly-logs/{log_id}",
    tag = "Weekly logs",
    responses(
        (status = 204, description = "Log deleted"),
        (status = 409, description = "Only drafts can be deleted", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_log(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    logs::delete_log(&pool, storage.get_ref(), &auth.principal, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Company approves or returns a submitted log.
#[utoipa::path(
    post,
    path = "/api/v1/weekly-logs/{log_id}/company-action",
    tag = "Weekly logs",
    request_body = CompanyLogActionBody,
    responses(
        (status = 200, description = "Action applied", body = WeeklyLogResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn company_action(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CompanyLogActionBody>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let model = logs::company_action(
        &pool,
        &auth.principal,
        path.into_inner(),
        body.action,
        body.reason,
    )
    .await?;

    let response = logs::log_response(&pool, model).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Logs awaiting this company's review.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/company/pending",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Pending logs", body = [WeeklyLogResponse]),
    )
)]
pub async fn company_pending(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let models = logs::company_pending_logs(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(log_list_response(&pool, models).await?))
}

/// Logs this company has approved.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/company/approved",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Approved logs", body = [WeeklyLogResponse]),
    )
)]
pub async fn company_approved(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let models = logs::company_approved_logs(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(log_list_response(&pool, models).await?))
}

/// Company-approved logs across the supervisor's active placements.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/supervisor/approved",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Approved logs", body = [WeeklyLogResponse]),
    )
)]
pub async fn supervisor_approved(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let models = logs::supervisor_approved_logs(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(log_list_response(&pool, models).await?))
}

/// Coordinator view of placements missing this week's log.
#[utoipa::path(
    get,
    path = "/api/v1/weekly-logs/missing",
    tag = "Weekly logs",
    responses(
        (status = 200, description = "Missing log report", body = MissingLogsResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn missing_logs(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let response = logs::coordinator_missing_logs(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configure weekly log routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/weekly-logs").route(web::post().to(create_log)))
        .service(web::resource("/weekly-logs/me").route(web::get().to(list_my_logs)))
        .service(web::resource("/weekly-logs/missing").route(web::get().to(missing_logs)))
        .service(web::resource("/weekly-logs/company/pending").route(web::get().to(company_pending)))
        .service(
            web::resource("/weekly-logs/company/approved").route(web::get().to(company_approved)),
        )
        .service(
            web::resource("/weekly-logs/supervisor/approved")
                .route(web::get().to(supervisor_approved)),
        )
        .service(
            web::resource("/weekly-logs/{log_id}")
                .route(web::get().to(get_log))
                .route(web::put().to(update_log))
                .route(web::delete().to(delete_log)),
        )
        .service(web::resource("/weekly-logs/{log_id}/submit").route(web::post().to(submit_log)))
        .service(
            web::resource("/weekly-logs/{log_id}/attachment")
                .route(web::post().to(upload_log_attachment)),
        )
        .service(
            web::resource("/weekly-logs/{log_id}/company-action")
                .route(web::post().to(company_action)),
        );
}
