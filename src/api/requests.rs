//! Internship request API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    RequestResponse, RequestStatus, ReturnForAcceptanceBody, ReviewRequestBody, UpdateRequestBody,
    VerifyAcceptanceBody,
};
use crate::services::access::require_coordinator;
use crate::services::attachments::{read_multipart_files, single_file};
use crate::services::request_workflow as workflow;
use crate::services::storage::Storage;

/// Get (or lazily create) the caller's request for the active period.
#[utoipa::path(
    get,
    path = "/api/v1/requests/me",
    tag = "Requests",
    responses(
        (status = 200, description = "The caller's request", body = RequestResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
        (status = 404, description = "No active period", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_my_request(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let req = workflow::my_request(&pool, &auth.principal).await?;
    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Save the caller's draft request.
#[utoipa::path(
    put,
    path = "/api/v1/requests/me",
    tag = "Requests",
    request_body = UpdateRequestBody,
    responses(
        (status = 200, description = "Request saved", body = RequestResponse),
        (status = 409, description = "No longer editable", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_my_request(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<UpdateRequestBody>,
) -> AppResult<HttpResponse> {
    let req = workflow::update_my_request(&pool, &auth.principal, body.into_inner()).await?;
    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Submit the caller's request.
#[utoipa::path(
    post,
    path = "/api/v1/requests/me/submit",
    tag = "Requests",
    responses(
        (status = 200, description = "Request submitted", body = RequestResponse),
        (status = 409, description = "Company choice missing or not exclusive", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_my_request(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let req = workflow::submit_my_request(&pool, &auth.principal).await?;
    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Attach a CV or request letter to the caller's draft request.
#[utoipa::path(
    post,
    path = "/api/v1/requests/me/documents/{kind}",
    tag = "Requests",
    responses(
        (status = 200, description = "Document stored", body = RequestResponse),
        (status = 400, description = "Invalid upload", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_request_document(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let kind = path.into_inner();
    let files = read_multipart_files(payload, config.max_attachment_size).await?;
    let file = single_file(files, &kind)?;

    let req = workflow::upload_request_document(
        &pool,
        storage.get_ref(),
        &auth.principal,
        &kind,
        file,
    )
    .await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Upload (or re-upload) the acceptance letter.
#[utoipa::path(
    post,
    path = "/api/v1/requests/me/acceptance-letter",
    tag = "Requests",
    responses(
        (status = 200, description = "Acceptance letter stored", body = RequestResponse),
        (status = 409, description = "Upload not allowed in this status", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_acceptance_letter(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let files = read_multipart_files(payload, config.max_attachment_size).await?;
    let file = single_file(files, "acceptance_letter")?;

    let req =
        workflow::upload_acceptance_letter(&pool, storage.get_ref(), &auth.principal, file).await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Download the caller's recommendation letter.
#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}/recommendation-letter",
    tag = "Requests",
    responses(
        (status = 200, description = "The letter", content_type = "application/octet-stream"),
        (status = 404, description = "No letter issued", body = crate::error::ErrorResponse),
    )
)]
pub async fn download_recommendation_letter(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (data, content_type) = workflow::download_recommendation_letter(
        &pool,
        storage.get_ref(),
        &auth.principal,
        path.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(
            content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        )
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"Recommendation_Letter.pdf\"",
        ))
        .body(data))
}

async fn queue_response(
    pool: &DbPool,
    rows: Vec<(
        crate::entity::internship_request::Model,
        Option<crate::entity::student_profile::Model>,
    )>,
) -> AppResult<Vec<RequestResponse>> {
    let mut responses = Vec::with_capacity(rows.len());
    for (req, _) in rows {
        responses.push(workflow::request_response(pool, req).await?);
    }
    Ok(responses)
}

/// Coordinator queue of submitted and under-review requests.
#[utoipa::path(
    get,
    path = "/api/v1/requests/queue/review",
    tag = "Requests",
    responses(
        (status = 200, description = "Review queue", body = [RequestResponse]),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn review_queue(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let rows = pool
        .list_requests_by_statuses(&[RequestStatus::Submitted, RequestStatus::UnderReview])
        .await?;

    Ok(HttpResponse::Ok().json(queue_response(&pool, rows).await?))
}

/// Coordinator queue of requests awaiting acceptance verification.
#[utoipa::path(
    get,
    path = "/api/v1/requests/queue/acceptance",
    tag = "Requests",
    responses(
        (status = 200, description = "Acceptance queue", body = [RequestResponse]),
    )
)]
pub async fn acceptance_queue(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let rows = pool
        .list_requests_by_statuses(&[RequestStatus::AcceptanceUploaded])
        .await?;

    Ok(HttpResponse::Ok().json(queue_response(&pool, rows).await?))
}

/// Coordinator queue of recommended requests still missing a letter.
#[utoipa::path(
    get,
    path = "/api/v1/requests/queue/waiting",
    tag = "Requests",
    responses(
        (status = 200, description = "Waiting queue", body = [RequestResponse]),
    )
)]
pub async fn waiting_queue(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let rows = pool.list_requests_waiting_for_acceptance().await?;

    Ok(HttpResponse::Ok().json(queue_response(&pool, rows).await?))
}

/// Take a request under review.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/review",
    tag = "Requests",
    responses(
        (status = 200, description = "Request under review", body = RequestResponse),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorResponse),
    )
)]
pub async fn mark_under_review(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let req = workflow::mark_under_review(&pool, &auth.principal, path.into_inner()).await?;
    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Reject a request under review.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/reject",
    tag = "Requests",
    request_body = ReviewRequestBody,
    responses(
        (status = 200, description = "Request rejected", body = RequestResponse),
        (status = 400, description = "Review notes missing", body = crate::error::ErrorResponse),
    )
)]
pub async fn reject_request(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ReviewRequestBody>,
) -> AppResult<HttpResponse> {
    let req = workflow::reject_request(
        &pool,
        &auth.principal,
        path.into_inner(),
        body.into_inner().review_notes,
    )
    .await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Issue a recommendation, optionally attaching the letter.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/recommend",
    tag = "Requests",
    responses(
        (status = 200, description = "Recommendation issued", body = RequestResponse),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorResponse),
    )
)]
pub async fn issue_recommendation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let files = read_multipart_files(payload, config.max_attachment_size).await?;
    let letter = files
        .into_iter()
        .find(|f| f.field_name == "recommendation_letter");

    let req = workflow::issue_recommendation(
        &pool,
        storage.get_ref(),
        &auth.principal,
        path.into_inner(),
        letter,
    )
    .await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Send a request back for its acceptance letter.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/return",
    tag = "Requests",
    request_body = ReturnForAcceptanceBody,
    responses(
        (status = 200, description = "Request returned", body = RequestResponse),
        (status = 409, description = "A letter already exists", body = crate::error::ErrorResponse),
    )
)]
pub async fn return_for_acceptance(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ReturnForAcceptanceBody>,
) -> AppResult<HttpResponse> {
    let req = workflow::return_for_acceptance(
        &pool,
        &auth.principal,
        path.into_inner(),
        body.into_inner().coordinator_comment,
    )
    .await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Verify the acceptance letter and assign a university supervisor.
///
/// Atomic: the request status change and the placement activation commit
/// together or not at all.
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/verify",
    tag = "Requests",
    request_body = VerifyAcceptanceBody,
    responses(
        (status = 200, description = "Acceptance verified, placement active", body = RequestResponse),
        (status = 409, description = "Request is not awaiting verification", body = crate::error::ErrorResponse),
    )
)]
pub async fn verify_acceptance(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<VerifyAcceptanceBody>,
) -> AppResult<HttpResponse> {
    let (req, placement) = workflow::verify_acceptance_and_assign(
        &pool,
        &auth.principal,
        path.into_inner(),
        body.into_inner().university_supervisor_id,
    )
    .await?;

    let response = workflow::request_response(&pool, req).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "request": response,
        "placement_id": placement.id,
    })))
}

/// Configure request routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/requests/me")
            .route(web::get().to(get_my_request))
            .route(web::put().to(update_my_request)),
    )
    .service(web::resource("/requests/me/submit").route(web::post().to(submit_my_request)))
    .service(
        web::resource("/requests/me/documents/{kind}")
            .route(web::post().to(upload_request_document)),
    )
    .service(
        web::resource("/requests/me/acceptance-letter")
            .route(web::post().to(upload_acceptance_letter)),
    )
    .service(
        web::resource("/requests/{request_id}/recommendation-letter")
            .route(web::get().to(download_recommendation_letter)),
    )
    .service(web::resource("/requests/queue/review").route(web::get().to(review_queue)))
    .service(web::resource("/requests/queue/acceptance").route(web::get().to(acceptance_queue)))
    .service(web::resource("/requests/queue/waiting").route(web::get().to(waiting_queue)))
    .service(web::resource("/requests/{request_id}/review").route(web::post().to(mark_under_review)))
    .service(web::resource("/requests/{request_id}/reject").route(web::post().to(reject_request)))
    .service(
        web::resource("/requests/{request_id}/recommend").route(web::post().to(issue_recommendation)),
    )
    .service(
        web::resource("/requests/{request_id}/return").route(web::post().to(return_for_acceptance)),
    )
    .service(web::resource("/requests/{request_id}/verify").route(web::post().to(verify_acceptance)));
}
