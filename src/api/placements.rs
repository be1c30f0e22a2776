//! Placement API handlers: lifecycle, supervisor views, site visits.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AssignSupervisorsBody, PlacementResponse, SupervisorStudentRow, UpdatePlacementStatusBody,
};
use crate::services::attachments::read_multipart_files;
use crate::services::placement as placements;
use crate::services::storage::Storage;

/// Site visit creation fields (multipart text parts are not used; the
/// visit body travels as JSON and the attachment separately).
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordSiteVisitBody {
    pub visit_date: NaiveDate,
    pub findings: String,
    #[serde(default)]
    pub recommendations: Option<String>,
}

/// Site visit response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteVisitResponse {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub supervisor_id: Uuid,
    pub visit_date: NaiveDate,
    pub findings: String,
    pub recommendations: Option<String>,
    pub attachment_key: Option<String>,
}

fn visit_response(visit: crate::entity::site_visit::Model) -> SiteVisitResponse {
    SiteVisitResponse {
        id: visit.id,
        placement_id: visit.placement_id,
        supervisor_id: visit.supervisor_id,
        visit_date: visit.visit_date,
        findings: visit.findings,
        recommendations: visit.recommendations,
        attachment_key: visit.attachment_key,
    }
}

/// The caller's placement (active, else most recent).
#[utoipa::path(
    get,
    path = "/api/v1/placements/me",
    tag = "Placements",
    responses(
        (status = 200, description = "The caller's placement", body = PlacementResponse),
        (status = 404, description = "No placement", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_my_placement(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let placement = placements::my_placement(&pool, &auth.principal).await?;
    let display = pool.get_placement_display(placement).await?;
    Ok(HttpResponse::Ok().json(placements::placement_response(display)?))
}

/// University supervisor's students with both scores joined.
#[utoipa::path(
    get,
    path = "/api/v1/placements/supervisor",
    tag = "Placements",
    responses(
        (status = 200, description = "Assigned students", body = [SupervisorStudentRow]),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn supervisor_students(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let rows = placements::university_supervisor_students(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Industry supervisor's students with the industry score joined.
#[utoipa::path(
    get,
    path = "/api/v1/placements/company",
    tag = "Placements",
    responses(
        (status = 200, description = "Hosted students", body = [SupervisorStudentRow]),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn company_students(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let rows = placements::industry_supervisor_students(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Move a placement through its lifecycle (coordinator).
#[utoipa::path(
    post,
    path = "/api/v1/placements/{placement_id}/status",
    tag = "Placements",
    request_body = UpdatePlacementStatusBody,
    responses(
        (status = 200, description = "Placement updated", body = PlacementResponse),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_status(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePlacementStatusBody>,
) -> AppResult<HttpResponse> {
    let placement =
        placements::update_status(&pool, &auth.principal, path.into_inner(), body.status).await?;
    let display = pool.get_placement_display(placement).await?;
    Ok(HttpResponse::Ok().json(placements::placement_response(display)?))
}

/// Assign or replace placement supervisors (coordinator).
#[utoipa::path(
    post,
    path = "/api/v1/placements/{placement_id}/supervisors",
    tag = "Placements",
    request_body = AssignSupervisorsBody,
    responses(
        (status = 200, description = "Supervisors assigned", body = PlacementResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn assign_supervisors(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AssignSupervisorsBody>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let placement = placements::assign_supervisors(
        &pool,
        &auth.principal,
        path.into_inner(),
        body.industry_supervisor_id,
        body.university_supervisor_id,
    )
    .await?;

    let display = pool.get_placement_display(placement).await?;
    Ok(HttpResponse::Ok().json(placements::placement_response(display)?))
}

/// Record a site visit (university supervisor, own assigned placement).
///
/// Multipart: a JSON part named `visit` plus an optional `attachment` file.
#[utoipa::path(
    post,
    path = "/api/v1/placements/{placement_id}/site-visits",
    tag = "Placements",
    responses(
        (status = 201, description = "Visit recorded", body = SiteVisitResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn record_site_visit(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut files = read_multipart_files(payload, config.max_attachment_size).await?;

    let visit_idx = files.iter().position(|f| f.field_name == "visit");
    let visit_part = visit_idx
        .map(|idx| files.remove(idx))
        .ok_or_else(|| AppError::InvalidInput("visit: visit details are required".to_string()))?;

    let body: RecordSiteVisitBody = serde_json::from_slice(&visit_part.data)?;

    let attachment = files.into_iter().find(|f| f.field_name == "attachment");

    let visit = placements::record_site_visit(
        &pool,
        storage.get_ref(),
        &auth.principal,
        path.into_inner(),
        body.visit_date,
        body.findings,
        body.recommendations,
        attachment,
    )
    .await?;

    Ok(HttpResponse::Created().json(visit_response(visit)))
}

/// Visits recorded for a placement.
#[utoipa::path(
    get,
    path = "/api/v1/placements/{placement_id}/site-visits",
    tag = "Placements",
    responses(
        (status = 200, description = "Site visits", body = [SiteVisitResponse]),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_site_visits(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let visits = placements::list_site_visits(&pool, &auth.principal, path.into_inner()).await?;
    let responses: Vec<SiteVisitResponse> = visits.into_iter().map(visit_response).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// Configure placement routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/placements/me").route(web::get().to(get_my_placement)))
        .service(web::resource("/placements/supervisor").route(web::get().to(supervisor_students)))
        .service(web::resource("/placements/company").route(web::get().to(company_students)))
        .service(
            web::resource("/placements/{placement_id}/status").route(web::post().to(update_status)),
        )
        .service(
            web::resource("/placements/{placement_id}/supervisors")
                .route(web::post().to(assign_supervisors)),
        )
        .service(
            web::resource("/placements/{placement_id}/site-visits")
                .route(web::get().to(list_site_visits))
                .route(web::post().to(record_site_visit)),
        );
}
