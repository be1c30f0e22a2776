//! Company directory API handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CompanyResponse, CompanyStatus, CreateCompanyRequest, UpdateCompanyStatusRequest,
};
use crate::services::access::require_coordinator;

/// Query parameters for listing companies.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListCompaniesQuery {
    #[serde(default)]
    pub status: Option<CompanyStatus>,
}

fn company_response(company: crate::entity::company::Model) -> AppResult<CompanyResponse> {
    let status = CompanyStatus::parse(&company.status)
        .ok_or_else(|| AppError::Database(format!("Invalid company status: {}", company.status)))?;

    Ok(CompanyResponse {
        id: company.id,
        name: company.name,
        industry: company.industry,
        district: company.district,
        address: company.address,
        status,
        created_at: company.created_at,
    })
}

/// List companies.
///
/// Non-coordinators see approved companies only, regardless of filter.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Companies",
    responses(
        (status = 200, description = "Companies", body = [CompanyResponse]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_companies(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListCompaniesQuery>,
) -> AppResult<HttpResponse> {
    let status = if auth.principal.is_coordinator() {
        query.status
    } else {
        Some(CompanyStatus::Approved)
    };

    let companies = pool.list_companies(status).await?;
    let responses: Vec<CompanyResponse> = companies
        .into_iter()
        .map(company_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

/// Register a company (coordinator).
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_company(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateCompanyRequest>,
) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let req = body.into_inner();
    if req.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "name: company name is required".to_string(),
        ));
    }

    if pool.get_company_by_name(&req.name).await?.is_some() {
        return Err(AppError::Precondition(format!(
            "Company \"{}\" is already registered",
            req.name.trim()
        )));
    }

    let company = pool
        .insert_company(
            &req.name,
            req.industry,
            req.district,
            req.address,
            CompanyStatus::PendingVerification,
        )
        .await?;

    Ok(HttpResponse::Created().json(company_response(company)?))
}

/// Change a company's vetting status (coordinator).
#[utoipa::path(
    post,
    path = "/api/v1/companies/{company_id}/status",
    tag = "Companies",
    request_body = UpdateCompanyStatusRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_company_status(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCompanyStatusRequest>,
) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let company = pool
        .update_company_status(path.into_inner(), body.status)
        .await?;

    Ok(HttpResponse::Ok().json(company_response(company)?))
}

/// Configure company routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/companies")
            .route(web::get().to(list_companies))
            .route(web::post().to(create_company)),
    )
    .service(
        web::resource("/companies/{company_id}/status").route(web::post().to(update_company_status)),
    );
}
