//! Evaluation API handlers: industry, academic, student self-evaluation.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AcademicEvaluationBody, EvaluationResponse, IndustryEvaluationBody, StudentEvaluationBody,
    StudentEvaluationResponse,
};
use crate::services::access::{require_coordinator, require_university_supervisor};
use crate::services::evaluation as evals;

// ----------------------------------------------------------------------
// Industry
// ----------------------------------------------------------------------

/// Get (or lazily create) the industry evaluation for a placement.
#[utoipa::path(
    get,
    path = "/api/v1/placements/{placement_id}/industry-evaluation",
    tag = "Evaluations",
    responses(
        (status = 200, description = "The evaluation", body = EvaluationResponse),
        (status = 409, description = "Entry window not open", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_industry_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = evals::industry_get_or_create(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.industry_eval_window_days,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::industry_response(model)?))
}

/// Save the industry evaluation as a draft.
#[utoipa::path(
    put,
    path = "/api/v1/placements/{placement_id}/industry-evaluation",
    tag = "Evaluations",
    request_body = IndustryEvaluationBody,
    responses(
        (status = 200, description = "Draft saved", body = EvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn save_industry_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    body: web::Json<IndustryEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::industry_save(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.industry_eval_window_days,
        body.into_inner(),
        false,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::industry_response(model)?))
}

/// Submit the industry evaluation.
#[utoipa::path(
    post,
    path = "/api/v1/placements/{placement_id}/industry-evaluation/submit",
    tag = "Evaluations",
    request_body = IndustryEvaluationBody,
    responses(
        (status = 200, description = "Evaluation submitted", body = EvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_industry_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    body: web::Json<IndustryEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::industry_save(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.industry_eval_window_days,
        body.into_inner(),
        true,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::industry_response(model)?))
}

/// Submitted industry evaluations for the caller's company.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/industry/company",
    tag = "Evaluations",
    responses(
        (status = 200, description = "Submitted evaluations", body = [EvaluationResponse]),
    )
)]
pub async fn company_submitted_industry(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let profile =
        crate::services::access::require_industry_supervisor(&pool, &auth.principal).await?;

    let models = pool
        .list_submitted_industry_evaluations_for_company(profile.company_id)
        .await?;

    let responses: Vec<EvaluationResponse> = models
        .into_iter()
        .map(evals::industry_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

/// Submitted industry evaluations across the caller's assigned placements.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/industry/supervisor",
    tag = "Evaluations",
    responses(
        (status = 200, description = "Submitted evaluations", body = [EvaluationResponse]),
    )
)]
pub async fn supervisor_submitted_industry(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let staff = require_university_supervisor(&pool, &auth.principal).await?;

    let models = pool
        .list_submitted_industry_evaluations_for_supervisor(staff.id)
        .await?;

    let responses: Vec<EvaluationResponse> = models
        .into_iter()
        .map(evals::industry_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

// ----------------------------------------------------------------------
// Academic
// ----------------------------------------------------------------------

/// Get (or lazily create) the academic evaluation for a placement.
#[utoipa::path(
    get,
    path = "/api/v1/placements/{placement_id}/academic-evaluation",
    tag = "Evaluations",
    responses(
        (status = 200, description = "The evaluation", body = EvaluationResponse),
        (status = 409, description = "Entry window not open", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_academic_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let model = evals::academic_get_or_create(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.academic_eval_window_days,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::academic_response(model)?))
}

/// Save the academic evaluation as a draft.
#[utoipa::path(
    put,
    path = "/api/v1/placements/{placement_id}/academic-evaluation",
    tag = "Evaluations",
    request_body = AcademicEvaluationBody,
    responses(
        (status = 200, description = "Draft saved", body = EvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn save_academic_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    body: web::Json<AcademicEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::academic_save(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.academic_eval_window_days,
        body.into_inner(),
        false,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::academic_response(model)?))
}

/// Submit the academic evaluation.
#[utoipa::path(
    post,
    path = "/api/v1/placements/{placement_id}/academic-evaluation/submit",
    tag = "Evaluations",
    request_body = AcademicEvaluationBody,
    responses(
        (status = 200, description = "Evaluation submitted", body = EvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_academic_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
    body: web::Json<AcademicEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::academic_save(
        &pool,
        &auth.principal,
        path.into_inner(),
        config.academic_eval_window_days,
        body.into_inner(),
        true,
    )
    .await?;

    Ok(HttpResponse::Ok().json(evals::academic_response(model)?))
}

/// The caller's submitted academic evaluations.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/academic/supervisor",
    tag = "Evaluations",
    responses(
        (status = 200, description = "Submitted evaluations", body = [EvaluationResponse]),
    )
)]
pub async fn supervisor_submitted_academic(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let staff = require_university_supervisor(&pool, &auth.principal).await?;

    let models = pool
        .list_submitted_academic_evaluations_for_supervisor(staff.id, auth.principal.user_id)
        .await?;

    let responses: Vec<EvaluationResponse> = models
        .into_iter()
        .map(evals::academic_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

// ----------------------------------------------------------------------
// Student self-evaluation
// ----------------------------------------------------------------------

/// Get (or lazily create) the caller's self-evaluation.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/self",
    tag = "Evaluations",
    responses(
        (status = 200, description = "The evaluation", body = StudentEvaluationResponse),
        (status = 404, description = "No placement", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_self_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let model = evals::student_get_or_create(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(evals::student_response(model)?))
}

/// Save the caller's self-evaluation as a draft.
#[utoipa::path(
    put,
    path = "/api/v1/evaluations/self",
    tag = "Evaluations",
    request_body = StudentEvaluationBody,
    responses(
        (status = 200, description = "Draft saved", body = StudentEvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn save_self_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<StudentEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::student_save(&pool, &auth.principal, body.into_inner(), false).await?;
    Ok(HttpResponse::Ok().json(evals::student_response(model)?))
}

/// Submit the caller's self-evaluation.
#[utoipa::path(
    post,
    path = "/api/v1/evaluations/self/submit",
    tag = "Evaluations",
    request_body = StudentEvaluationBody,
    responses(
        (status = 200, description = "Evaluation submitted", body = StudentEvaluationResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_self_evaluation(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<StudentEvaluationBody>,
) -> AppResult<HttpResponse> {
    let model = evals::student_save(&pool, &auth.principal, body.into_inner(), true).await?;
    Ok(HttpResponse::Ok().json(evals::student_response(model)?))
}

/// Submitted self-evaluations across the caller's assigned placements.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/students/supervisor",
    tag = "Evaluations",
    responses(
        (status = 200, description = "Submitted self-evaluations", body = [StudentEvaluationResponse]),
    )
)]
pub async fn supervisor_student_evaluations(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let staff = require_university_supervisor(&pool, &auth.principal).await?;

    let models = pool
        .list_submitted_student_evaluations_for_supervisor(staff.id)
        .await?;

    let responses: Vec<StudentEvaluationResponse> = models
        .into_iter()
        .map(evals::student_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

/// All submitted self-evaluations (coordinator).
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/students/coordinator",
    tag = "Evaluations",
    responses(
        (status = 200, description = "Submitted self-evaluations", body = [StudentEvaluationResponse]),
    )
)]
pub async fn coordinator_student_evaluations(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_coordinator(&auth.principal)?;

    let models = pool.list_submitted_student_evaluations().await?;

    let responses: Vec<StudentEvaluationResponse> = models
        .into_iter()
        .map(evals::student_response)
        .collect::<AppResult<_>>()?;

    Ok(HttpResponse::Ok().json(responses))
}

/// One submitted self-evaluation, for its supervisor or a coordinator.
#[utoipa::path(
    get,
    path = "/api/v1/evaluations/students/{evaluation_id}",
    tag = "Evaluations",
    responses(
        (status = 200, description = "The evaluation", body = StudentEvaluationResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn student_evaluation_detail(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let evaluation_id = path.into_inner();

    let model = pool
        .get_student_evaluation_by_id(evaluation_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student evaluation {}", evaluation_id)))?;

    if evals::parse_status(&model.status)? != crate::models::EvaluationStatus::Submitted {
        return Err(AppError::NotFound(format!(
            "Student evaluation {}",
            evaluation_id
        )));
    }

    if !auth.principal.is_coordinator() {
        let staff = require_university_supervisor(&pool, &auth.principal).await?;
        let placement = pool
            .get_placement_by_id(model.placement_id)
            .await?
            .filter(|p| p.university_supervisor_id == Some(staff.id));
        if placement.is_none() {
            return Err(AppError::NotFound(format!(
                "Student evaluation {}",
                evaluation_id
            )));
        }
    }

    Ok(HttpResponse::Ok().json(evals::student_response(model)?))
}

/// Configure evaluation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/placements/{placement_id}/industry-evaluation")
            .route(web::get().to(get_industry_evaluation))
            .route(web::put().to(save_industry_evaluation)),
    )
    .service(
        web::resource("/placements/{placement_id}/industry-evaluation/submit")
            .route(web::post().to(submit_industry_evaluation)),
    )
    .service(
        web::resource("/placements/{placement_id}/academic-evaluation")
            .route(web::get().to(get_academic_evaluation))
            .route(web::put().to(save_academic_evaluation)),
    )
    .service(
        web::resource("/placements/{placement_id}/academic-evaluation/submit")
            .route(web::post().to(submit_academic_evaluation)),
    )
    .service(
        web::resource("/evaluations/self")
            .route(web::get().to(get_self_evaluation))
            .route(web::put().to(save_self_evaluation)),
    )
    .service(web::resource("/evaluations/self/submit").route(web::post().to(submit_self_evaluation)))
    .service(
        web::resource("/evaluations/industry/company")
            .route(web::get().to(company_submitted_industry)),
    )
    .service(
        web::resource("/evaluations/industry/supervisor")
            .route(web::get().to(supervisor_submitted_industry)),
    )
    .service(
        web::resource("/evaluations/academic/supervisor")
            .route(web::get().to(supervisor_submitted_academic)),
    )
    .service(
        web::resource("/evaluations/students/supervisor")
            .route(web::get().to(supervisor_student_evaluations)),
    )
    .service(
        web::resource("/evaluations/students/coordinator")
            .route(web::get().to(coordinator_student_evaluations)),
    )
    .service(
        web::resource("/evaluations/students/{evaluation_id}")
            .route(web::get().to(student_evaluation_detail)),
    );
}
