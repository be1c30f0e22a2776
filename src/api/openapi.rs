//! OpenAPI documentation definition.

use utoipa::OpenApi;

/// OpenAPI document for the internship placement API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Internship Placement Server API",
        description = "Coordinates internship requests, placements, weekly logs, evaluations and results reporting",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::companies::list_companies,
        crate::api::companies::create_company,
        crate::api::companies::update_company_status,
        crate::api::requests::get_my_request,
        crate::api::requests::update_my_request,
        crate::api::requests::submit_my_request,
        crate::api::requests::upload_request_document,
        crate::api::requests::upload_acceptance_letter,
        crate::api::requests::download_recommendation_letter,
        crate::api::requests::review_queue,
        crate::api::requests::acceptance_queue,
        crate::api::requests::waiting_queue,
        crate::api::requests::mark_under_review,
        crate::api::requests::reject_request,
        crate::api::requests::issue_recommendation,
        crate::api::requests::return_for_acceptance,
        crate::api::requests::verify_acceptance,
        crate::api::placements::get_my_placement,
        crate::api::placements::supervisor_students,
        crate::api::placements::company_students,
        crate::api::placements::update_status,
        crate::api::placements::assign_supervisors,
        crate::api::placements::record_site_visit,
        crate::api::placements::list_site_visits,
        crate::api::weekly_logs::list_my_logs,
        crate::api::weekly_logs::create_log,
        crate::api::weekly_logs::get_log,
        crate::api::weekly_logs::update_log,
        crate::api::weekly_logs::submit_log,
        crate::api::weekly_logs::upload_log_attachment,
        crate::api::weekly_logs::delete_log,
        crate::api::weekly_logs::company_action,
        crate::api::weekly_logs::company_pending,
        crate::api::weekly_logs::company_approved,
        crate::api::weekly_logs::supervisor_approved,
        crate::api::weekly_logs::missing_logs,
        crate::api::evaluations::get_industry_evaluation,
        crate::api::evaluations::save_industry_evaluation,
        crate::api::evaluations::submit_industry_evaluation,
        crate::api::evaluations::company_submitted_industry,
        crate::api::evaluations::supervisor_submitted_industry,
        crate::api::evaluations::get_academic_evaluation,
        crate::api::evaluations::save_academic_evaluation,
        crate::api::evaluations::submit_academic_evaluation,
        crate::api::evaluations::supervisor_submitted_academic,
        crate::api::evaluations::get_self_evaluation,
        crate::api::evaluations::save_self_evaluation,
        crate::api::evaluations::submit_self_evaluation,
        crate::api::evaluations::supervisor_student_evaluations,
        crate::api::evaluations::coordinator_student_evaluations,
        crate::api::evaluations::student_evaluation_detail,
        crate::api::results::preview,
        crate::api::results::submit,
        crate::api::results::latest,
        crate::api::results::export_live,
        crate::api::results::list_reports,
        crate::api::results::report_detail,
        crate::api::results::receive_report,
        crate::api::results::export_report,
        crate::api::dashboards::coordinator,
        crate::api::dashboards::supervisor,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::models::CompanyResponse,
        crate::models::CreateCompanyRequest,
        crate::models::UpdateCompanyStatusRequest,
        crate::models::RequestResponse,
        crate::models::UpdateRequestBody,
        crate::models::ReviewRequestBody,
        crate::models::ReturnForAcceptanceBody,
        crate::models::VerifyAcceptanceBody,
        crate::models::PlacementResponse,
        crate::models::SupervisorStudentRow,
        crate::models::UpdatePlacementStatusBody,
        crate::models::AssignSupervisorsBody,
        crate::models::WeeklyLogResponse,
        crate::models::UpdateWeeklyLogBody,
        crate::models::CompanyLogActionBody,
        crate::models::MissingLogsResponse,
        crate::models::EvaluationResponse,
        crate::models::IndustryEvaluationBody,
        crate::models::AcademicEvaluationBody,
        crate::models::StudentEvaluationBody,
        crate::models::StudentEvaluationResponse,
        crate::models::ResultRow,
        crate::models::ResultsReportResponse,
        crate::models::ResultsReportListResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Companies", description = "Company directory"),
        (name = "Requests", description = "Internship request workflow"),
        (name = "Placements", description = "Placements and site visits"),
        (name = "Weekly logs", description = "Weekly activity logs"),
        (name = "Evaluations", description = "Industry, academic and self evaluations"),
        (name = "Results", description = "Results aggregation and reports"),
        (name = "Dashboards", description = "Read-only dashboards"),
    )
)]
pub struct ApiDoc;
