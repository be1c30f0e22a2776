//! Coordinator and supervisor dashboards: read-only count aggregations.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    EvaluationStatus, PlacementStatus, Principal, RequestStatus, ResultRow, WeeklyLogStatus,
};
use crate::services::access::{require_coordinator, require_university_supervisor};
use crate::services::evaluation::scores_for_placements;

/// Coordinator dashboard counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct CoordinatorDashboard {
    // Placements
    pub students_on_internship: u64,
    pub students_completed: u64,
    pub students_on_hold: u64,
    pub students_terminated: u64,
    pub pending_ack: u64,

    // Request pipeline
    pub draft_requests: u64,
    pub submitted_requests: u64,
    pub under_review_requests: u64,
    pub recommendation_issued: u64,
    pub acceptance_uploaded: u64,
    pub acceptance_verified: u64,
    pub returned_for_acceptance: u64,
    pub rejected_requests: u64,

    // Weekly logs
    pub logs_draft: u64,
    pub logs_submitted: u64,
    pub logs_returned: u64,
    pub logs_approved: u64,

    // Evaluations & reports
    pub industry_eval_submitted: u64,
    pub academic_eval_submitted: u64,
    pub student_eval_submitted: u64,
    pub supervisor_reports_pending: u64,

    // University supervisor allocation over active placements
    pub active_with_university_supervisor: u64,
    pub active_without_university_supervisor: u64,
}

/// Supervisor dashboard counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct SupervisorDashboard {
    pub assigned_count: usize,
    pub industry_submitted_count: usize,
    pub academic_submitted_count: usize,
    pub ready_for_average_count: usize,
    pub latest_report_id: Option<Uuid>,
    pub latest_report_status: Option<String>,
    pub latest_report_rows: Vec<ResultRow>,
}

/// Build the coordinator dashboard.
pub async fn coordinator_dashboard(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<CoordinatorDashboard> {
    require_coordinator(principal)?;

    let active_placements = pool.list_non_terminal_placements().await?;
    let active: Vec<_> = active_placements
        .iter()
        .filter(|p| p.status == PlacementStatus::Active.as_str())
        .collect();
    let active_with_supervisor = active
        .iter()
        .filter(|p| p.university_supervisor_id.is_some())
        .count() as u64;
    let active_without_supervisor = active.len() as u64 - active_with_supervisor;

    let reports = pool.list_visible_results_reports().await?;
    let supervisor_reports_pending = reports
        .iter()
        .filter(|r| r.status == crate::models::ReportStatus::Submitted.as_str())
        .count() as u64;

    Ok(CoordinatorDashboard {
        students_on_internship: pool
            .count_placements_by_status(PlacementStatus::Active)
            .await?,
        students_completed: pool
            .count_placements_by_status(PlacementStatus::Completed)
            .await?,
        students_on_hold: pool
            .count_placements_by_status(PlacementStatus::OnHold)
            .await?,
        students_terminated: pool
            .count_placements_by_status(PlacementStatus::Terminated)
            .await?,
        pending_ack: pool
            .count_placements_by_status(PlacementStatus::PendingStudentAck)
            .await?,

        draft_requests: pool.count_requests_by_status(RequestStatus::Draft).await?,
        submitted_requests: pool
            .count_requests_by_status(RequestStatus::Submitted)
            .await?,
        under_review_requests: pool
            .count_requests_by_status(RequestStatus::UnderReview)
            .await?,
        recommendation_issued: pool
            .count_requests_by_status(RequestStatus::Recommended)
            .await?,
        acceptance_uploaded: pool
            .count_requests_by_status(RequestStatus::AcceptanceUploaded)
            .await?,
        acceptance_verified: pool
            .count_requests_by_status(RequestStatus::AcceptanceVerified)
            .await?,
        returned_for_acceptance: pool
            .count_requests_by_status(RequestStatus::ReturnedForAcceptance)
            .await?,
        rejected_requests: pool
            .count_requests_by_status(RequestStatus::Rejected)
            .await?,

        logs_draft: pool.count_logs_by_status(WeeklyLogStatus::Draft).await?,
        logs_submitted: pool
            .count_logs_by_status(WeeklyLogStatus::Submitted)
            .await?,
        logs_returned: pool
            .count_logs_by_status(WeeklyLogStatus::ReturnedForEdit)
            .await?,
        logs_approved: pool
            .count_logs_by_status(WeeklyLogStatus::ApprovedByCompany)
            .await?,

        industry_eval_submitted: pool.count_submitted_industry_evaluations().await?,
        academic_eval_submitted: pool.count_submitted_academic_evaluations().await?,
        student_eval_submitted: pool.count_submitted_student_evaluations().await?,
        supervisor_reports_pending,

        active_with_university_supervisor: active_with_supervisor,
        active_without_university_supervisor: active_without_supervisor,
    })
}

/// Build the university supervisor dashboard.
pub async fn supervisor_dashboard(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<SupervisorDashboard> {
    let staff = require_university_supervisor(pool, principal).await?;

    let placements = pool
        .list_placements_for_university_supervisor(staff.id)
        .await?;
    let placement_ids: Vec<Uuid> = placements.iter().map(|p| p.id).collect();

    let scores = scores_for_placements(pool, &placement_ids, Some(principal.user_id)).await?;

    let industry_submitted_count = scores
        .values()
        .filter(|s| s.industry_status == Some(EvaluationStatus::Submitted))
        .count();
    let academic_submitted_count = scores
        .values()
        .filter(|s| s.academic_status == Some(EvaluationStatus::Submitted))
        .count();
    let ready_for_average_count = scores
        .values()
        .filter(|s| s.average_100.is_some())
        .count();

    let latest = pool
        .get_latest_report_for_supervisor(principal.user_id)
        .await?;
    let (latest_report_id, latest_report_status, latest_report_rows) = match latest {
        Some(report) => {
            let rows = DbPool::decode_report_rows(&report)?;
            (Some(report.id), Some(report.status), rows)
        }
        None => (None, None, Vec::new()),
    };

    Ok(SupervisorDashboard {
        assigned_count: placements.len(),
        industry_submitted_count,
        academic_submitted_count,
        ready_for_average_count,
        latest_report_id,
        latest_report_status,
        latest_report_rows,
    })
}
