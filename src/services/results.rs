//! Results aggregation: supervisor score snapshots and the
//! submit/receive report workflow.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::results_report as report;
use crate::error::{AppError, AppResult};
use crate::models::{
    Principal, ReportStatus, ResultRow, ResultsReportListResponse, ResultsReportResponse,
    ResultsReportSummary, render_results_document,
};
use crate::services::access::{require_coordinator, require_university_supervisor};
use crate::services::evaluation::scores_for_placements;

/// Parse a stored status, treating unknown values as data corruption.
pub fn parse_status(raw: &str) -> AppResult<ReportStatus> {
    ReportStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Invalid report status: {}", raw)))
}

/// Compute the live score rows for the calling supervisor.
///
/// One row per non-terminal assigned placement, ordered by registration
/// number; the average follows the both-submitted rule.
pub async fn build_rows(pool: &DbPool, principal: &Principal) -> AppResult<Vec<ResultRow>> {
    let staff = require_university_supervisor(pool, principal).await?;

    let placements = pool
        .list_placements_for_university_supervisor(staff.id)
        .await?;
    let placement_ids: Vec<Uuid> = placements.iter().map(|p| p.id).collect();

    let scores = scores_for_placements(pool, &placement_ids, Some(principal.user_id)).await?;

    let mut displays = pool.get_placement_displays(placements).await?;
    displays.sort_by(|a, b| a.student_reg_no.cmp(&b.student_reg_no));

    let rows = displays
        .into_iter()
        .map(|display| {
            let score = scores.get(&display.placement.id);
            ResultRow {
                placement_id: display.placement.id,
                reg_no: display.student_reg_no,
                name: display.student_name,
                company: display.company_name,
                industry_100: score.and_then(|s| s.industry.map(|i| i.out_of_100)),
                academic_100: score.and_then(|s| s.academic.map(|a| a.out_of_100)),
                average_100: score.and_then(|s| s.average_100),
            }
        })
        .collect();

    Ok(rows)
}

/// Submit the supervisor's results report.
///
/// An existing non-submitted report is overwritten and submitted;
/// otherwise a fresh one is created and submitted in the same step.
/// Submission never leaves a draft behind.
pub async fn submit_report(pool: &DbPool, principal: &Principal) -> AppResult<report::Model> {
    let rows = build_rows(pool, principal).await?;

    let submitted = match pool.get_open_report_for_supervisor(principal.user_id).await? {
        Some(open) => pool.submit_results_report(open, &rows).await?,
        None => {
            pool.insert_results_report(
                principal.user_id,
                &rows,
                ReportStatus::Submitted,
                Some(Utc::now()),
            )
            .await?
        }
    };

    info!(
        report_id = %submitted.id,
        rows = rows.len(),
        "Results report submitted"
    );

    Ok(submitted)
}

/// The supervisor's latest report, if any.
pub async fn latest_report(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Option<report::Model>> {
    require_university_supervisor(pool, principal).await?;
    pool.get_latest_report_for_supervisor(principal.user_id).await
}

/// Coordinator list of submitted and received reports.
pub async fn coordinator_list(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<ResultsReportListResponse> {
    require_coordinator(principal)?;

    let reports = pool.list_visible_results_reports().await?;

    let mut summaries = Vec::with_capacity(reports.len());
    let mut pending_count = 0;
    let mut received_count = 0;

    for model in reports {
        let status = parse_status(&model.status)?;
        match status {
            ReportStatus::Submitted => pending_count += 1,
            ReportStatus::Received => received_count += 1,
            ReportStatus::Draft => {}
        }

        let rows = DbPool::decode_report_rows(&model)?;
        summaries.push(ResultsReportSummary {
            id: model.id,
            supervisor_name: pool.display_name_for(model.supervisor_user_id).await?,
            status,
            row_count: rows.len(),
            submitted_at: model.submitted_at,
        });
    }

    Ok(ResultsReportListResponse {
        reports: summaries,
        pending_count,
        received_count,
    })
}

/// Coordinator view of one submitted or received report.
pub async fn coordinator_detail(
    pool: &DbPool,
    principal: &Principal,
    report_id: Uuid,
) -> AppResult<report::Model> {
    require_coordinator(principal)?;

    let model = pool
        .get_results_report_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Results report {}", report_id)))?;

    let status = parse_status(&model.status)?;
    if status == ReportStatus::Draft {
        return Err(AppError::NotFound(format!("Results report {}", report_id)));
    }

    Ok(model)
}

/// Coordinator acknowledges a submitted report. Never reversed.
pub async fn mark_received(
    pool: &DbPool,
    principal: &Principal,
    report_id: Uuid,
) -> AppResult<report::Model> {
    require_coordinator(principal)?;

    let model = pool
        .get_results_report_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Results report {}", report_id)))?;

    let status = parse_status(&model.status)?;
    if !status.can_transition(ReportStatus::Received) {
        return Err(AppError::Precondition(format!(
            "Cannot mark a {} report as received",
            status
        )));
    }

    let updated = pool.mark_results_report_received(model).await?;

    info!(report_id = %report_id, "Results report received");

    Ok(updated)
}

/// Render the supervisor's live rows as a text document.
pub async fn export_live_document(pool: &DbPool, principal: &Principal) -> AppResult<String> {
    let rows = build_rows(pool, principal).await?;
    let subtitle = format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M"));

    Ok(render_results_document(
        "Internship Results Report (University Supervisor)",
        &subtitle,
        &rows,
    ))
}

/// Render a stored report's snapshot as a text document.
pub async fn export_report_document(
    pool: &DbPool,
    principal: &Principal,
    report_id: Uuid,
) -> AppResult<String> {
    let model = coordinator_detail(pool, principal, report_id).await?;
    let rows = DbPool::decode_report_rows(&model)?;

    let supervisor = pool.display_name_for(model.supervisor_user_id).await?;
    let submitted = model
        .submitted_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let subtitle = format!("Supervisor: {}\nSubmitted: {}", supervisor, submitted);

    Ok(render_results_document(
        "Internship Results Report (Submitted by University Supervisor)",
        &subtitle,
        &rows,
    ))
}

/// Build the API response for a report.
pub async fn report_response(
    pool: &DbPool,
    model: report::Model,
) -> AppResult<ResultsReportResponse> {
    let status = parse_status(&model.status)?;
    let rows = DbPool::decode_report_rows(&model)?;
    let supervisor_name = pool.display_name_for(model.supervisor_user_id).await?;

    Ok(ResultsReportResponse {
        id: model.id,
        supervisor_user_id: model.supervisor_user_id,
        supervisor_name,
        status,
        rows,
        submitted_at: model.submitted_at,
        created_at: model.created_at,
    })
}
