//! Weekly log workflow: creation, editing, submission, company review,
//! and the shared missing-log predicate.

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::db::{DbPool, placements::PlacementDisplay};
use crate::entity::weekly_log::{self, ActiveModel};
use crate::error::{AppError, AppResult};
use crate::models::{
    CompanyLogAction, DEFAULT_RETURN_REASON, DayEntryContent, LogEntryResponse, MissingLogRow,
    MissingLogsResponse, Principal, UpdateWeeklyLogBody, Weekday, WeeklyLogResponse,
    WeeklyLogStatus, compose_summary, week_bounds,
};
use crate::services::access::{require_coordinator, require_industry_supervisor, require_student};
use crate::services::attachments::UploadedFile;
use crate::services::storage::{self, ObjectStore, Storage};

/// Parse a stored status, treating unknown values as data corruption.
pub fn parse_status(raw: &str) -> AppResult<WeeklyLogStatus> {
    WeeklyLogStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Invalid weekly log status: {}", raw)))
}

/// The caller's active placement, required for every student log operation.
async fn require_active_placement(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<crate::entity::placement::Model> {
    let student = require_student(pool, principal).await?;
    pool.get_active_placement_for_student(student.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Active placement".to_string()))
}

/// Fetch a log scoped to the student's active placement.
async fn get_own_log(
    pool: &DbPool,
    principal: &Principal,
    log_id: Uuid,
) -> AppResult<(crate::entity::placement::Model, weekly_log::Model)> {
    let placement = require_active_placement(pool, principal).await?;

    let log = pool
        .get_weekly_log_by_id(log_id)
        .await?
        .filter(|log| log.placement_id == placement.id)
        .ok_or_else(|| AppError::NotFound(format!("Weekly log {}", log_id)))?;

    Ok((placement, log))
}

/// Create the next sequential weekly log with pre-seeded weekday entries.
pub async fn create_log(pool: &DbPool, principal: &Principal) -> AppResult<weekly_log::Model> {
    let placement = require_active_placement(pool, principal).await?;

    let next_week = pool.get_max_week_no(placement.id).await?.unwrap_or(0) + 1;

    let today = Utc::now().date_naive();
    let end = today + Duration::days(4);

    let log = pool
        .insert_weekly_log(placement.id, next_week, today, end)
        .await?;
    pool.seed_missing_entries(log.id).await?;

    info!(placement_id = %placement.id, week_no = next_week, "Weekly log created");

    Ok(log)
}

/// List the student's logs, newest week first.
pub async fn list_my_logs(pool: &DbPool, principal: &Principal) -> AppResult<Vec<weekly_log::Model>> {
    let placement = require_active_placement(pool, principal).await?;
    pool.list_logs_for_placement(placement.id).await
}

/// Fetch one of the student's own logs.
pub async fn get_my_log(
    pool: &DbPool,
    principal: &Principal,
    log_id: Uuid,
) -> AppResult<weekly_log::Model> {
    let (_, log) = get_own_log(pool, principal, log_id).await?;
    Ok(log)
}

/// Company-approved logs across a university supervisor's active placements.
pub async fn supervisor_approved_logs(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Vec<weekly_log::Model>> {
    let staff = crate::services::access::require_university_supervisor(pool, principal).await?;
    pool.list_approved_logs_for_university_supervisor(staff.id)
        .await
}

/// Save a log's fields and per-day entries.
///
/// Approved logs reject every edit. Saving keeps a returned log in its
/// returned state so the student can still see the reason.
pub async fn update_log(
    pool: &DbPool,
    principal: &Principal,
    log_id: Uuid,
    body: UpdateWeeklyLogBody,
) -> AppResult<weekly_log::Model> {
    let (_, log) = get_own_log(pool, principal, log_id).await?;
    let status = parse_status(&log.status)?;

    if status == WeeklyLogStatus::ApprovedByCompany {
        return Err(AppError::Precondition(
            "This log is already approved by the company".to_string(),
        ));
    }

    if let (Some(from), Some(to)) = (body.from_date, body.to_date)
        && from > to
    {
        return Err(AppError::InvalidInput(
            "from_date: must not be after to_date".to_string(),
        ));
    }

    pool.seed_missing_entries(log.id).await?;

    for entry in &body.entries {
        pool.update_log_entry(
            log.id,
            entry.day,
            entry.work_assignment.clone(),
            entry.activities_steps.clone(),
        )
        .await?;
    }

    let mut active: ActiveModel = log.into();
    if let Some(from) = body.from_date {
        active.from_date = Set(from);
    }
    if let Some(to) = body.to_date {
        active.to_date = Set(to);
    }
    if let Some(challenges) = body.challenges {
        active.challenges = Set(Some(challenges));
    }
    if let Some(lessons) = body.lessons {
        active.lessons = Set(Some(lessons));
    }
    // Saving never advances the workflow; a returned log stays returned
    if status == WeeklyLogStatus::Submitted {
        active.status = Set(WeeklyLogStatus::Draft.as_str().to_string());
    }

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to save weekly log: {}", e)))?;

    Ok(updated)
}

/// Submit a log for company review.
///
/// The derived summary is recomputed from the per-day entries,
/// overwriting the legacy free-text field.
pub async fn submit_log(
    pool: &DbPool,
    principal: &Principal,
    log_id: Uuid,
) -> AppResult<weekly_log::Model> {
    let (_, log) = get_own_log(pool, principal, log_id).await?;
    let status = parse_status(&log.status)?;

    if !status.can_transition(WeeklyLogStatus::Submitted) {
        return Err(AppError::Precondition(format!(
            "Cannot submit a {} log",
            status
        )));
    }

    let entries = pool.get_log_entries(log.id).await?;
    let contents: Vec<DayEntryContent> = entries
        .iter()
        .filter_map(|entry| {
            Weekday::parse(&entry.day).map(|day| DayEntryContent {
                day,
                work_assignment: entry.work_assignment.clone(),
                activities_steps: entry.activities_steps.clone(),
            })
        })
        .collect();

    let mut active: ActiveModel = log.into();
    active.activities = Set(compose_summary(&contents));
    active.status = Set(WeeklyLogStatus::Submitted.as_str().to_string());
    active.submitted_at = Set(Some(Utc::now()));

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to submit weekly log: {}", e)))?;

    info!(log_id = %log_id, "Weekly log submitted");

    Ok(updated)
}

/// Attach a file to a log.
pub async fn upload_log_attachment(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    log_id: Uuid,
    file: UploadedFile,
) -> AppResult<weekly_log::Model> {
    let (placement, log) = get_own_log(pool, principal, log_id).await?;
    let status = parse_status(&log.status)?;

    if status == WeeklyLogStatus::ApprovedByCompany {
        return Err(AppError::Precondition(
            "This log is already approved by the company".to_string(),
        ));
    }

    let old_key = log.attachment_key.clone();
    let new_key = Storage::tracking_key(placement.id, "weekly_logs", &file.filename);
    storage::replace_object(
        store,
        old_key.as_deref(),
        &new_key,
        file.data,
        file.content_type.as_deref(),
    )
    .await?;

    let mut active: ActiveModel = log.into();
    active.attachment_key = Set(Some(new_key));

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to save log attachment: {}", e)))?;

    Ok(updated)
}

/// Delete a draft log, removing its attachment from storage afterwards.
pub async fn delete_log(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    log_id: Uuid,
) -> AppResult<()> {
    let (_, log) = get_own_log(pool, principal, log_id).await?;
    let status = parse_status(&log.status)?;

    if status != WeeklyLogStatus::Draft {
        return Err(AppError::Precondition(
            "Only draft logs can be deleted".to_string(),
        ));
    }

    let attachment_key = log.attachment_key.clone();
    pool.delete_weekly_log(log).await?;

    // Storage cleanup happens after the row is gone; a dangling object is
    // recoverable, a dangling row is not
    if let Some(key) = attachment_key
        && store.exists(&key).await?
    {
        store.delete(&key).await?;
    }

    info!(log_id = %log_id, "Weekly log deleted");

    Ok(())
}

/// Company action on a submitted log: approve, or return with a reason.
///
/// The acting user must be an industry supervisor of the log's
/// placement's company.
pub async fn company_action(
    pool: &DbPool,
    principal: &Principal,
    log_id: Uuid,
    action: CompanyLogAction,
    reason: Option<String>,
) -> AppResult<weekly_log::Model> {
    let profile = require_industry_supervisor(pool, principal).await?;

    let log = pool
        .get_weekly_log_by_id(log_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Weekly log {}", log_id)))?;

    let placement = pool
        .get_placement_by_id(log.placement_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", log.placement_id)))?;

    if placement.company_id != profile.company_id {
        return Err(AppError::NotFound(format!("Weekly log {}", log_id)));
    }

    let status = parse_status(&log.status)?;
    let now = Utc::now();

    match action {
        CompanyLogAction::Approve => {
            if !status.can_transition(WeeklyLogStatus::ApprovedByCompany) {
                return Err(AppError::Precondition(format!(
                    "Cannot approve a {} log",
                    status
                )));
            }

            let mut active: ActiveModel = log.into();
            active.status = Set(WeeklyLogStatus::ApprovedByCompany.as_str().to_string());
            active.company_action_by = Set(Some(principal.user_id));
            active.company_action_at = Set(Some(now));
            active.return_reason = Set(None);

            let updated = active
                .update(pool.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to approve log: {}", e)))?;

            info!(log_id = %log_id, "Weekly log approved by company");
            Ok(updated)
        }
        CompanyLogAction::Return => {
            if !status.can_transition(WeeklyLogStatus::ReturnedForEdit) {
                return Err(AppError::Precondition(format!(
                    "Cannot return a {} log",
                    status
                )));
            }

            let reason = reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_RETURN_REASON.to_string());

            let mut active: ActiveModel = log.into();
            active.status = Set(WeeklyLogStatus::ReturnedForEdit.as_str().to_string());
            active.company_action_by = Set(Some(principal.user_id));
            active.company_action_at = Set(Some(now));
            active.return_reason = Set(Some(reason));

            let updated = active
                .update(pool.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to return log: {}", e)))?;

            info!(log_id = %log_id, "Weekly log returned for edit");
            Ok(updated)
        }
    }
}

/// Logs awaiting this company's review.
pub async fn company_pending_logs(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Vec<weekly_log::Model>> {
    let profile = require_industry_supervisor(pool, principal).await?;
    pool.list_logs_for_company_by_status(profile.company_id, WeeklyLogStatus::Submitted)
        .await
}

/// Logs this company has approved.
pub async fn company_approved_logs(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Vec<weekly_log::Model>> {
    let profile = require_industry_supervisor(pool, principal).await?;
    pool.list_logs_for_company_by_status(profile.company_id, WeeklyLogStatus::ApprovedByCompany)
        .await
}

/// Placements missing a countable log for the week around `today`.
///
/// The single source of truth for "missing": no submitted-or-approved log
/// overlaps the Monday..Sunday week, placements in a terminal status
/// excluded. The coordinator view and the reminder scan both call this.
pub async fn find_missing_placements(
    pool: &DbPool,
    today: NaiveDate,
) -> AppResult<(NaiveDate, NaiveDate, Vec<PlacementDisplay>, usize)> {
    let (week_start, week_end) = week_bounds(today);

    let placements = pool.list_non_terminal_placements().await?;
    let count_active = placements.len();

    let mut missing = Vec::new();
    for placement in placements {
        let covered = pool
            .has_log_covering_week(placement.id, week_start, week_end)
            .await?;
        if !covered {
            missing.push(pool.get_placement_display(placement).await?);
        }
    }

    Ok((week_start, week_end, missing, count_active))
}

/// Coordinator view of placements missing this week's log.
pub async fn coordinator_missing_logs(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<MissingLogsResponse> {
    require_coordinator(principal)?;

    let today = Utc::now().date_naive();
    let (week_start, week_end, missing, count_active) =
        find_missing_placements(pool, today).await?;

    let rows: Vec<MissingLogRow> = missing
        .into_iter()
        .map(|display| MissingLogRow {
            placement_id: display.placement.id,
            student_reg_no: display.student_reg_no,
            student_name: display.student_name,
            company_name: display.company_name,
        })
        .collect();

    Ok(MissingLogsResponse {
        week_start,
        week_end,
        count_missing: rows.len(),
        count_active,
        missing: rows,
    })
}

/// Build the API response for a log, including its entries.
pub async fn log_response(pool: &DbPool, log: weekly_log::Model) -> AppResult<WeeklyLogResponse> {
    let entries = pool.get_log_entries(log.id).await?;

    let entry_rows: Vec<LogEntryResponse> = entries
        .into_iter()
        .filter_map(|entry| {
            Weekday::parse(&entry.day).map(|day| LogEntryResponse {
                day,
                work_assignment: entry.work_assignment,
                activities_steps: entry.activities_steps,
            })
        })
        .collect();

    let status = parse_status(&log.status)?;

    Ok(WeeklyLogResponse {
        id: log.id,
        placement_id: log.placement_id,
        week_no: log.week_no,
        from_date: log.from_date,
        to_date: log.to_date,
        activities: log.activities,
        challenges: log.challenges,
        lessons: log.lessons,
        attachment_key: log.attachment_key,
        status,
        submitted_at: log.submitted_at,
        return_reason: log.return_reason,
        entries: entry_rows,
    })
}
