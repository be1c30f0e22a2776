//! Placement lifecycle operations, supervisor-facing student views, and
//! site visit recording.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::db::{DbPool, placements::PlacementDisplay};
use crate::entity::placement;
use crate::entity::site_visit;
use crate::error::{AppError, AppResult};
use crate::models::{
    PlacementResponse, PlacementStatus, Principal, SupervisorStudentRow,
};
use crate::services::access::{
    require_coordinator, require_industry_supervisor, require_student,
    require_university_supervisor,
};
use crate::services::attachments::UploadedFile;
use crate::services::evaluation::scores_for_placements;
use crate::services::storage::{self, ObjectStore, Storage};

/// Parse a stored status, treating unknown values as data corruption.
pub fn parse_status(raw: &str) -> AppResult<PlacementStatus> {
    PlacementStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Invalid placement status: {}", raw)))
}

/// The student's own placement: active, else most recent.
pub async fn my_placement(pool: &DbPool, principal: &Principal) -> AppResult<placement::Model> {
    let student = require_student(pool, principal).await?;

    if let Some(active) = pool.get_active_placement_for_student(student.id).await? {
        return Ok(active);
    }

    pool.get_latest_placement_for_student(student.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Placement".to_string()))
}

/// Coordinator moves a placement through its lifecycle.
pub async fn update_status(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    to: PlacementStatus,
) -> AppResult<placement::Model> {
    require_coordinator(principal)?;

    let placement = pool
        .get_placement_by_id(placement_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

    let from = parse_status(&placement.status)?;
    if !from.can_transition(to) {
        return Err(AppError::Precondition(format!(
            "Cannot move a placement from {} to {}",
            from, to
        )));
    }

    let updated = pool.update_placement_status(placement_id, to).await?;

    info!(placement_id = %placement_id, from = %from, to = %to, "Placement status changed");

    Ok(updated)
}

/// Coordinator assigns or replaces placement supervisors.
pub async fn assign_supervisors(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    industry_supervisor_id: Option<Uuid>,
    university_supervisor_id: Option<Uuid>,
) -> AppResult<placement::Model> {
    require_coordinator(principal)?;

    if let Some(contact_id) = industry_supervisor_id {
        let placement = pool
            .get_placement_by_id(placement_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

        let contact = pool
            .get_company_contact_by_id(contact_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company contact {}", contact_id)))?;

        if contact.company_id != placement.company_id {
            return Err(AppError::InvalidInput(
                "industry_supervisor_id: contact belongs to another company".to_string(),
            ));
        }
    }

    if let Some(staff_id) = university_supervisor_id {
        pool.get_staff_profile_by_id(staff_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff profile {}", staff_id)))?;
    }

    pool.assign_placement_supervisors(placement_id, industry_supervisor_id, university_supervisor_id)
        .await
}

/// University supervisor's students with both score summaries joined.
pub async fn university_supervisor_students(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Vec<SupervisorStudentRow>> {
    let staff = require_university_supervisor(pool, principal).await?;

    let placements = pool
        .list_placements_for_university_supervisor(staff.id)
        .await?;
    students_with_scores(pool, principal, placements, true).await
}

/// Industry supervisor's students with the industry score joined.
pub async fn industry_supervisor_students(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<Vec<SupervisorStudentRow>> {
    let profile = require_industry_supervisor(pool, principal).await?;

    let placements = pool.list_placements_for_company(profile.company_id).await?;
    students_with_scores(pool, principal, placements, false).await
}

async fn students_with_scores(
    pool: &DbPool,
    principal: &Principal,
    placements: Vec<placement::Model>,
    include_academic: bool,
) -> AppResult<Vec<SupervisorStudentRow>> {
    let placement_ids: Vec<Uuid> = placements.iter().map(|p| p.id).collect();

    let academic_author = include_academic.then_some(principal.user_id);
    let mut scores = scores_for_placements(pool, &placement_ids, academic_author).await?;

    let displays = pool.get_placement_displays(placements).await?;

    let mut rows = Vec::with_capacity(displays.len());
    for display in displays {
        let placement_id = display.placement.id;
        let response = placement_response(display)?;
        let placement_scores = scores.remove(&placement_id).ok_or_else(|| {
            AppError::Database(format!("Missing score join for placement {}", placement_id))
        })?;

        rows.push(SupervisorStudentRow {
            placement: response,
            scores: placement_scores,
        });
    }

    Ok(rows)
}

/// University supervisor records a site visit on an assigned placement.
pub async fn record_site_visit(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    placement_id: Uuid,
    visit_date: NaiveDate,
    findings: String,
    recommendations: Option<String>,
    attachment: Option<UploadedFile>,
) -> AppResult<site_visit::Model> {
    let staff = require_university_supervisor(pool, principal).await?;

    let placement = pool
        .get_placement_by_id(placement_id)
        .await?
        .filter(|p| p.university_supervisor_id == Some(staff.id))
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

    if findings.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "findings: visit findings are required".to_string(),
        ));
    }

    let attachment_key = match attachment {
        Some(file) => {
            let key = Storage::tracking_key(placement.id, "site_visits", &file.filename);
            storage::replace_object(store, None, &key, file.data, file.content_type.as_deref())
                .await?;
            Some(key)
        }
        None => None,
    };

    let visit = pool
        .insert_site_visit(
            placement.id,
            staff.id,
            visit_date,
            findings,
            recommendations,
            attachment_key,
        )
        .await?;

    info!(placement_id = %placement_id, visit_id = %visit.id, "Site visit recorded");

    Ok(visit)
}

/// Visits for a placement, visible to its university supervisor and
/// coordinators.
pub async fn list_site_visits(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
) -> AppResult<Vec<site_visit::Model>> {
    let placement = pool
        .get_placement_by_id(placement_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

    if !principal.is_coordinator() {
        let staff = require_university_supervisor(pool, principal).await?;
        if placement.university_supervisor_id != Some(staff.id) {
            return Err(AppError::NotFound(format!("Placement {}", placement_id)));
        }
    }

    pool.list_site_visits_for_placement(placement.id).await
}

/// Build the API response for a placement display row.
pub fn placement_response(display: PlacementDisplay) -> AppResult<PlacementResponse> {
    let status = parse_status(&display.placement.status)?;

    Ok(PlacementResponse {
        id: display.placement.id,
        request_id: display.placement.request_id,
        student_reg_no: display.student_reg_no,
        student_name: display.student_name,
        company_id: display.placement.company_id,
        company_name: display.company_name,
        industry_supervisor_id: display.placement.industry_supervisor_id,
        university_supervisor_id: display.placement.university_supervisor_id,
        start_date: display.placement.start_date,
        end_date: display.placement.end_date,
        status,
        created_at: display.placement.created_at,
    })
}
