//! Evaluation workflows: industry, academic and student self-evaluation.
//!
//! All three share the same shape: get-or-create one evaluation per
//! placement, draft -> submitted, read-only to the author once submitted.
//! Industry and academic entry is gated by a configurable time window
//! before the placement's end date.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::academic_evaluation as academic;
use crate::entity::industry_evaluation as industry;
use crate::entity::placement;
use crate::entity::student_evaluation as student_eval;
use crate::error::{AppError, AppResult};
use crate::models::{
    ACADEMIC_ITEMS, AcademicEvaluationBody, EvaluationResponse, EvaluationStatus, INDUSTRY_ITEMS,
    IndustryEvaluationBody, PlacementScores, Principal, RatedItem, ScoreSummary,
    StudentEvaluationBody, StudentEvaluationResponse, average_100, score_summary,
    within_entry_window,
};
use crate::services::access::{
    require_industry_supervisor, require_student, require_university_supervisor,
};

/// Parse a stored status, treating unknown values as data corruption.
pub fn parse_status(raw: &str) -> AppResult<EvaluationStatus> {
    EvaluationStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Invalid evaluation status: {}", raw)))
}

fn guard_window(
    placement: &placement::Model,
    window_days: i64,
    kind: &str,
) -> AppResult<()> {
    let today = Utc::now().date_naive();
    if !within_entry_window(placement.end_date, today, window_days) {
        let days_to_end = (placement.end_date - today).num_days();
        return Err(AppError::Precondition(format!(
            "The {} evaluation opens {} days before the placement ends ({} days remain)",
            kind, window_days, days_to_end
        )));
    }
    Ok(())
}

fn guard_not_submitted(status: EvaluationStatus) -> AppResult<()> {
    if status == EvaluationStatus::Submitted {
        return Err(AppError::Precondition(
            "This evaluation is submitted and read-only".to_string(),
        ));
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Industry
// ----------------------------------------------------------------------

/// Resolve the placement for an industry supervisor, scoped to their company.
async fn industry_scope(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
) -> AppResult<(Uuid, placement::Model)> {
    let profile = require_industry_supervisor(pool, principal).await?;

    let placement = pool
        .get_placement_by_id(placement_id)
        .await?
        .filter(|p| p.company_id == profile.company_id)
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

    Ok((profile.company_id, placement))
}

/// Get or create the industry evaluation for a placement.
pub async fn industry_get_or_create(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    window_days: i64,
) -> AppResult<industry::Model> {
    let (company_id, placement) = industry_scope(pool, principal, placement_id).await?;
    guard_window(&placement, window_days, "industry")?;

    pool.get_or_create_industry_evaluation(
        placement.id,
        company_id,
        principal.user_id,
        &principal.display_name,
    )
    .await
}

/// Save or submit the industry evaluation.
pub async fn industry_save(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    window_days: i64,
    body: IndustryEvaluationBody,
    submit: bool,
) -> AppResult<industry::Model> {
    let evaluation = industry_get_or_create(pool, principal, placement_id, window_days).await?;
    guard_not_submitted(parse_status(&evaluation.status)?)?;

    let updated = pool
        .apply_industry_evaluation(evaluation, &body, principal.user_id, submit)
        .await?;

    if submit {
        info!(placement_id = %placement_id, "Industry evaluation submitted");
    }

    Ok(updated)
}

/// Build the API response for an industry evaluation.
pub fn industry_response(evaluation: industry::Model) -> AppResult<EvaluationResponse> {
    let status = parse_status(&evaluation.status)?;
    let ratings = evaluation.ratings();
    let comments = evaluation.comments();

    let items: Vec<RatedItem> = INDUSTRY_ITEMS
        .iter()
        .zip(ratings.iter())
        .zip(comments)
        .map(|((item, rating), comment)| RatedItem {
            item: item.to_string(),
            rating: *rating,
            comment,
        })
        .collect();

    Ok(EvaluationResponse {
        id: evaluation.id,
        placement_id: evaluation.placement_id,
        status,
        score: score_summary(&ratings),
        items,
        submitted_at: evaluation.submitted_at,
        recommend_employment: evaluation.recommend_employment,
        recommendation: None,
        supervisor_name: evaluation.supervisor_name,
    })
}

// ----------------------------------------------------------------------
// Academic
// ----------------------------------------------------------------------

/// Resolve the placement for a university supervisor, scoped to their
/// assigned placements.
async fn academic_scope(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
) -> AppResult<placement::Model> {
    let staff = require_university_supervisor(pool, principal).await?;

    let placement = pool
        .get_placement_by_id(placement_id)
        .await?
        .filter(|p| p.university_supervisor_id == Some(staff.id))
        .ok_or_else(|| AppError::NotFound(format!("Placement {}", placement_id)))?;

    Ok(placement)
}

/// Get or create the academic evaluation for a placement.
pub async fn academic_get_or_create(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    window_days: i64,
) -> AppResult<academic::Model> {
    let placement = academic_scope(pool, principal, placement_id).await?;
    guard_window(&placement, window_days, "academic")?;

    pool.get_or_create_academic_evaluation(
        placement.id,
        principal.user_id,
        &principal.display_name,
    )
    .await
}

/// Save or submit the academic evaluation.
pub async fn academic_save(
    pool: &DbPool,
    principal: &Principal,
    placement_id: Uuid,
    window_days: i64,
    body: AcademicEvaluationBody,
    submit: bool,
) -> AppResult<academic::Model> {
    let evaluation = academic_get_or_create(pool, principal, placement_id, window_days).await?;
    guard_not_submitted(parse_status(&evaluation.status)?)?;

    let updated = pool
        .apply_academic_evaluation(evaluation, &body, principal.user_id, submit)
        .await?;

    if submit {
        info!(placement_id = %placement_id, "Academic evaluation submitted");
    }

    Ok(updated)
}

/// Build the API response for an academic evaluation.
pub fn academic_response(evaluation: academic::Model) -> AppResult<EvaluationResponse> {
    let status = parse_status(&evaluation.status)?;
    let ratings = evaluation.ratings();
    let comments = evaluation.comments();

    let items: Vec<RatedItem> = ACADEMIC_ITEMS
        .iter()
        .zip(ratings.iter())
        .zip(comments)
        .map(|((item, rating), comment)| RatedItem {
            item: item.to_string(),
            rating: *rating,
            comment,
        })
        .collect();

    Ok(EvaluationResponse {
        id: evaluation.id,
        placement_id: evaluation.placement_id,
        status,
        score: score_summary(&ratings),
        items,
        submitted_at: evaluation.submitted_at,
        recommend_employment: None,
        recommendation: evaluation.recommendation,
        supervisor_name: evaluation.supervisor_name,
    })
}

// ----------------------------------------------------------------------
// Student self-evaluation
// ----------------------------------------------------------------------

/// The placement a student evaluates: active, else most recent.
async fn student_eval_placement(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<placement::Model> {
    let student = require_student(pool, principal).await?;

    if let Some(active) = pool.get_active_placement_for_student(student.id).await? {
        return Ok(active);
    }

    pool.get_latest_placement_for_student(student.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Placement".to_string()))
}

/// Get or create the caller's self-evaluation.
pub async fn student_get_or_create(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<student_eval::Model> {
    let placement = student_eval_placement(pool, principal).await?;

    let site = pool
        .get_company_by_id(placement.company_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    pool.get_or_create_student_evaluation(placement.id, principal.user_id, &site)
        .await
}

/// Save or submit the caller's self-evaluation.
pub async fn student_save(
    pool: &DbPool,
    principal: &Principal,
    body: StudentEvaluationBody,
    submit: bool,
) -> AppResult<student_eval::Model> {
    let evaluation = student_get_or_create(pool, principal).await?;
    guard_not_submitted(parse_status(&evaluation.status)?)?;

    let updated = pool
        .apply_student_evaluation(evaluation, &body, submit)
        .await?;

    if submit {
        info!(placement_id = %updated.placement_id, "Student self-evaluation submitted");
    }

    Ok(updated)
}

/// Build the API response for a student self-evaluation.
pub fn student_response(evaluation: student_eval::Model) -> AppResult<StudentEvaluationResponse> {
    let status = parse_status(&evaluation.status)?;
    let answers = evaluation.answers();

    Ok(StudentEvaluationResponse {
        id: evaluation.id,
        placement_id: evaluation.placement_id,
        status,
        program: evaluation.program,
        internship_site: evaluation.internship_site,
        eval_date: evaluation.eval_date,
        answers,
        submitted_at: evaluation.submitted_at,
    })
}

// ----------------------------------------------------------------------
// Score joins
// ----------------------------------------------------------------------

/// Industry score summary for a submitted evaluation.
pub fn industry_score(evaluation: &industry::Model) -> ScoreSummary {
    score_summary(&evaluation.ratings())
}

/// Academic score summary for a submitted evaluation.
pub fn academic_score(evaluation: &academic::Model) -> ScoreSummary {
    score_summary(&evaluation.ratings())
}

/// Join both evaluations' scores onto a set of placements.
///
/// The academic side is restricted to evaluations authored by
/// `academic_author` (the viewing supervisor); the average is present only
/// when both sides are submitted.
pub async fn scores_for_placements(
    pool: &DbPool,
    placement_ids: &[Uuid],
    academic_author: Option<Uuid>,
) -> AppResult<std::collections::HashMap<Uuid, PlacementScores>> {
    use std::collections::HashMap;

    let industry_rows = pool.get_submitted_industry_for_placements(placement_ids).await?;

    let academic_rows = match academic_author {
        Some(author) => {
            pool.get_submitted_academic_for_placements(placement_ids, author)
                .await?
        }
        None => Vec::new(),
    };

    let industry_map: HashMap<Uuid, &industry::Model> = industry_rows
        .iter()
        .map(|e| (e.placement_id, e))
        .collect();
    let academic_map: HashMap<Uuid, &academic::Model> = academic_rows
        .iter()
        .map(|e| (e.placement_id, e))
        .collect();

    let mut scores = HashMap::new();
    for placement_id in placement_ids {
        let ind = industry_map.get(placement_id);
        let ac = academic_map.get(placement_id);

        let ind_score = ind.map(|e| industry_score(e));
        let ac_score = ac.map(|e| academic_score(e));

        // Both maps hold submitted evaluations only, so presence in the
        // map is the "submitted" condition for the average
        let average = average_100(
            ind_score.map(|s| s.out_of_100),
            ac_score.map(|s| s.out_of_100),
        );

        scores.insert(
            *placement_id,
            PlacementScores {
                industry: ind_score,
                industry_status: ind.map(|_| EvaluationStatus::Submitted),
                academic: ac_score,
                academic_status: ac.map(|_| EvaluationStatus::Submitted),
                average_100: average,
            },
        );
    }

    Ok(scores)
}
