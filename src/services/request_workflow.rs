//! Internship request workflow: the request state machine and its
//! role-gated transitions.
//!
//! Every transition consults `RequestStatus::can_transition`; refusals
//! surface as `Forbidden` (wrong caller), `NotFound` (out of scope) or
//! `Precondition` (illegal transition), never as silent no-ops.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::internship_period;
use crate::entity::internship_request::{self as request, ActiveModel};
use crate::entity::placement;
use crate::error::{AppError, AppResult};
use crate::models::{
    CompanyStatus, PlacementStatus, Principal, RequestResponse, RequestSource, RequestStatus,
    UpdateRequestBody, validate_company_choice,
};
use crate::services::access::{require_active_period, require_coordinator, require_student};
use crate::services::attachments::UploadedFile;
use crate::services::storage::{self, ObjectStore, Storage};

/// Parse a stored status, treating unknown values as data corruption.
pub fn parse_status(raw: &str) -> AppResult<RequestStatus> {
    RequestStatus::parse(raw)
        .ok_or_else(|| AppError::Database(format!("Invalid request status: {}", raw)))
}

fn guard_transition(from: RequestStatus, to: RequestStatus) -> AppResult<()> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(AppError::Precondition(format!(
            "Cannot move a request from {} to {}",
            from, to
        )))
    }
}

/// Get or create the student's request for the active period.
pub async fn my_request(pool: &DbPool, principal: &Principal) -> AppResult<request::Model> {
    let student = require_student(pool, principal).await?;
    let period = require_active_period(pool).await?;

    pool.get_or_create_request(student.id, period.id).await
}

/// Save the student's draft request fields.
///
/// Editing is confined to draft: a request that has entered review keeps
/// its status and content.
pub async fn update_my_request(
    pool: &DbPool,
    principal: &Principal,
    body: UpdateRequestBody,
) -> AppResult<request::Model> {
    let req = my_request(pool, principal).await?;
    let status = parse_status(&req.status)?;

    if status != RequestStatus::Draft {
        return Err(AppError::Precondition(format!(
            "A {} request can no longer be edited",
            status
        )));
    }

    if let Some(company_id) = body.preferred_company_id {
        let company = pool
            .get_company_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {}", company_id)))?;

        let company_status = CompanyStatus::parse(&company.status)
            .ok_or_else(|| AppError::Database(format!("Invalid company status: {}", company.status)))?;
        if company_status != CompanyStatus::Approved {
            return Err(AppError::InvalidInput(
                "preferred_company_id: only approved companies can be selected".to_string(),
            ));
        }
    }

    // Source follows the company choice on every save
    let source = if body.preferred_company_id.is_some() {
        RequestSource::StudentSelected
    } else {
        RequestSource::StudentProposed
    };

    let mut active: ActiveModel = req.into();
    active.preferred_company_id = Set(body.preferred_company_id);
    active.proposed_company_name = Set(body.proposed_company_name);
    active.proposed_company_district = Set(body.proposed_company_district);
    active.proposed_company_address = Set(body.proposed_company_address);
    active.proposed_company_contact = Set(body.proposed_company_contact);
    active.preferred_field = Set(body.preferred_field);
    active.notes = Set(body.notes);
    active.request_source = Set(source.as_str().to_string());
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to save request: {}", e)))?;

    Ok(updated)
}

/// Attach a CV or request letter to the student's draft request.
pub async fn upload_request_document(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    kind: &str,
    file: UploadedFile,
) -> AppResult<request::Model> {
    let req = my_request(pool, principal).await?;
    let status = parse_status(&req.status)?;

    if status != RequestStatus::Draft {
        return Err(AppError::Precondition(format!(
            "Documents cannot be changed on a {} request",
            status
        )));
    }

    let old_key = match kind {
        "cv" => req.cv_key.clone(),
        "request_letter" => req.request_letter_key.clone(),
        other => {
            return Err(AppError::InvalidInput(format!(
                "{}: unknown document kind",
                other
            )));
        }
    };

    let new_key = Storage::request_key(req.id, kind, &file.filename);
    storage::replace_object(
        store,
        old_key.as_deref(),
        &new_key,
        file.data,
        file.content_type.as_deref(),
    )
    .await?;

    let mut active: ActiveModel = req.into();
    match kind {
        "cv" => active.cv_key = Set(Some(new_key)),
        _ => active.request_letter_key = Set(Some(new_key)),
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to save request document: {}", e)))?;

    Ok(updated)
}

/// Submit the student's request.
///
/// Requires exactly one of a preferred company or a proposed company name.
pub async fn submit_my_request(pool: &DbPool, principal: &Principal) -> AppResult<request::Model> {
    let req = my_request(pool, principal).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::Submitted)?;

    let source = validate_company_choice(
        req.preferred_company_id,
        req.proposed_company_name.as_deref().unwrap_or(""),
    )
    .map_err(|msg| AppError::Precondition(msg.to_string()))?;

    let request_id = req.id;
    let mut active: ActiveModel = req.into();
    active.status = Set(RequestStatus::Submitted.as_str().to_string());
    active.request_source = Set(source.as_str().to_string());
    active.submitted_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to submit request: {}", e)))?;

    info!(request_id = %request_id, "Internship request submitted");

    Ok(updated)
}

async fn get_request_or_404(pool: &DbPool, request_id: Uuid) -> AppResult<request::Model> {
    pool.get_request_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {}", request_id)))
}

/// Coordinator takes a submitted request under review.
pub async fn mark_under_review(
    pool: &DbPool,
    principal: &Principal,
    request_id: Uuid,
) -> AppResult<request::Model> {
    require_coordinator(principal)?;

    let req = get_request_or_404(pool, request_id).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::UnderReview)?;

    let mut active: ActiveModel = req.into();
    active.status = Set(RequestStatus::UnderReview.as_str().to_string());
    active.reviewed_by = Set(Some(principal.user_id));
    active.reviewed_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to mark request under review: {}", e)))?;

    Ok(updated)
}

/// Coordinator rejects a request under review. Review notes are mandatory.
pub async fn reject_request(
    pool: &DbPool,
    principal: &Principal,
    request_id: Uuid,
    review_notes: Option<String>,
) -> AppResult<request::Model> {
    require_coordinator(principal)?;

    let notes = review_notes.unwrap_or_default();
    if notes.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "review_notes: a reason is required when rejecting".to_string(),
        ));
    }

    let req = get_request_or_404(pool, request_id).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::Rejected)?;

    let mut active: ActiveModel = req.into();
    active.status = Set(RequestStatus::Rejected.as_str().to_string());
    active.review_notes = Set(Some(notes));
    active.reviewed_by = Set(Some(principal.user_id));
    active.reviewed_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to reject request: {}", e)))?;

    info!(request_id = %request_id, "Internship request rejected");

    Ok(updated)
}

/// Coordinator issues a recommendation letter.
///
/// A proposed (unregistered) company becomes an approved directory entry
/// and is bound to the request as its preferred company.
pub async fn issue_recommendation(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    request_id: Uuid,
    letter: Option<UploadedFile>,
) -> AppResult<request::Model> {
    require_coordinator(principal)?;

    let req = get_request_or_404(pool, request_id).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::Recommended)?;

    let mut preferred_company_id = req.preferred_company_id;
    if preferred_company_id.is_none() {
        let proposed = req
            .proposed_company_name
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        if proposed.is_empty() {
            return Err(AppError::Precondition(
                "Request carries neither a selected nor a proposed company".to_string(),
            ));
        }

        let company = pool
            .get_or_create_company(
                &proposed,
                req.proposed_company_district.clone(),
                req.proposed_company_address.clone(),
                CompanyStatus::Approved,
            )
            .await?;

        info!(request_id = %request_id, company = %company.name, "Proposed company registered");
        preferred_company_id = Some(company.id);
    }

    let mut letter_key = req.recommendation_letter_key.clone();
    if let Some(file) = letter {
        let new_key = Storage::request_key(req.id, "recommendation_letters", &file.filename);
        storage::replace_object(
            store,
            letter_key.as_deref(),
            &new_key,
            file.data,
            file.content_type.as_deref(),
        )
        .await?;
        letter_key = Some(new_key);
    }

    let now = Utc::now();
    let mut active: ActiveModel = req.into();
    active.preferred_company_id = Set(preferred_company_id);
    active.recommendation_letter_key = Set(letter_key);
    active.status = Set(RequestStatus::Recommended.as_str().to_string());
    active.recommendation_issued_at = Set(Some(now));
    active.reviewed_by = Set(Some(principal.user_id));
    active.reviewed_at = Set(Some(now));
    active.updated_at = Set(now);

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to issue recommendation: {}", e)))?;

    info!(request_id = %request_id, "Recommendation issued");

    Ok(updated)
}

/// Student uploads (or re-uploads) the company's acceptance letter.
///
/// The new file is stored before the previous one is deleted, so a failed
/// save never loses both.
pub async fn upload_acceptance_letter(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    file: UploadedFile,
) -> AppResult<request::Model> {
    let student = require_student(pool, principal).await?;
    let period = require_active_period(pool).await?;

    let req = pool
        .get_request_for_student_period(student.id, period.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Internship request".to_string()))?;

    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::AcceptanceUploaded)?;

    let old_key = req.acceptance_letter_key.clone();
    let new_key = Storage::request_key(req.id, "acceptance_letters", &file.filename);
    storage::replace_object(
        store,
        old_key.as_deref(),
        &new_key,
        file.data,
        file.content_type.as_deref(),
    )
    .await?;

    let request_id = req.id;
    let mut active: ActiveModel = req.into();
    active.acceptance_letter_key = Set(Some(new_key));
    active.status = Set(RequestStatus::AcceptanceUploaded.as_str().to_string());
    active.acceptance_uploaded_at = Set(Some(Utc::now()));
    // A re-upload always invalidates any earlier verification
    active.acceptance_verified = Set(false);
    active.acceptance_verified_at = Set(None);
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to store acceptance letter: {}", e)))?;

    info!(request_id = %request_id, "Acceptance letter uploaded");

    Ok(updated)
}

/// Coordinator sends a recommended request back for an acceptance letter.
///
/// Blocked once a letter exists; the comment is mandatory.
pub async fn return_for_acceptance(
    pool: &DbPool,
    principal: &Principal,
    request_id: Uuid,
    comment: String,
) -> AppResult<request::Model> {
    require_coordinator(principal)?;

    if comment.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "coordinator_comment: a comment is required".to_string(),
        ));
    }

    let req = get_request_or_404(pool, request_id).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::ReturnedForAcceptance)?;

    if req.acceptance_letter_key.is_some() {
        return Err(AppError::Precondition(
            "An acceptance letter is already uploaded; nothing to return for".to_string(),
        ));
    }

    let mut active: ActiveModel = req.into();
    active.coordinator_comment = Set(Some(comment));
    active.coordinator_commented_at = Set(Some(Utc::now()));
    active.status = Set(RequestStatus::ReturnedForAcceptance.as_str().to_string());
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to return request: {}", e)))?;

    Ok(updated)
}

/// Coordinator verifies the acceptance letter and assigns a university
/// supervisor in one atomic operation.
///
/// The request status change and the placement creation/update commit
/// together or not at all; a request is never left verified without its
/// placement.
pub async fn verify_acceptance_and_assign(
    pool: &DbPool,
    principal: &Principal,
    request_id: Uuid,
    university_supervisor_id: Uuid,
) -> AppResult<(request::Model, placement::Model)> {
    require_coordinator(principal)?;

    let req = get_request_or_404(pool, request_id).await?;
    let status = parse_status(&req.status)?;
    guard_transition(status, RequestStatus::AcceptanceVerified)?;

    if req.acceptance_letter_key.is_none() {
        return Err(AppError::Precondition(
            "No acceptance letter is stored for this request".to_string(),
        ));
    }

    let company_id = req.preferred_company_id.ok_or_else(|| {
        AppError::Precondition("No company is attached to this request".to_string())
    })?;

    let supervisor = pool
        .get_staff_profile_by_id(university_supervisor_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Staff profile {}", university_supervisor_id))
        })?;

    let period = internship_period::Entity::find_by_id(req.period_id)
        .one(pool.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to load period: {}", e)))?
        .ok_or_else(|| AppError::NotFound("Internship period".to_string()))?;

    let txn = pool
        .connection()
        .begin()
        .await
        .map_err(|e| AppError::Database(format!("Failed to open transaction: {}", e)))?;

    let now = Utc::now();

    let mut active: ActiveModel = req.into();
    active.acceptance_verified = Set(true);
    active.acceptance_verified_at = Set(Some(now));
    active.status = Set(RequestStatus::AcceptanceVerified.as_str().to_string());
    active.reviewed_by = Set(Some(principal.user_id));
    active.reviewed_at = Set(Some(now));
    active.updated_at = Set(now);

    let updated_request = active
        .update(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to verify acceptance: {}", e)))?;

    // Get-or-create keyed by the 1:1 request relation, then force the
    // company, supervisor and active status onto whichever row won.
    let existing = placement::Entity::find()
        .filter(placement::Column::RequestId.eq(request_id))
        .one(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up placement: {}", e)))?;

    let placement_row = match existing {
        Some(found) => {
            let mut active: placement::ActiveModel = found.into();
            active.company_id = Set(company_id);
            active.university_supervisor_id = Set(Some(supervisor.id));
            active.status = Set(PlacementStatus::Active.as_str().to_string());
            active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to update placement: {}", e)))?
        }
        None => {
            let model = placement::ActiveModel {
                id: Set(Uuid::now_v7()),
                request_id: Set(request_id),
                company_id: Set(company_id),
                industry_supervisor_id: Set(None),
                university_supervisor_id: Set(Some(supervisor.id)),
                start_date: Set(period.start_date),
                end_date: Set(period.end_date),
                placement_letter_key: Set(None),
                status: Set(PlacementStatus::Active.as_str().to_string()),
                created_at: Set(now),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to create placement: {}", e)))?
        }
    };

    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit verification: {}", e)))?;

    info!(
        request_id = %request_id,
        placement_id = %placement_row.id,
        "Acceptance verified and placement activated"
    );

    Ok((updated_request, placement_row))
}

/// Student downloads their recommendation letter.
pub async fn download_recommendation_letter(
    pool: &DbPool,
    store: &dyn ObjectStore,
    principal: &Principal,
    request_id: Uuid,
) -> AppResult<(Vec<u8>, Option<String>)> {
    let student = require_student(pool, principal).await?;

    let req = get_request_or_404(pool, request_id).await?;
    if req.student_id != student.id {
        return Err(AppError::NotFound(format!("Request {}", request_id)));
    }

    let key = req
        .recommendation_letter_key
        .ok_or_else(|| AppError::NotFound("Recommendation letter".to_string()))?;

    store.get(&key).await
}

/// Build the API response for a request.
pub async fn request_response(pool: &DbPool, req: request::Model) -> AppResult<RequestResponse> {
    let student = pool
        .get_student_profile_by_id(req.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {}", req.student_id)))?;

    let preferred_company_name = match req.preferred_company_id {
        Some(company_id) => pool.get_company_by_id(company_id).await?.map(|c| c.name),
        None => None,
    };

    let status = parse_status(&req.status)?;
    let source = RequestSource::parse(&req.request_source)
        .ok_or_else(|| AppError::Database(format!("Invalid request source: {}", req.request_source)))?;

    Ok(RequestResponse {
        id: req.id,
        period_id: req.period_id,
        student_reg_no: student.reg_no,
        source,
        status,
        preferred_company_id: req.preferred_company_id,
        preferred_company_name,
        proposed_company_name: req.proposed_company_name,
        proposed_company_district: req.proposed_company_district,
        proposed_company_address: req.proposed_company_address,
        proposed_company_contact: req.proposed_company_contact,
        preferred_field: req.preferred_field,
        notes: req.notes,
        cv_key: req.cv_key,
        request_letter_key: req.request_letter_key,
        recommendation_letter_key: req.recommendation_letter_key,
        acceptance_letter_key: req.acceptance_letter_key,
        coordinator_comment: req.coordinator_comment,
        review_notes: req.review_notes,
        submitted_at: req.submitted_at,
        reviewed_at: req.reviewed_at,
        recommendation_issued_at: req.recommendation_issued_at,
        acceptance_uploaded_at: req.acceptance_uploaded_at,
        acceptance_verified: req.acceptance_verified,
        acceptance_verified_at: req.acceptance_verified_at,
    })
}
