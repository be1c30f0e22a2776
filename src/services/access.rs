//! Capability checks shared by every workflow operation.
//!
//! One function per role predicate; operations call these instead of
//! checking memberships inline. Role failures are `Forbidden`, missing
//! scope records are `Forbidden` too (the account is not set up), while
//! out-of-scope entities surface as `NotFound` at the call sites.

use crate::db::DbPool;
use crate::entity::industry_supervisor_profile;
use crate::entity::internship_period;
use crate::entity::staff_profile;
use crate::entity::student_profile;
use crate::error::{AppError, AppResult};
use crate::models::Principal;

/// Resolve the caller's student profile, refusing non-students.
pub async fn require_student(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<student_profile::Model> {
    if !principal.is_student() {
        return Err(AppError::Forbidden("Students only".to_string()));
    }

    pool.get_student_profile_by_user(principal.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("No student profile is linked to this account".to_string())
        })
}

/// Refuse non-coordinators.
pub fn require_coordinator(principal: &Principal) -> AppResult<()> {
    if principal.is_coordinator() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Coordinators only".to_string()))
    }
}

/// Resolve the caller's staff profile, refusing non-university-supervisors.
pub async fn require_university_supervisor(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<staff_profile::Model> {
    if !principal.is_university_supervisor() {
        return Err(AppError::Forbidden("University supervisors only".to_string()));
    }

    pool.get_staff_profile_by_user(principal.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("No staff profile is linked to this account".to_string())
        })
}

/// Resolve the caller's industry profile, refusing non-industry-supervisors.
pub async fn require_industry_supervisor(
    pool: &DbPool,
    principal: &Principal,
) -> AppResult<industry_supervisor_profile::Model> {
    if !principal.is_industry_supervisor() {
        return Err(AppError::Forbidden("Industry supervisors only".to_string()));
    }

    pool.get_industry_profile_by_user(principal.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden(
                "No industry supervisor profile is linked to this account".to_string(),
            )
        })
}

/// The active period, or not-found when none is open.
pub async fn require_active_period(pool: &DbPool) -> AppResult<internship_period::Model> {
    pool.get_active_period()
        .await?
        .ok_or_else(|| AppError::NotFound("Active internship period".to_string()))
}
