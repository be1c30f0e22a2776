//! Database queries for users and role profiles.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::industry_supervisor_profile::{
    self as industry_profile, Entity as IndustryProfile,
};
use crate::entity::staff_profile::{self, Entity as StaffProfile};
use crate::entity::student_profile::{self, Entity as StudentProfile};
use crate::entity::user::{self, Entity as User};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Get a user by ID.
    pub async fn get_user_by_id(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        let result = User::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))?;

        Ok(result)
    }

    /// Get the student profile for a user, if any.
    pub async fn get_student_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<student_profile::Model>> {
        let result = StudentProfile::find()
            .filter(student_profile::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get student profile: {}", e)))?;

        Ok(result)
    }

    /// Get a student profile by its ID.
    pub async fn get_student_profile_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<student_profile::Model>> {
        let result = StudentProfile::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get student profile: {}", e)))?;

        Ok(result)
    }

    /// Get the staff profile for a user, if any.
    pub async fn get_staff_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<staff_profile::Model>> {
        let result = StaffProfile::find()
            .filter(staff_profile::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get staff profile: {}", e)))?;

        Ok(result)
    }

    /// Get a staff profile by its ID.
    pub async fn get_staff_profile_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<staff_profile::Model>> {
        let result = StaffProfile::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get staff profile: {}", e)))?;

        Ok(result)
    }

    /// Get the industry supervisor profile for a user, if any.
    pub async fn get_industry_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<industry_profile::Model>> {
        let result = IndustryProfile::find()
            .filter(industry_profile::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get industry supervisor profile: {}", e))
            })?;

        Ok(result)
    }

    /// Display name for a user ID, falling back to "unknown" for missing rows.
    pub async fn display_name_for(&self, user_id: Uuid) -> AppResult<String> {
        Ok(self
            .get_user_by_id(user_id)
            .await?
            .map(|u| u.display_name())
            .unwrap_or_else(|| "unknown".to_string()))
    }
}
