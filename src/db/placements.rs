//! Database queries for placements.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::internship_request as request;
use crate::entity::placement::{self, ActiveModel, Entity as Placement};
use crate::error::{AppError, AppResult};
use crate::models::PlacementStatus;

use super::DbPool;

/// Student and company display fields joined onto a placement.
#[derive(Debug, Clone)]
pub struct PlacementDisplay {
    pub placement: placement::Model,
    pub student_user_id: Uuid,
    pub student_reg_no: String,
    pub student_name: String,
    pub student_email: String,
    pub company_name: String,
}

impl DbPool {
    /// Get a placement by ID.
    pub async fn get_placement_by_id(&self, id: Uuid) -> AppResult<Option<placement::Model>> {
        let result = Placement::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get placement: {}", e)))?;

        Ok(result)
    }

    /// Get the placement for a request (1:1).
    pub async fn get_placement_by_request_id(
        &self,
        request_id: Uuid,
    ) -> AppResult<Option<placement::Model>> {
        let result = Placement::find()
            .filter(placement::Column::RequestId.eq(request_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get placement: {}", e)))?;

        Ok(result)
    }

    /// The student's active placement, newest first.
    pub async fn get_active_placement_for_student(
        &self,
        student_id: Uuid,
    ) -> AppResult<Option<placement::Model>> {
        let result = Placement::find()
            .join(JoinType::InnerJoin, placement::Relation::Request.def())
            .filter(request::Column::StudentId.eq(student_id))
            .filter(placement::Column::Status.eq(PlacementStatus::Active.as_str()))
            .order_by_desc(placement::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get active placement: {}", e)))?;

        Ok(result)
    }

    /// The student's most recent placement regardless of status.
    pub async fn get_latest_placement_for_student(
        &self,
        student_id: Uuid,
    ) -> AppResult<Option<placement::Model>> {
        let result = Placement::find()
            .join(JoinType::InnerJoin, placement::Relation::Request.def())
            .filter(request::Column::StudentId.eq(student_id))
            .order_by_desc(placement::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest placement: {}", e)))?;

        Ok(result)
    }

    /// Non-terminal placements assigned to a university supervisor.
    pub async fn list_placements_for_university_supervisor(
        &self,
        staff_id: Uuid,
    ) -> AppResult<Vec<placement::Model>> {
        let results = Placement::find()
            .filter(placement::Column::UniversitySupervisorId.eq(staff_id))
            .filter(placement::Column::Status.is_not_in([
                PlacementStatus::Completed.as_str(),
                PlacementStatus::Terminated.as_str(),
            ]))
            .order_by_desc(placement::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list supervisor placements: {}", e))
            })?;

        Ok(results)
    }

    /// Non-terminal placements hosted by a company.
    pub async fn list_placements_for_company(
        &self,
        company_id: Uuid,
    ) -> AppResult<Vec<placement::Model>> {
        let results = Placement::find()
            .filter(placement::Column::CompanyId.eq(company_id))
            .filter(placement::Column::Status.is_not_in([
                PlacementStatus::Completed.as_str(),
                PlacementStatus::Terminated.as_str(),
            ]))
            .order_by_desc(placement::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list company placements: {}", e)))?;

        Ok(results)
    }

    /// All non-terminal placements (coordinator views and the reminder scan).
    pub async fn list_non_terminal_placements(&self) -> AppResult<Vec<placement::Model>> {
        let results = Placement::find()
            .filter(placement::Column::Status.is_not_in([
                PlacementStatus::Completed.as_str(),
                PlacementStatus::Terminated.as_str(),
            ]))
            .order_by_desc(placement::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list placements: {}", e)))?;

        Ok(results)
    }

    /// Count placements in a given status.
    pub async fn count_placements_by_status(&self, status: PlacementStatus) -> AppResult<u64> {
        let count = Placement::find()
            .filter(placement::Column::Status.eq(status.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count placements: {}", e)))?;

        Ok(count)
    }

    /// Update a placement's status.
    pub async fn update_placement_status(
        &self,
        id: Uuid,
        status: PlacementStatus,
    ) -> AppResult<placement::Model> {
        let placement = self
            .get_placement_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Placement {}", id)))?;

        let mut active: ActiveModel = placement.into();
        active.status = Set(status.as_str().to_string());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update placement status: {}", e)))?;

        Ok(result)
    }

    /// Assign or replace placement supervisors.
    pub async fn assign_placement_supervisors(
        &self,
        id: Uuid,
        industry_supervisor_id: Option<Uuid>,
        university_supervisor_id: Option<Uuid>,
    ) -> AppResult<placement::Model> {
        let placement = self
            .get_placement_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Placement {}", id)))?;

        let mut active: ActiveModel = placement.into();
        if industry_supervisor_id.is_some() {
            active.industry_supervisor_id = Set(industry_supervisor_id);
        }
        if university_supervisor_id.is_some() {
            active.university_supervisor_id = Set(university_supervisor_id);
        }

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to assign supervisors: {}", e)))?;

        Ok(result)
    }

    /// Join student and company display fields onto a placement.
    pub async fn get_placement_display(
        &self,
        placement: placement::Model,
    ) -> AppResult<PlacementDisplay> {
        let request = self
            .get_request_by_id(placement.request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {}", placement.request_id)))?;

        let student = self
            .get_student_profile_by_id(request.student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {}", request.student_id)))?;

        let user = self
            .get_user_by_id(student.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", student.user_id)))?;

        let company = self
            .get_company_by_id(placement.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {}", placement.company_id)))?;

        Ok(PlacementDisplay {
            placement,
            student_user_id: user.id,
            student_reg_no: student.reg_no,
            student_name: user.display_name(),
            student_email: user.email,
            company_name: company.name,
        })
    }

    /// Display rows for a batch of placements, preserving order.
    pub async fn get_placement_displays(
        &self,
        placements: Vec<placement::Model>,
    ) -> AppResult<Vec<PlacementDisplay>> {
        let mut displays = Vec::with_capacity(placements.len());
        for placement in placements {
            displays.push(self.get_placement_display(placement).await?);
        }
        Ok(displays)
    }

}
