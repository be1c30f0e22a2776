//! Database queries for internship requests.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::internship_period::{self, Entity as Period};
use crate::entity::internship_request::{self as request, ActiveModel, Entity as Request};
use crate::entity::student_profile;
use crate::error::{AppError, AppResult};
use crate::models::{RequestSource, RequestStatus};

use super::{is_unique_violation, DbPool};

impl DbPool {
    /// The currently active internship period, if any.
    pub async fn get_active_period(&self) -> AppResult<Option<internship_period::Model>> {
        let result = Period::find()
            .filter(internship_period::Column::IsActive.eq(true))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get active period: {}", e)))?;

        Ok(result)
    }

    /// Get a request by ID.
    pub async fn get_request_by_id(&self, id: Uuid) -> AppResult<Option<request::Model>> {
        let result = Request::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get request: {}", e)))?;

        Ok(result)
    }

    /// Get the request for a (student, period) pair.
    pub async fn get_request_for_student_period(
        &self,
        student_id: Uuid,
        period_id: Uuid,
    ) -> AppResult<Option<request::Model>> {
        let result = Request::find()
            .filter(request::Column::StudentId.eq(student_id))
            .filter(request::Column::PeriodId.eq(period_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get request: {}", e)))?;

        Ok(result)
    }

    /// Get or create the request for a (student, period) pair.
    ///
    /// Insert first; the UNIQUE (student_id, period_id) index resolves
    /// races, with the loser re-fetching the winner's row.
    pub async fn get_or_create_request(
        &self,
        student_id: Uuid,
        period_id: Uuid,
    ) -> AppResult<request::Model> {
        if let Some(existing) = self
            .get_request_for_student_period(student_id, period_id)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(student_id),
            period_id: Set(period_id),
            request_source: Set(RequestSource::StudentSelected.as_str().to_string()),
            status: Set(RequestStatus::Draft.as_str().to_string()),
            acceptance_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .get_request_for_student_period(student_id, period_id)
                .await?
                .ok_or_else(|| AppError::Database("Request vanished after conflict".to_string())),
            Err(e) => Err(AppError::Database(format!(
                "Failed to create request: {}",
                e
            ))),
        }
    }

    /// List requests in the given statuses with their students, newest
    /// submissions first.
    pub async fn list_requests_by_statuses(
        &self,
        statuses: &[RequestStatus],
    ) -> AppResult<Vec<(request::Model, Option<student_profile::Model>)>> {
        let status_strs: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();

        let results = Request::find()
            .filter(request::Column::Status.is_in(status_strs))
            .order_by_desc(request::Column::SubmittedAt)
            .find_also_related(student_profile::Entity)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list requests: {}", e)))?;

        Ok(results)
    }

    /// List requests waiting for an acceptance letter: recommended or
    /// returned, with no letter stored yet.
    pub async fn list_requests_waiting_for_acceptance(
        &self,
    ) -> AppResult<Vec<(request::Model, Option<student_profile::Model>)>> {
        let results = Request::find()
            .filter(request::Column::Status.is_in([
                RequestStatus::Recommended.as_str(),
                RequestStatus::ReturnedForAcceptance.as_str(),
            ]))
            .filter(request::Column::AcceptanceLetterKey.is_null())
            .order_by_desc(request::Column::RecommendationIssuedAt)
            .find_also_related(student_profile::Entity)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list waiting requests: {}", e))
            })?;

        Ok(results)
    }

    /// Count requests per status for the coordinator dashboard.
    pub async fn count_requests_by_status(&self, status: RequestStatus) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;

        let count = Request::find()
            .filter(request::Column::Status.eq(status.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count requests: {}", e)))?;

        Ok(count)
    }
}
