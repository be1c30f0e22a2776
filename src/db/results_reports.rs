//! Database queries for supervisor results reports.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::results_report::{self as report, ActiveModel, Entity as ResultsReport};
use crate::error::{AppError, AppResult};
use crate::models::{ReportStatus, ResultRow};

use super::DbPool;

impl DbPool {
    /// Get a results report by ID.
    pub async fn get_results_report_by_id(&self, id: Uuid) -> AppResult<Option<report::Model>> {
        let result = ResultsReport::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get results report: {}", e)))?;

        Ok(result)
    }

    /// The supervisor's most recent report, submitted ones first.
    pub async fn get_latest_report_for_supervisor(
        &self,
        supervisor_user_id: Uuid,
    ) -> AppResult<Option<report::Model>> {
        let result = ResultsReport::find()
            .filter(report::Column::SupervisorUserId.eq(supervisor_user_id))
            .order_by_desc(report::Column::SubmittedAt)
            .order_by_desc(report::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest report: {}", e)))?;

        Ok(result)
    }

    /// The supervisor's newest non-submitted report, if any.
    pub async fn get_open_report_for_supervisor(
        &self,
        supervisor_user_id: Uuid,
    ) -> AppResult<Option<report::Model>> {
        let result = ResultsReport::find()
            .filter(report::Column::SupervisorUserId.eq(supervisor_user_id))
            .filter(report::Column::Status.ne(ReportStatus::Submitted.as_str()))
            .filter(report::Column::Status.ne(ReportStatus::Received.as_str()))
            .order_by_desc(report::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get open report: {}", e)))?;

        Ok(result)
    }

    /// Create a report with the given snapshot rows.
    pub async fn insert_results_report(
        &self,
        supervisor_user_id: Uuid,
        rows: &[ResultRow],
        status: ReportStatus,
        submitted_at: Option<chrono::DateTime<Utc>>,
    ) -> AppResult<report::Model> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            supervisor_user_id: Set(supervisor_user_id),
            rows: Set(serde_json::to_value(rows)?),
            status: Set(status.as_str().to_string()),
            submitted_at: Set(submitted_at),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert results report: {}", e)))?;

        Ok(result)
    }

    /// Overwrite a report's snapshot and mark it submitted.
    pub async fn submit_results_report(
        &self,
        existing: report::Model,
        rows: &[ResultRow],
    ) -> AppResult<report::Model> {
        let mut active: ActiveModel = existing.into();
        active.rows = Set(serde_json::to_value(rows)?);
        active.status = Set(ReportStatus::Submitted.as_str().to_string());
        active.submitted_at = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to submit results report: {}", e)))?;

        Ok(result)
    }

    /// Acknowledge a submitted report.
    pub async fn mark_results_report_received(
        &self,
        existing: report::Model,
    ) -> AppResult<report::Model> {
        let mut active: ActiveModel = existing.into();
        active.status = Set(ReportStatus::Received.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark report received: {}", e)))?;

        Ok(result)
    }

    /// Submitted and received reports, newest submissions first.
    pub async fn list_visible_results_reports(&self) -> AppResult<Vec<report::Model>> {
        let results = ResultsReport::find()
            .filter(report::Column::Status.is_in([
                ReportStatus::Submitted.as_str(),
                ReportStatus::Received.as_str(),
            ]))
            .order_by_desc(report::Column::SubmittedAt)
            .order_by_desc(report::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list results reports: {}", e)))?;

        Ok(results)
    }

    /// Decode a report's snapshot rows.
    pub fn decode_report_rows(report: &report::Model) -> AppResult<Vec<ResultRow>> {
        let rows: Vec<ResultRow> = serde_json::from_value(report.rows.clone())?;
        Ok(rows)
    }
}
