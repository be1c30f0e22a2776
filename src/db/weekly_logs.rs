//! Database queries for weekly logs and their per-day entries.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::placement;
use crate::entity::weekly_log::{self as weekly_log, ActiveModel, Entity as WeeklyLog};
use crate::entity::weekly_log_entry::{self as log_entry, Entity as WeeklyLogEntry};
use crate::error::{AppError, AppResult};
use crate::models::{Weekday, WeeklyLogStatus};

use super::{is_unique_violation, DbPool};

impl DbPool {
    /// Get a weekly log by ID.
    pub async fn get_weekly_log_by_id(&self, id: Uuid) -> AppResult<Option<weekly_log::Model>> {
        let result = WeeklyLog::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get weekly log: {}", e)))?;

        Ok(result)
    }

    /// Highest week number recorded for a placement, if any.
    pub async fn get_max_week_no(&self, placement_id: Uuid) -> AppResult<Option<i32>> {
        let result = WeeklyLog::find()
            .filter(weekly_log::Column::PlacementId.eq(placement_id))
            .order_by_desc(weekly_log::Column::WeekNo)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get max week number: {}", e)))?;

        Ok(result.map(|log| log.week_no))
    }

    /// Insert a weekly log row.
    ///
    /// The UNIQUE (placement_id, week_no) index rejects a concurrent
    /// duplicate; the caller surfaces that as a precondition failure.
    pub async fn insert_weekly_log(
        &self,
        placement_id: Uuid,
        week_no: i32,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> AppResult<weekly_log::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            placement_id: Set(placement_id),
            week_no: Set(week_no),
            from_date: Set(from_date),
            to_date: Set(to_date),
            activities: Set(String::new()),
            status: Set(WeeklyLogStatus::Draft.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => Err(AppError::Precondition(format!(
                "A log for week {} already exists",
                week_no
            ))),
            Err(e) => Err(AppError::Database(format!(
                "Failed to insert weekly log: {}",
                e
            ))),
        }
    }

    /// Seed any missing weekday entries for a log.
    pub async fn seed_missing_entries(&self, log_id: Uuid) -> AppResult<()> {
        let existing = self.get_log_entries(log_id).await?;
        let have: Vec<&str> = existing.iter().map(|e| e.day.as_str()).collect();

        for day in Weekday::ALL {
            if have.contains(&day.as_str()) {
                continue;
            }

            let model = log_entry::ActiveModel {
                id: Set(Uuid::now_v7()),
                weekly_log_id: Set(log_id),
                day: Set(day.as_str().to_string()),
                work_assignment: Set(String::new()),
                activities_steps: Set(String::new()),
            };

            // A concurrent seed may have inserted the same day; the unique
            // index makes that harmless.
            match model.insert(self.connection()).await {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {}
                Err(e) => {
                    return Err(AppError::Database(format!(
                        "Failed to seed log entry: {}",
                        e
                    )));
                }
            }
        }

        Ok(())
    }

    /// Entries for a log in weekday order.
    pub async fn get_log_entries(&self, log_id: Uuid) -> AppResult<Vec<log_entry::Model>> {
        let mut entries = WeeklyLogEntry::find()
            .filter(log_entry::Column::WeeklyLogId.eq(log_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get log entries: {}", e)))?;

        entries.sort_by_key(|e| Weekday::parse(&e.day).map(|d| d.order()).unwrap_or(u8::MAX));
        Ok(entries)
    }

    /// Update one per-day entry's content.
    pub async fn update_log_entry(
        &self,
        log_id: Uuid,
        day: Weekday,
        work_assignment: Option<String>,
        activities_steps: Option<String>,
    ) -> AppResult<()> {
        let entry = WeeklyLogEntry::find()
            .filter(log_entry::Column::WeeklyLogId.eq(log_id))
            .filter(log_entry::Column::Day.eq(day.as_str()))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get log entry: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Log entry for {}", day.as_str())))?;

        let mut active: log_entry::ActiveModel = entry.into();
        if let Some(wa) = work_assignment {
            active.work_assignment = Set(wa);
        }
        if let Some(st) = activities_steps {
            active.activities_steps = Set(st);
        }

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update log entry: {}", e)))?;

        Ok(())
    }

    /// Logs for a placement, newest week first.
    pub async fn list_logs_for_placement(
        &self,
        placement_id: Uuid,
    ) -> AppResult<Vec<weekly_log::Model>> {
        let logs = WeeklyLog::find()
            .filter(weekly_log::Column::PlacementId.eq(placement_id))
            .order_by_desc(weekly_log::Column::WeekNo)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list logs: {}", e)))?;

        Ok(logs)
    }

    /// Logs in a status across a company's placements.
    pub async fn list_logs_for_company_by_status(
        &self,
        company_id: Uuid,
        status: WeeklyLogStatus,
    ) -> AppResult<Vec<weekly_log::Model>> {
        let logs = WeeklyLog::find()
            .join(JoinType::InnerJoin, weekly_log::Relation::Placement.def())
            .filter(placement::Column::CompanyId.eq(company_id))
            .filter(weekly_log::Column::Status.eq(status.as_str()))
            .order_by_desc(weekly_log::Column::WeekNo)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list company logs: {}", e)))?;

        Ok(logs)
    }

    /// Company-approved logs across a university supervisor's active placements.
    pub async fn list_approved_logs_for_university_supervisor(
        &self,
        staff_id: Uuid,
    ) -> AppResult<Vec<weekly_log::Model>> {
        let logs = WeeklyLog::find()
            .join(JoinType::InnerJoin, weekly_log::Relation::Placement.def())
            .filter(placement::Column::UniversitySupervisorId.eq(staff_id))
            .filter(placement::Column::Status.eq(crate::models::PlacementStatus::Active.as_str()))
            .filter(weekly_log::Column::Status.eq(WeeklyLogStatus::ApprovedByCompany.as_str()))
            .order_by_desc(weekly_log::Column::WeekNo)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list approved logs: {}", e)))?;

        Ok(logs)
    }

    /// Whether a submitted-or-approved log overlaps the given week.
    ///
    /// Inclusive overlap: from_date <= week_end AND to_date >= week_start.
    /// Shared by the coordinator missing-log view and the reminder scan.
    pub async fn has_log_covering_week(
        &self,
        placement_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> AppResult<bool> {
        let count = WeeklyLog::find()
            .filter(weekly_log::Column::PlacementId.eq(placement_id))
            .filter(weekly_log::Column::Status.is_in([
                WeeklyLogStatus::Submitted.as_str(),
                WeeklyLogStatus::ApprovedByCompany.as_str(),
            ]))
            .filter(weekly_log::Column::FromDate.lte(week_end))
            .filter(weekly_log::Column::ToDate.gte(week_start))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check weekly coverage: {}", e)))?;

        Ok(count > 0)
    }

    /// Count logs per status for the coordinator dashboard.
    pub async fn count_logs_by_status(&self, status: WeeklyLogStatus) -> AppResult<u64> {
        let count = WeeklyLog::find()
            .filter(weekly_log::Column::Status.eq(status.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count logs: {}", e)))?;

        Ok(count)
    }

    /// Delete a weekly log row (entries cascade).
    pub async fn delete_weekly_log(&self, log: weekly_log::Model) -> AppResult<()> {
        log.delete(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete weekly log: {}", e)))?;

        Ok(())
    }
}
