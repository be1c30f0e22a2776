//! Database queries for site visits.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::site_visit::{self, ActiveModel, Entity as SiteVisit};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Record a site visit. Visits are append-only.
    pub async fn insert_site_visit(
        &self,
        placement_id: Uuid,
        supervisor_id: Uuid,
        visit_date: NaiveDate,
        findings: String,
        recommendations: Option<String>,
        attachment_key: Option<String>,
    ) -> AppResult<site_visit::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            placement_id: Set(placement_id),
            supervisor_id: Set(supervisor_id),
            visit_date: Set(visit_date),
            findings: Set(findings),
            recommendations: Set(recommendations),
            attachment_key: Set(attachment_key),
            created_at: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert site visit: {}", e)))?;

        Ok(result)
    }

    /// Visits for a placement, most recent first.
    pub async fn list_site_visits_for_placement(
        &self,
        placement_id: Uuid,
    ) -> AppResult<Vec<site_visit::Model>> {
        let visits = SiteVisit::find()
            .filter(site_visit::Column::PlacementId.eq(placement_id))
            .order_by_desc(site_visit::Column::VisitDate)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list site visits: {}", e)))?;

        Ok(visits)
    }

    /// Visits recorded by a supervisor, most recent first.
    pub async fn list_site_visits_for_supervisor(
        &self,
        supervisor_id: Uuid,
    ) -> AppResult<Vec<site_visit::Model>> {
        let visits = SiteVisit::find()
            .filter(site_visit::Column::SupervisorId.eq(supervisor_id))
            .order_by_desc(site_visit::Column::VisitDate)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list site visits: {}", e)))?;

        Ok(visits)
    }
}
