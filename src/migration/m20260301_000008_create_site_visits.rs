//! Migration: Create site visits.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE site_visits (
                    id UUID PRIMARY KEY,
                    placement_id UUID NOT NULL REFERENCES placements(id) ON DELETE CASCADE,
                    supervisor_id UUID NOT NULL REFERENCES staff_profiles(id) ON DELETE RESTRICT,
                    visit_date DATE NOT NULL,
                    findings TEXT NOT NULL,
                    recommendations TEXT,
                    attachment_key VARCHAR(500),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_site_visits_placement ON site_visits(placement_id, visit_date DESC);
                CREATE INDEX idx_site_visits_supervisor ON site_visits(supervisor_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS site_visits CASCADE;")
            .await?;

        Ok(())
    }
}
