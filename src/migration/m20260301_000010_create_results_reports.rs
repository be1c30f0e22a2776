//! Migration: Create supervisor results reports.

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
                CREATE TABLE results_reports (
                    id UUID PRIMARY KEY,
                    supervisor_user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,

                    -- Point-in-time snapshot of per-student score rows
                    rows JSONB NOT NULL DEFAULT '[]'::jsonb,

                    status VARCHAR(20) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted', 'received')),
                    submitted_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_results_reports_supervisor ON results_reports(supervisor_user_id);
                CREATE INDEX idx_results_reports_status ON results_reports(status);

                CREATE TRIGGER update_results_reports_updated_at
                    BEFORE UPDATE ON results_reports
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_results_reports_updated_at ON results_reports;
                DROP TABLE IF EXISTS results_reports CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
