//! Migration: Create weekly logs and per-day entries.
//!
//! UNIQUE (placement_id, week_no) and UNIQUE (weekly_log_id, day) back the
//! get-or-create paths for log creation and entry seeding.

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
                CREATE TABLE weekly_logs (
                    id UUID PRIMARY KEY,
                    placement_id UUID NOT NULL REFERENCES placements(id) ON DELETE CASCADE,
                    week_no INTEGER NOT NULL CHECK (week_no >= 1),
                    from_date DATE NOT NULL,
                    to_date DATE NOT NULL,

                    activities TEXT NOT NULL DEFAULT '',
                    challenges TEXT,
                    lessons TEXT,
                    attachment_key VARCHAR(500),

                    status VARCHAR(20) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted', 'returned_for_edit', 'approved_by_company')),
                    submitted_at TIMESTAMPTZ,

                    company_action_by UUID REFERENCES users(id) ON DELETE SET NULL,
                    company_action_at TIMESTAMPTZ,
                    return_reason TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CHECK (from_date <= to_date)
                );

                CREATE UNIQUE INDEX idx_weekly_logs_placement_week
                    ON weekly_logs(placement_id, week_no);

                CREATE INDEX idx_weekly_logs_status ON weekly_logs(status);
                CREATE INDEX idx_weekly_logs_dates ON weekly_logs(from_date, to_date);

                CREATE TABLE weekly_log_entries (
                    id UUID PRIMARY KEY,
                    weekly_log_id UUID NOT NULL REFERENCES weekly_logs(id) ON DELETE CASCADE,
                    day VARCHAR(3) NOT NULL
                        CHECK (day IN ('mon', 'tue', 'wed', 'thu', 'fri')),
                    work_assignment TEXT NOT NULL DEFAULT '',
                    activities_steps TEXT NOT NULL DEFAULT ''
                );

                CREATE UNIQUE INDEX idx_weekly_log_entries_log_day
                    ON weekly_log_entries(weekly_log_id, day);
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
                DROP TABLE IF EXISTS weekly_log_entries CASCADE;
                DROP TABLE IF EXISTS weekly_logs CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
