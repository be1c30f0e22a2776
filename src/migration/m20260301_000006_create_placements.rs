//! Migration: Create placements.
//!
//! The UNIQUE request_id index backs the get-or-create keyed by the 1:1
//! request relation, so retried verifications cannot duplicate a placement.

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
                CREATE TABLE placements (
                    id UUID PRIMARY KEY,
                    request_id UUID NOT NULL UNIQUE REFERENCES internship_requests(id) ON DELETE RESTRICT,
                    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
                    industry_supervisor_id UUID REFERENCES company_contacts(id) ON DELETE SET NULL,
                    university_supervisor_id UUID REFERENCES staff_profiles(id) ON DELETE SET NULL,

                    start_date DATE NOT NULL,
                    end_date DATE NOT NULL,

                    placement_letter_key VARCHAR(500),

                    status VARCHAR(30) NOT NULL DEFAULT 'pending_student_ack'
                        CHECK (status IN ('pending_student_ack', 'active', 'on_hold', 'completed', 'terminated')),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CHECK (start_date <= end_date)
                );

                CREATE INDEX idx_placements_company ON placements(company_id);
                CREATE INDEX idx_placements_university_supervisor ON placements(university_supervisor_id);
                CREATE INDEX idx_placements_status ON placements(status);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS placements CASCADE;")
            .await?;

        Ok(())
    }
}
