//! Migration: Create internship requests.
//!
//! The UNIQUE (student_id, period_id) index is the concurrency guard for
//! the one-request-per-period invariant.

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
                CREATE TABLE internship_requests (
                    id UUID PRIMARY KEY,
                    student_id UUID NOT NULL REFERENCES student_profiles(id) ON DELETE CASCADE,
                    period_id UUID NOT NULL REFERENCES internship_periods(id) ON DELETE RESTRICT,
                    request_source VARCHAR(30) NOT NULL
                        CHECK (request_source IN ('student_selected', 'student_proposed', 'university_assigned')),

                    preferred_company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
                    proposed_company_name VARCHAR(200),
                    proposed_company_district VARCHAR(120),
                    proposed_company_address VARCHAR(255),
                    proposed_company_contact VARCHAR(200),

                    preferred_field VARCHAR(120),
                    notes TEXT,

                    -- Attachment storage keys
                    cv_key VARCHAR(500),
                    request_letter_key VARCHAR(500),
                    recommendation_letter_key VARCHAR(500),
                    acceptance_letter_key VARCHAR(500),

                    status VARCHAR(40) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted', 'under_review', 'recommended',
                                          'acceptance_uploaded', 'acceptance_verified',
                                          'rejected', 'returned_for_acceptance')),
                    submitted_at TIMESTAMPTZ,

                    reviewed_by UUID REFERENCES users(id) ON DELETE SET NULL,
                    reviewed_at TIMESTAMPTZ,
                    review_notes TEXT,

                    coordinator_comment TEXT,
                    coordinator_commented_at TIMESTAMPTZ,

                    recommendation_issued_at TIMESTAMPTZ,
                    acceptance_uploaded_at TIMESTAMPTZ,
                    acceptance_verified BOOLEAN NOT NULL DEFAULT FALSE,
                    acceptance_verified_at TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- One in-flight request per (student, period)
                CREATE UNIQUE INDEX idx_requests_student_period
                    ON internship_requests(student_id, period_id);

                CREATE INDEX idx_requests_status ON internship_requests(status);
                CREATE INDEX idx_requests_submitted_at ON internship_requests(submitted_at DESC);

                CREATE TRIGGER update_internship_requests_updated_at
                    BEFORE UPDATE ON internship_requests
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
                DROP TRIGGER IF EXISTS update_internship_requests_updated_at ON internship_requests;
                DROP TABLE IF EXISTS internship_requests CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
