//! Migration: Create industry, academic and student evaluations.
//!
//! Each evaluation is 1:1 with its placement; the UNIQUE placement_id
//! indexes back the get-or-create paths.

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
                CREATE TABLE industry_evaluations (
                    id UUID PRIMARY KEY,
                    placement_id UUID NOT NULL UNIQUE REFERENCES placements(id) ON DELETE CASCADE,
                    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
                    supervisor_user_id UUID REFERENCES users(id) ON DELETE SET NULL,

                    basic_work_expectations SMALLINT CHECK (basic_work_expectations BETWEEN 1 AND 5),
                    knowledge_and_learning SMALLINT CHECK (knowledge_and_learning BETWEEN 1 AND 5),
                    ethical_awareness SMALLINT CHECK (ethical_awareness BETWEEN 1 AND 5),
                    interpersonal_relations SMALLINT CHECK (interpersonal_relations BETWEEN 1 AND 5),
                    communication_skills SMALLINT CHECK (communication_skills BETWEEN 1 AND 5),
                    attendance SMALLINT CHECK (attendance BETWEEN 1 AND 5),
                    punctuality SMALLINT CHECK (punctuality BETWEEN 1 AND 5),
                    flexibility SMALLINT CHECK (flexibility BETWEEN 1 AND 5),
                    dependability SMALLINT CHECK (dependability BETWEEN 1 AND 5),
                    culture_fit SMALLINT CHECK (culture_fit BETWEEN 1 AND 5),
                    dress_code SMALLINT CHECK (dress_code BETWEEN 1 AND 5),
                    behaviour SMALLINT CHECK (behaviour BETWEEN 1 AND 5),
                    work_productivity SMALLINT CHECK (work_productivity BETWEEN 1 AND 5),

                    basic_work_expectations_comment TEXT,
                    knowledge_and_learning_comment TEXT,
                    ethical_awareness_comment TEXT,
                    interpersonal_relations_comment TEXT,
                    communication_skills_comment TEXT,
                    attendance_comment TEXT,
                    punctuality_comment TEXT,
                    flexibility_comment TEXT,
                    dependability_comment TEXT,
                    culture_fit_comment TEXT,
                    dress_code_comment TEXT,
                    behaviour_comment TEXT,
                    work_productivity_comment TEXT,

                    recommend_employment BOOLEAN,
                    recommend_comment TEXT,
                    other_comments TEXT,
                    supervisor_name VARCHAR(120),
                    supervisor_signature VARCHAR(120),

                    status VARCHAR(20) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted')),
                    submitted_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_industry_evaluations_company ON industry_evaluations(company_id);
                CREATE INDEX idx_industry_evaluations_status ON industry_evaluations(status);

                CREATE TRIGGER update_industry_evaluations_updated_at
                    BEFORE UPDATE ON industry_evaluations
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();

                CREATE TABLE academic_evaluations (
                    id UUID PRIMARY KEY,
                    placement_id UUID NOT NULL UNIQUE REFERENCES placements(id) ON DELETE CASCADE,
                    supervisor_user_id UUID REFERENCES users(id) ON DELETE SET NULL,

                    understanding_of_internship SMALLINT CHECK (understanding_of_internship BETWEEN 1 AND 5),
                    support_framework SMALLINT CHECK (support_framework BETWEEN 1 AND 5),
                    culture_fit SMALLINT CHECK (culture_fit BETWEEN 1 AND 5),
                    work_output SMALLINT CHECK (work_output BETWEEN 1 AND 5),
                    general_presentation SMALLINT CHECK (general_presentation BETWEEN 1 AND 5),

                    understanding_of_internship_comment TEXT,
                    support_framework_comment TEXT,
                    culture_fit_comment TEXT,
                    work_output_comment TEXT,
                    general_presentation_comment TEXT,

                    recommendation TEXT,
                    supervisor_name VARCHAR(255),
                    supervisor_signature VARCHAR(255),

                    status VARCHAR(20) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted')),
                    submitted_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_academic_evaluations_status ON academic_evaluations(status);

                CREATE TRIGGER update_academic_evaluations_updated_at
                    BEFORE UPDATE ON academic_evaluations
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();

                CREATE TABLE student_evaluations (
                    id UUID PRIMARY KEY,
                    placement_id UUID NOT NULL UNIQUE REFERENCES placements(id) ON DELETE CASCADE,
                    student_user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,

                    program VARCHAR(200),
                    internship_site VARCHAR(200),
                    eval_date DATE NOT NULL DEFAULT CURRENT_DATE,

                    q1 TEXT, q2 TEXT, q3 TEXT, q4 TEXT, q5 TEXT,
                    q6 TEXT, q7 TEXT, q8 TEXT, q9 TEXT, q10 TEXT,

                    status VARCHAR(20) NOT NULL DEFAULT 'draft'
                        CHECK (status IN ('draft', 'submitted')),
                    submitted_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_student_evaluations_status ON student_evaluations(status);

                CREATE TRIGGER update_student_evaluations_updated_at
                    BEFORE UPDATE ON student_evaluations
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
                DROP TRIGGER IF EXISTS update_student_evaluations_updated_at ON student_evaluations;
                DROP TRIGGER IF EXISTS update_academic_evaluations_updated_at ON academic_evaluations;
                DROP TRIGGER IF EXISTS update_industry_evaluations_updated_at ON industry_evaluations;
                DROP TABLE IF EXISTS student_evaluations CASCADE;
                DROP TABLE IF EXISTS academic_evaluations CASCADE;
                DROP TABLE IF EXISTS industry_evaluations CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
