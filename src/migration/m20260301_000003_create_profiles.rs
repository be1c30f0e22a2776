//! Migration: Create student, staff and industry supervisor profiles.

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
                CREATE TABLE student_profiles (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                    reg_no VARCHAR(50) NOT NULL UNIQUE,
                    phone VARCHAR(30)
                );

                CREATE TABLE staff_profiles (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                    staff_no VARCHAR(50) NOT NULL UNIQUE,
                    department VARCHAR(120)
                );

                CREATE TABLE industry_supervisor_profiles (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT
                );

                CREATE INDEX idx_industry_profiles_company ON industry_supervisor_profiles(company_id);
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
                DROP TABLE IF EXISTS industry_supervisor_profiles CASCADE;
                DROP TABLE IF EXISTS staff_profiles CASCADE;
                DROP TABLE IF EXISTS student_profiles CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
