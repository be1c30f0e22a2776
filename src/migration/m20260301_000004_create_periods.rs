//! Migration: Create internship periods.

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
                CREATE TABLE internship_periods (
                    id UUID PRIMARY KEY,
                    name VARCHAR(120) NOT NULL,
                    start_date DATE NOT NULL,
                    end_date DATE NOT NULL,
                    is_active BOOLEAN NOT NULL DEFAULT FALSE,
                    CHECK (start_date <= end_date)
                );

                CREATE INDEX idx_internship_periods_active ON internship_periods(is_active)
                    WHERE is_active;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS internship_periods CASCADE;")
            .await?;

        Ok(())
    }
}
