//! Migration: Create companies and company contacts.

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
                CREATE TABLE companies (
                    id UUID PRIMARY KEY,
                    name VARCHAR(200) NOT NULL UNIQUE,
                    industry VARCHAR(120),
                    district VARCHAR(120),
                    address VARCHAR(255),
                    status VARCHAR(30) NOT NULL DEFAULT 'pending_verification'
                        CHECK (status IN ('pending_verification', 'approved', 'rejected', 'inactive')),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_companies_status ON companies(status);

                CREATE TABLE company_contacts (
                    id UUID PRIMARY KEY,
                    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                    name VARCHAR(120) NOT NULL,
                    title VARCHAR(120),
                    phone VARCHAR(40),
                    email VARCHAR(254)
                );

                CREATE INDEX idx_company_contacts_company ON company_contacts(company_id);
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
                DROP TABLE IF EXISTS company_contacts CASCADE;
                DROP TABLE IF EXISTS companies CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
