//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_companies;
mod m20260301_000003_create_profiles;
mod m20260301_000004_create_periods;
mod m20260301_000005_create_requests;
mod m20260301_000006_create_placements;
mod m20260301_000007_create_weekly_logs;
mod m20260301_000008_create_site_visits;
mod m20260301_000009_create_evaluations;
mod m20260301_000010_create_results_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_companies::Migration),
            Box::new(m20260301_000003_create_profiles::Migration),
            Box::new(m20260301_000004_create_periods::Migration),
            Box::new(m20260301_000005_create_requests::Migration),
            Box::new(m20260301_000006_create_placements::Migration),
            Box::new(m20260301_000007_create_weekly_logs::Migration),
            Box::new(m20260301_000008_create_site_visits::Migration),
            Box::new(m20260301_000009_create_evaluations::Migration),
            Box::new(m20260301_000010_create_results_reports::Migration),
        ]
    }
}
