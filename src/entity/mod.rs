//! SeaORM entity definitions for PostgreSQL database.

pub mod academic_evaluation;
pub mod company;
pub mod company_contact;
pub mod industry_evaluation;
pub mod industry_supervisor_profile;
pub mod internship_period;
pub mod internship_request;
pub mod placement;
pub mod results_report;
pub mod site_visit;
pub mod staff_profile;
pub mod student_evaluation;
pub mod student_profile;
pub mod user;
pub mod weekly_log;
pub mod weekly_log_entry;
