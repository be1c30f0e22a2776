//! API endpoint modules.

pub mod companies;
pub mod dashboards;
pub mod evaluations;
pub mod health;
pub mod openapi;
pub mod placements;
pub mod requests;
pub mod results;
pub mod weekly_logs;

pub use companies::configure_routes as configure_company_routes;
pub use dashboards::configure_routes as configure_dashboard_routes;
pub use evaluations::configure_routes as configure_evaluation_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use placements::configure_routes as configure_placement_routes;
pub use requests::configure_routes as configure_request_routes;
pub use results::configure_routes as configure_results_routes;
pub use weekly_logs::configure_routes as configure_weekly_log_routes;
