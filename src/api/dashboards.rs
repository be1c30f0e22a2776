//! Dashboard API handlers.

use actix_web::{HttpResponse, web};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::dashboard::{self, CoordinatorDashboard, SupervisorDashboard};

/// Coordinator dashboard counters.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/coordinator",
    tag = "Dashboards",
    responses(
        (status = 200, description = "Dashboard", body = CoordinatorDashboard),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn coordinator(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let dashboard = dashboard::coordinator_dashboard(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// University supervisor dashboard counters.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/supervisor",
    tag = "Dashboards",
    responses(
        (status = 200, description = "Dashboard", body = SupervisorDashboard),
        (status = 403, description = "Forbidden", body = crate::error::ErrorResponse),
    )
)]
pub async fn supervisor(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let dashboard = dashboard::supervisor_dashboard(&pool, &auth.principal).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboards/coordinator").route(web::get().to(coordinator)))
        .service(web::resource("/dashboards/supervisor").route(web::get().to(supervisor)));
}
