//! Internship placement server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use internship_placement_lib::api;
use internship_placement_lib::auth::SessionVerifier;
use internship_placement_lib::config::Config;
use internship_placement_lib::db::DbPool;
use internship_placement_lib::middleware::RequestLogger;
use internship_placement_lib::services::{
    Mailer, ReminderConfig, Storage, start_reminder_task,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and IPS_SESSION_SECRET must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Internship Placement Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and the session secret");
    }

    // Connect to PostgreSQL
    let pool = DbPool::connect(&config)
        .await
        .expect("Failed to connect to database");
    info!("Database connection established");

    // Run migrations
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Initialize S3 attachment storage
    let storage = Storage::new(&config.storage)
        .await
        .expect("Failed to initialize attachment storage");

    // Outbound mail relay (best-effort; disabled when unconfigured)
    let mailer = Mailer::new(config.mail_relay_url.clone());
    if mailer.is_enabled() {
        info!("Mail relay configured");
    } else {
        info!("Mail relay not configured - reminders disabled");
    }

    // Start the weekly missing-log reminder task
    start_reminder_task(
        Arc::new(pool.clone()),
        Arc::new(mailer.clone()),
        ReminderConfig {
            interval_secs: config.reminder_interval_secs,
        },
    );

    // Session token verification
    let verifier = SessionVerifier::new(
        config.session_secret.clone(),
        config.session_issuer.clone(),
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Allow headroom above the attachment cap at the HTTP layer; the
    // actual limit is enforced while streaming each file
    let payload_limit = config.max_attachment_size * 2;

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(verifier.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::PayloadConfig::new(payload_limit))
            // Configure API routes
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_company_routes)
                    .configure(api::configure_request_routes)
                    .configure(api::configure_placement_routes)
                    .configure(api::configure_weekly_log_routes)
                    .configure(api::configure_evaluation_routes)
                    .configure(api::configure_results_routes)
                    .configure(api::configure_dashboard_routes),
            );

        // Serve interactive API docs in development
        if is_development {
            app = app.service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            );
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
