use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use tracing::info;

mod access;
mod api;
mod config;
mod db;
mod logging;
mod pipeline;
mod shutdown;

use crate::api::{
    auth::auth_config,
    dashboard::dashboard_config,
    health::health_config,
    job::{handlers::job_config, JobService},
    submission::{handlers::submission_config, SubmissionService},
    validation,
};
use crate::shutdown::ShutdownCoordinator;

#[derive(Parser)]
#[command(
    name = "talent-pipeline",
    about = "Recruiting marketplace pipeline service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config::Config {
        database_url,
        host,
        port,
        max_payload_size,
        max_db_connections,
        log_dir,
    } = config::Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");
    logging::init(&log_dir);

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");

    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if matches!(cli.command, Some(Command::Migrate)) {
        info!("Migrations applied, exiting");
        return Ok(());
    }

    info!("Starting talent-pipeline application");
    info!("  - Listening on {}:{}", host, port);
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);

    let server_pool = pool.clone();
    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let submission_service = web::Data::new(SubmissionService::new(server_pool.clone()));

        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(job_service)
            .app_data(submission_service)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(auth_config)
            .configure(dashboard_config)
            .configure(job_config)
            .configure(submission_config)
    });

    let server = server.bind((host.as_str(), port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
