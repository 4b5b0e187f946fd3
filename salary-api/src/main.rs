//! Salary calculator API server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use salary_api::logging::init_logging;
use salary_api::{AppState, create_router};
use salary_core::{DbConfig, IrpsSchedule, PayrollConfig, PayrollService, RepositoryRegistry};
use salary_db_sqlite::SqliteRepositoryFactory;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP API for Mozambican IRPS and INSS salary calculations.
#[derive(Parser, Debug)]
#[command(name = "salary-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "SALARY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SALARY_PORT", default_value_t = 8001)]
    port: u16,

    /// Storage backend
    #[arg(long, env = "SALARY_DB_BACKEND", default_value = "sqlite")]
    backend: String,

    /// Database file or connection URL
    #[arg(long, env = "SALARY_DB", default_value = "salary.db")]
    db: String,

    /// IRPS withholding table: matrix, formula or marginal
    #[arg(long, env = "SALARY_IRPS_SCHEDULE", default_value = "matrix")]
    schedule: IrpsSchedule,

    /// Also append logs to this file
    #[arg(long, env = "SALARY_LOG_FILE")]
    log_file: Option<PathBuf>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_logging(args.log_file.as_deref())?;

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let db_config = DbConfig::new(&args.backend, &args.db);
    let repository = registry
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open {} database '{}'", args.backend, args.db))?;

    let config = PayrollConfig::with_schedule(args.schedule);
    info!(
        schedule = %config.schedule,
        backend = %args.backend,
        database = %args.db,
        "payroll service configured"
    );
    let service = PayrollService::new(config, Arc::from(repository));
    let app = create_router(AppState::new(service));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
