use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod ingest;
mod model;
mod report;
mod routes;
mod store;

use api::AppState;
use config::Config;
use routes::RateLimits;
use store::{PayrollStore, memory::MemoryPayrollStore, mysql::MySqlPayrollStore};

use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use utoipa::OpenApi;

/// `DATABASE_URL` value that selects the in-process store.
const MEMORY_DATABASE_URL: &str = "memory:";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "payroll.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::try_new(&config.log_level).context("Invalid LOG_LEVEL")?)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!("Server starting...");

    // Any failure up to here leaves the store unusable, so it ends the process.
    let store: Arc<dyn PayrollStore> = if config.database_url == MEMORY_DATABASE_URL {
        warn!("Using the in-memory store, nothing survives a restart");
        Arc::new(MemoryPayrollStore::new())
    } else {
        let pool = db::init_db(&config.database_url, config.db_max_connections).await?;
        db::run_migrations(&pool).await?;
        Arc::new(MySqlPayrollStore::new(pool))
    };
    let rates = Arc::new(db::load_rate_table(store.as_ref()).await?);
    let limits = Arc::new(RateLimits::new(
        config.rate_upload_per_min,
        config.rate_report_per_min,
    )?);

    let state = AppState {
        store,
        rates,
        max_upload_bytes: config.max_upload_bytes,
    };
    let api_prefix = config.api_prefix.clone();

    info!(addr = %config.server_addr, "Listening");

    HttpServer::new(move || {
        let limits = limits.clone();
        let api_prefix = api_prefix.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(state.clone()))
            .configure(move |cfg| routes::configure(cfg, &api_prefix, &limits))
    })
    .bind(&config.server_addr)
    .with_context(|| format!("Failed to bind {}", config.server_addr))?
    .run()
    .await
    .context("Server error")
}
