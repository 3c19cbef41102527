//! HTTP surface of the query service.
//!
//! - `GET /tables`      - table names from the catalog
//! - `POST /query`      - execute one statement, returns its rows
//! - `GET /healthcheck` - liveness probe

mod error;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde_json::json;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::db::DatabaseClient;
use crate::error::{NotebookError, Result};
use crate::journal::{LogSink, QueryLog};
use crate::query::{QueryService, TableCatalog};
use models::QueryRequest;

/// How long shutdown waits for pending log entries.
const LOG_DRAIN_TIMEOUT_SECS: u64 = 5;

/// Shared state for all workers.
pub struct AppState {
    pub queries: QueryService,
    pub catalog: TableCatalog,
}

impl AppState {
    /// Builds the service state over one database client.
    pub fn new(db: Arc<dyn DatabaseClient>, sink: LogSink) -> Self {
        Self {
            queries: QueryService::new(db.clone(), sink),
            catalog: TableCatalog::new(db),
        }
    }
}

/// Registers the service routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/tables", web::get().to(list_tables))
        .route("/query", web::post().to(run_query))
        .route("/healthcheck", web::get().to(healthcheck));
}

/// Malformed bodies are client errors with the usual `{error}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        NotebookError::invalid_request(format!("Invalid request body: {err}")).into()
    })
}

async fn list_tables(state: web::Data<AppState>) -> Result<HttpResponse> {
    let tables = state.catalog.list_tables().await?;
    Ok(HttpResponse::Ok().json(tables))
}

async fn run_query(
    state: web::Data<AppState>,
    body: web::Json<QueryRequest>,
) -> Result<HttpResponse> {
    let sql = body.into_inner().sql.unwrap_or_default();
    let result = state.queries.execute(&sql).await?;
    Ok(HttpResponse::Ok().json(result.rows))
}

async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Runs the service until shutdown, then drains the query log.
pub async fn run(config: &ServerConfig, db: Arc<dyn DatabaseClient>) -> Result<()> {
    let log = QueryLog::open(&config.log_path).await?;
    info!("Logging queries to {}", log.path().display());

    let (sink, writer) = LogSink::spawn(log);
    let state = web::Data::new(AppState::new(db.clone(), sink));

    let (host, port) = config.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .map_err(|e| NotebookError::config(format!("Cannot bind {host}:{port}: {e}")))?
    .run();

    info!("Server running on http://{host}:{port}");
    server
        .await
        .map_err(|e| NotebookError::internal(format!("HTTP server failed: {e}")))?;

    db.close().await?;

    match tokio::time::timeout(Duration::from_secs(LOG_DRAIN_TIMEOUT_SECS), writer.finish()).await
    {
        Ok(Ok(written)) => info!("Query log closed ({written} entries this session)"),
        Ok(Err(e)) => warn!("{e}"),
        Err(_) => warn!("Timed out draining the query log"),
    }

    Ok(())
}
