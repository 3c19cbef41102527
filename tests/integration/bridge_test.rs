//! Editor bridge against a live service on a loopback port.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use serde_json::json;
use tempfile::TempDir;

use sql_notebook::bridge::{
    CommandOutcome, DocumentSurface, EditorBridge, EditorCommand, HttpApi, LineRange, NoticeLog,
    QUERY_FAILED_NOTICE,
};
use sql_notebook::config::ResultFormat;
use sql_notebook::db::{row, DatabaseClient, FailingDatabaseClient, MockDatabaseClient};
use sql_notebook::error::NotebookError;
use sql_notebook::journal::{LogSink, QueryLog};
use sql_notebook::server::{configure_routes, AppState};

use super::wait_for_entries;

struct TestService {
    base_url: String,
    log_path: PathBuf,
    handle: ServerHandle,
    _dir: TempDir,
}

impl TestService {
    async fn start(db: Arc<dyn DatabaseClient>) -> Self {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("sql_queries_log.json");
        let (sink, _writer) = LogSink::spawn(QueryLog::open(&log_path).await.unwrap());
        let state = web::Data::new(AppState::new(db, sink));

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure_routes)
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];

        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            log_path,
            handle,
            _dir: dir,
        }
    }

    fn bridge(&self) -> EditorBridge<HttpApi, NoticeLog> {
        let api = HttpApi::new(&self.base_url, Duration::from_secs(5)).unwrap();
        EditorBridge::new(api, NoticeLog::default(), ResultFormat::Markdown)
    }

    async fn stop(self) {
        self.handle.stop(true).await;
    }
}

#[actix_web::test]
async fn test_execute_selection_round_trip() {
    let db = Arc::new(MockDatabaseClient::new().with_result(
        "SELECT name FROM person WHERE id = 1",
        vec![row([("name", json!("Annabel Miller"))])],
    ));
    let service = TestService::start(db).await;
    let mut bridge = service.bridge();

    let mut doc = DocumentSurface::new("# Clues\nSELECT name FROM person WHERE id = 1\nmore\n");
    doc.select_lines(LineRange::new(2, 2)).unwrap();

    let outcome = bridge
        .dispatch(EditorCommand::ExecuteSql, &mut doc)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(
        doc.text(),
        "# Clues\nResult of the query:\n| name |\n| --- |\n| Annabel Miller |\nmore\n"
    );

    let entries = wait_for_entries(&service.log_path, 1).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].sql, "SELECT name FROM person WHERE id = 1");
    assert_eq!(entries[0].result, vec![row([("name", json!("Annabel Miller"))])]);

    service.stop().await;
}

#[actix_web::test]
async fn test_insert_tables_round_trip() {
    let db = Arc::new(MockDatabaseClient::new().with_tables(["person", "interview"]));
    let service = TestService::start(db).await;
    let mut bridge = service.bridge();

    let mut doc = DocumentSurface::new("");
    let outcome = bridge
        .dispatch(EditorCommand::InsertTables, &mut doc)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(doc.text(), "==Tables in the database:==\nperson\ninterview\n");

    service.stop().await;
}

#[actix_web::test]
async fn test_update_writes_message() {
    let service = TestService::start(Arc::new(MockDatabaseClient::new())).await;
    let mut bridge = service.bridge();

    let mut doc = DocumentSurface::new("UPDATE person SET name = 'x'");
    doc.select_lines(LineRange::new(1, 1)).unwrap();

    bridge
        .dispatch(EditorCommand::ExecuteSql, &mut doc)
        .await
        .unwrap();

    assert_eq!(doc.text(), "Result of the query:\nUpdate completed successfully!\n");
    service.stop().await;
}

#[actix_web::test]
async fn test_service_failure_leaves_note_untouched() {
    let service = TestService::start(Arc::new(FailingDatabaseClient::default())).await;
    let mut bridge = service.bridge();

    let mut doc = DocumentSurface::new("SELECT * FROM person\n");
    doc.select_lines(LineRange::new(1, 1)).unwrap();

    let err = bridge
        .dispatch(EditorCommand::ExecuteSql, &mut doc)
        .await
        .unwrap_err();

    assert!(matches!(err, NotebookError::Execution(_)));
    assert_eq!(err.to_string(), "An error occurred while executing the query");
    assert_eq!(bridge.notifier().notices, vec![QUERY_FAILED_NOTICE]);
    assert_eq!(doc.text(), "SELECT * FROM person\n");
    assert!(wait_for_entries(&service.log_path, 1).await.is_empty());

    service.stop().await;
}
