//! Service pipeline tests: HTTP routes, executor, log sink and log file.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web, App};
use serde_json::json;
use tempfile::TempDir;

use sql_notebook::config::ResultFormat;
use sql_notebook::db::{column_names, row, DatabaseClient, MockDatabaseClient, Row};
use sql_notebook::journal::{LogSink, QueryLog};
use sql_notebook::query::{format_result, QueryResult};
use sql_notebook::server::models::QueryRequest;
use sql_notebook::server::{configure_routes, AppState};

use super::wait_for_entries;

async fn state_with_log(
    db: Arc<dyn DatabaseClient>,
    dir: &TempDir,
) -> (web::Data<AppState>, std::path::PathBuf) {
    let path = dir.path().join("sql_queries_log.json");
    let log = QueryLog::open(&path).await.unwrap();
    let (sink, _writer) = LogSink::spawn(log);
    (web::Data::new(AppState::new(db, sink)), path)
}

#[actix_web::test]
async fn test_select_rows_match_formatter_headers() {
    let rows = vec![
        row([("id", json!(1)), ("name", json!("a"))]),
        row([("id", json!(2)), ("name", json!("b"))]),
    ];
    let db =
        Arc::new(MockDatabaseClient::new().with_result("SELECT id, name FROM person", rows));
    let dir = TempDir::new().unwrap();
    let (state, _path) = state_with_log(db, &dir).await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(QueryRequest::new("SELECT id, name FROM person"))
        .to_request();
    let body: Vec<Row> = test::call_and_read_body_json(&app, req).await;

    let rendered = format_result(
        &QueryResult::new("SELECT id, name FROM person", body.clone()),
        ResultFormat::Markdown,
    );
    let header_line = rendered.lines().next().unwrap();
    assert_eq!(
        header_line,
        format!("| {} |", column_names(&body).join(" | "))
    );
    assert_eq!(column_names(&body), vec!["id", "name"]);
    assert_eq!(rendered.lines().count(), 4);
}

#[actix_web::test]
async fn test_each_success_logged_once_verbatim() {
    let db = Arc::new(MockDatabaseClient::new());
    let dir = TempDir::new().unwrap();
    let (state, path) = state_with_log(db, &dir).await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let statements = [
        "SELECT * FROM person",
        "  insert into interview values (1, 'I saw it')",
        "UPDATE person SET name = 'x' WHERE id = 1",
    ];
    for sql in statements {
        let req = test::TestRequest::post()
            .uri("/query")
            .set_json(QueryRequest::new(sql))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    // Rejected requests never reach the log.
    let req = test::TestRequest::post()
        .uri("/query")
        .set_json(json!({"sql": "   "}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let entries = wait_for_entries(&path, statements.len()).await;
    assert_eq!(entries.len(), statements.len());
    for sql in statements {
        assert_eq!(entries.iter().filter(|e| e.sql == sql).count(), 1);
    }
    let select = entries
        .iter()
        .find(|e| e.sql == "SELECT * FROM person")
        .unwrap();
    assert_eq!(
        select.result,
        vec![row([("result", json!("Mock result for: SELECT * FROM person"))])]
    );
}

#[actix_web::test]
async fn test_overlapping_queries_keep_their_own_rows() {
    let db = Arc::new(
        MockDatabaseClient::new()
            .with_result("SELECT 'first' AS tag", vec![row([("tag", json!("first"))])])
            .with_result("SELECT 'second' AS tag", vec![row([("tag", json!("second"))])])
            .with_latency(Duration::from_millis(50)),
    );
    let dir = TempDir::new().unwrap();
    let (state, path) = state_with_log(db, &dir).await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let first = test::TestRequest::post()
        .uri("/query")
        .set_json(QueryRequest::new("SELECT 'first' AS tag"))
        .to_request();
    let second = test::TestRequest::post()
        .uri("/query")
        .set_json(QueryRequest::new("SELECT 'second' AS tag"))
        .to_request();

    let (a, b) = futures::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );
    let a: Vec<Row> = test::read_body_json(a).await;
    let b: Vec<Row> = test::read_body_json(b).await;

    assert_eq!(a, vec![row([("tag", json!("first"))])]);
    assert_eq!(b, vec![row([("tag", json!("second"))])]);
    assert_eq!(wait_for_entries(&path, 2).await.len(), 2);
}

#[actix_web::test]
async fn test_list_tables_twice_same_set() {
    let db = Arc::new(MockDatabaseClient::new().with_tables([
        "person",
        "interview",
        "crime_scene_report",
    ]));
    let dir = TempDir::new().unwrap();
    let (state, _path) = state_with_log(db, &dir).await;
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let mut first: Vec<String> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/tables").to_request())
            .await;
    let mut second: Vec<String> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/tables").to_request())
            .await;

    first.sort();
    second.sort();
    assert_eq!(first, second);
}
