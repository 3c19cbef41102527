//! Query service against a real PostgreSQL.
//!
//! Skipped unless DATABASE_URL is set.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use sql_notebook::config::{ConnectionConfig, ResultFormat};
use sql_notebook::db::{row, DatabaseClient, PostgresClient};
use sql_notebook::journal::{LogSink, QueryLog};
use sql_notebook::query::{format_result, QueryService, StatementKind, TableCatalog};

use super::wait_for_entries;

async fn connect() -> Option<Arc<PostgresClient>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresClient::connect(&config).await.ok().map(Arc::new)
}

fn table_name(prefix: &str) -> String {
    format!("{prefix}_{}", std::process::id())
}

#[tokio::test]
async fn test_insert_select_update_logged() {
    let Some(client) = connect().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let table = table_name("notebook_witness");
    client
        .execute_query(&format!(
            "CREATE TABLE {table} (id integer PRIMARY KEY, name text, active boolean)"
        ))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("sql_queries_log.json");
    let (sink, writer) = LogSink::spawn(QueryLog::open(&log_path).await.unwrap());
    let service = QueryService::new(client.clone(), sink);

    let insert =
        format!("INSERT INTO {table} VALUES (1, 'Morty Schapiro', true), (2, NULL, false)");
    let inserted = service.execute(&insert).await.unwrap();
    assert_eq!(inserted.statement_kind, StatementKind::Insert);
    assert_eq!(
        format_result(&inserted, ResultFormat::Markdown),
        "Data insertion completed successfully!"
    );

    let select = format!("SELECT id, name, active FROM {table} ORDER BY id");
    let selected = service.execute(&select).await.unwrap();
    assert_eq!(
        selected.rows,
        vec![
            row([("id", json!(1)), ("name", json!("Morty Schapiro")), ("active", json!(true))]),
            row([("id", json!(2)), ("name", json!(null)), ("active", json!(false))]),
        ]
    );
    assert_eq!(
        format_result(&selected, ResultFormat::Markdown),
        "| id | name | active |\n| --- | --- | --- |\n| 1 | Morty Schapiro | true |\n| 2 | NULL | false |"
    );

    let update = format!("UPDATE {table} SET active = true WHERE id = 2");
    let updated = service.execute(&update).await.unwrap();
    assert_eq!(
        format_result(&updated, ResultFormat::Markdown),
        "Update completed successfully!"
    );

    // A failing statement is not logged.
    assert!(service
        .execute(&format!("SELECT missing_column FROM {table}"))
        .await
        .is_err());

    let entries = wait_for_entries(&log_path, 3).await;
    let logged: Vec<&str> = entries.iter().map(|e| e.sql.as_str()).collect();
    assert_eq!(logged, vec![insert.as_str(), select.as_str(), update.as_str()]);
    assert_eq!(entries[1].result, selected.rows);

    drop(service);
    assert_eq!(writer.finish().await.unwrap(), 3);

    client
        .execute_query(&format!("DROP TABLE {table}"))
        .await
        .unwrap();
    client.close().await.unwrap();
}

#[tokio::test]
async fn test_catalog_lists_public_tables() {
    let Some(client) = connect().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let table = table_name("notebook_catalog");
    client
        .execute_query(&format!("CREATE TABLE {table} (id integer)"))
        .await
        .unwrap();

    let catalog = TableCatalog::new(client.clone());
    let tables = catalog.list_tables().await.unwrap();
    assert!(tables.contains(&table));

    client
        .execute_query(&format!("DROP TABLE {table}"))
        .await
        .unwrap();
    let tables = catalog.list_tables().await.unwrap();
    assert!(!tables.contains(&table));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_numeric_and_uuid_keep_their_values() {
    let Some(client) = connect().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("sql_queries_log.json");
    let (sink, writer) = LogSink::spawn(QueryLog::open(&log_path).await.unwrap());
    let service = QueryService::new(client.clone(), sink);

    let sql = "SELECT sum(x)::numeric(10, 2) AS total, \
               'a81bc81b-dead-4e5d-abff-90865d1e13b1'::uuid AS case_id \
               FROM (VALUES (1.25), (2.50)) v(x)";
    let result = service.execute(sql).await.unwrap();

    let expected = vec![row([
        ("total", json!("3.75")),
        ("case_id", json!("a81bc81b-dead-4e5d-abff-90865d1e13b1")),
    ])];
    assert_eq!(result.rows, expected);

    drop(service);
    assert_eq!(writer.finish().await.unwrap(), 1);
    let entries = wait_for_entries(&log_path, 1).await;
    assert_eq!(entries[0].result, expected);

    client.close().await.unwrap();
}
