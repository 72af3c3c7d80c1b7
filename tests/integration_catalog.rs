//! Catalog integration tests against a live PostgreSQL database.
//!
//! Run with a migrated database:
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test integration_catalog -- --ignored
//! ```

mod common;

use serde_json::json;

use istudio::modules::tables::model::{DiscoverySource, FilterOp, TableQueryParams};
use istudio::modules::tables::service::TableService;
use istudio_config::CatalogConfig;
use istudio_core::pagination::PaginationParams;

fn query_params(
    filter: Option<(&str, FilterOp, &str)>,
    sort: Option<&str>,
) -> TableQueryParams {
    let (filter_column, filter_op, filter_value) = match filter {
        Some((column, op, value)) => (
            Some(column.to_string()),
            Some(op),
            Some(value.to_string()),
        ),
        None => (None, None, None),
    };
    TableQueryParams {
        filter_column,
        filter_op,
        filter_value,
        sort: sort.map(|s| s.to_string()),
        direction: None,
        pagination: PaginationParams::default(),
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_insert_then_query_by_key_round_trips() {
    let db = common::test_pool().await;
    let owner = common::create_test_user(&db, "editor").await;

    let payload = json!({
        "user_id": owner.id,
        "title": "Round trip",
        "content": "catalog write path",
        "pinned": true,
    });
    let serde_json::Value::Object(row) = payload else {
        unreachable!()
    };

    let stored = TableService::insert_row(&db, "note", row).await.unwrap();
    let key = stored["id"].as_str().unwrap().to_string();

    // Server-assigned fields are present on the stored row.
    assert!(stored["created_at"].is_string());

    let page = TableService::query_table(
        &db,
        "note",
        query_params(Some(("id", FilterOp::Eq, &key)), None),
    )
    .await
    .unwrap();

    assert_eq!(page.total_count, 1);
    let fetched = &page.rows[0];
    assert_eq!(fetched["title"], json!("Round trip"));
    assert_eq!(fetched["content"], json!("catalog write path"));
    assert_eq!(fetched["pinned"], json!(true));

    common::delete_test_user(&db, owner.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_update_and_delete_row_through_catalog() {
    let db = common::test_pool().await;
    let owner = common::create_test_user(&db, "editor").await;

    let serde_json::Value::Object(row) = json!({
        "user_id": owner.id,
        "title": "Before",
    }) else {
        unreachable!()
    };
    let stored = TableService::insert_row(&db, "note", row).await.unwrap();
    let key = stored["id"].as_str().unwrap().to_string();

    let serde_json::Value::Object(patch) = json!({"title": "After"}) else {
        unreachable!()
    };
    let updated = TableService::update_row(&db, "note", &key, patch)
        .await
        .unwrap();
    assert_eq!(updated["title"], json!("After"));

    TableService::delete_row(&db, "note", &key).await.unwrap();
    let gone = TableService::delete_row(&db, "note", &key).await;
    assert!(gone.is_err());

    common::delete_test_user(&db, owner.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_filters_and_sorting() {
    let db = common::test_pool().await;
    let owner = common::create_test_user(&db, "editor").await;

    for (title, pinned) in [("alpha", true), ("beta", false), ("gamma", true)] {
        let serde_json::Value::Object(row) = json!({
            "user_id": owner.id,
            "title": title,
            "pinned": pinned,
        }) else {
            unreachable!()
        };
        TableService::insert_row(&db, "note", row).await.unwrap();
    }

    // Pattern filter compares text.
    let page = TableService::query_table(
        &db,
        "note",
        query_params(Some(("title", FilterOp::Ilike, "%ALPHA%")), None),
    )
    .await
    .unwrap();
    assert_eq!(page.total_count, 1);

    // Sort ascending by title for a deterministic first row.
    let mut params = query_params(
        Some(("user_id", FilterOp::Eq, &owner.id.to_string())),
        Some("title"),
    );
    params.direction = Some(istudio::modules::tables::model::SortDirection::Asc);
    let page = TableService::query_table(&db, "note", params).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.rows[0]["title"], json!("alpha"));

    common::delete_test_user(&db, owner.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_invalid_identifiers_are_rejected() {
    let db = common::test_pool().await;

    let err = TableService::query_table(
        &db,
        "note; DROP TABLE note",
        query_params(None, None),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("invalid identifier"));

    let err = TableService::query_table(
        &db,
        "note",
        query_params(Some(("title\" OR 1=1 --", FilterOp::Eq, "x")), None),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("invalid identifier"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_columns_report_primary_key_and_types() {
    let db = common::test_pool().await;
    let config = CatalogConfig::default();

    let columns = TableService::get_columns(&db, &config, "utenti")
        .await
        .unwrap();

    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert!(id.is_primary_key);
    assert!(!id.nullable);

    let email = columns.iter().find(|c| c.name == "email").unwrap();
    assert!(!email.is_primary_key);
    assert_eq!(email.data_type, "text");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_table_exists_for_tables_and_buckets() {
    let db = common::test_pool().await;

    assert!(TableService::table_exists(&db, "utenti").await);
    assert!(TableService::table_exists(&db, "note").await);
    assert!(!TableService::table_exists(&db, "tabella_inesistente").await);

    sqlx::query("INSERT INTO storage_buckets (name) VALUES ('avatars') ON CONFLICT DO NOTHING")
        .execute(&db)
        .await
        .unwrap();
    assert!(TableService::table_exists(&db, "avatars (storage bucket)").await);
    assert!(!TableService::table_exists(&db, "missing (storage bucket)").await);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_discovery_probes_candidates_when_other_strategies_are_empty() {
    let db = common::test_pool().await;

    // Point introspection at a schema with no tables and clear the bucket
    // registry so discovery has to fall back to probing.
    sqlx::query("CREATE SCHEMA IF NOT EXISTS istudio_probe_test")
        .execute(&db)
        .await
        .unwrap();
    sqlx::query("DELETE FROM storage_buckets")
        .execute(&db)
        .await
        .unwrap();

    let config = CatalogConfig {
        schema: "istudio_probe_test".to_string(),
    };
    let discovery = TableService::list_tables(&db, &config).await;

    assert!(!discovery.requires_setup);
    assert!(discovery.instructions.is_none());
    assert_eq!(discovery.source, Some(DiscoverySource::Probing));
    // Probed tables come back in candidate order; the application schema
    // has every candidate except `impostazioni`.
    assert_eq!(
        discovery.tables,
        vec!["utenti", "note", "pagine", "appuntamenti", "attivita"]
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_introspection_lists_application_tables() {
    let db = common::test_pool().await;
    let discovery = TableService::list_tables(&db, &CatalogConfig::default()).await;

    assert!(!discovery.requires_setup);
    assert_eq!(discovery.source, Some(DiscoverySource::Introspection));
    for table in ["utenti", "note", "pagine"] {
        assert!(
            discovery.tables.iter().any(|t| t == table),
            "missing {table}"
        );
    }
    // Migration bookkeeping is filtered out.
    assert!(!discovery.tables.iter().any(|t| t.starts_with('_')));
}
