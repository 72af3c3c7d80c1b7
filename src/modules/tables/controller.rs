use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::{instrument, warn};

use crate::middleware::auth::RequireAdminAccess;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::tables::config::get_table_config;
use crate::modules::tables::model::{
    CatalogError, ColumnsResponse, TableDescriptor, TableDiscovery, TablePage, TableQueryParams,
    TableRow,
};
use crate::modules::tables::service::TableService;
use crate::state::AppState;

/// Discover available tables
#[utoipa::path(
    get,
    path = "/api/tables",
    responses(
        (status = 200, description = "Discovered tables; requires_setup is set when every discovery strategy came up empty", body = TableDiscovery),
        (status = 403, description = "Missing admin permission", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state))]
pub async fn list_tables(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
) -> Json<TableDiscovery> {
    Json(TableService::list_tables(&state.db, &state.catalog_config).await)
}

/// Get column metadata for a table
///
/// Missing introspection support is reported as `available: false` with an
/// empty column list rather than an error.
#[utoipa::path(
    get,
    path = "/api/tables/{table}/columns",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Column metadata (possibly degraded)", body = ColumnsResponse),
        (status = 400, description = "Invalid table name", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state))]
pub async fn get_columns(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
    Path(table): Path<String>,
) -> Result<Json<ColumnsResponse>, CatalogError> {
    match TableService::get_columns(&state.db, &state.catalog_config, &table).await {
        Ok(columns) => Ok(Json(ColumnsResponse {
            columns,
            available: true,
        })),
        Err(CatalogError::ColumnsUnavailable { source }) => {
            warn!(table = %table, error = %source, "Serving degraded column listing");
            Ok(Json(ColumnsResponse {
                columns: Vec::new(),
                available: false,
            }))
        }
        Err(e) => Err(e),
    }
}

/// Get the display configuration for a table
#[utoipa::path(
    get,
    path = "/api/tables/{table}/config",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Registered or fallback descriptor", body = TableDescriptor)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument]
pub async fn get_config(
    _access: RequireAdminAccess,
    Path(table): Path<String>,
) -> Json<TableDescriptor> {
    Json(get_table_config(&table))
}

/// Query rows of a table
#[utoipa::path(
    get,
    path = "/api/tables/{table}/rows",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "One page of rows plus the total count", body = TablePage),
        (status = 400, description = "Invalid table or column name", body = ErrorResponse),
        (status = 500, description = "Backend query failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state, params))]
pub async fn query_rows(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
    Path(table): Path<String>,
    Query(params): Query<TableQueryParams>,
) -> Result<Json<TablePage>, CatalogError> {
    let page = TableService::query_table(&state.db, &table, params).await?;
    Ok(Json(page))
}

/// Insert a row into a table
#[utoipa::path(
    post,
    path = "/api/tables/{table}/rows",
    params(("table" = String, Path, description = "Table name")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Stored row including server-assigned fields"),
        (status = 400, description = "Invalid identifier or empty payload", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state, row))]
pub async fn insert_row(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
    Path(table): Path<String>,
    Json(row): Json<TableRow>,
) -> Result<Json<TableRow>, CatalogError> {
    let stored = TableService::insert_row(&state.db, &table, row).await?;
    Ok(Json(stored))
}

/// Update a row identified by its key
#[utoipa::path(
    patch,
    path = "/api/tables/{table}/rows/{key}",
    params(
        ("table" = String, Path, description = "Table name"),
        ("key" = String, Path, description = "Primary key value")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated row"),
        (status = 404, description = "Row not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state, patch))]
pub async fn update_row(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
    Path((table, key)): Path<(String, String)>,
    Json(patch): Json<TableRow>,
) -> Result<Json<TableRow>, CatalogError> {
    let updated = TableService::update_row(&state.db, &table, &key, patch).await?;
    Ok(Json(updated))
}

/// Delete a row identified by its key
#[utoipa::path(
    delete,
    path = "/api/tables/{table}/rows/{key}",
    params(
        ("table" = String, Path, description = "Table name"),
        ("key" = String, Path, description = "Primary key value")
    ),
    responses(
        (status = 200, description = "Row deleted", body = MessageResponse),
        (status = 404, description = "Row not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tables"
)]
#[instrument(skip(state))]
pub async fn delete_row(
    State(state): State<AppState>,
    _access: RequireAdminAccess,
    Path((table, key)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, CatalogError> {
    TableService::delete_row(&state.db, &table, &key).await?;
    Ok(Json(MessageResponse {
        message: format!("Row {key} deleted from {table}"),
    }))
}
