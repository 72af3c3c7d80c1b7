use axum::{Router, routing::get};

use crate::modules::tables::controller::{
    delete_row, get_columns, get_config, insert_row, list_tables, query_rows, update_row,
};
use crate::state::AppState;

pub fn init_tables_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables))
        .route("/{table}/columns", get(get_columns))
        .route("/{table}/config", get(get_config))
        .route("/{table}/rows", get(query_rows).post(insert_row))
        .route("/{table}/rows/{key}", axum::routing::patch(update_row).delete(delete_row))
}
