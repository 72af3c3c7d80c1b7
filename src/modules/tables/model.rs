//! Models and errors for the generic table catalog.
//!
//! Table and column names come from an admin-controlled backend schema, so
//! nothing here assumes a compile-time row shape: rows travel as
//! string-keyed JSON maps and identifiers are validated at the boundary.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use istudio_core::identifiers::InvalidIdentifier;
use istudio_core::pagination::PaginationParams;

/// One row of an arbitrary table: column name → value.
pub type TableRow = serde_json::Map<String, serde_json::Value>;

/// Column metadata from schema introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub is_identity: bool,
    pub is_primary_key: bool,
}

/// Display/behavior configuration for a generically-rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TableDescriptor {
    /// Canonical (lower-case) table name
    pub name: String,
    /// Human-readable label
    pub display_name: String,
    /// Columns shown by the generic list screen, in order
    pub fields: Vec<String>,
    /// Default sort column
    pub sort_field: String,
    /// Columns rendered as dates
    pub date_fields: Vec<String>,
    /// Primary-key column used by the generic detail/write paths
    pub key_field: String,
}

/// Result of multi-strategy table discovery.
///
/// An empty backend is not an error: `requires_setup` tells the operator
/// that none of the discovery strategies found anything and manual backend
/// configuration is needed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableDiscovery {
    pub tables: Vec<String>,
    pub requires_setup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Strategy that produced the listing; absent when discovery failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DiscoverySource>,
}

/// Which discovery strategy produced the listing. Logged, and useful to
/// operators debugging a half-configured backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    Introspection,
    StorageBuckets,
    Probing,
}

/// Filter operators accepted by the generic query path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Neq => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Like => "LIKE",
            FilterOp::Ilike => "ILIKE",
        }
    }

    /// Pattern operators always compare text; everything else may compare
    /// numerically when the value parses as a number.
    pub fn is_pattern(&self) -> bool {
        matches!(self, FilterOp::Like | FilterOp::Ilike)
    }
}

/// Sort direction for the generic query path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Query parameters for the generic row listing. At most one filter.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TableQueryParams {
    pub filter_column: Option<String>,
    pub filter_op: Option<FilterOp>,
    pub filter_value: Option<String>,
    /// Sort column; defaults to the descriptor's sort field.
    pub sort: Option<String>,
    /// Sort direction; defaults to descending.
    pub direction: Option<SortDirection>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// One page of rows plus the unpaginated total.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TablePage {
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<TableRow>,
    pub total_count: i64,
}

/// Column listing plus an availability flag: introspection being absent is
/// a degraded state, not a failure.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ColumnsResponse {
    pub columns: Vec<ColumnInfo>,
    pub available: bool,
}

/// Errors from catalog operations. Always scoped to one request; a failure
/// here never takes down anything beyond the calling screen.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("column introspection is unavailable: {source}")]
    ColumnsUnavailable {
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("query against table {table} failed: {source}")]
    QueryFailed {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("row payload for table {table} is empty")]
    EmptyRow { table: String },

    #[error("row {key} not found in table {table}")]
    RowNotFound { table: String, key: String },
}

impl CatalogError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            CatalogError::InvalidIdentifier(_) | CatalogError::EmptyRow { .. } => {
                StatusCode::BAD_REQUEST
            }
            CatalogError::RowNotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::ColumnsUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::QueryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        use axum::response::IntoResponse;

        let status = self.status();
        istudio_core::errors::AppError::new(status, anyhow::Error::new(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_op_sql_fragments() {
        assert_eq!(FilterOp::Eq.as_sql(), "=");
        assert_eq!(FilterOp::Neq.as_sql(), "<>");
        assert_eq!(FilterOp::Ilike.as_sql(), "ILIKE");
        assert!(FilterOp::Like.is_pattern());
        assert!(!FilterOp::Gte.is_pattern());
    }

    #[test]
    fn test_filter_op_deserializes_lowercase() {
        let op: FilterOp = serde_json::from_str(r#""ilike""#).unwrap();
        assert_eq!(op, FilterOp::Ilike);
        assert!(serde_json::from_str::<FilterOp>(r#""between""#).is_err());
    }

    #[test]
    fn test_query_params_deserialize() {
        let json = r#"{"filter_column":"role","filter_op":"eq","filter_value":"editor","sort":"created_at","direction":"asc","limit":"5"}"#;
        let params: TableQueryParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.filter_column.as_deref(), Some("role"));
        assert_eq!(params.filter_op, Some(FilterOp::Eq));
        assert_eq!(params.direction, Some(SortDirection::Asc));
        assert_eq!(params.pagination.limit(), 5);
    }

    #[test]
    fn test_catalog_error_status_mapping() {
        use axum::http::StatusCode;

        let err = CatalogError::InvalidIdentifier(InvalidIdentifier("bad name".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = CatalogError::RowNotFound {
            table: "note".to_string(),
            key: "42".to_string(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = CatalogError::EmptyRow {
            table: "note".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
