//! Generic table access over an admin-controlled schema.
//!
//! No table or column name is trusted: identifiers pass through
//! sanitization before interpolation and every value is a bound parameter.
//! Discovery degrades through three strategies instead of assuming any
//! single privileged introspection mechanism exists on the backend.

use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use istudio_config::CatalogConfig;
use istudio_core::identifiers::quote_identifier;

use crate::modules::tables::config::{STORAGE_BUCKET_SUFFIX, get_table_config};
use crate::modules::tables::model::{
    CatalogError, ColumnInfo, DiscoverySource, FilterOp, SortDirection, TableDiscovery, TablePage,
    TableQueryParams, TableRow,
};

/// Known application tables probed when neither introspection nor bucket
/// enumeration yields anything. Probe order is preserved in the result.
pub const CANDIDATE_TABLES: &[&str] = &[
    "utenti",
    "note",
    "pagine",
    "appuntamenti",
    "attivita",
    "impostazioni",
];

const SETUP_INSTRUCTIONS: &str = "No tables could be discovered. Grant the service account \
     read access to information_schema, register a storage bucket, or create one of the known \
     application tables, then retry.";

/// A single bound filter value. Range and equality comparisons go numeric
/// when the value parses as a number, text otherwise; pattern operators
/// always compare text.
enum BindValue {
    Text(String),
    Number(f64),
}

pub struct TableService;

impl TableService {
    /// Enumerates available tables, trying schema introspection, then
    /// storage buckets, then candidate probing. Never fails: an empty
    /// backend is reported through `requires_setup`.
    #[instrument(skip(db, config))]
    pub async fn list_tables(db: &PgPool, config: &CatalogConfig) -> TableDiscovery {
        match Self::introspect_schema(db, &config.schema).await {
            Ok(tables) if !tables.is_empty() => {
                crate::metrics::track_table_discovery("introspection");
                return TableDiscovery {
                    tables,
                    requires_setup: false,
                    instructions: None,
                    source: Some(DiscoverySource::Introspection),
                };
            }
            Ok(_) => info!(schema = %config.schema, "Schema introspection returned no tables"),
            Err(e) => warn!(error = %e, "Schema introspection unavailable"),
        }

        match Self::list_buckets(db).await {
            Ok(buckets) if !buckets.is_empty() => {
                crate::metrics::track_table_discovery("storage_buckets");
                let tables = buckets
                    .into_iter()
                    .map(|bucket| format!("{bucket}{STORAGE_BUCKET_SUFFIX}"))
                    .collect();
                return TableDiscovery {
                    tables,
                    requires_setup: false,
                    instructions: None,
                    source: Some(DiscoverySource::StorageBuckets),
                };
            }
            Ok(_) => info!("No storage buckets registered"),
            Err(e) => warn!(error = %e, "Storage bucket listing unavailable"),
        }

        let probed = Self::probe_candidates(db).await;
        if !probed.is_empty() {
            crate::metrics::track_table_discovery("probing");
            return TableDiscovery {
                tables: probed,
                requires_setup: false,
                instructions: None,
                source: Some(DiscoverySource::Probing),
            };
        }

        warn!("Table discovery found nothing; manual backend configuration required");
        TableDiscovery {
            tables: Vec::new(),
            requires_setup: true,
            instructions: Some(SETUP_INSTRUCTIONS.to_string()),
            source: None,
        }
    }

    async fn introspect_schema(db: &PgPool, schema: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = $1
               AND table_type = 'BASE TABLE'
               AND table_name NOT LIKE 'pg\\_%'
               AND table_name NOT LIKE 'sql\\_%'
               AND table_name NOT LIKE '\\_%'
             ORDER BY table_name",
        )
        .bind(schema)
        .fetch_all(db)
        .await
    }

    pub async fn list_buckets(db: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM storage_buckets ORDER BY name")
            .fetch_all(db)
            .await
    }

    pub async fn bucket_exists(db: &PgPool, name: &str) -> bool {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storage_buckets WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(db)
        .await
        .unwrap_or(false)
    }

    async fn probe_candidates(db: &PgPool) -> Vec<String> {
        let mut found = Vec::new();
        for candidate in CANDIDATE_TABLES {
            if Self::probe_table(db, candidate).await {
                found.push(candidate.to_string());
            }
        }
        found
    }

    /// Zero-row count probe; absence of an error means the table exists.
    async fn probe_table(db: &PgPool, table: &str) -> bool {
        let Ok(quoted) = quote_identifier(table) else {
            return false;
        };
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {quoted} WHERE 1 = 0"))
            .fetch_one(db)
            .await
            .is_ok()
    }

    /// Best-effort existence check. Bucket pseudo-tables check the bucket
    /// registry; everything else is probed directly.
    pub async fn table_exists(db: &PgPool, table: &str) -> bool {
        if let Some(bucket) = table.strip_suffix(STORAGE_BUCKET_SUFFIX) {
            return Self::bucket_exists(db, bucket.trim()).await;
        }
        Self::probe_table(db, table).await
    }

    /// Column metadata for a table.
    ///
    /// Callers treat `ColumnsUnavailable` as a degraded state (render "no
    /// columns"), never as fatal.
    #[instrument(skip(db, config))]
    pub async fn get_columns(
        db: &PgPool,
        config: &CatalogConfig,
        table: &str,
    ) -> Result<Vec<ColumnInfo>, CatalogError> {
        let descriptor = get_table_config(table);

        sqlx::query_as::<_, ColumnInfo>(
            "SELECT c.column_name AS name,
                    c.data_type AS data_type,
                    (c.is_nullable = 'YES') AS nullable,
                    (c.is_identity = 'YES') AS is_identity,
                    EXISTS (
                        SELECT 1
                        FROM information_schema.table_constraints tc
                        JOIN information_schema.key_column_usage kcu
                          ON kcu.constraint_name = tc.constraint_name
                         AND kcu.table_schema = tc.table_schema
                        WHERE tc.constraint_type = 'PRIMARY KEY'
                          AND tc.table_schema = c.table_schema
                          AND tc.table_name = c.table_name
                          AND kcu.column_name = c.column_name
                    ) AS is_primary_key
             FROM information_schema.columns c
             WHERE c.table_schema = $1 AND c.table_name = $2
             ORDER BY c.ordinal_position",
        )
        .bind(&config.schema)
        .bind(&descriptor.name)
        .fetch_all(db)
        .await
        .map_err(|source| {
            error!(table = %descriptor.name, error = %source, "Column introspection failed");
            CatalogError::ColumnsUnavailable { source }
        })
    }

    /// Paginated, filterable, sortable read over an arbitrary table.
    ///
    /// At most one filter applies. Identifiers are sanitized before
    /// interpolation; the filter value is always a bound parameter.
    #[instrument(skip(db, params))]
    pub async fn query_table(
        db: &PgPool,
        table: &str,
        params: TableQueryParams,
    ) -> Result<TablePage, CatalogError> {
        let descriptor = get_table_config(table);
        let table_name = descriptor.name.clone();
        let quoted_table = quote_identifier(&table_name)?;

        let mut filter_clause = String::new();
        let mut bind = None;
        if let (Some(column), Some(value)) = (&params.filter_column, &params.filter_value) {
            let op = params.filter_op.unwrap_or(FilterOp::Eq);
            let quoted_column = quote_identifier(column)?;
            if !op.is_pattern()
                && let Ok(number) = value.parse::<f64>()
            {
                filter_clause = format!(" WHERE ({quoted_column})::float8 {} $1", op.as_sql());
                bind = Some(BindValue::Number(number));
            } else {
                filter_clause = format!(" WHERE ({quoted_column})::text {} $1", op.as_sql());
                bind = Some(BindValue::Text(value.clone()));
            }
        }

        let sort_field = params.sort.clone().unwrap_or(descriptor.sort_field);
        let quoted_sort = quote_identifier(&sort_field)?;
        let direction = params.direction.unwrap_or(SortDirection::Desc);

        // Limit and offset are clamped integers, safe to interpolate.
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let rows_sql = format!(
            "SELECT to_jsonb(t.*) FROM {quoted_table} t{filter_clause} \
             ORDER BY t.{quoted_sort} {} LIMIT {limit} OFFSET {offset}",
            direction.as_sql()
        );
        let count_sql = format!("SELECT COUNT(*) FROM {quoted_table} t{filter_clause}");

        let mut rows_query = sqlx::query_scalar::<_, serde_json::Value>(&rows_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        match &bind {
            Some(BindValue::Text(value)) => {
                rows_query = rows_query.bind(value.clone());
                count_query = count_query.bind(value.clone());
            }
            Some(BindValue::Number(number)) => {
                rows_query = rows_query.bind(*number);
                count_query = count_query.bind(*number);
            }
            None => {}
        }

        let values = rows_query
            .fetch_all(db)
            .await
            .map_err(|source| Self::query_failed(&table_name, "select", source))?;
        let total_count = count_query
            .fetch_one(db)
            .await
            .map_err(|source| Self::query_failed(&table_name, "count", source))?;

        let rows = values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        crate::metrics::track_table_query("select", true);
        Ok(TablePage { rows, total_count })
    }

    /// Inserts a dynamically-typed row. Columns come from the payload
    /// keys; omitted columns take their server-side defaults. Returns the
    /// stored row including server-assigned fields.
    #[instrument(skip(db, row))]
    pub async fn insert_row(
        db: &PgPool,
        table: &str,
        row: TableRow,
    ) -> Result<TableRow, CatalogError> {
        let descriptor = get_table_config(table);
        let table_name = descriptor.name;
        let quoted_table = quote_identifier(&table_name)?;

        if row.is_empty() {
            return Err(CatalogError::EmptyRow { table: table_name });
        }

        let column_list = Self::quoted_columns(&row)?;
        let sql = format!(
            "INSERT INTO {quoted_table} AS ins ({column_list}) \
             SELECT {column_list} FROM jsonb_populate_record(NULL::{quoted_table}, $1) \
             RETURNING to_jsonb(ins.*)"
        );

        let value = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .bind(serde_json::Value::Object(row))
            .fetch_one(db)
            .await
            .map_err(|source| Self::query_failed(&table_name, "insert", source))?;

        crate::metrics::track_table_query("insert", true);
        Self::into_row(&table_name, value)
    }

    /// Patches a row identified by the descriptor's key field. Only the
    /// columns present in the payload change.
    #[instrument(skip(db, patch))]
    pub async fn update_row(
        db: &PgPool,
        table: &str,
        key: &str,
        patch: TableRow,
    ) -> Result<TableRow, CatalogError> {
        let descriptor = get_table_config(table);
        let table_name = descriptor.name;
        let quoted_table = quote_identifier(&table_name)?;
        let quoted_key_field = quote_identifier(&descriptor.key_field)?;

        if patch.is_empty() {
            return Err(CatalogError::EmptyRow { table: table_name });
        }

        let column_list = Self::quoted_columns(&patch)?;
        let sql = format!(
            "UPDATE {quoted_table} AS t \
             SET ({column_list}) = \
                 (SELECT {column_list} FROM jsonb_populate_record(NULL::{quoted_table}, $1)) \
             WHERE t.{quoted_key_field}::text = $2 \
             RETURNING to_jsonb(t.*)"
        );

        let value = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .bind(serde_json::Value::Object(patch))
            .bind(key)
            .fetch_optional(db)
            .await
            .map_err(|source| Self::query_failed(&table_name, "update", source))?
            .ok_or_else(|| CatalogError::RowNotFound {
                table: table_name.clone(),
                key: key.to_string(),
            })?;

        crate::metrics::track_table_query("update", true);
        Self::into_row(&table_name, value)
    }

    /// Deletes a row identified by the descriptor's key field.
    #[instrument(skip(db))]
    pub async fn delete_row(db: &PgPool, table: &str, key: &str) -> Result<(), CatalogError> {
        let descriptor = get_table_config(table);
        let table_name = descriptor.name;
        let quoted_table = quote_identifier(&table_name)?;
        let quoted_key_field = quote_identifier(&descriptor.key_field)?;

        let result = sqlx::query(&format!(
            "DELETE FROM {quoted_table} AS t WHERE t.{quoted_key_field}::text = $1"
        ))
        .bind(key)
        .execute(db)
        .await
        .map_err(|source| Self::query_failed(&table_name, "delete", source))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::RowNotFound {
                table: table_name,
                key: key.to_string(),
            });
        }

        crate::metrics::track_table_query("delete", true);
        Ok(())
    }

    fn quoted_columns(row: &TableRow) -> Result<String, CatalogError> {
        let mut columns = Vec::with_capacity(row.len());
        for key in row.keys() {
            columns.push(quote_identifier(key)?);
        }
        Ok(columns.join(", "))
    }

    fn into_row(table: &str, value: serde_json::Value) -> Result<TableRow, CatalogError> {
        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(CatalogError::QueryFailed {
                table: table.to_string(),
                source: sqlx::Error::Decode("expected a JSON object row".into()),
            }),
        }
    }

    fn query_failed(table: &str, operation: &str, source: sqlx::Error) -> CatalogError {
        error!(table = %table, operation = %operation, error = %source, "Table operation failed");
        crate::metrics::track_table_query(operation, false);
        CatalogError::QueryFailed {
            table: table.to_string(),
            source,
        }
    }
}
