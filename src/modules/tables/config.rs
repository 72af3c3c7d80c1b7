//! Compiled-in table descriptor registry.
//!
//! Lookup is case-insensitive and strips the `" (storage bucket)"` suffix
//! that discovery appends to bucket pseudo-tables, so a bucket listing and
//! a direct table reference resolve to the same descriptor. Unregistered
//! names get a generic fallback whose display name is the requested name.

use crate::modules::tables::model::TableDescriptor;

/// Suffix discovery appends to storage-bucket pseudo-tables.
pub const STORAGE_BUCKET_SUFFIX: &str = " (storage bucket)";

fn descriptor(
    name: &str,
    display_name: &str,
    fields: &[&str],
    sort_field: &str,
    date_fields: &[&str],
    key_field: &str,
) -> TableDescriptor {
    TableDescriptor {
        name: name.to_string(),
        display_name: display_name.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
        sort_field: sort_field.to_string(),
        date_fields: date_fields.iter().map(|f| f.to_string()).collect(),
        key_field: key_field.to_string(),
    }
}

/// Looks up the descriptor for `table`, falling back to a generic one.
pub fn get_table_config(table: &str) -> TableDescriptor {
    let stripped = table.strip_suffix(STORAGE_BUCKET_SUFFIX).unwrap_or(table);
    let stripped = stripped.trim();
    let key = stripped.to_lowercase();

    match key.as_str() {
        "utenti" => descriptor(
            "utenti",
            "Utenti",
            &["email", "full_name", "role", "created_at"],
            "created_at",
            &["created_at", "updated_at"],
            "id",
        ),
        "note" => descriptor(
            "note",
            "Note",
            &["title", "content", "pinned", "created_at"],
            "created_at",
            &["created_at", "updated_at"],
            "id",
        ),
        "pagine" => descriptor(
            "pagine",
            "Pagine",
            &["title", "slug", "published", "updated_at"],
            "updated_at",
            &["created_at", "updated_at"],
            "id",
        ),
        "appuntamenti" => descriptor(
            "appuntamenti",
            "Appuntamenti",
            &["title", "location", "starts_at", "ends_at"],
            "starts_at",
            &["starts_at", "ends_at", "created_at", "updated_at"],
            "id",
        ),
        "attivita" => descriptor(
            "attivita",
            "Attività",
            &["title", "status", "due_date"],
            "due_date",
            &["due_date", "created_at", "updated_at"],
            "id",
        ),
        "storage_buckets" => descriptor(
            "storage_buckets",
            "Storage buckets",
            &["name", "public", "created_at"],
            "name",
            &["created_at"],
            "id",
        ),
        _ => descriptor(&key, stripped, &["id"], "id", &[], "id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_table_config("UTENTI"), get_table_config("utenti"));
        assert_eq!(get_table_config("Note"), get_table_config("note"));
    }

    #[test]
    fn test_bucket_suffix_is_stripped_before_lookup() {
        assert_eq!(
            get_table_config("UTENTI (storage bucket)"),
            get_table_config("utenti")
        );
        assert_eq!(
            get_table_config("note (storage bucket)"),
            get_table_config("note")
        );
    }

    #[test]
    fn test_registered_descriptor_shape() {
        let config = get_table_config("utenti");
        assert_eq!(config.display_name, "Utenti");
        assert_eq!(config.key_field, "id");
        assert!(config.fields.contains(&"email".to_string()));
        assert!(config.date_fields.contains(&"created_at".to_string()));
    }

    #[test]
    fn test_unregistered_table_gets_fallback() {
        let config = get_table_config("nonexistent_table");
        assert_eq!(config.display_name, "nonexistent_table");
        assert_eq!(config.name, "nonexistent_table");
        assert_eq!(config.fields, vec!["id".to_string()]);
        assert_eq!(config.key_field, "id");
        assert!(config.date_fields.is_empty());
    }

    #[test]
    fn test_fallback_preserves_requested_display_name() {
        let config = get_table_config("Documenti");
        assert_eq!(config.display_name, "Documenti");
        // Canonical name is still normalized for queries.
        assert_eq!(config.name, "documenti");
    }
}
