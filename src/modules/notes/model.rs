use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use istudio_core::pagination::{PaginationMeta, PaginationParams};

/// A note owned by a single user. Notes are never visible to other
/// non-admin principals.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub pinned: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a note.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateNoteDto {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

/// DTO for updating a note. Absent fields keep their current value.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateNoteDto {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

impl UpdateNoteDto {
    /// Applies the patch to a note in place (the optimistic local copy).
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
    }
}

/// Query parameters for filtering notes.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct NoteFilterParams {
    /// Substring match against title and content.
    pub search: Option<String>,
    #[serde(default, deserialize_with = "istudio_core::serde::deserialize_optional_bool")]
    pub pinned: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl NoteFilterParams {
    /// A simple listing (no filters, first page) is served from the
    /// per-user cache entry.
    pub fn is_simple(&self) -> bool {
        self.search.is_none() && self.pinned.is_none() && self.pagination.offset() == 0
    }
}

/// Paginated response containing notes. Deserialize is needed because
/// list snapshots round-trip through the JSON-backed cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedNotesResponse {
    pub data: Vec<Note>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Spesa".to_string(),
            content: "latte, pane".to_string(),
            pinned: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_update_dto_applies_only_present_fields() {
        let mut n = note();
        let dto = UpdateNoteDto {
            title: Some("Spesa settimanale".to_string()),
            content: None,
            pinned: Some(true),
        };
        dto.apply_to(&mut n);
        assert_eq!(n.title, "Spesa settimanale");
        assert_eq!(n.content, "latte, pane");
        assert!(n.pinned);
    }

    #[test]
    fn test_simple_listing_detection() {
        let simple: NoteFilterParams = serde_json::from_str(r#"{}"#).unwrap();
        assert!(simple.is_simple());

        let filtered: NoteFilterParams = serde_json::from_str(r#"{"search":"pane"}"#).unwrap();
        assert!(!filtered.is_simple());

        let paged: NoteFilterParams = serde_json::from_str(r#"{"page":"3"}"#).unwrap();
        assert!(!paged.is_simple());
    }

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateNoteDto = serde_json::from_str(r#"{"title":"Idee"}"#).unwrap();
        assert_eq!(dto.content, "");
        assert!(!dto.pinned);
    }
}
