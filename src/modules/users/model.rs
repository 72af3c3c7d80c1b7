//! User data models and DTOs.
//!
//! Accounts live in the `utenti` table (the backend schema predates this
//! service and is shared with the admin tooling). The `role` column is
//! free-form text; unknown values degrade to the read-only permission set.
//! `permissions_override`, when present, replaces the role-derived set for
//! that account.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use istudio_core::pagination::{PaginationMeta, PaginationParams};

/// An account in the system.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions_override: Option<Vec<String>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new user. Admin-only.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Role name; defaults to `user` when omitted.
    pub role: Option<String>,
    /// Per-account permission override. Replaces the role-derived set.
    pub permissions_override: Option<Vec<String>>,
}

/// DTO for updating a user. All fields optional; absent fields keep their
/// current value.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1))]
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub permissions_override: Option<Vec<String>>,
}

/// Query parameters for filtering users.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_skips_absent_override() {
        let user = User {
            id: Uuid::new_v4(),
            email: "mario@example.com".to_string(),
            full_name: "Mario Rossi".to_string(),
            role: "editor".to_string(),
            permissions_override: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let serialized = serde_json::to_string(&user).unwrap();
        assert!(serialized.contains("mario@example.com"));
        assert!(!serialized.contains("permissions_override"));
    }

    #[test]
    fn test_create_user_dto_validation() {
        use validator::Validate;

        let dto = CreateUserDto {
            email: "new@example.com".to_string(),
            full_name: "New User".to_string(),
            password: "password123".to_string(),
            role: Some("user".to_string()),
            permissions_override: None,
        };
        assert!(dto.validate().is_ok());

        let bad_email = CreateUserDto {
            email: "not-an-email".to_string(),
            ..dto.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateUserDto {
            password: "short".to_string(),
            ..dto
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_filter_params_deserialize_with_pagination() {
        let json = r#"{"role":"editor","limit":"20","page":"2"}"#;
        let params: UserFilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.role.as_deref(), Some("editor"));
        assert_eq!(params.pagination.limit(), 20);
        assert_eq!(params.pagination.offset(), 20);
    }
}
