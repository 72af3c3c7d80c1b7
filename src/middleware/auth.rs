use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use istudio_auth::{Claims, verify_token};
use istudio_core::authz::{Permission, Principal};
use istudio_core::errors::AppError;

use crate::state::AppState;

/// Extractor that validates the JWT and provides the authenticated user's
/// claims. Claims carry the role and the permission names that were
/// effective at sign-in.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Check if the user holds a specific permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.0
            .permissions
            .iter()
            .any(|name| name == permission.as_str())
    }

    /// Check if the user holds any of the specified permissions.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// Reconstruct the principal described by the claims.
    pub fn principal(&self) -> Result<Principal, AppError> {
        self.0.principal()
    }

    /// Get the user ID as UUID.
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    /// Get the user's email.
    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// Get the user's role name.
    pub fn role(&self) -> &str {
        &self.0.role
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Helper macro to create permission-check extractors.
/// This provides type-safe permission checking at the handler signature.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = istudio_core::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !auth_user.has_permission($permission) {
                    return Err(istudio_core::errors::AppError::forbidden(format!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

// Pre-defined permission extractors, one per atomic capability.

require_permission!(RequireReadAccess, Permission::Read);
require_permission!(RequireWriteAccess, Permission::Write);
require_permission!(RequireDeleteAccess, Permission::Delete);
require_permission!(RequireAdminAccess, Permission::Admin);
