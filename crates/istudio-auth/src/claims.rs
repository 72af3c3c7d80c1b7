//! JWT claim structures for authentication tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use istudio_core::authz::{Permission, Principal};
use istudio_core::errors::AppError;

/// JWT claims for access tokens.
///
/// Embeds everything needed for authentication and authorization without a
/// database round trip: the principal's role and the permission names that
/// were effective at sign-in (role-derived, or the per-user override).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Role name (`admin`, `editor`, `user`, `guest`)
    pub role: String,
    /// Effective permission names at sign-in
    pub permissions: Vec<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Reconstructs the [`Principal`] these claims describe.
    ///
    /// The embedded permission names become the principal's override set,
    /// so stale role tables cannot widen a live session. Unknown names are
    /// dropped.
    pub fn principal(&self) -> Result<Principal, AppError> {
        let id = Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;

        let permissions = self
            .permissions
            .iter()
            .filter_map(|name| Permission::parse(name));

        Ok(Principal::new(id, self.role.clone()).with_override(permissions))
    }
}

/// JWT claims for refresh tokens.
///
/// Long-lived; used by session recovery to obtain a fresh access token
/// without re-authenticating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier (JWT ID)
    pub jti: String,
}
