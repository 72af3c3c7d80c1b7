//! # iStudio Auth
//!
//! Authentication types and JWT utilities for the iStudio API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structures for access and refresh tokens
//! - [`jwt`]: Token creation and verification utilities
//!
//! Access tokens embed the principal's role and effective permission names
//! so authorization decisions need no database lookup. Refresh tokens are
//! long-lived and carry a unique `jti`; they are the session-recovery
//! mechanism consumed by the access guard.
//!
//! # Example
//!
//! ```ignore
//! use istudio_auth::{create_access_token, verify_token};
//! use istudio_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! let token = create_access_token(
//!     user_id,
//!     "user@example.com",
//!     "editor",
//!     vec!["read".to_string(), "write".to_string(), "delete".to_string()],
//!     &config,
//! )?;
//!
//! let claims = verify_token(&token, &config)?;
//! let principal = claims.principal()?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
