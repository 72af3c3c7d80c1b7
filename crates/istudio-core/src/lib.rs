//! # iStudio Core
//!
//! Core types and utilities for the iStudio API.
//!
//! This crate provides foundational types used throughout the iStudio
//! application:
//!
//! - [`authz`]: Roles, permissions, and the pure authorization decision core
//! - [`routes`]: Route-requirement table with prefix matching
//! - [`identifiers`]: Sanitization for admin-controlled table/column names
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Secure password hashing and verification
//! - [`serde`]: Custom serde serialization/deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use istudio_core::authz::{evaluate, has_permission, Permission, Principal};
//!
//! // Pure permission check
//! assert!(has_permission("editor", Permission::Delete));
//!
//! // Full access decision for a guarded route
//! let decision = evaluate(Some(&principal), false, Some(Permission::Write));
//! if !decision.allowed {
//!     // redirect per decision.reason
//! }
//! ```

pub mod authz;
pub mod errors;
pub mod identifiers;
pub mod pagination;
pub mod password;
pub mod routes;
pub mod serde;

// Re-export commonly used types at crate root
pub use authz::{AccessDecision, DecisionReason, Permission, Principal, Role, has_permission};
pub use errors::AppError;
pub use identifiers::{quote_identifier, sanitize_identifier};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use routes::RouteRequirements;
