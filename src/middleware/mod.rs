//! Middleware modules for request processing.
//!
//! - [`auth`]: JWT authentication extractor and permission-based extractors
//! - [`guard`]: Route-requirement access guard middleware
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and extracts claims
//! 3. The access-guard middleware derives the permission required for the
//!    request path and evaluates the decision core; unauthenticated
//!    requests are redirected to the sign-in route, authenticated-but-
//!    denied requests to the dashboard
//! 4. Permission extractors in handlers enforce operation-level checks
//!    (e.g. delete requires the `delete` permission)
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireWriteAccess};
//!
//! // Basic authentication (any valid token)
//! async fn get_profile(auth_user: AuthUser) -> impl IntoResponse {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//!
//! // Permission-based access control
//! async fn create_note(
//!     RequireWriteAccess(auth_user): RequireWriteAccess,
//! ) -> impl IntoResponse {
//!     // Only executes if the principal holds the `write` permission
//! }
//! ```

pub mod auth;
pub mod guard;
