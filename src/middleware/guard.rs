//! Route-level access guard middleware.
//!
//! Derives the permission a request path requires from the compiled-in
//! route-requirement table and evaluates the authorization decision core.
//! Denials navigate, they do not error: an unauthenticated request is
//! redirected to the sign-in entry point, an authenticated-but-denied
//! request to the default dashboard. The response itself is the single
//! navigation for that determination.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use istudio_core::authz::{DecisionReason, evaluate};

use crate::metrics::track_authorization_check;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Middleware gating every route nested under it.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let api = Router::new()
///     .nest("/notes", init_notes_router())
///     .layer(middleware::from_fn_with_state(state.clone(), require_access));
/// ```
pub async fn require_access(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let required = state.routes.required_for(&path);

    let (mut parts, body) = req.into_parts();
    let principal = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(auth_user) => auth_user.principal().ok(),
        Err(_) => None,
    };

    let decision = evaluate(principal.as_ref(), false, required);
    let role = principal.map(|p| p.role).unwrap_or_default();
    track_authorization_check(decision.allowed, &role);

    if decision.allowed {
        return next.run(Request::from_parts(parts, body)).await;
    }

    info!(path = %path, role = %role, reason = ?decision.reason, "Access denied, redirecting");
    match decision.reason {
        DecisionReason::NoSession => {
            Redirect::to(&state.guard_config.sign_in_path).into_response()
        }
        _ => Redirect::to(&state.guard_config.home_path).into_response(),
    }
}
