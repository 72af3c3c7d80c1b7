use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{check_session, refresh, sign_in, sign_out};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/refresh", post(refresh))
        .route("/session", get(check_session))
}
