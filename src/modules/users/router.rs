use axum::{Router, routing::get};

use crate::modules::users::controller::{
    create_user, delete_user, get_profile, get_user, get_users, update_user,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/profile", get(get_profile))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}
