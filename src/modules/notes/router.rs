use axum::{Router, routing::get};

use crate::modules::notes::controller::{
    create_note, delete_note, get_note, get_notes, update_note,
};
use crate::state::AppState;

pub fn init_notes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notes).post(create_note))
        .route(
            "/{id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
}
