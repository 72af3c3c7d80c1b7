use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use istudio_core::errors::AppError;

use crate::middleware::auth::{AuthUser, RequireDeleteAccess, RequireWriteAccess};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::notes::model::{
    CreateNoteDto, Note, NoteFilterParams, PaginatedNotesResponse, UpdateNoteDto,
};
use crate::modules::notes::service::NoteService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List the authenticated user's notes
#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "Paginated list of the user's notes", body = PaginatedNotesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_notes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<NoteFilterParams>,
) -> Result<Json<PaginatedNotesResponse>, AppError> {
    let notes =
        NoteService::list_notes(&state.db, &state.note_cache, auth_user.user_id()?, params).await?;
    Ok(Json(notes))
}

/// Create a note (requires the `write` permission)
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNoteDto,
    responses(
        (status = 200, description = "Note created", body = Note),
        (status = 403, description = "Missing write permission", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, access, dto))]
pub async fn create_note(
    State(state): State<AppState>,
    access: RequireWriteAccess,
    ValidatedJson(dto): ValidatedJson<CreateNoteDto>,
) -> Result<Json<Note>, AppError> {
    let note =
        NoteService::create_note(&state.db, &state.note_cache, access.0.user_id()?, dto).await?;
    Ok(Json(note))
}

/// Get one of the authenticated user's notes
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note found", body = Note),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, AppError> {
    let note = NoteService::get_note(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(note))
}

/// Update a note (requires the `write` permission)
#[utoipa::path(
    patch,
    path = "/api/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateNoteDto,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, access, dto))]
pub async fn update_note(
    State(state): State<AppState>,
    access: RequireWriteAccess,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateNoteDto>,
) -> Result<Json<Note>, AppError> {
    let note =
        NoteService::update_note(&state.db, &state.note_cache, access.0.user_id()?, id, dto)
            .await?;
    Ok(Json(note))
}

/// Delete a note (requires the `delete` permission)
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 403, description = "Missing delete permission", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, access))]
pub async fn delete_note(
    State(state): State<AppState>,
    access: RequireDeleteAccess,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    NoteService::delete_note(&state.db, &state.note_cache, access.0.user_id()?, id).await?;
    Ok(Json(MessageResponse {
        message: "Note deleted".to_string(),
    }))
}
