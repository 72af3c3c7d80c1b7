//! Note CRUD backed by the per-user list cache.
//!
//! Reads go through the in-memory cache (key = owner); every successful
//! mutation invalidates the owner's entries so the next list read cannot
//! observe pre-mutation data. Updates and deletes additionally patch the
//! cached simple list optimistically while the write is in flight,
//! restoring the prior snapshot if the backend rejects it.

use anyhow::Context;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use istudio_cache::{MemoryCache, keys};
use istudio_core::errors::AppError;
use istudio_core::pagination::PaginationMeta;

use crate::modules::notes::model::{
    CreateNoteDto, Note, NoteFilterParams, PaginatedNotesResponse, UpdateNoteDto,
};
use crate::modules::notes::mutation::OptimisticMutation;

const NOTE_COLUMNS: &str = "id, user_id, title, content, pinned, created_at, updated_at";

pub struct NoteService;

impl NoteService {
    #[instrument(skip(db, cache, params))]
    pub async fn list_notes(
        db: &PgPool,
        cache: &MemoryCache,
        user_id: Uuid,
        params: NoteFilterParams,
    ) -> Result<PaginatedNotesResponse, AppError> {
        let key = if params.is_simple() {
            keys::notes::by_user(user_id)
        } else {
            keys::notes::list(user_id, &keys::hash_filters(&params))
        };

        if let Some(cached) = cache.get::<PaginatedNotesResponse>(&key).await {
            crate::metrics::track_note_cache(true);
            return Ok(cached);
        }
        crate::metrics::track_note_cache(false);

        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let filter_sql = "user_id = $1
             AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%' OR content ILIKE '%' || $2 || '%')
             AND ($3::bool IS NULL OR pinned = $3)";

        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM note
             WHERE {filter_sql}
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(user_id)
        .bind(&params.search)
        .bind(params.pinned)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch notes")
        .map_err(AppError::database)?;

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM note WHERE {filter_sql}"))
                .bind(user_id)
                .bind(&params.search)
                .bind(params.pinned)
                .fetch_one(db)
                .await
                .context("Failed to count notes")
                .map_err(AppError::database)?;

        let response = PaginatedNotesResponse {
            data: notes,
            meta: PaginationMeta::for_offset(total, limit, offset, params.pagination.page()),
        };

        if let Err(e) = cache.set(&key, &response).await {
            warn!(error = %e, "Failed to cache note list");
        }

        Ok(response)
    }

    #[instrument(skip(db, cache, dto))]
    pub async fn create_note(
        db: &PgPool,
        cache: &MemoryCache,
        user_id: Uuid,
        dto: CreateNoteDto,
    ) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO note (user_id, title, content, pinned)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.pinned)
        .fetch_one(db)
        .await
        .context("Failed to insert note")
        .map_err(AppError::database)?;

        keys::invalidate::notes(cache, user_id).await;
        Ok(note)
    }

    #[instrument(skip(db))]
    pub async fn get_note(db: &PgPool, user_id: Uuid, note_id: Uuid) -> Result<Note, AppError> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM note WHERE id = $1 AND user_id = $2"
        ))
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch note")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Note with id {} not found", note_id)))?;

        Ok(note)
    }

    #[instrument(skip(db, cache, dto))]
    pub async fn update_note(
        db: &PgPool,
        cache: &MemoryCache,
        user_id: Uuid,
        note_id: Uuid,
        dto: UpdateNoteDto,
    ) -> Result<Note, AppError> {
        let key = keys::notes::by_user(user_id);
        let mut mutation = None;

        // Optimistic path: patch the cached simple list before the write
        // lands, keeping the prior snapshot for rollback.
        if let Some(cached) = cache.get::<PaginatedNotesResponse>(&key).await {
            let mut patched = cached.clone();
            if let Some(row) = patched.data.iter_mut().find(|n| n.id == note_id) {
                dto.apply_to(row);
            }
            if cache.set(&key, &patched).await.is_ok() {
                mutation = Some(OptimisticMutation::begin(cached));
            }
        }

        let result = sqlx::query_as::<_, Note>(&format!(
            "UPDATE note
             SET title = COALESCE($3, title),
                 content = COALESCE($4, content),
                 pinned = COALESCE($5, pinned),
                 updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note_id)
        .bind(user_id)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.pinned)
        .fetch_optional(db)
        .await
        .context("Failed to update note");

        match result {
            Ok(Some(note)) => {
                if let Some(m) = &mut mutation {
                    m.commit();
                }
                keys::invalidate::notes(cache, user_id).await;
                Ok(note)
            }
            Ok(None) => {
                Self::restore_snapshot(cache, &key, &mut mutation).await;
                Err(AppError::not_found(anyhow::anyhow!(
                    "Note with id {} not found",
                    note_id
                )))
            }
            Err(e) => {
                Self::restore_snapshot(cache, &key, &mut mutation).await;
                Err(AppError::database(e))
            }
        }
    }

    #[instrument(skip(db, cache))]
    pub async fn delete_note(
        db: &PgPool,
        cache: &MemoryCache,
        user_id: Uuid,
        note_id: Uuid,
    ) -> Result<(), AppError> {
        let key = keys::notes::by_user(user_id);
        let mut mutation = None;

        if let Some(cached) = cache.get::<PaginatedNotesResponse>(&key).await {
            let mut patched = cached.clone();
            patched.data.retain(|n| n.id != note_id);
            patched.meta.total = (patched.meta.total - 1).max(0);
            if cache.set(&key, &patched).await.is_ok() {
                mutation = Some(OptimisticMutation::begin(cached));
            }
        }

        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(db)
            .await
            .context("Failed to delete note");

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                if let Some(m) = &mut mutation {
                    m.commit();
                }
                keys::invalidate::notes(cache, user_id).await;
                Ok(())
            }
            Ok(_) => {
                Self::restore_snapshot(cache, &key, &mut mutation).await;
                Err(AppError::not_found(anyhow::anyhow!(
                    "Note with id {} not found",
                    note_id
                )))
            }
            Err(e) => {
                Self::restore_snapshot(cache, &key, &mut mutation).await;
                Err(AppError::database(e))
            }
        }
    }

    async fn restore_snapshot(
        cache: &MemoryCache,
        key: &str,
        mutation: &mut Option<OptimisticMutation<PaginatedNotesResponse>>,
    ) {
        if let Some(m) = mutation
            && let Some(prior) = m.roll_back()
        {
            if let Err(e) = cache.set(key, prior).await {
                warn!(error = %e, "Failed to restore note list snapshot");
            }
        }
    }
}
