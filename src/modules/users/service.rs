use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use istudio_core::authz::Role;
use istudio_core::errors::AppError;
use istudio_core::pagination::PaginationMeta;
use istudio_core::password::hash_password;

use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

const USER_COLUMNS: &str =
    "id, email, full_name, role, permissions_override, created_at, updated_at";

pub struct UserService;

impl UserService {
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or_else(|| Role::User.as_str().to_string());
        let hashed_password = hash_password(&dto.password)?;

        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM utenti WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await
            .context("Failed to check for existing email")
            .map_err(AppError::database)?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email already exists"
            )));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO utenti (email, full_name, password, role, permissions_override)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.email)
        .bind(&dto.full_name)
        .bind(&hashed_password)
        .bind(&role)
        .bind(&dto.permissions_override)
        .fetch_one(db)
        .await
        .context("Failed to insert user")
        .map_err(AppError::database)?;

        Ok(user)
    }

    pub async fn get_users(
        db: &PgPool,
        params: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let filter_sql = "($1::text IS NULL OR email ILIKE '%' || $1 || '%')
             AND ($2::text IS NULL OR full_name ILIKE '%' || $2 || '%')
             AND ($3::text IS NULL OR role = $3)";

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM utenti
             WHERE {filter_sql}
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(&params.email)
        .bind(&params.full_name)
        .bind(&params.role)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)?;

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM utenti WHERE {filter_sql}"))
                .bind(&params.email)
                .bind(&params.full_name)
                .bind(&params.role)
                .fetch_one(db)
                .await
                .context("Failed to count users")
                .map_err(AppError::database)?;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::for_offset(total, limit, offset, params.pagination.page()),
        })
    }

    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM utenti WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE utenti
             SET full_name = COALESCE($2, full_name),
                 role = COALESCE($3, role),
                 permissions_override = COALESCE($4, permissions_override),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.full_name)
        .bind(&dto.role)
        .bind(&dto.permissions_override)
        .fetch_optional(db)
        .await
        .context("Failed to update user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM utenti WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "User with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
