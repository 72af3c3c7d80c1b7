use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use istudio_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use istudio_config::JwtConfig;
use istudio_core::authz::{Permission, Principal};
use istudio_core::errors::AppError;
use istudio_core::password::verify_password;

use crate::modules::users::model::User;

use super::model::{RefreshResponse, SignInRequest, SignInResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn sign_in(
        db: &PgPool,
        dto: SignInRequest,
        jwt_config: &JwtConfig,
    ) -> Result<SignInResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            email: String,
            full_name: String,
            role: String,
            permissions_override: Option<Vec<String>>,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, full_name, role, permissions_override, password,
                    created_at, updated_at
             FROM utenti WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            crate::metrics::track_sign_in_failure("unknown_email");
            AppError::unauthorized("Invalid email or password".to_string())
        })?;

        if !verify_password(&dto.password, &row.password)? {
            crate::metrics::track_sign_in_failure("bad_password");
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let permissions = effective_permissions(&row.id, &row.role, &row.permissions_override);
        let access_token =
            create_access_token(row.id, &row.email, &row.role, permissions, jwt_config)?;
        let refresh_token = create_refresh_token(row.id, &row.email, jwt_config)?;

        crate::metrics::track_sign_in_success(&row.role);
        crate::metrics::track_jwt_issued();

        Ok(SignInResponse {
            access_token,
            refresh_token,
            user: User {
                id: row.id,
                email: row.email,
                full_name: row.full_name,
                role: row.role,
                permissions_override: row.permissions_override,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }

    /// Session recovery: exchanges a refresh token for a fresh token pair.
    ///
    /// The account is re-read so a role change or deletion since sign-in
    /// takes effect immediately; both tokens are rotated.
    #[instrument(skip(db, refresh_token, jwt_config))]
    pub async fn refresh_session(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;

        #[derive(sqlx::FromRow)]
        struct AccountRow {
            email: String,
            role: String,
            permissions_override: Option<Vec<String>>,
        }

        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT email, role, permissions_override FROM utenti WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists".to_string()))?;

        let permissions = effective_permissions(&user_id, &row.role, &row.permissions_override);
        let access_token =
            create_access_token(user_id, &row.email, &row.role, permissions, jwt_config)?;
        let refresh_token = create_refresh_token(user_id, &row.email, jwt_config)?;

        crate::metrics::track_jwt_issued();

        Ok(RefreshResponse {
            access_token,
            refresh_token,
        })
    }

    /// Session re-validation: reports whether the principal behind valid
    /// claims still maps to a live account with an unchanged role.
    #[instrument(skip(db))]
    pub async fn check_session(db: &PgPool, user_id: Uuid, role: &str) -> Result<bool, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM utenti WHERE id = $1 AND role = $2")
                .bind(user_id)
                .bind(role)
                .fetch_one(db)
                .await?;

        Ok(count > 0)
    }
}

/// The permission names embedded into access-token claims: the per-account
/// override when present, the role-derived set otherwise.
fn effective_permissions(
    user_id: &Uuid,
    role: &str,
    permissions_override: &Option<Vec<String>>,
) -> Vec<String> {
    match permissions_override {
        Some(names) => {
            let parsed = names.iter().filter_map(|name| Permission::parse(name));
            Principal::new(*user_id, role)
                .with_override(parsed)
                .permission_names()
        }
        None => Principal::new(*user_id, role).permission_names(),
    }
}
