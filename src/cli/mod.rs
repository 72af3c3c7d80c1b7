pub mod seeder;

use sqlx::PgPool;

use istudio_core::authz::Role;
use istudio_core::password::hash_password;

/// Creates an admin account. Admin accounts are CLI-created only; the API
/// never escalates a role past what an existing admin assigns.
pub async fn create_admin(
    db: &PgPool,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO utenti (email, full_name, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(email)
    .bind(full_name)
    .bind(hashed_password)
    .bind(Role::Admin.as_str())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
