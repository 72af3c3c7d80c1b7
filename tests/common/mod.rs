use sqlx::PgPool;
use uuid::Uuid;

use istudio_core::password::hash_password;

/// Connects to the test database. Requires `DATABASE_URL` and applied
/// migrations; every test using this module is `#[ignore]`d by default.
pub async fn test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database")
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Creates an account with the given role.
/// `role` should be one of: "admin", "editor", "user", "guest".
pub async fn create_test_user(db: &PgPool, role: &str) -> TestUser {
    let email = generate_unique_email();
    let password = "test-password-123".to_string();
    let hashed = hash_password(&password).unwrap();

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO utenti (email, full_name, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(&email)
    .bind("Test User")
    .bind(&hashed)
    .bind(role)
    .fetch_one(db)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password,
        role: role.to_string(),
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn delete_test_user(db: &PgPool, id: Uuid) {
    sqlx::query("DELETE FROM utenti WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .unwrap();
}
