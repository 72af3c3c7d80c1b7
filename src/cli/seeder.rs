//! Development seeder: fake accounts and notes.
//!
//! Seeded rows are tagged by the `seed.` email prefix so `clear-seed` can
//! remove them without touching real accounts.

use fake::Fake;
use fake::faker::internet::en::Password;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use sqlx::PgPool;
use uuid::Uuid;

use istudio_core::authz::Role;
use istudio_core::password::hash_password;

const SEED_EMAIL_PREFIX: &str = "seed.";

pub struct SeedCounts {
    pub editors: usize,
    pub users: usize,
    pub notes_per_user: usize,
}

pub async fn seed_database(
    db: &PgPool,
    counts: SeedCounts,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Seeding database...");

    let mut user_ids = Vec::new();
    for (role, count) in [
        (Role::Editor, counts.editors),
        (Role::User, counts.users),
    ] {
        for _ in 0..count {
            let id = seed_user(db, role).await?;
            user_ids.push(id);
        }
    }

    let mut note_count = 0usize;
    for user_id in &user_ids {
        for _ in 0..counts.notes_per_user {
            seed_note(db, *user_id).await?;
            note_count += 1;
        }
    }

    println!(
        "✅ Seeded {} accounts and {} notes",
        user_ids.len(),
        note_count
    );
    Ok(())
}

pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    // Notes cascade with their owner.
    let result = sqlx::query("DELETE FROM utenti WHERE email LIKE $1 || '%'")
        .bind(SEED_EMAIL_PREFIX)
        .execute(db)
        .await?;

    println!("✅ Removed {} seeded accounts", result.rows_affected());
    Ok(())
}

async fn seed_user(db: &PgPool, role: Role) -> Result<Uuid, Box<dyn std::error::Error>> {
    let full_name: String = Name().fake();
    let email = format!("{}{}@example.com", SEED_EMAIL_PREFIX, Uuid::new_v4());
    let password: String = Password(12..20).fake();
    let hashed =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO utenti (email, full_name, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(&email)
    .bind(&full_name)
    .bind(&hashed)
    .bind(role.as_str())
    .fetch_one(db)
    .await?;

    Ok(id)
}

async fn seed_note(db: &PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    let title: String = Sentence(2..6).fake();
    let content: String = Paragraph(1..4).fake();

    sqlx::query("INSERT INTO note (user_id, title, content, pinned) VALUES ($1, $2, $3, $4)")
        .bind(user_id)
        .bind(&title)
        .bind(&content)
        .bind(rand_bool())
        .execute(db)
        .await?;

    Ok(())
}

fn rand_bool() -> bool {
    use fake::faker::boolean::en::Boolean;
    Boolean(20).fake()
}
