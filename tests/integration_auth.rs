//! Auth service integration tests against a live database.
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test integration_auth -- --ignored
//! ```

mod common;

use istudio::modules::auth::model::SignInRequest;
use istudio::modules::auth::service::AuthService;
use istudio_auth::verify_token;
use istudio_config::JwtConfig;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_sign_in_embeds_role_permissions_in_claims() {
    let db = common::test_pool().await;
    let user = common::create_test_user(&db, "editor").await;
    let config = jwt_config();

    let response = AuthService::sign_in(
        &db,
        SignInRequest {
            email: user.email.clone(),
            password: user.password.clone(),
        },
        &config,
    )
    .await
    .unwrap();

    let claims = verify_token(&response.access_token, &config).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.role, "editor");
    assert_eq!(claims.permissions, vec!["read", "write", "delete"]);
    assert_eq!(response.user.email, user.email);

    common::delete_test_user(&db, user.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_sign_in_rejects_bad_password() {
    let db = common::test_pool().await;
    let user = common::create_test_user(&db, "user").await;

    let result = AuthService::sign_in(
        &db,
        SignInRequest {
            email: user.email.clone(),
            password: "wrong-password".to_string(),
        },
        &jwt_config(),
    )
    .await;

    assert!(result.is_err());
    common::delete_test_user(&db, user.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_refresh_rotates_tokens_and_rereads_the_account() {
    let db = common::test_pool().await;
    let user = common::create_test_user(&db, "user").await;
    let config = jwt_config();

    let signed_in = AuthService::sign_in(
        &db,
        SignInRequest {
            email: user.email.clone(),
            password: user.password.clone(),
        },
        &config,
    )
    .await
    .unwrap();

    // Promote the account, then recover the session: the new access token
    // must carry the new role.
    sqlx::query("UPDATE utenti SET role = 'editor' WHERE id = $1")
        .bind(user.id)
        .execute(&db)
        .await
        .unwrap();

    let refreshed = AuthService::refresh_session(&db, &signed_in.refresh_token, &config)
        .await
        .unwrap();
    assert_ne!(refreshed.refresh_token, signed_in.refresh_token);

    let claims = verify_token(&refreshed.access_token, &config).unwrap();
    assert_eq!(claims.role, "editor");

    common::delete_test_user(&db, user.id).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_check_session_detects_role_change_and_deletion() {
    let db = common::test_pool().await;
    let user = common::create_test_user(&db, "user").await;

    assert!(
        AuthService::check_session(&db, user.id, "user")
            .await
            .unwrap()
    );
    // A role change invalidates sessions that still claim the old role.
    assert!(
        !AuthService::check_session(&db, user.id, "admin")
            .await
            .unwrap()
    );

    common::delete_test_user(&db, user.id).await;
    assert!(
        !AuthService::check_session(&db, user.id, "user")
            .await
            .unwrap()
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_permissions_override_reaches_the_claims() {
    let db = common::test_pool().await;
    let user = common::create_test_user(&db, "guest").await;
    let config = jwt_config();

    sqlx::query("UPDATE utenti SET permissions_override = ARRAY['read','write'] WHERE id = $1")
        .bind(user.id)
        .execute(&db)
        .await
        .unwrap();

    let response = AuthService::sign_in(
        &db,
        SignInRequest {
            email: user.email.clone(),
            password: user.password.clone(),
        },
        &config,
    )
    .await
    .unwrap();

    let claims = verify_token(&response.access_token, &config).unwrap();
    assert_eq!(claims.role, "guest");
    assert_eq!(claims.permissions, vec!["read", "write"]);

    common::delete_test_user(&db, user.id).await;
}
