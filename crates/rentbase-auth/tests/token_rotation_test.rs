//! Integration tests for refresh-token rotation against a live store.

mod helpers;

use std::time::Duration;

use rentbase_core::error::ErrorKind;
use rentbase_entity::account::AccountRole;

#[tokio::test]
async fn test_superseded_refresh_token_is_rejected() {
    let app = helpers::TestAuth::new().await;
    let (_id, email) = app
        .create_test_account("rotate", "Rotate1Password", AccountRole::Admin)
        .await;

    let login = app.lifecycle.login(&email, "Rotate1Password").await.unwrap();
    let first = login.tokens.refresh_token;

    // Claims carry second-resolution timestamps; step past the issuing
    // second so the rotated token is a distinct string.
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let second = app.lifecycle.refresh(&first).await.unwrap().refresh_token;
    assert_ne!(first, second);

    // The well-signed but superseded token fails the swap and gets the
    // same generic rejection as a forged one.
    let err = app.lifecycle.refresh(&first).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.message, "Invalid token");

    // The newest token still rotates.
    app.lifecycle.refresh(&second).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = helpers::TestAuth::new().await;
    let (id, email) = app
        .create_test_account("logout", "Logout1Password", AccountRole::Admin)
        .await;

    let login = app.lifecycle.login(&email, "Logout1Password").await.unwrap();
    app.lifecycle.logout(id).await.unwrap();

    let err = app
        .lifecycle
        .refresh(&login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}
