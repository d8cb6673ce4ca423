//! Integration tests for the failed-attempt lockout against a live store.

mod helpers;

use chrono::Utc;

use rentbase_core::error::ErrorKind;
use rentbase_entity::account::AccountRole;

#[tokio::test]
async fn test_lockout_engages_after_max_failed_attempts() {
    let app = helpers::TestAuth::new().await;
    let (id, email) = app
        .create_test_account("lockout", "Correct1Password", AccountRole::Admin)
        .await;

    for _ in 0..5 {
        let err = app
            .lifecycle
            .login(&email, "Wrong1Password")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Invalid email or password");
    }

    let account = app.accounts.find_by_id(id).await.unwrap().unwrap();
    let now = Utc::now();
    assert!(account.is_locked(now));
    let minutes = account.lockout_minutes_remaining(now);
    assert!(
        (14..=15).contains(&minutes),
        "unexpected lockout window: {minutes} minute(s)"
    );
}

#[tokio::test]
async fn test_locked_account_rejects_correct_password_without_counting() {
    let app = helpers::TestAuth::new().await;
    let (id, email) = app
        .create_test_account("locked", "Correct1Password", AccountRole::Admin)
        .await;

    for _ in 0..5 {
        app.lifecycle
            .login(&email, "Wrong1Password")
            .await
            .unwrap_err();
    }

    let err = app
        .lifecycle
        .login(&email, "Correct1Password")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(
        err.message.starts_with("Account is locked"),
        "expected lockout rejection, got: {}",
        err.message
    );

    // The lockout gate fires before verification, so the attempt counter
    // does not move.
    let account = app.accounts.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.failed_attempts, 5);
}

#[tokio::test]
async fn test_login_succeeds_after_lockout_expires() {
    let app = helpers::TestAuth::new().await;
    let (id, email) = app
        .create_test_account("unlocked", "Correct1Password", AccountRole::Admin)
        .await;

    for _ in 0..5 {
        app.lifecycle
            .login(&email, "Wrong1Password")
            .await
            .unwrap_err();
    }

    sqlx::query("UPDATE accounts SET locked_until = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(id)
        .execute(&app.pool)
        .await
        .unwrap();

    let result = app
        .lifecycle
        .login(&email, "Correct1Password")
        .await
        .unwrap();
    assert_eq!(result.account.id, id);

    let account = app.accounts.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.failed_attempts, 0);
}
