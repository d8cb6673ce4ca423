//! Integration tests for the password reset flow against a live store.

mod helpers;

use std::sync::Arc;

use uuid::Uuid;

use rentbase_auth::reset::PasswordResetFlow;
use rentbase_core::error::ErrorKind;
use rentbase_core::traits::NullMailer;
use rentbase_entity::account::AccountRole;

#[tokio::test]
async fn test_reset_token_consumes_exactly_once() {
    let app = helpers::TestAuth::new().await;
    let (_id, email) = app
        .create_test_account("reset", "Original1Pass", AccountRole::Admin)
        .await;

    let mailer = Arc::new(helpers::CapturingMailer::default());
    let flow = PasswordResetFlow::new(&app.config, Arc::clone(&app.accounts), Arc::clone(&mailer) as Arc<_>);

    flow.request(&email).await.unwrap();
    let token = mailer
        .last_token
        .lock()
        .unwrap()
        .clone()
        .expect("no reset token delivered");

    flow.consume(&token, "Replaced1Pass").await.unwrap();

    let err = flow.consume(&token, "Another1Pass").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.message, "Invalid or expired reset token");

    // Only the new password logs in.
    app.lifecycle.login(&email, "Replaced1Pass").await.unwrap();
    let err = app
        .lifecycle
        .login(&email, "Original1Pass")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_reset_request_is_existence_blind() {
    let app = helpers::TestAuth::new().await;
    let flow = PasswordResetFlow::new(
        &app.config,
        Arc::clone(&app.accounts),
        Arc::new(NullMailer),
    );

    let unknown = format!("nobody-{}@test.rentbase.io", Uuid::new_v4());
    flow.request(&unknown).await.unwrap();
}

#[tokio::test]
async fn test_reset_request_succeeds_despite_mail_failure() {
    let app = helpers::TestAuth::new().await;
    let (id, email) = app
        .create_test_account("resetfail", "Original1Pass", AccountRole::Admin)
        .await;

    let flow = PasswordResetFlow::new(
        &app.config,
        Arc::clone(&app.accounts),
        Arc::new(helpers::BrokenMailer),
    );

    flow.request(&email).await.unwrap();

    // The token was stored despite the failed hand-off, so a retried
    // delivery can still complete the flow.
    let account = app.accounts.find_by_id(id).await.unwrap().unwrap();
    let token = account.reset_token.expect("reset token not stored");
    flow.consume(&token, "Replaced1Pass").await.unwrap();
}
