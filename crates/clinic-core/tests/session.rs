//! Session store behavior against a stubbed backend.

mod common;

use std::sync::Arc;

use clinic_core::{
    AuthError, BearerToken, Credentials, MemoryStorage, SessionStore, StoredSession,
    TokenStorage, TransportError, UserSummary,
};
use serde_json::json;

use common::{Fault, FaultyStorage, StubTransport, setup};

#[tokio::test]
async fn login_persists_token_and_user() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    let (session, _, storage) = setup(&transport);

    let established = session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    assert_eq!(established.token(), Some(&BearerToken::new("t1")));
    assert_eq!(session.current_token(), Some(BearerToken::new("t1")));
    assert_eq!(session.current_user().unwrap().email, "a@b.com");

    let stored = storage.snapshot().expect("token should be persisted");
    assert_eq!(stored.token, "t1");
    assert_eq!(stored.user.email, "a@b.com");

    let request = transport.last_request();
    assert_eq!(request.path(), "/login");
    assert_eq!(
        request.body(),
        Some(&json!({"email": "a@b.com", "password": "x"}))
    );
    assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn login_accepts_access_token_and_backend_user() {
    let transport = StubTransport::new();
    transport.respond(
        200,
        json!({
            "access_token": "t2",
            "user": {"email": "admin@clinic.test", "first_name": "Ada"}
        }),
    );
    let (session, _, _) = setup(&transport);

    session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    assert_eq!(session.current_token(), Some(BearerToken::new("t2")));
    let user = session.current_user().unwrap();
    assert_eq!(user.email, "admin@clinic.test");
    assert_eq!(user.profile["first_name"], json!("Ada"));
}

#[tokio::test]
async fn login_without_token_field_fails_and_leaves_no_state() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"user": {"email": "a@b.com"}}));
    let (session, _, storage) = setup(&transport);

    let err = session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MissingToken));
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(storage.snapshot().is_none());
}

#[tokio::test]
async fn rejected_login_carries_server_message() {
    let transport = StubTransport::new();
    transport.respond(401, json!({"message": "Invalid credentials"}));
    let (session, _, _) = setup(&transport);

    let err = session
        .login(Credentials::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    match err {
        AuthError::Rejected { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn rejected_login_without_message_uses_fallback() {
    let transport = StubTransport::new();
    transport.respond_text(500, "");
    let (session, _, _) = setup(&transport);

    let err = session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
}

#[tokio::test]
async fn network_failure_is_an_auth_error() {
    let transport = StubTransport::new();
    transport.fail(TransportError::Connection {
        message: "connection refused".into(),
    });
    let (session, _, _) = setup(&transport);

    let err = session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Transport { .. }));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn blank_credentials_never_reach_the_backend() {
    let transport = StubTransport::new();
    let (session, _, _) = setup(&transport);

    let err = session
        .login(Credentials::new("", ""))
        .await
        .unwrap_err();

    let AuthError::MissingCredentials { errors } = err else {
        panic!("expected missing credentials");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn logout_clears_memory_and_storage_idempotently() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    let (session, _, storage) = setup(&transport);
    session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    session.logout().await.unwrap();
    assert_eq!(session.current_token(), None);
    assert!(session.current_user().is_none());
    assert!(storage.snapshot().is_none());

    session.logout().await.unwrap();
    assert_eq!(session.current_token(), None);
}

#[tokio::test]
async fn restore_returns_what_was_persisted() {
    let storage = Arc::new(MemoryStorage::with_session(StoredSession::new(
        &BearerToken::new("persisted-token"),
        UserSummary::new("a@b.com"),
    )));
    let session = SessionStore::new(StubTransport::new(), storage);

    assert_eq!(session.current_token(), None);
    assert!(session.restore_from_storage().await.unwrap());
    assert_eq!(
        session.current_token(),
        Some(BearerToken::new("persisted-token"))
    );
    assert_eq!(session.current_user().unwrap().email, "a@b.com");
}

#[tokio::test]
async fn restore_after_login_round_trips_through_storage() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    let (first, _, storage) = setup(&transport);
    first
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    // A fresh store over the same storage, as after a restart.
    let second = SessionStore::new(transport.clone(), storage.clone());
    second.restore_from_storage().await.unwrap();
    assert_eq!(second.current_token(), first.current_token());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn restore_with_empty_storage_stays_logged_out() {
    let session = SessionStore::new(StubTransport::new(), Arc::new(MemoryStorage::new()));
    assert!(!session.restore_from_storage().await.unwrap());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn subscribers_see_login_and_logout() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    let (session, _, _) = setup(&transport);
    let mut changes = session.subscribe();
    assert!(!*changes.borrow());

    session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();
    changes.changed().await.unwrap();
    assert!(*changes.borrow_and_update());

    session.logout().await.unwrap();
    changes.changed().await.unwrap();
    assert!(!*changes.borrow_and_update());
}

#[tokio::test]
async fn stale_rejection_does_not_clear_newer_session() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "new"}));
    let (session, _, storage) = setup(&transport);
    session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    assert!(!session.clear_if_current(&BearerToken::new("old")).await);
    assert_eq!(session.current_token(), Some(BearerToken::new("new")));
    assert!(storage.load().await.unwrap().is_some());

    assert!(session.clear_if_current(&BearerToken::new("new")).await);
    assert_eq!(session.current_token(), None);
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn failed_persist_leaves_session_logged_out() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    let storage = FaultyStorage::new(Fault::Broken);
    let session = SessionStore::new(transport.clone(), storage.clone());

    let err = session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Persist(_)));
    assert!(err.to_string().contains("failed to persist session"));
    assert_eq!(session.current_token(), None);
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn corrupt_record_restores_as_logged_out() {
    let session = SessionStore::new(StubTransport::new(), FaultyStorage::new(Fault::Corrupt));

    assert!(!session.restore_from_storage().await.unwrap());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn blank_stored_token_restores_as_logged_out() {
    let storage = Arc::new(MemoryStorage::with_session(StoredSession::new(
        &BearerToken::new("  "),
        UserSummary::new("a@b.com"),
    )));
    let session = SessionStore::new(StubTransport::new(), storage);

    assert!(!session.restore_from_storage().await.unwrap());
    assert_eq!(session.current_token(), None);
}

#[tokio::test]
async fn logout_clears_memory_even_when_storage_fails() {
    let storage = FaultyStorage::seeded(
        Fault::Broken,
        StoredSession::new(&BearerToken::new("t1"), UserSummary::new("a@b.com")),
    );
    let session = SessionStore::new(StubTransport::new(), storage);
    assert!(session.restore_from_storage().await.unwrap());

    let err = session.logout().await.unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn rejection_racing_a_login_keeps_the_new_token_durable() {
    let transport = StubTransport::new();
    transport.respond(200, json!({"token": "t1"}));
    transport.respond(200, json!({"token": "t2"}));
    let storage = FaultyStorage::new(Fault::SlowClear);
    let session = SessionStore::new(transport.clone(), storage.clone());
    session
        .login(Credentials::new("a@b.com", "x"))
        .await
        .unwrap();

    let t1 = BearerToken::new("t1");
    let (_, relogin) = tokio::join!(
        session.clear_if_current(&t1),
        session.login(Credentials::new("a@b.com", "x")),
    );

    relogin.unwrap();
    assert_eq!(session.current_token(), Some(BearerToken::new("t2")));
    assert_eq!(storage.snapshot().map(|s| s.token).as_deref(), Some("t2"));
}
