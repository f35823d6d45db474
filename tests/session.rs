//! SessionStore behavior against a scripted identity provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use jiji::{AuthError, Identity, IdentityProvider, Session, SessionStore, SignUp};

#[derive(Clone, Default)]
struct FakeProvider {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    sign_in: Mutex<Option<Result<Session, AuthError>>>,
    register: Mutex<Option<Result<Option<Session>, AuthError>>>,
    refresh: Mutex<Option<Result<Session, AuthError>>>,
    register_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl FakeProvider {
    fn on_sign_in(self, result: Result<Session, AuthError>) -> Self {
        *self.inner.sign_in.lock().unwrap() = Some(result);
        self
    }

    fn on_register(self, result: Result<Option<Session>, AuthError>) -> Self {
        *self.inner.register.lock().unwrap() = Some(result);
        self
    }

    fn on_refresh(self, result: Result<Session, AuthError>) -> Self {
        *self.inner.refresh.lock().unwrap() = Some(result);
        self
    }

    fn register_calls(&self) -> usize {
        self.inner.register_calls.load(Ordering::SeqCst)
    }

    fn refresh_calls(&self) -> usize {
        self.inner.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn password_sign_in(&self, _: &str, _: &str) -> Result<Session, AuthError> {
        self.inner
            .sign_in
            .lock()
            .unwrap()
            .clone()
            .expect("sign-in not scripted")
    }

    async fn register(&self, _: &str, _: &str, _: &str) -> Result<Option<Session>, AuthError> {
        self.inner.register_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .register
            .lock()
            .unwrap()
            .clone()
            .expect("register not scripted")
    }

    async fn refresh(&self, _: &str) -> Result<Session, AuthError> {
        self.inner.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .refresh
            .lock()
            .unwrap()
            .clone()
            .expect("refresh not scripted")
    }
}

fn session(token: &str, expires_in: i64) -> Session {
    Session {
        identity: Identity {
            id: "u1".to_string(),
            email: "user@example.com".to_string(),
            display_name: Some("Jiji Fan".to_string()),
        },
        access_token: token.to_string(),
        refresh_token: format!("{token}-refresh"),
        expires_at: Utc::now().timestamp() + expires_in,
    }
}

#[tokio::test]
async fn sign_in_makes_the_session_current() {
    let provider = FakeProvider::default().on_sign_in(Ok(session("tok", 3600)));
    let store = SessionStore::new(provider);

    assert!(store.current_identity().is_none());
    store.sign_in("user@example.com", "secret123").await.unwrap();

    let identity = store.current_identity().unwrap();
    assert_eq!(identity.email, "user@example.com");
    assert_eq!(store.access_token().await.unwrap(), "tok");
}

#[tokio::test]
async fn rejected_credentials_leave_the_store_signed_out() {
    let provider = FakeProvider::default()
        .on_sign_in(Err(AuthError::InvalidCredentials("Invalid login credentials".into())));
    let store = SessionStore::new(provider);

    let err = store.sign_in("user@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(store.current_identity().is_none());
}

#[tokio::test]
async fn short_password_never_reaches_the_provider() {
    let provider = FakeProvider::default();
    let store = SessionStore::new(provider.clone());

    let err = store
        .sign_up("user@example.com", "12345", "Jiji Fan")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::WeakCredential);
    assert_eq!(provider.register_calls(), 0);
}

#[tokio::test]
async fn duplicate_email_does_not_alter_the_current_session() {
    let provider = FakeProvider::default()
        .on_sign_in(Ok(session("tok", 3600)))
        .on_register(Err(AuthError::DuplicateAccount));
    let store = SessionStore::new(provider);

    store.sign_in("user@example.com", "secret123").await.unwrap();
    let err = store
        .sign_up("user@example.com", "secret123", "Jiji Fan")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::DuplicateAccount);
    assert_eq!(store.current_identity().unwrap().id, "u1");
}

#[tokio::test]
async fn active_sign_up_makes_the_session_current() {
    let provider = FakeProvider::default().on_register(Ok(Some(session("fresh", 3600))));
    let store = SessionStore::new(provider);

    match store
        .sign_up("user@example.com", "secret123", "Jiji Fan")
        .await
        .unwrap()
    {
        SignUp::Active(session) => assert_eq!(session.access_token, "fresh"),
        other => panic!("expected an active session, got {other:?}"),
    }
    assert!(store.current_identity().is_some());
}

#[tokio::test]
async fn pending_verification_leaves_the_store_signed_out() {
    let provider = FakeProvider::default().on_register(Ok(None));
    let store = SessionStore::new(provider);

    match store
        .sign_up("user@example.com", "secret123", "Jiji Fan")
        .await
        .unwrap()
    {
        SignUp::PendingVerification { email } => assert_eq!(email, "user@example.com"),
        other => panic!("expected pending verification, got {other:?}"),
    }
    assert!(store.current_identity().is_none());
    assert!(store.access_token().await.is_err());
}

#[tokio::test]
async fn fresh_token_is_returned_without_a_refresh() {
    let provider = FakeProvider::default().on_sign_in(Ok(session("tok", 3600)));
    let store = SessionStore::new(provider.clone());

    store.sign_in("user@example.com", "secret123").await.unwrap();
    assert_eq!(store.access_token().await.unwrap(), "tok");
    assert_eq!(provider.refresh_calls(), 0);
}

#[tokio::test]
async fn expiring_token_refreshes_transparently() {
    let provider = FakeProvider::default()
        .on_sign_in(Ok(session("stale", 10)))
        .on_refresh(Ok(session("renewed", 3600)));
    let store = SessionStore::new(provider.clone());

    store.sign_in("user@example.com", "secret123").await.unwrap();
    assert_eq!(store.access_token().await.unwrap(), "renewed");
    assert_eq!(provider.refresh_calls(), 1);

    // The renewed session is current now; no second refresh.
    assert_eq!(store.access_token().await.unwrap(), "renewed");
    assert_eq!(provider.refresh_calls(), 1);
}

#[tokio::test]
async fn rejected_refresh_drops_the_session() {
    let provider = FakeProvider::default()
        .on_sign_in(Ok(session("stale", 10)))
        .on_refresh(Err(AuthError::InvalidCredentials("refresh token revoked".into())));
    let store = SessionStore::new(provider);

    store.sign_in("user@example.com", "secret123").await.unwrap();
    let err = store.access_token().await.unwrap_err();

    assert_eq!(err, AuthError::Unauthenticated);
    assert!(store.current_identity().is_none());
}

#[tokio::test]
async fn network_failure_during_refresh_keeps_the_session() {
    let provider = FakeProvider::default()
        .on_sign_in(Ok(session("stale", 10)))
        .on_refresh(Err(AuthError::NetworkFailure("timed out".into())));
    let store = SessionStore::new(provider);

    store.sign_in("user@example.com", "secret123").await.unwrap();
    let err = store.access_token().await.unwrap_err();

    assert_eq!(err, AuthError::NetworkFailure("timed out".into()));
    assert!(store.current_identity().is_some());
}

#[tokio::test]
async fn access_token_without_a_session_is_unauthenticated() {
    let provider = FakeProvider::default();
    let store = SessionStore::new(provider.clone());

    assert_eq!(store.access_token().await.unwrap_err(), AuthError::Unauthenticated);
    assert_eq!(provider.refresh_calls(), 0);
}

#[tokio::test]
async fn sign_out_is_idempotent() {
    let provider = FakeProvider::default().on_sign_in(Ok(session("tok", 3600)));
    let store = SessionStore::new(provider);

    store.sign_in("user@example.com", "secret123").await.unwrap();
    store.sign_out();
    store.sign_out();

    assert!(store.current_identity().is_none());
}

#[tokio::test]
async fn persisted_session_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let provider = FakeProvider::default().on_sign_in(Ok(session("tok", 3600)));
    let store = SessionStore::persistent(provider, path.clone());
    store.sign_in("user@example.com", "secret123").await.unwrap();
    assert!(path.exists());

    let restarted = SessionStore::persistent(FakeProvider::default(), path.clone());
    assert_eq!(restarted.current_identity().unwrap().id, "u1");
    assert_eq!(restarted.access_token().await.unwrap(), "tok");
}

#[tokio::test]
async fn sign_out_removes_the_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let provider = FakeProvider::default().on_sign_in(Ok(session("tok", 3600)));
    let store = SessionStore::persistent(provider, path.clone());
    store.sign_in("user@example.com", "secret123").await.unwrap();
    store.sign_out();

    assert!(!path.exists());
    let restarted = SessionStore::persistent(FakeProvider::default(), path);
    assert!(restarted.current_identity().is_none());
}
