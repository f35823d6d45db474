//! Session lifecycle: who is signed in, and how to get a usable token.
//!
//! `SessionStore` is the single owner of the current session. Everything
//! else asks it for a token snapshot per request and never holds session
//! state of its own.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AuthError;

/// Minimum password length accepted before the provider is even asked.
pub const MIN_PASSWORD_LEN: usize = 6;

// Tokens within this many seconds of expiry are refreshed before use.
const REFRESH_BUFFER_SECS: i64 = 60;

/// The signed-in user, as issued by the identity provider. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The current authenticated context: identity plus tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub identity: Identity,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp at which the access token expires.
    pub expires_at: i64,
}

impl Session {
    fn is_expiring(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at - REFRESH_BUFFER_SECS
    }
}

/// Outcome of a sign-up attempt.
///
/// Providers that require email confirmation register the account but issue
/// no session; that case is `PendingVerification` and the caller sends the
/// user to their inbox instead of into the chat.
#[derive(Debug, Clone)]
pub enum SignUp {
    /// The account is active and the session is now current.
    Active(Session),
    /// The account exists but must be confirmed by email first.
    PendingVerification { email: String },
}

/// Narrow seam to the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Email/password sign-in.
    async fn password_sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Register a new account. `Ok(None)` means the provider requires email
    /// confirmation before it will issue a session.
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<Session>, AuthError>;

    /// Exchange a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError>;
}

/// Single source of truth for the current session.
///
/// At most one session is current at a time. With a storage path configured,
/// the session survives restarts: it is loaded at construction, saved after
/// sign-in/sign-up/refresh, and the file is removed on sign-out.
pub struct SessionStore<P> {
    provider: P,
    current: Mutex<Option<Session>>,
    storage_path: Option<PathBuf>,
}

impl<P: IdentityProvider> SessionStore<P> {
    /// In-memory store; the session does not survive a restart.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
            storage_path: None,
        }
    }

    /// Store that persists the session to `path`, restoring any previously
    /// saved session eagerly.
    pub fn persistent(provider: P, path: PathBuf) -> Self {
        let current = load_session(&path);
        Self {
            provider,
            current: Mutex::new(current),
            storage_path: Some(path),
        }
    }

    /// Default on-disk location for the persisted session.
    pub fn default_storage_path() -> Option<PathBuf> {
        Some(dirs::data_dir()?.join("Jiji").join("session.json"))
    }

    /// Sign in with email and password. On success the returned session
    /// becomes current.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        info!(email, "signing in");
        let session = self.provider.password_sign_in(email, password).await?;
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    /// Register a new account. The password policy is checked locally first;
    /// the provider is not called for a too-short password. An `Active`
    /// outcome makes the new session current, `PendingVerification` leaves
    /// the store signed out.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUp, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakCredential);
        }

        info!(email, "registering account");
        match self.provider.register(email, password, display_name).await? {
            Some(session) => {
                self.set_current(Some(session.clone()));
                Ok(SignUp::Active(session))
            }
            None => {
                info!(email, "account pending email confirmation");
                Ok(SignUp::PendingVerification {
                    email: email.to_string(),
                })
            }
        }
    }

    /// Clear the current session and any persisted copy. Idempotent.
    pub fn sign_out(&self) {
        self.set_current(None);
    }

    /// The signed-in identity, if any. Synchronous and non-blocking.
    pub fn current_identity(&self) -> Option<Identity> {
        self.cell().as_ref().map(|s| s.identity.clone())
    }

    /// Access token for the next outbound query, refreshing transparently
    /// when the current one is about to expire.
    ///
    /// A refresh rejected by the provider drops the session (it is expired
    /// on the provider side); a transport failure keeps it, since the token
    /// may still be honored once connectivity returns.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let refresh_token = {
            let guard = self.cell();
            let session = guard.as_ref().ok_or(AuthError::Unauthenticated)?;
            if !session.is_expiring() {
                return Ok(session.access_token.clone());
            }
            session.refresh_token.clone()
        };

        match self.provider.refresh(&refresh_token).await {
            Ok(session) => {
                let token = session.access_token.clone();
                self.set_current(Some(session));
                Ok(token)
            }
            Err(AuthError::NetworkFailure(message)) => Err(AuthError::NetworkFailure(message)),
            Err(err) => {
                warn!("token refresh rejected: {}", err);
                self.set_current(None);
                Err(AuthError::Unauthenticated)
            }
        }
    }

    fn set_current(&self, session: Option<Session>) {
        if let Some(path) = &self.storage_path {
            match &session {
                Some(session) => save_session(path, session),
                None => clear_session(path),
            }
        }
        *self.cell() = session;
    }

    fn cell(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_session(path: &Path) -> Option<Session> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("discarding unreadable session file: {}", e);
            None
        }
    }
}

// Persistence is best-effort: a failed write leaves the session current for
// this run, it just won't survive a restart.
fn save_session(path: &Path, session: &Session) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match serde_json::to_string_pretty(session) {
        Ok(content) => {
            if let Err(e) = fs::write(path, content) {
                warn!("failed to persist session: {}", e);
            }
        }
        Err(e) => warn!("failed to serialize session: {}", e),
    }
}

fn clear_session(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove persisted session: {}", e);
        }
    }
}
