use thiserror::Error;

/// Errors surfaced by sign-in, sign-up and token retrieval.
///
/// The `Display` text of each variant is the message shown inline on the
/// auth form; `InvalidCredentials` passes the provider's own message through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The provider rejected the email/password pair.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Sign-up with an email that is already registered.
    #[error("An account with this email already exists")]
    DuplicateAccount,

    /// Password fails the minimum policy (at least 6 characters).
    #[error("Password must be at least 6 characters")]
    WeakCredential,

    /// The exchange with the provider could not complete.
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// No current session.
    #[error("Not signed in")]
    Unauthenticated,
}

/// Errors surfaced by one query/response exchange with the answering
/// service. Never fatal: the controller returns to `Idle` on every variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The token was missing or rejected by the answering service.
    #[error("Session expired. Please sign in again")]
    Unauthenticated,

    /// Non-success status with a machine-readable `detail` message, passed
    /// through verbatim for display.
    #[error("{0}")]
    ServerRejected(String),

    /// The exchange could not complete.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Success status but the payload lacked the required `answer` field.
    #[error("Failed to parse response")]
    Malformed,
}
