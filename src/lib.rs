//! Core of the Learn with Jiji chat client.
//!
//! An authenticated user asks natural-language questions and gets answers
//! back with optional learning resources (slide decks, videos) attached.
//! This crate holds the session lifecycle, the single query/response
//! exchange with the answering service, and the conversation log with its
//! submission state machine. Rendering and navigation live elsewhere.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use jiji::{ChatController, Config, QueryService, SessionStore, SupabaseAuthClient};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let auth = SupabaseAuthClient::new("https://myproject.supabase.co", "anon-key");
//! let session = Arc::new(SessionStore::new(auth));
//!
//! session.sign_in("you@example.com", "secret123").await?;
//!
//! let mut chat = ChatController::new(
//!     session.clone(),
//!     QueryService::new(config.api_base_url.as_str()),
//! );
//! chat.submit("What is photosynthesis?").await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod services;

pub use error::{AuthError, QueryError};
pub use models::{Message, Resource, ResourceKind, ResourceRecord, Role, GREETING};
pub use services::auth_service::{
    Identity, IdentityProvider, Session, SessionStore, SignUp, MIN_PASSWORD_LEN,
};
pub use services::chat_service::{ChatController, SubmitState};
pub use services::config_service::{Config, ConfigError};
pub use services::query_service::{Answer, AnsweringService, QueryService};
pub use services::supabase_client::SupabaseAuthClient;
