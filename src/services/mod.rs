pub mod auth_service;
pub mod chat_service;
pub mod config_service;
pub mod query_service;
pub mod supabase_client;
