//! User credential and social-graph model for a Conduit-style API.
//!
//! Owns per-user secret material (salt + KDF hash), issues time-boxed
//! signed session tokens, and maintains the `following` and `favorites`
//! relations. Persistence goes through the [`UserStore`] trait; the HTTP
//! layer is expected to live in a separate crate and call into
//! [`UserService`] plus the view methods on [`User`].

pub mod auth;
pub mod config;
pub mod db;
pub mod types;

pub use auth::token::TokenSigner;
pub use config::EnvConfig;
pub use db::memory::MemStore;
pub use db::postgres::PgStore;
pub use db::store::UserStore;
pub use db::users::UserService;
pub use types::error::AppError;
pub use types::token::Claims;
pub use types::user::{AuthView, NewUser, ProfileView, User};
