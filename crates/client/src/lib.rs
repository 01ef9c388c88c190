//! Typed client for the CERCLE REST API.
//!
//! - [`api::ApiClient`] -- one method per endpoint, bearer token injection.
//! - [`session::SessionStore`] -- the signed-in user, persisted to a JSON file.
//! - [`list_state`] -- optimistic list updates after delete/cancel.
//! - [`availability`] -- calendar and hour-grid views of a space.

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod list_state;
pub mod session;
pub mod types;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Session, SessionStore};
