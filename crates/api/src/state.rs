use std::sync::Arc;

use crate::config::ServerConfig;
use crate::payments::PaymentVerifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: cercle_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Payment provider access and payment proof checks.
    pub payments: Arc<PaymentVerifier>,
}
