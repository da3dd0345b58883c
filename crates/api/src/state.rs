use std::sync::Arc;

use campus_billing::BillingClient;
use campus_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration (JWT settings, timeouts, CORS).
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// Payment-provider client. `None` when checkout is not configured;
    /// payment creation then fails with an external-service error.
    pub billing: Option<Arc<BillingClient>>,
}
