//! Campus event bus and notification delivery.
//!
//! Building blocks for the fire-and-forget side of the platform:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Request handlers publish domain events
//!   and never wait for consumers.
//! - [`PlatformEvent`] — the canonical domain event envelope.
//! - [`delivery`] — SMTP email delivery via `lettre`.

pub mod bus;
pub mod delivery;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
