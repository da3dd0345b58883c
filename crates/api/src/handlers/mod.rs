//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod courses;
pub mod lessons;
pub mod payments;
pub mod subscriptions;
pub mod users;
