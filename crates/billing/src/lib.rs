//! Payment-provider client.
//!
//! A thin REST client for a Stripe-style checkout provider. Exactly four
//! operations are consumed:
//!
//! 1. create product
//! 2. create price (amount in minor currency units)
//! 3. create checkout session (returns session id + redirect URL)
//! 4. retrieve session (payment status + customer email)
//!
//! The provider's own API semantics beyond these calls are out of scope.
//! Callers treat any failure as "call failed" and must not persist
//! partial state.

pub mod client;

pub use client::{
    BillingClient, BillingConfig, BillingError, CheckoutSession, SessionStatus,
};
