//! Payment entity model, DTOs, and status/method vocabularies.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a payment was (or will be) settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    /// Online checkout through the payment provider.
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

/// Payment lifecycle state. `pending` is the only non-terminal state;
/// the allowed transitions are pending→paid and pending→failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// A row from the `payments` table.
///
/// Provider-internal identifiers (product, price, session) are kept out
/// of serialized responses; clients only ever need `payment_url`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    /// Amount in minor currency units (e.g. cents). Always > 0.
    pub amount_minor: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub paid_course_id: Option<DbId>,
    pub paid_lesson_id: Option<DbId>,
    #[serde(skip_serializing)]
    pub provider_product_id: Option<String>,
    #[serde(skip_serializing)]
    pub provider_price_id: Option<String>,
    #[serde(skip_serializing)]
    pub provider_session_id: Option<String>,
    pub payment_url: Option<String>,
    pub payment_date: Timestamp,
}

impl Payment {
    pub fn status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// DTO for inserting a payment row after the provider calls succeeded.
#[derive(Debug)]
pub struct CreatePayment {
    pub user_id: DbId,
    pub amount_minor: i64,
    pub payment_method: PaymentMethod,
    pub paid_course_id: Option<DbId>,
    pub paid_lesson_id: Option<DbId>,
    pub provider_product_id: Option<String>,
    pub provider_price_id: Option<String>,
    pub provider_session_id: Option<String>,
    pub payment_url: Option<String>,
}

/// Query parameters for `GET /api/v1/payments`.
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub paid_course_id: Option<DbId>,
    pub paid_lesson_id: Option<DbId>,
    pub payment_method: Option<String>,
    /// One of `payment_date`, `-payment_date`, `amount`, `-amount`.
    /// Defaults to `-payment_date` (newest first).
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
