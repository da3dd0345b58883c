//! HTTP client for the checkout provider's REST API.
//!
//! Requests are form-encoded and authenticated with a bearer secret key,
//! matching the provider's API conventions. The base URL is overridable
//! so tests can point the client at a local stub server.

use std::time::Duration;

use serde::Deserialize;

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default provider API base URL.
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Default checkout currency.
const DEFAULT_CURRENCY: &str = "usd";

/// Session payment status reported by the provider once the customer
/// has completed checkout.
const SESSION_STATUS_PAID: &str = "paid";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for provider call failures.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// BillingConfig
// ---------------------------------------------------------------------------

/// Configuration for the payment-provider client.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Secret API key used as a bearer token.
    pub secret_key: String,
    /// Provider API base URL.
    pub api_base: String,
    /// ISO currency code for created prices.
    pub currency: String,
    /// Where the provider redirects after a successful checkout.
    pub success_url: String,
    /// Where the provider redirects after a cancelled checkout.
    pub cancel_url: String,
}

impl BillingConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `PAYMENT_SECRET_KEY` is not set, signalling
    /// that the checkout integration is disabled.
    ///
    /// | Variable              | Required | Default                                      |
    /// |-----------------------|----------|----------------------------------------------|
    /// | `PAYMENT_SECRET_KEY`  | yes      | —                                            |
    /// | `PAYMENT_API_BASE`    | no       | `https://api.stripe.com`                     |
    /// | `PAYMENT_CURRENCY`    | no       | `usd`                                        |
    /// | `PAYMENT_SUCCESS_URL` | no       | `http://localhost:3000/api/v1/payments/success` |
    /// | `PAYMENT_CANCEL_URL`  | no       | `http://localhost:3000/api/v1/payments/cancel`  |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("PAYMENT_SECRET_KEY").ok()?;
        Some(Self {
            secret_key,
            api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            currency: std::env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
            success_url: std::env::var("PAYMENT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/v1/payments/success".to_string()),
            cancel_url: std::env::var("PAYMENT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/v1/payments/cancel".to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProviderObject {
    id: String,
}

/// A checkout session minted by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Provider session identifier.
    pub id: String,
    /// Hosted checkout page the customer is redirected to.
    pub url: String,
}

/// Status of an existing checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub id: String,
    pub payment_status: String,
    #[serde(default)]
    customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, Deserialize)]
struct CustomerDetails {
    email: Option<String>,
}

impl SessionStatus {
    /// Whether the provider reports the session as paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status == SESSION_STATUS_PAID
    }

    /// Email the customer entered during checkout, when available.
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
    }
}

// ---------------------------------------------------------------------------
// BillingClient
// ---------------------------------------------------------------------------

/// Client for the four consumed provider operations.
pub struct BillingClient {
    config: BillingConfig,
    client: reqwest::Client,
}

impl BillingClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: BillingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// The configured success redirect URL.
    pub fn success_url(&self) -> &str {
        &self.config.success_url
    }

    /// The configured cancel redirect URL.
    pub fn cancel_url(&self) -> &str {
        &self.config.cancel_url
    }

    /// Create a product, returning its provider id.
    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
    ) -> Result<String, BillingError> {
        let mut form = vec![("name", name.to_string())];
        if !description.is_empty() {
            form.push(("description", description.to_string()));
        }
        let object: ProviderObject = self.post_form("/v1/products", &form).await?;
        Ok(object.id)
    }

    /// Create a price for a product, returning its provider id.
    ///
    /// `amount_minor` is in minor currency units (e.g. cents).
    pub async fn create_price(
        &self,
        amount_minor: i64,
        product_id: &str,
    ) -> Result<String, BillingError> {
        let form = vec![
            ("unit_amount", amount_minor.to_string()),
            ("currency", self.config.currency.clone()),
            ("product", product_id.to_string()),
        ];
        let object: ProviderObject = self.post_form("/v1/prices", &form).await?;
        Ok(object.id)
    }

    /// Create a hosted checkout session for a single price.
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let form = vec![
            ("success_url", self.config.success_url.clone()),
            ("cancel_url", self.config.cancel_url.clone()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("mode", "payment".to_string()),
        ];
        self.post_form("/v1/checkout/sessions", &form).await
    }

    /// Retrieve an existing checkout session by id.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus, BillingError> {
        let url = format!("{}/v1/checkout/sessions/{session_id}", self.config.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Execute a form-encoded POST and decode the JSON response.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, BillingError> {
        let url = format!("{}{path}", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BillingError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Provider call failed");
            return Err(BillingError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
