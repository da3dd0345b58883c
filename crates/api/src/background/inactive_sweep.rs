//! Daily deactivation of stale accounts.
//!
//! Spawns a background task that deactivates active, non-staff,
//! non-superuser users whose last login is older than the configured
//! threshold. Runs on a fixed interval using `tokio::time::interval`
//! and is safe to re-run: a second sweep with no logins in between
//! matches zero users.

use std::sync::Arc;
use std::time::Duration;

use campus_db::repositories::UserRepo;
use campus_db::DbPool;
use campus_events::EmailDelivery;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// Default inactivity threshold: 30 days without a login.
const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60); // daily

/// Run the inactive-account sweep loop.
///
/// The threshold defaults to 30 days and can be overridden via
/// `INACTIVE_THRESHOLD_DAYS`. Runs until `cancel` is triggered.
pub async fn run(pool: DbPool, mailer: Option<Arc<EmailDelivery>>, cancel: CancellationToken) {
    let threshold_days: i64 = std::env::var("INACTIVE_THRESHOLD_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_THRESHOLD_DAYS);

    tracing::info!(
        threshold_days,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Inactive-account sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Inactive-account sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let outcome = sweep_once(&pool, mailer.as_deref(), threshold_days).await;
                tracing::info!(outcome = %outcome, "Inactive-account sweep completed");
            }
        }
    }
}

/// Deactivate every user inactive for longer than `threshold_days`.
///
/// Returns a textual outcome instead of an error: the sweep has no
/// synchronous caller to propagate to. When users were deactivated and
/// email is configured, a summary is sent to the operator address
/// (failures there are logged, not fatal).
pub async fn sweep_once(
    pool: &DbPool,
    mailer: Option<&EmailDelivery>,
    threshold_days: i64,
) -> String {
    let cutoff = Utc::now() - chrono::Duration::days(threshold_days);

    let deactivated = match UserRepo::deactivate_stale(pool, cutoff).await {
        Ok(count) => count,
        Err(e) => return format!("sweep failed: {e}"),
    };

    if deactivated == 0 {
        return "no users to deactivate".to_string();
    }

    if let Some(mailer) = mailer {
        let subject = "Inactive accounts deactivated".to_string();
        let body = format!(
            "{deactivated} account(s) with no login in the last {threshold_days} days were deactivated."
        );
        if let Err(e) = mailer
            .send(mailer.operator_address(), &subject, &body)
            .await
        {
            tracing::warn!(error = %e, "Failed to send sweep summary to operator");
        }
    }

    format!("deactivated {deactivated} inactive users")
}
