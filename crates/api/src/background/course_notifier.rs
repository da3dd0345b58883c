//! Course-update subscriber notifications.
//!
//! Consumes `course.updated` events from the bus and emails every
//! subscriber of the course in a single batch message. The 4-hour
//! cooldown is enforced at publish time (see the course handlers), so
//! every event received here is actionable.
//!
//! All failures are swallowed into the outcome string: no caller is
//! waiting synchronously.

use std::sync::Arc;

use campus_core::types::DbId;
use campus_db::repositories::{CourseRepo, SubscriptionRepo};
use campus_db::DbPool;
use campus_events::bus::EVENT_COURSE_UPDATED;
use campus_events::{EmailDelivery, PlatformEvent};
use tokio::sync::broadcast;

/// Run the notifier loop.
///
/// Subscribes to the event bus via the provided `receiver` and processes
/// every `course.updated` event. The loop exits when the channel is
/// closed (i.e. the bus is dropped during shutdown).
pub async fn run(
    pool: DbPool,
    mailer: Option<Arc<EmailDelivery>>,
    mut receiver: broadcast::Receiver<PlatformEvent>,
) {
    tracing::info!("Course-update notifier started");

    loop {
        match receiver.recv().await {
            Ok(event) => {
                if event.event_type != EVENT_COURSE_UPDATED {
                    continue;
                }
                let Some(course_id) = event.source_entity_id else {
                    tracing::warn!("course.updated event without a source entity id");
                    continue;
                };
                let outcome =
                    notify_course_subscribers(&pool, mailer.as_deref(), course_id).await;
                tracing::info!(course_id, outcome = %outcome, "Course-update notification processed");
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Course-update notifier lagged, events were dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Event bus closed, course-update notifier shutting down");
                break;
            }
        }
    }
}

/// Email all subscribers of a course about an update.
///
/// Returns a textual outcome instead of an error: the job has no
/// synchronous caller to propagate to. No subscribers is a success.
pub async fn notify_course_subscribers(
    pool: &DbPool,
    mailer: Option<&EmailDelivery>,
    course_id: DbId,
) -> String {
    let course = match CourseRepo::find_by_id(pool, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return format!("course {course_id} no longer exists"),
        Err(e) => return format!("failed to load course {course_id}: {e}"),
    };

    let recipients = match SubscriptionRepo::subscriber_emails(pool, course_id).await {
        Ok(recipients) => recipients,
        Err(e) => return format!("failed to load subscribers of course {course_id}: {e}"),
    };

    if recipients.is_empty() {
        return format!("no subscribers for course \"{}\"", course.title);
    }

    let Some(mailer) = mailer else {
        return format!(
            "email delivery disabled, skipped {} subscribers of course \"{}\"",
            recipients.len(),
            course.title
        );
    };

    let subject = format!("Course \"{}\" updated", course.title);
    let body = format!(
        "The course \"{}\" has been updated. Visit the platform to see the new material.",
        course.title
    );

    match mailer.send_batch(&recipients, &subject, &body).await {
        Ok(()) => format!(
            "notified {} subscribers of course \"{}\"",
            recipients.len(),
            course.title
        ),
        Err(e) => format!("failed to email subscribers of course \"{}\": {e}", course.title),
    }
}
