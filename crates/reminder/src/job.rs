//! The grouped reminder job.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use futures::future::join_all;
use indexmap::IndexMap;
use sprig_core::date::ymd_in_tz;
use sprig_core::types::Timestamp;
use sprig_push::{PushDelivery, PushMessage, WebPushOptions};
use sprig_store::{DocumentStore, PlantRecord, StoreError};

/// Notification title shown on every reminder.
pub const NOTIFICATION_TITLE: &str = "Don't forget to water 🌱";

/// Category tag carried in the structured payload (`data.type`).
pub const NOTIFICATION_CATEGORY: &str = "watering_reminder";

/// De-duplication tag: same-day repeats collapse into one visible alert
/// on the client instead of stacking.
pub const DEDUPE_TAG: &str = "watering_reminder_daily";

/// Display name for plants whose record carries no name.
pub const DEFAULT_PLANT_NAME: &str = "Your plant";

const URGENCY_HIGH: &str = "high";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Fatal error for a reminder run.
///
/// Per-token delivery failures and token-cleanup failures are absorbed
/// inside the run; the only fatal condition is being unable to enumerate
/// the plant records at all.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("failed to enumerate plants: {0}")]
    PlantScan(#[source] StoreError),
}

// ---------------------------------------------------------------------------
// ReminderJob
// ---------------------------------------------------------------------------

/// One unwatered plant inside an owner's group.
#[derive(Debug, Clone, PartialEq)]
struct UnwateredPlant {
    id: String,
    name: String,
}

/// Sends at most one push notification per owner per invocation,
/// summarizing all of that owner's plants not watered on the current
/// calendar day, and opportunistically prunes dead device tokens.
///
/// Collaborators are injected so tests can substitute fakes; the job
/// holds no ambient state.
pub struct ReminderJob {
    store: Arc<dyn DocumentStore>,
    delivery: Arc<dyn PushDelivery>,
    timezone: Tz,
}

impl ReminderJob {
    pub fn new(store: Arc<dyn DocumentStore>, delivery: Arc<dyn PushDelivery>, timezone: Tz) -> Self {
        Self {
            store,
            delivery,
            timezone,
        }
    }

    /// Run one reminder pass against the current instant.
    pub async fn run_once(&self) -> Result<u64, ReminderError> {
        self.run_at(Utc::now()).await
    }

    /// Run one reminder pass, judging freshness against `now`.
    ///
    /// "Today" is computed once here; every plant in the run is compared
    /// against the same calendar date. Returns the total number of
    /// individual token deliveries that succeeded.
    pub async fn run_at(&self, now: Timestamp) -> Result<u64, ReminderError> {
        let today = ymd_in_tz(now, self.timezone);

        let plants = self
            .store
            .list_plants()
            .await
            .map_err(ReminderError::PlantScan)?;

        let groups = group_unwatered(plants, &today, self.timezone);

        let mut sent: u64 = 0;
        for (owner_id, plants) in &groups {
            sent += self.notify_owner(owner_id, plants).await;
        }

        tracing::info!(sent, today = %today, "Grouped reminders sent");
        Ok(sent)
    }

    /// Deliver one owner's reminder to every registered token and
    /// reconcile the outcomes. Never fails: every error here is routine
    /// (missing user, no tokens, stale tokens) and must not affect other
    /// owners.
    async fn notify_owner(&self, owner_id: &str, plants: &[UnwateredPlant]) -> u64 {
        let user = match self.store.get_user(owner_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!(owner_id, error = %e, "Failed to read owner record, skipping");
                return 0;
            }
        };

        let tokens = user.effective_tokens();
        if tokens.is_empty() {
            return 0;
        }

        // Fan out one send per token and wait for every attempt to settle;
        // a failure on one token must not abort delivery to any other.
        let attempts = tokens.iter().map(|token| {
            let message = compose_message(token, plants);
            async move { self.delivery.send(&message).await }
        });
        let outcomes = join_all(attempts).await;

        let mut sent = 0;
        for (token, outcome) in tokens.iter().zip(outcomes) {
            match outcome {
                Ok(()) => sent += 1,
                Err(err) => {
                    tracing::warn!(owner_id, code = err.code(), error = %err, "Send failed");
                    if err.is_invalid_token() {
                        // Best-effort prune of the dead token.
                        if let Err(cleanup) = self.store.remove_token(owner_id, token).await {
                            tracing::warn!(owner_id, error = %cleanup, "Token cleanup failed");
                        }
                    }
                }
            }
        }
        sent
    }
}

// ---------------------------------------------------------------------------
// Grouping and composition
// ---------------------------------------------------------------------------

/// Group plants not watered on `today` by owner.
///
/// Owners keep first-seen order, plants keep first-seen order within an
/// owner. Plants without an owner are skipped entirely; an absent
/// last-watered value means never watered, so always eligible.
fn group_unwatered(
    plants: Vec<PlantRecord>,
    today: &str,
    tz: Tz,
) -> IndexMap<String, Vec<UnwateredPlant>> {
    let mut by_owner: IndexMap<String, Vec<UnwateredPlant>> = IndexMap::new();

    for plant in plants {
        let Some(owner_id) = plant.owner_id else {
            continue;
        };

        let watered_today = plant
            .last_watered_at
            .is_some_and(|at| ymd_in_tz(at, tz) == today);
        if watered_today {
            continue;
        }

        by_owner.entry(owner_id).or_default().push(UnwateredPlant {
            id: plant.id,
            name: plant
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_PLANT_NAME.to_string()),
        });
    }

    by_owner
}

/// Compose the per-owner reminder message for one target token.
fn compose_message(token: &str, plants: &[UnwateredPlant]) -> PushMessage {
    let first = &plants[0].name;
    let body = if plants.len() == 1 {
        format!("{first} haven't been watered today")
    } else {
        format!("{first} and {} more haven't been watered today", plants.len() - 1)
    };

    let plant_ids = plants
        .iter()
        .map(|p| p.id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut data = IndexMap::new();
    data.insert("type".to_string(), NOTIFICATION_CATEGORY.to_string());
    data.insert("plantIds".to_string(), plant_ids);
    data.insert("count".to_string(), plants.len().to_string());

    PushMessage {
        token: token.to_string(),
        title: NOTIFICATION_TITLE.to_string(),
        body,
        data,
        webpush: WebPushOptions {
            urgency: URGENCY_HIGH.to_string(),
            tag: DEDUPE_TAG.to_string(),
            renotify: true,
        },
    }
}
