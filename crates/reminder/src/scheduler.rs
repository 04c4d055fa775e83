//! Daily wall-clock scheduler for the reminder job.
//!
//! Fires once per day at a fixed local time in the reference timezone
//! (default 20:00). Spawned via `tokio::spawn`; exits gracefully when the
//! provided [`CancellationToken`] is cancelled.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use crate::ReminderJob;

/// Default local firing hour (20:00 in the reference timezone).
pub const DEFAULT_REMINDER_HOUR: u32 = 20;

/// Run the scheduler loop until cancelled.
///
/// Fatal job errors are surfaced through logging only; the loop always
/// continues to the next day's firing.
pub async fn run(job: Arc<ReminderJob>, tz: Tz, hour: u32, cancel: CancellationToken) {
    tracing::info!(timezone = %tz, hour, "Reminder scheduler started");

    loop {
        let now = Utc::now();
        let next = next_run_at(now, tz, hour);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(next = %next, "Sleeping until next reminder firing");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder scheduler stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                match job.run_once().await {
                    Ok(sent) => tracing::info!(sent, "Scheduled reminder run complete"),
                    Err(e) => tracing::error!(error = %e, "Scheduled reminder run failed"),
                }
            }
        }
    }
}

/// The next instant at which the local wall clock in `tz` reads
/// `hour:00:00`, strictly after `now`.
///
/// A DST gap at the firing time pushes the firing forward an hour; an
/// ambiguous (repeated) time takes the earlier offset.
fn next_run_at(now: DateTime<Utc>, tz: Tz, hour: u32) -> DateTime<Utc> {
    let local_now = now.with_timezone(&tz);
    let firing_time = NaiveTime::from_hms_opt(hour, 0, 0).expect("hour must be 0..=23");

    let mut date = local_now.date_naive();
    if local_now.time() >= firing_time {
        date = date.succ_opt().expect("calendar overflow");
    }

    let mut candidate = date.and_time(firing_time);
    loop {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate = candidate + ChronoDuration::hours(1),
        }
    }
}
