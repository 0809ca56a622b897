//! Gravity driver.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::session::SharedSession;

/// Feed the session's gravity clock every `tick`, forever.
///
/// Timestamps are milliseconds since the driver started. Spawn it and abort
/// the task to stop gravity.
pub async fn drive_gravity(session: SharedSession, tick: Duration) {
    let start = Instant::now();
    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        session.update(now_ms);
    }
}
