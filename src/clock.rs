use crate::state::AppState;
use crate::tracker::CHALLENGE_DAYS;
use chrono::{Local, NaiveDate};
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info};

pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Re-derives today's date on a fixed interval so newly unlocked days show
/// up without a restart.
pub fn spawn_day_watcher(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            refresh_today(&state, Local::now().date_naive()).await;
        }
    })
}

/// Stores `now` as today's date and returns whether the date changed.
pub async fn refresh_today(state: &AppState, now: NaiveDate) -> bool {
    let mut today = state.today.write().await;
    if *today == now {
        debug!("day watcher tick, still {now}");
        return false;
    }

    let previous = std::mem::replace(&mut *today, now);
    drop(today);

    let tracker = state.tracker.lock().await;
    info!(
        "day changed from {previous} to {now}; {} of {CHALLENGE_DAYS} days unlocked",
        tracker.anchor().available_days(now)
    );
    true
}
