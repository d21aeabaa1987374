//! The daily update trigger.

use std::sync::Arc;

use svoz_core::{
    chrono::{Duration, Local, NaiveDateTime, NaiveTime},
    schedule,
};

use crate::AppState;

/// Run one schedule update.
///
/// Failures are logged, not propagated: a bad run must not take the trigger
/// loop down with it.
pub async fn run_once(state: &AppState) {
    if let Err(err) =
        schedule::update_and_notify(&state.schedule, &state.cache, state.sink(), Local::now()).await
    {
        tracing::error!(error = %err, "schedule update failed");
    }
}

/// Sleep until the configured wall-clock time, run the update, repeat.
///
/// Runs cannot overlap: each update is awaited before the next sleep starts.
pub async fn run_daily(state: Arc<AppState>, update_time: NaiveTime) {
    loop {
        let now = Local::now().naive_local();
        let next = next_run(now, update_time);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(next_run = %next, "waiting for the next scheduled update");
        tokio::time::sleep(wait).await;
        run_once(&state).await;
    }
}

/// The first instant of `update_time` strictly after `now`.
fn next_run(now: NaiveDateTime, update_time: NaiveTime) -> NaiveDateTime {
    let mut next = now.date().and_time(update_time);
    if next <= now {
        next += Duration::days(1);
    }
    next
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::from_str(s).unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        let update_time = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        assert_eq!(
            next_run(at("2025-10-15T01:00:00"), update_time),
            at("2025-10-15T06:30:00")
        );
    }

    #[test]
    fn test_next_run_rolls_over_to_tomorrow() {
        let update_time = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        assert_eq!(
            next_run(at("2025-10-15T07:00:00"), update_time),
            at("2025-10-16T06:30:00")
        );
        // Firing exactly at the update time schedules the next day's run.
        assert_eq!(
            next_run(at("2025-10-15T06:30:00"), update_time),
            at("2025-10-16T06:30:00")
        );
    }
}
