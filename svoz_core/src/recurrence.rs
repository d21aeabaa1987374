//! Recurrence rules mapping a day to the next collection day.
//!
//! Every rule is a pure function over immutable [`NaiveDate`] values; the
//! caller normalizes "today" to local midnight first so that all boundary
//! comparisons happen at day granularity.

use anyhow::{ensure, Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A calendar day without a year, re-anchored to a concrete year on every
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    fn in_year(&self, year: i32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).with_context(|| {
            format!("invalid calendar day {:02}.{:02}. in {year}", self.day, self.month)
        })
    }
}

/// Collection every `interval_days` days, counted from a fixed first
/// occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIntervalRule {
    pub anchor: NaiveDate,
    pub interval_days: u32,
}

impl FixedIntervalRule {
    /// The smallest `anchor + k * interval_days >= today` with `k >= 0`.
    ///
    /// `today == anchor` returns the anchor itself.
    pub fn next_collection(&self, today: NaiveDate) -> Result<NaiveDate> {
        ensure!(self.interval_days > 0, "fixed-interval rule needs a positive interval");
        Ok(next_in_cycle(self.anchor, self.interval_days, today))
    }
}

/// Weekly collection on a fixed weekday inside the season window, every
/// `off_season_interval_days` days on the same weekday outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalRule {
    pub weekday: Weekday,
    pub season_start: MonthDay,
    pub season_end: MonthDay,
    pub off_season_interval_days: u32,
}

impl SeasonalRule {
    pub fn next_collection(&self, today: NaiveDate) -> Result<NaiveDate> {
        ensure!(
            self.off_season_interval_days > 0,
            "seasonal rule needs a positive off-season interval"
        );
        let season_start = self.season_start.in_year(today.year())?;
        let season_end = self.season_end.in_year(today.year())?;
        ensure!(season_start <= season_end, "season must start before it ends");

        if today >= season_start && today <= season_end {
            return Ok(next_weekday_on_or_after(today, self.weekday));
        }

        // Off-season cycles are anchored to the last in-season collection day
        // so the weekday and phase carry over the season boundary. Before the
        // season start (January/February) the relevant season end is the
        // previous year's.
        let season_year = if today < season_start {
            today.year() - 1
        } else {
            today.year()
        };
        let mut anchor = self.season_end.in_year(season_year)?;
        // Roll backward only: rolling forward would leave the season.
        while anchor.weekday() != self.weekday {
            anchor = anchor.pred_opt().context("calendar underflow")?;
        }
        Ok(next_in_cycle(anchor, self.off_season_interval_days, today))
    }
}

/// Weekly collection on a fixed weekday up to a switch date, every
/// `post_switch_interval_days` days from the switch date onward.
///
/// The switch date itself is the first occurrence of the new cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchoverRule {
    pub weekday: Weekday,
    pub switch_date: NaiveDate,
    pub post_switch_interval_days: u32,
}

impl SwitchoverRule {
    pub fn next_collection(&self, today: NaiveDate) -> Result<NaiveDate> {
        ensure!(
            self.post_switch_interval_days > 0,
            "switchover rule needs a positive interval"
        );
        let next_weekday = next_weekday_on_or_after(today, self.weekday);
        if next_weekday < self.switch_date {
            return Ok(next_weekday);
        }
        // A next-weekday landing exactly on the switch date belongs to the new
        // cycle, of which it is occurrence zero.
        Ok(next_in_cycle(self.switch_date, self.post_switch_interval_days, today))
    }
}

/// The first date of the anchored `interval_days` cycle on or after `today`.
///
/// Days before the anchor clamp to the anchor.
fn next_in_cycle(anchor: NaiveDate, interval_days: u32, today: NaiveDate) -> NaiveDate {
    let elapsed = (today - anchor).num_days();
    if elapsed <= 0 {
        return anchor;
    }
    let interval = i64::from(interval_days);
    let cycles = (elapsed + interval - 1).div_euclid(interval);
    anchor + Duration::days(cycles * interval)
}

/// The next date on or after `date` falling on `weekday`.
fn next_weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (i64::from(weekday.num_days_from_monday())
        - i64::from(date.weekday().num_days_from_monday()))
    .rem_euclid(7);
    date + Duration::days(ahead)
}
