//! Schedule evaluation: one collection record per stream and the
//! collection-day alert set.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    cache::ScheduleCache,
    calendar,
    notify::Notifier,
    recurrence::{FixedIntervalRule, MonthDay, SeasonalRule, SwitchoverRule},
    stream::WasteStream,
};

/// The recurrence rules for all four streams.
///
/// The schedule constants live here, not inside the recurrence algorithms, so
/// a policy change is a change to this value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub paper: FixedIntervalRule,
    pub plastics: FixedIntervalRule,
    pub organic: SeasonalRule,
    pub municipal: SwitchoverRule,
}

impl Default for ScheduleConfig {
    /// The rules currently published by the municipality.
    fn default() -> Self {
        Self {
            paper: FixedIntervalRule {
                anchor: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
                interval_days: 28,
            },
            plastics: FixedIntervalRule {
                anchor: NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
                interval_days: 21,
            },
            organic: SeasonalRule {
                weekday: Weekday::Fri,
                season_start: MonthDay::new(3, 1),
                season_end: MonthDay::new(11, 30),
                off_season_interval_days: 21,
            },
            municipal: SwitchoverRule {
                weekday: Weekday::Mon,
                switch_date: NaiveDate::from_ymd_opt(2025, 9, 29).unwrap(),
                post_switch_interval_days: 14,
            },
        }
    }
}

impl ScheduleConfig {
    /// The next collection day for one stream.
    pub fn next_collection(&self, stream: WasteStream, today: NaiveDate) -> Result<NaiveDate> {
        match stream {
            WasteStream::Paper => self.paper.next_collection(today),
            WasteStream::Plastics => self.plastics.next_collection(today),
            WasteStream::Organic => self.organic.next_collection(today),
            WasteStream::Municipal => self.municipal.next_collection(today),
        }
    }
}

/// The persisted result of evaluating one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    /// When this record was computed.
    pub last_updated: DateTime<Utc>,
    /// Display form, `DD.MM.YYYY (Www)`.
    pub collection_date: String,
    /// Machine-sortable form of the same day.
    pub collection_iso: NaiveDate,
}

/// The durable mapping from stream key to collection record.
pub type ScheduleMap = BTreeMap<WasteStream, CollectionRecord>;

/// A stream whose next collection day is today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub stream: WasteStream,
    /// Delivery form, `<label>: <DD.MM.YYYY (Www)>`.
    pub message: String,
}

/// The outcome of one evaluator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub records: ScheduleMap,
    pub alerts: Vec<Alert>,
}

/// Run all four recurrence engines for the day of `now`.
///
/// Either every stream gets a record or the whole evaluation fails; consumers
/// may rely on all four keys being present.
pub fn evaluate(config: &ScheduleConfig, now: DateTime<Local>) -> Result<Evaluation> {
    let today = calendar::local_midnight(now);
    let computed_at = now.with_timezone(&Utc);
    let mut records = ScheduleMap::new();
    let mut alerts = Vec::new();
    for stream in WasteStream::ALL {
        let next = config.next_collection(stream, today)?;
        let collection_date = calendar::format_display_date(next);
        if next == today {
            alerts.push(Alert {
                stream,
                message: format!("{}: {collection_date}", stream.label()),
            });
        }
        records.insert(
            stream,
            CollectionRecord {
                last_updated: computed_at,
                collection_date,
                collection_iso: next,
            },
        );
    }
    Ok(Evaluation { records, alerts })
}

/// Evaluate the schedule, replace the persisted record set, and hand any
/// alerts to the notification sink.
///
/// Notification runs after persistence and its failure is only logged; a
/// delivery problem never loses an already-computed schedule.
pub async fn update_and_notify(
    config: &ScheduleConfig,
    cache: &ScheduleCache,
    sink: Option<&dyn Notifier>,
    now: DateTime<Local>,
) -> Result<()> {
    let evaluation = evaluate(config, now)?;
    cache.store(&evaluation.records)?;
    if evaluation.alerts.is_empty() {
        tracing::info!("no collection today");
        return Ok(());
    }
    let messages: Vec<String> = evaluation
        .alerts
        .iter()
        .map(|alert| alert.message.clone())
        .collect();
    tracing::info!(alerts = ?messages, "today is a collection day");
    if let Some(sink) = sink {
        if let Err(err) = sink.notify(&messages).await {
            tracing::warn!(channel = sink.channel_name(), error = %err, "alert delivery failed");
        }
    }
    Ok(())
}
