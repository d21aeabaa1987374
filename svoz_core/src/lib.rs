//! This crate computes the next collection date for the village's recurring
//! waste-collection streams and keeps the results in a small JSON cache.
//! It also implements the collection-day email alert.
//!
//! The schedule is fully determined by the rules in [`schedule::ScheduleConfig`];
//! nothing is fetched from the outside.

pub use chrono;

pub mod cache;
pub mod calendar;
pub mod notify;
pub mod recurrence;
pub mod schedule;
pub mod stream;
