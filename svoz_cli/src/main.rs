//! One-shot schedule printout.
//!
//! Computes the next collection day for every stream as of today (or a given
//! day) and prints one line per stream.

use anyhow::Result;
use clap::Parser;
use svoz_core::{
    calendar,
    chrono::{Local, NaiveDate},
    schedule::ScheduleConfig,
    stream::{WasteStream, WasteStreamBitmask},
};

#[derive(Debug, Parser)]
pub struct Arguments {
    /// compute the schedule as of this day instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// exclude the paper collection from the output
    #[arg(long)]
    pub exclude_paper: bool,
    /// exclude the plastics collection from the output
    #[arg(long)]
    pub exclude_plastics: bool,
    /// exclude the organic collection from the output
    #[arg(long)]
    pub exclude_organic: bool,
    /// exclude the municipal collection from the output
    #[arg(long)]
    pub exclude_municipal: bool,
}

impl From<&Arguments> for WasteStreamBitmask {
    fn from(value: &Arguments) -> Self {
        let mut waste_stream_bitmask = WasteStreamBitmask::none();
        if value.exclude_paper {
            waste_stream_bitmask |= WasteStreamBitmask::Paper;
        }
        if value.exclude_plastics {
            waste_stream_bitmask |= WasteStreamBitmask::Plastics;
        }
        if value.exclude_organic {
            waste_stream_bitmask |= WasteStreamBitmask::Organic;
        }
        if value.exclude_municipal {
            waste_stream_bitmask |= WasteStreamBitmask::Municipal;
        }
        waste_stream_bitmask
    }
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let excluded = WasteStreamBitmask::from(&args);
    let config = ScheduleConfig::default();
    for stream in WasteStream::ALL {
        if excluded.contains(stream.into()) {
            continue;
        }
        let next = config.next_collection(stream, today)?;
        println!("{}: {}", stream.label(), calendar::format_display_date(next));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arguments_for_exclude_waste_stream() {
        let arguments = Arguments {
            date: None,
            exclude_paper: false,
            exclude_plastics: false,
            exclude_organic: false,
            exclude_municipal: false,
        };
        assert_eq!(WasteStreamBitmask::from(&arguments), WasteStreamBitmask::none());
        let arguments = Arguments {
            date: None,
            exclude_paper: true,
            exclude_plastics: false,
            exclude_organic: false,
            exclude_municipal: false,
        };
        assert_eq!(WasteStreamBitmask::from(&arguments), WasteStreamBitmask::Paper);
        let arguments = Arguments {
            date: None,
            exclude_paper: false,
            exclude_plastics: true,
            exclude_organic: true,
            exclude_municipal: true,
        };
        assert_eq!(
            WasteStreamBitmask::from(&arguments),
            WasteStreamBitmask::Plastics
                .or(WasteStreamBitmask::Organic)
                .or(WasteStreamBitmask::Municipal)
        );
    }
}
