//! The four waste-collection streams and their wire keys.

use std::{fmt, str::FromStr};

use anyhow::bail;
use bitmask_enum::bitmask;
use serde::{Deserialize, Serialize};

static LABEL_PAPER: &str = "Papír";
static LABEL_PLASTICS: &str = "Plasty, drobné kovy, nápojové kartony";
static LABEL_ORGANIC: &str = "Bioodpad";
static LABEL_MUNICIPAL: &str = "Komunální odpad";

/// One recurring collection stream.
///
/// The serialized form is the stream's cache key, which is also what the
/// `/data/:stream` route accepts. Changing a key is a breaking change!
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WasteStream {
    #[serde(rename = "papir")]
    Paper,
    #[serde(rename = "plasty")]
    Plastics,
    #[serde(rename = "bio")]
    Organic,
    #[serde(rename = "komunal")]
    Municipal,
}

impl WasteStream {
    /// All streams, in the order records and alerts are produced.
    pub const ALL: [WasteStream; 4] = [
        WasteStream::Paper,
        WasteStream::Plastics,
        WasteStream::Organic,
        WasteStream::Municipal,
    ];

    /// The stable cache key.
    pub fn key(&self) -> &'static str {
        match self {
            WasteStream::Paper => "papir",
            WasteStream::Plastics => "plasty",
            WasteStream::Organic => "bio",
            WasteStream::Municipal => "komunal",
        }
    }

    /// The human-readable Czech name used on the page and in alert emails.
    pub fn label(&self) -> &'static str {
        match self {
            WasteStream::Paper => LABEL_PAPER,
            WasteStream::Plastics => LABEL_PLASTICS,
            WasteStream::Organic => LABEL_ORGANIC,
            WasteStream::Municipal => LABEL_MUNICIPAL,
        }
    }
}

impl fmt::Display for WasteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WasteStream {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stream = match s {
            "papir" => WasteStream::Paper,
            "plasty" => WasteStream::Plastics,
            "bio" => WasteStream::Organic,
            "komunal" => WasteStream::Municipal,
            _ => bail!("unknown waste stream: {s}"),
        };
        Ok(stream)
    }
}

/// Stream set used for display-side exclusion filters.
///
/// Exclusion never reaches the evaluator: the schedule is always computed and
/// persisted for all four streams.
#[bitmask]
pub enum WasteStreamBitmask {
    Paper,
    Plastics,
    Organic,
    Municipal,
}

impl From<WasteStream> for WasteStreamBitmask {
    fn from(value: WasteStream) -> Self {
        match value {
            WasteStream::Paper => WasteStreamBitmask::Paper,
            WasteStream::Plastics => WasteStreamBitmask::Plastics,
            WasteStream::Organic => WasteStreamBitmask::Organic,
            WasteStream::Municipal => WasteStreamBitmask::Municipal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for stream in WasteStream::ALL {
            assert_eq!(WasteStream::from_str(stream.key()).unwrap(), stream);
        }
    }

    #[test]
    fn test_from_str_unknown_key() {
        assert!(WasteStream::from_str("sklo").is_err());
    }

    #[test]
    fn test_serialized_form_is_the_key() {
        for stream in WasteStream::ALL {
            let json = serde_json::to_string(&stream).unwrap();
            assert_eq!(json, format!("\"{}\"", stream.key()));
        }
    }

    #[test]
    fn test_bitmask_from_stream() {
        let mut mask = WasteStreamBitmask::none();
        mask |= WasteStreamBitmask::from(WasteStream::Paper);
        assert!(mask.contains(WasteStreamBitmask::Paper));
        assert!(!mask.contains(WasteStreamBitmask::Organic));
    }
}
