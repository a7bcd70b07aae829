use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ValueParseError;

/// Fixed bucket width used to align and page through samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
}

impl Granularity {
    pub const ALL: [Granularity; 10] = [
        Granularity::Minute1,
        Granularity::Minute5,
        Granularity::Minute15,
        Granularity::Minute30,
        Granularity::Hour1,
        Granularity::Hour2,
        Granularity::Hour4,
        Granularity::Hour6,
        Granularity::Hour12,
        Granularity::Day1,
    ];

    /// Wire code (e.g. "1d")
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Minute1 => "1m",
            Granularity::Minute5 => "5m",
            Granularity::Minute15 => "15m",
            Granularity::Minute30 => "30m",
            Granularity::Hour1 => "1h",
            Granularity::Hour2 => "2h",
            Granularity::Hour4 => "4h",
            Granularity::Hour6 => "6h",
            Granularity::Hour12 => "12h",
            Granularity::Day1 => "1d",
        }
    }

    /// Width of one bucket
    pub fn bucket(&self) -> Duration {
        match self {
            Granularity::Minute1 => Duration::minutes(1),
            Granularity::Minute5 => Duration::minutes(5),
            Granularity::Minute15 => Duration::minutes(15),
            Granularity::Minute30 => Duration::minutes(30),
            Granularity::Hour1 => Duration::hours(1),
            Granularity::Hour2 => Duration::hours(2),
            Granularity::Hour4 => Duration::hours(4),
            Granularity::Hour6 => Duration::hours(6),
            Granularity::Hour12 => Duration::hours(12),
            Granularity::Day1 => Duration::days(1),
        }
    }
}

impl FromStr for Granularity {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str() == code)
            .ok_or_else(|| ValueParseError::new("granularity", s))
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
