use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tenor_core::{TimeSeriesRow, Timestamp, from_epoch_millis};
use tenor_ports::RecordError;

/// Parser for one raw item shape
///
/// New shapes are supported by adding a parser to the default list.
pub trait RecordParser: Send + Sync {
    /// Check if this parser understands the item
    fn can_parse(&self, item: &Value) -> bool;

    /// Normalize the item. A bad `date` is an error; bad numbers are `None`.
    fn parse(&self, item: &Value) -> Result<TimeSeriesRow, RecordError>;
}

/// Maps raw API items to the uniform row shape
///
/// Infrastructure component that owns the parsing logic; parsers are tried
/// in order and the first that claims an item wins.
pub struct RecordNormalizer {
    parsers: Vec<Box<dyn RecordParser>>,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordNormalizer {
    /// Create a normalizer with the default parsers (point-map, flat)
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(PointMapParser), Box::new(FlatParser)],
        }
    }

    pub fn normalize(&self, item: &Value) -> Result<TimeSeriesRow, RecordError> {
        let parser = self
            .parsers
            .iter()
            .find(|p| p.can_parse(item))
            .ok_or_else(|| RecordError::UnknownShape(truncate(item)))?;
        parser.parse(item)
    }

    /// Normalize a page stream, preserving order; the first bad record aborts
    pub fn normalize_all(&self, items: &[Value]) -> Result<Vec<TimeSeriesRow>, RecordError> {
        items.iter().map(|item| self.normalize(item)).collect()
    }
}

/// Parser for the nested point-map shape
/// `{date, points: {"0": {p, oi, v, b, y}}}`
pub struct PointMapParser;

impl RecordParser for PointMapParser {
    fn can_parse(&self, item: &Value) -> bool {
        item.get("points").is_some_and(Value::is_object)
    }

    fn parse(&self, item: &Value) -> Result<TimeSeriesRow, RecordError> {
        let date = parse_timestamp(item.get("date"))?;
        let point = item.get("points").and_then(|p| p.get("0"));
        let field = |key: &str| decimal(point.and_then(|p| p.get(key)));

        Ok(TimeSeriesRow {
            date,
            price: field("p"),
            open_interest: field("oi"),
            volume: field("v"),
            basis: field("b"),
            funding: None,
            yield_rate: field("y"),
            long_short_ratio: None,
        })
    }
}

/// Parser for the flat shape
/// `{date, price, open_interest, volume, basis, funding, long_short_ratio}`
pub struct FlatParser;

impl RecordParser for FlatParser {
    fn can_parse(&self, item: &Value) -> bool {
        item.is_object()
    }

    fn parse(&self, item: &Value) -> Result<TimeSeriesRow, RecordError> {
        let date = parse_timestamp(item.get("date"))?;
        let field = |key: &str| decimal(item.get(key));

        Ok(TimeSeriesRow {
            date,
            price: field("price"),
            open_interest: field("open_interest"),
            volume: field("volume"),
            basis: field("basis"),
            funding: field("funding"),
            yield_rate: field("yield"),
            long_short_ratio: field("long_short_ratio"),
        })
    }
}

/// Epoch milliseconds (integer, float or digit string) or RFC 3339
fn parse_timestamp(value: Option<&Value>) -> Result<Timestamp, RecordError> {
    let value = match value {
        None | Some(Value::Null) => return Err(RecordError::MissingField("date")),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(from_epoch_millis),
        Value::String(s) => match s.parse::<i64>() {
            Ok(ms) => from_epoch_millis(ms),
            Err(_) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        },
        _ => None,
    };

    parsed.ok_or_else(|| RecordError::Timestamp(value.to_string()))
}

/// Any JSON spelling of a number; everything else is missing
fn decimal(value: Option<&Value>) -> Option<Decimal> {
    let text = match value? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => {
            debug!("Non-numeric value treated as missing: {}", other);
            return None;
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn truncate(item: &Value) -> String {
    let mut text = item.to_string();
    if text.len() > 120 {
        let mut cut = 120;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
