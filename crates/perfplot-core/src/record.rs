//! Measurement records and the comma-separated row parser.
//!
//! A measurement file holds one record per line: an integer key followed by
//! either `metric, time` or `min_metric, max_metric, time`. There is no header
//! and every row of a file shares the same field count.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Field layout of a measurement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordShape {
    /// `key, metric, time`
    MetricTime,
    /// `key, min_metric, max_metric, time`
    MinMaxTime,
}

impl RecordShape {
    /// Select the shape whose arity (key included) equals `fields`.
    pub fn from_arity(fields: usize) -> Option<Self> {
        match fields {
            3 => Some(RecordShape::MetricTime),
            4 => Some(RecordShape::MinMaxTime),
            _ => None,
        }
    }

    /// Number of comma-separated fields, key included.
    pub fn arity(self) -> usize {
        self.value_count() + 1
    }

    /// Number of floating-point values after the key.
    pub fn value_count(self) -> usize {
        self.field_names().len()
    }

    /// Names of the value fields in file order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            RecordShape::MetricTime => &["metric", "time"],
            RecordShape::MinMaxTime => &["min_metric", "max_metric", "time"],
        }
    }

    /// Value indices holding throughput metrics.
    pub fn metric_indices(self) -> std::ops::Range<usize> {
        0..self.time_index()
    }

    /// Value index holding the elapsed time.
    pub fn time_index(self) -> usize {
        self.value_count() - 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordShape::MetricTime => "metric-time",
            RecordShape::MinMaxTime => "min-max-time",
        }
    }
}

/// One parsed measurement row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: u64,
    pub values: Vec<f64>,
}

impl Record {
    pub fn new(key: u64, values: Vec<f64>) -> Self {
        Record { key, values }
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Parse a single line. Blank lines yield `Ok(None)`.
///
/// `line_no` is one-based and only used for error reporting.
pub fn parse_line(
    line_no: usize,
    line: &str,
    shape: RecordShape,
) -> Result<Option<Record>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields = split_fields(line);
    if fields.len() != shape.arity() {
        return Err(ParseError::WrongArity {
            line: line_no,
            expected: shape.arity(),
            found: fields.len(),
        });
    }

    let key = match fields[0].parse::<u64>() {
        Ok(key) if key > 0 => key,
        _ => {
            return Err(ParseError::InvalidKey {
                line: line_no,
                field: fields[0].to_string(),
            });
        }
    };

    let mut values = Vec::with_capacity(shape.value_count());
    for (idx, field) in fields.iter().enumerate().skip(1) {
        let value = field.parse::<f64>().map_err(|_| ParseError::InvalidValue {
            line: line_no,
            column: idx + 1,
            field: (*field).to_string(),
        })?;
        values.push(value);
    }

    Ok(Some(Record { key, values }))
}

/// Determine the record shape from the first non-blank row.
///
/// Returns `Ok(None)` for input without any rows.
pub fn detect_shape(text: &str) -> Result<Option<RecordShape>, ParseError> {
    let Some((idx, line)) = text
        .lines()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())
    else {
        return Ok(None);
    };
    let found = split_fields(line).len();
    RecordShape::from_arity(found)
        .map(Some)
        .ok_or(ParseError::UnknownShape {
            line: idx + 1,
            found,
        })
}

/// Parse every row of `text`, requiring each to match `shape`.
pub fn parse_records(text: &str, shape: RecordShape) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(record) = parse_line(idx + 1, line, shape)? {
            records.push(record);
        }
    }
    Ok(records)
}
