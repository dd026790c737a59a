//! Measurement parsing and aggregation for perfplot.
//!
//! Benchmark runs write comma-separated rows of `key, [min_metric,]
//! max_metric, time`. This crate reads one file per variant, averages the
//! repeated trials of each key and lines the variants up into an
//! [`Aggregated`] mapping ready for charting.
//!
//! # Overview
//!
//! - [`Aggregator`]: reads [`Source`] files and builds an [`Aggregated`] mapping
//! - [`RecordShape`]: the two supported row layouts
//! - [`DisplayLabels`]: key to dataset-name lookup used on chart axes
//! - [`SourceTemplate`]: builds input paths from a dataset and version ids

pub mod aggregate;
pub mod error;
pub mod labels;
pub mod record;
pub mod template;

pub use aggregate::{Aggregated, Aggregator, Row, ShapePolicy, Source, mean_by_key};
pub use error::{AggregateError, ParseError};
pub use labels::{DisplayLabels, LabelsError};
pub use record::{Record, RecordShape, detect_shape, parse_line, parse_records};
pub use template::{DEFAULT_VARIANT, SourceTemplate};
