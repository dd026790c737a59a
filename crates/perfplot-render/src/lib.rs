//! Comparative charts for aggregated benchmark measurements.
//!
//! The renderer canonicalizes an [`Aggregated`](perfplot_core::Aggregated)
//! mapping, splits it into a metric family and a time family, and draws each
//! family as a grouped bar chart and as a line chart.
//!
//! # Overview
//!
//! - [`ChartRenderer`]: renders bar and line charts for one base name
//! - [`PlotConfig`]: output directory, image size and tick labels
//! - [`ChartPlan`]: backend-independent description of one chart
//! - [`ChartSink`]: drawing backend; [`PngSink`] writes PNG files
//! - [`format_value`]: annotation formatting

pub mod canonical;
mod config;
mod error;
pub mod format;
pub mod plan;
mod renderer;
mod sink;

pub use canonical::{canonicalize, validate};
pub use config::{DEFAULT_HEIGHT, DEFAULT_OUTPUT_DIR, DEFAULT_WIDTH, PlotConfig};
pub use error::RenderError;
pub use format::format_value;
pub use plan::{AxisScale, Bar, ChartMode, ChartPlan, Family, Series, build_plans};
pub use renderer::{ChartRenderer, RenderOutcome, artifact_file_name};
pub use sink::{ChartSink, PngSink};
