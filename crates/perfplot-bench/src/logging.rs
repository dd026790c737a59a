//! Tracing subscriber setup.
//!
//! `PERFPLOT_TRACE` holds an `EnvFilter` directive (default `off`),
//! `PERFPLOT_LOG_FORMAT` selects `pretty` or `json`, and `PERFPLOT_LOG_FILE`
//! adds an append-only file layer next to stderr.

use std::env;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

const TRACE_VAR: &str = "PERFPLOT_TRACE";
const FORMAT_VAR: &str = "PERFPLOT_LOG_FORMAT";
const FILE_VAR: &str = "PERFPLOT_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_format(value: &str) -> Option<LogFormat> {
    if value.eq_ignore_ascii_case("pretty") {
        Some(LogFormat::Pretty)
    } else if value.eq_ignore_ascii_case("json") {
        Some(LogFormat::Json)
    } else {
        None
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, Box<dyn Error>> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| format!("Invalid {TRACE_VAR} filter: {err}").into())
}

fn open_log_file(path: &str) -> Result<File, Box<dyn Error>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Failed to open log file {path}: {err}").into())
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// One formatting layer in `format`; `ansi` is off for files.
fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

/// Install the global subscriber. Returns `false` if one is already set.
///
/// # Errors
///
/// Returns an error for an invalid filter or format, or an unopenable log file.
pub fn init_logging() -> Result<bool, Box<dyn Error>> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level = env::var(TRACE_VAR).unwrap_or_else(|_| "off".to_string());
    let filter = build_filter(&level)?;

    let format_name = env::var(FORMAT_VAR).unwrap_or_else(|_| "pretty".to_string());
    let format = parse_format(&format_name)
        .ok_or_else(|| format!("Invalid {FORMAT_VAR} (expected 'json' or 'pretty')"))?;

    let mut layers = vec![fmt_layer(format, io::stderr, true)];
    if let Ok(path) = env::var(FILE_VAR) {
        layers.push(fmt_layer(format, open_log_file(&path)?, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("JSON"), Some(LogFormat::Json));
        assert_eq!(parse_format("pretty"), Some(LogFormat::Pretty));
        assert_eq!(parse_format("yaml"), None);
    }

    #[test]
    fn test_fmt_layer_per_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfplot.log");
        let file = open_log_file(path.to_str().unwrap()).unwrap();

        let layers = vec![
            fmt_layer(LogFormat::Json, io::stderr, true),
            fmt_layer(LogFormat::Pretty, file, false),
        ];
        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(keys = 3, "aggregated measurements");
        });

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("aggregated measurements"));
    }

    #[test]
    fn test_build_filter() {
        assert!(build_filter("off").is_ok());
        assert!(build_filter("perfplot_core=debug,info").is_ok());
        assert!(build_filter("perfplot_core=loud").is_err());
    }
}
