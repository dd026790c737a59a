mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use perfplot_core::{
    Aggregated, Aggregator, DisplayLabels, RecordShape, ShapePolicy, Source, SourceTemplate,
};
use perfplot_render::{
    ChartMode, ChartRenderer, DEFAULT_HEIGHT, DEFAULT_OUTPUT_DIR, DEFAULT_WIDTH, PlotConfig,
    RenderOutcome, format_value,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "perfplot",
    author,
    version,
    about = "Aggregate fire simulation benchmark runs and render comparison charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render grouped bar and line charts for a dataset
    Plot(PlotArgs),
    /// Print the aggregated per-variant means
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Benchmark dataset to load
    #[arg(value_enum)]
    dataset: Dataset,

    /// Version ids; each selects one input file. Without versions a single
    /// unversioned file is read
    versions: Vec<String>,

    /// Input path template for versioned runs ({dataset} and {version} are substituted)
    #[arg(long, default_value = perfplot_core::template::DEFAULT_VERSIONED_TEMPLATE)]
    input_template: String,

    /// Input path template when no versions are given ({dataset} is substituted)
    #[arg(long, default_value = perfplot_core::template::DEFAULT_SINGLE_TEMPLATE)]
    single_template: String,

    /// Row layout of the input files
    #[arg(long, value_enum, default_value = "auto")]
    shape: ShapeArg,

    /// JSON object mapping keys to display names; replaces the built-in table
    #[arg(long)]
    labels: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlotArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Chart styles to render
    #[arg(long, value_enum, default_value = "all")]
    mode: ModeArg,

    /// Directory receiving the PNG files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Dataset {
    #[value(alias = "burned_probabilities")]
    BurnedProbabilities,
    #[value(alias = "fire_animation")]
    FireAnimation,
}

impl Dataset {
    fn as_str(self) -> &'static str {
        match self {
            Dataset::BurnedProbabilities => "burned_probabilities",
            Dataset::FireAnimation => "fire_animation",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum ShapeArg {
    Auto,
    MetricTime,
    MinMaxTime,
}

impl ShapeArg {
    fn policy(self) -> ShapePolicy {
        match self {
            ShapeArg::Auto => ShapePolicy::Detect,
            ShapeArg::MetricTime => ShapePolicy::Fixed(RecordShape::MetricTime),
            ShapeArg::MinMaxTime => ShapePolicy::Fixed(RecordShape::MinMaxTime),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum ModeArg {
    All,
    Bar,
    Line,
}

impl ModeArg {
    fn modes(self) -> &'static [ChartMode] {
        match self {
            ModeArg::All => &ChartMode::ALL,
            ModeArg::Bar => &[ChartMode::Bar],
            ModeArg::Line => &[ChartMode::Line],
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Serialize)]
struct ReportRow {
    key: u64,
    label: String,
    variant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_metric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_metric: Option<f64>,
    time: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging()?;
    match cli.command {
        Command::Plot(args) => plot_command(args),
        Command::Report(args) => report_command(args),
    }
}

fn plot_command(args: PlotArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.width == 0 || args.height == 0 {
        return Err(boxed_input_error("width and height must be greater than zero"));
    }

    let labels = load_labels(args.input.labels.as_deref())?;
    let data = load_aggregate(&args.input)?;
    let config = PlotConfig::new()
        .with_output_dir(args.output_dir)
        .with_size(args.width, args.height)
        .with_labels(labels);

    let mut renderer = ChartRenderer::new(config);
    match renderer.render_modes(&data, args.input.dataset.as_str(), args.mode.modes())? {
        RenderOutcome::NoData => println!("no data to plot"),
        RenderOutcome::Written(paths) => {
            for path in paths {
                println!("saved: {}", path.display());
            }
        }
    }
    Ok(())
}

fn report_command(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let labels = load_labels(args.input.labels.as_deref())?;
    let data = load_aggregate(&args.input)?;
    let rows = build_report_rows(&data, &labels);

    match args.format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("no data to report");
            } else {
                print_report_table(data.shape(), &rows);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Ndjson => {
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
        }
    }
    Ok(())
}

fn input_sources(input: &InputArgs) -> Vec<Source> {
    SourceTemplate::new()
        .with_versioned(input.input_template.as_str())
        .with_single(input.single_template.as_str())
        .sources(input.dataset.as_str(), &input.versions)
}

fn load_aggregate(input: &InputArgs) -> Result<Aggregated, Box<dyn std::error::Error>> {
    let sources = input_sources(input);
    Ok(Aggregator::new(input.shape.policy()).aggregate(&sources)?)
}

fn load_labels(path: Option<&Path>) -> Result<DisplayLabels, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(DisplayLabels::from_json_file(path)?),
        None => Ok(DisplayLabels::fire_datasets()),
    }
}

fn build_report_rows(data: &Aggregated, labels: &DisplayLabels) -> Vec<ReportRow> {
    let shape = data.shape();
    let mut rows = Vec::with_capacity(data.len() * data.variant_count());
    for (key, tuples) in data.entries() {
        for (variant, values) in data.variants().iter().zip(tuples) {
            let (metric, min_metric, max_metric) = match shape {
                RecordShape::MetricTime => (Some(values[0]), None, None),
                RecordShape::MinMaxTime => (None, Some(values[0]), Some(values[1])),
            };
            rows.push(ReportRow {
                key,
                label: labels.label(key),
                variant: variant.clone(),
                metric,
                min_metric,
                max_metric,
                time: values[shape.time_index()],
            });
        }
    }
    rows
}

fn print_report_table(shape: RecordShape, rows: &[ReportRow]) {
    match shape {
        RecordShape::MetricTime => println!(
            "{:>10} {:<12} {:<12} {:>12} {:>12}",
            "key", "label", "variant", "metric", "time_s"
        ),
        RecordShape::MinMaxTime => println!(
            "{:>10} {:<12} {:<12} {:>12} {:>12} {:>12}",
            "key", "label", "variant", "min_metric", "max_metric", "time_s"
        ),
    }
    for row in rows {
        let metrics = [row.metric, row.min_metric, row.max_metric]
            .into_iter()
            .flatten()
            .map(|value| format!("{:>12}", format_value(value)))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:>10} {:<12} {:<12} {} {:>12}",
            row.key,
            row.label,
            row.variant,
            metrics,
            format_value(row.time),
        );
    }
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Dataset, ModeArg, ShapeArg, build_report_rows, input_sources};
    use clap::Parser;
    use perfplot_core::{Aggregated, DisplayLabels, RecordShape};
    use perfplot_render::ChartMode;
    use std::path::PathBuf;

    #[test]
    fn parses_plot_command_with_versions() {
        let cli = Cli::try_parse_from([
            "perfplot",
            "plot",
            "fire_animation",
            "v1",
            "v2",
            "--mode",
            "bar",
        ])
        .unwrap_or_else(|err| panic!("{err}"));

        let Command::Plot(args) = cli.command else {
            panic!("expected plot command");
        };
        assert_eq!(args.input.dataset, Dataset::FireAnimation);
        assert_eq!(args.input.versions, vec!["v1", "v2"]);
        assert_eq!(args.mode.modes(), &[ChartMode::Bar]);
        assert_eq!(args.output_dir, PathBuf::from("plots"));
        assert_eq!(args.input.shape, ShapeArg::Auto);
    }

    #[test]
    fn rejects_unknown_dataset() {
        let err = Cli::try_parse_from(["perfplot", "plot", "wildfire"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_missing_dataset() {
        let err = Cli::try_parse_from(["perfplot", "report"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn input_paths_follow_templates() {
        let cli = Cli::try_parse_from([
            "perfplot",
            "report",
            "burned-probabilities",
            "--single-template",
            "runs/{dataset}.csv",
        ])
        .unwrap_or_else(|err| panic!("{err}"));
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };

        let sources = input_sources(&args.input);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].variant, "default");
        assert_eq!(
            sources[0].path,
            PathBuf::from("runs/burned_probabilities.csv")
        );
    }

    #[test]
    fn mode_all_renders_both_styles() {
        assert_eq!(ModeArg::All.modes(), &ChartMode::ALL);
        assert_eq!(ModeArg::Line.modes(), &[ChartMode::Line]);
    }

    #[test]
    fn report_rows_follow_shape() {
        let data = Aggregated::from_entries(
            RecordShape::MinMaxTime,
            vec!["a".to_string(), "b".to_string()],
            vec![(2_548, vec![vec![1.0, 2.0, 0.5], vec![3.0, 4.0, 0.25]])],
        )
        .unwrap_or_else(|err| panic!("{err}"));

        let rows = build_report_rows(&data, &DisplayLabels::fire_datasets());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "2005_26");
        assert_eq!(rows[0].metric, None);
        assert_eq!(rows[1].variant, "b");
        assert_eq!(rows[1].max_metric, Some(4.0));
        assert_eq!(rows[1].time, 0.25);
    }
}
