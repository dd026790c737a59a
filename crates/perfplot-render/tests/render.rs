use std::path::{Path, PathBuf};

use perfplot_core::{Aggregated, DisplayLabels, RecordShape};
use perfplot_render::{
    AxisScale, ChartMode, ChartPlan, ChartRenderer, ChartSink, Family, PlotConfig, RenderError,
    RenderOutcome,
};
use tempfile::TempDir;

/// Records every plan instead of rasterizing it.
#[derive(Debug, Default)]
struct RecordingSink {
    drawn: Vec<(PathBuf, ChartPlan)>,
}

impl ChartSink for RecordingSink {
    fn draw(&mut self, plan: &ChartPlan, path: &Path) -> Result<(), RenderError> {
        self.drawn.push((path.to_path_buf(), plan.clone()));
        Ok(())
    }
}

/// Sink that fails every draw.
struct FailingSink;

impl ChartSink for FailingSink {
    fn draw(&mut self, _plan: &ChartPlan, path: &Path) -> Result<(), RenderError> {
        Err(RenderError::Backend {
            path: path.to_path_buf(),
            message: "backend offline".to_string(),
        })
    }
}

fn two_variant_data() -> Aggregated {
    Aggregated::from_entries(
        RecordShape::MetricTime,
        vec!["v1".to_string(), "v2".to_string()],
        vec![
            (10_434_109, vec![vec![9.0e6, 120.0], vec![1.2e7, 90.0]]),
            (2_548, vec![vec![3.0e5, 0.008], vec![4.5e5, 0.005]]),
            (48_614, vec![vec![2.0e6, 0.5], vec![2.5e6, 0.4]]),
        ],
    )
    .unwrap()
}

fn renderer(dir: &TempDir) -> ChartRenderer<RecordingSink> {
    let config = PlotConfig::new().with_output_dir(dir.path());
    ChartRenderer::with_sink(config, RecordingSink::default())
}

#[test]
fn test_render_writes_four_named_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut renderer = renderer(&dir);

    let outcome = renderer.render(&two_variant_data(), "fire_animation").unwrap();

    let expected: Vec<PathBuf> = [
        "fire_animation_perf_bar.png",
        "fire_animation_times_bar.png",
        "fire_animation_perf_line.png",
        "fire_animation_times_line.png",
    ]
    .iter()
    .map(|name| dir.path().join(name))
    .collect();
    assert_eq!(outcome, RenderOutcome::Written(expected));
    assert_eq!(renderer.sink().drawn.len(), 4);
}

#[test]
fn test_each_mode_produces_two_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut renderer = renderer(&dir);

    let bars = renderer.render_bars(&two_variant_data(), "run").unwrap();
    assert_eq!(bars.artifacts().len(), 2);
    let lines = renderer.render_lines(&two_variant_data(), "run").unwrap();
    assert_eq!(lines.artifacts().len(), 2);

    let single = Aggregated::from_entries(
        RecordShape::MinMaxTime,
        vec!["only".to_string()],
        vec![(5, vec![vec![1.0, 2.0, 3.0]])],
    )
    .unwrap();
    let bars = renderer.render_bars(&single, "single").unwrap();
    assert_eq!(bars.artifacts().len(), 2);
}

#[test]
fn test_empty_data_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("never_created");
    let config = PlotConfig::new().with_output_dir(&output_dir);
    let mut renderer = ChartRenderer::with_sink(config, RecordingSink::default());

    let empty = Aggregated::empty(RecordShape::MetricTime, vec!["v1".to_string()]);
    let outcome = renderer.render(&empty, "fire_animation").unwrap();

    assert!(outcome.is_no_data());
    assert!(renderer.sink().drawn.is_empty());
    assert!(!output_dir.exists());
}

#[test]
fn test_plans_are_sorted_and_labeled() {
    let dir = TempDir::new().unwrap();
    let mut renderer = renderer(&dir);
    renderer.render(&two_variant_data(), "run").unwrap();

    let sink = renderer.into_sink();
    let (path, metric_bar) = &sink.drawn[0];
    assert!(path.ends_with("run_perf_bar.png"));
    assert_eq!(metric_bar.keys, vec![2_548, 48_614, 10_434_109]);
    assert_eq!(
        metric_bar.tick_labels,
        vec!["2005_26", "2011_19E", "2015_50"]
    );
    assert_eq!(metric_bar.series.len(), 2);
    assert_eq!(metric_bar.series[1].values, vec![4.5e5, 2.5e6, 1.2e7]);
    assert_eq!(metric_bar.y_scale, AxisScale::Linear);

    let (_, time_bar) = &sink.drawn[1];
    assert_eq!(time_bar.family, Family::Time);
    assert_eq!(time_bar.y_scale, AxisScale::Log);
    let labels: Vec<String> = time_bar.bars().into_iter().map(|bar| bar.label).collect();
    assert_eq!(
        labels,
        vec!["8.00e-03", "5.00e-03", "0.50", "0.40", "120.00", "90.00"]
    );

    let (_, metric_line) = &sink.drawn[2];
    assert_eq!(metric_line.mode, ChartMode::Line);
    assert_eq!(metric_line.y_scale, AxisScale::Log);
}

#[test]
fn test_custom_labels_are_used() {
    let dir = TempDir::new().unwrap();
    let labels = DisplayLabels::new().with_label(100, "hundred");
    let config = PlotConfig::new()
        .with_output_dir(dir.path())
        .with_labels(labels);
    let renderer = ChartRenderer::with_sink(config, RecordingSink::default());

    let data = Aggregated::from_entries(
        RecordShape::MetricTime,
        vec!["v1".to_string()],
        vec![(200, vec![vec![6.0, 0.9]]), (100, vec![vec![3.0, 0.6]])],
    )
    .unwrap();
    let plans = renderer.plans(&data, ChartMode::Line).unwrap();

    assert_eq!(plans[0].tick_labels, vec!["hundred", "200"]);
    assert_eq!(plans[1].series[0].values, vec![0.6, 0.9]);
}

#[test]
fn test_sink_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let config = PlotConfig::new().with_output_dir(dir.path());
    let mut renderer = ChartRenderer::with_sink(config, FailingSink);

    let err = renderer.render(&two_variant_data(), "run").unwrap_err();
    assert_eq!(err.code(), "RENDER_BACKEND");
}

#[test]
#[ignore = "rasterizes text and needs system fonts"]
fn test_png_sink_writes_files() {
    let dir = TempDir::new().unwrap();
    let mut renderer = ChartRenderer::new(
        PlotConfig::new()
            .with_output_dir(dir.path())
            .with_size(640, 400),
    );

    let outcome = renderer.render(&two_variant_data(), "png").unwrap();
    for path in outcome.artifacts() {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
