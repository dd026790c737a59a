//! Turns an aggregated mapping into chart artifacts.

use std::path::{Path, PathBuf};

use perfplot_core::Aggregated;
use tracing::{debug, info};

use crate::canonical::canonicalize;
use crate::config::PlotConfig;
use crate::error::RenderError;
use crate::plan::{ChartMode, ChartPlan, Family, build_plans};
use crate::sink::{ChartSink, PngSink};

/// Result of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The mapping was empty; nothing was written.
    NoData,
    /// Paths of the written artifacts, in drawing order.
    Written(Vec<PathBuf>),
}

impl RenderOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, RenderOutcome::NoData)
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        match self {
            RenderOutcome::NoData => &[],
            RenderOutcome::Written(paths) => paths,
        }
    }
}

/// File name for one (family, mode) chart, e.g. `fire_animation_times_bar.png`.
pub fn artifact_file_name(base_name: &str, family: Family, mode: ChartMode) -> String {
    format!("{}_{}_{}.png", base_name, family.suffix(), mode.suffix())
}

/// Renders grouped bar and line comparisons through a [`ChartSink`].
#[derive(Debug)]
pub struct ChartRenderer<S = PngSink> {
    config: PlotConfig,
    sink: S,
}

impl ChartRenderer<PngSink> {
    /// Renderer writing PNG files sized from `config`.
    pub fn new(config: PlotConfig) -> Self {
        let sink = PngSink::new(config.width, config.height);
        ChartRenderer { config, sink }
    }
}

impl<S: ChartSink> ChartRenderer<S> {
    pub fn with_sink(config: PlotConfig, sink: S) -> Self {
        ChartRenderer { config, sink }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn artifact_path(&self, base_name: &str, family: Family, mode: ChartMode) -> PathBuf {
        self.config
            .output_dir
            .join(artifact_file_name(base_name, family, mode))
    }

    /// Canonicalize `data` and build the metric and time plans for `mode`.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentArity` or `ConflictingRows` if the rows do not
    /// line up with the declared variants and record shape.
    pub fn plans(
        &self,
        data: &Aggregated,
        mode: ChartMode,
    ) -> Result<Vec<ChartPlan>, RenderError> {
        let rows = canonicalize(&data.rows());
        build_plans(
            &rows,
            data.shape(),
            data.variants(),
            &self.config.labels,
            mode,
        )
    }

    /// Render bar and line charts: four artifacts, or none for empty data.
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if the data is inconsistent, the output
    /// directory cannot be created, or the sink fails.
    pub fn render(
        &mut self,
        data: &Aggregated,
        base_name: &str,
    ) -> Result<RenderOutcome, RenderError> {
        self.render_modes(data, base_name, &ChartMode::ALL)
    }

    /// Render the metric and time grouped bar charts.
    ///
    /// # Errors
    ///
    /// See [`ChartRenderer::render`].
    pub fn render_bars(
        &mut self,
        data: &Aggregated,
        base_name: &str,
    ) -> Result<RenderOutcome, RenderError> {
        self.render_modes(data, base_name, &[ChartMode::Bar])
    }

    /// Render the metric and time line charts.
    ///
    /// # Errors
    ///
    /// See [`ChartRenderer::render`].
    pub fn render_lines(
        &mut self,
        data: &Aggregated,
        base_name: &str,
    ) -> Result<RenderOutcome, RenderError> {
        self.render_modes(data, base_name, &[ChartMode::Line])
    }

    /// Render every mode in `modes`, two artifacts each.
    ///
    /// # Errors
    ///
    /// See [`ChartRenderer::render`].
    pub fn render_modes(
        &mut self,
        data: &Aggregated,
        base_name: &str,
        modes: &[ChartMode],
    ) -> Result<RenderOutcome, RenderError> {
        if data.is_empty() {
            info!(base_name, "no data to plot");
            return Ok(RenderOutcome::NoData);
        }

        let mut plans = Vec::with_capacity(modes.len() * Family::ALL.len());
        for mode in modes {
            plans.extend(self.plans(data, *mode)?);
        }

        ensure_dir(&self.config.output_dir)?;
        let mut written = Vec::with_capacity(plans.len());
        for plan in &plans {
            let path = self.artifact_path(base_name, plan.family, plan.mode);
            debug!(
                path = %path.display(),
                series = plan.series.len(),
                ticks = plan.keys.len(),
                "drawing chart"
            );
            self.sink.draw(plan, &path)?;
            info!(path = %path.display(), "saved chart");
            written.push(path);
        }
        Ok(RenderOutcome::Written(written))
    }
}

fn ensure_dir(dir: &Path) -> Result<(), RenderError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|err| RenderError::Io {
        path: dir.to_path_buf(),
        message: err.to_string(),
    })
}
