//! Input path construction from a dataset name and version ids.

use std::path::PathBuf;

use crate::aggregate::Source;

/// Variant id used when a run has no version ids.
pub const DEFAULT_VARIANT: &str = "default";

pub const DEFAULT_VERSIONED_TEMPLATE: &str = "graphics/simdata/{dataset}_perf_data_{version}.txt";
pub const DEFAULT_SINGLE_TEMPLATE: &str = "graphics/simdata/{dataset}_perf_data.txt";

/// Path templates with `{dataset}` and `{version}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate {
    versioned: String,
    single: String,
}

impl Default for SourceTemplate {
    fn default() -> Self {
        SourceTemplate {
            versioned: DEFAULT_VERSIONED_TEMPLATE.to_string(),
            single: DEFAULT_SINGLE_TEMPLATE.to_string(),
        }
    }
}

impl SourceTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template used once per version id.
    pub fn with_versioned(mut self, template: impl Into<String>) -> Self {
        self.versioned = template.into();
        self
    }

    /// Template used when no version ids are given.
    pub fn with_single(mut self, template: impl Into<String>) -> Self {
        self.single = template.into();
        self
    }

    pub fn path_for(&self, dataset: &str, version: Option<&str>) -> PathBuf {
        let path = match version {
            Some(version) => self
                .versioned
                .replace("{dataset}", dataset)
                .replace("{version}", version),
            None => self.single.replace("{dataset}", dataset),
        };
        PathBuf::from(path)
    }

    /// One source per version, or a single `default` source without versions.
    pub fn sources<S: AsRef<str>>(&self, dataset: &str, versions: &[S]) -> Vec<Source> {
        if versions.is_empty() {
            return vec![Source::new(DEFAULT_VARIANT, self.path_for(dataset, None))];
        }
        versions
            .iter()
            .map(|version| {
                let version = version.as_ref();
                Source::new(version, self.path_for(dataset, Some(version)))
            })
            .collect()
    }
}
