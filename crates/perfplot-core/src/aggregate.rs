//! Per-variant averaging of repeated trials.
//!
//! Each source file contributes one variant. Rows sharing a key are repeated
//! trials and are reduced to their arithmetic mean; the per-variant means are
//! then lined up by key in source order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::AggregateError;
use crate::record::{Record, RecordShape, detect_shape, parse_records};

/// One measurement file and the variant it represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub variant: String,
    pub path: PathBuf,
}

impl Source {
    pub fn new(variant: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Source {
            variant: variant.into(),
            path: path.into(),
        }
    }
}

/// How the aggregator decides which record shape to expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapePolicy {
    /// The first row of the first non-empty source fixes the shape.
    #[default]
    Detect,
    /// Every source must use this shape.
    Fixed(RecordShape),
}

/// Flattened `(key, *values)` row of an aggregated mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: u64,
    pub values: Vec<f64>,
}

/// Key to per-variant mean tuples.
///
/// Every entry holds exactly `variant_count()` tuples of `shape().value_count()`
/// values each.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregated {
    shape: RecordShape,
    variants: Vec<String>,
    entries: BTreeMap<u64, Vec<Vec<f64>>>,
}

impl Aggregated {
    /// An aggregate with no keys.
    pub fn empty(shape: RecordShape, variants: Vec<String>) -> Self {
        Aggregated {
            shape,
            variants,
            entries: BTreeMap::new(),
        }
    }

    /// Build an aggregate from prepared entries, validating their shape.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentArity` when an entry has the wrong number of
    /// variants or a tuple has the wrong number of values, and `DuplicateKey`
    /// when a key is given twice.
    pub fn from_entries(
        shape: RecordShape,
        variants: Vec<String>,
        entries: impl IntoIterator<Item = (u64, Vec<Vec<f64>>)>,
    ) -> Result<Self, AggregateError> {
        let mut map = BTreeMap::new();
        for (key, tuples) in entries {
            if tuples.len() != variants.len() {
                return Err(AggregateError::InconsistentArity {
                    key,
                    expected: variants.len(),
                    found: tuples.len(),
                });
            }
            if let Some(bad) = tuples.iter().find(|t| t.len() != shape.value_count()) {
                return Err(AggregateError::InconsistentArity {
                    key,
                    expected: shape.value_count(),
                    found: bad.len(),
                });
            }
            if map.insert(key, tuples).is_some() {
                return Err(AggregateError::DuplicateKey(key));
            }
        }
        Ok(Aggregated {
            shape,
            variants,
            entries: map,
        })
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    /// Variant ids in source order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    /// Per-variant tuples for `key`.
    pub fn get(&self, key: u64) -> Option<&[Vec<f64>]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u64, &[Vec<f64>])> + '_ {
        self.entries
            .iter()
            .map(|(key, tuples)| (*key, tuples.as_slice()))
    }

    /// Flatten every entry into a `(key, *values)` row, variants in order.
    pub fn rows(&self) -> Vec<Row> {
        self.entries
            .iter()
            .map(|(key, tuples)| Row {
                key: *key,
                values: tuples.iter().flatten().copied().collect(),
            })
            .collect()
    }
}

/// Reads measurement sources and reduces them to an [`Aggregated`] mapping.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    policy: ShapePolicy,
}

impl Aggregator {
    pub fn new(policy: ShapePolicy) -> Self {
        Aggregator { policy }
    }

    /// Aggregator that requires every source to use `shape`.
    pub fn with_shape(shape: RecordShape) -> Self {
        Self::new(ShapePolicy::Fixed(shape))
    }

    /// Read, parse and average every source.
    ///
    /// # Errors
    ///
    /// Fails on the first missing or unreadable file, malformed row, shape
    /// disagreement between files, repeated variant id, or key that is not
    /// present in every variant.
    pub fn aggregate(&self, sources: &[Source]) -> Result<Aggregated, AggregateError> {
        let mut shape = match self.policy {
            ShapePolicy::Fixed(shape) => Some(shape),
            ShapePolicy::Detect => None,
        };
        let mut variants: Vec<(String, BTreeMap<u64, Vec<f64>>)> =
            Vec::with_capacity(sources.len());

        for source in sources {
            if variants.iter().any(|(name, _)| *name == source.variant) {
                return Err(AggregateError::DuplicateVariant(source.variant.clone()));
            }

            let text = read_source(&source.path)?;
            let parse_err = |error| AggregateError::Parse {
                path: source.path.clone(),
                error,
            };

            let detected = detect_shape(&text).map_err(parse_err)?;
            if let (Some(expected), Some(found)) = (shape, detected) {
                if expected != found {
                    return Err(AggregateError::ShapeMismatch {
                        path: source.path.clone(),
                        expected: expected.arity(),
                        found: found.arity(),
                    });
                }
            }
            shape = shape.or(detected);

            let records = match shape {
                Some(shape) => parse_records(&text, shape).map_err(parse_err)?,
                None => Vec::new(),
            };
            let means = mean_by_key(&records);
            debug!(
                variant = source.variant.as_str(),
                path = %source.path.display(),
                rows = records.len(),
                keys = means.len(),
                "parsed measurement source"
            );
            variants.push((source.variant.clone(), means));
        }

        let aggregated = merge_variants(shape.unwrap_or(RecordShape::MetricTime), variants)?;
        info!(
            keys = aggregated.len(),
            variants = aggregated.variant_count(),
            shape = aggregated.shape().as_str(),
            "aggregated measurements"
        );
        Ok(aggregated)
    }
}

fn read_source(path: &Path) -> Result<String, AggregateError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => AggregateError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => AggregateError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    })
}

/// Arithmetic mean of each value field across the rows sharing a key.
pub fn mean_by_key(records: &[Record]) -> BTreeMap<u64, Vec<f64>> {
    #[derive(Default)]
    struct Acc {
        samples: usize,
        sums: Vec<f64>,
    }

    let mut groups: BTreeMap<u64, Acc> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.key).or_default();
        if entry.sums.len() < record.values.len() {
            entry.sums.resize(record.values.len(), 0.0);
        }
        for (sum, value) in entry.sums.iter_mut().zip(&record.values) {
            *sum += value;
        }
        entry.samples += 1;
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let samples = acc.samples as f64;
            (key, acc.sums.into_iter().map(|sum| sum / samples).collect())
        })
        .collect()
}

/// Line up per-variant means by key, failing on the first key a variant lacks.
pub fn merge_variants(
    shape: RecordShape,
    variants: Vec<(String, BTreeMap<u64, Vec<f64>>)>,
) -> Result<Aggregated, AggregateError> {
    let keys: BTreeSet<u64> = variants
        .iter()
        .flat_map(|(_, means)| means.keys().copied())
        .collect();

    let mut entries = BTreeMap::new();
    for key in keys {
        let mut tuples = Vec::with_capacity(variants.len());
        for (variant, means) in &variants {
            let Some(tuple) = means.get(&key) else {
                return Err(AggregateError::MismatchedKeys {
                    key,
                    variant: variant.clone(),
                });
            };
            tuples.push(tuple.clone());
        }
        entries.insert(key, tuples);
    }

    Ok(Aggregated {
        shape,
        variants: variants.into_iter().map(|(name, _)| name).collect(),
        entries,
    })
}
