//! Row canonicalization ahead of plotting.

use std::cmp::Ordering;

use perfplot_core::Row;

use crate::error::RenderError;

fn compare_values(left: &[f64], right: &[f64]) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(a, b)| a.total_cmp(b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

/// Negative zero compares equal to zero but not under `total_cmp`.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Sort rows by ascending key and drop numerically identical duplicates.
///
/// Ties on the key are ordered by their values so the result does not depend
/// on input order. `-0.0` is stored as `0.0`. Running this on its own output
/// returns the same rows.
pub fn canonicalize(rows: &[Row]) -> Vec<Row> {
    let mut sorted: Vec<Row> = rows
        .iter()
        .map(|row| Row {
            key: row.key,
            values: row.values.iter().copied().map(normalize_zero).collect(),
        })
        .collect();
    sorted.sort_by(|a, b| {
        a.key
            .cmp(&b.key)
            .then_with(|| compare_values(&a.values, &b.values))
    });
    sorted.dedup_by(|a, b| a.key == b.key && compare_values(&a.values, &b.values).is_eq());
    sorted
}

/// Check canonical rows: each has `width` values and no key repeats.
pub fn validate(rows: &[Row], width: usize) -> Result<(), RenderError> {
    for row in rows {
        if row.values.len() != width {
            return Err(RenderError::InconsistentArity {
                key: row.key,
                expected: width,
                found: row.values.len(),
            });
        }
    }
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].key == pair[1].key) {
        return Err(RenderError::ConflictingRows { key: pair[1].key });
    }
    Ok(())
}
