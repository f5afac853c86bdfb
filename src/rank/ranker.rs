use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{ClassifyError, Result};
use crate::labels::LabelTable;
use crate::tensor::OutputTensor;

/// One ranked class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    pub class_index: usize,
}

/// Predictions sorted by descending confidence, at most `top_k` long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub predictions: Vec<Prediction>,
}

impl RankedResult {
    /// The single best guess.
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.predictions.iter()
    }
}

impl fmt::Display for RankedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.predictions {
            writeln!(f, "{}: {}", p.label, p.confidence)?;
        }
        Ok(())
    }
}

/// Ranks a confidence vector against `labels` and keeps the best `top_k`.
///
/// Ties keep the lower class index first. `top_k` larger than the number of
/// classes is clamped.
///
/// # Errors
/// - `InvalidResults` if `output.len() != labels.len()` or a confidence is NaN
/// - `InvalidTopK` if `top_k == 0`
pub fn rank(output: &[f32], labels: &LabelTable, top_k: usize) -> Result<RankedResult> {
    if top_k == 0 {
        return Err(ClassifyError::InvalidTopK);
    }
    if output.len() != labels.len() {
        return Err(ClassifyError::InvalidResults(format!(
            "model produced {} scores but the label table has {} entries",
            output.len(),
            labels.len()
        )));
    }
    if let Some(i) = output.iter().position(|c| c.is_nan()) {
        return Err(ClassifyError::InvalidResults(format!("confidence at index {} is NaN", i)));
    }

    let mut indexed: Vec<(usize, f32)> = output.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
        Some(Ordering::Equal) | None => a.0.cmp(&b.0),
        Some(ord) => ord,
    });

    let k = top_k.min(indexed.len());
    let predictions: Vec<Prediction> = indexed
        .into_iter()
        .take(k)
        .map(|(i, confidence)| Prediction {
            // `output.len() == labels.len()` was checked above.
            label: labels.get(i).unwrap_or_default().to_owned(),
            confidence,
            class_index: i,
        })
        .collect();

    debug!(
        classes = output.len(),
        top_k = k,
        top = predictions.first().map(|p| p.label.as_str()).unwrap_or(""),
        "ranked inference output"
    );
    Ok(RankedResult { predictions })
}

/// Validates a raw runtime output as a single-batch class vector, then ranks it.
pub fn rank_output(output: &OutputTensor, labels: &LabelTable, top_k: usize) -> Result<RankedResult> {
    rank(output.class_scores()?, labels, top_k)
}
