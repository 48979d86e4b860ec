//! Metrics
//!
//! Evaluation metrics for fitted classifiers.
use crate::errors::QuercusError;

/// Fraction of predictions matching the true labels, in `[0, 1]`.
///
/// The two slices must be the same non-zero length.
pub fn accuracy_score(y_true: &[i64], y_pred: &[i64]) -> Result<f64, QuercusError> {
    if y_true.len() != y_pred.len() {
        return Err(QuercusError::InvalidInput(format!(
            "label and prediction lengths differ, {} vs {}",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(QuercusError::InvalidInput(
            "cannot score an empty label set".to_string(),
        ));
    }
    let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(hits as f64 / y_true.len() as f64)
}
