use crate::errors::QuercusError;
use hashbrown::HashMap;

// Validation
pub fn validate_usize_parameter(value: usize, min: usize, parameter: &str) -> Result<(), QuercusError> {
    if value < min {
        let ex_msg = format!("an integer of at least {}", min);
        Err(QuercusError::InvalidInput(format!(
            "invalid value passed for {}, expected {} but {} provided",
            parameter, ex_msg, value
        )))
    } else {
        Ok(())
    }
}

/// Majority class of the labels selected by `indices`.
///
/// Ties go to the lowest label, so the result is independent of input order.
/// `indices` must be non-empty.
pub fn majority_label(y: &[i64], indices: &[usize]) -> i64 {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &i in indices {
        *counts.entry(y[i]).or_insert(0) += 1;
    }
    // Map iteration order is arbitrary, settle ties over sorted labels.
    let mut entries: Vec<(i64, usize)> = counts.into_iter().collect();
    entries.sort_unstable_by_key(|(label, _)| *label);
    let mut best = entries[0];
    for &(label, count) in entries.iter().skip(1) {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}
