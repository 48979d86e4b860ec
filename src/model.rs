//! Model interface
use crate::data::Matrix;
use crate::errors::QuercusError;

/// Common surface for trainable models.
///
/// Everything a caller needs to train, query, persist, and tune a model
/// without knowing which concrete model it is.
pub trait Model {
    /// Fit the model on a provided dataset.
    fn fit(&mut self, data: &Matrix<f64>, y: &[i64]) -> Result<(), QuercusError>;

    /// Generate class predictions, one per row of `data`.
    fn predict(&self, data: &Matrix<f64>) -> Result<Vec<i64>, QuercusError>;

    /// Mean accuracy of the model's predictions on `data` against `y`.
    fn score(&self, data: &Matrix<f64>, y: &[i64]) -> Result<f64, QuercusError>;

    /// Save the fitted model to a file.
    fn save_model(&self, path: &str) -> Result<(), QuercusError>;

    /// Load a fitted model from a file.
    fn load_model(&mut self, path: &str) -> Result<(), QuercusError>;

    /// Set the hyperparameters from a fixed-order vector.
    fn set_params(&mut self, params: &[f64]) -> Result<(), QuercusError>;

    /// The hyperparameters in the order `set_params` takes them.
    fn get_params(&self) -> Vec<f64>;
}
