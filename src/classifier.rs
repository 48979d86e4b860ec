use crate::codec;
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_LEAF, DEFAULT_MIN_SAMPLES_SPLIT, N_PARAMS};
use crate::data::Matrix;
use crate::errors::QuercusError;
use crate::metrics::accuracy_score;
use crate::model::Model;
use crate::tree::tree::{Tree, TreeParams};
use crate::utils::validate_usize_parameter;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;

/// Decision tree classifier object
///
/// A single CART-style tree: trained by recursive partitioning on the
/// feature thresholds with the lowest weighted Gini impurity, queried by
/// routing rows from the root to a leaf.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DecisionTreeClassifier {
    /// Hard ceiling on tree depth. The root sits at depth 0, so a tree of
    /// depth 1 is a single split.
    pub max_depth: usize,
    /// Fewest samples a node must hold for a split to be attempted.
    pub min_samples_split: usize,
    /// Fewest samples either side of an accepted split may hold; splits
    /// breaking this are discarded and the node becomes a leaf.
    pub min_samples_leaf: usize,
    // The fitted tree. None until fit or load_model succeeds.
    tree: Option<Tree>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_MIN_SAMPLES_LEAF).unwrap()
    }
}

impl DecisionTreeClassifier {
    /// Decision tree classifier object
    ///
    /// * `max_depth` - Hard ceiling on tree depth, at least 1.
    /// * `min_samples_split` - Fewest samples a node must hold for a split
    ///   to be attempted, at least 2.
    /// * `min_samples_leaf` - Fewest samples either side of an accepted
    ///   split may hold, at least 1.
    pub fn new(max_depth: usize, min_samples_split: usize, min_samples_leaf: usize) -> Result<Self, QuercusError> {
        let model = DecisionTreeClassifier {
            max_depth,
            min_samples_split,
            min_samples_leaf,
            tree: None,
        };

        model.validate_parameters()?;

        Ok(model)
    }

    pub fn validate_parameters(&self) -> Result<(), QuercusError> {
        validate_usize_parameter(self.max_depth, 1, "max_depth")?;
        validate_usize_parameter(self.min_samples_split, 2, "min_samples_split")?;
        validate_usize_parameter(self.min_samples_leaf, 1, "min_samples_leaf")?;
        Ok(())
    }

    /// Forget any fitted tree.
    pub fn reset(&mut self) {
        self.tree = None;
    }

    /// Whether the model holds a fitted tree.
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// The fitted tree, if any.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    fn trained_tree(&self) -> Result<&Tree, QuercusError> {
        self.tree
            .as_ref()
            .ok_or_else(|| QuercusError::InvalidState("the model has not been fitted or loaded".to_string()))
    }

    fn validate_training_data(&self, data: &Matrix<f64>, y: &[i64]) -> Result<(), QuercusError> {
        if data.rows == 0 || data.cols == 0 {
            return Err(QuercusError::InvalidInput("the dataset is empty".to_string()));
        }
        Self::validate_shape(data)?;
        if y.len() != data.rows {
            return Err(QuercusError::InvalidInput(format!(
                "{} rows but {} labels",
                data.rows,
                y.len()
            )));
        }
        Ok(())
    }

    // A flat buffer of the wrong length means the rows were ragged or the
    // dimensions are wrong; either way the matrix is unusable.
    fn validate_shape(data: &Matrix<f64>) -> Result<(), QuercusError> {
        if data.data.len() != data.rows * data.cols {
            return Err(QuercusError::InvalidInput(format!(
                "a {} by {} matrix needs {} values but {} were provided",
                data.rows,
                data.cols,
                data.rows * data.cols,
                data.data.len()
            )));
        }
        Ok(())
    }

    /// Save the whole classifier, hyperparameters and tree, as a json
    /// object to a file.
    ///
    /// * `path` - Path to save the model.
    pub fn save_json(&self, path: &str) -> Result<(), QuercusError> {
        let model = self.json_dump()?;
        match fs::write(path, model) {
            Err(e) => Err(QuercusError::IOError(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    /// Dump the classifier as a json object.
    pub fn json_dump(&self) -> Result<String, QuercusError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(QuercusError::IOError(e.to_string())),
        }
    }

    /// Load a classifier from a json string.
    ///
    /// * `json_str` - String object, which can be serialized to json.
    pub fn from_json(json_str: &str) -> Result<Self, QuercusError> {
        let model = serde_json::from_str::<DecisionTreeClassifier>(json_str);
        match model {
            Ok(m) => Ok(m),
            Err(e) => Err(QuercusError::CorruptData(e.to_string())),
        }
    }

    /// Load a classifier from a path to a json model object.
    ///
    /// * `path` - Path to load the model from.
    pub fn load_json(path: &str) -> Result<Self, QuercusError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(QuercusError::IOError(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }

    // Set methods for parameters

    /// Set max_depth on the classifier.
    /// * `max_depth` - Hard ceiling on tree depth.
    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set min_samples_split on the classifier.
    /// * `min_samples_split` - Fewest samples a node needs to attempt a split.
    pub fn set_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set min_samples_leaf on the classifier.
    /// * `min_samples_leaf` - Fewest samples either side of a split may hold.
    pub fn set_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }
}

impl Model for DecisionTreeClassifier {
    /// Fit the decision tree on a provided dataset.
    ///
    /// A failed fit leaves any previously fitted tree in place.
    ///
    /// * `data` - A column-major matrix of feature values.
    /// * `y` - Integer class labels, one per row of `data`.
    fn fit(&mut self, data: &Matrix<f64>, y: &[i64]) -> Result<(), QuercusError> {
        self.validate_parameters()?;
        self.validate_training_data(data, y)?;
        info!(
            "Fitting a tree on {0} rows with {1} features.",
            data.rows, data.cols
        );

        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };
        let tree = Tree::fit(data, y, &params);
        if tree.root.is_leaf() {
            warn!("Training produced a single leaf; no split was usable at the root.");
        }
        info!(
            "Finished training a tree with {0} leaves at depth {1}.",
            tree.n_leaves, tree.depth
        );
        self.tree = Some(tree);
        Ok(())
    }

    /// Generate predictions on data using the fitted tree.
    ///
    /// * `data` - A column-major matrix of feature values.
    fn predict(&self, data: &Matrix<f64>) -> Result<Vec<i64>, QuercusError> {
        let tree = self.trained_tree()?;
        Self::validate_shape(data)?;
        tree.predict(data)
    }

    /// Mean accuracy of `predict(data)` against `y`.
    fn score(&self, data: &Matrix<f64>, y: &[i64]) -> Result<f64, QuercusError> {
        if y.len() != data.rows {
            return Err(QuercusError::InvalidInput(format!(
                "{} rows but {} labels",
                data.rows,
                y.len()
            )));
        }
        let preds = self.predict(data)?;
        accuracy_score(y, &preds)
    }

    /// Save the fitted tree to a file in the token format.
    ///
    /// * `path` - Path to save the model.
    fn save_model(&self, path: &str) -> Result<(), QuercusError> {
        let tree = self.trained_tree()?;
        let stream = codec::encode(&tree.root);
        match fs::write(path, stream) {
            Err(e) => Err(QuercusError::IOError(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    /// Load a tree from a token-format file.
    ///
    /// Any previously fitted tree is replaced only after the whole stream
    /// decodes; a failed load leaves the model as it was.
    ///
    /// * `path` - Path to load the model from.
    fn load_model(&mut self, path: &str) -> Result<(), QuercusError> {
        let stream = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(QuercusError::IOError(e.to_string())),
        }?;
        let root = codec::decode(&stream)?;
        self.tree = Some(Tree::from_root(root));
        Ok(())
    }

    /// Set the hyperparameters from a fixed-order vector:
    /// `[max_depth, min_samples_split, min_samples_leaf]`.
    ///
    /// Values are truncated to integers and validated before any of them
    /// is applied.
    fn set_params(&mut self, params: &[f64]) -> Result<(), QuercusError> {
        if params.len() != N_PARAMS {
            return Err(QuercusError::InvalidInput(format!(
                "expected {} parameter values but {} were provided",
                N_PARAMS,
                params.len()
            )));
        }
        for &p in params {
            if !p.is_finite() {
                return Err(QuercusError::InvalidInput(format!(
                    "parameter values must be finite but {} was provided",
                    p
                )));
            }
        }
        let max_depth = params[0] as usize;
        let min_samples_split = params[1] as usize;
        let min_samples_leaf = params[2] as usize;
        validate_usize_parameter(max_depth, 1, "max_depth")?;
        validate_usize_parameter(min_samples_split, 2, "min_samples_split")?;
        validate_usize_parameter(min_samples_leaf, 1, "min_samples_leaf")?;
        self.max_depth = max_depth;
        self.min_samples_split = min_samples_split;
        self.min_samples_leaf = min_samples_leaf;
        Ok(())
    }

    /// The hyperparameters in the order `set_params` takes them.
    fn get_params(&self) -> Vec<f64> {
        vec![
            self.max_depth as f64,
            self.min_samples_split as f64,
            self.min_samples_leaf as f64,
        ]
    }
}

impl Display for DecisionTreeClassifier {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(f, "{}", tree),
            None => write!(f, "DecisionTreeClassifier(unfitted)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::tempdir;

    fn fitted_model() -> DecisionTreeClassifier {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        let y = vec![0, 0, 1, 1];
        let mut model = DecisionTreeClassifier::default();
        model.fit(&m, &y).unwrap();
        model
    }

    #[test]
    fn test_default_parameters() {
        let model = DecisionTreeClassifier::default();
        assert_eq!(model.max_depth, 10);
        assert_eq!(model.min_samples_split, 2);
        assert_eq!(model.min_samples_leaf, 1);
        assert!(!model.is_fitted());
        assert_eq!(model.get_params(), vec![10.0, 2.0, 1.0]);
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        assert!(DecisionTreeClassifier::new(0, 2, 1).is_err());
        assert!(DecisionTreeClassifier::new(10, 1, 1).is_err());
        assert!(DecisionTreeClassifier::new(10, 2, 0).is_err());
        assert!(DecisionTreeClassifier::new(1, 2, 1).is_ok());
    }

    #[test]
    fn test_fit_predict_score() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        let y = vec![0, 0, 1, 1];
        let mut model = DecisionTreeClassifier::new(3, 2, 1).unwrap();
        model.fit(&m, &y).unwrap();
        println!("{}", model);
        assert!(model.is_fitted());
        assert_eq!(model.predict(&m).unwrap(), y);

        let query = vec![0.0, 3.0];
        let q = Matrix::new(&query, 2, 1);
        assert_eq!(model.predict(&q).unwrap(), vec![0, 1]);
        assert_eq!(model.score(&m, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let mut model = DecisionTreeClassifier::default();

        let empty: Vec<f64> = Vec::new();
        let m = Matrix::new(&empty, 0, 0);
        assert!(matches!(model.fit(&m, &[]), Err(QuercusError::InvalidInput(_))));

        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        assert!(matches!(model.fit(&m, &[0, 1]), Err(QuercusError::InvalidInput(_))));

        // Three values cannot fill a 2 by 2 matrix.
        let short = vec![0.0, 1.0, 2.0];
        let m = Matrix::new(&short, 2, 2);
        assert!(matches!(model.fit(&m, &[0, 1]), Err(QuercusError::InvalidInput(_))));
    }

    #[test]
    fn test_unfitted_is_invalid_state() {
        let model = DecisionTreeClassifier::default();
        let data = vec![0.0, 1.0];
        let m = Matrix::new(&data, 2, 1);
        assert!(matches!(model.predict(&m), Err(QuercusError::InvalidState(_))));
        assert!(matches!(model.score(&m, &[0, 1]), Err(QuercusError::InvalidState(_))));
        assert!(matches!(model.save_model("unused.txt"), Err(QuercusError::InvalidState(_))));
    }

    #[test]
    fn test_failed_fit_keeps_previous_tree() {
        let mut model = fitted_model();
        let before = model.json_dump().unwrap();

        let data = vec![9.0, 9.0];
        let m = Matrix::new(&data, 2, 1);
        assert!(model.fit(&m, &[0, 1, 0]).is_err());

        assert_eq!(model.json_dump().unwrap(), before);
    }

    #[test]
    fn test_set_params() {
        let mut model = DecisionTreeClassifier::default();
        model.set_params(&[5.0, 4.0, 2.0]).unwrap();
        assert_eq!(model.get_params(), vec![5.0, 4.0, 2.0]);

        assert!(matches!(
            model.set_params(&[5.0, 4.0]),
            Err(QuercusError::InvalidInput(_))
        ));
        assert!(matches!(
            model.set_params(&[5.0, 4.0, 2.0, 1.0]),
            Err(QuercusError::InvalidInput(_))
        ));
        // A rejected vector must not change anything.
        assert!(model.set_params(&[0.0, 4.0, 2.0]).is_err());
        assert!(model.set_params(&[f64::INFINITY, 4.0, 2.0]).is_err());
        assert!(model.set_params(&[5.0, f64::NAN, 2.0]).is_err());
        assert_eq!(model.get_params(), vec![5.0, 4.0, 2.0]);
    }

    #[test]
    fn test_score_length_mismatch() {
        let model = fitted_model();
        let data = vec![0.0, 1.0];
        let m = Matrix::new(&data, 2, 1);
        assert!(matches!(model.score(&m, &[0]), Err(QuercusError::InvalidInput(_))));
    }

    #[test]
    fn test_save_load_round_trip() -> Result<(), Box<dyn Error>> {
        let model = fitted_model();
        let dir = tempdir()?;
        let file_path = dir.path().join("model.txt");
        let path = file_path.to_str().unwrap();
        model.save_model(path)?;

        let mut loaded = DecisionTreeClassifier::default();
        loaded.load_model(path)?;

        let query = vec![0.0, 0.5, 1.5, 2.5, 3.5];
        let q = Matrix::new(&query, 5, 1);
        assert_eq!(loaded.predict(&q)?, model.predict(&q)?);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("absent.txt");
        let mut model = fitted_model();
        let err = model.load_model(file_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, QuercusError::IOError(_)));
        assert!(model.is_fitted());
    }

    #[test]
    fn test_failed_load_keeps_previous_tree() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("mangled.txt");
        std::fs::write(&file_path, "0 0 1 0\n1 -1 0 0\n")?;

        let mut model = fitted_model();
        let before = model.json_dump()?;
        let err = model.load_model(file_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, QuercusError::CorruptData(_)));
        assert_eq!(model.json_dump()?, before);
        Ok(())
    }

    #[test]
    fn test_json_round_trip() {
        let model = fitted_model();
        let json = model.json_dump().unwrap();
        let loaded = DecisionTreeClassifier::from_json(&json).unwrap();
        assert_eq!(loaded.get_params(), model.get_params());

        let query = vec![0.0, 3.0];
        let q = Matrix::new(&query, 2, 1);
        assert_eq!(loaded.predict(&q).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_json_bad_input() {
        assert!(matches!(
            DecisionTreeClassifier::from_json("definitely not json"),
            Err(QuercusError::CorruptData(_))
        ));

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("absent.json");
        let err = DecisionTreeClassifier::load_json(file_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, QuercusError::IOError(_)));
    }

    #[test]
    fn test_builder_setters() {
        let model = DecisionTreeClassifier::default()
            .set_max_depth(4)
            .set_min_samples_split(6)
            .set_min_samples_leaf(3);
        assert_eq!(model.get_params(), vec![4.0, 6.0, 3.0]);
    }

    #[test]
    fn test_builder_bad_value_rejected_at_fit() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        let y = vec![0, 0, 1, 1];
        let mut model = DecisionTreeClassifier::default().set_max_depth(0);
        assert!(matches!(model.fit(&m, &y), Err(QuercusError::InvalidInput(_))));
        assert!(!model.is_fitted());

        let mut model = DecisionTreeClassifier::default().set_min_samples_split(1);
        assert!(matches!(model.fit(&m, &y), Err(QuercusError::InvalidInput(_))));
        assert!(!model.is_fitted());
    }
}
