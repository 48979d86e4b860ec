use super::tree::Tree;
use crate::data::Matrix;
use crate::errors::QuercusError;
use crate::node::Node;

impl Tree {
    fn predict_row(&self, data: &Matrix<f64>, row: usize) -> Result<i64, QuercusError> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(leaf) => return Ok(leaf.value),
                Node::Branch(branch) => {
                    if branch.feature >= data.cols {
                        return Err(QuercusError::IndexOutOfBounds {
                            index: branch.feature,
                            len: data.cols,
                        });
                    }
                    node = if *data.get(row, branch.feature) <= branch.threshold {
                        &branch.left
                    } else {
                        &branch.right
                    };
                }
            }
        }
    }

    /// Route a single feature vector from the root to a leaf.
    ///
    /// The vector must reach up to every feature index the tree tests;
    /// a short vector fails with `IndexOutOfBounds`.
    pub fn predict_one(&self, row: &[f64]) -> Result<i64, QuercusError> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(leaf) => return Ok(leaf.value),
                Node::Branch(branch) => {
                    let value = row.get(branch.feature).ok_or(QuercusError::IndexOutOfBounds {
                        index: branch.feature,
                        len: row.len(),
                    })?;
                    node = if *value <= branch.threshold {
                        &branch.left
                    } else {
                        &branch.right
                    };
                }
            }
        }
    }

    /// Predict a label for every row of `data`, preserving row order.
    pub fn predict(&self, data: &Matrix<f64>) -> Result<Vec<i64>, QuercusError> {
        (0..data.rows).map(|row| self.predict_row(data, row)).collect()
    }
}
