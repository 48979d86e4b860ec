use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_LEAF, DEFAULT_MIN_SAMPLES_SPLIT};
use crate::data::Matrix;
use crate::node::Node;
use crate::splitter::best_split;
use crate::utils::majority_label;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Hyperparameters steering tree growth.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TreeParams {
    /// Hard ceiling on node depth; the root sits at depth 0.
    pub max_depth: usize,
    /// Fewest samples a node must hold for a split to be attempted.
    pub min_samples_split: usize,
    /// Fewest samples either side of an accepted split may hold.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
        }
    }
}

/// A fitted classification tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tree {
    pub root: Node,
    pub depth: usize,
    pub n_leaves: usize,
}

impl Tree {
    /// Grow a tree over all rows of `data`.
    ///
    /// `y` runs parallel to the rows and both must be non-empty; the caller
    /// validates shapes before calling. The input is never mutated,
    /// partitioning works on index vectors.
    pub fn fit(data: &Matrix<f64>, y: &[i64], params: &TreeParams) -> Self {
        let index: Vec<usize> = (0..data.rows).collect();
        Self::from_root(grow(data, y, index, 0, params))
    }

    /// Wrap a root node, recording its depth and leaf count.
    pub fn from_root(root: Node) -> Self {
        let depth = root.depth();
        let n_leaves = root.n_leaves();
        Tree { root, depth, n_leaves }
    }
}

/// One recursion step of the builder.
///
/// Stopping rules run in a fixed order: depth ceiling, node too small to
/// split, pure node, no usable split, and last a veto on splits leaving
/// either side under `min_samples_leaf`. Any rule firing emits a majority
/// leaf over the node's samples.
fn grow(data: &Matrix<f64>, y: &[i64], indices: Vec<usize>, depth: usize, params: &TreeParams) -> Node {
    if depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node::new_leaf(majority_label(y, &indices));
    }
    let first = y[indices[0]];
    if indices.iter().all(|&i| y[i] == first) {
        return Node::new_leaf(first);
    }
    let split = match best_split(data, y, &indices) {
        Some(split) => split,
        None => return Node::new_leaf(majority_label(y, &indices)),
    };

    let col = data.get_col(split.feature);
    let mut lindices = Vec::new();
    let mut rindices = Vec::new();
    for &i in &indices {
        if col[i] <= split.threshold {
            lindices.push(i);
        } else {
            rindices.push(i);
        }
    }
    if lindices.len() < params.min_samples_leaf || rindices.len() < params.min_samples_leaf {
        return Node::new_leaf(majority_label(y, &indices));
    }
    let left = grow(data, y, lindices, depth + 1, params);
    let right = grow(data, y, rindices, depth + 1, params);
    Node::new_branch(split.feature, split.threshold, left, right)
}

impl Display for Tree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<(&Node, usize)> = vec![(&self.root, 0)];
        let mut r = String::new();
        while let Some((node, depth)) = print_buffer.pop() {
            r += format!("{}{}\n", "      ".repeat(depth).as_str(), node).as_str();
            if let Node::Branch(branch) = node {
                print_buffer.push((&branch.right, depth + 1));
                print_buffer.push((&branch.left, depth + 1));
            }
        }
        write!(f, "{}", r)
    }
}
