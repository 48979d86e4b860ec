use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// An internal node, routing rows on `feature <= threshold`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BranchNode {
    /// Column index the node tests.
    pub feature: usize,
    /// Rows with `value <= threshold` go left, the rest go right.
    pub threshold: f64,
    /// Subtree for rows at or below the threshold.
    pub left: Box<Node>,
    /// Subtree for the remaining rows.
    pub right: Box<Node>,
}

/// A terminal node holding the class label it predicts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeafNode {
    /// The majority class of the training rows that reached this leaf.
    pub value: i64,
}

/// A single node of a fitted tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum Node {
    Branch(BranchNode),
    Leaf(LeafNode),
}

impl Node {
    pub fn new_branch(feature: usize, threshold: f64, left: Node, right: Node) -> Self {
        Node::Branch(BranchNode {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn new_leaf(value: i64) -> Self {
        Node::Leaf(LeafNode { value })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    ///
    /// Walks with an explicit stack, so the nesting of a loaded tree is
    /// bounded by memory rather than the call stack.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf(_) => deepest = deepest.max(depth),
                Node::Branch(branch) => {
                    stack.push((&branch.right, depth + 1));
                    stack.push((&branch.left, depth + 1));
                }
            }
        }
        deepest
    }

    /// Number of terminal nodes in the subtree.
    pub fn n_leaves(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(_) => count += 1,
                Node::Branch(branch) => {
                    stack.push(&branch.right);
                    stack.push(&branch.left);
                }
            }
        }
        count
    }
}

// Children are detached onto an explicit stack before a branch drops, so
// freeing a deep tree cannot exhaust the call stack either.
impl Drop for Node {
    fn drop(&mut self) {
        if let Node::Branch(branch) = self {
            if branch.left.is_leaf() && branch.right.is_leaf() {
                return;
            }
            let mut stack = vec![
                mem::replace(&mut *branch.left, Node::new_leaf(0)),
                mem::replace(&mut *branch.right, Node::new_leaf(0)),
            ];
            while let Some(mut node) = stack.pop() {
                if let Node::Branch(b) = &mut node {
                    stack.push(mem::replace(&mut *b.left, Node::new_leaf(0)));
                    stack.push(mem::replace(&mut *b.right, Node::new_leaf(0)));
                }
            }
        }
    }
}

impl fmt::Display for Node {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => write!(f, "leaf={}", leaf.value),
            Node::Branch(branch) => write!(f, "[f{} <= {}]", branch.feature, branch.threshold),
        }
    }
}
