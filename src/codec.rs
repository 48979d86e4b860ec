//! Persistence codec
//!
//! A fitted tree travels as whitespace-delimited text. Every node writes
//! four tokens in pre-order: a leaf flag (`1`/`0`), a feature index, a
//! threshold, and a class value, with `-1`, `0`, and `0` standing in for
//! the fields a node form does not use. A branch is followed immediately
//! by its left subtree, then its right subtree. Thresholds print through
//! Rust's shortest round-trip formatting, so a decoded tree compares
//! bit-for-bit with the one encoded.
use crate::constants::{BRANCH_VALUE_SENTINEL, LEAF_FEATURE_SENTINEL, LEAF_THRESHOLD_SENTINEL};
use crate::errors::QuercusError;
use crate::node::Node;
use std::fmt::Write;
use std::str::FromStr;

/// Render `root` in the pre-order token format, one node per line.
///
/// Walks with an explicit stack, so encoding depth is bounded by memory
/// rather than the call stack.
pub fn encode(root: &Node) -> String {
    let mut out = String::new();
    let mut stack: Vec<&Node> = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(leaf) => {
                // Writing to a String cannot fail.
                let _ = writeln!(out, "1 {} {} {}", LEAF_FEATURE_SENTINEL, LEAF_THRESHOLD_SENTINEL, leaf.value);
            }
            Node::Branch(branch) => {
                let _ = writeln!(out, "0 {} {} {}", branch.feature, branch.threshold, BRANCH_VALUE_SENTINEL);
                stack.push(&branch.right);
                stack.push(&branch.left);
            }
        }
    }
    out
}

/// Rebuild a tree from its token stream.
///
/// The stream must hold exactly one pre-order tree; a truncated stream,
/// an unparsable token, a negative branch feature, and tokens trailing the
/// tree all fail with `CorruptData`. One pass over the stream drives an
/// explicit stack of unfinished branches, so nesting depth is bounded by
/// memory rather than the call stack.
pub fn decode(stream: &str) -> Result<Node, QuercusError> {
    let mut cursor = TokenCursor::new(stream);
    // Branches still waiting on a subtree, root first.
    let mut pending: Vec<PendingBranch> = Vec::new();
    loop {
        let is_leaf = match cursor.next_token()? {
            "1" => true,
            "0" => false,
            other => {
                return Err(QuercusError::CorruptData(format!(
                    "expected a 0/1 leaf flag at position {}, found: {}",
                    cursor.consumed, other
                )))
            }
        };
        let feature: i64 = cursor.next_parsed("feature index")?;
        let feature_position = cursor.consumed;
        let threshold: f64 = cursor.next_parsed("threshold")?;
        let value: i64 = cursor.next_parsed("class value")?;

        if !is_leaf {
            if feature < 0 {
                return Err(QuercusError::CorruptData(format!(
                    "negative feature index {} at position {} on a branch record",
                    feature, feature_position
                )));
            }
            pending.push(PendingBranch {
                feature: feature as usize,
                threshold,
                left: None,
            });
            continue;
        }

        // Feature and threshold are sentinel filler on a leaf record. A
        // finished leaf fills its parent's left slot, or closes the parent
        // and keeps closing ancestors whose right subtree just completed.
        let mut node = Node::new_leaf(value);
        loop {
            match pending.pop() {
                None => {
                    if let Some(extra) = cursor.tokens.next() {
                        return Err(QuercusError::CorruptData(format!(
                            "trailing token at position {} after the tree: {}",
                            cursor.consumed + 1,
                            extra
                        )));
                    }
                    return Ok(node);
                }
                Some(mut parent) => match parent.left.take() {
                    None => {
                        parent.left = Some(node);
                        pending.push(parent);
                        break;
                    }
                    Some(left) => {
                        node = Node::new_branch(parent.feature, parent.threshold, left, node);
                    }
                },
            }
        }
    }
}

/// A branch record read from the stream, waiting for its subtrees.
struct PendingBranch {
    feature: usize,
    threshold: f64,
    left: Option<Node>,
}

/// Cursor over the whitespace-split tokens of a model stream. Tracks how
/// many tokens have been consumed so failures can name a 1-based position.
struct TokenCursor<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(stream: &'a str) -> Self {
        TokenCursor {
            tokens: stream.split_whitespace(),
            consumed: 0,
        }
    }

    fn next_token(&mut self) -> Result<&'a str, QuercusError> {
        match self.tokens.next() {
            Some(token) => {
                self.consumed += 1;
                Ok(token)
            }
            None => Err(QuercusError::CorruptData(format!(
                "unexpected end of stream after {} tokens",
                self.consumed
            ))),
        }
    }

    fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<T, QuercusError> {
        let token = self.next_token()?;
        token.parse::<T>().map_err(|_| {
            QuercusError::CorruptData(format!(
                "unreadable {} token at position {}: {}",
                what, self.consumed, token
            ))
        })
    }
}
