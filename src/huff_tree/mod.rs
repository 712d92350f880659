/*! A Huffman tree built by the classic greedy merge over a min-priority queue.

The tree shape is a pure function of the frequency table: nodes are ordered by
frequency, then by a rank that puts leaves (ordered by byte value) ahead of
internal nodes (ordered by creation), so equal-weight merges always happen in
the same order regardless of how the table was assembled.

Each internal node owns both of its children, so dropping the tree releases
every node.
*/

pub mod code_table;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use thiserror::Error;

use crate::freq::FrequencyTable;
pub use code_table::CodeTable;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeBuildError {
  #[error("Cannot build a Huffman tree from an empty frequency table")]
  InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
  Leaf {
    sym: u8,
    freq: u64,
  },
  Internal {
    freq: u64,
    left: Box<HuffNode>,
    right: Box<HuffNode>,
  },
}

impl HuffNode {
  pub fn leaf(sym: u8, freq: u64) -> Self {
    HuffNode::Leaf { sym, freq }
  }

  /// Join two subtrees. `left` is the node that came off the queue first.
  pub fn merge(left: HuffNode, right: HuffNode) -> Self {
    HuffNode::Internal {
      freq: left.freq() + right.freq(),
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn freq(&self) -> u64 {
    match self {
      HuffNode::Leaf { freq, .. } | HuffNode::Internal { freq, .. } => *freq,
    }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, HuffNode::Leaf { .. })
  }

  /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
  pub fn depth(&self) -> usize {
    match self {
      HuffNode::Leaf { .. } => 0,
      HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
    }
  }

  pub fn leaf_count(&self) -> usize {
    match self {
      HuffNode::Leaf { .. } => 1,
      HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
    }
  }
}

/// Secondary sort key. Derived `Ord` puts every `Leaf` before every
/// `Internal`, leaves by byte value and internals by creation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
  Leaf(u8),
  Internal(usize),
}

#[derive(Debug)]
struct QueueEntry {
  freq: u64,
  rank: Rank,
  node: HuffNode,
}

impl QueueEntry {
  fn key(&self) -> (u64, Rank) {
    (self.freq, self.rank)
  }
}

impl PartialEq for QueueEntry {
  fn eq(&self, other: &Self) -> bool {
    self.key() == other.key()
  }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

// BinaryHeap is a max-heap, so the comparison is reversed to pop the
// smallest key first.
impl Ord for QueueEntry {
  fn cmp(&self, other: &Self) -> Ordering {
    other.key().cmp(&self.key())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
  root: HuffNode,
}

impl HuffTree {
  /// Run the greedy merge over `freqs`. A single-entry table yields a tree
  /// whose root is that entry's leaf.
  pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self, TreeBuildError> {
    if freqs.is_empty() {
      return Err(TreeBuildError::InvalidInput);
    }

    let mut queue: BinaryHeap<QueueEntry> = freqs
      .iter()
      .map(|(sym, freq)| QueueEntry {
        freq,
        rank: Rank::Leaf(sym),
        node: HuffNode::leaf(sym, freq),
      })
      .collect();

    let mut seq = 0usize;
    while queue.len() > 1 {
      // Both pops succeed: the loop condition guarantees two entries.
      let first = queue.pop().ok_or(TreeBuildError::InvalidInput)?;
      let second = queue.pop().ok_or(TreeBuildError::InvalidInput)?;
      let node = HuffNode::merge(first.node, second.node);
      queue.push(QueueEntry {
        freq: node.freq(),
        rank: Rank::Internal(seq),
        node,
      });
      seq += 1;
    }

    let root = queue.pop().ok_or(TreeBuildError::InvalidInput)?.node;
    debug!(
      "Built Huffman tree: {} leaves, {} merges, depth {}",
      root.leaf_count(),
      seq,
      root.depth()
    );
    Ok(Self { root })
  }

  /// Count the input and build the tree in one step.
  pub fn from_bytes(data: &[u8]) -> Result<Self, TreeBuildError> {
    Self::from_frequencies(&FrequencyTable::from_bytes(data))
  }

  pub fn root(&self) -> &HuffNode {
    &self.root
  }

  pub fn code_table(&self) -> CodeTable {
    CodeTable::from_tree(self)
  }

  /// Recover the leaf frequencies stored in the tree.
  pub fn frequencies(&self) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    collect_leaves(&self.root, &mut table);
    table
  }
}

fn collect_leaves(node: &HuffNode, table: &mut FrequencyTable) {
  match node {
    HuffNode::Leaf { sym, freq } => table.add(*sym, *freq),
    HuffNode::Internal { left, right, .. } => {
      collect_leaves(left, table);
      collect_leaves(right, table);
    }
  }
}
