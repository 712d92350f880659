use bit_vec::BitVec;
use log::debug;
use thiserror::Error;

use crate::huff_tree::{HuffNode, HuffTree};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
  #[error("Bit {0} of the encoded stream does not follow any path in the tree")]
  MalformedStream(usize),
}

/// Decode a bitvector by walking the Huffman tree. Trailing bits that do not
/// complete a path are dropped.
pub fn decode(bits: &BitVec, tree: &HuffTree) -> Result<Vec<u8>, DecodeError> {
  let root = tree.root();
  let mut decoded = Vec::new();

  // A lone-leaf tree has no edges; its symbol is spelled with a single 0.
  if let HuffNode::Leaf { sym, .. } = root {
    for (i, bit) in bits.iter().enumerate() {
      if bit {
        return Err(DecodeError::MalformedStream(i));
      }
      decoded.push(*sym);
    }
    return Ok(decoded);
  }

  let mut node = root;
  let mut dangling = 0usize;
  for (i, bit) in bits.iter().enumerate() {
    node = match node {
      HuffNode::Internal { left, right, .. } => {
        if bit {
          right.as_ref()
        } else {
          left.as_ref()
        }
      }
      HuffNode::Leaf { .. } => return Err(DecodeError::MalformedStream(i)),
    };
    dangling += 1;

    if let HuffNode::Leaf { sym, .. } = node {
      decoded.push(*sym);
      node = root;
      dangling = 0;
    }
  }

  debug!(
    "Decoded {} bits into {} bytes ({} trailing bits ignored)",
    bits.len(),
    decoded.len(),
    dangling
  );
  Ok(decoded)
}
