use std::collections::BTreeMap;

use bit_vec::BitVec;
use log::trace;

use super::{HuffNode, HuffTree};
use crate::freq::FrequencyTable;

/// Maps each byte in the tree to its root-to-leaf path (left = 0, right = 1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
  codes: BTreeMap<u8, BitVec>,
}

/// Render a code as a string of '0'/'1' characters.
pub fn code_string(code: &BitVec) -> String {
  code.iter().map(|b| if b { '1' } else { '0' }).collect()
}

impl CodeTable {
  /// Walk the tree depth-first, recording the accumulated path at each leaf.
  /// A tree that is a lone leaf has no path to record, so its symbol gets
  /// the one-bit code `0` (the decoder reads a `0` at a leaf root as that
  /// symbol).
  pub fn from_tree(tree: &HuffTree) -> Self {
    let mut codes = BTreeMap::new();
    match tree.root() {
      HuffNode::Leaf { sym, .. } => {
        codes.insert(*sym, BitVec::from_elem(1, false));
      }
      root => gen_mapping(root, &mut BitVec::new(), &mut codes),
    }
    for (sym, code) in codes.iter() {
      trace!("code {:3} -> {}", sym, code_string(code));
    }
    Self { codes }
  }

  pub fn get(&self, sym: u8) -> Option<&BitVec> {
    self.codes.get(&sym)
  }

  pub fn len(&self) -> usize {
    self.codes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.codes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> + '_ {
    self.codes.iter().map(|(s, c)| (*s, c))
  }

  /// Number of bits the input summarised by `freqs` encodes to. Symbols
  /// without a code contribute nothing.
  pub fn encoded_len(&self, freqs: &FrequencyTable) -> u64 {
    freqs
      .iter()
      .filter_map(|(sym, ct)| self.get(sym).map(|code| ct * code.len() as u64))
      .sum()
  }

  /// True if no code is a prefix of another.
  pub fn is_prefix_free(&self) -> bool {
    let codes: Vec<&BitVec> = self.codes.values().collect();
    for (i, a) in codes.iter().enumerate() {
      for b in codes.iter().skip(i + 1) {
        let n = a.len().min(b.len());
        if a.iter().take(n).eq(b.iter().take(n)) {
          return false;
        }
      }
    }
    true
  }
}

fn gen_mapping(node: &HuffNode, path: &mut BitVec, codes: &mut BTreeMap<u8, BitVec>) {
  match node {
    HuffNode::Leaf { sym, .. } => {
      codes.insert(*sym, path.clone());
    }
    HuffNode::Internal { left, right, .. } => {
      path.push(false);
      gen_mapping(left, path, codes);
      path.pop();
      path.push(true);
      gen_mapping(right, path, codes);
      path.pop();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck_macros::quickcheck;

  fn bits(s: &str) -> BitVec {
    s.chars().map(|c| c == '1').collect()
  }

  #[test]
  fn simple_map() {
    let tree = HuffTree::from_bytes(b"aaaaabbc").unwrap();
    let table = tree.code_table();
    assert_eq!(table.get(b'c'), Some(&bits("00")));
    assert_eq!(table.get(b'b'), Some(&bits("01")));
    assert_eq!(table.get(b'a'), Some(&bits("1")));
    assert_eq!(table.len(), 3);
  }

  #[test]
  fn aaabbc_codes_and_bit_count() {
    let freqs = FrequencyTable::from_bytes(b"aaabbc");
    let table = HuffTree::from_frequencies(&freqs).unwrap().code_table();
    assert_eq!(code_string(table.get(b'a').unwrap()), "0");
    assert_eq!(code_string(table.get(b'c').unwrap()), "10");
    assert_eq!(code_string(table.get(b'b').unwrap()), "11");
    assert_eq!(table.encoded_len(&freqs), 3 * 1 + 2 * 2 + 1 * 2);
  }

  #[test]
  fn single_symbol_gets_one_bit() {
    let table = HuffTree::from_bytes(&[0u8; 4]).unwrap().code_table();
    assert_eq!(table.get(0), Some(&bits("0")));
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn prefix_check_detects_collisions() {
    let mut codes = BTreeMap::new();
    codes.insert(1u8, bits("01"));
    codes.insert(2u8, bits("011"));
    assert!(!CodeTable { codes }.is_prefix_free());
  }

  #[quickcheck]
  fn derived_codes_are_prefix_free(data: Vec<u8>) -> bool {
    if data.is_empty() {
      return true;
    }
    let freqs = FrequencyTable::from_bytes(&data);
    let table = HuffTree::from_frequencies(&freqs).unwrap().code_table();
    table.len() == freqs.len()
      && table.iter().all(|(_, code)| !code.is_empty())
      && table.is_prefix_free()
  }
}
