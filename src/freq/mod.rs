/*! Byte-frequency analysis. The table produced here is the only model the
compressor keeps: it drives tree construction and is stored verbatim in the
container so the decompressor can rebuild the identical tree. */

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FromIterator;

use serde::Serialize;

/// Occurrence counts per byte value. Only bytes that occur at least once have
/// an entry. Iteration is always in ascending byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
  counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Tally every byte of `data`.
  pub fn from_bytes(data: &[u8]) -> Self {
    let mut tally = [0u64; 256];
    for b in data.iter() {
      tally[*b as usize] += 1;
    }
    let counts = tally
      .iter()
      .enumerate()
      .filter(|(_, ct)| **ct > 0)
      .map(|(sym, ct)| (sym as u8, *ct))
      .collect();
    Self { counts }
  }

  /// Add `count` occurrences of `sym`. Zero counts are ignored so the table
  /// never holds an entry for an absent byte.
  pub fn add(&mut self, sym: u8, count: u64) {
    if count == 0 {
      return;
    }
    *self.counts.entry(sym).or_insert(0) += count;
  }

  pub fn get(&self, sym: u8) -> Option<u64> {
    self.counts.get(&sym).copied()
  }

  pub fn contains(&self, sym: u8) -> bool {
    self.counts.contains_key(&sym)
  }

  /// Number of distinct byte values
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Sum of all counts, i.e. the length of the input that produced the table.
  pub fn total(&self) -> u64 {
    self.counts.values().sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
    self.counts.iter().map(|(s, c)| (*s, *c))
  }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
  fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
    let mut table = Self::new();
    for (sym, count) in iter {
      table.add(sym, count);
    }
    table
  }
}

impl IntoIterator for FrequencyTable {
  type Item = (u8, u64);
  type IntoIter = btree_map::IntoIter<u8, u64>;

  fn into_iter(self) -> Self::IntoIter {
    self.counts.into_iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck_macros::quickcheck;

  #[test]
  fn freqcount_simple() {
    let table = FrequencyTable::from_bytes(b"aaabbc");
    let expected: FrequencyTable = vec![(b'a', 3), (b'b', 2), (b'c', 1)].into_iter().collect();
    assert_eq!(table, expected);
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(b'b'), Some(2));
    assert_eq!(table.get(b'z'), None);
  }

  #[test]
  fn freqcount_empty() {
    let table = FrequencyTable::from_bytes(&[]);
    assert!(table.is_empty());
    assert_eq!(table.total(), 0);
  }

  #[test]
  fn freqcount_full_range() {
    let data: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
    let table = FrequencyTable::from_bytes(&data);
    assert_eq!(table.len(), 256);
    assert!(table.iter().all(|(_, ct)| ct == 2));
  }

  #[test]
  fn zero_counts_are_not_stored() {
    let mut table = FrequencyTable::new();
    table.add(7, 0);
    assert!(!table.contains(7));
    table.add(7, 2);
    table.add(7, 3);
    assert_eq!(table.get(7), Some(5));
  }

  #[test]
  fn iteration_is_ascending() {
    let table: FrequencyTable = vec![(200, 1), (3, 9), (77, 4)].into_iter().collect();
    let syms: Vec<u8> = table.iter().map(|(s, _)| s).collect();
    assert_eq!(syms, vec![3, 77, 200]);
  }

  #[quickcheck]
  fn total_matches_input_length(data: Vec<u8>) -> bool {
    FrequencyTable::from_bytes(&data).total() == data.len() as u64
  }
}
