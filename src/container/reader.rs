use std::collections::HashSet;
use std::io;

use bitstream_io::{ByteRead, ByteReader, LittleEndian};
use log::debug;
use thiserror::Error;

use super::{Container, ENTRY_LEN, MAX_ENTRIES};
use crate::freq::FrequencyTable;

#[derive(Error, Debug)]
pub enum ContainerReadError {
  #[error("Stream truncated: {field} needs {needed} bytes, but only {available} remain")]
  TruncatedStream {
    field: &'static str,
    needed: usize,
    available: usize,
  },
  #[error("Corrupt container header: {0}")]
  CorruptHeader(String),
  #[error("{0} bytes remain after the encoded payload")]
  StreamNotConsumed(usize),
  #[error("Other IO error: {0}")]
  IOError(#[from] io::Error),
}

/// Tracks how many bytes of the source are left so every field can be
/// checked against the remaining length before it is read.
struct FieldReader<'a> {
  bytes_in: ByteReader<&'a [u8], LittleEndian>,
  remaining: usize,
}

impl<'a> FieldReader<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self {
      bytes_in: ByteReader::new(data),
      remaining: data.len(),
    }
  }

  fn reserve(&mut self, field: &'static str, needed: usize) -> Result<(), ContainerReadError> {
    if needed > self.remaining {
      return Err(ContainerReadError::TruncatedStream {
        field,
        needed,
        available: self.remaining,
      });
    }
    self.remaining -= needed;
    Ok(())
  }

  fn read_u8(&mut self, field: &'static str) -> Result<u8, ContainerReadError> {
    self.reserve(field, 1)?;
    Ok(self.bytes_in.read::<u8>()?)
  }

  fn read_i32(&mut self, field: &'static str) -> Result<i32, ContainerReadError> {
    self.reserve(field, 4)?;
    Ok(self.bytes_in.read::<i32>()?)
  }

  fn read_vec(&mut self, field: &'static str, len: usize) -> Result<Vec<u8>, ContainerReadError> {
    self.reserve(field, len)?;
    let mut buf = vec![0u8; len];
    self.bytes_in.read_bytes(&mut buf)?;
    Ok(buf)
  }
}

fn corrupt<T>(msg: String) -> Result<T, ContainerReadError> {
  Err(ContainerReadError::CorruptHeader(msg))
}

impl Container {
  /// Parse a complete container. The whole input must be consumed.
  pub fn new_from_container_data(data: &[u8]) -> Result<Self, ContainerReadError> {
    let mut rdr = FieldReader::new(data);

    let unused_bits = rdr.read_u8("unused bit count")?;
    if unused_bits > 7 {
      return corrupt(format!("unused bit count is {}, expected 0-7", unused_bits));
    }

    let nentries = rdr.read_i32("entry count")?;
    if nentries < 0 || nentries as usize > MAX_ENTRIES {
      return corrupt(format!(
        "entry count is {}, expected 0-{}",
        nentries, MAX_ENTRIES
      ));
    }
    let nentries = nentries as usize;
    if nentries * ENTRY_LEN > rdr.remaining {
      return Err(ContainerReadError::TruncatedStream {
        field: "frequency table",
        needed: nentries * ENTRY_LEN,
        available: rdr.remaining,
      });
    }

    let mut freqs = FrequencyTable::new();
    let mut seen = HashSet::with_capacity(nentries);
    for _ in 0..nentries {
      let sym = rdr.read_u8("table byte value")?;
      let freq = rdr.read_i32("table frequency")?;
      if freq <= 0 {
        return corrupt(format!("byte {:#04x} has frequency {}", sym, freq));
      }
      if !seen.insert(sym) {
        return corrupt(format!("byte {:#04x} appears twice in the table", sym));
      }
      freqs.add(sym, freq as u64);
    }

    let payload_len = rdr.read_i32("payload length")?;
    if payload_len < 0 {
      return corrupt(format!("payload length is {}", payload_len));
    }
    let payload = rdr.read_vec("payload", payload_len as usize)?;

    if payload.is_empty() && unused_bits != 0 {
      return corrupt(format!(
        "{} unused bits declared for an empty payload",
        unused_bits
      ));
    }
    if freqs.is_empty() != payload.is_empty() {
      return corrupt(format!(
        "{} table entries but {} payload bytes",
        freqs.len(),
        payload.len()
      ));
    }
    if rdr.remaining > 0 {
      return Err(ContainerReadError::StreamNotConsumed(rdr.remaining));
    }

    debug!(
      "Read container: {} entries, {} payload bytes, {} unused bits",
      freqs.len(),
      payload.len(),
      unused_bits
    );
    Ok(Container::new(unused_bits, freqs, payload))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// The serialized form of "aaabbc"
  fn aaabbc_blob() -> Vec<u8> {
    vec![
      7, 3, 0, 0, 0, b'a', 3, 0, 0, 0, b'b', 2, 0, 0, 0, b'c', 1, 0, 0, 0, 2, 0, 0, 0, 0x1f, 0x00,
    ]
  }

  #[test]
  fn read_aaabbc() {
    let c = Container::new_from_container_data(&aaabbc_blob()).unwrap();
    assert_eq!(c.unused_bits(), 7);
    assert_eq!(c.frequencies(), &FrequencyTable::from_bytes(b"aaabbc"));
    assert_eq!(c.payload(), &[0x1f, 0x00]);
  }

  #[test]
  fn table_order_does_not_matter() {
    let blob = vec![
      7, 3, 0, 0, 0, b'c', 1, 0, 0, 0, b'a', 3, 0, 0, 0, b'b', 2, 0, 0, 0, 2, 0, 0, 0, 0x1f, 0x00,
    ];
    let c = Container::new_from_container_data(&blob).unwrap();
    assert_eq!(c.frequencies(), &FrequencyTable::from_bytes(b"aaabbc"));
  }

  #[test]
  fn read_empty_container() {
    let c = Container::new_from_container_data(&[0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    assert!(c.frequencies().is_empty());
    assert!(c.payload().is_empty());
  }

  #[test]
  fn every_truncation_is_detected() {
    let blob = aaabbc_blob();
    for cut in 0..blob.len() {
      match Container::new_from_container_data(&blob[..cut]) {
        Err(ContainerReadError::TruncatedStream { .. }) => {}
        other => panic!("cut at {} gave {:?}", cut, other),
      }
    }
  }

  #[test]
  fn trailing_bytes_are_rejected() {
    let mut blob = aaabbc_blob();
    blob.push(0xaa);
    assert!(matches!(
      Container::new_from_container_data(&blob),
      Err(ContainerReadError::StreamNotConsumed(1))
    ));
  }

  fn assert_corrupt(blob: &[u8]) {
    match Container::new_from_container_data(blob) {
      Err(ContainerReadError::CorruptHeader(_)) => {}
      other => panic!("expected CorruptHeader, got {:?}", other),
    }
  }

  #[test]
  fn bad_unused_bits() {
    let mut blob = aaabbc_blob();
    blob[0] = 8;
    assert_corrupt(&blob);
  }

  #[test]
  fn negative_entry_count() {
    let mut blob = aaabbc_blob();
    blob[1..5].copy_from_slice(&(-1i32).to_le_bytes());
    assert_corrupt(&blob);
  }

  #[test]
  fn oversized_entry_count() {
    let mut blob = aaabbc_blob();
    blob[1..5].copy_from_slice(&257i32.to_le_bytes());
    assert_corrupt(&blob);
  }

  #[test]
  fn nonpositive_frequency() {
    let mut blob = aaabbc_blob();
    blob[6..10].copy_from_slice(&0i32.to_le_bytes());
    assert_corrupt(&blob);
    blob[6..10].copy_from_slice(&(-5i32).to_le_bytes());
    assert_corrupt(&blob);
  }

  #[test]
  fn duplicate_symbol() {
    let mut blob = aaabbc_blob();
    blob[10] = b'a';
    assert_corrupt(&blob);
  }

  #[test]
  fn negative_payload_length() {
    let mut blob = aaabbc_blob();
    blob[20..24].copy_from_slice(&(-2i32).to_le_bytes());
    assert_corrupt(&blob);
  }

  #[test]
  fn payload_length_past_end() {
    let mut blob = aaabbc_blob();
    blob[20..24].copy_from_slice(&3i32.to_le_bytes());
    assert!(matches!(
      Container::new_from_container_data(&blob),
      Err(ContainerReadError::TruncatedStream { .. })
    ));
  }

  #[test]
  fn table_without_payload() {
    assert_corrupt(&[0, 1, 0, 0, 0, b'a', 1, 0, 0, 0, 0, 0, 0, 0]);
  }

  #[test]
  fn payload_without_table() {
    assert_corrupt(&[0, 0, 0, 0, 0, 1, 0, 0, 0, 0xff]);
  }

  #[test]
  fn padding_on_empty_payload() {
    assert_corrupt(&[3, 0, 0, 0, 0, 0, 0, 0, 0]);
  }
}
