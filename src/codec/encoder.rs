use bit_vec::BitVec;
use log::debug;
use thiserror::Error;

use crate::huff_tree::CodeTable;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
  #[error("Byte {0:#04x} has no code in the code table")]
  UnknownSymbol(u8),
}

/// Concatenate the code of every byte in `data`.
pub fn encode(data: &[u8], codes: &CodeTable) -> Result<BitVec, EncodeError> {
  let mut encoded = BitVec::new();
  for b in data.iter() {
    let code = codes.get(*b).ok_or(EncodeError::UnknownSymbol(*b))?;
    encoded.extend(code.iter());
  }
  debug!("Encoded {} bytes into {} bits", data.len(), encoded.len());
  Ok(encoded)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::huff_tree::code_table::code_string;
  use crate::huff_tree::HuffTree;

  #[test]
  fn encode_aaabbc() {
    let codes = HuffTree::from_bytes(b"aaabbc").unwrap().code_table();
    let encoded = encode(b"aaabbc", &codes).unwrap();
    assert_eq!(code_string(&encoded), "000111110");
  }

  #[test]
  fn encode_subset_of_alphabet() {
    let codes = HuffTree::from_bytes(b"aaaaabbc").unwrap().code_table();
    let encoded = encode(b"abc", &codes).unwrap();
    assert_eq!(code_string(&encoded), "10100");
  }

  #[test]
  fn encode_empty_is_empty() {
    let codes = HuffTree::from_bytes(b"abc").unwrap().code_table();
    assert!(encode(&[], &codes).unwrap().is_empty());
  }

  #[test]
  fn unknown_symbol_is_reported() {
    let codes = HuffTree::from_bytes(b"aaab").unwrap().code_table();
    assert_eq!(encode(b"abz", &codes), Err(EncodeError::UnknownSymbol(b'z')));
  }
}
