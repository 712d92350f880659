/*! The on-disk container that makes a compressed file self-describing.

Layout (v1, no magic number). Integer fields are 4-byte little-endian
signed values.

   +-----------+---------------+=====================================+
   |UNUSED BITS|  ENTRY COUNT  |...ENTRY COUNT x (SYM, FREQUENCY)....| (more-->)
   +-----------+---------------+=====================================+
       1 byte      4 bytes              1 byte + 4 bytes each

   +---------------+=================================+
   |  PAYLOAD LEN  |...PAYLOAD LEN packed code bytes..|
   +---------------+=================================+

Codes are packed most-significant bit first; the last byte is right-padded
with UNUSED BITS zero bits.
*/

pub mod reader;
pub mod writer;

use std::fmt::{self, Write};

use bit_vec::BitVec;
use serde::Serialize;

use crate::freq::FrequencyTable;

pub use reader::ContainerReadError;
pub use writer::ContainerWriteError;

/// Size of the fixed fields: unused-bit count, entry count, payload length
pub const FIXED_HEADER_LEN: usize = 1 + 4 + 4;
/// Size of one (byte value, frequency) table entry
pub const ENTRY_LEN: usize = 1 + 4;
/// A table can never hold more entries than there are byte values
pub const MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
  unused_bits: u8,
  freqs: FrequencyTable,
  payload: Vec<u8>,
}

/// Everything in the container except the payload bytes themselves
#[derive(Debug, Clone, Serialize)]
pub struct ContainerHeader<'a> {
  pub unused_bits: u8,
  pub frequencies: &'a FrequencyTable,
  pub payload_len: usize,
  pub encoded_bits: usize,
}

/// Pack bits into bytes, zero-filling the tail of the final byte. Returns the
/// number of fill bits (0-7) alongside the bytes.
pub fn pack_bits(bits: &BitVec) -> (u8, Vec<u8>) {
  let unused_bits = ((8 - bits.len() % 8) % 8) as u8;
  (unused_bits, bits.to_bytes())
}

/// Inverse of [`pack_bits`]: expand the bytes and strip `unused_bits` from the end.
pub fn unpack_bits(bytes: &[u8], unused_bits: u8) -> BitVec {
  let mut bits = BitVec::from_bytes(bytes);
  let keep = bits.len().saturating_sub(unused_bits as usize);
  bits.truncate(keep);
  bits
}

impl Container {
  pub fn new(unused_bits: u8, freqs: FrequencyTable, payload: Vec<u8>) -> Self {
    Self {
      unused_bits,
      freqs,
      payload,
    }
  }

  /// Bundle an encoded bitstream with the table it was encoded under.
  pub fn from_encoded_bits(freqs: FrequencyTable, bits: &BitVec) -> Self {
    let (unused_bits, payload) = pack_bits(bits);
    Self::new(unused_bits, freqs, payload)
  }

  pub fn unused_bits(&self) -> u8 {
    self.unused_bits
  }

  pub fn frequencies(&self) -> &FrequencyTable {
    &self.freqs
  }

  pub fn payload(&self) -> &[u8] {
    &self.payload
  }

  /// The encoded bitstream with padding removed
  pub fn encoded_bits(&self) -> BitVec {
    unpack_bits(&self.payload, self.unused_bits)
  }

  pub fn encoded_bit_len(&self) -> usize {
    (self.payload.len() * 8).saturating_sub(self.unused_bits as usize)
  }

  /// Total size of the serialized container
  pub fn serialized_len(&self) -> usize {
    FIXED_HEADER_LEN + ENTRY_LEN * self.freqs.len() + self.payload.len()
  }

  pub fn header(&self) -> ContainerHeader<'_> {
    ContainerHeader {
      unused_bits: self.unused_bits,
      frequencies: &self.freqs,
      payload_len: self.payload.len(),
      encoded_bits: self.encoded_bit_len(),
    }
  }

  pub fn into_parts(self) -> (u8, FrequencyTable, Vec<u8>) {
    (self.unused_bits, self.freqs, self.payload)
  }

  pub fn fmt_header<W: Write>(&self, f: &mut W) -> fmt::Result {
    writeln!(f, "Huffman container (v1):")?;
    writeln!(f, "Unused bits: {}", self.unused_bits)?;
    writeln!(
      f,
      "Table entries: {} ({} input bytes)",
      self.freqs.len(),
      self.freqs.total()
    )?;
    for (sym, ct) in self.freqs.iter() {
      writeln!(f, "   {:02x} {:?}: {}", sym, sym as char, ct)?;
    }
    writeln!(
      f,
      "Payload: {} bytes ({} bits)",
      self.payload.len(),
      self.encoded_bit_len()
    )
  }
}

impl fmt::Display for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.fmt_header(f)
  }
}
