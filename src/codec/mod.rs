/*! Bit-level encoding and decoding of byte streams under a Huffman code.

Encoding concatenates each byte's code in input order. Decoding walks the
tree from the root one bit at a time and restarts at the root after every
emitted byte; bits left over after the last complete path produce nothing. */

pub mod decoder;
pub mod encoder;

pub use decoder::{decode, DecodeError};
pub use encoder::{encode, EncodeError};
