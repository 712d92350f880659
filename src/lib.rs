/*! Lossless byte-stream compression with static Huffman codes.

Compression counts byte frequencies, builds a deterministic Huffman tree,
encodes the input bit by bit and stores the frequency table next to the
packed bits, so decompression needs nothing but the container itself.

```
let packed = huffcomp::compress(b"aaabbc").unwrap();
assert_eq!(huffcomp::decompress(&packed).unwrap(), b"aaabbc");
```
*/

pub mod codec;
pub mod container;
pub mod freq;
pub mod huff_tree;

use log::debug;
use thiserror::Error;

use codec::{DecodeError, EncodeError};
use container::{Container, ContainerReadError, ContainerWriteError};
use freq::FrequencyTable;
use huff_tree::{HuffTree, TreeBuildError};

#[derive(Error, Debug)]
pub enum HuffError {
  #[error(transparent)]
  Tree(#[from] TreeBuildError),
  #[error(transparent)]
  Encode(#[from] EncodeError),
  #[error(transparent)]
  Decode(#[from] DecodeError),
  #[error(transparent)]
  ContainerRead(#[from] ContainerReadError),
  #[error(transparent)]
  ContainerWrite(#[from] ContainerWriteError),
  #[error("Datasize mismatch: table records {0} bytes but {1} were decoded")]
  DatasizeMismatch(u64, usize),
}

/// Build the container for `data` without serializing it.
pub fn compress_to_container(data: &[u8]) -> Result<Container, HuffError> {
  let freqs = FrequencyTable::from_bytes(data);
  if freqs.is_empty() {
    return Ok(Container::new(0, freqs, Vec::new()));
  }
  let tree = HuffTree::from_frequencies(&freqs)?;
  let codes = tree.code_table();
  let bits = codec::encode(data, &codes)?;
  debug!(
    "{} distinct bytes, {} input bytes -> {} bits",
    freqs.len(),
    data.len(),
    bits.len()
  );
  Ok(Container::from_encoded_bits(freqs, &bits))
}

/// Compress `data` into a self-describing container blob.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, HuffError> {
  Ok(compress_to_container(data)?.to_bytes()?)
}

/// Rebuild the tree from the container's table and decode its payload.
pub fn decompress_container(container: &Container) -> Result<Vec<u8>, HuffError> {
  let freqs = container.frequencies();
  if freqs.is_empty() {
    return Ok(Vec::new());
  }
  let tree = HuffTree::from_frequencies(freqs)?;
  let decoded = codec::decode(&container.encoded_bits(), &tree)?;
  if decoded.len() as u64 != freqs.total() {
    return Err(HuffError::DatasizeMismatch(freqs.total(), decoded.len()));
  }
  Ok(decoded)
}

/// Inverse of [`compress`].
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, HuffError> {
  let container = Container::new_from_container_data(blob)?;
  decompress_container(&container)
}
