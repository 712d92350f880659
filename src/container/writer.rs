use std::convert::TryFrom;
use std::io::Write;

use bitstream_io::{ByteWrite, ByteWriter, LittleEndian};
use thiserror::Error;

use super::Container;

#[derive(Error, Debug)]
pub enum ContainerWriteError {
  #[error("{field} of {value} does not fit in a signed 32-bit field")]
  CountOverflow { field: &'static str, value: u64 },
  #[error("Other IO Error: {0}")]
  IOError(#[from] std::io::Error),
}

fn to_wire(field: &'static str, value: u64) -> Result<i32, ContainerWriteError> {
  i32::try_from(value).map_err(|_| ContainerWriteError::CountOverflow { field, value })
}

impl Container {
  pub fn write_to<W: Write>(&self, out: W) -> Result<W, ContainerWriteError> {
    let mut bytesout: ByteWriter<W, LittleEndian> = ByteWriter::new(out);
    bytesout.write(self.unused_bits)?;
    bytesout.write(to_wire("entry count", self.freqs.len() as u64)?)?;
    for (sym, freq) in self.freqs.iter() {
      bytesout.write(sym)?;
      bytesout.write(to_wire("frequency", freq)?)?;
    }
    bytesout.write(to_wire("payload length", self.payload.len() as u64)?)?;
    bytesout.write_bytes(&self.payload[..])?;
    Ok(bytesout.into_writer())
  }

  /// Serialize into a fresh buffer
  pub fn to_bytes(&self) -> Result<Vec<u8>, ContainerWriteError> {
    self.write_to(Vec::with_capacity(self.serialized_len()))
  }
}
