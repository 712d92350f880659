use std::convert::TryFrom;
use std::env;
use std::fs;
use std::process;

use num_enum::TryFromPrimitive;

use huffcomp::{compress, decompress};

#[derive(Debug, Eq, PartialEq, TryFromPrimitive, Copy, Clone)]
#[repr(u8)]
enum Mode {
  Compress = 0x43,   // 'C'
  Decompress = 0x44, // 'D'
}

fn print_usage(prog_name: &str) {
  eprintln!("Usage: {} <C|D> <infilename> <outfilename>", prog_name);
  eprintln!(
    r#"    C compresses <infilename> into <outfilename>
    D decompresses a file produced by C (mode letter is case-insensitive)"#
  );
}

fn parse_mode(arg: &str) -> Option<Mode> {
  match arg.as_bytes() {
    [m] => Mode::try_from(m.to_ascii_uppercase()).ok(),
    _ => None,
  }
}

fn run(mode: Mode, infilename: &str, outfilename: &str) -> Result<(), Box<dyn std::error::Error>> {
  let bytes = fs::read(infilename)?;
  let out = match mode {
    Mode::Compress => compress(&bytes)?,
    Mode::Decompress => decompress(&bytes)?,
  };
  log::info!(
    "{:?}: {} bytes in, {} bytes out",
    mode,
    bytes.len(),
    out.len()
  );
  fs::write(outfilename, &out)?;
  Ok(())
}

fn main() {
  let args: Vec<String> = env::args().collect();

  if args.len() != 4 {
    print_usage(&args[0]);
    process::exit(1);
  }

  let mode = match parse_mode(&args[1]) {
    Some(m) => m,
    None => {
      eprintln!("Invalid mode {:?}. Use 'C' to compress or 'D' to decompress.", args[1]);
      process::exit(1);
    }
  };

  pretty_env_logger::init();

  if let Err(e) = run(mode, &args[2], &args[3]) {
    eprintln!("Error: {}", e);
    process::exit(1);
  }

  match mode {
    Mode::Compress => println!("Compression complete. Data written to {}", args[3]),
    Mode::Decompress => println!("Decompression complete. Data written to {}", args[3]),
  }
}
