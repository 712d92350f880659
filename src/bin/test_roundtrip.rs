use std::env;
use std::process;

use rand::distributions::Alphanumeric;
use rand::Rng;

use huffcomp::{compress, decompress};

const MIN_SIZE: usize = 256;
const DEFAULT_MAX_SIZE: usize = 8 * 1024 * 1024;
const DEFAULT_COUNT: usize = 10;

/// An alphanumeric base pattern of 10-100 bytes, repeated out to a random
/// length between MIN_SIZE and `max_size`.
fn generate_case<R: Rng>(rng: &mut R, max_size: usize) -> Vec<u8> {
  let size = rng.gen_range(MIN_SIZE..=max_size);
  let pattern_len = rng.gen_range(10..=100);
  let pattern: Vec<u8> = (0..pattern_len).map(|_| rng.sample(Alphanumeric)).collect();
  pattern.iter().cycle().take(size).cloned().collect()
}

fn parse_arg(args: &[String], idx: usize, default: usize) -> usize {
  match args.get(idx) {
    Some(x) => x.parse().unwrap_or_else(|_| {
      eprintln!("Could not parse {:?} as a number", x);
      process::exit(1);
    }),
    None => default,
  }
}

fn main() {
  let args: Vec<String> = env::args().collect();

  if args.len() > 3 {
    println!("Usage: {} [count] [max-size]", &args[0]);
    println!("\tRoundtrips randomly generated repetitive inputs through the compressor");
    process::exit(1);
  }

  pretty_env_logger::init();

  let count = parse_arg(&args, 1, DEFAULT_COUNT);
  let max_size = parse_arg(&args, 2, DEFAULT_MAX_SIZE).max(MIN_SIZE);

  let mut rng = rand::thread_rng();
  let mut successes = 0usize;
  for i in 1..=count {
    let original = generate_case(&mut rng, max_size);
    let result = compress(&original).and_then(|packed| {
      let unpacked = decompress(&packed)?;
      Ok((packed.len(), unpacked))
    });
    match result {
      Ok((packed_len, unpacked)) => {
        let ok = unpacked == original;
        if ok {
          successes += 1;
        }
        println!(
          "Test {:2} | Original: {:8} bytes | Compressed: {:8} bytes | {}",
          i,
          original.len(),
          packed_len,
          if ok { "OK" } else { "FAIL" }
        );
      }
      Err(e) => println!("Test {:2} | Error: {}", i, e),
    }
  }

  println!("\n{} of {} tests OK.", successes, count);
  if successes != count {
    process::exit(1);
  }
}
