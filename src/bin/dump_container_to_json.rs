use std::{env, fs, process};

use huffcomp::container::Container;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let args: Vec<String> = env::args().collect();

  if args.len() != 3 {
    println!("Usage: {} <compressed-in> <json-out>", &args[0]);
    println!("\tDumps the header of a compressed file as JSON for further examination");
    process::exit(1);
  }

  pretty_env_logger::init();

  let data = fs::read(&args[1])?;
  let container = Container::new_from_container_data(&data[..])?;
  log::debug!("{}", container);

  let json_string = serde_json::to_string_pretty(&container.header())?;
  fs::write(&args[2], json_string)?;
  println!("Output written to {}", args[2]);

  Ok(())
}
