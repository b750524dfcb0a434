#[macro_use]
extern crate log;

use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{App, Arg};

use sm83::GameBoy;

fn main() -> Result<()> {
  env_logger::init().map_err(|e| anyhow!("failed to start logger: {}", e))?;

  let matches = App::new("sm83")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Runs a cartridge ROM on an SM83 core")
    .arg(
      Arg::with_name("ROM")
        .help("Cartridge image to run")
        .required(true)
        .index(1),
    )
    .arg(
      Arg::with_name("steps")
        .long("steps")
        .short("n")
        .takes_value(true)
        .help("Stop after this many instructions"),
    )
    .arg(
      Arg::with_name("quiet")
        .long("quiet")
        .short("q")
        .help("Do not echo serial output"),
    )
    .get_matches();

  let path = matches.value_of("ROM").unwrap_or_default();
  let limit = match matches.value_of("steps") {
    Some(s) => Some(
      s.parse::<u64>()
        .with_context(|| format!("invalid --steps value {:?}", s))?,
    ),
    None => None,
  };

  let rom = fs::read(path).with_context(|| format!("reading {}", path))?;
  info!("loaded {} ({} bytes)", path, rom.len());

  let mut gb = GameBoy::new(rom);
  gb.mem.set_serial_echo(!matches.is_present("quiet"));

  let steps = gb.run(limit)?;
  info!("ran {} instructions in {} cycles", steps, gb.mem.now());
  Ok(())
}
