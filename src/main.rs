#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use dmg_core::video::Headless;
use dmg_core::{Config, GameBoy};

use anyhow::Context;
use env_logger::Env;
use log::LevelFilter;
use std::path::PathBuf;

fn args() -> ArgMatches<'static> {
  App::new("dmg-core")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Runs a Game Boy cartridge on the CPU and memory bus, headless")
    .arg(
      Arg::with_name("ROM")
        .help("Cartridge image")
        .required(true)
        .index(1),
    )
    .arg(
      Arg::with_name("boot")
        .long("boot")
        .value_name("FILE")
        .takes_value(true)
        .help("Boot ROM mapped over 0x0000-0x00ff"),
    )
    .arg(
      Arg::with_name("strict")
        .long("strict")
        .help("Stop on writes into cartridge ROM"),
    )
    .arg(
      Arg::with_name("quiet-serial")
        .long("quiet-serial")
        .help("Do not echo serial output to stdout"),
    )
    .arg(
      Arg::with_name("ticks")
        .long("ticks")
        .value_name("N")
        .takes_value(true)
        .help("Stop after N CPU ticks"),
    )
    .arg(
      Arg::with_name("trace")
        .long("trace")
        .help("Log every executed instruction"),
    )
    .get_matches()
}

fn config(matches: &ArgMatches) -> anyhow::Result<Config> {
  let ticks = match matches.value_of("ticks") {
    Some(n) => Some(
      n.parse::<u64>()
        .with_context(|| format!("invalid tick count {:?}", n))?,
    ),
    None => None,
  };
  Ok(Config {
    rom: PathBuf::from(matches.value_of("ROM").unwrap_or_default()),
    boot: matches.value_of("boot").map(PathBuf::from),
    strict: matches.is_present("strict"),
    echo_serial: !matches.is_present("quiet-serial"),
    ticks,
    trace: matches.is_present("trace"),
  })
}

fn main() -> anyhow::Result<()> {
  let config = config(&args())?;

  let mut logger =
    env_logger::Builder::from_env(Env::default().default_filter_or("info"));
  if config.trace {
    logger.filter_module("dmg_core", LevelFilter::Trace);
  }
  logger.init();

  let mut gb = GameBoy::from_config(&config);
  let mut video = Headless::new();
  let result = gb.run(&mut video, config.ticks);
  if !gb.mem().serial_output().is_empty() && config.echo_serial {
    println!();
  }
  info!("{} frames", video.frames());
  result.map(|_| ())
}
