use std::path::PathBuf;

/// Session settings, filled from the command line by the binary.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
  pub rom: PathBuf,
  /// Boot image mapped over 0x0000-0x00ff until unmapped.
  pub boot: Option<PathBuf>,
  /// Writes into 0x0000-0x7fff other than bank selects are a fault.
  pub strict: bool,
  /// Copy the serial transcript to stdout.
  pub echo_serial: bool,
  /// Stop after this many CPU ticks; run until a fault otherwise.
  pub ticks: Option<u64>,
  /// Log every executed instruction.
  pub trace: bool,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      rom: PathBuf::new(),
      boot: None,
      strict: false,
      echo_serial: true,
      ticks: None,
      trace: false,
    }
  }
}
