use std::error::Error;
use std::fmt;

/// An unrecoverable condition raised by the emulated hardware.
///
/// A fault latches the component that raised it; the driver polls for it
/// after every step and stops the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Fault {
  /// An opcode with no handler in either table.
  UnknownOpcode { addr: u16, opcode: u8 },
  /// One of the Z80 slots the LR35902 dropped (IN/OUT/EX, prefixes).
  RemovedOpcode { addr: u16, opcode: u8 },
  /// STOP is not emulated.
  Stop { addr: u16 },
  /// Write into the cartridge area while strict ROM writes are on.
  RomWrite { addr: u16, value: u8 },
  /// Fetch from above the execution window.
  PcOverflow { addr: u16 },
}

impl fmt::Display for Fault {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Fault::UnknownOpcode { addr, opcode } => {
        write!(f, "unknown opcode 0x{:02x} at 0x{:04x}", opcode, addr)
      }
      Fault::RemovedOpcode { addr, opcode } => {
        write!(f, "removed opcode 0x{:02x} at 0x{:04x}", opcode, addr)
      }
      Fault::Stop { addr } => write!(f, "STOP at 0x{:04x}", addr),
      Fault::RomWrite { addr, value } => {
        write!(f, "write of 0x{:02x} to ROM at 0x{:04x}", value, addr)
      }
      Fault::PcOverflow { addr } => {
        write!(f, "program counter overflowed to 0x{:04x}", addr)
      }
    }
  }
}

impl Error for Fault {}
