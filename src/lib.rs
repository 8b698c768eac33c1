#[macro_use]
extern crate log;

pub mod config;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod gameboy;
pub mod interrupt;
pub mod mem;
pub mod video;

pub use crate::config::Config;
pub use crate::error::Fault;
pub use crate::gameboy::GameBoy;
