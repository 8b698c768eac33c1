use std::fmt;

const TITLE: std::ops::Range<usize> = 0x134..0x144;
const CART_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const RAM_SIZE: usize = 0x149;

/// Cartridge header fields the bus reads. Only the cartridge type changes
/// behavior.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Header {
  pub title: String,
  pub cart_type: u8,
  pub rom_size: u8,
  pub ram_size: u8,
}

impl Header {
  /// Read the header from an image. Missing bytes read as zero.
  pub fn parse(rom: &[u8]) -> Header {
    let byte = |i: usize| rom.get(i).cloned().unwrap_or(0);
    let title = rom
      .get(TITLE)
      .unwrap_or(&[])
      .iter()
      .take_while(|&&b| b != 0)
      .map(|&b| b as char)
      .collect();
    Header {
      title,
      cart_type: byte(CART_TYPE),
      rom_size: byte(ROM_SIZE),
      ram_size: byte(RAM_SIZE),
    }
  }
}

impl fmt::Display for Header {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{} (cart mode: {}, rom size: {}, ram size: {})",
      self.title, self.cart_type, self.rom_size, self.ram_size
    )
  }
}
