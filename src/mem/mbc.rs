/// Cartridge type byte (0x147) that turns on bank switching.
pub const CART_TYPE_BANKED: u8 = 0x01;

const WINDOW: usize = 0x2000;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
  RomOnly,
  Banked,
}

impl Mode {
  pub fn from_cart_type(cart_type: u8) -> Mode {
    if cart_type == CART_TYPE_BANKED {
      Mode::Banked
    } else {
      Mode::RomOnly
    }
  }
}

/// Single-register bank controller. In banked mode, reads from 0x4000-0x7fff
/// go through a window of the cartridge image that moves in 0x2000 steps;
/// writes to 0x2000-0x7fff only set the bank register.
#[derive(Debug)]
pub struct Mbc {
  mode: Mode,
  bank: u8,
}

impl Mbc {
  pub fn new(mode: Mode) -> Mbc {
    Mbc { mode, bank: 0 }
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// True if a write to `addr` is a bank-select write.
  pub fn selects(&self, addr: u16) -> bool {
    self.mode == Mode::Banked && (0x2000..0x8000).contains(&addr)
  }

  pub fn select(&mut self, value: u8) {
    self.bank = value & 0x1f;
  }

  /// Effective window index. A bank register of 0 selects window 1.
  pub fn window(&self) -> usize {
    match self.bank {
      0 => 1,
      b => b as usize,
    }
  }

  /// Offset into the cartridge image for a read of `addr`, or None when the
  /// address is not banked. Window 1 is the identity mapping.
  pub fn translate(&self, addr: u16) -> Option<usize> {
    if self.mode == Mode::Banked && (0x4000..0x8000).contains(&addr) {
      Some(self.window() * WINDOW + addr as usize - WINDOW)
    } else {
      None
    }
  }
}
