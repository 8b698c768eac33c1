/// The five interrupt sources, in service priority order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Interrupt {
  VBlank,
  LcdStat,
  Timer,
  Serial,
  Joypad,
}

pub const PRIORITY: [Interrupt; 5] = [
  Interrupt::VBlank,
  Interrupt::LcdStat,
  Interrupt::Timer,
  Interrupt::Serial,
  Interrupt::Joypad,
];

impl Interrupt {
  /// Bit in IE / IF.
  pub fn bit(self) -> u8 {
    match self {
      Interrupt::VBlank => 0b00001,
      Interrupt::LcdStat => 0b00010,
      Interrupt::Timer => 0b00100,
      Interrupt::Serial => 0b01000,
      Interrupt::Joypad => 0b10000,
    }
  }

  /// Service routine address.
  pub fn vector(self) -> u16 {
    match self {
      Interrupt::VBlank => 0x40,
      Interrupt::LcdStat => 0x48,
      Interrupt::Timer => 0x50,
      Interrupt::Serial => 0x58,
      Interrupt::Joypad => 0x60,
    }
  }

  /// Highest priority interrupt set in `pending` (IE & IF).
  pub fn highest(pending: u8) -> Option<Interrupt> {
    PRIORITY.iter().cloned().find(|i| pending & i.bit() != 0)
  }
}
