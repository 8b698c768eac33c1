pub const Z: u8 = 0x80;
pub const N: u8 = 0x40;
pub const H: u8 = 0x20;
pub const C: u8 = 0x10;

/// Only the top nibble of F is backed by hardware.
const F_MASK: u8 = 0xf0;

/// 16-bit storage cells, in storage order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reg16 {
  AF = 0,
  BC,
  DE,
  HL,
  SP,
  PC,
}

/// 8-bit halves of AF, BC, DE and HL.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reg8 {
  A,
  F,
  B,
  C,
  D,
  E,
  H,
  L,
}

pub const REG8: [Reg8; 8] = [
  Reg8::A,
  Reg8::F,
  Reg8::B,
  Reg8::C,
  Reg8::D,
  Reg8::E,
  Reg8::H,
  Reg8::L,
];

impl Reg8 {
  /// The cell holding this register and whether it is the high byte.
  fn cell(self) -> (Reg16, bool) {
    match self {
      Reg8::A => (Reg16::AF, true),
      Reg8::F => (Reg16::AF, false),
      Reg8::B => (Reg16::BC, true),
      Reg8::C => (Reg16::BC, false),
      Reg8::D => (Reg16::DE, true),
      Reg8::E => (Reg16::DE, false),
      Reg8::H => (Reg16::HL, true),
      Reg8::L => (Reg16::HL, false),
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Reg8::A => "A",
      Reg8::F => "F",
      Reg8::B => "B",
      Reg8::C => "C",
      Reg8::D => "D",
      Reg8::E => "E",
      Reg8::H => "H",
      Reg8::L => "L",
    }
  }
}

impl Reg16 {
  pub fn name(self) -> &'static str {
    match self {
      Reg16::AF => "AF",
      Reg16::BC => "BC",
      Reg16::DE => "DE",
      Reg16::HL => "HL",
      Reg16::SP => "SP",
      Reg16::PC => "PC",
    }
  }
}

/// Register file: six 16-bit cells, the first four also addressable as
/// high/low byte pairs. The high byte is the first register of the pair
/// name (A of AF, B of BC, ...).
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Registers {
  cells: [u16; 6],
}

impl Registers {
  pub fn new() -> Registers {
    Registers::default()
  }

  pub fn get_pair(&self, r: Reg16) -> u16 {
    self.cells[r as usize]
  }

  pub fn set_pair(&mut self, r: Reg16, value: u16) {
    self.cells[r as usize] = match r {
      Reg16::AF => value & (0xff00 | u16::from(F_MASK)),
      _ => value,
    };
  }

  pub fn get_high(&self, r: Reg16) -> u8 {
    (self.cells[r as usize] >> 8) as u8
  }

  pub fn get_low(&self, r: Reg16) -> u8 {
    (self.cells[r as usize] & 0xff) as u8
  }

  pub fn set_high(&mut self, r: Reg16, value: u8) {
    let cell = &mut self.cells[r as usize];
    *cell = (*cell & 0x00ff) | (u16::from(value) << 8);
  }

  pub fn set_low(&mut self, r: Reg16, value: u8) {
    let value = if r == Reg16::AF { value & F_MASK } else { value };
    let cell = &mut self.cells[r as usize];
    *cell = (*cell & 0xff00) | u16::from(value);
  }

  pub fn get(&self, r: Reg8) -> u8 {
    match r.cell() {
      (pair, true) => self.get_high(pair),
      (pair, false) => self.get_low(pair),
    }
  }

  pub fn set(&mut self, r: Reg8, value: u8) {
    match r.cell() {
      (pair, true) => self.set_high(pair, value),
      (pair, false) => self.set_low(pair, value),
    }
  }

  pub fn a(&self) -> u8 {
    self.get_high(Reg16::AF)
  }
  pub fn set_a(&mut self, value: u8) {
    self.set_high(Reg16::AF, value);
  }
  pub fn f(&self) -> u8 {
    self.get_low(Reg16::AF)
  }
  pub fn set_f(&mut self, value: u8) {
    self.set_low(Reg16::AF, value);
  }

  pub fn af(&self) -> u16 {
    self.get_pair(Reg16::AF)
  }
  pub fn bc(&self) -> u16 {
    self.get_pair(Reg16::BC)
  }
  pub fn de(&self) -> u16 {
    self.get_pair(Reg16::DE)
  }
  pub fn hl(&self) -> u16 {
    self.get_pair(Reg16::HL)
  }
  pub fn sp(&self) -> u16 {
    self.get_pair(Reg16::SP)
  }
  pub fn pc(&self) -> u16 {
    self.get_pair(Reg16::PC)
  }
  pub fn set_sp(&mut self, value: u16) {
    self.set_pair(Reg16::SP, value);
  }
  pub fn set_pc(&mut self, value: u16) {
    self.set_pair(Reg16::PC, value);
  }

  pub fn hl_inc(&mut self) {
    let hl = self.hl().wrapping_add(1);
    self.set_pair(Reg16::HL, hl);
  }
  pub fn hl_dec(&mut self) {
    let hl = self.hl().wrapping_sub(1);
    self.set_pair(Reg16::HL, hl);
  }

  pub fn z(&self) -> bool {
    //! Zero flag
    self.f() & Z != 0
  }
  pub fn n(&self) -> bool {
    //! Subtract flag
    self.f() & N != 0
  }
  pub fn h(&self) -> bool {
    //! Half carry flag
    self.f() & H != 0
  }
  pub fn c(&self) -> bool {
    //! Carry flag
    self.f() & C != 0
  }
}
