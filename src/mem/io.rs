/// Fixed memory-mapped registers the core and its collaborators address by
/// name.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IoReg {
  P1,
  SB,
  SC,
  DIV,
  TIMA,
  TMA,
  TAC,
  IF,
  NR50,
  NR51,
  NR52,
  LCDC,
  STAT,
  SCY,
  SCX,
  LY,
  LYC,
  DMA,
  BGP,
  OBP0,
  OBP1,
  WY,
  WX,
  BOOT,
  IE,
}

const ALL: [IoReg; 25] = [
  IoReg::P1,
  IoReg::SB,
  IoReg::SC,
  IoReg::DIV,
  IoReg::TIMA,
  IoReg::TMA,
  IoReg::TAC,
  IoReg::IF,
  IoReg::NR50,
  IoReg::NR51,
  IoReg::NR52,
  IoReg::LCDC,
  IoReg::STAT,
  IoReg::SCY,
  IoReg::SCX,
  IoReg::LY,
  IoReg::LYC,
  IoReg::DMA,
  IoReg::BGP,
  IoReg::OBP0,
  IoReg::OBP1,
  IoReg::WY,
  IoReg::WX,
  IoReg::BOOT,
  IoReg::IE,
];

impl IoReg {
  pub fn addr(self) -> u16 {
    match self {
      IoReg::P1 => 0xff00,
      IoReg::SB => 0xff01,
      IoReg::SC => 0xff02,
      IoReg::DIV => 0xff04,
      IoReg::TIMA => 0xff05,
      IoReg::TMA => 0xff06,
      IoReg::TAC => 0xff07,
      IoReg::IF => 0xff0f,
      IoReg::NR50 => 0xff24,
      IoReg::NR51 => 0xff25,
      IoReg::NR52 => 0xff26,
      IoReg::LCDC => 0xff40,
      IoReg::STAT => 0xff41,
      IoReg::SCY => 0xff42,
      IoReg::SCX => 0xff43,
      IoReg::LY => 0xff44,
      IoReg::LYC => 0xff45,
      IoReg::DMA => 0xff46,
      IoReg::BGP => 0xff47,
      IoReg::OBP0 => 0xff48,
      IoReg::OBP1 => 0xff49,
      IoReg::WY => 0xff4a,
      IoReg::WX => 0xff4b,
      IoReg::BOOT => 0xff50,
      IoReg::IE => 0xffff,
    }
  }

  pub fn from_addr(addr: u16) -> Option<IoReg> {
    if addr < 0xff00 {
      return None;
    }
    ALL.iter().cloned().find(|r| r.addr() == addr)
  }

  pub fn name(self) -> &'static str {
    match self {
      IoReg::P1 => "P1 (Joypad)",
      IoReg::SB => "SB (Serial Bus)",
      IoReg::SC => "SC (Serial Control)",
      IoReg::DIV => "DIV",
      IoReg::TIMA => "TIMA",
      IoReg::TMA => "TMA",
      IoReg::TAC => "TAC",
      IoReg::IF => "IF",
      IoReg::NR50 => "Sound channel control",
      IoReg::NR51 => "Sound channel selection",
      IoReg::NR52 => "Sound hardware control",
      IoReg::LCDC => "LCDC",
      IoReg::STAT => "STAT",
      IoReg::SCY => "SCY",
      IoReg::SCX => "SCX",
      IoReg::LY => "LY",
      IoReg::LYC => "LYC",
      IoReg::DMA => "DMA",
      IoReg::BGP => "BGP",
      IoReg::OBP0 => "OBP0",
      IoReg::OBP1 => "OBP1",
      IoReg::WY => "WY",
      IoReg::WX => "WX",
      IoReg::BOOT => "BOOT",
      IoReg::IE => "IE",
    }
  }

  /// Registers read as plain memory although real hardware drives them.
  pub fn unhandled_read(self) -> bool {
    match self {
      IoReg::SB
      | IoReg::SC
      | IoReg::DIV
      | IoReg::TIMA
      | IoReg::TMA
      | IoReg::TAC
      | IoReg::NR50
      | IoReg::NR51
      | IoReg::NR52
      | IoReg::STAT
      | IoReg::WY
      | IoReg::WX => true,
      _ => false,
    }
  }

  /// Registers whose writes only land in memory.
  pub fn unhandled_write(self) -> bool {
    match self {
      IoReg::TMA
      | IoReg::TAC
      | IoReg::NR50
      | IoReg::NR51
      | IoReg::NR52
      | IoReg::STAT
      | IoReg::LY
      | IoReg::DMA
      | IoReg::WY
      | IoReg::WX => true,
      _ => false,
    }
  }
}
