use crate::mem::{IoReg, Memory, LY_VBLANK};

pub const HEIGHT: usize = 144;
pub const WIDTH: usize = 160;

/// LCDC bit 7.
const LCD_ON: u8 = 0x80;

/// The picture side of the machine. It gets one turn after every CPU tick
/// and sees the bus only during its turn.
pub trait Video {
  fn step(&mut self, mem: &mut Memory);

  fn is_panicked(&self) -> bool {
    false
  }
}

/// Renders nothing; follows LY to count frames.
#[derive(Debug, Default)]
pub struct Headless {
  frames: u64,
  in_vblank: bool,
}

impl Headless {
  pub fn new() -> Headless {
    Headless::default()
  }

  pub fn frames(&self) -> u64 {
    self.frames
  }
}

impl Video for Headless {
  fn step(&mut self, mem: &mut Memory) {
    if mem.io(IoReg::LCDC) & LCD_ON == 0 {
      return;
    }
    let vblank = mem.rb(IoReg::LY.addr()) >= LY_VBLANK;
    if vblank && !self.in_vblank {
      self.frames += 1;
      debug!("Frame {}", self.frames);
    }
    self.in_vblank = vblank;
  }
}
