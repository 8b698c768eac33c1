//! LY synthesized from elapsed time rather than a PPU clock. A frame lasts
//! 1/57 s and LY sweeps linearly from 0 to `LY_MAX` over it.

use std::time::{Duration, Instant};

pub const FRAME_HZ: u64 = 57;
/// Last scanline value, the hardware line count 154 minus one.
pub const LY_MAX: u8 = 0x99;
/// First vertical blank line.
pub const LY_VBLANK: u8 = 0x90;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Time source for the scanline counter.
pub trait Clock {
  fn now(&self) -> Duration;
}

pub struct SystemClock {
  start: Instant,
}

impl SystemClock {
  pub fn new() -> SystemClock {
    SystemClock {
      start: Instant::now(),
    }
  }
}

impl Clock for SystemClock {
  fn now(&self) -> Duration {
    self.start.elapsed()
  }
}

pub struct Scanline {
  clock: Box<dyn Clock>,
  last: u8,
}

impl Scanline {
  pub fn new(clock: Box<dyn Clock>) -> Scanline {
    Scanline { clock, last: 0 }
  }

  /// Current LY and whether this read is the first to see vertical blank
  /// since LY last read below `LY_VBLANK`.
  pub fn read(&mut self) -> (u8, bool) {
    let ly = line_at(self.clock.now());
    let entered = ly >= LY_VBLANK && self.last < LY_VBLANK;
    self.last = ly;
    (ly, entered)
  }
}

/// LY at time `t`.
pub fn line_at(t: Duration) -> u8 {
  let period = u128::from(NANOS_PER_SEC / FRAME_HZ);
  let part = t.as_nanos() % period;
  let lines = u128::from(LY_MAX) + 1;
  (part * lines / period) as u8
}
