use crate::config::Config;
use crate::cpu::Cpu;
use crate::mem::{Key, Memory};
use crate::video::Video;

use anyhow::{anyhow, Context};

pub struct GameBoy {
  cpu: Cpu,
  mem: Memory,
}

impl GameBoy {
  /// A session over a prepared bus. The CPU starts in the boot image if one
  /// is mapped.
  pub fn new(mem: Memory) -> GameBoy {
    GameBoy {
      cpu: Cpu::new(mem.boot_mapped()),
      mem,
    }
  }

  /// Build the bus from `config`. Missing images are logged and leave the
  /// corresponding region zeroed.
  pub fn from_config(config: &Config) -> GameBoy {
    let mut mem = Memory::new();
    mem.set_strict(config.strict);
    mem.set_echo_serial(config.echo_serial);
    if let Some(boot) = &config.boot {
      if let Err(e) = mem.open_boot(boot) {
        warn!("{:#}; starting without a boot ROM", e);
      }
    }
    if let Err(e) = mem.open_rom(&config.rom) {
      warn!("{:#}; continuing with an empty cartridge", e);
    }
    GameBoy::new(mem)
  }

  pub fn cpu(&self) -> &Cpu {
    &self.cpu
  }

  pub fn mem(&self) -> &Memory {
    &self.mem
  }

  pub fn mem_mut(&mut self) -> &mut Memory {
    &mut self.mem
  }

  pub fn key_down(&mut self, key: Key) {
    self.mem.key_down(key);
  }

  pub fn key_up(&mut self, key: Key) {
    self.mem.key_up(key);
  }

  /// Alternate CPU ticks and video turns until a component panics or
  /// `max_ticks` ticks have run. Returns the number of ticks run.
  pub fn run(
    &mut self,
    video: &mut dyn Video,
    max_ticks: Option<u64>,
  ) -> anyhow::Result<u64> {
    let mut ticks = 0;
    loop {
      if let Some(max) = max_ticks {
        if ticks >= max {
          break;
        }
      }

      self.cpu.run(&mut self.mem);
      video.step(&mut self.mem);
      ticks += 1;

      if let Some(fault) = self.cpu.fault() {
        return Err(fault).with_context(|| {
          format!("CPU panicked after {} ticks", ticks)
        });
      }
      if let Some(fault) = self.mem.fault() {
        error!("{}", self.cpu.dump());
        return Err(fault).with_context(|| {
          format!("memory bus panicked after {} ticks", ticks)
        });
      }
      if video.is_panicked() {
        error!("{}", self.cpu.dump());
        return Err(anyhow!("video panicked after {} ticks", ticks));
      }
    }
    info!(
      "Stopped after {} ticks: {} instructions, {} cycles",
      ticks,
      self.cpu.instructions(),
      self.cpu.cycles()
    );
    Ok(ticks)
  }
}
