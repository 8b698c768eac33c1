mod cart;
mod io;
mod key;
mod ly;
mod mbc;

pub use self::cart::Header;
pub use self::io::IoReg;
pub use self::key::Key;
pub use self::ly::{Clock, SystemClock, FRAME_HZ, LY_MAX, LY_VBLANK};
pub use self::mbc::Mode as MbcMode;

use self::key::KeyData;
use self::ly::Scanline;
use self::mbc::Mbc;
use crate::error::Fault;
use crate::interrupt::Interrupt;

use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const MAP_SIZE: usize = 0x10000;
pub const BOOT_SIZE: usize = 0x100;
/// Largest image mapped directly at address 0.
pub const ROM_MAP_SIZE: usize = 0x8000;

/// Memory bus: the flat 64KB map, the boot overlay and the I/O side effects.
pub struct Memory {
  map: Vec<u8>,
  ram: Vec<u8>,
  boot: [u8; BOOT_SIZE],
  boot_mapped: bool,
  cart: Vec<u8>,
  header: Header,
  mbc: Mbc,
  key: KeyData,
  ly: Scanline,

  strict: bool,
  echo_serial: bool,
  serial: Vec<u8>,

  fault: Option<Fault>,
}

impl Memory {
  pub fn new() -> Memory {
    Memory::with_clock(Box::new(SystemClock::new()))
  }

  /// A bus whose LY register follows `clock`.
  pub fn with_clock(clock: Box<dyn Clock>) -> Memory {
    Memory {
      map: vec![0; MAP_SIZE],
      ram: vec![0; MAP_SIZE],
      boot: [0; BOOT_SIZE],
      boot_mapped: false,
      cart: Vec::new(),
      header: Header::default(),
      mbc: Mbc::new(MbcMode::RomOnly),
      key: KeyData::new(),
      ly: Scanline::new(clock),

      strict: false,
      echo_serial: false,
      serial: Vec::new(),

      fault: None,
    }
  }

  /// Fault on writes into 0x0000-0x7fff that are not bank selects.
  pub fn set_strict(&mut self, strict: bool) {
    self.strict = strict;
  }

  /// Copy the serial transcript to stdout as it is produced.
  pub fn set_echo_serial(&mut self, echo: bool) {
    self.echo_serial = echo;
  }

  /// Install a boot image and map it over 0x0000-0x00ff.
  pub fn load_boot(&mut self, image: &[u8]) {
    if image.len() > BOOT_SIZE {
      warn!(
        "Boot image is {} bytes, only the first {} are used",
        image.len(),
        BOOT_SIZE
      );
    }
    let len = image.len().min(BOOT_SIZE);
    self.boot = [0; BOOT_SIZE];
    self.boot[..len].copy_from_slice(&image[..len]);
    self.enable_boot();
    info!("Loaded boot ROM ({} bytes)", len);
  }

  pub fn open_boot<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let image = fs::read(path)
      .with_context(|| format!("reading boot ROM {}", path.display()))?;
    self.load_boot(&image);
    Ok(())
  }

  /// Install a cartridge image. The first 0x8000 bytes land in the map; the
  /// whole image stays available to the bank window.
  pub fn load_rom(&mut self, image: &[u8]) -> &Header {
    if image.len() > ROM_MAP_SIZE {
      warn!("Warning, rom bigger than 0x{:x}", ROM_MAP_SIZE);
    }
    let len = image.len().min(ROM_MAP_SIZE);
    self.map[..len].copy_from_slice(&image[..len]);
    self.cart = image.to_vec();
    self.header = Header::parse(image);
    self.mbc = Mbc::new(MbcMode::from_cart_type(self.header.cart_type));
    info!("Loaded rom {} (size: {})", self.header, image.len());
    &self.header
  }

  pub fn open_rom<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let image = fs::read(path)
      .with_context(|| format!("reading cartridge {}", path.display()))?;
    self.load_rom(&image);
    Ok(())
  }

  pub fn header(&self) -> &Header {
    &self.header
  }

  pub fn mbc_mode(&self) -> MbcMode {
    self.mbc.mode()
  }

  pub fn boot_mapped(&self) -> bool {
    self.boot_mapped
  }

  pub fn enable_boot(&mut self) {
    debug!("Enabling boot ROM.");
    self.boot_mapped = true;
  }

  pub fn disable_boot(&mut self) {
    if self.boot_mapped {
      info!("Disabling boot ROM.");
    }
    self.boot_mapped = false;
  }

  /// Read a byte at address `addr`.
  pub fn rb(&mut self, addr: u16) -> u8 {
    if let Some(reg) = IoReg::from_addr(addr) {
      return self.read_io(reg);
    }
    if self.boot_mapped && (addr as usize) < BOOT_SIZE {
      return self.boot[addr as usize];
    }
    if let Some(offset) = self.mbc.translate(addr) {
      return self.cart.get(offset).cloned().unwrap_or(0xff);
    }
    self.map[addr as usize]
  }

  fn read_io(&mut self, reg: IoReg) -> u8 {
    let stored = self.map[reg.addr() as usize];
    match reg {
      IoReg::LY => {
        let (ly, vblank) = self.ly.read();
        if vblank {
          self.request_interrupt(Interrupt::VBlank);
        }
        ly
      }
      IoReg::P1 => {
        let value = self.key.rb(stored);
        debug!("P1 (Joypad) read: {:02x}", value);
        value
      }
      _ => {
        if reg.unhandled_read() {
          debug!("{} read unhandled", reg.name());
        }
        stored
      }
    }
  }

  /// Read a 2-byte little-endian word from `addr`.
  pub fn rw(&mut self, addr: u16) -> u16 {
    let lo = u16::from(self.rb(addr));
    let hi = u16::from(self.rb(addr.wrapping_add(1)));
    (hi << 8) | lo
  }

  /// Write `value` at address `addr`.
  pub fn wb(&mut self, addr: u16, value: u8) {
    if self.mbc.selects(addr) {
      debug!("Memory mode write {:02x}", value);
      self.mbc.select(value);
      return;
    }
    if addr < ROM_MAP_SIZE as u16 && self.strict {
      let fault = Fault::RomWrite { addr, value };
      error!("Memory bus panicked: {}", fault);
      self.fault = Some(fault);
      return;
    }
    if let Some(reg) = IoReg::from_addr(addr) {
      self.write_io(reg, value);
      if reg == IoReg::BOOT {
        return;
      }
    }
    self.map[addr as usize] = value;
  }

  fn write_io(&mut self, reg: IoReg, value: u8) {
    match reg {
      IoReg::P1 => self.key.wb(value),
      IoReg::SC => {
        let data = self.map[IoReg::SB.addr() as usize];
        if value & 0x80 != 0 && (data.is_ascii_graphic() || data == b' ') {
          self.serial.push(data);
          if self.echo_serial {
            print!("{}", data as char);
            let _ = std::io::stdout().flush();
          }
        }
      }
      IoReg::BOOT => {
        if self.boot_mapped && value == 0x01 {
          self.disable_boot();
        }
      }
      IoReg::LCDC | IoReg::IF | IoReg::IE => {
        debug!("{} write: {:02x}", reg.name(), value);
      }
      _ => {
        if reg.unhandled_write() {
          debug!("{} write unhandled {:02x}", reg.name(), value);
        }
      }
    }
  }

  /// Write a 2-byte little-endian word to `addr`.
  pub fn ww(&mut self, addr: u16, value: u16) {
    self.wb(addr, (value & 0xff) as u8);
    self.wb(addr.wrapping_add(1), (value >> 8) as u8);
  }

  /// Write an arbitrary number of bytes to memory.
  pub fn write(&mut self, addr: u16, values: &[u8]) {
    let mut cur = addr;
    for v in values {
      self.wb(cur, *v);
      cur = cur.wrapping_add(1);
    }
  }

  /// Direct reference to the cell backing `addr`, bypassing the overlay,
  /// the bank window and all side effects.
  pub fn pointer(&mut self, addr: u16) -> &mut u8 {
    &mut self.map[addr as usize]
  }

  /// Stored value of a fixed register, without read side effects.
  pub fn io(&self, reg: IoReg) -> u8 {
    self.map[reg.addr() as usize]
  }

  pub fn io_mut(&mut self, reg: IoReg) -> &mut u8 {
    self.pointer(reg.addr())
  }

  pub fn set_io(&mut self, reg: IoReg, value: u8) {
    *self.io_mut(reg) = value;
  }

  pub fn request_interrupt(&mut self, interrupt: Interrupt) {
    *self.io_mut(IoReg::IF) |= interrupt.bit();
  }

  /// Overwrite the cells `rb` reads at `addr` and return what was there:
  /// the boot overlay while it is mapped, the cartridge image inside the
  /// bank window, the map otherwise. Bytes past 0xffff are dropped.
  pub fn patch(&mut self, addr: u16, bytes: &[u8]) -> Vec<u8> {
    let len = bytes.len().min(MAP_SIZE - addr as usize);
    let mut old = Vec::with_capacity(len);
    for (i, &b) in bytes[..len].iter().enumerate() {
      let cell = self.cell(addr + i as u16);
      old.push(*cell);
      *cell = b;
    }
    old
  }

  /// Backing cell for a read of `addr`, ignoring I/O side effects.
  fn cell(&mut self, addr: u16) -> &mut u8 {
    if self.boot_mapped && (addr as usize) < BOOT_SIZE {
      return &mut self.boot[addr as usize];
    }
    if let Some(offset) = self.mbc.translate(addr) {
      // Past the image reads as 0xff.
      if offset >= self.cart.len() {
        self.cart.resize(offset + 1, 0xff);
      }
      return &mut self.cart[offset];
    }
    &mut self.map[addr as usize]
  }

  pub fn key_down(&mut self, key: Key) {
    self.key.key_down(key);
  }

  pub fn key_up(&mut self, key: Key) {
    self.key.key_up(key);
  }

  /// Printable bytes sent through the serial port so far.
  pub fn serial_output(&self) -> &[u8] {
    &self.serial
  }

  /// Scratch region for collaborators; the core never touches it.
  pub fn ram(&mut self) -> &mut [u8] {
    &mut self.ram
  }

  pub fn fault(&self) -> Option<Fault> {
    self.fault
  }

  pub fn is_panicked(&self) -> bool {
    self.fault.is_some()
  }
}
