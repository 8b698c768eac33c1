mod alu;
mod cb;
mod ops;
pub mod reg;

#[cfg(test)]
mod optest;

use self::reg::{Reg16, Reg8, Registers, REG8};
use crate::disasm;
use crate::error::Fault;
use crate::interrupt::Interrupt;
use crate::mem::{IoReg, Memory, BOOT_SIZE};

/// Entry point when the boot overlay is mapped.
pub const BOOT_PC: u16 = 0x0000;
/// Entry point of a cartridge started without a boot image.
pub const CART_PC: u16 = 0x0100;
/// Fetches from above this address are a runaway program counter.
pub const PC_LIMIT: u16 = 0xff00;
/// Cost of servicing an interrupt.
pub const DISPATCH_CYCLES: u32 = 20;

/// Operand selector 0..7 used by the r-indexed families. Index 6 is (HL).
const OPERANDS: [Option<Reg8>; 8] = [
  Some(Reg8::B),
  Some(Reg8::C),
  Some(Reg8::D),
  Some(Reg8::E),
  Some(Reg8::H),
  Some(Reg8::L),
  None,
  Some(Reg8::A),
];
pub const HL_INDIRECT: u8 = 6;

/// The most recently fetched instruction. For CB-prefixed instructions
/// `opcode` is 0xcb and `data8` holds the second opcode byte.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct LastInstruction {
  pub addr: u16,
  pub opcode: u8,
  pub data8: Option<u8>,
  pub data16: Option<u16>,
}

impl LastInstruction {
  pub fn mnemonic(&self) -> String {
    disasm::mnemonic(
      self.addr,
      self.opcode,
      self.data8.unwrap_or(0),
      self.data16.unwrap_or(0),
    )
  }
}

pub struct Cpu {
  pub regs: Registers,
  /// Interrupt master enable.
  pub ime: bool,
  pub halt: bool,

  /// Cycles still owed by the last instruction.
  cycles_left: u32,
  last: LastInstruction,
  last_cycles: u32,
  fault: Option<Fault>,

  /// Total T-cycles charged, including interrupt dispatch.
  t: u64,
  instructions: u64,
}

impl Cpu {
  pub fn new(boot_enabled: bool) -> Cpu {
    let mut regs = Registers::new();
    regs.set_pc(if boot_enabled { BOOT_PC } else { CART_PC });
    Cpu {
      regs,
      ime: false,
      halt: false,
      cycles_left: 0,
      last: LastInstruction::default(),
      last_cycles: 0,
      fault: None,
      t: 0,
      instructions: 0,
    }
  }

  /// One scheduling tick. Executes the next instruction if nothing is owed
  /// and the CPU is not halted, pays one owed cycle, then checks interrupts.
  /// Returns true if an instruction was executed.
  pub fn run(&mut self, mem: &mut Memory) -> bool {
    if self.is_panicked() {
      return false;
    }
    let mut executed = false;
    if !self.halt && self.cycles_left == 0 {
      match self.exec(mem) {
        Ok(cycles) => {
          self.cycles_left = cycles;
          self.last_cycles = cycles;
          self.t += u64::from(cycles);
          self.instructions += 1;
          executed = true;
        }
        Err(fault) => {
          self.panic(fault);
          return false;
        }
      }
    }
    if self.cycles_left > 0 {
      self.cycles_left -= 1;
    }
    self.service_interrupts(mem);
    executed
  }

  /// Tick until the next instruction has executed and return its cost.
  /// Returns 0 if the CPU panics or sits in HALT with nothing pending.
  pub fn step(&mut self, mem: &mut Memory) -> u32 {
    loop {
      if self.run(mem) {
        return self.last_cycles;
      }
      if self.is_panicked() || (self.halt && self.cycles_left == 0) {
        return 0;
      }
    }
  }

  fn exec(&mut self, mem: &mut Memory) -> Result<u32, Fault> {
    let addr = self.regs.pc();
    if addr > PC_LIMIT {
      return Err(Fault::PcOverflow { addr });
    }
    if addr as usize >= BOOT_SIZE && mem.boot_mapped() {
      mem.disable_boot();
    }
    let opcode = mem.rb(addr);
    self.regs.set_pc(addr.wrapping_add(1));
    self.last = LastInstruction {
      addr,
      opcode,
      data8: None,
      data16: None,
    };
    let cycles = ops::BASE[opcode as usize](self, mem, opcode)?;
    if log_enabled!(log::Level::Trace) {
      trace!("{:04x}: {}", addr, self.last.mnemonic());
    }
    Ok(cycles)
  }

  /// Dispatch the highest priority pending interrupt if IME is set. With
  /// IME clear a pending interrupt only ends HALT.
  pub fn service_interrupts(&mut self, mem: &mut Memory) -> Option<Interrupt> {
    let pending = mem.io(IoReg::IE) & mem.io(IoReg::IF);
    let interrupt = Interrupt::highest(pending)?;
    if !self.ime {
      if self.halt {
        debug!("Leaving HALT, {:?} pending with IME clear", interrupt);
        self.halt = false;
      }
      return None;
    }
    *mem.io_mut(IoReg::IF) &= !interrupt.bit();
    self.ime = false;
    self.halt = false;
    let pc = self.regs.pc();
    self.push(mem, pc);
    self.regs.set_pc(interrupt.vector());
    self.cycles_left += DISPATCH_CYCLES;
    self.t += u64::from(DISPATCH_CYCLES);
    debug!(
      "Servicing {:?} interrupt: 0x{:04x} -> 0x{:04x}",
      interrupt,
      pc,
      interrupt.vector()
    );
    Some(interrupt)
  }

  /// Read the immediate byte at PC.
  fn bump(&mut self, mem: &mut Memory) -> u8 {
    let pc = self.regs.pc();
    let v = mem.rb(pc);
    self.regs.set_pc(pc.wrapping_add(1));
    self.last.data8 = Some(v);
    v
  }

  /// Read the little-endian immediate word at PC.
  fn bump16(&mut self, mem: &mut Memory) -> u16 {
    let pc = self.regs.pc();
    let v = mem.rw(pc);
    self.regs.set_pc(pc.wrapping_add(2));
    self.last.data16 = Some(v);
    v
  }

  fn read_r(&self, mem: &mut Memory, idx: u8) -> u8 {
    match OPERANDS[(idx & 7) as usize] {
      Some(r) => self.regs.get(r),
      None => mem.rb(self.regs.hl()),
    }
  }

  fn write_r(&mut self, mem: &mut Memory, idx: u8, value: u8) {
    match OPERANDS[(idx & 7) as usize] {
      Some(r) => self.regs.set(r, value),
      None => mem.wb(self.regs.hl(), value),
    }
  }

  /// High byte first onto a descending stack.
  fn push(&mut self, mem: &mut Memory, value: u16) {
    let sp = self.regs.sp().wrapping_sub(1);
    mem.wb(sp, (value >> 8) as u8);
    let sp = sp.wrapping_sub(1);
    mem.wb(sp, (value & 0xff) as u8);
    self.regs.set_sp(sp);
  }

  fn pop(&mut self, mem: &mut Memory) -> u16 {
    let sp = self.regs.sp();
    let v = mem.rw(sp);
    self.regs.set_sp(sp.wrapping_add(2));
    v
  }

  /// NZ, Z, NC, C.
  fn condition(&self, cc: u8) -> bool {
    match cc & 3 {
      0 => !self.regs.z(),
      1 => self.regs.z(),
      2 => !self.regs.c(),
      _ => self.regs.c(),
    }
  }

  /// Execute `code` at `at` without keeping it: the bytes there, PC, HALT
  /// and the pending cycle count are restored afterwards. Runs `steps` instructions, or with None until a
  /// NOP executes. The boot overlay is lifted while the code runs. Returns
  /// the number of instructions executed.
  pub fn inject_code(
    &mut self,
    mem: &mut Memory,
    code: &[u8],
    at: u16,
    steps: Option<usize>,
  ) -> usize {
    let boot = mem.boot_mapped();
    mem.disable_boot();
    let pc = self.regs.pc();
    let cycles_left = self.cycles_left;
    let halt = self.halt;
    let saved = mem.patch(at, code);
    self.regs.set_pc(at);
    self.cycles_left = 0;
    self.halt = false;

    let mut executed = 0;
    loop {
      if let Some(n) = steps {
        if executed >= n {
          break;
        }
      }
      if self.step(mem) == 0 {
        break;
      }
      executed += 1;
      if steps.is_none() && self.last.opcode == 0x00 {
        break;
      }
    }

    mem.patch(at, &saved);
    self.regs.set_pc(pc);
    self.cycles_left = cycles_left;
    self.halt = halt;
    if boot {
      mem.enable_boot();
    }
    executed
  }

  pub fn last_instruction(&self) -> LastInstruction {
    self.last
  }

  /// Cost of the last executed instruction.
  pub fn last_cycles(&self) -> u32 {
    self.last_cycles
  }

  pub fn cycles(&self) -> u64 {
    self.t
  }

  pub fn instructions(&self) -> u64 {
    self.instructions
  }

  pub fn fault(&self) -> Option<Fault> {
    self.fault
  }

  pub fn is_panicked(&self) -> bool {
    self.fault.is_some()
  }

  fn panic(&mut self, fault: Fault) {
    error!("CPU panicked: {}", fault);
    error!("{}", self.dump());
    self.fault = Some(fault);
  }

  /// Full register state, flags and the last instruction.
  pub fn dump(&self) -> String {
    let mut out = String::new();
    for r in REG8.iter() {
      let v = self.regs.get(*r);
      let line = format!("{}: {:3} 0x{:02x} 0b{:08b}\n", r.name(), v, v, v);
      out.push_str(&line);
    }
    let pairs: Vec<String> = [
      Reg16::AF,
      Reg16::BC,
      Reg16::DE,
      Reg16::HL,
      Reg16::SP,
      Reg16::PC,
    ]
    .iter()
    .map(|r| format!("{}: 0x{:04x}", r.name(), self.regs.get_pair(*r)))
    .collect();
    out.push_str(&pairs.join(" "));
    out.push('\n');
    out.push_str(&format!(
      "Z: {} N: {} H: {} C: {} IME: {} HALT: {}\n",
      u8::from(self.regs.z()),
      u8::from(self.regs.n()),
      u8::from(self.regs.h()),
      u8::from(self.regs.c()),
      u8::from(self.ime),
      u8::from(self.halt),
    ));
    out.push_str(&format!(
      "Last instruction 0x{:02x} at adr 0x{:04x}: {}",
      self.last.opcode,
      self.last.addr,
      self.last.mnemonic()
    ));
    out
  }
}
