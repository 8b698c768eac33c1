//! 0xcb-prefixed table: rotates and shifts, BIT, RES and SET over the eight
//! operands, (HL) included.

use super::alu::{self, RotOp};
use super::ops::Handler;
use super::{Cpu, HL_INDIRECT};
use crate::error::Fault;
use crate::mem::Memory;

pub static CB: [Handler; 256] = {
  let mut t = [rot as Handler; 256];
  let mut op = 0x40;
  while op < 0x100 {
    t[op] = match op >> 6 {
      1 => bit as Handler,
      2 => res,
      _ => set,
    };
    op += 1;
  }
  t
};

fn rot(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let idx = op & 7;
  let v = cpu.read_r(mem, idx);
  let (v, f) = RotOp::decode(op >> 3).apply(v, cpu.regs.c());
  cpu.write_r(mem, idx, v);
  cpu.regs.set_f(f);
  Ok(if idx == HL_INDIRECT { 16 } else { 8 })
}

fn bit(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let idx = op & 7;
  let v = cpu.read_r(mem, idx);
  let f = alu::bit((op >> 3) & 7, v, cpu.regs.f());
  cpu.regs.set_f(f);
  Ok(if idx == HL_INDIRECT { 12 } else { 8 })
}

fn res(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let idx = op & 7;
  let v = cpu.read_r(mem, idx) & !(1 << ((op >> 3) & 7));
  cpu.write_r(mem, idx, v);
  Ok(if idx == HL_INDIRECT { 16 } else { 8 })
}

fn set(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let idx = op & 7;
  let v = cpu.read_r(mem, idx) | (1 << ((op >> 3) & 7));
  cpu.write_r(mem, idx, v);
  Ok(if idx == HL_INDIRECT { 16 } else { 8 })
}
