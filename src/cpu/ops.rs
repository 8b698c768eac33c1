//! Base opcode table. Each handler decodes its own operand fields from the
//! opcode byte: y = bits 5..3, z = bits 2..0, p = bits 5..4.

use super::alu::{self, AluOp, RotOp};
use super::cb;
use super::reg::{Reg16, C, H, N, Z};
use super::{Cpu, HL_INDIRECT};
use crate::error::Fault;
use crate::mem::Memory;

pub type Handler = fn(&mut Cpu, &mut Memory, u8) -> Result<u32, Fault>;

const RP: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];
const RP2: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::AF];

/// Slots the LR35902 dropped from the Z80 set.
pub const REMOVED: [u8; 11] = [
  0xd3, 0xdb, 0xdd, 0xe3, 0xe4, 0xeb, 0xec, 0xed, 0xf4, 0xfc, 0xfd,
];

macro_rules! set {
  ($t:ident, [$($op:expr),*] => $h:expr) => {{
    $( $t[$op] = $h; )*
  }};
}

pub static BASE: [Handler; 256] = {
  let mut t = [unknown as Handler; 256];

  let mut op = 0;
  while op < 0x100 {
    let z = op & 7;
    match op >> 6 {
      0 => {
        if z == 4 {
          t[op] = inc_r;
        } else if z == 5 {
          t[op] = dec_r;
        } else if z == 6 {
          t[op] = ld_r_n;
        }
      }
      1 => t[op] = ld_r_r,
      2 => t[op] = alu_r,
      _ => {
        if z == 6 {
          t[op] = alu_n;
        } else if z == 7 {
          t[op] = rst;
        }
      }
    }
    op += 1;
  }

  set!(t, [0x00] => nop);
  set!(t, [0x08] => ld_nn_sp);
  set!(t, [0x10] => stop);
  set!(t, [0x18] => jr);
  set!(t, [0x20, 0x28, 0x30, 0x38] => jr_cc);
  set!(t, [0x01, 0x11, 0x21, 0x31] => ld_rp_nn);
  set!(t, [0x09, 0x19, 0x29, 0x39] => add_hl_rp);
  set!(t, [0x02, 0x12, 0x22, 0x32] => ld_ind_a);
  set!(t, [0x0a, 0x1a, 0x2a, 0x3a] => ld_a_ind);
  set!(t, [0x03, 0x13, 0x23, 0x33] => inc_rp);
  set!(t, [0x0b, 0x1b, 0x2b, 0x3b] => dec_rp);
  set!(t, [0x07, 0x0f, 0x17, 0x1f] => rot_a);
  set!(t, [0x27] => daa);
  set!(t, [0x2f] => cpl);
  set!(t, [0x37] => scf);
  set!(t, [0x3f] => ccf);
  set!(t, [0x76] => halt);

  set!(t, [0xc0, 0xc8, 0xd0, 0xd8] => ret_cc);
  set!(t, [0xe0] => ldh_n_a);
  set!(t, [0xe8] => add_sp_e);
  set!(t, [0xf0] => ldh_a_n);
  set!(t, [0xf8] => ld_hl_sp_e);
  set!(t, [0xc1, 0xd1, 0xe1, 0xf1] => pop);
  set!(t, [0xc9] => ret);
  set!(t, [0xd9] => reti);
  set!(t, [0xe9] => jp_hl);
  set!(t, [0xf9] => ld_sp_hl);
  set!(t, [0xc2, 0xca, 0xd2, 0xda] => jp_cc);
  set!(t, [0xe2] => ld_c_a);
  set!(t, [0xea] => ld_nn_a);
  set!(t, [0xf2] => ld_a_c);
  set!(t, [0xfa] => ld_a_nn);
  set!(t, [0xc3] => jp);
  set!(t, [0xcb] => prefix_cb);
  set!(t, [0xf3] => di);
  set!(t, [0xfb] => ei);
  set!(t, [0xc4, 0xcc, 0xd4, 0xdc] => call_cc);
  set!(t, [0xc5, 0xd5, 0xe5, 0xf5] => push);
  set!(t, [0xcd] => call);

  let mut i = 0;
  while i < REMOVED.len() {
    t[REMOVED[i] as usize] = removed;
    i += 1;
  }

  t
};

fn y(op: u8) -> u8 {
  (op >> 3) & 7
}

fn p(op: u8) -> usize {
  ((op >> 4) & 3) as usize
}

/// Extra cost for the (HL) form of an r-indexed instruction.
fn hl_cost(idx: u8, reg: u32, mem: u32) -> u32 {
  if idx == HL_INDIRECT {
    mem
  } else {
    reg
  }
}

fn unknown(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  Err(Fault::UnknownOpcode {
    addr: cpu.last.addr,
    opcode: op,
  })
}

fn removed(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  Err(Fault::RemovedOpcode {
    addr: cpu.last.addr,
    opcode: op,
  })
}

fn stop(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  debug!("STOP at 0x{:04x}", cpu.last.addr);
  Err(Fault::Stop {
    addr: cpu.last.addr,
  })
}

fn nop(_: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  Ok(4)
}

fn halt(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  debug!("HALT at 0x{:04x}", cpu.last.addr);
  cpu.halt = true;
  Ok(4)
}

fn di(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  debug!("DI");
  cpu.ime = false;
  Ok(4)
}

fn ei(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  debug!("EI");
  cpu.ime = true;
  Ok(4)
}

// 8-bit loads.

fn ld_r_r(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let (dst, src) = (y(op), op & 7);
  let v = cpu.read_r(mem, src);
  cpu.write_r(mem, dst, v);
  Ok(if dst == HL_INDIRECT || src == HL_INDIRECT {
    8
  } else {
    4
  })
}

fn ld_r_n(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let n = cpu.bump(mem);
  cpu.write_r(mem, y(op), n);
  Ok(hl_cost(y(op), 8, 12))
}

/// (BC), (DE), (HL+), (HL-).
fn indirect(cpu: &mut Cpu, op: u8) -> u16 {
  match p(op) {
    0 => cpu.regs.bc(),
    1 => cpu.regs.de(),
    2 => {
      let hl = cpu.regs.hl();
      cpu.regs.hl_inc();
      hl
    }
    _ => {
      let hl = cpu.regs.hl();
      cpu.regs.hl_dec();
      hl
    }
  }
}

fn ld_ind_a(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let addr = indirect(cpu, op);
  mem.wb(addr, cpu.regs.a());
  Ok(8)
}

fn ld_a_ind(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let addr = indirect(cpu, op);
  let v = mem.rb(addr);
  cpu.regs.set_a(v);
  Ok(8)
}

fn ldh_n_a(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let n = cpu.bump(mem);
  mem.wb(0xff00 | u16::from(n), cpu.regs.a());
  Ok(12)
}

fn ldh_a_n(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let n = cpu.bump(mem);
  let v = mem.rb(0xff00 | u16::from(n));
  cpu.regs.set_a(v);
  Ok(12)
}

fn ld_c_a(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let addr = 0xff00 | u16::from(cpu.regs.get_low(Reg16::BC));
  mem.wb(addr, cpu.regs.a());
  Ok(8)
}

fn ld_a_c(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let addr = 0xff00 | u16::from(cpu.regs.get_low(Reg16::BC));
  let v = mem.rb(addr);
  cpu.regs.set_a(v);
  Ok(8)
}

fn ld_nn_a(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  mem.wb(nn, cpu.regs.a());
  Ok(16)
}

fn ld_a_nn(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  let v = mem.rb(nn);
  cpu.regs.set_a(v);
  Ok(16)
}

// 16-bit loads and stack.

fn ld_rp_nn(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  cpu.regs.set_pair(RP[p(op)], nn);
  Ok(12)
}

fn ld_nn_sp(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  mem.ww(nn, cpu.regs.sp());
  Ok(20)
}

fn ld_sp_hl(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let hl = cpu.regs.hl();
  cpu.regs.set_sp(hl);
  Ok(8)
}

fn ld_hl_sp_e(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let e = cpu.bump(mem);
  let (v, f) = alu::add_sp(cpu.regs.sp(), e);
  cpu.regs.set_pair(Reg16::HL, v);
  cpu.regs.set_f(f);
  Ok(12)
}

fn push(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let v = cpu.regs.get_pair(RP2[p(op)]);
  cpu.push(mem, v);
  Ok(16)
}

fn pop(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let v = cpu.pop(mem);
  cpu.regs.set_pair(RP2[p(op)], v);
  Ok(12)
}

// 8-bit arithmetic.

fn alu_r(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let n = cpu.read_r(mem, op & 7);
  let (a, f) = AluOp::decode(y(op)).apply(cpu.regs.a(), n, cpu.regs.c());
  cpu.regs.set_a(a);
  cpu.regs.set_f(f);
  Ok(hl_cost(op & 7, 4, 8))
}

fn alu_n(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let n = cpu.bump(mem);
  let (a, f) = AluOp::decode(y(op)).apply(cpu.regs.a(), n, cpu.regs.c());
  cpu.regs.set_a(a);
  cpu.regs.set_f(f);
  Ok(8)
}

fn inc_r(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let v = cpu.read_r(mem, y(op));
  let (v, f) = alu::inc(v, cpu.regs.f());
  cpu.write_r(mem, y(op), v);
  cpu.regs.set_f(f);
  Ok(hl_cost(y(op), 4, 12))
}

fn dec_r(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let v = cpu.read_r(mem, y(op));
  let (v, f) = alu::dec(v, cpu.regs.f());
  cpu.write_r(mem, y(op), v);
  cpu.regs.set_f(f);
  Ok(hl_cost(y(op), 4, 12))
}

fn daa(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let (a, f) = alu::daa(cpu.regs.a(), cpu.regs.f());
  cpu.regs.set_a(a);
  cpu.regs.set_f(f);
  Ok(4)
}

fn cpl(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let a = !cpu.regs.a();
  cpu.regs.set_a(a);
  let f = cpu.regs.f() | N | H;
  cpu.regs.set_f(f);
  Ok(4)
}

fn scf(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let f = (cpu.regs.f() & Z) | C;
  cpu.regs.set_f(f);
  Ok(4)
}

fn ccf(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let f = (cpu.regs.f() & Z) | (!cpu.regs.f() & C);
  cpu.regs.set_f(f);
  Ok(4)
}

fn rot_a(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  let (a, f) = alu::rotate_a(RotOp::decode(y(op)), cpu.regs.a(), cpu.regs.c());
  cpu.regs.set_a(a);
  cpu.regs.set_f(f);
  Ok(4)
}

// 16-bit arithmetic.

fn inc_rp(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  let r = RP[p(op)];
  let v = cpu.regs.get_pair(r).wrapping_add(1);
  cpu.regs.set_pair(r, v);
  Ok(8)
}

fn dec_rp(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  let r = RP[p(op)];
  let v = cpu.regs.get_pair(r).wrapping_sub(1);
  cpu.regs.set_pair(r, v);
  Ok(8)
}

fn add_hl_rp(cpu: &mut Cpu, _: &mut Memory, op: u8) -> Result<u32, Fault> {
  let n = cpu.regs.get_pair(RP[p(op)]);
  let (v, f) = alu::add16(cpu.regs.hl(), n, cpu.regs.f());
  cpu.regs.set_pair(Reg16::HL, v);
  cpu.regs.set_f(f);
  Ok(8)
}

fn add_sp_e(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let e = cpu.bump(mem);
  let (v, f) = alu::add_sp(cpu.regs.sp(), e);
  cpu.regs.set_sp(v);
  cpu.regs.set_f(f);
  Ok(16)
}

// Control flow.

fn jr(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let e = cpu.bump(mem) as i8;
  let pc = cpu.regs.pc().wrapping_add(e as u16);
  cpu.regs.set_pc(pc);
  Ok(12)
}

fn jr_cc(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let e = cpu.bump(mem) as i8;
  if !cpu.condition(y(op)) {
    return Ok(8);
  }
  let pc = cpu.regs.pc().wrapping_add(e as u16);
  cpu.regs.set_pc(pc);
  Ok(12)
}

fn jp(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  cpu.regs.set_pc(nn);
  Ok(16)
}

fn jp_cc(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  if !cpu.condition(y(op)) {
    return Ok(12);
  }
  cpu.regs.set_pc(nn);
  Ok(16)
}

fn jp_hl(cpu: &mut Cpu, _: &mut Memory, _: u8) -> Result<u32, Fault> {
  let hl = cpu.regs.hl();
  cpu.regs.set_pc(hl);
  Ok(4)
}

fn call(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  let pc = cpu.regs.pc();
  cpu.push(mem, pc);
  cpu.regs.set_pc(nn);
  Ok(24)
}

fn call_cc(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let nn = cpu.bump16(mem);
  if !cpu.condition(y(op)) {
    return Ok(12);
  }
  let pc = cpu.regs.pc();
  cpu.push(mem, pc);
  cpu.regs.set_pc(nn);
  Ok(24)
}

fn ret(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let pc = cpu.pop(mem);
  cpu.regs.set_pc(pc);
  Ok(16)
}

fn ret_cc(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  if !cpu.condition(y(op)) {
    return Ok(8);
  }
  let pc = cpu.pop(mem);
  cpu.regs.set_pc(pc);
  Ok(20)
}

fn reti(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  cpu.ime = true;
  ret(cpu, mem, op)
}

fn rst(cpu: &mut Cpu, mem: &mut Memory, op: u8) -> Result<u32, Fault> {
  let pc = cpu.regs.pc();
  cpu.push(mem, pc);
  cpu.regs.set_pc(u16::from(y(op)) * 8);
  Ok(16)
}

fn prefix_cb(cpu: &mut Cpu, mem: &mut Memory, _: u8) -> Result<u32, Fault> {
  let op = cpu.bump(mem);
  cb::CB[op as usize](cpu, mem, op)
}
