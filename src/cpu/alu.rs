//! Flag arithmetic. Every function returns the result together with the
//! complete new F value; callers that preserve a flag pass it back in.

use crate::cpu::reg::{C, H, N, Z};

fn z(v: u8) -> u8 {
  if v == 0 {
    Z
  } else {
    0
  }
}

fn flag(cond: bool, f: u8) -> u8 {
  if cond {
    f
  } else {
    0
  }
}

/// The eight accumulator operations selected by bits 5..3 of the opcode.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AluOp {
  Add,
  Adc,
  Sub,
  Sbc,
  And,
  Xor,
  Or,
  Cp,
}

impl AluOp {
  pub fn decode(bits: u8) -> AluOp {
    match bits & 0x7 {
      0 => AluOp::Add,
      1 => AluOp::Adc,
      2 => AluOp::Sub,
      3 => AluOp::Sbc,
      4 => AluOp::And,
      5 => AluOp::Xor,
      6 => AluOp::Or,
      _ => AluOp::Cp,
    }
  }

  /// Apply to accumulator `a` with operand `n`; `carry` is the incoming C.
  pub fn apply(self, a: u8, n: u8, carry: bool) -> (u8, u8) {
    match self {
      AluOp::Add => add(a, n, false),
      AluOp::Adc => add(a, n, carry),
      AluOp::Sub => sub(a, n, false),
      AluOp::Sbc => sub(a, n, carry),
      AluOp::And => and(a, n),
      AluOp::Xor => xor(a, n),
      AluOp::Or => or(a, n),
      AluOp::Cp => (a, sub(a, n, false).1),
    }
  }
}

pub fn add(a: u8, n: u8, carry: bool) -> (u8, u8) {
  let c = u8::from(carry);
  let result = a.wrapping_add(n).wrapping_add(c);
  let f = z(result)
    | flag((a & 0xf) + (n & 0xf) + c > 0xf, H)
    | flag(u16::from(a) + u16::from(n) + u16::from(c) > 0xff, C);
  (result, f)
}

pub fn sub(a: u8, n: u8, carry: bool) -> (u8, u8) {
  let c = u8::from(carry);
  let result = a.wrapping_sub(n).wrapping_sub(c);
  let f = z(result)
    | N
    | flag((a & 0xf) < (n & 0xf) + c, H)
    | flag(u16::from(a) < u16::from(n) + u16::from(c), C);
  (result, f)
}

pub fn and(a: u8, n: u8) -> (u8, u8) {
  let result = a & n;
  (result, z(result) | H)
}

pub fn xor(a: u8, n: u8) -> (u8, u8) {
  let result = a ^ n;
  (result, z(result))
}

pub fn or(a: u8, n: u8) -> (u8, u8) {
  let result = a | n;
  (result, z(result))
}

/// 8-bit INC; C is carried over from `f`.
pub fn inc(v: u8, f: u8) -> (u8, u8) {
  let result = v.wrapping_add(1);
  (result, z(result) | flag(v & 0xf == 0xf, H) | (f & C))
}

/// 8-bit DEC; C is carried over from `f`.
pub fn dec(v: u8, f: u8) -> (u8, u8) {
  let result = v.wrapping_sub(1);
  (result, z(result) | N | flag(v & 0xf == 0, H) | (f & C))
}

/// ADD HL,rr. Z is carried over from `f`; H is the carry out of bit 11.
pub fn add16(hl: u16, n: u16, f: u8) -> (u16, u8) {
  let result = hl.wrapping_add(n);
  let h = (hl & 0x0fff) + (n & 0x0fff) > 0x0fff;
  let c = u32::from(hl) + u32::from(n) > 0xffff;
  (result, (f & Z) | flag(h, H) | flag(c, C))
}

/// SP plus a signed byte, shared by ADD SP,e and LD HL,SP+e. The flags come
/// from the unsigned low-byte addition.
pub fn add_sp(sp: u16, e: u8) -> (u16, u8) {
  let result = sp.wrapping_add(e as i8 as u16);
  let h = (sp & 0xf) + (u16::from(e) & 0xf) > 0xf;
  let c = (sp & 0xff) + u16::from(e) > 0xff;
  (result, flag(h, H) | flag(c, C))
}

/// Decimal adjust after an addition or subtraction, driven by N/H/C in `f`.
pub fn daa(a: u8, f: u8) -> (u8, u8) {
  let mut adjust = 0;
  let mut carry = f & C != 0;
  let result = if f & N == 0 {
    if carry || a > 0x99 {
      adjust |= 0x60;
      carry = true;
    }
    if f & H != 0 || (a & 0xf) > 0x9 {
      adjust |= 0x06;
    }
    a.wrapping_add(adjust)
  } else {
    if carry {
      adjust |= 0x60;
    }
    if f & H != 0 {
      adjust |= 0x06;
    }
    a.wrapping_sub(adjust)
  };
  (result, z(result) | (f & N) | flag(carry, C))
}

/// The CB rotate/shift group selected by bits 5..3.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RotOp {
  Rlc,
  Rrc,
  Rl,
  Rr,
  Sla,
  Sra,
  Swap,
  Srl,
}

impl RotOp {
  pub fn decode(bits: u8) -> RotOp {
    match bits & 0x7 {
      0 => RotOp::Rlc,
      1 => RotOp::Rrc,
      2 => RotOp::Rl,
      3 => RotOp::Rr,
      4 => RotOp::Sla,
      5 => RotOp::Sra,
      6 => RotOp::Swap,
      _ => RotOp::Srl,
    }
  }

  pub fn apply(self, v: u8, carry: bool) -> (u8, u8) {
    let cin = u8::from(carry);
    let (result, cout) = match self {
      RotOp::Rlc => (v.rotate_left(1), v >> 7),
      RotOp::Rrc => (v.rotate_right(1), v & 1),
      RotOp::Rl => ((v << 1) | cin, v >> 7),
      RotOp::Rr => ((v >> 1) | (cin << 7), v & 1),
      RotOp::Sla => (v << 1, v >> 7),
      // Sign extend.
      RotOp::Sra => (((v as i8) >> 1) as u8, v & 1),
      RotOp::Swap => ((v << 4) | (v >> 4), 0),
      RotOp::Srl => (v >> 1, v & 1),
    };
    (result, z(result) | flag(cout == 1, C))
  }
}

/// RLCA/RRCA/RLA/RRA: the CB rotation with Z forced clear.
pub fn rotate_a(op: RotOp, a: u8, carry: bool) -> (u8, u8) {
  let (result, f) = op.apply(a, carry);
  (result, f & C)
}

/// BIT b; C is carried over from `f`.
pub fn bit(b: u8, v: u8, f: u8) -> u8 {
  flag(v & (1 << b) == 0, Z) | H | (f & C)
}
