//! Mnemonics for diagnostics. Nothing here touches emulated state.

const R: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 4] = ["NZ", "Z", "NC", "C"];
const ALU: [&str; 8] = [
  "ADD A, ", "ADC A, ", "SUB ", "SBC A, ", "AND ", "XOR ", "OR ", "CP ",
];
const ROT: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];
const ROT_A: [&str; 4] = ["RLCA", "RRCA", "RLA", "RRA"];
const MISC_A: [&str; 4] = ["DAA", "CPL", "SCF", "CCF"];
const LD_IND: [&str; 4] = ["(BC)", "(DE)", "(HL+)", "(HL-)"];

/// Mnemonic of the instruction `opcode` fetched at `addr`. `data8` and
/// `data16` are its immediates; for 0xcb, `data8` is the second opcode byte.
pub fn mnemonic(addr: u16, opcode: u8, data8: u8, data16: u16) -> String {
  if opcode == 0xcb {
    return cb_mnemonic(data8);
  }

  let x = opcode >> 6;
  let y = ((opcode >> 3) & 7) as usize;
  let z = opcode & 7;
  let p = y >> 1;
  let q = y & 1 == 1;
  let n = format!("0x{:02x}", data8);
  let nn = format!("0x{:04x}", data16);
  let e = data8 as i8;
  // Relative jumps are taken from the end of the 2-byte instruction.
  let target = format!(
    "0x{:04x}",
    addr.wrapping_add(2).wrapping_add(e as u16)
  );

  match (x, z) {
    (0, 0) => match y {
      0 => "NOP".to_owned(),
      1 => format!("LD ({}), SP", nn),
      2 => "STOP".to_owned(),
      3 => format!("JR {}", target),
      _ => format!("JR {}, {}", CC[y - 4], target),
    },
    (0, 1) if q => format!("ADD HL, {}", RP[p]),
    (0, 1) => format!("LD {}, {}", RP[p], nn),
    (0, 2) if q => format!("LD A, {}", LD_IND[p]),
    (0, 2) => format!("LD {}, A", LD_IND[p]),
    (0, 3) if q => format!("DEC {}", RP[p]),
    (0, 3) => format!("INC {}", RP[p]),
    (0, 4) => format!("INC {}", R[y]),
    (0, 5) => format!("DEC {}", R[y]),
    (0, 6) => format!("LD {}, {}", R[y], n),
    (0, _) if y < 4 => ROT_A[y].to_owned(),
    (0, _) => MISC_A[y - 4].to_owned(),
    (1, 6) if y == 6 => "HALT".to_owned(),
    (1, _) => format!("LD {}, {}", R[y], R[z as usize]),
    (2, _) => format!("{}{}", ALU[y], R[z as usize]),
    (_, 0) => match y {
      0..=3 => format!("RET {}", CC[y]),
      4 => format!("LDH (0xff{:02x}), A", data8),
      5 => format!("ADD SP, {}", e),
      6 => format!("LDH A, (0xff{:02x})", data8),
      _ => format!("LD HL, SP{:+}", e),
    },
    (_, 1) if !q => format!("POP {}", RP2[p]),
    (_, 1) => match p {
      0 => "RET".to_owned(),
      1 => "RETI".to_owned(),
      2 => "JP HL".to_owned(),
      _ => "LD SP, HL".to_owned(),
    },
    (_, 2) => match y {
      0..=3 => format!("JP {}, {}", CC[y], nn),
      4 => "LD (C), A".to_owned(),
      5 => format!("LD ({}), A", nn),
      6 => "LD A, (C)".to_owned(),
      _ => format!("LD A, ({})", nn),
    },
    (_, 3) => match y {
      0 => format!("JP {}", nn),
      6 => "DI".to_owned(),
      7 => "EI".to_owned(),
      _ => unknown(opcode),
    },
    (_, 4) if y < 4 => format!("CALL {}, {}", CC[y], nn),
    (_, 5) if !q => format!("PUSH {}", RP2[p]),
    (_, 5) if p == 0 => format!("CALL {}", nn),
    (_, 6) => format!("{}{}", ALU[y], n),
    (_, 7) => format!("RST 0x{:02x}", y * 8),
    _ => unknown(opcode),
  }
}

fn cb_mnemonic(op: u8) -> String {
  let y = ((op >> 3) & 7) as usize;
  let r = R[(op & 7) as usize];
  match op >> 6 {
    0 => format!("{} {}", ROT[y], r),
    1 => format!("BIT {}, {}", y, r),
    2 => format!("RES {}, {}", y, r),
    _ => format!("SET {}, {}", y, r),
  }
}

fn unknown(opcode: u8) -> String {
  format!("unknown instruction 0x{:02x}", opcode)
}
