use super::reg::{Reg16, Reg8, C, H, N, Z};
use super::Cpu;
use crate::error::Fault;
use crate::interrupt::Interrupt;
use crate::mem::{IoReg, Memory};

use pretty_assertions::assert_eq;

fn init() -> (Cpu, Memory) {
  let mut cpu = Cpu::new(false);
  let mem = Memory::new();
  // Start in WRAM.
  cpu.regs.set_pc(0xc000);
  cpu.regs.set_sp(0xfffe);
  (cpu, mem)
}

fn run(
  cpu: &mut Cpu,
  mem: &mut Memory,
  code: &[u8],
  len: u16,
  time_expected: u32,
) {
  let start = cpu.regs.pc();
  mem.write(start, code);
  let time_actual = cpu.step(mem);
  // Test time.
  assert_eq!(time_actual, time_expected);
  // Test that the PC was incremented.
  assert_eq!(cpu.regs.pc(), start.wrapping_add(len));
}

#[test]
fn nop() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x00], 1, 4);
  assert_eq!(cpu.instructions(), 1);
}

#[test]
fn ld_r_n() {
  macro_rules! run_test {
    ($reg:expr, $opcode:expr) => {{
      let (mut cpu, mut mem) = init();
      let f = cpu.regs.f();
      run(&mut cpu, &mut mem, &[$opcode, 0x42], 2, 8);
      assert_eq!(cpu.regs.f(), f);
      assert_eq!(cpu.regs.get($reg), 0x42);
    }};
  }
  run_test!(Reg8::B, 0x06);
  run_test!(Reg8::C, 0x0e);
  run_test!(Reg8::D, 0x16);
  run_test!(Reg8::E, 0x1e);
  run_test!(Reg8::H, 0x26);
  run_test!(Reg8::L, 0x2e);
  run_test!(Reg8::A, 0x3e);
}

#[test]
fn ld_r_r() {
  macro_rules! reg_reg {
    ($r1:expr, $r2:expr, $opcode:expr) => {{
      let (mut cpu, mut mem) = init();
      cpu.regs.set($r2, 0x42);
      let f = cpu.regs.f();
      run(&mut cpu, &mut mem, &[$opcode], 1, 4);
      assert_eq!(cpu.regs.f(), f);
      assert_eq!(cpu.regs.get($r1), 0x42);
      assert_eq!(cpu.regs.get($r2), 0x42);
    }};
  }
  reg_reg!(Reg8::A, Reg8::B, 0x78);
  reg_reg!(Reg8::A, Reg8::L, 0x7d);
  reg_reg!(Reg8::B, Reg8::C, 0x41);
  reg_reg!(Reg8::C, Reg8::A, 0x4f);
  reg_reg!(Reg8::D, Reg8::E, 0x53);
  reg_reg!(Reg8::E, Reg8::H, 0x5c);
  reg_reg!(Reg8::H, Reg8::D, 0x62);
  reg_reg!(Reg8::L, Reg8::B, 0x68);
}

#[test]
fn ld_hl_indirect() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::HL, 0xc100);
  cpu.regs.set(Reg8::B, 0x37);
  // LD (HL),B
  run(&mut cpu, &mut mem, &[0x70], 1, 8);
  assert_eq!(mem.rb(0xc100), 0x37);
  // LD E,(HL)
  run(&mut cpu, &mut mem, &[0x5e], 1, 8);
  assert_eq!(cpu.regs.get(Reg8::E), 0x37);
  // LD (HL),n
  run(&mut cpu, &mut mem, &[0x36, 0x99], 2, 12);
  assert_eq!(mem.rb(0xc100), 0x99);
}

#[test]
fn ld_hl_inc_dec() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::HL, 0xc100);
  cpu.regs.set_a(0x05);
  // LD (HL+),A
  run(&mut cpu, &mut mem, &[0x22], 1, 8);
  assert_eq!(mem.rb(0xc100), 0x05);
  assert_eq!(cpu.regs.hl(), 0xc101);
  // LD A,(HL-)
  mem.wb(0xc101, 0x66);
  run(&mut cpu, &mut mem, &[0x3a], 1, 8);
  assert_eq!(cpu.regs.a(), 0x66);
  assert_eq!(cpu.regs.hl(), 0xc100);
}

#[test]
fn ldh() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0x1f);
  // LDH (n),A into IE.
  run(&mut cpu, &mut mem, &[0xe0, 0xff], 2, 12);
  assert_eq!(mem.io(IoReg::IE), 0x1f);
  // LD A,(C)
  cpu.regs.set(Reg8::C, 0x80);
  mem.wb(0xff80, 0x5a);
  run(&mut cpu, &mut mem, &[0xf2], 1, 8);
  assert_eq!(cpu.regs.a(), 0x5a);
  // LD (nn),A
  run(&mut cpu, &mut mem, &[0xea, 0x34, 0xc2], 3, 16);
  assert_eq!(mem.rb(0xc234), 0x5a);
}

#[test]
fn ld_rp_nn_and_sp() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x21, 0x34, 0x12], 3, 12);
  assert_eq!(cpu.regs.hl(), 0x1234);
  // LD (nn),SP
  run(&mut cpu, &mut mem, &[0x08, 0x00, 0xc2], 3, 20);
  assert_eq!(mem.rw(0xc200), 0xfffe);
  // LD SP,HL
  run(&mut cpu, &mut mem, &[0xf9], 1, 8);
  assert_eq!(cpu.regs.sp(), 0x1234);
}

#[test]
fn add_a_a_overflow() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0x80);
  run(&mut cpu, &mut mem, &[0x87], 1, 4);
  assert_eq!(cpu.regs.a(), 0x00);
  assert_eq!(cpu.regs.f(), Z | C);
}

#[test]
fn add_half_carry_sums_nibbles() {
  // 0x0f + 0x01 carries out of bit 3 although bit 3 is clear in the
  // operand; a test of bit 3 in both operands would miss it.
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0x0f);
  cpu.regs.set(Reg8::B, 0x01);
  run(&mut cpu, &mut mem, &[0x80], 1, 4);
  assert_eq!(cpu.regs.a(), 0x10);
  assert_eq!(cpu.regs.f(), H);
}

#[test]
fn alu_family() {
  macro_rules! alu {
    ($opcode:expr, $a:expr, $n:expr, $f_in:expr, $a_out:expr, $f_out:expr) => {{
      let (mut cpu, mut mem) = init();
      cpu.regs.set_a($a);
      cpu.regs.set_f($f_in);
      run(&mut cpu, &mut mem, &[$opcode, $n], 2, 8);
      assert_eq!(cpu.regs.a(), $a_out, "opcode {:02x}", $opcode);
      assert_eq!(cpu.regs.f(), $f_out, "opcode {:02x}", $opcode);
    }};
  }
  alu!(0xc6, 0x3a, 0xc6, 0, 0x00, Z | H | C); // ADD
  alu!(0xce, 0xe1, 0x0f, C, 0xf1, H); // ADC
  alu!(0xd6, 0x3e, 0x3e, 0, 0x00, Z | N); // SUB
  alu!(0xde, 0x3b, 0x2a, C, 0x10, N); // SBC
  alu!(0xe6, 0x5a, 0x3f, C, 0x1a, H); // AND
  alu!(0xee, 0xff, 0xff, C, 0x00, Z); // XOR
  alu!(0xf6, 0x00, 0x00, C, 0x00, Z); // OR
  alu!(0xfe, 0x3c, 0x40, 0, 0x3c, N | C); // CP
}

#[test]
fn or_recomputes_z() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_f(Z | N | H | C);
  cpu.regs.set(Reg8::B, 0x01);
  // OR B
  run(&mut cpu, &mut mem, &[0xb0], 1, 4);
  assert_eq!(cpu.regs.a(), 0x01);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn inc_hl_wraps() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::HL, 0xc100);
  cpu.regs.set_f(C);
  mem.wb(0xc100, 0xff);
  run(&mut cpu, &mut mem, &[0x34], 1, 12);
  assert_eq!(mem.rb(0xc100), 0x00);
  assert_eq!(cpu.regs.f(), Z | H | C);
}

#[test]
fn dec_r() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set(Reg8::D, 0x10);
  run(&mut cpu, &mut mem, &[0x15], 1, 4);
  assert_eq!(cpu.regs.get(Reg8::D), 0x0f);
  assert_eq!(cpu.regs.f(), N | H);
}

#[test]
fn inc_dec_rp_keep_flags() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_f(Z | C);
  cpu.regs.set_pair(Reg16::DE, 0xffff);
  run(&mut cpu, &mut mem, &[0x13], 1, 8);
  assert_eq!(cpu.regs.de(), 0x0000);
  run(&mut cpu, &mut mem, &[0x0b], 1, 8);
  assert_eq!(cpu.regs.bc(), 0xffff);
  assert_eq!(cpu.regs.f(), Z | C);
}

#[test]
fn add_hl_rp() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_f(Z);
  cpu.regs.set_pair(Reg16::HL, 0x8a23);
  cpu.regs.set_pair(Reg16::BC, 0x0605);
  run(&mut cpu, &mut mem, &[0x09], 1, 8);
  assert_eq!(cpu.regs.hl(), 0x9028);
  assert_eq!(cpu.regs.f(), Z | H);
  // ADD HL,HL
  run(&mut cpu, &mut mem, &[0x29], 1, 8);
  assert_eq!(cpu.regs.hl(), 0x2050);
  assert_eq!(cpu.regs.f(), Z | C);
}

#[test]
fn sp_plus_e() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_sp(0xfff8);
  // LD HL,SP+2
  run(&mut cpu, &mut mem, &[0xf8, 0x02], 2, 12);
  assert_eq!(cpu.regs.hl(), 0xfffa);
  assert_eq!(cpu.regs.f(), 0);
  // ADD SP,-1
  run(&mut cpu, &mut mem, &[0xe8, 0xff], 2, 16);
  assert_eq!(cpu.regs.sp(), 0xfff7);
  assert_eq!(cpu.regs.f(), H | C);
}

#[test]
fn daa_after_add() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0x15);
  // ADD A,0x27 then DAA.
  run(&mut cpu, &mut mem, &[0xc6, 0x27], 2, 8);
  run(&mut cpu, &mut mem, &[0x27], 1, 4);
  assert_eq!(cpu.regs.a(), 0x42);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn accumulator_misc() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0x35);
  // CPL
  run(&mut cpu, &mut mem, &[0x2f], 1, 4);
  assert_eq!(cpu.regs.a(), 0xca);
  assert_eq!(cpu.regs.f(), N | H);
  // SCF
  run(&mut cpu, &mut mem, &[0x37], 1, 4);
  assert_eq!(cpu.regs.f(), C);
  // CCF
  run(&mut cpu, &mut mem, &[0x3f], 1, 4);
  assert_eq!(cpu.regs.f(), 0);
  // RLCA
  run(&mut cpu, &mut mem, &[0x07], 1, 4);
  assert_eq!(cpu.regs.a(), 0x95);
  assert_eq!(cpu.regs.f(), C);
}

#[test]
fn push_pop_round_trip() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::BC, 0x1234);
  run(&mut cpu, &mut mem, &[0xc5], 1, 16);
  assert_eq!(cpu.regs.sp(), 0xfffc);
  assert_eq!(mem.rb(0xfffd), 0x12);
  assert_eq!(mem.rb(0xfffc), 0x34);
  run(&mut cpu, &mut mem, &[0xd1], 1, 12);
  assert_eq!(cpu.regs.de(), 0x1234);
  assert_eq!(cpu.regs.sp(), 0xfffe);
}

#[test]
fn pop_af_masks_flags() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::BC, 0x12ff);
  run(&mut cpu, &mut mem, &[0xc5], 1, 16);
  run(&mut cpu, &mut mem, &[0xf1], 1, 12);
  assert_eq!(cpu.regs.af(), 0x12f0);
}

#[test]
fn call_ret_round_trip() {
  let (mut cpu, mut mem) = init();
  mem.wb(0xd000, 0xc9);
  run(&mut cpu, &mut mem, &[0xcd, 0x00, 0xd0], 0x1000, 24);
  assert_eq!(cpu.regs.sp(), 0xfffc);
  assert_eq!(mem.rw(0xfffc), 0xc003);
  assert_eq!(cpu.step(&mut mem), 16);
  assert_eq!(cpu.regs.pc(), 0xc003);
  assert_eq!(cpu.regs.sp(), 0xfffe);
}

#[test]
fn conditional_costs() {
  macro_rules! cond {
    ($code:expr, $f:expr, $len:expr, $time:expr) => {{
      let (mut cpu, mut mem) = init();
      cpu.regs.set_f($f);
      run(&mut cpu, &mut mem, &$code, $len, $time);
    }};
  }
  // JR NZ,+4
  cond!([0x20, 0x04], 0, 6, 12);
  cond!([0x20, 0x04], Z, 2, 8);
  // JR C,-2 loops on itself.
  cond!([0x38, 0xfe], C, 0, 12);
  // JP Z,nn
  cond!([0xca, 0x10, 0xc0], Z, 0x10, 16);
  cond!([0xca, 0x10, 0xc0], 0, 3, 12);
  // CALL NC,nn
  cond!([0xd4, 0x10, 0xc0], 0, 0x10, 24);
  cond!([0xd4, 0x10, 0xc0], C, 3, 12);
  // RET Z
  cond!([0xc8], 0, 1, 8);
}

#[test]
fn ret_cc_taken() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_sp(0xfffc);
  mem.ww(0xfffc, 0xc456);
  cpu.regs.set_f(C);
  run(&mut cpu, &mut mem, &[0xd8], 0x456, 20);
  assert_eq!(cpu.regs.sp(), 0xfffe);
}

#[test]
fn rst_and_jp_hl() {
  let (mut cpu, mut mem) = init();
  // RST 0x28
  mem.write(0xc000, &[0xef]);
  assert_eq!(cpu.step(&mut mem), 16);
  assert_eq!(cpu.regs.pc(), 0x0028);
  assert_eq!(mem.rw(cpu.regs.sp()), 0xc001);

  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::HL, 0xc321);
  run(&mut cpu, &mut mem, &[0xe9], 0x321, 4);
}

#[test]
fn reti_sets_ime() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_sp(0xfffc);
  mem.ww(0xfffc, 0xc100);
  run(&mut cpu, &mut mem, &[0xd9], 0x100, 16);
  assert!(cpu.ime);
}

#[test]
fn ei_di() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0xfb], 1, 4);
  assert!(cpu.ime);
  run(&mut cpu, &mut mem, &[0xf3], 1, 4);
  assert!(!cpu.ime);
}

#[test]
fn cb_ops() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_a(0xf1);
  // SWAP A
  run(&mut cpu, &mut mem, &[0xcb, 0x37], 2, 8);
  assert_eq!(cpu.regs.a(), 0x1f);
  assert_eq!(cpu.regs.f(), 0);

  // BIT 7,H keeps C.
  cpu.regs.set_f(C);
  cpu.regs.set(Reg8::H, 0x7f);
  run(&mut cpu, &mut mem, &[0xcb, 0x7c], 2, 8);
  assert_eq!(cpu.regs.f(), Z | H | C);

  // RLC B
  cpu.regs.set(Reg8::B, 0x85);
  run(&mut cpu, &mut mem, &[0xcb, 0x00], 2, 8);
  assert_eq!(cpu.regs.get(Reg8::B), 0x0b);
  assert_eq!(cpu.regs.f(), C);

  // SRA E
  cpu.regs.set(Reg8::E, 0x8a);
  run(&mut cpu, &mut mem, &[0xcb, 0x2b], 2, 8);
  assert_eq!(cpu.regs.get(Reg8::E), 0xc5);
  assert_eq!(cpu.regs.f(), 0);
}

#[test]
fn cb_hl_indirect() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pair(Reg16::HL, 0xc100);
  mem.wb(0xc100, 0x01);
  // SET 7,(HL)
  run(&mut cpu, &mut mem, &[0xcb, 0xfe], 2, 16);
  assert_eq!(mem.rb(0xc100), 0x81);
  // RES 0,(HL)
  run(&mut cpu, &mut mem, &[0xcb, 0x86], 2, 16);
  assert_eq!(mem.rb(0xc100), 0x80);
  // BIT 0,(HL)
  run(&mut cpu, &mut mem, &[0xcb, 0x46], 2, 12);
  assert_eq!(cpu.regs.f(), Z | H);
  // SRL (HL)
  run(&mut cpu, &mut mem, &[0xcb, 0x3e], 2, 16);
  assert_eq!(mem.rb(0xc100), 0x40);
  let last = cpu.last_instruction();
  assert_eq!((last.opcode, last.data8), (0xcb, Some(0x3e)));
}

#[test]
fn interrupt_priority() {
  let (mut cpu, mut mem) = init();
  cpu.ime = true;
  mem.set_io(IoReg::IE, 0x1f);
  mem.request_interrupt(Interrupt::Timer);
  mem.request_interrupt(Interrupt::VBlank);

  assert_eq!(cpu.service_interrupts(&mut mem), Some(Interrupt::VBlank));
  assert_eq!(mem.io(IoReg::IF), Interrupt::Timer.bit());
  assert_eq!(cpu.regs.pc(), 0x0040);
  assert!(!cpu.ime);
  assert_eq!(mem.rw(cpu.regs.sp()), 0xc000);

  // Timer waits for IME.
  assert_eq!(cpu.service_interrupts(&mut mem), None);
  cpu.ime = true;
  assert_eq!(cpu.service_interrupts(&mut mem), Some(Interrupt::Timer));
  assert_eq!(mem.io(IoReg::IF), 0);
  assert_eq!(cpu.regs.pc(), 0x0050);
}

#[test]
fn disabled_interrupt_is_ignored() {
  let (mut cpu, mut mem) = init();
  cpu.ime = true;
  mem.set_io(IoReg::IE, Interrupt::Serial.bit());
  mem.request_interrupt(Interrupt::Joypad);
  assert_eq!(cpu.service_interrupts(&mut mem), None);
  assert_eq!(cpu.regs.pc(), 0xc000);
}

#[test]
fn dispatch_after_instruction() {
  let (mut cpu, mut mem) = init();
  cpu.ime = true;
  mem.set_io(IoReg::IE, Interrupt::VBlank.bit());
  mem.request_interrupt(Interrupt::VBlank);
  assert!(cpu.run(&mut mem));
  assert_eq!(cpu.regs.pc(), 0x0040);
  assert_eq!(mem.rw(cpu.regs.sp()), 0xc001);
  assert_eq!(cpu.cycles(), 4 + 20);
}

#[test]
fn halt_until_interrupt() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x76], 1, 4);
  assert!(cpu.halt);
  // Nothing pending: no progress.
  assert_eq!(cpu.step(&mut mem), 0);
  assert_eq!(cpu.regs.pc(), 0xc001);

  // IME clear: wake up without dispatch.
  mem.set_io(IoReg::IE, Interrupt::Timer.bit());
  mem.request_interrupt(Interrupt::Timer);
  assert_eq!(cpu.step(&mut mem), 4);
  assert!(!cpu.halt);
  assert_eq!(cpu.regs.pc(), 0xc002);
  assert_eq!(mem.io(IoReg::IF), Interrupt::Timer.bit());
}

#[test]
fn halt_with_ime_dispatches() {
  let (mut cpu, mut mem) = init();
  cpu.ime = true;
  run(&mut cpu, &mut mem, &[0x76], 1, 4);
  mem.set_io(IoReg::IE, Interrupt::Serial.bit());
  mem.request_interrupt(Interrupt::Serial);
  // The NOP at the vector.
  assert_eq!(cpu.step(&mut mem), 4);
  assert!(!cpu.halt);
  assert_eq!(cpu.regs.pc(), 0x0059);
  assert_eq!(mem.rw(cpu.regs.sp()), 0xc001);
}

#[test]
fn removed_opcode_panics() {
  for &op in super::ops::REMOVED.iter() {
    let (mut cpu, mut mem) = init();
    cpu.regs.set_a(0x12);
    cpu.regs.set_pair(Reg16::BC, 0x3456);
    cpu.regs.set_f(Z | C);
    let mut expected = cpu.regs.clone();
    expected.set_pc(0xc001);

    mem.wb(0xc000, op);
    assert_eq!(cpu.step(&mut mem), 0);
    assert!(cpu.is_panicked());
    assert_eq!(
      cpu.fault(),
      Some(Fault::RemovedOpcode {
        addr: 0xc000,
        opcode: op
      })
    );
    assert_eq!(cpu.regs, expected);
    // A panicked CPU stays put.
    assert!(!cpu.run(&mut mem));
    assert_eq!(cpu.regs.pc(), 0xc001);
  }
}

#[test]
fn stop_panics() {
  let (mut cpu, mut mem) = init();
  mem.write(0xc000, &[0x10, 0x00]);
  assert_eq!(cpu.step(&mut mem), 0);
  assert_eq!(cpu.fault(), Some(Fault::Stop { addr: 0xc000 }));
}

#[test]
fn pc_overflow_panics() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pc(0xff00);
  // 0xff00 itself still executes (P1 reads as 0x0f, RRCA).
  assert!(cpu.step(&mut mem) > 0);
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pc(0xff01);
  assert_eq!(cpu.step(&mut mem), 0);
  assert_eq!(cpu.fault(), Some(Fault::PcOverflow { addr: 0xff01 }));
  assert_eq!(cpu.regs.pc(), 0xff01);
}

#[test]
fn repeated_reads_agree() {
  let (mut cpu, mut mem) = init();
  mem.wb(0xc200, 0x77);
  run(&mut cpu, &mut mem, &[0xfa, 0x00, 0xc2], 3, 16);
  let first = cpu.regs.a();
  run(&mut cpu, &mut mem, &[0xfa, 0x00, 0xc2], 3, 16);
  assert_eq!(cpu.regs.a(), first);
  assert_eq!(first, 0x77);
}

#[test]
fn boot_scenario() {
  let mut mem = Memory::new();
  mem.load_boot(&[0x3e, 0x42, 0x00]);
  let mut cpu = Cpu::new(true);
  assert_eq!(cpu.regs.pc(), 0x0000);

  assert!(cpu.run(&mut mem));
  assert!(!cpu.run(&mut mem));
  assert_eq!(cpu.regs.a(), 0x42);
  assert_eq!(cpu.regs.pc(), 0x0002);
  assert_eq!(cpu.last_cycles(), 8);
  assert_eq!(cpu.cycles(), 8);

  assert_eq!(cpu.step(&mut mem), 4);
  assert_eq!(cpu.regs.pc(), 0x0003);
  assert_eq!(cpu.cycles(), 12);
  assert!(mem.boot_mapped());
}

#[test]
fn boot_overlay_unmaps_for_good() {
  let mut rom = vec![0; 0x200];
  // JP 0x0000
  rom[0x100..0x103].copy_from_slice(&[0xc3, 0x00, 0x00]);
  rom[0x000] = 0x04; // INC B
  let mut mem = Memory::new();
  mem.load_rom(&rom);
  // JP 0x0100
  mem.load_boot(&[0xc3, 0x00, 0x01]);
  let mut cpu = Cpu::new(true);

  assert_eq!(cpu.step(&mut mem), 16);
  assert!(mem.boot_mapped());
  assert_eq!(cpu.step(&mut mem), 16);
  assert!(!mem.boot_mapped());
  assert_eq!(cpu.regs.pc(), 0x0000);
  // Back below 0x100 the cartridge is visible.
  assert_eq!(cpu.step(&mut mem), 4);
  assert_eq!(cpu.regs.get(Reg8::B), 1);
  assert!(!mem.boot_mapped());
}

#[test]
fn inject_code_restores() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_pc(0x0150);
  mem.write(0xc000, &[0xaa, 0xbb, 0xcc]);

  // LD A,0x99; NOP
  let n = cpu.inject_code(&mut mem, &[0x3e, 0x99, 0x00], 0xc000, None);
  assert_eq!(n, 2);
  assert_eq!(cpu.regs.a(), 0x99);
  assert_eq!(cpu.regs.pc(), 0x0150);
  assert_eq!(mem.rb(0xc000), 0xaa);
  assert_eq!(mem.rb(0xc002), 0xcc);

  // INC A twice, bounded to one step.
  let n = cpu.inject_code(&mut mem, &[0x3c, 0x3c], 0xc000, Some(1));
  assert_eq!(n, 1);
  assert_eq!(cpu.regs.a(), 0x9a);
  assert_eq!(cpu.regs.pc(), 0x0150);
}

#[test]
fn inject_code_keeps_boot_overlay() {
  let mut mem = Memory::new();
  mem.load_boot(&[0x00; 0x100]);
  let mut cpu = Cpu::new(true);
  cpu.regs.set_sp(0xfffe);
  cpu.inject_code(&mut mem, &[0x06, 0x07, 0x00], 0xc000, None);
  assert_eq!(cpu.regs.get(Reg8::B), 0x07);
  assert!(mem.boot_mapped());
  assert_eq!(cpu.regs.pc(), 0x0000);
}

#[test]
fn inject_into_bank_window() {
  let mut rom = vec![0; 0x8000];
  rom[0x147] = 0x01;
  rom[0x4000] = 0xaa;
  let mut mem = Memory::new();
  mem.load_rom(&rom);
  let mut cpu = Cpu::new(false);
  cpu.regs.set_sp(0xfffe);

  // LD A,0x77; NOP
  let n = cpu.inject_code(&mut mem, &[0x3e, 0x77, 0x00], 0x4000, None);
  assert_eq!(n, 2);
  assert_eq!(cpu.regs.a(), 0x77);
  assert_eq!(mem.rb(0x4000), 0xaa);
  assert_eq!(mem.rb(0x4001), 0x00);
}

#[test]
fn inject_code_keeps_timing() {
  let (mut cpu, mut mem) = init();
  // LD BC,0x1234 leaves cycles pending after its first tick.
  mem.write(0xc000, &[0x01, 0x34, 0x12]);
  assert!(cpu.run(&mut mem));
  let pending = cpu.cycles_left;
  assert!(pending > 0);

  cpu.inject_code(&mut mem, &[0x00], 0xd000, None);
  assert_eq!(cpu.cycles_left, pending);

  cpu.cycles_left = 0;
  cpu.halt = true;
  cpu.inject_code(&mut mem, &[0x3c, 0x00], 0xd000, None);
  assert!(cpu.halt);
  cpu.halt = false;

  // Nothing left pending: the next tick fetches.
  mem.write(0xc003, &[0x00]);
  assert!(cpu.run(&mut mem));
  assert_eq!(cpu.regs.pc(), 0xc004);
}

#[test]
fn dump_shows_state() {
  let mut cpu = Cpu::new(false);
  cpu.regs.set_a(0x42);
  cpu.regs.set_f(Z | C);
  let expected = vec![
    "A:  66 0x42 0b01000010",
    "F: 144 0x90 0b10010000",
    "B:   0 0x00 0b00000000",
    "C:   0 0x00 0b00000000",
    "D:   0 0x00 0b00000000",
    "E:   0 0x00 0b00000000",
    "H:   0 0x00 0b00000000",
    "L:   0 0x00 0b00000000",
    "AF: 0x4290 BC: 0x0000 DE: 0x0000 HL: 0x0000 SP: 0x0000 PC: 0x0100",
    "Z: 1 N: 0 H: 0 C: 1 IME: 0 HALT: 0",
    "Last instruction 0x00 at adr 0x0000: NOP",
  ];
  assert_eq!(cpu.dump().lines().collect::<Vec<_>>(), expected);
}
