use super::decode::{self, CbOp, Cond, Op, ShiftOp, R16, R16Mem, R16Stk, R8};
use super::reg;
use super::{Registers, CPU};

use crate::mem::Memory;

/// Interrupt sources that exist, as bits of IE and IF.
const INTERRUPT_MASK: u8 = 0x1f;

impl CPU {
  pub fn new() -> CPU {
    CPU {
      regs: Registers::new(),
      ime: false,
      ei_pending: false,
      halt: false,
    }
  }

  /// Back to the power-on register file.
  pub fn reset(&mut self) {
    *self = CPU::new();
  }

  /// Run one instruction, or acknowledge one interrupt.
  /// Return the T-cycles spent, or 0 if the opcode at PC is illegal. In that
  /// case PC is left pointing at the opcode.
  pub fn step(&mut self, mem: &mut Memory) -> u32 {
    let start = mem.now();

    let pending = mem.interrupt_enable & mem.interrupt_flags & INTERRUPT_MASK;
    if pending != 0 {
      self.halt = false;
      if self.ime {
        return self.interrupt(mem, pending);
      }
    }
    if self.halt {
      mem.idle();
      return (mem.now() - start) as u32;
    }

    let ei_was_pending = self.ei_pending;
    let pc = self.regs.pc;
    let opcode = self.bump(mem);
    let m = match decode::MAIN[opcode as usize] {
      Op::Illegal => {
        self.regs.pc = pc;
        error!("Illegal opcode ${:02X} at ${:04X}", opcode, pc);
        return 0;
      }
      Op::Prefix => {
        let op = decode::CB[self.bump(mem) as usize];
        trace!("${:04X}: {}", pc, op);
        self.exec_cb(mem, op);
        op.cycles()
      }
      op => {
        trace!("${:04X}: {}", pc, op);
        let taken = self.exec(mem, op);
        op.cycles(taken)
      }
    };

    // Settle the internal cycles that did not touch the bus.
    let spent = (mem.now() - start) / 4;
    for _ in spent..u64::from(m) {
      mem.idle();
    }

    if ei_was_pending && self.ei_pending {
      self.ime = true;
      self.ei_pending = false;
    }

    (mem.now() - start) as u32
  }

  /// Jump to the handler of the lowest pending interrupt.
  fn interrupt(&mut self, mem: &mut Memory, pending: u8) -> u32 {
    let start = mem.now();
    let bit = pending.trailing_zeros() as u8;
    let vector = 0x40 + 8 * u16::from(bit);
    debug!("interrupt {} -> ${:04X}", bit, vector);

    mem.interrupt_flags &= !(1 << bit);
    self.ime = false;
    self.ei_pending = false;

    mem.idle();
    mem.idle();
    let pc = self.regs.pc;
    self.push(mem, pc);
    mem.idle();
    self.regs.pc = vector;

    (mem.now() - start) as u32
  }

  /// Execute a decoded opcode.
  /// Return whether a conditional branch was taken.
  fn exec(&mut self, mem: &mut Memory, op: Op) -> bool {
    match op {
      Op::Nop => {}
      // The byte after STOP is skipped.
      Op::Stop => self.regs.pc = self.regs.pc.wrapping_add(1),
      Op::Halt => self.halt = true,
      Op::Di => {
        self.ime = false;
        self.ei_pending = false;
      }
      Op::Ei => self.ei_pending = true,

      Op::LdR16Imm(r) => {
        let v = self.imm16(mem);
        self.set_r16(r, v);
      }
      Op::LdMemA(r) => {
        let addr = self.r16_mem(r);
        mem.wb(addr, self.regs.a);
      }
      Op::LdAMem(r) => {
        let addr = self.r16_mem(r);
        self.regs.a = mem.rb(addr);
      }
      Op::LdImmSp => {
        let addr = self.imm16(mem);
        let sp = self.regs.sp;
        mem.wb(addr, sp as u8);
        mem.wb(addr.wrapping_add(1), (sp >> 8) as u8);
      }
      Op::IncR16(r) => {
        let v = self.r16(r).wrapping_add(1);
        self.set_r16(r, v);
      }
      Op::DecR16(r) => {
        let v = self.r16(r).wrapping_sub(1);
        self.set_r16(r, v);
      }
      Op::AddHl(r) => {
        let v = self.r16(r);
        self.add_hl(v);
      }

      Op::IncR8(r) => {
        let v = self.read_r8(mem, r);
        let v = self.inc8(v);
        self.write_r8(mem, r, v);
      }
      Op::DecR8(r) => {
        let v = self.read_r8(mem, r);
        let v = self.dec8(v);
        self.write_r8(mem, r, v);
      }
      Op::LdR8Imm(r) => {
        let v = self.bump(mem);
        self.write_r8(mem, r, v);
      }
      Op::LdR8R8(dst, src) => {
        let v = self.read_r8(mem, src);
        self.write_r8(mem, dst, v);
      }

      Op::Rlca => self.rotate_a(ShiftOp::Rlc),
      Op::Rrca => self.rotate_a(ShiftOp::Rrc),
      Op::Rla => self.rotate_a(ShiftOp::Rl),
      Op::Rra => self.rotate_a(ShiftOp::Rr),
      Op::Daa => self.daa(),
      Op::Cpl => self.cpl(),
      Op::Scf => self.scf(),
      Op::Ccf => self.ccf(),

      Op::Alu(op, r) => {
        let v = self.read_r8(mem, r);
        self.alu(op, v);
      }
      Op::AluImm(op) => {
        let v = self.bump(mem);
        self.alu(op, v);
      }

      Op::Jr => {
        let e = self.bump(mem);
        self.jr(e);
      }
      Op::JrCond(c) => {
        let e = self.bump(mem);
        if !self.cond(c) {
          return false;
        }
        self.jr(e);
      }
      Op::Jp => self.regs.pc = self.imm16(mem),
      Op::JpCond(c) => {
        let addr = self.imm16(mem);
        if !self.cond(c) {
          return false;
        }
        self.regs.pc = addr;
      }
      Op::JpHl => self.regs.pc = self.regs.hl(),
      Op::Call => {
        let addr = self.imm16(mem);
        self.call(mem, addr);
      }
      Op::CallCond(c) => {
        let addr = self.imm16(mem);
        if !self.cond(c) {
          return false;
        }
        self.call(mem, addr);
      }
      Op::Ret => self.regs.pc = self.pop(mem),
      Op::RetCond(c) => {
        if !self.cond(c) {
          return false;
        }
        self.regs.pc = self.pop(mem);
      }
      Op::Reti => {
        self.regs.pc = self.pop(mem);
        self.ime = true;
        self.ei_pending = false;
      }
      Op::Rst(vector) => self.call(mem, u16::from(vector)),

      Op::Push(r) => {
        let v = match r {
          R16Stk::BC => self.regs.bc(),
          R16Stk::DE => self.regs.de(),
          R16Stk::HL => self.regs.hl(),
          R16Stk::AF => self.regs.af(),
        };
        self.push(mem, v);
      }
      Op::Pop(r) => {
        let v = self.pop(mem);
        match r {
          R16Stk::BC => self.regs.set_bc(v),
          R16Stk::DE => self.regs.set_de(v),
          R16Stk::HL => self.regs.set_hl(v),
          R16Stk::AF => self.regs.set_af(v),
        }
      }

      Op::LdhImmA => {
        let addr = 0xff00 | u16::from(self.bump(mem));
        mem.wb(addr, self.regs.a);
      }
      Op::LdhAImm => {
        let addr = 0xff00 | u16::from(self.bump(mem));
        self.regs.a = mem.rb(addr);
      }
      Op::LdhCA => mem.wb(0xff00 | u16::from(self.regs.c), self.regs.a),
      Op::LdhAC => self.regs.a = mem.rb(0xff00 | u16::from(self.regs.c)),
      Op::LdImm16A => {
        let addr = self.imm16(mem);
        mem.wb(addr, self.regs.a);
      }
      Op::LdAImm16 => {
        let addr = self.imm16(mem);
        self.regs.a = mem.rb(addr);
      }

      Op::AddSpImm => {
        let e = self.bump(mem);
        self.regs.sp = self.add_sp(e);
      }
      Op::LdHlSpImm => {
        let e = self.bump(mem);
        let v = self.add_sp(e);
        self.regs.set_hl(v);
      }
      Op::LdSpHl => self.regs.sp = self.regs.hl(),

      // Both are dealt with in `step`.
      Op::Prefix | Op::Illegal => {}
    }
    true
  }

  fn exec_cb(&mut self, mem: &mut Memory, op: CbOp) {
    match op {
      CbOp::Shift(shift, r) => {
        let v = self.read_r8(mem, r);
        let v = self.shift(shift, v);
        self.write_r8(mem, r, v);
      }
      CbOp::Bit(b, r) => {
        let v = self.read_r8(mem, r);
        self.bit(b, v);
      }
      CbOp::Res(b, r) => {
        let v = self.read_r8(mem, r) & !(1 << b);
        self.write_r8(mem, r, v);
      }
      CbOp::Set(b, r) => {
        let v = self.read_r8(mem, r) | (1 << b);
        self.write_r8(mem, r, v);
      }
    }
  }

  /// Read the byte at PC and advance past it.
  fn bump(&mut self, mem: &mut Memory) -> u8 {
    let result = mem.rb(self.regs.pc);
    self.regs.pc = self.regs.pc.wrapping_add(1);
    result
  }

  fn imm16(&mut self, mem: &mut Memory) -> u16 {
    let lo = self.bump(mem);
    let hi = self.bump(mem);
    u16::from(lo) | (u16::from(hi) << 8)
  }

  fn read_r8(&mut self, mem: &mut Memory, r: R8) -> u8 {
    match r {
      R8::B => self.regs.b,
      R8::C => self.regs.c,
      R8::D => self.regs.d,
      R8::E => self.regs.e,
      R8::H => self.regs.h,
      R8::L => self.regs.l,
      R8::MemHl => mem.rb(self.regs.hl()),
      R8::A => self.regs.a,
    }
  }

  fn write_r8(&mut self, mem: &mut Memory, r: R8, v: u8) {
    match r {
      R8::B => self.regs.b = v,
      R8::C => self.regs.c = v,
      R8::D => self.regs.d = v,
      R8::E => self.regs.e = v,
      R8::H => self.regs.h = v,
      R8::L => self.regs.l = v,
      R8::MemHl => mem.wb(self.regs.hl(), v),
      R8::A => self.regs.a = v,
    }
  }

  fn r16(&self, r: R16) -> u16 {
    match r {
      R16::BC => self.regs.bc(),
      R16::DE => self.regs.de(),
      R16::HL => self.regs.hl(),
      R16::SP => self.regs.sp,
    }
  }

  fn set_r16(&mut self, r: R16, v: u16) {
    match r {
      R16::BC => self.regs.set_bc(v),
      R16::DE => self.regs.set_de(v),
      R16::HL => self.regs.set_hl(v),
      R16::SP => self.regs.sp = v,
    }
  }

  /// Address for `ld (rr), a` and friends, applying the HL post-step.
  fn r16_mem(&mut self, r: R16Mem) -> u16 {
    match r {
      R16Mem::BC => self.regs.bc(),
      R16Mem::DE => self.regs.de(),
      R16Mem::HLI => {
        let hl = self.regs.hl();
        self.regs.hl_inc();
        hl
      }
      R16Mem::HLD => {
        let hl = self.regs.hl();
        self.regs.hl_dec();
        hl
      }
    }
  }

  fn cond(&self, c: Cond) -> bool {
    match c {
      Cond::NZ => self.regs.f & reg::Z == 0,
      Cond::Z => self.regs.f & reg::Z != 0,
      Cond::NC => self.regs.f & reg::C == 0,
      Cond::C => self.regs.f & reg::C != 0,
    }
  }

  fn jr(&mut self, e: u8) {
    self.regs.pc = self.regs.pc.wrapping_add(i16::from(e as i8) as u16);
  }

  fn call(&mut self, mem: &mut Memory, addr: u16) {
    let ret = self.regs.pc;
    self.push(mem, ret);
    self.regs.pc = addr;
  }

  /// High byte goes in first, so the pair reads little-endian from SP.
  fn push(&mut self, mem: &mut Memory, v: u16) {
    self.regs.sp = self.regs.sp.wrapping_sub(1);
    mem.wb(self.regs.sp, (v >> 8) as u8);
    self.regs.sp = self.regs.sp.wrapping_sub(1);
    mem.wb(self.regs.sp, v as u8);
  }

  fn pop(&mut self, mem: &mut Memory) -> u16 {
    let lo = mem.rb(self.regs.sp);
    self.regs.sp = self.regs.sp.wrapping_add(1);
    let hi = mem.rb(self.regs.sp);
    self.regs.sp = self.regs.sp.wrapping_add(1);
    u16::from(lo) | (u16::from(hi) << 8)
  }
}
