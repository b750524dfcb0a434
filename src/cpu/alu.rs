use super::decode::{AluOp, ShiftOp};
use super::reg;
use super::CPU;

fn flag(set: bool, mask: u8) -> u8 {
  if set {
    mask
  } else {
    0
  }
}

impl CPU {
  /// 8-bit arithmetic and logic on A.
  pub(super) fn alu(&mut self, op: AluOp, n: u8) {
    match op {
      AluOp::Add => self.regs.a = self.add8(n, false),
      AluOp::Adc => {
        let carry = self.regs.c();
        self.regs.a = self.add8(n, carry);
      }
      AluOp::Sub => self.regs.a = self.sub8(n, false),
      AluOp::Sbc => {
        let carry = self.regs.c();
        self.regs.a = self.sub8(n, carry);
      }
      AluOp::And => {
        self.regs.a &= n;
        self.regs.f = flag(self.regs.a == 0, reg::Z) | reg::H;
      }
      AluOp::Xor => {
        self.regs.a ^= n;
        self.regs.f = flag(self.regs.a == 0, reg::Z);
      }
      AluOp::Or => {
        self.regs.a |= n;
        self.regs.f = flag(self.regs.a == 0, reg::Z);
      }
      // Subtract for the flags only.
      AluOp::Cp => {
        self.sub8(n, false);
      }
    }
  }

  fn add8(&mut self, n: u8, carry: bool) -> u8 {
    let a = self.regs.a;
    let sum = u16::from(a) + u16::from(n) + u16::from(carry);
    let result = sum as u8;
    self.regs.f = flag(result == 0, reg::Z)
      | flag((a ^ n ^ result) & 0x10 != 0, reg::H)
      | flag(sum > 0xff, reg::C);
    result
  }

  fn sub8(&mut self, n: u8, carry: bool) -> u8 {
    let a = self.regs.a;
    let diff = i16::from(a) - i16::from(n) - i16::from(carry);
    let result = diff as u8;
    self.regs.f = flag(result == 0, reg::Z)
      | reg::N
      | flag((a ^ n ^ result) & 0x10 != 0, reg::H)
      | flag(diff < 0, reg::C);
    result
  }

  /// INC r: carry is left alone.
  pub(super) fn inc8(&mut self, v: u8) -> u8 {
    let result = v.wrapping_add(1);
    self.regs.f = (self.regs.f & reg::C)
      | flag(result == 0, reg::Z)
      | flag(v & 0xf == 0xf, reg::H);
    result
  }

  /// DEC r: carry is left alone.
  pub(super) fn dec8(&mut self, v: u8) -> u8 {
    let result = v.wrapping_sub(1);
    self.regs.f = (self.regs.f & reg::C)
      | flag(result == 0, reg::Z)
      | reg::N
      | flag(v & 0xf == 0, reg::H);
    result
  }

  /// ADD HL, rr. Half carry comes out of bit 11, carry out of bit 15.
  pub(super) fn add_hl(&mut self, n: u16) {
    let hl = self.regs.hl();
    let sum = u32::from(hl) + u32::from(n);
    self.regs.f = (self.regs.f & reg::Z)
      | flag((hl & 0xfff) + (n & 0xfff) > 0xfff, reg::H)
      | flag(sum > 0xffff, reg::C);
    self.regs.set_hl(sum as u16);
  }

  /// SP plus a signed offset, as computed by ADD SP, e and LD HL, SP+e.
  /// Flags come from the unsigned add of the low byte.
  pub(super) fn add_sp(&mut self, e: u8) -> u16 {
    let sp = self.regs.sp;
    let offset = i16::from(e as i8) as u16;
    let result = sp.wrapping_add(offset);
    let low = (sp & 0xff) + u16::from(e);
    self.regs.f = flag((sp ^ u16::from(e) ^ low) & 0x10 != 0, reg::H)
      | flag(low & 0x100 != 0, reg::C);
    result
  }

  /// CB rotates and shifts. Z reflects the result.
  pub(super) fn shift(&mut self, op: ShiftOp, v: u8) -> u8 {
    let carry_in = u8::from(self.regs.c());
    let (result, carry) = match op {
      ShiftOp::Rlc => (v.rotate_left(1), v & 0x80 != 0),
      ShiftOp::Rrc => (v.rotate_right(1), v & 0x01 != 0),
      ShiftOp::Rl => ((v << 1) | carry_in, v & 0x80 != 0),
      ShiftOp::Rr => ((v >> 1) | (carry_in << 7), v & 0x01 != 0),
      ShiftOp::Sla => (v << 1, v & 0x80 != 0),
      // Sign extend.
      ShiftOp::Sra => (((v as i8) >> 1) as u8, v & 0x01 != 0),
      ShiftOp::Swap => (v.rotate_left(4), false),
      ShiftOp::Srl => (v >> 1, v & 0x01 != 0),
    };
    self.regs.f = flag(result == 0, reg::Z) | flag(carry, reg::C);
    result
  }

  /// RLCA, RRCA, RLA and RRA: the CB forms on A, but Z is always cleared.
  pub(super) fn rotate_a(&mut self, op: ShiftOp) {
    let a = self.regs.a;
    self.regs.a = self.shift(op, a);
    self.regs.f &= !reg::Z;
  }

  pub(super) fn bit(&mut self, b: u8, v: u8) {
    self.regs.f =
      (self.regs.f & reg::C) | reg::H | flag(v & (1 << b) == 0, reg::Z);
  }

  /// Decimal-adjust A after a BCD add or subtract.
  pub(super) fn daa(&mut self) {
    let mut a = self.regs.a;
    let mut carry = self.regs.c();
    if self.regs.n() {
      if carry {
        a = a.wrapping_sub(0x60);
      }
      if self.regs.h() {
        a = a.wrapping_sub(0x06);
      }
    } else {
      if carry || a > 0x99 {
        a = a.wrapping_add(0x60);
        carry = true;
      }
      if self.regs.h() || a & 0x0f > 0x09 {
        a = a.wrapping_add(0x06);
      }
    }
    self.regs.a = a;
    self.regs.f = (self.regs.f & reg::N)
      | flag(a == 0, reg::Z)
      | flag(carry, reg::C);
  }

  pub(super) fn cpl(&mut self) {
    self.regs.a = !self.regs.a;
    self.regs.f |= reg::N | reg::H;
  }

  pub(super) fn scf(&mut self) {
    self.regs.f = (self.regs.f & reg::Z) | reg::C;
  }

  pub(super) fn ccf(&mut self) {
    self.regs.f = (self.regs.f & reg::Z) | ((self.regs.f & reg::C) ^ reg::C);
  }
}
