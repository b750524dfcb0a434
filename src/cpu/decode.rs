//! Opcode tables.
//!
//! Each opcode byte maps to an operation descriptor once, at compile time.
//! The interpreter in `cpu.rs` only ever matches on these descriptors, and
//! the instruction timings live here alongside them.

use std::fmt;

/// 8-bit operand, in encoding order. `MemHl` is the byte at (HL).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum R8 {
  B,
  C,
  D,
  E,
  H,
  L,
  MemHl,
  A,
}

/// 16-bit operand for loads and arithmetic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum R16 {
  BC,
  DE,
  HL,
  SP,
}

/// 16-bit operand for push and pop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum R16Stk {
  BC,
  DE,
  HL,
  AF,
}

/// Indirect address for `ld (rr), a` and `ld a, (rr)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum R16Mem {
  BC,
  DE,
  /// (HL), then increment HL.
  HLI,
  /// (HL), then decrement HL.
  HLD,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cond {
  NZ,
  Z,
  NC,
  C,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
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

/// Rotates and shifts from the CB table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShiftOp {
  Rlc,
  Rrc,
  Rl,
  Rr,
  Sla,
  Sra,
  Swap,
  Srl,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Op {
  Nop,
  Stop,
  Halt,
  Di,
  Ei,

  LdR16Imm(R16),
  LdMemA(R16Mem),
  LdAMem(R16Mem),
  LdImmSp,
  IncR16(R16),
  DecR16(R16),
  AddHl(R16),

  IncR8(R8),
  DecR8(R8),
  LdR8Imm(R8),
  LdR8R8(R8, R8),

  Rlca,
  Rrca,
  Rla,
  Rra,
  Daa,
  Cpl,
  Scf,
  Ccf,

  Alu(AluOp, R8),
  AluImm(AluOp),

  Jr,
  JrCond(Cond),
  Jp,
  JpCond(Cond),
  JpHl,
  Call,
  CallCond(Cond),
  Ret,
  RetCond(Cond),
  Reti,
  Rst(u8),

  Push(R16Stk),
  Pop(R16Stk),

  LdhImmA,
  LdhAImm,
  LdhCA,
  LdhAC,
  LdImm16A,
  LdAImm16,

  AddSpImm,
  LdHlSpImm,
  LdSpHl,

  Prefix,
  Illegal,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CbOp {
  Shift(ShiftOp, R8),
  Bit(u8, R8),
  Res(u8, R8),
  Set(u8, R8),
}

pub static MAIN: [Op; 256] = build_main();
pub static CB: [CbOp; 256] = build_cb();

const R8S: [R8; 8] =
  [R8::B, R8::C, R8::D, R8::E, R8::H, R8::L, R8::MemHl, R8::A];
const R16S: [R16; 4] = [R16::BC, R16::DE, R16::HL, R16::SP];
const R16STKS: [R16Stk; 4] = [R16Stk::BC, R16Stk::DE, R16Stk::HL, R16Stk::AF];
const R16MEMS: [R16Mem; 4] = [R16Mem::BC, R16Mem::DE, R16Mem::HLI, R16Mem::HLD];
const CONDS: [Cond; 4] = [Cond::NZ, Cond::Z, Cond::NC, Cond::C];
const ALUS: [AluOp; 8] = [
  AluOp::Add,
  AluOp::Adc,
  AluOp::Sub,
  AluOp::Sbc,
  AluOp::And,
  AluOp::Xor,
  AluOp::Or,
  AluOp::Cp,
];
const SHIFTS: [ShiftOp; 8] = [
  ShiftOp::Rlc,
  ShiftOp::Rrc,
  ShiftOp::Rl,
  ShiftOp::Rr,
  ShiftOp::Sla,
  ShiftOp::Sra,
  ShiftOp::Swap,
  ShiftOp::Srl,
];

const fn build_main() -> [Op; 256] {
  let mut table = [Op::Illegal; 256];
  let mut i = 0;
  while i < 256 {
    table[i] = decode(i as u8);
    i += 1;
  }
  table
}

const fn build_cb() -> [CbOp; 256] {
  let mut table = [CbOp::Bit(0, R8::B); 256];
  let mut i = 0;
  while i < 256 {
    table[i] = decode_cb(i as u8);
    i += 1;
  }
  table
}

/// Split the opcode into its `xx yyy zzz` fields and pick the operation.
const fn decode(op: u8) -> Op {
  let x = op >> 6;
  let y = (op >> 3) & 7;
  let z = op & 7;
  let p = (y >> 1) as usize;
  let q = y & 1;
  let r8y = R8S[y as usize];
  let r8z = R8S[z as usize];

  match x {
    0 => match z {
      0 => match y {
        0 => Op::Nop,
        1 => Op::LdImmSp,
        2 => Op::Stop,
        3 => Op::Jr,
        _ => Op::JrCond(CONDS[(y - 4) as usize]),
      },
      1 if q == 0 => Op::LdR16Imm(R16S[p]),
      1 => Op::AddHl(R16S[p]),
      2 if q == 0 => Op::LdMemA(R16MEMS[p]),
      2 => Op::LdAMem(R16MEMS[p]),
      3 if q == 0 => Op::IncR16(R16S[p]),
      3 => Op::DecR16(R16S[p]),
      4 => Op::IncR8(r8y),
      5 => Op::DecR8(r8y),
      6 => Op::LdR8Imm(r8y),
      _ => match y {
        0 => Op::Rlca,
        1 => Op::Rrca,
        2 => Op::Rla,
        3 => Op::Rra,
        4 => Op::Daa,
        5 => Op::Cpl,
        6 => Op::Scf,
        _ => Op::Ccf,
      },
    },
    1 if op == 0x76 => Op::Halt,
    1 => Op::LdR8R8(r8y, r8z),
    2 => Op::Alu(ALUS[y as usize], r8z),
    _ => match z {
      0 => match y {
        0..=3 => Op::RetCond(CONDS[y as usize]),
        4 => Op::LdhImmA,
        5 => Op::AddSpImm,
        6 => Op::LdhAImm,
        _ => Op::LdHlSpImm,
      },
      1 if q == 0 => Op::Pop(R16STKS[p]),
      1 => match p {
        0 => Op::Ret,
        1 => Op::Reti,
        2 => Op::JpHl,
        _ => Op::LdSpHl,
      },
      2 => match y {
        0..=3 => Op::JpCond(CONDS[y as usize]),
        4 => Op::LdhCA,
        5 => Op::LdImm16A,
        6 => Op::LdhAC,
        _ => Op::LdAImm16,
      },
      3 => match y {
        0 => Op::Jp,
        1 => Op::Prefix,
        6 => Op::Di,
        7 => Op::Ei,
        _ => Op::Illegal,
      },
      4 if y < 4 => Op::CallCond(CONDS[y as usize]),
      4 => Op::Illegal,
      5 if q == 0 => Op::Push(R16STKS[p]),
      5 if p == 0 => Op::Call,
      5 => Op::Illegal,
      6 => Op::AluImm(ALUS[y as usize]),
      _ => Op::Rst(y * 8),
    },
  }
}

const fn decode_cb(op: u8) -> CbOp {
  let y = (op >> 3) & 7;
  let r = R8S[(op & 7) as usize];
  match op >> 6 {
    0 => CbOp::Shift(SHIFTS[y as usize], r),
    1 => CbOp::Bit(y, r),
    2 => CbOp::Res(y, r),
    _ => CbOp::Set(y, r),
  }
}

impl Op {
  /// Machine cycles taken, given whether a conditional branch was taken.
  /// Zero for illegal opcodes. The CB prefix byte itself is accounted for in
  /// `CbOp::cycles`.
  pub fn cycles(self, taken: bool) -> u32 {
    let mem = |r: R8| r == R8::MemHl;
    match self {
      Op::Nop | Op::Stop | Op::Halt | Op::Di | Op::Ei => 1,
      Op::Rlca | Op::Rrca | Op::Rla | Op::Rra => 1,
      Op::Daa | Op::Cpl | Op::Scf | Op::Ccf | Op::JpHl => 1,

      Op::LdR16Imm(_) => 3,
      Op::LdMemA(_) | Op::LdAMem(_) => 2,
      Op::LdImmSp => 5,
      Op::IncR16(_) | Op::DecR16(_) | Op::AddHl(_) | Op::LdSpHl => 2,

      Op::IncR8(r) | Op::DecR8(r) => if mem(r) { 3 } else { 1 },
      Op::LdR8Imm(r) => if mem(r) { 3 } else { 2 },
      Op::LdR8R8(dst, src) => if mem(dst) || mem(src) { 2 } else { 1 },
      Op::Alu(_, r) => if mem(r) { 2 } else { 1 },
      Op::AluImm(_) => 2,

      Op::Jr => 3,
      Op::JrCond(_) => if taken { 3 } else { 2 },
      Op::Jp => 4,
      Op::JpCond(_) => if taken { 4 } else { 3 },
      Op::Call => 6,
      Op::CallCond(_) => if taken { 6 } else { 3 },
      Op::Ret | Op::Reti => 4,
      Op::RetCond(_) => if taken { 5 } else { 2 },
      Op::Rst(_) => 4,

      Op::Push(_) => 4,
      Op::Pop(_) => 3,

      Op::LdhImmA | Op::LdhAImm => 3,
      Op::LdhCA | Op::LdhAC => 2,
      Op::LdImm16A | Op::LdAImm16 => 4,

      Op::AddSpImm => 4,
      Op::LdHlSpImm => 3,

      Op::Prefix => 0,
      Op::Illegal => 0,
    }
  }
}

impl CbOp {
  /// Machine cycles taken, including the prefix byte.
  pub fn cycles(self) -> u32 {
    match self {
      CbOp::Bit(_, R8::MemHl) => 3,
      CbOp::Shift(_, R8::MemHl)
      | CbOp::Res(_, R8::MemHl)
      | CbOp::Set(_, R8::MemHl) => 4,
      _ => 2,
    }
  }
}

impl fmt::Display for R8 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R8::B => "b",
      R8::C => "c",
      R8::D => "d",
      R8::E => "e",
      R8::H => "h",
      R8::L => "l",
      R8::MemHl => "(hl)",
      R8::A => "a",
    };
    f.write_str(name)
  }
}

impl fmt::Display for R16 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R16::BC => "bc",
      R16::DE => "de",
      R16::HL => "hl",
      R16::SP => "sp",
    };
    f.write_str(name)
  }
}

impl fmt::Display for R16Stk {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R16Stk::BC => "bc",
      R16Stk::DE => "de",
      R16Stk::HL => "hl",
      R16Stk::AF => "af",
    };
    f.write_str(name)
  }
}

impl fmt::Display for R16Mem {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R16Mem::BC => "(bc)",
      R16Mem::DE => "(de)",
      R16Mem::HLI => "(hl+)",
      R16Mem::HLD => "(hl-)",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Cond {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Cond::NZ => "nz",
      Cond::Z => "z",
      Cond::NC => "nc",
      Cond::C => "c",
    };
    f.write_str(name)
  }
}

impl fmt::Display for AluOp {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      AluOp::Add => "add a,",
      AluOp::Adc => "adc a,",
      AluOp::Sub => "sub",
      AluOp::Sbc => "sbc a,",
      AluOp::And => "and",
      AluOp::Xor => "xor",
      AluOp::Or => "or",
      AluOp::Cp => "cp",
    };
    f.write_str(name)
  }
}

impl fmt::Display for ShiftOp {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      ShiftOp::Rlc => "rlc",
      ShiftOp::Rrc => "rrc",
      ShiftOp::Rl => "rl",
      ShiftOp::Rr => "rr",
      ShiftOp::Sla => "sla",
      ShiftOp::Sra => "sra",
      ShiftOp::Swap => "swap",
      ShiftOp::Srl => "srl",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Op {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Op::Nop => write!(f, "nop"),
      Op::Stop => write!(f, "stop"),
      Op::Halt => write!(f, "halt"),
      Op::Di => write!(f, "di"),
      Op::Ei => write!(f, "ei"),
      Op::LdR16Imm(r) => write!(f, "ld {}, n16", r),
      Op::LdMemA(r) => write!(f, "ld {}, a", r),
      Op::LdAMem(r) => write!(f, "ld a, {}", r),
      Op::LdImmSp => write!(f, "ld (n16), sp"),
      Op::IncR16(r) => write!(f, "inc {}", r),
      Op::DecR16(r) => write!(f, "dec {}", r),
      Op::AddHl(r) => write!(f, "add hl, {}", r),
      Op::IncR8(r) => write!(f, "inc {}", r),
      Op::DecR8(r) => write!(f, "dec {}", r),
      Op::LdR8Imm(r) => write!(f, "ld {}, n8", r),
      Op::LdR8R8(dst, src) => write!(f, "ld {}, {}", dst, src),
      Op::Rlca => write!(f, "rlca"),
      Op::Rrca => write!(f, "rrca"),
      Op::Rla => write!(f, "rla"),
      Op::Rra => write!(f, "rra"),
      Op::Daa => write!(f, "daa"),
      Op::Cpl => write!(f, "cpl"),
      Op::Scf => write!(f, "scf"),
      Op::Ccf => write!(f, "ccf"),
      Op::Alu(op, r) => write!(f, "{} {}", op, r),
      Op::AluImm(op) => write!(f, "{} n8", op),
      Op::Jr => write!(f, "jr e8"),
      Op::JrCond(c) => write!(f, "jr {}, e8", c),
      Op::Jp => write!(f, "jp n16"),
      Op::JpCond(c) => write!(f, "jp {}, n16", c),
      Op::JpHl => write!(f, "jp hl"),
      Op::Call => write!(f, "call n16"),
      Op::CallCond(c) => write!(f, "call {}, n16", c),
      Op::Ret => write!(f, "ret"),
      Op::RetCond(c) => write!(f, "ret {}", c),
      Op::Reti => write!(f, "reti"),
      Op::Rst(v) => write!(f, "rst ${:02x}", v),
      Op::Push(r) => write!(f, "push {}", r),
      Op::Pop(r) => write!(f, "pop {}", r),
      Op::LdhImmA => write!(f, "ldh (n8), a"),
      Op::LdhAImm => write!(f, "ldh a, (n8)"),
      Op::LdhCA => write!(f, "ldh (c), a"),
      Op::LdhAC => write!(f, "ldh a, (c)"),
      Op::LdImm16A => write!(f, "ld (n16), a"),
      Op::LdAImm16 => write!(f, "ld a, (n16)"),
      Op::AddSpImm => write!(f, "add sp, e8"),
      Op::LdHlSpImm => write!(f, "ld hl, sp+e8"),
      Op::LdSpHl => write!(f, "ld sp, hl"),
      Op::Prefix => write!(f, "prefix cb"),
      Op::Illegal => write!(f, "illegal"),
    }
  }
}

impl fmt::Display for CbOp {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      CbOp::Shift(op, r) => write!(f, "{} {}", op, r),
      CbOp::Bit(b, r) => write!(f, "bit {}, {}", b, r),
      CbOp::Res(b, r) => write!(f, "res {}, {}", b, r),
      CbOp::Set(b, r) => write!(f, "set {}, {}", b, r),
    }
  }
}
