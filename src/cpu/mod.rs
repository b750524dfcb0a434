mod alu;
mod cpu;
pub mod decode;
pub mod reg;

pub use self::reg::Registers;

pub struct CPU {
  pub regs: Registers,

  /// Interrupt master enable.
  pub ime: bool,
  /// EI was executed; IME turns on after the next instruction.
  ei_pending: bool,

  pub halt: bool,
}
