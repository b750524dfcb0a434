use anyhow::{bail, Result};

use crate::cpu::CPU;
use crate::mem::Memory;

/// One emulation session: a CPU wired to its own bus.
pub struct GameBoy {
  pub cpu: CPU,
  pub mem: Memory,
}

impl GameBoy {
  pub fn new(rom: Vec<u8>) -> GameBoy {
    GameBoy {
      cpu: CPU::new(),
      mem: Memory::new(rom),
    }
  }

  /// Power cycle. The cartridge stays inserted.
  pub fn reset(&mut self) {
    self.cpu.reset();
    self.mem.reset();
  }

  /// Run one instruction. Returns the T-cycles spent, 0 on an illegal opcode.
  pub fn step(&mut self) -> u32 {
    self.cpu.step(&mut self.mem)
  }

  /// Step until an illegal opcode, or until `limit` instructions have run.
  /// Returns the number of instructions executed.
  pub fn run(&mut self, limit: Option<u64>) -> Result<u64> {
    let mut steps = 0;
    while limit.map_or(true, |limit| steps < limit) {
      if self.step() == 0 {
        let pc = self.cpu.regs.pc;
        bail!(
          "illegal opcode ${:02X} at ${:04X} after {} steps",
          self.mem.peek(pc),
          pc,
          steps
        );
      }
      steps += 1;
    }
    debug!("stopped after {} steps at {} cycles", steps, self.mem.now());
    Ok(steps)
  }
}
