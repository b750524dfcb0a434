//! The system bus. Every read or write costs one machine cycle, which is
//! when the scheduler advances and peripheral events fire.

pub mod timer;

use std::io::{self, Write};

use crate::apu::APU;
use crate::gpu::{self, GPU};
use crate::sched::{EventKind, Scheduler};
use self::timer::Timer;

pub const WRAM_SIZE: usize = 0x2000;
pub const HRAM_SIZE: usize = 0x7f;

/// Value returned by reads nothing answers.
pub const OPEN_BUS: u8 = 0xff;

pub const SB: u16 = 0xff01;
pub const SC: u16 = 0xff02;
pub const DIV: u16 = 0xff04;
pub const TIMA: u16 = 0xff05;
pub const TMA: u16 = 0xff06;
pub const TAC: u16 = 0xff07;
pub const IF: u16 = 0xff0f;
pub const IE: u16 = 0xffff;

pub struct Memory {
  rom: Vec<u8>,
  wram: Vec<u8>,
  hram: [u8; HRAM_SIZE],

  sb: u8,
  sc: u8,
  serial: Vec<u8>,
  echo_serial: bool,

  pub interrupt_enable: u8,
  pub interrupt_flags: u8,

  pub gpu: GPU,
  pub apu: APU,
  pub timer: Timer,
  pub sched: Scheduler,
}

impl Memory {
  pub fn new(rom: Vec<u8>) -> Memory {
    let mut result = Memory {
      rom,
      wram: vec![0; WRAM_SIZE],
      hram: [0; HRAM_SIZE],

      sb: 0,
      sc: 0,
      serial: Vec::new(),
      echo_serial: false,

      interrupt_enable: 0,
      interrupt_flags: 0,

      gpu: GPU::new(),
      apu: APU::new(),
      timer: Timer::new(),
      sched: Scheduler::new(),
    };
    result.reset();
    result
  }

  /// Put the scheduler and peripherals back in their power-on state.
  /// RAM contents and the cartridge are left alone.
  pub fn reset(&mut self) {
    self.sched.reset();
    self.timer.reset();
    self.gpu.reset();
    self.apu = APU::new();
    self.sb = 0;
    self.sc = 0;
    self.interrupt_enable = 0;
    self.interrupt_flags = 0;
  }

  /// Copy serial output to stdout as it is written.
  pub fn set_serial_echo(&mut self, echo: bool) {
    self.echo_serial = echo;
  }

  /// Every byte written to SB so far.
  pub fn serial_output(&self) -> &[u8] {
    &self.serial
  }

  /// T-cycles elapsed since reset.
  pub fn now(&self) -> u64 {
    self.sched.now()
  }

  /// Read a byte at address `addr`, spending one machine cycle.
  pub fn rb(&mut self, addr: u16) -> u8 {
    self.tick();
    self.peek(addr)
  }

  /// Write `value` at address `addr`, spending one machine cycle.
  pub fn wb(&mut self, addr: u16, value: u8) {
    self.tick();
    self.store(addr, value);
  }

  /// Spend one machine cycle without touching the bus.
  pub fn idle(&mut self) {
    self.tick();
  }

  fn tick(&mut self) {
    let mut due = self.sched.step();
    while let Some(kind) = due {
      self.fire(kind);
      due = self.sched.pop_due();
    }
  }

  fn fire(&mut self, kind: EventKind) {
    match kind {
      EventKind::TimerTick => {
        self.timer.tick(&mut self.sched, &mut self.interrupt_flags)
      }
    }
  }

  /// Read a byte at address `addr` without advancing time.
  pub fn peek(&self, addr: u16) -> u8 {
    let value = match addr >> 12 {
      // ROM
      0x0..=0x7 => self.rom.get(addr as usize).cloned(),
      // VRAM
      0x8..=0x9 => Some(self.gpu.vram[(addr & 0x1fff) as usize]),
      // External RAM belongs to the cartridge mapper.
      0xa..=0xb => None,
      // WRAM and its echo
      0xc..=0xe => Some(self.wram[(addr & 0x1fff) as usize]),
      _ => match (addr >> 8) & 0xf {
        0x0..=0xd => Some(self.wram[(addr & 0x1fff) as usize]),
        0xe => self.gpu.oam.get((addr & 0xff) as usize).cloned(),
        _ => self.read_io(addr),
      },
    };

    value.unwrap_or_else(|| {
      warn!("Unhandled read: ${:04X}", addr);
      OPEN_BUS
    })
  }

  fn read_io(&self, addr: u16) -> Option<u8> {
    match addr {
      IE => Some(self.interrupt_enable),
      0xff80..=0xfffe => Some(self.hram[(addr - 0xff80) as usize]),
      SB => Some(self.sb),
      SC => Some(self.sc),
      DIV => Some(self.timer.div(self.sched.now())),
      TIMA => Some(self.timer.tima),
      TMA => Some(self.timer.tma),
      TAC => Some(self.timer.tac()),
      IF => Some(self.interrupt_flags),
      0xff10..=0xff3f => self.apu.rb(addr),
      0xff40..=0xff4f => self.gpu.rb(addr),
      _ => None,
    }
  }

  fn store(&mut self, addr: u16, value: u8) {
    let handled = match addr >> 12 {
      0x0..=0x7 => {
        debug!("ROM write ignored: ${:04X} <- ${:02X}", addr, value);
        return;
      }
      0x8..=0x9 => {
        self.gpu.vram[(addr & 0x1fff) as usize] = value;
        true
      }
      0xa..=0xb => false,
      0xc..=0xe => {
        self.wram[(addr & 0x1fff) as usize] = value;
        true
      }
      _ => match (addr >> 8) & 0xf {
        0x0..=0xd => {
          self.wram[(addr & 0x1fff) as usize] = value;
          true
        }
        0xe => {
          let idx = (addr & 0xff) as usize;
          if idx < gpu::OAM_SIZE {
            self.gpu.oam[idx] = value;
            true
          } else {
            false
          }
        }
        _ => self.write_io(addr, value),
      },
    };

    if !handled {
      warn!("Unhandled write: ${:04X} <- ${:02X}", addr, value);
    }
  }

  fn write_io(&mut self, addr: u16, value: u8) -> bool {
    match addr {
      IE => self.interrupt_enable = value,
      0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize] = value,
      SB => {
        self.sb = value;
        self.emit_serial(value);
      }
      SC => self.sc = value,
      DIV => self.timer.reset_div(self.sched.now()),
      TIMA => self.timer.tima = value,
      TMA => self.timer.tma = value,
      TAC => self.timer.write_tac(value, &mut self.sched),
      IF => self.interrupt_flags = value,
      0xff10..=0xff3f => return self.apu.wb(addr, value),
      0xff40..=0xff4f => return self.gpu.wb(addr, value),
      _ => return false,
    }
    true
  }

  fn emit_serial(&mut self, value: u8) {
    self.serial.push(value);
    if self.echo_serial {
      let mut out = io::stdout();
      if let Err(e) = out.write_all(&[value]).and_then(|_| out.flush()) {
        warn!("serial echo failed: {}", e);
      }
    }
  }
}
