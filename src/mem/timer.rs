use crate::sched::{EventKind, Scheduler};

/// Bit raised in IF when TIMA overflows.
pub const TIMER_INTERRUPT: u8 = 1 << 2;

const TAC_ENABLE: u8 = 1 << 2;

/// TIMA period in T-cycles, indexed by the TAC clock select.
const PERIODS: [u64; 4] = [1024, 16, 64, 256];

#[derive(Debug)]
pub struct Timer {
  pub tima: u8,
  pub tma: u8,
  tac: u8,
  /// Scheduler timestamp DIV last counted from.
  div_base: u64,
}

impl Timer {
  pub fn new() -> Timer {
    Timer {
      tima: 0,
      tma: 0,
      tac: 0xf8,
      div_base: 0,
    }
  }

  pub fn reset(&mut self) {
    *self = Timer::new();
  }

  pub fn tac(&self) -> u8 {
    self.tac
  }

  pub fn enabled(&self) -> bool {
    self.tac & TAC_ENABLE != 0
  }

  /// Current TIMA period in T-cycles.
  pub fn period(&self) -> u64 {
    PERIODS[(self.tac & 0x3) as usize]
  }

  pub fn div(&self, now: u64) -> u8 {
    (now.wrapping_sub(self.div_base) >> 8) as u8
  }

  pub fn reset_div(&mut self, now: u64) {
    self.div_base = now;
  }

  /// Handle a write to TAC. Enabling the timer schedules its first tick;
  /// disabling it drops the pending one.
  pub fn write_tac(&mut self, value: u8, sched: &mut Scheduler) {
    let was_enabled = self.enabled();
    self.tac = (self.tac & !0x07) | (value & 0x07);

    if !was_enabled && self.enabled() {
      self.schedule(sched);
    } else if was_enabled && !self.enabled() {
      sched.cancel(EventKind::TimerTick);
    }
  }

  /// Scheduler callback: count once, reloading from TMA on overflow.
  pub fn tick(&mut self, sched: &mut Scheduler, interrupt_flags: &mut u8) {
    if self.tima == 0xff {
      self.tima = self.tma;
      *interrupt_flags |= TIMER_INTERRUPT;
      debug!("timer: overflow, reload {:#04x}", self.tma);
    } else {
      self.tima += 1;
    }

    if self.enabled() {
      self.schedule(sched);
    }
  }

  fn schedule(&self, sched: &mut Scheduler) {
    if let Err(e) = sched.insert(self.period(), EventKind::TimerTick) {
      error!("timer: {}", e);
    }
  }
}
