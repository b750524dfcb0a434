//! Min-heap of timed hardware events, advanced one machine cycle per bus
//! access.

use anyhow::{ensure, Result};

/// Maximum number of events that may be pending at once.
pub const MAX_EVENTS: usize = 16;

/// T-cycles per scheduler step (one machine cycle).
pub const CYCLES_PER_STEP: u64 = 4;

/// Identifies the peripheral an event belongs to and what to run when it
/// expires.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventKind {
  TimerTick,
}

#[derive(Debug, Copy, Clone)]
struct Event {
  expiry: u64,
  seq: u64,
  kind: EventKind,
}

impl Event {
  const EMPTY: Event = Event {
    expiry: 0,
    seq: 0,
    kind: EventKind::TimerTick,
  };

  fn before(&self, other: &Event) -> bool {
    (self.expiry, self.seq) < (other.expiry, other.seq)
  }
}

#[derive(Debug)]
pub struct Scheduler {
  /// T-cycles elapsed since reset.
  now: u64,
  /// Insertion counter, used to fire simultaneous events in FIFO order.
  seq: u64,
  len: usize,
  events: [Event; MAX_EVENTS],
}

impl Scheduler {
  pub fn new() -> Scheduler {
    Scheduler {
      now: 0,
      seq: 0,
      len: 0,
      events: [Event::EMPTY; MAX_EVENTS],
    }
  }

  /// Drop all pending events and rewind the clock to zero.
  pub fn reset(&mut self) {
    self.now = 0;
    self.seq = 0;
    self.len = 0;
    self.events = [Event::EMPTY; MAX_EVENTS];
  }

  pub fn now(&self) -> u64 {
    self.now
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Schedule `kind` to fire `delta` T-cycles from now.
  ///
  /// Events only fire when the clock lands on their expiry exactly, so
  /// `delta` must be a non-zero multiple of the step quantum.
  pub fn insert(&mut self, delta: u64, kind: EventKind) -> Result<()> {
    ensure!(
      self.len < MAX_EVENTS,
      "scheduler full: {} events pending, cannot add {:?}",
      self.len,
      kind
    );
    ensure!(
      delta != 0 && delta % CYCLES_PER_STEP == 0,
      "event {:?} delta {} is not a positive multiple of {}",
      kind,
      delta,
      CYCLES_PER_STEP
    );

    let event = Event {
      expiry: self.now + delta,
      seq: self.seq,
      kind,
    };
    self.seq += 1;
    self.push(event);
    debug!("sched: {:?} due at {}", kind, event.expiry);
    Ok(())
  }

  /// Remove every pending event of `kind`. Returns how many were dropped.
  pub fn cancel(&mut self, kind: EventKind) -> usize {
    let pending = self.len;
    let old = self.events;
    self.len = 0;
    for event in old[..pending].iter().filter(|e| e.kind != kind) {
      self.push(*event);
    }
    let dropped = pending - self.len;
    if dropped > 0 {
      debug!("sched: cancelled {} {:?} event(s)", dropped, kind);
    }
    dropped
  }

  /// Advance the clock by one machine cycle.
  /// Returns the event due at the new timestamp, if any.
  pub fn step(&mut self) -> Option<EventKind> {
    self.now += CYCLES_PER_STEP;
    self.pop_due()
  }

  /// Pop the next event due at the current timestamp without advancing.
  pub fn pop_due(&mut self) -> Option<EventKind> {
    if self.len == 0 || self.events[0].expiry != self.now {
      return None;
    }
    let event = self.events[0];
    self.len -= 1;
    self.events[0] = self.events[self.len];
    self.events[self.len] = Event::EMPTY;
    self.sift_down(0);
    Some(event.kind)
  }

  fn push(&mut self, event: Event) {
    self.events[self.len] = event;
    self.len += 1;
    self.sift_up(self.len - 1);
  }

  fn sift_up(&mut self, mut idx: usize) {
    while idx > 0 {
      let parent = (idx - 1) / 2;
      if !self.events[idx].before(&self.events[parent]) {
        break;
      }
      self.events.swap(idx, parent);
      idx = parent;
    }
  }

  fn sift_down(&mut self, mut idx: usize) {
    loop {
      let left = 2 * idx + 1;
      let right = left + 1;
      let mut smallest = idx;
      if left < self.len && self.events[left].before(&self.events[smallest]) {
        smallest = left;
      }
      if right < self.len && self.events[right].before(&self.events[smallest])
      {
        smallest = right;
      }
      if smallest == idx {
        break;
      }
      self.events.swap(idx, smallest);
      idx = smallest;
    }
  }
}
