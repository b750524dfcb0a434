//! Sound register storage. No synthesis happens here; the registers only
//! hold what software last wrote.

pub const NR50: u16 = 0xff24;
pub const NR51: u16 = 0xff25;
pub const NR52: u16 = 0xff26;

#[derive(Debug, Default)]
pub struct APU {
  /// Master volume and VIN panning.
  pub nr50: u8,
  /// Channel panning.
  pub nr51: u8,
  /// Sound on/off.
  pub nr52: u8,
}

impl APU {
  pub fn new() -> APU {
    APU::default()
  }

  /// Returns `None` for registers this block does not hold.
  pub fn rb(&self, addr: u16) -> Option<u8> {
    match addr {
      NR50 => Some(self.nr50),
      NR51 => Some(self.nr51),
      NR52 => Some(self.nr52),
      _ => None,
    }
  }

  /// Returns false for registers this block does not hold.
  pub fn wb(&mut self, addr: u16, value: u8) -> bool {
    match addr {
      NR50 => self.nr50 = value,
      NR51 => self.nr51 = value,
      NR52 => self.nr52 = value,
      _ => return false,
    }
    true
  }
}
