/// Zero flag.
pub const Z: u8 = 0x80;
/// Subtract flag.
pub const N: u8 = 0x40;
/// Half carry flag.
pub const H: u8 = 0x20;
/// Carry flag.
pub const C: u8 = 0x10;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Registers {
  /// General-purpose registers.
  pub a: u8,
  pub b: u8,
  pub c: u8,
  pub d: u8,
  pub e: u8,
  pub f: u8, // Flag register. The low nibble is always zero.
  pub h: u8,
  pub l: u8,

  /// Program counter.
  pub pc: u16,

  /// Stack pointer.
  pub sp: u16,
}

impl Registers {
  /// Register state right after the boot ROM hands over to the cartridge.
  pub fn new() -> Registers {
    Registers {
      a: 0x01,
      f: 0xb0,
      b: 0x00,
      c: 0x13,
      d: 0x00,
      e: 0xd8,
      h: 0x01,
      l: 0x4d,

      sp: 0xfffe,
      pc: 0x100,
    }
  }

  pub fn af(&self) -> u16 {
    (u16::from(self.a) << 8) | u16::from(self.f)
  }
  pub fn bc(&self) -> u16 {
    (u16::from(self.b) << 8) | u16::from(self.c)
  }
  pub fn de(&self) -> u16 {
    (u16::from(self.d) << 8) | u16::from(self.e)
  }
  pub fn hl(&self) -> u16 {
    (u16::from(self.h) << 8) | u16::from(self.l)
  }

  pub fn set_af(&mut self, value: u16) {
    self.a = (value >> 8) as u8;
    self.f = (value as u8) & 0xf0;
  }
  pub fn set_bc(&mut self, value: u16) {
    self.b = (value >> 8) as u8;
    self.c = value as u8;
  }
  pub fn set_de(&mut self, value: u16) {
    self.d = (value >> 8) as u8;
    self.e = value as u8;
  }
  pub fn set_hl(&mut self, value: u16) {
    self.h = (value >> 8) as u8;
    self.l = value as u8;
  }

  pub fn hl_inc(&mut self) {
    let hl = self.hl().wrapping_add(1);
    self.set_hl(hl);
  }
  pub fn hl_dec(&mut self) {
    let hl = self.hl().wrapping_sub(1);
    self.set_hl(hl);
  }

  pub fn z(&self) -> bool {
    //! Zero flag
    self.f & Z != 0
  }
  pub fn n(&self) -> bool {
    //! Subtract flag
    self.f & N != 0
  }
  pub fn h(&self) -> bool {
    //! Half carry flag
    self.f & H != 0
  }
  pub fn c(&self) -> bool {
    //! Carry flag
    self.f & C != 0
  }
}
