//! Display register and video memory storage. Rendering lives outside this
//! crate; it reads these fields and drives `ly`.

pub const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xa0;

pub const LCDC: u16 = 0xff40;
pub const SCY: u16 = 0xff42;
pub const SCX: u16 = 0xff43;
pub const LY: u16 = 0xff44;
pub const BGP: u16 = 0xff47;

#[derive(Debug)]
pub struct GPU {
  pub vram: Vec<u8>,
  pub oam: [u8; OAM_SIZE],

  pub lcdc: u8,
  pub scy: u8,
  pub scx: u8,
  /// Current scanline. Read-only from the bus.
  pub ly: u8,
  pub bgp: u8,
}

impl GPU {
  pub fn new() -> GPU {
    GPU {
      vram: vec![0; VRAM_SIZE],
      oam: [0; OAM_SIZE],
      lcdc: 0,
      scy: 0,
      scx: 0,
      ly: 0,
      bgp: 0,
    }
  }

  /// Reset the registers. Video memory keeps its contents.
  pub fn reset(&mut self) {
    self.lcdc = 0;
    self.scy = 0;
    self.scx = 0;
    self.ly = 0;
    self.bgp = 0;
  }

  pub fn rb(&self, addr: u16) -> Option<u8> {
    match addr {
      LCDC => Some(self.lcdc),
      SCY => Some(self.scy),
      SCX => Some(self.scx),
      LY => Some(self.ly),
      BGP => Some(self.bgp),
      _ => None,
    }
  }

  pub fn wb(&mut self, addr: u16, value: u8) -> bool {
    match addr {
      LCDC => self.lcdc = value,
      SCY => self.scy = value,
      SCX => self.scx = value,
      BGP => self.bgp = value,
      _ => return false,
    }
    true
  }
}
