#[macro_use]
extern crate log;

pub mod apu;
pub mod cpu;
pub mod gameboy;
pub mod gpu;
pub mod mem;
pub mod sched;

pub use crate::gameboy::GameBoy;
