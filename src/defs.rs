#![allow(dead_code)]

#[repr(u8)]
#[derive(Clone, Copy)]
pub(crate) enum Reg {
  WhoAmI = 0x0F,
  Ctrl1 = 0x20,
  Ctrl2 = 0x21,
  Ctrl3 = 0x22,
  Ctrl4 = 0x23,
  Ctrl5 = 0x24,
  Reference = 0x25,
  OutTemp = 0x26,
  Status = 0x27,
  OutXL = 0x28,
  OutXH = 0x29,
  OutYL = 0x2A,
  OutYH = 0x2B,
  OutZL = 0x2C,
  OutZH = 0x2D,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

// Constants used across the crate
pub(crate) const L3G4200D_CHIP_ID: u8 = 0xD3;

// SPI address byte: bit 7 = read, bit 6 = auto-increment, bits 5..0 = register.
pub(crate) const SPI_READ: u8 = 0x80;
pub(crate) const SPI_AUTO_INCREMENT: u8 = 0x40;
pub(crate) const SPI_ADDR_MASK: u8 = 0x3F;

// Counts below i16::MAX at which a sample is treated as saturated.
pub(crate) const SATURATION_MARGIN: i16 = 10;
