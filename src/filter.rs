//! On-chip filtering.
//!
//! Samples always pass the low-pass stage selected by
//! [`Bandwidth`](crate::gyro::Bandwidth). [`Filtering`] picks which stages
//! feed the output registers, [`HighPassConfig`] tunes the high-pass stage.
//!
//! [`begin`](crate::L3g4200d::begin) turns all optional filtering off.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::{defs::*, Diagnostics, Error, L3g4200d};

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Read the output path selection from CTRL_REG5.
  pub async fn get_filtering(&mut self) -> Result<Filtering, Error<SE, PE>> {
    let r: FilterPath = self.read(Reg::Ctrl5).await?;
    Ok(r.filtering())
  }

  /// Select the output path. Also clears the FIFO and boot bits of CTRL_REG5.
  pub async fn set_filtering(&mut self, filtering: Filtering) -> Result<(), Error<SE, PE>> {
    self.write(Reg::Ctrl5, FilterPath::new(filtering)).await
  }

  pub async fn get_high_pass(&mut self) -> Result<HighPassConfig, Error<SE, PE>> {
    self.read(Reg::Ctrl2).await
  }

  /// Configure the high-pass stage. Only has an effect on the output when
  /// [`Filtering::HighPass`] or [`Filtering::BandPass`] is selected.
  pub async fn set_high_pass(&mut self, cfg: HighPassConfig) -> Result<(), Error<SE, PE>> {
    self.write(Reg::Ctrl2, cfg).await
  }
}

/// Which filter stages feed the output registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filtering {
  /// Output of the data-rate low-pass only.
  #[default]
  None,
  HighPass,
  /// Second low-pass stage.
  LowPass,
  /// High-pass followed by the second low-pass.
  BandPass,
}

impl FilterPath {
  fn new(f: Filtering) -> Self {
    let (out_sel, hp_enable) = match f {
      Filtering::None => (OutSel::Lpf1, false),
      Filtering::HighPass => (OutSel::Hpf, true),
      Filtering::LowPass => (OutSel::Lpf2, false),
      Filtering::BandPass => (OutSel::Lpf2, true),
    };
    FilterPath { out_sel, hp_enable }
  }

  fn filtering(self) -> Filtering {
    match (self.out_sel, self.hp_enable) {
      (OutSel::Lpf1, _) => Filtering::None,
      // With HPen clear the high-pass stage is bypassed.
      (OutSel::Hpf, false) => Filtering::None,
      (OutSel::Hpf, true) => Filtering::HighPass,
      (OutSel::Lpf2, false) => Filtering::LowPass,
      (OutSel::Lpf2, true) => Filtering::BandPass,
    }
  }
}

/// CTRL_REG5 output path bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
struct FilterPath {
  #[bits(2)]
  pub out_sel: OutSel,
  #[skip(2)]
  pub hp_enable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum OutSel {
  Lpf1 = 0b00,
  Hpf = 0b01,
  Lpf2 = 0b10,
}

impl From<OutSel> for u8 {
  fn from(value: OutSel) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for OutSel {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0b00 => Ok(OutSel::Lpf1),
      0b01 => Ok(OutSel::Hpf),
      // 0b11 routes the same path as 0b10.
      0b10 | 0b11 => Ok(OutSel::Lpf2),
      _ => Err(()),
    }
  }
}

/// CTRL_REG2: high-pass cutoff and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct HighPassConfig {
  #[bits(4)]
  pub cutoff: HighPassCutoff,
  #[bits(2)]
  pub mode: HighPassMode,
}

/// High-pass cutoff as a divisor of the output data rate.
///
/// At 200 Hz, `Div200` filters out motion slower than about 1 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HighPassCutoff {
  #[default]
  Div12 = 0x0,
  Div25 = 0x1,
  Div50 = 0x2,
  Div100 = 0x3,
  Div200 = 0x4,
  Div500 = 0x5,
  Div1000 = 0x6,
  Div2000 = 0x7,
  Div5000 = 0x8,
  Div10000 = 0x9,
}

impl From<HighPassCutoff> for u8 {
  fn from(value: HighPassCutoff) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for HighPassCutoff {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x0 => Ok(HighPassCutoff::Div12),
      0x1 => Ok(HighPassCutoff::Div25),
      0x2 => Ok(HighPassCutoff::Div50),
      0x3 => Ok(HighPassCutoff::Div100),
      0x4 => Ok(HighPassCutoff::Div200),
      0x5 => Ok(HighPassCutoff::Div500),
      0x6 => Ok(HighPassCutoff::Div1000),
      0x7 => Ok(HighPassCutoff::Div2000),
      0x8 => Ok(HighPassCutoff::Div5000),
      0x9 => Ok(HighPassCutoff::Div10000),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HighPassMode {
  /// Normal mode, reset by reading the `REFERENCE` register.
  #[default]
  NormalReset = 0b00,
  /// Filter against the value in `REFERENCE`.
  Reference = 0b01,
  Normal = 0b10,
  /// Reset on interrupt events.
  AutoReset = 0b11,
}

impl From<HighPassMode> for u8 {
  fn from(value: HighPassMode) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for HighPassMode {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0b00 => Ok(HighPassMode::NormalReset),
      0b01 => Ok(HighPassMode::Reference),
      0b10 => Ok(HighPassMode::Normal),
      0b11 => Ok(HighPassMode::AutoReset),
      _ => Err(()),
    }
  }
}
