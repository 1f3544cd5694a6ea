//! Gyroscope configuration and data reading.
//!
//! This module covers the measurement range state machine, the output data
//! rate / power register and angular-rate sampling.
//!
//! # Examples
//!
//! ```rust,ignore
//! # async fn example(
//! #   mut gyro: l3g4200d::L3g4200d<impl embedded_hal_async::spi::SpiBus, impl embedded_hal::digital::OutputPin>,
//! # ) {
//! use l3g4200d::gyro::{GyroConfig, GyroRange, OutputDataRate};
//!
//! // Trade resolution for a wider range
//! gyro.set_range(GyroRange::Rads8_73).await.unwrap();
//!
//! // Or change the output data rate
//! let config = GyroConfig { odr: OutputDataRate::Hz800, ..Default::default() };
//! gyro.set_gyro_conf(config).await.unwrap();
//!
//! // Read angular velocity in radians per second
//! let rate = gyro.get_gyro_data().await.unwrap();
//! # let _ = rate;
//! # }
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use micromath::vector::Vector3d;

use super::{defs::*, Diagnostics, Error, L3g4200d};

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Read CTRL_REG1 (data rate, bandwidth, power and axis enables).
  pub async fn get_gyro_conf(&mut self) -> Result<GyroConfig, Error<SE, PE>> {
    self.read(Reg::Ctrl1).await
  }

  /// Write CTRL_REG1.
  pub async fn set_gyro_conf(&mut self, cfg: GyroConfig) -> Result<(), Error<SE, PE>> {
    self.write(Reg::Ctrl1, cfg).await
  }

  /// Put the chip in power-down mode, keeping the rest of CTRL_REG1.
  ///
  /// Write a config with `power: true` to wake it up again.
  pub async fn power_down(&mut self) -> Result<(), Error<SE, PE>> {
    let mut cfg = self.get_gyro_conf().await?;
    cfg.power = false;
    self.set_gyro_conf(cfg).await
  }

  /// Read CTRL_REG4 back from the chip.
  pub async fn get_data_conf(&mut self) -> Result<DataConfig, Error<SE, PE>> {
    self.read(Reg::Ctrl4).await
  }

  /// Select a measurement range.
  ///
  /// CTRL_REG4 is rewritten with block data update on and the low byte at the
  /// lower address, so samples never tear between their two bytes.
  pub async fn set_range(&mut self, range: GyroRange) -> Result<(), Error<SE, PE>> {
    self.write(Reg::Ctrl4, DataConfig::new(range)).await?;
    self.range = range;
    Ok(())
  }

  /// The range currently in use by the driver.
  pub fn range(&self) -> GyroRange {
    self.range
  }

  /// Half of the current full scale, in rad/s.
  pub fn range_in_radians(&self) -> f32 {
    self.range.half_scale()
  }

  /// Read X, Y and Z in one burst.
  ///
  /// All six output registers are read inside a single chip-select window
  /// using auto-increment, so the three axes belong to the same sample.
  pub async fn get_raw_gyro_data(&mut self) -> Result<Vector3d<i16>, Error<SE, PE>> {
    let mut b = [0u8; 6];
    self.read_bytes(Reg::OutXL, &mut b).await?;
    Ok(Vector3d {
      x: i16::from_le_bytes([b[0], b[1]]),
      y: i16::from_le_bytes([b[2], b[3]]),
      z: i16::from_le_bytes([b[4], b[5]]),
    })
  }

  /// Read a single axis with two separate register reads.
  ///
  /// The axes are not sampled together; use
  /// [`get_raw_gyro_data`](Self::get_raw_gyro_data) when they need to be.
  pub async fn get_raw_axis(&mut self, axis: Axis) -> Result<i16, Error<SE, PE>> {
    let (lo, hi) = match axis {
      Axis::X => (Reg::OutXL, Reg::OutXH),
      Axis::Y => (Reg::OutYL, Reg::OutYH),
      Axis::Z => (Reg::OutZL, Reg::OutZH),
    };
    let lo = self.read_u8(lo).await?;
    let hi = self.read_u8(hi).await?;
    Ok(i16::from_le_bytes([lo, hi]))
  }

  /// Read angular velocity in rad/s.
  ///
  /// With auto range enabled, a sample close to saturation moves the chip one
  /// range up and the sample is read again, once. The conversion uses the range
  /// in effect after that step. The range is never lowered automatically.
  pub async fn get_gyro_data(&mut self) -> Result<Vector3d<f32>, Error<SE, PE>> {
    let mut raw = self.get_raw_gyro_data().await?;

    if self.auto_range && is_saturated(&raw) {
      if let Some(next) = self.range.next() {
        self.set_range(next).await?;
        raw = self.get_raw_gyro_data().await?;
      }
    }

    self.debug(format_args!("Raw X, Y, Z samples: {}, {}, {}\n", raw.x, raw.y, raw.z));
    Ok(self.range.to_radians(raw))
  }
}

/// True when any axis is within [`SATURATION_MARGIN`] counts of full scale.
pub(crate) fn is_saturated(v: &Vector3d<i16>) -> bool {
  let limit = (i16::MAX - SATURATION_MARGIN) as u16;
  [v.x, v.y, v.z].iter().any(|c| c.unsigned_abs() >= limit)
}

/// Gyroscope measurement ranges.
///
/// Each variant carries its CTRL_REG4 `FS` code. A wider range lowers the
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
  /// ±4.36 rad/s (250 °/s)
  #[default]
  Rads4_36 = 0b00,
  /// ±8.73 rad/s (500 °/s)
  Rads8_73 = 0b01,
  /// ±34.91 rad/s (2000 °/s)
  Rads34_91 = 0b10,
}

impl GyroRange {
  /// Full scale in rad/s, spanning both directions.
  pub fn full_scale(self) -> f32 {
    match self {
      GyroRange::Rads4_36 => 4.36,
      GyroRange::Rads8_73 => 8.73,
      GyroRange::Rads34_91 => 34.91,
    }
  }

  /// Largest magnitude in one direction, in rad/s.
  pub fn half_scale(self) -> f32 {
    self.full_scale() / 2.
  }

  /// Nominal range in degrees per second, as printed in the datasheet.
  pub fn dps(self) -> u16 {
    match self {
      GyroRange::Rads4_36 => 250,
      GyroRange::Rads8_73 => 500,
      GyroRange::Rads34_91 => 2000,
    }
  }

  /// The next wider range, `None` at the top.
  pub fn next(self) -> Option<Self> {
    match self {
      GyroRange::Rads4_36 => Some(GyroRange::Rads8_73),
      GyroRange::Rads8_73 => Some(GyroRange::Rads34_91),
      GyroRange::Rads34_91 => None,
    }
  }

  /// Convert a raw two's-complement reading to rad/s.
  pub fn sample_to_radians(self, raw: i16) -> f32 {
    f32::from(raw) * self.half_scale() / f32::from(i16::MAX)
  }

  pub fn to_radians(self, raw: Vector3d<i16>) -> Vector3d<f32> {
    Vector3d { x: self.sample_to_radians(raw.x), y: self.sample_to_radians(raw.y), z: self.sample_to_radians(raw.z) }
  }
}

impl From<GyroRange> for u8 {
  fn from(value: GyroRange) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for GyroRange {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0b00 => Ok(GyroRange::Rads4_36),
      0b01 => Ok(GyroRange::Rads8_73),
      // Both codes select 2000 °/s on this chip.
      0b10 | 0b11 => Ok(GyroRange::Rads34_91),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
  X,
  Y,
  Z,
}

/// CTRL_REG1: output data rate, bandwidth, power and axis enables.
///
/// The default is what [`begin`](crate::L3g4200d::begin) writes: 400 Hz with
/// a 25 Hz cutoff, powered, all axes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct GyroConfig {
  pub x: bool,
  pub y: bool,
  pub z: bool,
  /// Normal mode when set, power-down when clear. Powered with every axis
  /// disabled is sleep mode.
  pub power: bool,
  /// Low-pass cutoff selector, meaning depends on `odr`.
  #[bits(2)]
  pub bw: Bandwidth,
  #[bits(2)]
  pub odr: OutputDataRate,
}

impl Default for GyroConfig {
  fn default() -> Self {
    GyroConfig { x: true, y: true, z: true, power: true, bw: Bandwidth::Medium, odr: OutputDataRate::Hz400 }
  }
}

/// Output data rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
  Hz100 = 0b00,
  Hz200 = 0b01,
  Hz400 = 0b10,
  Hz800 = 0b11,
}

impl From<OutputDataRate> for u8 {
  fn from(odr: OutputDataRate) -> Self {
    odr as u8
  }
}

impl TryFrom<u8> for OutputDataRate {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0b00 => Ok(OutputDataRate::Hz100),
      0b01 => Ok(OutputDataRate::Hz200),
      0b10 => Ok(OutputDataRate::Hz400),
      0b11 => Ok(OutputDataRate::Hz800),
      _ => Err(()),
    }
  }
}

/// Low-pass cutoff selector.
///
/// | ODR    | Low     | Medium | High  | Maximum |
/// |--------|---------|--------|-------|---------|
/// | 100 Hz | 12.5 Hz | 25 Hz  | 25 Hz | 25 Hz   |
/// | 200 Hz | 12.5 Hz | 25 Hz  | 50 Hz | 70 Hz   |
/// | 400 Hz | 20 Hz   | 25 Hz  | 50 Hz | 110 Hz  |
/// | 800 Hz | 30 Hz   | 35 Hz  | 50 Hz | 110 Hz  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
  Low = 0b00,
  Medium = 0b01,
  High = 0b10,
  Maximum = 0b11,
}

impl From<Bandwidth> for u8 {
  fn from(value: Bandwidth) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for Bandwidth {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0b00 => Ok(Bandwidth::Low),
      0b01 => Ok(Bandwidth::Medium),
      0b10 => Ok(Bandwidth::High),
      0b11 => Ok(Bandwidth::Maximum),
      _ => Err(()),
    }
  }
}

/// CTRL_REG4: range and output register layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct DataConfig {
  #[skip(4)]
  #[bits(2)]
  pub range: GyroRange,
  /// High byte at the lower address when set.
  pub big_endian: bool,
  /// Hold the output registers until both bytes of a sample were read.
  pub block_data_update: bool,
}

impl DataConfig {
  /// Layout used by this driver: block data update, low byte first.
  pub fn new(range: GyroRange) -> Self {
    DataConfig { range, big_endian: false, block_data_update: true }
  }
}
