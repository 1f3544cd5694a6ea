//! Unified sensor interface.
//!
//! [`SensorEvent`] and [`SensorMetadata`] are plain structs in the shape other
//! sensor drivers report through, so host code can treat this gyroscope like
//! any other angular-rate source.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use micromath::vector::Vector3d;

use crate::{gyro::GyroRange, Diagnostics, Error, L3g4200d};

/// Name reported in [`SensorMetadata::name`].
pub const SENSOR_NAME: &str = "L3G4200D";
/// Driver version reported in [`SensorMetadata::version`].
pub const SENSOR_VERSION: i32 = 1;

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Read one sample as a sensor event.
  ///
  /// Same behavior as [`get_gyro_data`](Self::get_gyro_data), including auto
  /// range.
  pub async fn get_event(&mut self) -> Result<SensorEvent, Error<SE, PE>> {
    let gyro = self.get_gyro_data().await?;
    Ok(SensorEvent { sensor_id: self.sensor_id, sensor_type: SensorType::Gyroscope, gyro })
  }

  /// Fixed description of this sensor. Does not depend on the active range.
  pub fn get_sensor(&self) -> SensorMetadata {
    SensorMetadata::new(self.sensor_id)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorType {
  Gyroscope = 4,
}

/// One angular-rate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
  pub sensor_id: i32,
  pub sensor_type: SensorType,
  /// Angular velocity in rad/s.
  pub gyro: Vector3d<f32>,
}

// `Vector3d` has no `defmt::Format` impl, so the event is formatted by hand.
#[cfg(feature = "defmt")]
impl defmt::Format for SensorEvent {
  fn format(&self, f: defmt::Formatter) {
    defmt::write!(
      f,
      "SensorEvent {{ sensor_id: {}, sensor_type: {}, gyro: ({}, {}, {}) }}",
      self.sensor_id,
      self.sensor_type,
      self.gyro.x,
      self.gyro.y,
      self.gyro.z
    )
  }
}

/// Static characteristics of the chip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorMetadata {
  pub name: &'static str,
  pub version: i32,
  pub sensor_id: i32,
  pub sensor_type: SensorType,
  /// Largest reading in rad/s, at the widest range.
  pub max_value: f32,
  /// Always zero.
  pub min_value: f32,
  /// Finest step in rad/s, at the narrowest range.
  pub resolution: f32,
  /// Zero, the chip is not rate-limited by the driver.
  pub min_delay: i32,
}

impl SensorMetadata {
  pub fn new(sensor_id: i32) -> Self {
    SensorMetadata {
      name: SENSOR_NAME,
      version: SENSOR_VERSION,
      sensor_id,
      sensor_type: SensorType::Gyroscope,
      max_value: GyroRange::Rads34_91.half_scale(),
      min_value: 0.,
      // Negative readings count too, hence the unsigned span.
      resolution: GyroRange::Rads4_36.full_scale() / f32::from(u16::MAX),
      min_delay: 0,
    }
  }
}
