#![no_std]
#![doc = include_str!("../README.md")]
//!
//! ## Design Principles
//!
//! - **Type-safe**: Strongly-typed register structs with sensible defaults
//! - **Async-first**: Built on the `embedded-hal-async` SPI bus trait
//! - **Tear-free sampling**: All three axes are read in one chip-select window
//! - **Quiet by default**: Diagnostics go to an injected sink, a no-op unless you supply one
//!
//! ## Module Organization
//!
//! - [`gyro`]: Range, data rate and angular-rate reading
//! - [`filter`]: High-pass and output filter selection
//! - [`io`]: Output pin drive and chip identity
//! - [`sensor`]: Unified sensor event and metadata
//! - [`diag`]: Diagnostic sinks
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! # async fn example<SPI, CS>(spi: SPI, cs: CS) -> Result<(), l3g4200d::Error<SPI::Error, CS::Error>>
//! # where
//! #   SPI: embedded_hal_async::spi::SpiBus,
//! #   CS: embedded_hal::digital::OutputPin,
//! # {
//! use l3g4200d::{Config, L3g4200d};
//!
//! let mut gyro = L3g4200d::new(spi, cs, 2113);
//!
//! // Verify the chip and configure it
//! gyro.begin(Config::default()).await?;
//! gyro.enable_auto_range(true);
//!
//! // Angular velocity in rad/s
//! let event = gyro.get_event().await?;
//! # let _ = event;
//! # Ok(())
//! # }
//! ```

use core::fmt;

use embedded_hal::{
  digital::OutputPin,
  spi::{Mode, MODE_3},
};
use embedded_hal_async::spi::SpiBus;

mod defs;
pub mod diag;
pub mod filter;
pub mod gyro;
pub mod io;
pub(crate) mod rw;
pub mod sensor;

use defs::*;
#[cfg(feature = "defmt")]
pub use diag::DefmtDiagnostics;
pub use diag::{Diagnostics, NoDiagnostics};
pub use gyro::GyroRange;
pub use sensor::{SensorEvent, SensorMetadata, SensorType};

/// SPI mode the chip requires: clock idles high, data sampled on the rising
/// edge, MSB first.
pub const SPI_MODE: Mode = MODE_3;
/// SPI clock must stay below this, per the datasheet.
pub const MAX_FREQUENCY_HZ: u32 = 10_000_000;
pub const DEFAULT_FREQUENCY_HZ: u32 = 5_000_000;

/// Driver error type.
///
/// Wraps the SPI bus and chip-select pin errors and adds the identity check
/// failures reported by [`L3g4200d::begin`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SE, PE> {
  /// SPI communication error
  Spi(SE),
  /// Chip-select pin error
  ChipSelect(PE),
  /// `WHO_AM_I` read as all zeros. Usually a wiring or power problem.
  NoResponse,
  /// `WHO_AM_I` read as all ones. Nothing is driving the data line.
  BusFloating,
  /// `WHO_AM_I` returned something other than `0xD3`. Wrong chip-select or a
  /// different part.
  UnexpectedIdentity(u8),
  /// Requested SPI clock is at or above [`MAX_FREQUENCY_HZ`].
  InvalidFrequency(u32),
  /// A register held a bit pattern that does not decode
  Data,
}

/// Settings applied by [`L3g4200d::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  /// Initial measurement range.
  pub range: GyroRange,
  /// SPI clock the host bus is configured with. Must be below
  /// [`MAX_FREQUENCY_HZ`].
  pub frequency_hz: u32,
}

impl Default for Config {
  fn default() -> Self {
    Config { range: GyroRange::Rads4_36, frequency_hz: DEFAULT_FREQUENCY_HZ }
  }
}

/// L3G4200D device driver instance.
///
/// Owns the SPI bus, the chip-select pin and the diagnostic sink. Pass
/// `&mut bus` to keep using the bus elsewhere once the driver is released.
/// The bus must be configured with [`SPI_MODE`] at a clock below
/// [`MAX_FREQUENCY_HZ`]; the driver only drives chip-select and moves bytes.
///
/// No operation has a timeout and nothing is retried: a stalled bus stalls the
/// caller.
///
/// # Type Parameters
///
/// - `S`: SPI bus (must implement `embedded_hal_async::spi::SpiBus`)
/// - `P`: Chip-select pin (must implement `embedded_hal::digital::OutputPin`)
/// - `L`: Diagnostic sink, [`NoDiagnostics`] by default
pub struct L3g4200d<S, P, L = NoDiagnostics> {
  spi: S,
  cs: P,
  diag: L,
  sensor_id: i32,
  range: GyroRange,
  auto_range: bool,
  debug_logging: bool,
  frequency_hz: u32,
}

impl<S, P> L3g4200d<S, P, NoDiagnostics>
where
  S: SpiBus,
  P: OutputPin,
{
  /// Create a driver that discards diagnostics.
  ///
  /// `sensor_id` is an arbitrary number identifying this sensor in events,
  /// metadata and diagnostics.
  pub fn new(spi: S, cs: P, sensor_id: i32) -> Self {
    Self::with_diagnostics(spi, cs, sensor_id, NoDiagnostics)
  }
}

impl<S, P, L> L3g4200d<S, P, L>
where
  S: SpiBus,
  P: OutputPin,
  L: Diagnostics,
{
  /// Create a driver reporting diagnostics to `diag`.
  ///
  /// Messages are only emitted after
  /// [`enable_debug_logging`](Self::enable_debug_logging).
  pub fn with_diagnostics(spi: S, cs: P, sensor_id: i32, diag: L) -> Self {
    Self {
      spi,
      cs,
      diag,
      sensor_id,
      range: GyroRange::default(),
      auto_range: false,
      debug_logging: false,
      frequency_hz: DEFAULT_FREQUENCY_HZ,
    }
  }

  /// Give back the bus, the chip-select pin and the diagnostic sink.
  pub fn release(self) -> (S, P, L) {
    (self.spi, self.cs, self.diag)
  }
}

impl<S, P, L> L3g4200d<S, P, L> {
  pub fn sensor_id(&self) -> i32 {
    self.sensor_id
  }

  /// SPI clock recorded by the last [`begin`](Self::begin) call.
  pub fn frequency_hz(&self) -> u32 {
    self.frequency_hz
  }

  /// Step up one range whenever a sample comes close to saturating.
  ///
  /// The range never steps back down on its own; call
  /// [`set_range`](Self::set_range) for that.
  pub fn enable_auto_range(&mut self, enabled: bool) {
    self.auto_range = enabled;
  }

  pub fn auto_range_enabled(&self) -> bool {
    self.auto_range
  }

  pub fn enable_debug_logging(&mut self, enabled: bool) {
    self.debug_logging = enabled;
  }

  pub fn diagnostics(&self) -> &L {
    &self.diag
  }

  pub fn diagnostics_mut(&mut self) -> &mut L {
    &mut self.diag
  }
}

impl<S, P, L> L3g4200d<S, P, L>
where
  L: Diagnostics,
{
  pub(crate) fn debug(&mut self, args: fmt::Arguments<'_>) {
    if self.debug_logging {
      self.diag.log(self.sensor_id, args);
    }
  }
}

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Verify the chip and apply the start-up configuration.
  ///
  /// Drives chip-select to idle, reads `WHO_AM_I` and, if it is `0xD3`, writes:
  ///
  /// - CTRL_REG1: 400 Hz, 25 Hz cutoff, powered, all axes on
  /// - CTRL_REG3: push-pull outputs
  /// - CTRL_REG4: `config.range`, block data update, low byte first
  /// - CTRL_REG5: no optional filtering
  ///
  /// The writes are not read back. On an identity failure nothing is written
  /// and the driver state is left as it was.
  pub async fn begin(&mut self, config: Config) -> Result<(), Error<SE, PE>> {
    if config.frequency_hz >= MAX_FREQUENCY_HZ {
      self.debug(format_args!(
        "SPI clock of {} Hz requested, the L3G4200D needs less than {} Hz.\n",
        config.frequency_hz, MAX_FREQUENCY_HZ
      ));
      return Err(Error::InvalidFrequency(config.frequency_hz));
    }

    // Chip-select is active low; keep the chip deselected until we talk to it.
    self.cs.set_high().map_err(Error::ChipSelect)?;

    match self.get_id().await? {
      0x00 => {
        self.debug(format_args!(
          "We tried to read the L3G4200 gyroscope chip ID, but got all logic LOWs (0s) in response.\n"
        ));
        self.debug(format_args!("Check that all your wires are connected properly?\n"));
        return Err(Error::NoResponse);
      }
      0xFF => {
        self.debug(format_args!(
          "We tried to read the L3G4200 gyroscope chip ID, but got all logic HIGHs (1s) in response.\n"
        ));
        self.debug(format_args!("Check that all your wires are connected properly?\n"));
        return Err(Error::BusFloating);
      }
      L3G4200D_CHIP_ID => {}
      id => {
        self.debug(format_args!(
          "We tried to read the L3G4200 gyroscope chip ID expecting {:#04x}, but got {:#04x}\n",
          L3G4200D_CHIP_ID, id
        ));
        self.debug(format_args!(
          "Perhaps you have the wrong chip select connected or you're connected to a different part?\n"
        ));
        return Err(Error::UnexpectedIdentity(id));
      }
    }

    self.frequency_hz = config.frequency_hz;
    self.set_gyro_conf(gyro::GyroConfig::default()).await?;
    self.set_output_drive(io::OutputDrive::PushPull).await?;
    self.set_range(config.range).await?;
    self.set_filtering(filter::Filtering::None).await
  }
}
