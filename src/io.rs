use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::{defs::*, Diagnostics, Error, L3g4200d};

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Get/set the electrical mode of the interrupt and data-ready pins (CTRL_REG3).
  ///
  /// Writing replaces the whole register, so any interrupt routing bits are
  /// cleared.
  pub async fn get_output_drive(&mut self) -> Result<OutputDrive, Error<SE, PE>> {
    let r: PinConfig = self.read(Reg::Ctrl3).await?;
    Ok(r.drive)
  }

  pub async fn set_output_drive(&mut self, drive: OutputDrive) -> Result<(), Error<SE, PE>> {
    self.write(Reg::Ctrl3, PinConfig { drive }).await
  }

  /// Read `WHO_AM_I` without checking it. Should be `0xD3`.
  pub async fn get_id(&mut self) -> Result<u8, Error<SE, PE>> {
    self.read_u8(Reg::WhoAmI).await
  }
}

/// How the chip drives its output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDrive {
  /// Pins are driven both high and low.
  #[default]
  PushPull = 0,
  /// Pins only pull low, high comes from an external pull-up.
  OpenDrain = 1,
}

impl From<OutputDrive> for u8 {
  fn from(value: OutputDrive) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for OutputDrive {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(OutputDrive::PushPull),
      1 => Ok(OutputDrive::OpenDrain),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
struct PinConfig {
  #[skip(4)]
  #[bits(1)]
  pub drive: OutputDrive,
}
