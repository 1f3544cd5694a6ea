use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::{defs::*, Diagnostics, Error, L3g4200d};

impl<S, P, L, SE, PE> L3g4200d<S, P, L>
where
  S: SpiBus<u8, Error = SE>,
  P: OutputPin<Error = PE>,
  L: Diagnostics,
{
  /// Read a raw register. Advanced use only; prefer the typed accessors.
  ///
  /// Only bits 5..0 of `addr` are used, the read marker is added here.
  pub async fn raw_read_reg(&mut self, addr: u8) -> Result<u8, Error<SE, PE>> {
    self.read_addr(addr & SPI_ADDR_MASK).await
  }

  /// Write a raw register. Advanced use only; nothing is verified by read-back.
  pub async fn raw_write_reg(&mut self, addr: u8, value: u8) -> Result<(), Error<SE, PE>> {
    self.write_addr(addr & SPI_ADDR_MASK, value).await
  }

  pub(crate) async fn read<const N: usize, T: TryFrom<[u8; N]>>(&mut self, reg: Reg) -> Result<T, Error<SE, PE>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b).await?;
    TryFrom::try_from(b).map_err(|_| Error::Data)
  }

  pub(crate) async fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<SE, PE>> {
    self.read_addr(reg.into()).await
  }

  /// Read consecutive registers starting at `reg` in one chip-select window.
  ///
  /// The chip answers each exchange with the byte requested by the previous
  /// one, so one extra leading byte is clocked and thrown away. For bursts the
  /// same auto-increment command byte is sent on every exchange.
  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<SE, PE>> {
    debug_assert!(!buf.is_empty() && buf.len() <= 7, "read_bytes buffer out of range");

    let mut tmp = [0u8; 8];
    let len = buf.len() + 1;
    let addr = u8::from(reg) | SPI_READ;

    if buf.len() == 1 {
      tmp[0] = addr;
    } else {
      tmp[..len].fill(addr | SPI_AUTO_INCREMENT);
    }

    self.exchange(&mut tmp[..len]).await?;
    buf.copy_from_slice(&tmp[1..len]);
    Ok(())
  }

  /// Every register written by this driver is a single byte.
  pub(crate) async fn write<T: TryInto<[u8; 1]>>(&mut self, reg: Reg, v: T) -> Result<(), Error<SE, PE>> {
    let [b] = v.try_into().map_err(|_| Error::Data)?;
    self.write_addr(reg.into(), b).await
  }

  async fn read_addr(&mut self, addr: u8) -> Result<u8, Error<SE, PE>> {
    let mut b = [addr | SPI_READ, 0x00];
    self.exchange(&mut b).await?;
    Ok(b[1])
  }

  async fn write_addr(&mut self, addr: u8, value: u8) -> Result<(), Error<SE, PE>> {
    self.send(&[addr, value]).await
  }

  /// Full-duplex exchange with chip-select held low for the whole buffer.
  async fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Error<SE, PE>> {
    self.cs.set_low().map_err(Error::ChipSelect)?;
    let res = match self.spi.transfer_in_place(buf).await {
      Ok(()) => self.spi.flush().await,
      Err(e) => Err(e),
    };
    // Release chip-select even when the bus failed.
    self.cs.set_high().map_err(Error::ChipSelect)?;
    res.map_err(Error::Spi)
  }

  /// Transmit-only transfer, responses are discarded.
  async fn send(&mut self, data: &[u8]) -> Result<(), Error<SE, PE>> {
    self.cs.set_low().map_err(Error::ChipSelect)?;
    let res = match self.spi.write(data).await {
      Ok(()) => self.spi.flush().await,
      Err(e) => Err(e),
    };
    self.cs.set_high().map_err(Error::ChipSelect)?;
    res.map_err(Error::Spi)
  }
}
