//! Diagnostic output.
//!
//! The driver reports why [`begin`](crate::L3g4200d::begin) failed, and the raw
//! samples it read, through a [`Diagnostics`] sink. Nothing is emitted unless
//! logging was turned on with
//! [`enable_debug_logging`](crate::L3g4200d::enable_debug_logging).
//!
//! With the `defmt` feature, [`DefmtDiagnostics`] forwards every message to
//! `defmt::debug!`.

use core::fmt;

/// Sink for human-readable driver diagnostics.
///
/// `sensor_id` is the identifier the driver was created with, so messages from
/// several sensors can be told apart.
pub trait Diagnostics {
  fn log(&mut self, sensor_id: i32, args: fmt::Arguments<'_>);
}

/// Discards everything. Default sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
  #[inline]
  fn log(&mut self, _sensor_id: i32, _args: fmt::Arguments<'_>) {}
}

impl<T: Diagnostics + ?Sized> Diagnostics for &mut T {
  fn log(&mut self, sensor_id: i32, args: fmt::Arguments<'_>) {
    (**self).log(sensor_id, args)
  }
}

/// Forwards diagnostics to `defmt::debug!`.
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, defmt::Format)]
pub struct DefmtDiagnostics;

#[cfg(feature = "defmt")]
impl Diagnostics for DefmtDiagnostics {
  fn log(&mut self, sensor_id: i32, args: fmt::Arguments<'_>) {
    defmt::debug!("[{}]: {}", sensor_id, defmt::Display2Format(&args));
  }
}
