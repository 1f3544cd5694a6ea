//! Scripted SPI bus and chip-select pin for driving the driver without hardware.
//!
//! Both halves share one [`Wire`], so the recorded operations keep the real
//! ordering between chip-select edges and bus traffic. Every byte clocked by a
//! full-duplex transfer pops the next canned response (0x00 once the script
//! runs out); transmit-only writes consume nothing. Either half can be told to
//! fail, to exercise the error paths.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use l3g4200d::{Diagnostics, L3g4200d};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
  Select,
  Deselect,
  /// Bytes transmitted in a full-duplex transfer.
  Transfer(Vec<u8>),
  /// Bytes transmitted with responses ignored.
  Write(Vec<u8>),
}

#[derive(Clone, Default)]
pub struct Wire {
  ops: Rc<RefCell<Vec<Op>>>,
  responses: Rc<RefCell<VecDeque<u8>>>,
  bus_fault: Rc<Cell<bool>>,
  pin_fault: Rc<Cell<bool>>,
}

/// Error returned by [`FakeBus`] once [`Wire::fail_bus`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl embedded_hal::spi::Error for BusFault {
  fn kind(&self) -> embedded_hal::spi::ErrorKind {
    embedded_hal::spi::ErrorKind::Other
  }
}

/// Error returned by [`FakePin`] once [`Wire::fail_pin`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
  fn kind(&self) -> embedded_hal::digital::ErrorKind {
    embedded_hal::digital::ErrorKind::Other
  }
}

impl Wire {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue bytes the chip will answer with.
  pub fn respond(&self, bytes: &[u8]) {
    self.responses.borrow_mut().extend(bytes.iter().copied());
  }

  /// Make every bus transfer fail after it has been recorded.
  pub fn fail_bus(&self, fail: bool) {
    self.bus_fault.set(fail);
  }

  /// Make every chip-select edge fail without being recorded.
  pub fn fail_pin(&self, fail: bool) {
    self.pin_fault.set(fail);
  }

  pub fn ops(&self) -> Vec<Op> {
    self.ops.borrow().clone()
  }

  pub fn clear(&self) {
    self.ops.borrow_mut().clear();
  }

  pub fn transfers(&self) -> usize {
    self.ops.borrow().iter().filter(|op| matches!(op, Op::Transfer(_))).count()
  }

  pub fn writes(&self) -> Vec<Vec<u8>> {
    self
      .ops
      .borrow()
      .iter()
      .filter_map(|op| match op {
        Op::Write(b) => Some(b.clone()),
        _ => None,
      })
      .collect()
  }

  pub fn bus(&self) -> FakeBus {
    FakeBus(self.clone())
  }

  pub fn pin(&self) -> FakePin {
    FakePin(self.clone())
  }

  fn push(&self, op: Op) {
    self.ops.borrow_mut().push(op);
  }

  fn next_response(&self) -> u8 {
    self.responses.borrow_mut().pop_front().unwrap_or(0x00)
  }

  fn bus_result(&self) -> Result<(), BusFault> {
    if self.bus_fault.get() {
      Err(BusFault)
    } else {
      Ok(())
    }
  }

  fn edge(&self, op: Op) -> Result<(), PinFault> {
    if self.pin_fault.get() {
      return Err(PinFault);
    }
    self.push(op);
    Ok(())
  }
}

pub struct FakeBus(Wire);

impl embedded_hal::spi::ErrorType for FakeBus {
  type Error = BusFault;
}

impl embedded_hal_async::spi::SpiBus for FakeBus {
  async fn read(&mut self, words: &mut [u8]) -> Result<(), BusFault> {
    self.0.push(Op::Transfer(vec![0x00; words.len()]));
    self.0.bus_result()?;
    for w in words.iter_mut() {
      *w = self.0.next_response();
    }
    Ok(())
  }

  async fn write(&mut self, words: &[u8]) -> Result<(), BusFault> {
    self.0.push(Op::Write(words.to_vec()));
    self.0.bus_result()
  }

  async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), BusFault> {
    self.0.push(Op::Transfer(write.to_vec()));
    self.0.bus_result()?;
    for w in read.iter_mut() {
      *w = self.0.next_response();
    }
    Ok(())
  }

  async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), BusFault> {
    self.0.push(Op::Transfer(words.to_vec()));
    self.0.bus_result()?;
    for w in words.iter_mut() {
      *w = self.0.next_response();
    }
    Ok(())
  }

  async fn flush(&mut self) -> Result<(), BusFault> {
    self.0.bus_result()
  }
}

pub struct FakePin(Wire);

impl embedded_hal::digital::ErrorType for FakePin {
  type Error = PinFault;
}

impl embedded_hal::digital::OutputPin for FakePin {
  fn set_low(&mut self) -> Result<(), PinFault> {
    self.0.edge(Op::Select)
  }

  fn set_high(&mut self) -> Result<(), PinFault> {
    self.0.edge(Op::Deselect)
  }
}

/// Keeps every diagnostic message with the sensor id it was tagged with.
#[derive(Default)]
pub struct Recorder {
  pub lines: Vec<(i32, String)>,
}

impl Recorder {
  pub fn contains(&self, needle: &str) -> bool {
    self.lines.iter().any(|(_, l)| l.contains(needle))
  }
}

impl Diagnostics for Recorder {
  fn log(&mut self, sensor_id: i32, args: fmt::Arguments<'_>) {
    self.lines.push((sensor_id, args.to_string()));
  }
}

pub const SENSOR_ID: i32 = 2113;

pub type Gyro = L3g4200d<FakeBus, FakePin, Recorder>;

pub fn gyro() -> (Gyro, Wire) {
  let wire = Wire::new();
  let gyro = L3g4200d::with_diagnostics(wire.bus(), wire.pin(), SENSOR_ID, Recorder::default());
  (gyro, wire)
}

/// Response to a single register read: a dummy byte, then the value.
pub fn reg(value: u8) -> [u8; 2] {
  [0x00, value]
}

/// Response to a burst read: a dummy byte, then X, Y and Z low byte first.
pub fn burst(x: i16, y: i16, z: i16) -> [u8; 7] {
  let [xl, xh] = x.to_le_bytes();
  let [yl, yh] = y.to_le_bytes();
  let [zl, zh] = z.to_le_bytes();
  [0xAA, xl, xh, yl, yh, zl, zh]
}

pub fn close(a: f32, b: f32) -> bool {
  (a - b).abs() < 1e-4
}

pub fn block_on<F: core::future::Future>(fut: F) -> F::Output {
  use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

  fn dummy_raw_waker() -> RawWaker {
    fn no_op(_: *const ()) {}
    fn clone(_: *const ()) -> RawWaker {
      dummy_raw_waker()
    }
    const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
    RawWaker::new(core::ptr::null(), &VTABLE)
  }

  let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
  let mut cx = Context::from_waker(&waker);
  let mut fut = core::pin::pin!(fut);

  loop {
    match fut.as_mut().poll(&mut cx) {
      Poll::Ready(result) => return result,
      Poll::Pending => continue,
    }
  }
}
