mod common;

use common::*;
use l3g4200d::{Config, Error, GyroRange, L3g4200d, NoDiagnostics, MAX_FREQUENCY_HZ};

#[test]
fn begin_configures_chip_after_identity_check() {
  let (mut gyro, wire) = gyro();
  wire.respond(&reg(0xD3));

  block_on(gyro.begin(Config::default())).unwrap();

  assert_eq!(
    wire.ops(),
    vec![
      Op::Deselect,
      // WHO_AM_I
      Op::Select,
      Op::Transfer(vec![0x8F, 0x00]),
      Op::Deselect,
      // CTRL_REG1: 400 Hz / 25 Hz, powered, XYZ
      Op::Select,
      Op::Write(vec![0x20, 0x9F]),
      Op::Deselect,
      // CTRL_REG3: push-pull
      Op::Select,
      Op::Write(vec![0x22, 0x00]),
      Op::Deselect,
      // CTRL_REG4: block data update, little endian, ±4.36 rad/s
      Op::Select,
      Op::Write(vec![0x23, 0x80]),
      Op::Deselect,
      // CTRL_REG5: no filtering
      Op::Select,
      Op::Write(vec![0x24, 0x00]),
      Op::Deselect,
    ]
  );
  assert_eq!(gyro.range(), GyroRange::Rads4_36);
}

#[test]
fn begin_writes_requested_range() {
  let (mut gyro, wire) = gyro();
  wire.respond(&reg(0xD3));

  let config = Config { range: GyroRange::Rads34_91, frequency_hz: 8_000_000 };
  block_on(gyro.begin(config)).unwrap();

  assert!(wire.writes().contains(&vec![0x23, 0xA0]));
  assert_eq!(gyro.range(), GyroRange::Rads34_91);
  assert_eq!(gyro.frequency_hz(), 8_000_000);
}

#[test]
fn all_zero_identity_is_no_response() {
  let (mut gyro, wire) = gyro();
  gyro.enable_debug_logging(true);
  wire.respond(&reg(0x00));

  let res = block_on(gyro.begin(Config { range: GyroRange::Rads8_73, ..Default::default() }));

  assert!(matches!(res, Err(Error::NoResponse)));
  assert!(wire.writes().is_empty());
  assert_eq!(gyro.range(), GyroRange::Rads4_36);
  assert!(gyro.diagnostics().contains("logic LOWs"));
}

#[test]
fn all_ones_identity_is_bus_floating() {
  let (mut gyro, wire) = gyro();
  gyro.enable_debug_logging(true);
  wire.respond(&reg(0xFF));

  let res = block_on(gyro.begin(Config::default()));

  assert!(matches!(res, Err(Error::BusFloating)));
  assert!(wire.writes().is_empty());
  assert!(gyro.diagnostics().contains("logic HIGHs"));
}

#[test]
fn other_identity_is_unexpected() {
  let (mut gyro, wire) = gyro();
  gyro.enable_debug_logging(true);
  wire.respond(&reg(0x55));

  let res = block_on(gyro.begin(Config::default()));

  assert!(matches!(res, Err(Error::UnexpectedIdentity(0x55))));
  assert!(wire.writes().is_empty());
  assert!(gyro.diagnostics().contains("expecting 0xd3, but got 0x55"));
  assert!(gyro.diagnostics().lines.iter().all(|(id, _)| *id == SENSOR_ID));
}

#[test]
fn diagnostics_stay_silent_unless_enabled() {
  let (mut gyro, wire) = gyro();
  wire.respond(&reg(0x00));

  let res = block_on(gyro.begin(Config::default()));

  assert!(matches!(res, Err(Error::NoResponse)));
  assert!(gyro.diagnostics().lines.is_empty());
}

#[test]
fn clock_at_chip_limit_is_rejected_before_bus_traffic() {
  let (mut gyro, wire) = gyro();

  let res = block_on(gyro.begin(Config { frequency_hz: MAX_FREQUENCY_HZ, ..Default::default() }));

  assert!(matches!(res, Err(Error::InvalidFrequency(MAX_FREQUENCY_HZ))));
  assert!(wire.ops().is_empty());
}

#[test]
fn default_driver_discards_diagnostics() {
  let wire = Wire::new();
  let mut gyro = L3g4200d::new(wire.bus(), wire.pin(), 7);
  gyro.enable_debug_logging(true);
  wire.respond(&reg(0x42));

  let res = block_on(gyro.begin(Config::default()));

  assert!(matches!(res, Err(Error::UnexpectedIdentity(0x42))));
  assert_eq!(*gyro.diagnostics(), NoDiagnostics);
  assert_eq!(gyro.sensor_id(), 7);
}
