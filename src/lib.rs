#![cfg_attr(not(test), no_std)]
//! Si7021 driver.
//!
//! Example:
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay as MockDelay;
//! # use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
//! # use embedded_hal_mock::eh1::i2c::Transaction;
//! # use si7021_driver::{Command, Si7021, SENSOR_ADDRESS};
//! # let expectations = vec![
//! #     // init: reset, then the default heater level.
//! #     Transaction::write(SENSOR_ADDRESS, vec![Command::Reset as u8]),
//! #     Transaction::write(SENSOR_ADDRESS, vec![Command::WriteHeaterRegister as u8, 0x01]),
//! #     // measure: a humidity conversion, MSB, LSB, CRC.
//! #     Transaction::write(SENSOR_ADDRESS, vec![Command::MeasureHumidityNoHold as u8]),
//! #     Transaction::read(SENSOR_ADDRESS, vec![0x7C, 0x80, 0xF5]),
//! #     // then the temperature from that same conversion, no CRC.
//! #     Transaction::write(SENSOR_ADDRESS, vec![Command::ReadPreviousTemperature as u8]),
//! #     Transaction::read(SENSOR_ADDRESS, vec![0x66, 0x66]),
//! # ];
//! # let mut bus = Some(I2cMock::new(&expectations));
//! # let mut delay = MockDelay::new();
//! let mut si7021 = Si7021::init(&mut bus, &mut delay).unwrap();
//! let measurement = si7021.measure(&mut delay).unwrap();
//!
//! println!("temperature (si7021): {:.2}C", measurement.temperature);
//! println!("humidity (si7021): {:.2}%", measurement.humidity);
//! # si7021.destroy().done();
//! ```
//!
//! [Si7021-A20 Datasheet](https://www.silabs.com/documents/public/data-sheets/Si7021-A20.pdf)
//!
//! All section and table references in this crate are to that datasheet.
//!
//! The driver is split in two. [`Transport`] owns the I2C bus master and does one blocking bus
//! transaction per call, [`Si7021`] encodes the sensor's commands on top of it. Both return
//! every failure as an [`Error`]; the driver never reports a made-up reading.
//!
//! Measurements use No Hold Master Mode by default. The sensor lets go of the bus while it
//! converts and NACKs any read until the data is ready:
//!
//! ```text
//!   Command::MeasureHumidityNoHold (0xF5)
//!                  │
//!                  ▼
//!         Wait conversion time
//!                  │
//!                  ▼
//!            Read 3 bytes    ◄───────  Wait 1 ms
//!                  │                       ▲
//!                  ▼                       │
//!                NACK ───────► Yes ────────┘  (10 times at most, then Error::Timeout)
//!                  │
//!                  ▼
//!                 No
//!                  │
//!                  ▼
//!           CRC good ─► No ─► Error::ChecksumMismatch
//!                  │
//!                  ▼
//!                 Yes
//!                  │
//!                  ▼
//!          Calc Humidity
//! ```
//!
//! # Features
//! - `use-defmt`: log through `defmt` and derive `defmt::Format` on the public types.

mod fmt;

pub mod command;
pub mod error;
pub mod identity;
pub mod reading;
pub mod register;
pub mod si7021;
pub mod transport;

pub use command::{Command, MeasurementMode, Register, SENSOR_ADDRESS};
pub use error::Error;
pub use identity::{FirmwareRevision, Model, SerialNumber};
pub use reading::{celsius, clamp_humidity, relative_humidity, SensorReading};
pub use register::{Resolution, UserRegister};
pub use si7021::{Si7021, DEFAULT_HEATER_LEVEL};
pub use transport::{BusSource, Transport};
