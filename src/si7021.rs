use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::command::{
    Command, MeasurementMode, Register, FIRMWARE_REVISION, ID_PART_A, ID_PART_B, SENSOR_ADDRESS,
};
use crate::error::Error;
use crate::identity::{FirmwareRevision, Model, SerialNumber};
use crate::reading::{celsius, compute_crc, raw_code, relative_humidity, SensorReading};
use crate::register::{Resolution, UserRegister, HEATER_RESERVED_MASK, MAX_HEATER_LEVEL};
use crate::transport::{BusSource, Transport};

/// Heater level written during `init`, the lowest non-zero step (about 9mA at 3.3V).
pub const DEFAULT_HEATER_LEVEL: u8 = 1;

/// Worst-case soft reset time, datasheet Table 2.
pub const RESET_TIME_MS: u32 = 15;

/// Worst-case conversion time of a humidity measurement at 12 bit resolution. A humidity
/// measurement also converts the temperature, so this is 12ms for RH plus 10.8ms for 14 bit
/// temperature, rounded up.
pub const HUMIDITY_CONVERSION_MS: u32 = 23;

/// Worst-case conversion time of a 14 bit temperature measurement, rounded up.
pub const TEMPERATURE_CONVERSION_MS: u32 = 11;

/// Interval between reads while the sensor still NACKs in No Hold Master Mode.
const POLL_INTERVAL_MS: u32 = 1;

/// How many NACKed reads are tolerated after the conversion time before giving up.
const POLL_ATTEMPTS: u8 = 10;

/// An Si7021 sensor on the I2C bus `I`.
///
/// The only way to get one is `Si7021::init`, which runs the bring-up sequence. Every method
/// performs complete bus transactions and either succeeds or returns the error, it never hands
/// back a default reading.
pub struct Si7021<I> {
    transport: Transport<I>,
    mode: MeasurementMode,
    firmware_revision: Option<FirmwareRevision>,
    model: Option<Model>,
}

impl<E, I> Si7021<I>
where
    I: I2c<Error = E>,
    E: embedded_hal::i2c::Error,
{
    /// Open the bus and bring the sensor up.
    ///
    /// This opens the bus master from `source`, addresses `SENSOR_ADDRESS`, resets the sensor
    /// (waiting out the reset time) and sets the heater level to `DEFAULT_HEATER_LEVEL`. It takes
    /// *at least* 15ms to return.
    ///
    /// If any step after opening fails, the bus is handed back to `source` before the error is
    /// returned.
    pub fn init<S>(source: &mut S, delay: &mut impl DelayNs) -> Result<Self, Error<E>>
    where
        S: BusSource<Bus = I>,
    {
        let mut transport = Transport::open(source)?;
        transport.select_target(SENSOR_ADDRESS);

        let mut si7021 = Si7021 {
            transport,
            mode: MeasurementMode::default(),
            firmware_revision: None,
            model: None,
        };

        match si7021.bring_up(delay) {
            Ok(()) => {
                debug!("si7021 initialized");
                Ok(si7021)
            }
            Err(err) => {
                warn!("si7021 bring-up failed");
                source.close(si7021.destroy());
                Err(err)
            }
        }
    }

    fn bring_up(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.reset(delay)?;
        self.heat_level(DEFAULT_HEATER_LEVEL)
    }

    /// Send the Reset command to the sensor.
    ///
    /// The user and heater registers go back to their defaults. The sensor does not answer on the
    /// bus until the reset is done, so we wait the full 15ms before returning.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.transport.send(&[Command::Reset as u8])?;
        delay.delay_ms(RESET_TIME_MS);

        Ok(())
    }

    /// Read one of the sensor's registers.
    ///
    /// The value is returned as-is, see `read_user_register` for a decoded view.
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut read_buffer = [0u8; 1];

        self.transport.send(&[register.read_command() as u8])?;
        self.transport.receive(&mut read_buffer)?;

        Ok(read_buffer[0])
    }

    /// Write `value` to one of the sensor's registers.
    ///
    /// This overwrites the whole register. Use `heater` or `set_resolution` to change a single
    /// field of the user register.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        self.transport.send(&[register.write_command() as u8, value])
    }

    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<E>> {
        self.read_register(Register::User).map(UserRegister::new)
    }

    /// Switch the on-chip heater on or off.
    ///
    /// This is a read-modify-write of the user register, only the heater enable bit changes.
    pub fn heater(&mut self, enable: bool) -> Result<(), Error<E>> {
        let register = self.read_user_register()?.with_heater(enable);
        self.write_register(Register::User, register.bits())
    }

    /// Set the measurement resolution, keeping all other user register bits.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        let register = self.read_user_register()?.with_resolution(resolution);
        self.write_register(Register::User, register.bits())
    }

    /// Set the heater current, from 0 (about 3mA) to 15 (about 94mA) at 3.3V.
    ///
    /// The level only has an effect while the heater is enabled, see `heater`.
    pub fn heat_level(&mut self, level: u8) -> Result<(), Error<E>> {
        if level > MAX_HEATER_LEVEL {
            return Err(Error::InvalidHeaterLevel(level));
        }

        self.write_register(Register::Heater, level)
    }

    /// Read the heater current level back.
    pub fn read_heat_level(&mut self) -> Result<u8, Error<E>> {
        let value = self.read_register(Register::Heater)?;
        // D7..D4 are reserved and read as zero.
        if value & HEATER_RESERVED_MASK != 0 {
            warn!("heater register has reserved bits set: {:#x}", value);
            return Err(Error::UnrecognizedReply(value));
        }

        Ok(value)
    }

    pub fn measurement_mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Choose between No Hold Master Mode (the default) and Hold Master Mode for measurements.
    pub fn set_measurement_mode(&mut self, mode: MeasurementMode) {
        self.mode = mode;
    }

    /// Measure relative humidity, in %.
    ///
    /// In No Hold Master Mode this takes at least 23ms.
    pub fn read_humidity(&mut self, delay: &mut impl DelayNs) -> Result<f32, Error<E>> {
        let command = self.mode.humidity_command();
        let raw = self.measure_raw(command, HUMIDITY_CONVERSION_MS, delay)?;

        Ok(relative_humidity(raw))
    }

    /// Measure temperature, in degrees Celsius.
    ///
    /// In No Hold Master Mode this takes at least 11ms.
    pub fn read_temperature(&mut self, delay: &mut impl DelayNs) -> Result<f32, Error<E>> {
        let command = self.mode.temperature_command();
        let raw = self.measure_raw(command, TEMPERATURE_CONVERSION_MS, delay)?;

        Ok(celsius(raw))
    }

    /// Read the temperature the sensor took during its last humidity measurement.
    ///
    /// No new conversion happens, and the sensor sends no checksum for this reply.
    pub fn read_previous_temperature(&mut self) -> Result<f32, Error<E>> {
        let mut read_buffer = [0u8; 2];

        self.transport.send(&[Command::ReadPreviousTemperature as u8])?;
        self.transport.receive(&mut read_buffer)?;

        Ok(celsius(raw_code(read_buffer)))
    }

    /// Measure humidity and temperature.
    ///
    /// One humidity conversion yields both, the temperature is fetched with
    /// `read_previous_temperature` afterwards.
    pub fn measure(&mut self, delay: &mut impl DelayNs) -> Result<SensorReading, Error<E>> {
        let humidity = self.read_humidity(delay)?;
        let temperature = self.read_previous_temperature()?;

        Ok(SensorReading {
            humidity,
            temperature,
        })
    }

    /// Run one measurement command and return the CRC-checked raw code.
    fn measure_raw(
        &mut self,
        command: Command,
        conversion_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<u16, Error<E>> {
        self.transport.send(&[command as u8])?;

        // MSB, LSB, CRC.
        let mut read_buffer = [0u8; 3];
        match self.mode {
            // The sensor stretches the clock until the data is there.
            MeasurementMode::Hold => self.transport.receive(&mut read_buffer)?,
            MeasurementMode::NoHold => {
                delay.delay_ms(conversion_ms);
                self.poll_reply(&mut read_buffer, delay)?;
            }
        }

        let data = [read_buffer[0], read_buffer[1]];
        if compute_crc(&data) != read_buffer[2] {
            warn!("measurement crc mismatch");
            return Err(Error::ChecksumMismatch);
        }

        Ok(raw_code(data))
    }

    /// Read the reply of a No Hold measurement.
    ///
    /// The sensor NACKs its address while a conversion is running. Those NACKs are retried at
    /// `POLL_INTERVAL_MS` up to `POLL_ATTEMPTS` times, any other bus error ends the poll.
    fn poll_reply(&mut self, buffer: &mut [u8], delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        for attempt in 1..=POLL_ATTEMPTS {
            match self.transport.receive(buffer) {
                Ok(()) => return Ok(()),
                // No point waiting after the last attempt.
                Err(err) if err.is_nack() && attempt == POLL_ATTEMPTS => break,
                Err(err) if err.is_nack() => {
                    trace!("conversion still running");
                    delay.delay_ms(POLL_INTERVAL_MS);
                }
                Err(err) => return Err(err),
            }
        }

        warn!("no measurement after {} polls", POLL_ATTEMPTS);
        Err(Error::Timeout)
    }

    /// Read the firmware revision of the sensor.
    ///
    /// The result is also kept and available from `firmware_revision` afterwards.
    pub fn read_firmware_revision(&mut self) -> Result<FirmwareRevision, Error<E>> {
        let mut read_buffer = [0u8; 1];

        self.transport.send(&FIRMWARE_REVISION)?;
        self.transport.receive(&mut read_buffer)?;

        let revision = FirmwareRevision::from_code(read_buffer[0]);
        debug!("si7021 firmware revision: {}", revision);
        self.firmware_revision = Some(revision);

        Ok(revision)
    }

    /// Read the 64 bit electronic serial number and determine the device model from it.
    ///
    /// This takes two command/reply cycles, see datasheet Section 5.6. Both replies are
    /// CRC-checked. The model is also kept and available from `model` afterwards.
    pub fn read_serial_number_and_model(&mut self) -> Result<(SerialNumber, Model), Error<E>> {
        let mut part_a = [0u8; 8];
        self.transport.send(&ID_PART_A)?;
        self.transport.receive(&mut part_a)?;

        let mut part_b = [0u8; 6];
        self.transport.send(&ID_PART_B)?;
        self.transport.receive(&mut part_b)?;

        let serial = match SerialNumber::from_replies(part_a, part_b) {
            Some(serial) => serial,
            None => {
                warn!("electronic id crc mismatch");
                return Err(Error::ChecksumMismatch);
            }
        };
        let model = serial.model();
        debug!("si7021 model: {}", model);
        self.model = Some(model);

        Ok((serial, model))
    }

    /// The firmware revision from the last successful `read_firmware_revision`, if any.
    pub fn firmware_revision(&self) -> Option<FirmwareRevision> {
        self.firmware_revision
    }

    /// The model from the last successful `read_serial_number_and_model`, if any.
    pub fn model(&self) -> Option<Model> {
        self.model
    }

    /// Destroys this driver and releases the I2C bus `I`.
    pub fn destroy(self) -> I {
        self.transport.close()
    }
}
