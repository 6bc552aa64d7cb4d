/// Si7021 sensor's I2C address.
pub const SENSOR_ADDRESS: u8 = 0b0100_0000; // This is I2C address 0x40.

/// Commands that can be sent to the Si7021 sensor.
///
/// These can be found in the datasheet, Section 5, Table 11 "I2C Command Table". The electronic ID
/// and firmware reads are two-byte commands and live in `ID_PART_A`, `ID_PART_B` and
/// `FIRMWARE_REVISION` instead.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    MeasureHumidityHold = 0xE5,
    MeasureHumidityNoHold = 0xF5, // The sensor NACKs reads until the conversion is done.
    MeasureTemperatureHold = 0xE3,
    MeasureTemperatureNoHold = 0xF3,
    // Temperature taken during the last humidity measurement. Two bytes, no checksum.
    ReadPreviousTemperature = 0xE0,
    Reset = 0xFE,
    WriteUserRegister = 0xE6,
    ReadUserRegister = 0xE7,
    WriteHeaterRegister = 0x51,
    ReadHeaterRegister = 0x11,
}

/// Read Electronic ID, first half (SNA). The reply is 8 bytes, each data byte followed by a CRC.
pub const ID_PART_A: [u8; 2] = [0xFA, 0x0F];

/// Read Electronic ID, second half (SNB). The reply is 6 bytes: two data bytes, CRC, twice.
pub const ID_PART_B: [u8; 2] = [0xFC, 0xC9];

/// Read Firmware Revision. The reply is a single byte.
pub const FIRMWARE_REVISION: [u8; 2] = [0x84, 0xB8];

/// The two writable registers on the sensor.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// RH/T User Register 1: resolution, VDD status and heater enable.
    User,
    /// Heater Control Register: the 4-bit heater current level.
    Heater,
}

impl Register {
    /// The command that reads this register back.
    pub fn read_command(self) -> Command {
        match self {
            Register::User => Command::ReadUserRegister,
            Register::Heater => Command::ReadHeaterRegister,
        }
    }

    /// The command that writes this register. It is followed by the value byte.
    pub fn write_command(self) -> Command {
        match self {
            Register::User => Command::WriteUserRegister,
            Register::Heater => Command::WriteHeaterRegister,
        }
    }
}

/// How the sensor delivers a measurement.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementMode {
    /// The sensor releases the bus while converting and NACKs reads until it is done. The driver
    /// waits and polls.
    #[default]
    NoHold,
    /// The sensor holds SCL low (clock stretching) until the conversion is done. Your bus master
    /// must support clock stretching for this mode.
    Hold,
}

impl MeasurementMode {
    pub(crate) fn humidity_command(self) -> Command {
        match self {
            MeasurementMode::NoHold => Command::MeasureHumidityNoHold,
            MeasurementMode::Hold => Command::MeasureHumidityHold,
        }
    }

    pub(crate) fn temperature_command(self) -> Command {
        match self {
            MeasurementMode::NoHold => Command::MeasureTemperatureNoHold,
            MeasurementMode::Hold => Command::MeasureTemperatureHold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, MeasurementMode, Register};

    #[test]
    fn register_commands() {
        assert_eq!(Register::User.read_command() as u8, 0xE7);
        assert_eq!(Register::User.write_command() as u8, 0xE6);
        assert_eq!(Register::Heater.read_command() as u8, 0x11);
        assert_eq!(Register::Heater.write_command() as u8, 0x51);
    }

    #[test]
    fn measurement_commands_follow_mode() {
        assert_eq!(
            MeasurementMode::NoHold.humidity_command(),
            Command::MeasureHumidityNoHold
        );
        assert_eq!(MeasurementMode::Hold.humidity_command() as u8, 0xE5);
        assert_eq!(MeasurementMode::NoHold.temperature_command() as u8, 0xF3);
        assert_eq!(MeasurementMode::Hold.temperature_command() as u8, 0xE3);
    }
}
