/// User register value after power-up or reset: 0b0011_1010.
pub const USER_REGISTER_RESET: u8 = 0b0011_1010;

/// Heater enable (HTRE), D2.
const HEATER_ENABLE: u8 = 0b0000_0100;
/// VDD status (VDDS), D6. Read-only.
const VDD_LOW: u8 = 0b0100_0000;
/// Measurement resolution is split over D7 (RES1) and D0 (RES0).
const RESOLUTION_MASK: u8 = 0b1000_0001;

/// Highest heater current step. The heater register holds the level in D3..D0.
pub const MAX_HEATER_LEVEL: u8 = 0b0000_1111;
/// Bits of the heater register that must read back as zero.
pub(crate) const HEATER_RESERVED_MASK: u8 = 0b1111_0000;

/// Measurement resolution, Table 14 of the datasheet.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 12 bit humidity, 14 bit temperature. The reset default.
    Rh12Temp14,
    /// 8 bit humidity, 12 bit temperature.
    Rh8Temp12,
    /// 10 bit humidity, 13 bit temperature.
    Rh10Temp13,
    /// 11 bit humidity, 11 bit temperature.
    Rh11Temp11,
}

impl Resolution {
    fn bits(self) -> u8 {
        match self {
            Resolution::Rh12Temp14 => 0b0000_0000,
            Resolution::Rh8Temp12 => 0b0000_0001,
            Resolution::Rh10Temp13 => 0b1000_0000,
            Resolution::Rh11Temp11 => 0b1000_0001,
        }
    }
}

/// UserRegister is the content of RH/T User Register 1.
///
/// This is returned from the `read_user_register` method. Modifying methods return a new value
/// with only their own field changed, so a read-modify-write leaves every other bit (including
/// the reserved ones) as the sensor reported them.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRegister(pub u8);

impl UserRegister {
    pub fn new(value: u8) -> Self {
        UserRegister(value)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Check if the on-chip heater is switched on.
    pub fn heater_enabled(self) -> bool {
        (self.0 & HEATER_ENABLE) != 0
    }

    pub fn with_heater(self, enable: bool) -> Self {
        if enable {
            UserRegister(self.0 | HEATER_ENABLE)
        } else {
            UserRegister(self.0 & !HEATER_ENABLE)
        }
    }

    /// Check if the supply voltage has dropped below the sensor's operating minimum (about 1.9V).
    pub fn vdd_low(self) -> bool {
        (self.0 & VDD_LOW) != 0
    }

    pub fn resolution(self) -> Resolution {
        match (self.0 & 0b1000_0000 != 0, self.0 & 0b0000_0001 != 0) {
            (false, false) => Resolution::Rh12Temp14,
            (false, true) => Resolution::Rh8Temp12,
            (true, false) => Resolution::Rh10Temp13,
            (true, true) => Resolution::Rh11Temp11,
        }
    }

    pub fn with_resolution(self, resolution: Resolution) -> Self {
        UserRegister((self.0 & !RESOLUTION_MASK) | resolution.bits())
    }
}

impl Default for UserRegister {
    fn default() -> Self {
        UserRegister(USER_REGISTER_RESET)
    }
}
