use crc_any::CRCu8;

/// SensorReading is a single reading from the Si7021 sensor.
///
/// This is returned from the `measure` method. You get:
/// * humidity in % Relative Humidity
/// * temperature in degrees Celsius.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub humidity: f32,
    pub temperature: f32,
}

/// Convert a raw humidity code to % Relative Humidity.
///
/// Section 5.1.1 of the datasheet: `%RH = (125 * RH_Code) / 65536 - 6`. The result can land a
/// little outside 0-100%, see `clamp_humidity`.
pub fn relative_humidity(raw: u16) -> f32 {
    (raw as f32) * 125.0 / 65536.0 - 6.0
}

/// Convert a raw temperature code to degrees Celsius.
///
/// Section 5.1.2 of the datasheet: `Temperature (°C) = (175.72 * Temp_Code) / 65536 - 46.85`.
pub fn celsius(raw: u16) -> f32 {
    (raw as f32) * 175.72 / 65536.0 - 46.85
}

/// Limit a humidity value to the physically meaningful 0-100% range.
///
/// The datasheet notes that, due to normal variations in sensitivity, the converted value can be
/// slightly below 0% or above 100%.
pub fn clamp_humidity(humidity: f32) -> f32 {
    humidity.clamp(0.0, 100.0)
}

/// Join the two data bytes of a measurement reply, most significant byte first.
///
/// The two lowest bits of a measurement are status bits and are passed through with the code,
/// their contribution to the converted value is below the sensor's resolution.
pub(crate) fn raw_code(reply: [u8; 2]) -> u16 {
    u16::from_be_bytes(reply)
}

/// compute_crc uses the CRCu8 algorithm from crc-any.
///
/// The parameters come from the datasheet, Section 5.1 "Measuring Relative Humidity":
///
/// > The checksum byte is calculated using a CRC generator polynomial of x^8 + x^5 + x^4 + 1,
/// > with an initialization of 0x00.
///
/// Leaving out the x^8 term gives bits 5, 4 and 0, which is `0x31`.
pub fn compute_crc(bytes: &[u8]) -> u8 {
    // Poly (0x31), bits (8), initial (0x00), final_xor (0x00), reflect (false).
    let mut crc = CRCu8::create_crc(0x31, 8, 0x00, 0x00, false);
    crc.digest(bytes);
    crc.get_crc()
}

#[cfg(test)]
mod tests {
    use super::{celsius, clamp_humidity, compute_crc, raw_code, relative_humidity};

    fn approx(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn humidity_endpoints() {
        assert_eq!(relative_humidity(0), -6.0);
        assert!(approx(relative_humidity(65535), 118.998, 0.001));
    }

    #[test]
    fn temperature_endpoints() {
        assert_eq!(celsius(0), -46.85);
        assert!(approx(celsius(65535), 128.867, 0.001));
    }

    /// Both conversions rise with the raw code over the whole range.
    #[test]
    fn conversions_are_monotonic() {
        let mut last_rh = relative_humidity(0);
        let mut last_t = celsius(0);
        for raw in 1..=u16::MAX {
            let rh = relative_humidity(raw);
            let t = celsius(raw);
            assert!(rh >= last_rh, "humidity fell at raw code {}", raw);
            assert!(t >= last_t, "temperature fell at raw code {}", raw);
            last_rh = rh;
            last_t = t;
        }
        assert!(relative_humidity(u16::MAX) > relative_humidity(0));
    }

    #[test]
    fn raw_code_is_big_endian() {
        assert_eq!(raw_code([0x66, 0x66]), 26214);
        assert_eq!(raw_code([0x7C, 0x80]), 0x7C80);
        // 0x7C80 is about 54.8%RH.
        assert!(approx(relative_humidity(0x7C80), 54.79, 0.01));
    }

    #[test]
    fn humidity_clamping() {
        assert_eq!(clamp_humidity(-3.5), 0.0);
        assert_eq!(clamp_humidity(104.0), 100.0);
        assert_eq!(clamp_humidity(55.5), 55.5);
    }

    /// Test a valid CRC invocation.
    #[test]
    fn crc_correct() {
        assert_eq!(compute_crc(&[0x66, 0x66]), 0x12);
        assert_eq!(compute_crc(&[0x7C, 0x80]), 0xF5);
        // With a zero initial value, zero data gives a zero CRC.
        assert_eq!(compute_crc(&[0x00, 0x00]), 0x00);
    }

    /// Test a CRC call that does not match.
    #[test]
    fn crc_wrong() {
        assert_ne!(compute_crc(&[0x66, 0x67]), 0x12);
    }
}
