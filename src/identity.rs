use crate::reading::compute_crc;

/// Firmware revision reported by the Read Firmware Revision command.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareRevision {
    /// Code 0xFF, firmware version 1.0.
    Revision1,
    /// Code 0x20, firmware version 2.0.
    Revision2,
    /// Any other code, kept as received.
    Unknown(u8),
}

impl FirmwareRevision {
    pub fn from_code(code: u8) -> Self {
        match code {
            0xFF => FirmwareRevision::Revision1,
            0x20 => FirmwareRevision::Revision2,
            other => FirmwareRevision::Unknown(other),
        }
    }
}

/// Device model, taken from the first byte of the second half of the electronic ID (SNB_3).
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// 0x00 or 0xFF.
    EngineeringSample,
    /// 0x0D.
    Si7013,
    /// 0x14.
    Si7020,
    /// 0x15.
    Si7021,
    /// Any other code, kept as received.
    Unrecognized(u8),
}

impl Model {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 | 0xFF => Model::EngineeringSample,
            0x0D => Model::Si7013,
            0x14 => Model::Si7020,
            0x15 => Model::Si7021,
            other => Model::Unrecognized(other),
        }
    }
}

/// The 64 bit electronic serial number, as its two halves.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber {
    /// SNA_3..SNA_0.
    pub a: u32,
    /// SNB_3..SNB_0. SNB_3 is the model code.
    pub b: u32,
}

impl SerialNumber {
    /// Assemble the serial number from the two ID replies, checking their CRC bytes.
    ///
    /// Part A is `SNA_3, CRC, SNA_2, CRC, SNA_1, CRC, SNA_0, CRC`, part B is
    /// `SNB_3, SNB_2, CRC, SNB_1, SNB_0, CRC`. Each CRC covers all ID bytes of its reply
    /// received so far. Returns `None` if any of them does not match.
    pub(crate) fn from_replies(part_a: [u8; 8], part_b: [u8; 6]) -> Option<Self> {
        let sna = [part_a[0], part_a[2], part_a[4], part_a[6]];
        for (i, crc) in [part_a[1], part_a[3], part_a[5], part_a[7]].into_iter().enumerate() {
            if compute_crc(&sna[..=i]) != crc {
                return None;
            }
        }

        let snb = [part_b[0], part_b[1], part_b[3], part_b[4]];
        if compute_crc(&snb[..2]) != part_b[2] || compute_crc(&snb) != part_b[5] {
            return None;
        }

        Some(SerialNumber {
            a: u32::from_be_bytes(sna),
            b: u32::from_be_bytes(snb),
        })
    }

    pub fn model(&self) -> Model {
        Model::from_code(self.b.to_be_bytes()[0])
    }

    /// The whole serial number, SNA first.
    pub fn as_u64(&self) -> u64 {
        ((self.a as u64) << 32) | self.b as u64
    }
}
