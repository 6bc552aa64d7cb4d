use embedded_hal::i2c::ErrorKind;

/// Driver errors.
///
/// `E` is the error type of the I2C bus the sensor sits on.
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The bus source had no bus master to hand out.
    DeviceUnavailable,
    /// A transaction was attempted before a target address was selected.
    NoTarget,
    /// The bus master reported a failure (NACK, arbitration loss, ...).
    Transaction(E),
    /// The reply's CRC byte does not match its data bytes.
    ChecksumMismatch,
    /// The sensor kept NACKing reads for longer than the worst-case conversion time.
    Timeout,
    /// The sensor answered with a code outside the documented set.
    UnrecognizedReply(u8),
    /// Heater levels are 4 bits wide, 0 to 15.
    InvalidHeaterLevel(u8),
}

impl<E> Error<E>
where
    E: embedded_hal::i2c::Error,
{
    /// The low-level bus status behind a `Transaction` error.
    pub fn status(&self) -> Option<ErrorKind> {
        match self {
            Error::Transaction(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// True when the bus failure was the sensor not acknowledging.
    pub fn is_nack(&self) -> bool {
        matches!(self.status(), Some(ErrorKind::NoAcknowledge(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    #[test]
    fn transaction_status_is_exposed() {
        let err: Error<ErrorKind> = Error::Transaction(ErrorKind::ArbitrationLoss);
        assert_eq!(err.status(), Some(ErrorKind::ArbitrationLoss));
        assert!(!err.is_nack());
    }

    #[test]
    fn nack_is_detected() {
        let err: Error<ErrorKind> =
            Error::Transaction(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        assert!(err.is_nack());
    }

    #[test]
    fn non_bus_errors_have_no_status() {
        let err: Error<ErrorKind> = Error::ChecksumMismatch;
        assert_eq!(err.status(), None);
        assert!(!err.is_nack());
    }
}
