//! Bus transport.
//!
//! A thin wrapper around a blocking `embedded-hal` I2C bus master: open the channel, select the
//! target address, then send and receive whole transactions. Every `send` and `receive` is one
//! start/address/data/stop sequence on the bus. Nothing is retried or queued here.

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::error::Error;

/// Something that can hand out the I2C bus master, and take it back.
///
/// `Option<I>` is the simplest source: `open` takes the bus out, `close` puts it back. Implement
/// this for your own type if acquiring the peripheral can fail in other ways.
pub trait BusSource {
    type Bus: I2c;

    /// Acquire the bus master. `None` means the channel could not be found or opened.
    fn open(&mut self) -> Option<Self::Bus>;

    /// Give the bus master back.
    fn close(&mut self, bus: Self::Bus);
}

impl<I> BusSource for Option<I>
where
    I: I2c,
{
    type Bus = I;

    fn open(&mut self) -> Option<I> {
        self.take()
    }

    fn close(&mut self, bus: I) {
        *self = Some(bus);
    }
}

/// An open channel to the bus master with an optional selected target.
pub struct Transport<I> {
    bus: I,
    target: Option<SevenBitAddress>,
}

impl<E, I> Transport<I>
where
    I: I2c<Error = E>,
{
    /// Acquire the bus master from `source`.
    ///
    /// No target is selected yet, call `select_target` before the first transaction.
    pub fn open<S>(source: &mut S) -> Result<Self, Error<E>>
    where
        S: BusSource<Bus = I>,
    {
        match source.open() {
            Some(bus) => Ok(Transport { bus, target: None }),
            None => {
                warn!("i2c bus master unavailable");
                Err(Error::DeviceUnavailable)
            }
        }
    }

    /// Address all following transactions to `address`.
    ///
    /// Only the low 7 bits are used. No bus traffic happens here, a wrong address shows up as a
    /// NACK on the next transaction.
    pub fn select_target(&mut self, address: SevenBitAddress) {
        self.target = Some(address & 0b0111_1111);
    }

    /// The currently selected target address.
    pub fn target(&self) -> Option<SevenBitAddress> {
        self.target
    }

    /// Write `bytes` to the selected target in a single transaction.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        let address = self.target.ok_or(Error::NoTarget)?;
        trace!("i2c write {:#x}: {:#x}", address, bytes);
        self.bus.write(address, bytes).map_err(Error::Transaction)
    }

    /// Fill `buffer` from the selected target in a single transaction.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Error<E>> {
        let address = self.target.ok_or(Error::NoTarget)?;
        self.bus.read(address, buffer).map_err(Error::Transaction)?;
        trace!("i2c read {:#x}: {:#x}", address, buffer);
        Ok(())
    }

    /// Close the channel and release the I2C bus `I`.
    pub fn close(self) -> I {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::{BusSource, Transport};
    use crate::error::Error;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
    use embedded_hal_mock::eh1::i2c::Transaction;

    const ADDRESS: u8 = 0x40;

    #[test]
    fn open_takes_the_bus() {
        let mut source = Some(I2cMock::new(&[]));
        let transport = Transport::open(&mut source).unwrap();
        assert!(source.is_none());
        assert_eq!(transport.target(), None);

        let mut mock = transport.close();
        mock.done(); // verify expectations
    }

    #[test]
    fn open_without_bus_is_unavailable() {
        let mut source: Option<I2cMock> = None;
        match Transport::open(&mut source) {
            Ok(_) => panic!("there is no bus to open"),
            Err(err) => assert_eq!(err, Error::DeviceUnavailable),
        }
    }

    #[test]
    fn close_returns_the_bus_to_the_source() {
        let mut source = Some(I2cMock::new(&[]));
        let transport = Transport::open(&mut source).unwrap();
        source.close(transport.close());
        assert!(source.is_some());

        source.take().unwrap().done(); // verify expectations
    }

    #[test]
    fn select_target_keeps_seven_bits() {
        let mut source = Some(I2cMock::new(&[]));
        let mut transport = Transport::open(&mut source).unwrap();
        transport.select_target(0xC0);
        assert_eq!(transport.target(), Some(0x40));

        transport.close().done(); // verify expectations
    }

    #[test]
    fn transactions_need_a_target() {
        let mut source = Some(I2cMock::new(&[]));
        let mut transport = Transport::open(&mut source).unwrap();
        assert_eq!(transport.send(&[0xFE]), Err(Error::NoTarget));
        let mut buffer = [0u8; 1];
        assert_eq!(transport.receive(&mut buffer), Err(Error::NoTarget));

        transport.close().done(); // verify expectations
    }

    #[test]
    fn send_then_receive() {
        let expectations = vec![
            Transaction::write(ADDRESS, vec![0xE7]),
            Transaction::read(ADDRESS, vec![0x3A]),
        ];
        let mut source = Some(I2cMock::new(&expectations));
        let mut transport = Transport::open(&mut source).unwrap();
        transport.select_target(ADDRESS);

        transport.send(&[0xE7]).unwrap();
        let mut buffer = [0u8; 1];
        transport.receive(&mut buffer).unwrap();
        assert_eq!(buffer, [0x3A]);

        transport.close().done(); // verify expectations
    }

    #[test]
    fn bus_errors_carry_the_status() {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        let expectations = vec![
            Transaction::write(ADDRESS, vec![0xFE]).with_error(nack),
            Transaction::read(ADDRESS, vec![0x00]).with_error(ErrorKind::ArbitrationLoss),
        ];
        let mut source = Some(I2cMock::new(&expectations));
        let mut transport = Transport::open(&mut source).unwrap();
        transport.select_target(ADDRESS);

        let err = transport.send(&[0xFE]).unwrap_err();
        assert_eq!(err, Error::Transaction(nack));
        assert!(err.is_nack());

        let mut buffer = [0u8; 1];
        let err = transport.receive(&mut buffer).unwrap_err();
        assert_eq!(err.status(), Some(ErrorKind::ArbitrationLoss));

        transport.close().done(); // verify expectations
    }
}
