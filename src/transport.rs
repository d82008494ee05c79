//! SPI + GPIO transport for the LED ring.
//!
//! Frame bytes go out over a synchronous serial bus while a dedicated pin is
//! held high for the duration of the frame, telling the ring controller where
//! a rotation's data starts and ends.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Transport;

/// Bus clock the ring controller is rated for
pub const BUS_SPEED_HZ: u32 = 10_000_000;

/// SPI mode the ring controller expects
pub const BUS_MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;

/// GPIO line used for the frame signal on the reference board
pub const FRAME_PIN: u8 = 17;

/// Error from either half of the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError<S, P> {
    Spi(S),
    Pin(P),
}

/// Transport built from an `embedded-hal` SPI bus and output pin.
///
/// The bus must already be configured for [`BUS_SPEED_HZ`], [`BUS_MODE`] and
/// 8-bit words.
pub struct SpiFrameTransport<SPI, PIN> {
    spi: SPI,
    frame_pin: PIN,
}

impl<SPI, PIN> SpiFrameTransport<SPI, PIN>
where
    SPI: SpiBus<u8>,
    PIN: OutputPin,
{
    pub const fn new(spi: SPI, frame_pin: PIN) -> Self {
        Self { spi, frame_pin }
    }

    /// Give back the bus and pin
    pub fn release(self) -> (SPI, PIN) {
        (self.spi, self.frame_pin)
    }
}

impl<SPI, PIN> Transport for SpiFrameTransport<SPI, PIN>
where
    SPI: SpiBus<u8>,
    PIN: OutputPin,
{
    type Error = BusError<SPI::Error, PIN::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.frame_pin.set_low().map_err(BusError::Pin)
    }

    fn teardown(&mut self) {
        let flushed = self.spi.flush();
        let released = self.frame_pin.set_low();
        if flushed.is_err() || released.is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[SpiFrameTransport.teardown] bus did not settle");
        }
    }

    fn begin_frame(&mut self) -> Result<(), Self::Error> {
        self.frame_pin.set_high().map_err(BusError::Pin)
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        self.frame_pin.set_low().map_err(BusError::Pin)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.spi.write(data).map_err(BusError::Spi)?;
        self.spi.flush().map_err(BusError::Spi)?;
        Ok(data.len())
    }
}
