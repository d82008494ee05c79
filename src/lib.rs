#![no_std]

extern crate alloc;

pub mod bounds;
pub mod color;
pub mod error;
pub mod frontend;
pub mod lut;
pub mod mapper;
pub mod math8;
pub mod pattern;
pub mod store;
pub mod transmission;
pub mod transport;

pub use bounds::{ByteRange, LedAddress};
pub use color::{CALIBRATION_BIT, ColorField, Rgb, WIRE_CHANNEL_ORDER};
pub use error::Error;
pub use frontend::{Framebuffer, RasterDisplay, RawDevice, RawHandle};
pub use lut::{BrightnessLut, CoordinateLut, LedCoordinate, LookupTables, PolarLayout};
pub use mapper::{GeometryMapper, RasterSource};
pub use store::{ColorDataStore, FrameStore};
pub use transmission::{
    LoopControl, LoopState, LoopStatus, Tick, TransmissionConfig, TransmissionLoop,
    TransmitPolicy,
};
pub use transport::{BusError, SpiFrameTransport};

pub use embassy_time::Duration;

/// Number of angular sectors in one rotation
pub const SECTOR_COUNT: usize = 150;

/// Number of LEDs in a sector, innermost first
pub const LEDS_PER_SECTOR: usize = 20;

/// Number of color fields per LED
pub const COLOR_FIELD_COUNT: usize = 3;

/// Bytes needed for one sector
pub const SECTOR_BUF_LEN: usize = LEDS_PER_SECTOR * COLOR_FIELD_COUNT;

/// Bytes needed for one full frame
pub const DATA_BUF_LEN: usize = SECTOR_COUNT * SECTOR_BUF_LEN;

/// Width of the raster surface sampled by the coordinate table
pub const RASTER_WIDTH: usize = 40;

/// Height of the raster surface sampled by the coordinate table
pub const RASTER_HEIGHT: usize = 40;

/// Serial bus and frame-signal line the transmission loop drives
///
/// Implement this trait to support different hardware platforms.
/// The transmission loop is the only caller at runtime.
pub trait Transport {
    /// Error reported by the bus
    type Error: core::fmt::Debug;

    /// Bring the bus and frame line into their idle state
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Release the bus and frame line
    fn teardown(&mut self);

    /// Signal the start of a frame
    fn begin_frame(&mut self) -> Result<(), Self::Error>;

    /// Signal the end of a frame
    fn end_frame(&mut self) -> Result<(), Self::Error>;

    /// Write frame bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
}
