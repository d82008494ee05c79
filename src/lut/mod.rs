//! Lookup tables shared by the geometry mapper.
//!
//! Built once at startup and only ever read afterwards; owners hand out
//! `&LookupTables` to every producer.

mod brightness;
mod coordinates;

pub use brightness::{BrightnessLut, GAMMA_7BIT};
pub use coordinates::{CoordinateLut, LedCoordinate, PolarLayout};

/// Both tables the mapper needs
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub coordinates: CoordinateLut,
    pub brightness: BrightnessLut,
}

impl LookupTables {
    pub const fn new(coordinates: CoordinateLut, brightness: BrightnessLut) -> Self {
        Self {
            coordinates,
            brightness,
        }
    }
}
