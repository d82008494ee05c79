use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Bit forced on every byte sent to the ring
///
/// The LED controllers latch 7-bit intensities and treat the high bit as a
/// data marker, so an LED byte is never below `0x80`.
pub const CALIBRATION_BIT: u8 = 0x80;

/// One color field of a raster pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Red,
    Green,
    Blue,
}

impl ColorField {
    /// Read this field from a pixel
    pub const fn of(self, pixel: Rgb) -> u8 {
        match self {
            Self::Red => pixel.r,
            Self::Green => pixel.g,
            Self::Blue => pixel.b,
        }
    }
}

/// Order in which color fields of one LED are sent over the bus
///
/// Matches the strip wiring. Verify against the hardware before changing.
pub const WIRE_CHANNEL_ORDER: [ColorField; 3] =
    [ColorField::Green, ColorField::Red, ColorField::Blue];

/// Encode a corrected pixel into LED wire bytes
#[inline]
pub const fn to_wire(pixel: Rgb) -> [u8; 3] {
    [
        WIRE_CHANNEL_ORDER[0].of(pixel) | CALIBRATION_BIT,
        WIRE_CHANNEL_ORDER[1].of(pixel) | CALIBRATION_BIT,
        WIRE_CHANNEL_ORDER[2].of(pixel) | CALIBRATION_BIT,
    ]
}
