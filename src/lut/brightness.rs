//! Per-LED brightness correction.

use crate::LEDS_PER_SECTOR;
use crate::math8::{lerp8, scale8};

/// Gamma 2.2 lookup table scaled to 7-bit output.
/// Pre-computed to avoid floating point math: corrected = (value/255)^2.2 * 127
pub const GAMMA_7BIT: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3,
    3, 3, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6,
    6, 6, 6, 7, 7, 7, 7, 8, 8, 8, 8, 9, 9, 9, 9, 10,
    10, 10, 10, 11, 11, 11, 12, 12, 12, 13, 13, 13, 13, 14, 14, 14,
    15, 15, 15, 16, 16, 17, 17, 17, 18, 18, 18, 19, 19, 20, 20, 20,
    21, 21, 22, 22, 22, 23, 23, 24, 24, 25, 25, 26, 26, 26, 27, 27,
    28, 28, 29, 29, 30, 30, 31, 31, 32, 32, 33, 33, 34, 34, 35, 36,
    36, 37, 37, 38, 38, 39, 40, 40, 41, 41, 42, 42, 43, 44, 44, 45,
    46, 46, 47, 47, 48, 49, 49, 50, 51, 51, 52, 53, 53, 54, 55, 55,
    56, 57, 58, 58, 59, 60, 60, 61, 62, 63, 63, 64, 65, 66, 66, 67,
    68, 69, 70, 70, 71, 72, 73, 74, 74, 75, 76, 77, 78, 79, 79, 80,
    81, 82, 83, 84, 85, 85, 86, 87, 88, 89, 90, 91, 92, 93, 94, 95,
    95, 96, 97, 98, 99, 100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110,
    111, 112, 113, 114, 115, 116, 117, 118, 119, 121, 122, 123, 124, 125, 126, 127,
];

/// Brightness correction indexed by LED position and raw channel value.
#[derive(Debug, Clone)]
pub struct BrightnessLut {
    tables: [[u8; 256]; LEDS_PER_SECTOR],
}

impl BrightnessLut {
    /// Same gamma curve for every LED.
    pub const fn uniform() -> Self {
        Self::radial(255)
    }

    /// Gamma curve scaled down towards the hub.
    ///
    /// The innermost LED is scaled by `floor`, the outermost is left at full
    /// scale, LEDs in between ramp linearly.
    pub const fn radial(floor: u8) -> Self {
        let mut tables = [[0u8; 256]; LEDS_PER_SECTOR];
        let mut led = 0;
        while led < LEDS_PER_SECTOR {
            let scale = lerp8(floor, 255, led, LEDS_PER_SECTOR - 1);
            let mut raw = 0;
            while raw < 256 {
                tables[led][raw] = scale8(GAMMA_7BIT[raw], scale);
                raw += 1;
            }
            led += 1;
        }
        Self { tables }
    }

    /// Corrected intensity for `raw` on LED `led` of a sector.
    #[inline]
    pub const fn correct(&self, led: usize, raw: u8) -> u8 {
        self.tables[led][raw as usize]
    }
}

impl Default for BrightnessLut {
    fn default() -> Self {
        Self::uniform()
    }
}
