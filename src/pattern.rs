//! Bring-up frame for checking LED wiring.

use crate::{COLOR_FIELD_COUNT, LEDS_PER_SECTOR};

const FULL: u8 = 0xFF;
const OFF: u8 = 0x80;

/// Five-step diagonal stripes: red, green, blue, then two dark LEDs.
///
/// Each step shifts by one LED per sector, so a correctly wired ring shows
/// spirals. Values are already in wire form.
const STRIPES: [[u8; COLOR_FIELD_COUNT]; 5] = [
    [FULL, OFF, OFF],
    [OFF, FULL, OFF],
    [OFF, OFF, FULL],
    [OFF, OFF, OFF],
    [OFF, OFF, OFF],
];

/// Fill a sector-ordered frame with the stripe pattern.
///
/// A trailing partial LED is left untouched.
pub fn fill_diagonal_stripes(out: &mut [u8]) {
    for (index, led) in out.chunks_exact_mut(COLOR_FIELD_COUNT).enumerate() {
        let sector = index / LEDS_PER_SECTOR;
        let position = index % LEDS_PER_SECTOR;
        led.copy_from_slice(&STRIPES[(sector + position) % STRIPES.len()]);
    }
}
