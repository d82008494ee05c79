/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Linear ramp from `from` at `index == 0` to `to` at `index == last`
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn lerp8(from: u8, to: u8, index: usize, last: usize) -> u8 {
    if last == 0 || index >= last {
        return to;
    }
    let from = from as usize;
    let to = to as usize;
    if to >= from {
        (from + (to - from) * index / last) as u8
    } else {
        (from - (from - to) * index / last) as u8
    }
}
