use crate::{COLOR_FIELD_COUNT, Error, LEDS_PER_SECTOR};

/// Validated byte range inside a color buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Validate `offset`/`length` against a buffer of `size` bytes
    ///
    /// The offset must point inside the buffer even for empty ranges.
    pub const fn checked(offset: usize, length: usize, size: usize) -> Result<Self, Error> {
        if length > size || offset >= size {
            return Err(Error::OutOfBounds { offset, length });
        }
        match offset.checked_add(length) {
            Some(end) if end <= size => Ok(Self { start: offset, end }),
            _ => Err(Error::OutOfBounds { offset, length }),
        }
    }

    /// Get the number of bytes in the range
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Physical address of one LED on the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedAddress {
    pub sector: usize,
    pub led: usize,
}

impl LedAddress {
    pub const fn new(sector: usize, led: usize) -> Self {
        Self { sector, led }
    }

    /// Offset of the LED's first color field in a frame buffer
    pub const fn byte_offset(self) -> usize {
        (self.sector * LEDS_PER_SECTOR + self.led) * COLOR_FIELD_COUNT
    }
}
