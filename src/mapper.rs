//! Geometry mapper.
//!
//! Turns a rectangular raster into the sector-ordered byte stream the ring
//! expects: every LED samples its pixel from the coordinate table, each field
//! goes through the brightness table, and the result is encoded in wire order
//! with the calibration bit set.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Rgb, to_wire};
use crate::lut::LookupTables;
use crate::store::{FrameStore, try_alloc_frame};
use crate::{COLOR_FIELD_COUNT, DATA_BUF_LEN, Error, LEDS_PER_SECTOR, SECTOR_COUNT};

/// Pixel surface the mapper samples from
pub trait RasterSource {
    /// Pixel at `(x, y)`, black when outside the surface
    fn pixel(&self, x: usize, y: usize) -> Rgb;
}

/// Raster to ring converter
#[derive(Clone, Copy)]
pub struct GeometryMapper<'a> {
    luts: &'a LookupTables,
}

impl<'a> GeometryMapper<'a> {
    pub const fn new(luts: &'a LookupTables) -> Self {
        Self { luts }
    }

    /// Map `raster` into `out` in one pass.
    ///
    /// Pure: the same raster and tables always produce the same bytes.
    pub fn map_into<R: RasterSource + ?Sized>(&self, raster: &R, out: &mut [u8; DATA_BUF_LEN]) {
        let coordinates = &self.luts.coordinates;
        let brightness = &self.luts.brightness;

        let mut leds = out.chunks_exact_mut(COLOR_FIELD_COUNT);
        for sector in 0..SECTOR_COUNT {
            for led in 0..LEDS_PER_SECTOR {
                let Some(dest) = leds.next() else {
                    return;
                };
                let coord = coordinates.get(sector, led);
                let pixel = raster.pixel(coord.x as usize, coord.y as usize);
                let corrected = Rgb {
                    r: brightness.correct(led, pixel.r),
                    g: brightness.correct(led, pixel.g),
                    b: brightness.correct(led, pixel.b),
                };
                dest.copy_from_slice(&to_wire(corrected));
            }
        }
    }

    /// Map `raster` and publish the result into `store`.
    ///
    /// The scratch frame is allocated before the store lock is taken. On
    /// allocation failure the store keeps its previous frame.
    pub fn publish<R: RasterSource + ?Sized>(
        &self,
        raster: &R,
        store: &FrameStore,
    ) -> Result<(), Error> {
        let mut scratch = try_alloc_frame::<DATA_BUF_LEN>().inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!("[GeometryMapper.publish] dropping update: {}", _err);
        })?;
        self.map_into(raster, &mut scratch);
        store.set(scratch.as_slice(), 0)
    }
}
