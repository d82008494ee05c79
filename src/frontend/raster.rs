//! Pixel surface front end.
//!
//! Exposes the ring as a fixed 40×40 `embedded-graphics` surface. Every
//! mutation of the surface runs exactly one geometry mapper pass before
//! returning, so the store always reflects the latest raster content and
//! never a partially drawn one.

use embedded_graphics::{Drawable, Pixel};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::color::Rgb;
use crate::lut::LookupTables;
use crate::mapper::{GeometryMapper, RasterSource};
use crate::store::FrameStore;
use crate::{Error, RASTER_HEIGHT, RASTER_WIDTH};

/// Raster surface addressed by the coordinate table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[Rgb; RASTER_WIDTH]; RASTER_HEIGHT],
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            pixels: [[Rgb { r: 0, g: 0, b: 0 }; RASTER_WIDTH]; RASTER_HEIGHT],
        }
    }

    /// Set one pixel, ignoring coordinates outside the surface.
    ///
    /// Returns `true` if the pixel was inside the surface.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        match self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        for row in &mut self.pixels {
            row.fill(color);
        }
    }

    fn write_pixels<I>(&mut self, pixels: I)
    where
        I: IntoIterator<Item = Pixel<Rgb888>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y)) else {
                continue;
            };
            self.set_pixel(x, y, Rgb::new(color.r(), color.g(), color.b()));
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSource for Framebuffer {
    fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_default()
    }
}

impl OriginDimensions for Framebuffer {
    #[allow(clippy::cast_possible_truncation)]
    fn size(&self) -> Size {
        Size::new(RASTER_WIDTH as u32, RASTER_HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.write_pixels(pixels);
        Ok(())
    }
}

/// Raster front end publishing into the color store
pub struct RasterDisplay<'a> {
    framebuffer: Framebuffer,
    mapper: GeometryMapper<'a>,
    store: &'a FrameStore,
    updates: u32,
}

impl<'a> RasterDisplay<'a> {
    pub const fn new(luts: &'a LookupTables, store: &'a FrameStore) -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            mapper: GeometryMapper::new(luts),
            store,
            updates: 0,
        }
    }

    /// Current raster content
    pub const fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Number of mapper passes published so far
    pub const fn updates(&self) -> u32 {
        self.updates
    }

    /// Set one pixel and publish.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) -> Result<(), Error> {
        self.framebuffer.set_pixel(x, y, color);
        self.flush()
    }

    /// Fill the whole surface and publish.
    pub fn clear(&mut self, color: Rgb) -> Result<(), Error> {
        self.update(|fb| fb.fill(color))
    }

    /// Render an `embedded-graphics` drawable and publish once.
    ///
    /// Primitives reach the surface through several `draw_iter` and
    /// `fill_solid` calls; the store only sees the finished result.
    pub fn draw<D>(&mut self, drawable: &D) -> Result<D::Output, Error>
    where
        D: Drawable<Color = Rgb888>,
    {
        self.update(|fb| {
            let Ok(output) = drawable.draw(fb);
            output
        })
    }

    /// Apply a batch of changes and publish once.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Framebuffer) -> R) -> Result<R, Error> {
        let result = f(&mut self.framebuffer);
        self.flush()?;
        Ok(result)
    }

    /// Run one mapper pass over the current raster.
    ///
    /// On failure the store keeps the last published frame.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.mapper.publish(&self.framebuffer, self.store)?;
        self.updates = self.updates.wrapping_add(1);
        Ok(())
    }
}
