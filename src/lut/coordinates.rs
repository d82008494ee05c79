//! Raster coordinate sampled by every LED.

use core::f32::consts::TAU;

use crate::{LEDS_PER_SECTOR, RASTER_HEIGHT, RASTER_WIDTH, SECTOR_COUNT};

/// Raster pixel sampled by one LED
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedCoordinate {
    pub x: u8,
    pub y: u8,
}

impl LedCoordinate {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Placement of the LED ring over the raster
#[derive(Debug, Clone, Copy)]
pub struct PolarLayout {
    /// Raster x of the rotation axis
    pub center_x: f32,
    /// Raster y of the rotation axis
    pub center_y: f32,
    /// Distance of LED 0 from the axis, in pixels
    pub inner_radius: f32,
    /// Distance between neighbouring LEDs, in pixels
    pub pitch: f32,
    /// Angle of sector 0 in radians, counter-clockwise from +x
    pub phase: f32,
}

impl Default for PolarLayout {
    #[allow(clippy::cast_precision_loss)]
    fn default() -> Self {
        Self {
            center_x: RASTER_WIDTH as f32 / 2.0,
            center_y: RASTER_HEIGHT as f32 / 2.0,
            inner_radius: 0.5,
            pitch: 1.0,
            phase: 0.0,
        }
    }
}

/// Coordinate table indexed by `[sector][led]`
#[derive(Debug, Clone)]
pub struct CoordinateLut {
    coords: [[LedCoordinate; LEDS_PER_SECTOR]; SECTOR_COUNT],
}

impl CoordinateLut {
    /// Build the table from a polar layout.
    ///
    /// Positions are floored to the containing pixel and clamped to the raster.
    #[allow(clippy::cast_precision_loss)]
    pub fn polar(layout: &PolarLayout) -> Self {
        Self::from_fn(|sector, led| {
            let theta = layout.phase + TAU * sector as f32 / SECTOR_COUNT as f32;
            let radius = layout.inner_radius + layout.pitch * led as f32;
            let x = layout.center_x + radius * libm::cosf(theta);
            // Raster rows grow downwards
            let y = layout.center_y - radius * libm::sinf(theta);
            LedCoordinate::new(to_pixel(x, RASTER_WIDTH), to_pixel(y, RASTER_HEIGHT))
        })
    }

    /// Build the table from an arbitrary mapping.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> LedCoordinate) -> Self {
        let mut coords = [[LedCoordinate::default(); LEDS_PER_SECTOR]; SECTOR_COUNT];
        for (sector, row) in coords.iter_mut().enumerate() {
            for (led, coord) in row.iter_mut().enumerate() {
                *coord = f(sector, led);
            }
        }
        Self { coords }
    }

    #[inline]
    pub const fn get(&self, sector: usize, led: usize) -> LedCoordinate {
        self.coords[sector][led]
    }
}

impl Default for CoordinateLut {
    fn default() -> Self {
        Self::polar(&PolarLayout::default())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn to_pixel(value: f32, extent: usize) -> u8 {
    libm::floorf(value).clamp(0.0, (extent - 1) as f32) as u8
}
