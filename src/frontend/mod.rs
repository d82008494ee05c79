//! Producers that feed the color store.

mod raster;
mod raw;

pub use raster::{Framebuffer, RasterDisplay};
pub use raw::{RawDevice, RawHandle};
