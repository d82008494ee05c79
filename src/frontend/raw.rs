//! Byte-addressed access to the color store.
//!
//! Mirrors a character device: one client at a time, positional reads and
//! writes over `[0, DATA_BUF_LEN)`.

use core::cell::Cell;

use critical_section::Mutex;

use crate::Error;
use crate::store::FrameStore;

/// Raw front end over a [`FrameStore`]
pub struct RawDevice<'a> {
    store: &'a FrameStore,
    open: Mutex<Cell<bool>>,
}

impl<'a> RawDevice<'a> {
    pub const fn new(store: &'a FrameStore) -> Self {
        Self {
            store,
            open: Mutex::new(Cell::new(false)),
        }
    }

    /// Claim the device.
    ///
    /// Returns `Err(Error::Busy)` while another handle is alive.
    pub fn open(&self) -> Result<RawHandle<'_, 'a>, Error> {
        let claimed = critical_section::with(|cs| self.open.borrow(cs).replace(true));
        if claimed {
            return Err(Error::Busy);
        }
        Ok(RawHandle { device: self })
    }

    pub fn is_open(&self) -> bool {
        critical_section::with(|cs| self.open.borrow(cs).get())
    }
}

/// Open handle on a [`RawDevice`], released on drop
pub struct RawHandle<'d, 'a> {
    device: &'d RawDevice<'a>,
}

impl RawHandle<'_, '_> {
    /// Size of the addressable space in bytes
    pub const fn len(&self) -> usize {
        self.device.store.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.device.store.is_empty()
    }

    /// Read `buf.len()` bytes starting at `offset`.
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, Error> {
        self.device.store.get(buf, offset)?;
        Ok(buf.len())
    }

    /// Write `data` starting at `offset`.
    ///
    /// Out-of-range requests are rejected whole.
    pub fn write_at(&self, offset: usize, data: &[u8]) -> Result<usize, Error> {
        self.device.store.set(data, offset)?;
        Ok(data.len())
    }
}

impl Drop for RawHandle<'_, '_> {
    fn drop(&mut self) {
        critical_section::with(|cs| self.device.open.borrow(cs).set(false));
    }
}
