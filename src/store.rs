//! Shared color data store.
//!
//! Holds the authoritative frame and its dirty flag as one unit behind a
//! `critical-section` mutex, so a writer's copy and flag update (and a
//! reader's copy and flag clear) are indivisible. Producers and the
//! transmission loop may call into it from any thread or interrupt.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;

use critical_section::Mutex;

use crate::bounds::ByteRange;
use crate::{DATA_BUF_LEN, Error};

/// Store sized for one full ring frame.
pub type FrameStore = ColorDataStore<DATA_BUF_LEN>;

struct ColorData<const SIZE: usize> {
    buf: [u8; SIZE],
    dirty: bool,
}

/// The single authoritative color buffer.
///
/// Backed by a fixed-size array; no method allocates or performs I/O while
/// the lock is held.
pub struct ColorDataStore<const SIZE: usize> {
    inner: Mutex<RefCell<ColorData<SIZE>>>,
}

impl<const SIZE: usize> ColorDataStore<SIZE> {
    /// Create a new store with all fields zeroed and nothing pending.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ColorData {
                buf: [0; SIZE],
                dirty: false,
            })),
        }
    }

    /// Size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        SIZE
    }

    pub const fn is_empty(&self) -> bool {
        SIZE == 0
    }

    /// Copy `data` into the buffer at `offset` and mark it dirty.
    ///
    /// Returns `Err(Error::OutOfBounds)` without touching the buffer if the
    /// range does not fit.
    pub fn set(&self, data: &[u8], offset: usize) -> Result<(), Error> {
        let range = ByteRange::checked(offset, data.len(), SIZE)?;
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.buf[range.start..range.end].copy_from_slice(data);
            inner.dirty = true;
        });
        Ok(())
    }

    /// Read `dest.len()` bytes starting at `offset`.
    ///
    /// Does not affect the dirty flag.
    pub fn get(&self, dest: &mut [u8], offset: usize) -> Result<(), Error> {
        let range = ByteRange::checked(offset, dest.len(), SIZE)?;
        critical_section::with(|cs| {
            let inner = self.inner.borrow_ref(cs);
            dest.copy_from_slice(&inner.buf[range.start..range.end]);
        });
        Ok(())
    }

    /// Copy the whole buffer into `dest` if it changed since the last copy.
    ///
    /// Returns `true` if a copy happened. `dest` is left untouched otherwise.
    pub fn copy_out_if_dirty(&self, dest: &mut [u8; SIZE]) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if !inner.dirty {
                return false;
            }
            dest.copy_from_slice(&inner.buf);
            inner.dirty = false;
            true
        })
    }

    /// Copy the whole buffer into `dest` regardless of the dirty flag.
    pub fn copy_out(&self, dest: &mut [u8; SIZE]) {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            dest.copy_from_slice(&inner.buf);
            inner.dirty = false;
        });
    }

    /// Check whether a write is waiting to be copied out.
    pub fn is_dirty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dirty)
    }
}

impl<const SIZE: usize> Default for ColorDataStore<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocate a zeroed scratch frame on the heap.
///
/// Must be called outside any critical section.
pub fn try_alloc_frame<const SIZE: usize>() -> Result<Box<[u8; SIZE]>, Error> {
    try_alloc_bytes(SIZE)?
        .into_boxed_slice()
        .try_into()
        .map_err(|_| Error::AllocationFailure)
}

/// Allocate `len` zeroed bytes, reporting failure instead of aborting.
pub fn try_alloc_bytes(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure)?;
    buf.resize(len, 0);
    Ok(buf)
}
