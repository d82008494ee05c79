use core::fmt;

/// Errors reported by the driver core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Offset/length pair does not fit inside the color buffer
    OutOfBounds { offset: usize, length: usize },
    /// A scratch buffer could not be allocated
    AllocationFailure,
    /// The transport refused to initialize
    TransportInit,
    /// The raw device is already open
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { offset, length } => {
                write!(f, "range {offset}+{length} is out of bounds")
            }
            Self::AllocationFailure => f.write_str("scratch buffer allocation failed"),
            Self::TransportInit => f.write_str("transport initialization failed"),
            Self::Busy => f.write_str("device already open"),
        }
    }
}

impl core::error::Error for Error {}
