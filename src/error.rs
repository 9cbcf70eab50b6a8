use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    /// A background task could not be spawned.
    #[cfg(feature = "arm")]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    /// An SPI transaction to the MAX7219 chain failed.
    #[display("SPI transfer to the matrix failed: {_0:?}")]
    Spi(#[error(not(source))] embedded_hal::spi::ErrorKind),

    /// A module range was empty or ran past the end of the chain.
    #[display("module range {start}..={end} is not valid for this display")]
    ModuleRange {
        /// First module of the requested range.
        start: usize,
        /// Last module of the requested range.
        end: usize,
    },

    /// A column index was past the left edge of the display.
    #[display("column {_0} is out of bounds")]
    ColumnOutOfBounds(#[error(not(source))] usize),

    /// MAX7219 intensity is a 4-bit value.
    #[display("intensity {_0} is out of range (0..=15)")]
    IntensityOutOfRange(#[error(not(source))] u8),
}

#[cfg(feature = "arm")]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
