//! Error types for HAL operations

use thiserror::Error;

/// HAL result type
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// HAL error type
#[derive(Debug, Error)]
pub enum Error {
    /// Pin, bus or device index outside what the board declares
    #[error("Invalid resource")]
    InvalidResource,
    /// No pin of the board carries the requested name
    #[error("Pin name not found: {0}")]
    PinNotFound(String),
    /// Descriptor storage could not be allocated
    #[error("No resources")]
    NoResources,
    /// Peripheral not present on this board or kernel
    #[error("Peripheral not available")]
    NotAvailable,
    /// Invalid parameter
    #[error("Invalid parameter")]
    InvalidParameter,
    /// Resource busy
    #[error("Resource busy")]
    Busy,
    /// Running hardware does not match any known board
    #[error("Platform not supported")]
    PlatformNotSupported,
    /// Not initialized
    #[error("Not initialized")]
    NotInitialized,
    /// Already initialized
    #[error("Already initialized")]
    AlreadyInitialized,
    /// Kernel device file access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
