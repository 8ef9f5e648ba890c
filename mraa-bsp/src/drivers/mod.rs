//! Linux peripheral drivers

pub mod sysfs;

#[cfg(feature = "gpio")]
pub mod gpio;

#[cfg(feature = "led")]
pub mod led;

#[cfg(feature = "spi")]
pub mod spi;
