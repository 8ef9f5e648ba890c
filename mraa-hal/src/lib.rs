//! mraa Hardware Abstraction Layer (HAL)
//!
//! Shared types for the I/O layer of embedded Linux single-board computers:
//! the board descriptor every platform fills in at startup, and the
//! peripheral traits the Linux drivers implement on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Application / Driver                         │
//! └──────────────────────────┬──────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────▼──────────────────────────────────────┐
//! │                     mraa-hal                                    │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐    │
//! │  │  Board  │ │  Pins   │ │  Hooks  │ │  GPIO   │ │   LED   │    │
//! │  └────┬────┘ └────┬────┘ └────┬────┘ └────┬────┘ └────┬────┘    │
//! └───────┼───────────┼───────────┼───────────┼───────────┼─────────┘
//!         │           │           │           │           │
//! ┌───────▼───────────▼───────────▼───────────▼───────────▼─────────┐
//! │                     mraa-bsp                                    │
//! │  • platform detection and registry                              │
//! │  • per-board pin tables (RQX-580)                               │
//! │  • sysfs GPIO / LED drivers, spidev SPI                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Board descriptor
//!
//! - [`board::Board`] - pin table, bus lists and counts
//! - [`pin::PinInfo`] - one physical pin and its kernel mappings
//! - [`hooks::AdvancedHooks`] - board-specific override slots
//!
//! # HAL Traits
//!
//! - [`gpio::GpioPin`] / [`gpio::InterruptPin`] - digital I/O pins
//! - [`led::Led`] - board LEDs
//! - [`spi::Spi`] - SPI buses
//!
//! # Usage
//!
//! ```
//! use mraa_hal::prelude::*;
//!
//! let mut board = Board::new("DEMO", 3)?;
//! let gpio = PinCapabilities::VALID | PinCapabilities::GPIO;
//! board.set_pin_info(1, "GPIO0", gpio, Some(216))?;
//! board.set_pin_info(2, "GND", PinCapabilities::RESERVED, None)?;
//!
//! let index = board.pin_index("GPIO0")?;
//! assert_eq!(board.pin(index).and_then(|p| p.gpio_line()), Some(216));
//! # Ok::<(), mraa_hal::Error>(())
//! ```

pub mod board;
pub mod error;
pub mod gpio;
pub mod hooks;
pub mod led;
pub mod pin;
pub mod prelude;
pub mod spi;

// Re-exports
pub use error::{Error, Result};
