//! Board support for embedded Linux single-board computers
//!
//! This crate fills in the [`Board`] descriptor of each supported platform
//! and drives its pins through the kernel's sysfs and spidev interfaces.
//!
//! # Supported Boards
//!
//! - **ADLINK ROSCube-X 580** (RQX-580): Jetson Xavier NX, 50-pin DB50 connector
//!
//! # Bring-up
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  platform::init                                          │
//! │    detect()  ── /proc/device-tree/model                  │
//! │    build()   ── boards::<board>::init                     │
//! │                   pin table, LEDs, UARTs                 │
//! │                   SPI pins by name                       │
//! │                   I2C adapter via probe                  │
//! │    registry  ── with_board() / deinit()                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every kernel path is resolved through [`config::PlatformConfig`], so the
//! whole stack can run against a fake sysfs tree (`MRAA_SYSFS_ROOT`).

pub mod boards;
pub mod config;
pub mod drivers;
pub mod platform;
pub mod probe;

// Re-export HAL types
pub use mraa_hal::prelude::*;

pub use config::PlatformConfig;
pub use platform::Platform;
