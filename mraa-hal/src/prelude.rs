//! Prelude module for convenient imports

pub use crate::board::{Board, I2cBus, LedDev, PwmParams, SpiBus, SpiPinNames, UartDev};
pub use crate::error::{Error, Result};
pub use crate::gpio::{Direction, Edge, GpioPin, InterruptPin, IsrHandler, Level};
pub use crate::hooks::{AdvancedHooks, NoHooks};
pub use crate::led::Led;
pub use crate::pin::{PinCapabilities, PinInfo, PinMap};
pub use crate::spi::{BitOrder, Spi, SpiConfig, SpiMode};
