//! LED HAL traits

use crate::error::Result;

/// Board LED trait
pub trait Led {
    /// Error type
    type Error;

    /// LED name as declared by the board
    fn name(&self) -> &str;

    /// Set the brightness
    fn set_brightness(&mut self, value: u32) -> Result<(), Self::Error>;

    /// Get the current brightness
    fn brightness(&self) -> Result<u32, Self::Error>;

    /// Get the maximum brightness value
    fn max_brightness(&self) -> Result<u32, Self::Error>;

    /// Hand the LED over to a kernel trigger (e.g. `heartbeat`)
    fn set_trigger(&mut self, trigger: &str) -> Result<(), Self::Error>;

    /// Detach any kernel trigger
    fn clear_trigger(&mut self) -> Result<(), Self::Error>;

    /// Turn the LED fully on
    fn on(&mut self) -> Result<(), Self::Error> {
        let max = self.max_brightness()?;
        self.set_brightness(max)
    }

    /// Turn the LED off
    fn off(&mut self) -> Result<(), Self::Error> {
        self.set_brightness(0)
    }
}
