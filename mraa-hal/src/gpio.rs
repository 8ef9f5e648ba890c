//! GPIO (General Purpose Input/Output) HAL traits
//!
//! This module defines the GPIO abstraction for digital I/O pins.

use crate::error::Result;

/// Pin direction, as understood by the kernel GPIO class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input
    In,
    /// Output, initial level unspecified
    Out,
    /// Output, glitch-free start at high
    OutHigh,
    /// Output, glitch-free start at low
    OutLow,
}

impl Direction {
    /// Value written to the sysfs `direction` attribute
    pub fn as_sysfs(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::OutHigh => "high",
            Direction::OutLow => "low",
        }
    }

    /// Parse the sysfs `direction` attribute
    pub fn from_sysfs(value: &str) -> Option<Self> {
        match value.trim() {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "high" => Some(Direction::OutHigh),
            "low" => Some(Direction::OutLow),
            _ => None,
        }
    }
}

/// Digital logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Logic low (0V)
    Low,
    /// Logic high (VCC)
    High,
}

impl Level {
    /// Opposite level
    pub fn toggle(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    /// Value written to the sysfs `value` attribute
    pub fn as_sysfs(self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }

    /// Parse the sysfs `value` attribute; any non-zero number is high
    pub fn from_sysfs(value: &str) -> Option<Self> {
        match value.trim().parse::<i64>().ok()? {
            0 => Some(Level::Low),
            _ => Some(Level::High),
        }
    }
}

/// Edge detection for interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// No edge detection
    None,
    /// Rising edge (low to high)
    Rising,
    /// Falling edge (high to low)
    Falling,
    /// Both edges
    Both,
}

impl Edge {
    /// Value written to the sysfs `edge` attribute
    pub fn as_sysfs(self) -> &'static str {
        match self {
            Edge::None => "none",
            Edge::Rising => "rising",
            Edge::Falling => "falling",
            Edge::Both => "both",
        }
    }
}

/// Interrupt callback, run on the pin's watcher thread once per latched edge
pub type IsrHandler = Box<dyn FnMut() + Send + 'static>;

/// GPIO pin trait
pub trait GpioPin {
    /// Error type for GPIO operations
    type Error;

    /// Board pin index this handle was opened on
    fn pin_number(&self) -> usize;

    /// Kernel GPIO line backing the pin
    fn line(&self) -> u32;

    /// Set pin direction
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Get current pin direction
    fn direction(&self) -> Result<Direction, Self::Error>;

    /// Read the current logic level
    fn read(&self) -> Result<Level, Self::Error>;

    /// Write a logic level (for output pins)
    fn write(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Drive the opposite of the level read back
    fn toggle(&mut self) -> Result<(), Self::Error> {
        let level = self.read()?.toggle();
        self.write(level)
    }

    /// Whether the line reads high
    fn is_high(&self) -> Result<bool, Self::Error> {
        self.read().map(|level| level == Level::High)
    }

    /// Drive the line high
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(Level::High)
    }

    /// Drive the line low
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(Level::Low)
    }
}

/// GPIO pin with interrupt support
pub trait InterruptPin: GpioPin {
    /// Configure edge detection without installing a handler
    fn set_edge(&mut self, edge: Edge) -> Result<(), Self::Error>;

    /// Install a handler fired on the given edge
    fn isr(&mut self, edge: Edge, handler: IsrHandler) -> Result<(), Self::Error>;

    /// Remove the handler and stop edge detection
    ///
    /// Reports a watcher that died on its own since the handler was installed.
    fn isr_exit(&mut self) -> Result<(), Self::Error>;

    /// Check if a handler is installed and still being served
    fn has_isr(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(Level::from_sysfs("0\n"), Some(Level::Low));
        assert_eq!(Level::from_sysfs("1\n"), Some(Level::High));
        assert_eq!(Level::from_sysfs("255"), Some(Level::High));
        assert_eq!(Level::from_sysfs("x"), None);
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in [Direction::In, Direction::Out, Direction::OutHigh, Direction::OutLow] {
            assert_eq!(Direction::from_sysfs(dir.as_sysfs()), Some(dir));
        }
        assert_eq!(Direction::from_sysfs("sideways"), None);
    }

    #[test]
    fn test_edge_attribute_values() {
        assert_eq!(Edge::None.as_sysfs(), "none");
        assert_eq!(Edge::Rising.as_sysfs(), "rising");
        assert_eq!(Edge::Falling.as_sysfs(), "falling");
        assert_eq!(Edge::Both.as_sysfs(), "both");
        assert_eq!(Level::High.toggle(), Level::Low);
    }
}
