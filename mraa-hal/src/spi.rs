//! SPI (Serial Peripheral Interface) HAL traits
//!
//! A bus handle carries one [`SpiConfig`]; every setter replaces a single
//! field and pushes the whole configuration to the controller again.

use crate::error::{Error, Result};

/// Clock polarity and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

/// Order bits are shifted out in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Bus settings applied when a device is opened or reconfigured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock mode
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
    /// Maximum clock frequency in Hz
    pub frequency: u32,
    /// Word size in bits
    pub bits_per_word: u8,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            frequency: 4_000_000,
            bits_per_word: 8,
        }
    }
}

impl SpiConfig {
    /// Reject settings no controller accepts
    pub fn validate(&self) -> Result<()> {
        if self.frequency == 0 || !(1..=32).contains(&self.bits_per_word) {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }
}

/// Full-duplex SPI bus
pub trait Spi {
    /// Error type
    type Error;

    /// Settings currently in effect
    fn config(&self) -> SpiConfig;

    /// Apply a complete configuration
    fn configure(&mut self, config: SpiConfig) -> Result<(), Self::Error>;

    /// Clock `write` out while filling `read`, both the same length
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;

    /// Set the maximum clock frequency
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        let config = SpiConfig {
            frequency: hz,
            ..self.config()
        };
        self.configure(config)
    }

    /// Set the clock mode
    fn set_mode(&mut self, mode: SpiMode) -> Result<(), Self::Error> {
        let config = SpiConfig {
            mode,
            ..self.config()
        };
        self.configure(config)
    }

    /// Select LSB-first (`true`) or MSB-first transfers
    fn set_lsb_mode(&mut self, lsb: bool) -> Result<(), Self::Error> {
        let bit_order = if lsb {
            BitOrder::LsbFirst
        } else {
            BitOrder::MsbFirst
        };
        let config = SpiConfig {
            bit_order,
            ..self.config()
        };
        self.configure(config)
    }

    /// Set the word size
    fn set_bits_per_word(&mut self, bits: u8) -> Result<(), Self::Error> {
        let config = SpiConfig {
            bits_per_word: bits,
            ..self.config()
        };
        self.configure(config)
    }

    /// Send `data`, returning what was clocked in
    fn write(&mut self, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let mut received = vec![0; data.len()];
        self.transfer(data, &mut received)?;
        Ok(received)
    }

    /// Send one byte
    fn write_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut received = [0u8];
        self.transfer(&[byte], &mut received)?;
        Ok(received[0])
    }

    /// Send one 16-bit word in the controller's native (little-endian) order
    fn write_word(&mut self, word: u16) -> Result<u16, Self::Error> {
        let mut received = [0u8; 2];
        self.transfer(&word.to_le_bytes(), &mut received)?;
        Ok(u16::from_le_bytes(received))
    }
}
