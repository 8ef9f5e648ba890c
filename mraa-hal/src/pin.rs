//! Physical pin descriptors
//!
//! Every header position of a board is described by a [`PinInfo`]: a bounded
//! name, the set of functions the pin can take and the kernel mapping for each
//! of those functions.

use bitflags::bitflags;

/// Maximum stored length of a pin name, in bytes
pub const PIN_NAME_SIZE: usize = 12;

/// Name given to table slots the board never declares
pub const UNDECLARED_PIN_NAME: &str = "INVALID";

bitflags! {
    /// Functions a physical pin can be used for
    ///
    /// The empty set marks a reserved pin: ground, power, isolation or an
    /// unpopulated position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PinCapabilities: u8 {
        /// Pin is usable at all
        const VALID = 1 << 0;
        /// General purpose digital I/O
        const GPIO = 1 << 1;
        /// PWM output
        const PWM = 1 << 2;
        /// Memory-mapped fast GPIO
        const FAST_GPIO = 1 << 3;
        /// SPI signal
        const SPI = 1 << 4;
        /// I2C signal
        const I2C = 1 << 5;
        /// Analog input
        const AIO = 1 << 6;
        /// UART signal
        const UART = 1 << 7;
    }
}

impl PinCapabilities {
    /// Capability set of a pin with no usable function
    pub const RESERVED: Self = Self::empty();

    /// Check if the pin has no usable function
    pub fn is_reserved(&self) -> bool {
        self.is_empty()
    }
}

/// Kernel mapping of one pin function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinMap {
    /// Kernel line number or bus selector, `None` when unmapped
    pub pinmap: Option<u32>,
    /// Number of mux settings required before the function is routed
    pub mux_total: u8,
}

/// Descriptor of one physical pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinInfo {
    name: String,
    /// Functions the pin supports
    pub capabilities: PinCapabilities,
    /// GPIO mapping, present iff `capabilities` has `GPIO`
    pub gpio: Option<PinMap>,
    /// I2C mapping, present iff `capabilities` has `I2C`
    pub i2c: Option<PinMap>,
    /// SPI mapping, present iff `capabilities` has `SPI`
    pub spi: Option<PinMap>,
    /// UART mapping, present iff `capabilities` has `UART`
    pub uart: Option<PinMap>,
}

impl PinInfo {
    /// Build a pin from its table entry
    ///
    /// `sysfs_pin` is the kernel GPIO line and is only recorded for
    /// GPIO-capable pins.
    pub fn new(name: &str, capabilities: PinCapabilities, sysfs_pin: Option<u32>) -> Self {
        let gpio = capabilities.contains(PinCapabilities::GPIO).then_some(PinMap {
            pinmap: sysfs_pin,
            mux_total: 0,
        });
        let i2c = capabilities.contains(PinCapabilities::I2C).then_some(PinMap {
            pinmap: Some(1),
            mux_total: 0,
        });
        let spi = capabilities
            .contains(PinCapabilities::SPI)
            .then_some(PinMap::default());
        let uart = capabilities
            .contains(PinCapabilities::UART)
            .then_some(PinMap::default());

        Self {
            name: bounded_name(name).to_owned(),
            capabilities,
            gpio,
            i2c,
            spi,
            uart,
        }
    }

    /// Placeholder for table slots the board does not declare
    pub fn undeclared() -> Self {
        Self::new(UNDECLARED_PIN_NAME, PinCapabilities::RESERVED, None)
    }

    /// Pin name, at most [`PIN_NAME_SIZE`] bytes
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compare against a requested name, bounded like the stored name
    pub fn name_matches(&self, name: &str) -> bool {
        self.name == bounded_name(name)
    }

    /// Kernel GPIO line, if the pin is GPIO capable and mapped
    pub fn gpio_line(&self) -> Option<u32> {
        self.gpio.and_then(|map| map.pinmap)
    }
}

/// Truncate a name to [`PIN_NAME_SIZE`] bytes on a char boundary
pub fn bounded_name(name: &str) -> &str {
    if name.len() <= PIN_NAME_SIZE {
        return name;
    }
    let mut end = PIN_NAME_SIZE;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
