//! Board descriptor
//!
//! A [`Board`] is the complete static description of one hardware platform:
//! its physical pin table plus the SPI, I2C, UART and LED buses wired to those
//! pins. Board initializers fill one in once; after that it is only read.
//!
//! Bus descriptors refer to pins by index into the pin table. Those indices
//! are resolved by name at init time, and a role whose pin cannot be found
//! stays `None` while the bus itself stays uncounted.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::error::{Error, Result};
use crate::hooks::{AdvancedHooks, NoHooks};
use crate::pin::{PinCapabilities, PinInfo};

/// Maximum number of SPI buses a board can declare
pub const MAX_SPI_BUS_COUNT: usize = 12;
/// Maximum number of I2C buses a board can declare
pub const MAX_I2C_BUS_COUNT: usize = 12;
/// Maximum number of UART devices a board can declare
pub const MAX_UART_COUNT: usize = 6;
/// Maximum number of LEDs a board can declare
pub const MAX_LED_COUNT: usize = 12;

/// SPI bus wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpiBus {
    /// Kernel bus number (`spidev<bus_id>.x`)
    pub bus_id: u32,
    /// Chip select number (`spidevx.<slave_s>`)
    pub slave_s: u32,
    /// Chip select pin
    pub cs: Option<usize>,
    /// MOSI pin
    pub mosi: Option<usize>,
    /// MISO pin
    pub miso: Option<usize>,
    /// Clock pin
    pub sclk: Option<usize>,
}

/// Names of the pins carrying each SPI role
#[derive(Debug, Clone, Copy)]
pub struct SpiPinNames<'a> {
    /// Chip select
    pub cs: &'a str,
    /// Master out, slave in
    pub mosi: &'a str,
    /// Master in, slave out
    pub miso: &'a str,
    /// Clock
    pub sclk: &'a str,
}

/// I2C bus wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I2cBus {
    /// Kernel adapter number (`/dev/i2c-<bus_id>`)
    pub bus_id: u32,
    /// Data pin
    pub sda: Option<usize>,
    /// Clock pin
    pub scl: Option<usize>,
}

/// UART device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UartDev {
    /// Position in the board's UART list
    pub index: usize,
    /// Connector label
    pub name: String,
    /// Character device path
    pub device_path: String,
    /// Transmit pin
    pub tx: Option<usize>,
    /// Receive pin
    pub rx: Option<usize>,
    /// Clear-to-send pin
    pub cts: Option<usize>,
    /// Request-to-send pin
    pub rts: Option<usize>,
}

/// LED device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedDev {
    /// Name under the kernel LED class
    pub name: String,
}

/// PWM period bounds, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmParams {
    /// Period applied when a channel is opened
    pub default_period: u32,
    /// Largest accepted period
    pub max_period: u32,
    /// Smallest accepted period
    pub min_period: u32,
}

/// Complete description of one platform's addressable peripherals
#[derive(Debug)]
pub struct Board {
    /// Platform name
    pub platform_name: String,
    /// Number of physical pin slots
    pub phy_pin_count: usize,
    /// Number of GPIO-capable header pins
    pub gpio_count: usize,
    /// Whether the board uses the GPIO character device instead of sysfs
    pub chardev_capable: bool,
    pins: Vec<PinInfo>,
    /// SPI buses, valid up to `spi_bus_count`
    pub spi_bus: [SpiBus; MAX_SPI_BUS_COUNT],
    /// Number of configured SPI buses
    pub spi_bus_count: usize,
    /// I2C buses, valid up to `i2c_bus_count`
    pub i2c_bus: [I2cBus; MAX_I2C_BUS_COUNT],
    /// Number of configured I2C buses
    pub i2c_bus_count: usize,
    /// Default I2C bus index
    pub def_i2c_bus: usize,
    /// UART devices, valid up to `uart_dev_count`
    pub uart_dev: [UartDev; MAX_UART_COUNT],
    /// Number of configured UART devices
    pub uart_dev_count: usize,
    /// Default UART index
    pub def_uart_dev: usize,
    /// LEDs, valid up to `led_dev_count`
    pub led_dev: [LedDev; MAX_LED_COUNT],
    /// Number of configured LEDs
    pub led_dev_count: usize,
    /// Number of PWM channels
    pub pwm_dev_count: usize,
    /// PWM period bounds
    pub pwm: PwmParams,
    adv_func: Option<Arc<dyn AdvancedHooks>>,
}

impl Board {
    /// Allocate an empty board with `phy_pin_count` pin slots
    ///
    /// Every slot starts as an undeclared, reserved pin. Fails with
    /// [`Error::NoResources`] if the pin table cannot be allocated.
    pub fn new(platform_name: impl Into<String>, phy_pin_count: usize) -> Result<Self> {
        let mut pins = Vec::new();
        pins.try_reserve_exact(phy_pin_count)
            .map_err(|_| Error::NoResources)?;
        pins.resize_with(phy_pin_count, PinInfo::undeclared);

        Ok(Self {
            platform_name: platform_name.into(),
            phy_pin_count,
            gpio_count: 0,
            chardev_capable: false,
            pins,
            spi_bus: Default::default(),
            spi_bus_count: 0,
            i2c_bus: Default::default(),
            i2c_bus_count: 0,
            def_i2c_bus: 0,
            uart_dev: Default::default(),
            uart_dev_count: 0,
            def_uart_dev: 0,
            led_dev: Default::default(),
            led_dev_count: 0,
            pwm_dev_count: 0,
            pwm: PwmParams::default(),
            adv_func: None,
        })
    }

    /// Set the descriptor of pin `index`
    ///
    /// Fails with [`Error::InvalidResource`] and leaves the table untouched
    /// if `index` is not below `phy_pin_count`.
    pub fn set_pin_info(
        &mut self,
        index: usize,
        name: &str,
        capabilities: PinCapabilities,
        sysfs_pin: Option<u32>,
    ) -> Result<()> {
        let slot = self.pins.get_mut(index).ok_or(Error::InvalidResource)?;
        *slot = PinInfo::new(name, capabilities, sysfs_pin);
        Ok(())
    }

    /// Find the index of the first pin called `name`
    pub fn pin_index(&self, name: &str) -> Result<usize> {
        self.pins
            .iter()
            .position(|pin| pin.name_matches(name))
            .ok_or_else(|| {
                error!("{}: Failed to find pin name {}", self.platform_name, name);
                Error::PinNotFound(name.to_owned())
            })
    }

    /// Resolve `name` into `slot`, requiring `capability` on the pin
    ///
    /// `slot` is only written on success.
    pub fn resolve_pin(
        &self,
        name: &str,
        capability: PinCapabilities,
        slot: &mut Option<usize>,
    ) -> Result<()> {
        let index = self.pin_index(name)?;
        if !self.pins[index].capabilities.contains(capability) {
            warn!(
                "{}: pin {} ({}) lacks capability {:?}",
                self.platform_name, index, name, capability
            );
            return Err(Error::InvalidResource);
        }
        *slot = Some(index);
        Ok(())
    }

    /// Pin descriptor at `index`
    pub fn pin(&self, index: usize) -> Option<&PinInfo> {
        self.pins.get(index)
    }

    /// Whole pin table
    pub fn pins(&self) -> &[PinInfo] {
        &self.pins
    }

    /// Wire the next SPI bus slot
    ///
    /// All four roles are resolved even if one fails. The bus only counts
    /// once every role resolved; otherwise the first failure is returned and
    /// the slot keeps whatever did resolve.
    pub fn configure_spi_bus(
        &mut self,
        bus_id: u32,
        slave_s: u32,
        names: SpiPinNames<'_>,
    ) -> Result<()> {
        let slot = self.spi_bus_count;
        if slot >= MAX_SPI_BUS_COUNT {
            return Err(Error::InvalidResource);
        }

        let mut bus = self.spi_bus[slot];
        bus.bus_id = bus_id;
        bus.slave_s = slave_s;

        let spi = PinCapabilities::SPI;
        let results = [
            self.resolve_pin(names.cs, spi, &mut bus.cs),
            self.resolve_pin(names.mosi, spi, &mut bus.mosi),
            self.resolve_pin(names.miso, spi, &mut bus.miso),
            self.resolve_pin(names.sclk, spi, &mut bus.sclk),
        ];
        self.spi_bus[slot] = bus;

        for result in results {
            result?;
        }
        self.spi_bus_count += 1;
        debug!("{}: SPI bus {} configured: {:?}", self.platform_name, slot, bus);
        Ok(())
    }

    /// Record an I2C adapter found on the running kernel
    ///
    /// The bus counts as soon as the adapter exists; its SDA/SCL pins are
    /// resolved on a best effort basis.
    pub fn add_i2c_bus(&mut self, bus_id: u32, sda: &str, scl: &str) -> Result<()> {
        let slot = self.i2c_bus_count;
        if slot >= MAX_I2C_BUS_COUNT {
            return Err(Error::InvalidResource);
        }

        let mut bus = I2cBus {
            bus_id,
            ..I2cBus::default()
        };
        let i2c = PinCapabilities::I2C;
        if let Err(err) = self.resolve_pin(sda, i2c, &mut bus.sda) {
            debug!("{}: I2C SDA unresolved: {}", self.platform_name, err);
        }
        if let Err(err) = self.resolve_pin(scl, i2c, &mut bus.scl) {
            debug!("{}: I2C SCL unresolved: {}", self.platform_name, err);
        }

        self.i2c_bus[slot] = bus;
        self.i2c_bus_count += 1;
        Ok(())
    }

    /// Append a UART device
    pub fn add_uart(&mut self, name: &str, device_path: &str) -> Result<()> {
        let index = self.uart_dev_count;
        let dev = self.uart_dev.get_mut(index).ok_or(Error::InvalidResource)?;
        *dev = UartDev {
            index,
            name: name.to_owned(),
            device_path: device_path.to_owned(),
            ..UartDev::default()
        };
        self.uart_dev_count += 1;
        Ok(())
    }

    /// Append an LED
    pub fn add_led(&mut self, name: &str) -> Result<()> {
        let dev = self
            .led_dev
            .get_mut(self.led_dev_count)
            .ok_or(Error::InvalidResource)?;
        dev.name = name.to_owned();
        self.led_dev_count += 1;
        Ok(())
    }

    /// Configured SPI buses
    pub fn spi_buses(&self) -> &[SpiBus] {
        &self.spi_bus[..self.spi_bus_count]
    }

    /// Configured I2C buses
    pub fn i2c_buses(&self) -> &[I2cBus] {
        &self.i2c_bus[..self.i2c_bus_count]
    }

    /// Configured UART devices
    pub fn uart_devs(&self) -> &[UartDev] {
        &self.uart_dev[..self.uart_dev_count]
    }

    /// Configured LEDs
    pub fn led_devs(&self) -> &[LedDev] {
        &self.led_dev[..self.led_dev_count]
    }

    /// spidev character device of SPI bus `bus`
    pub fn spidev_path(&self, bus: usize) -> Result<String> {
        let bus = self.spi_buses().get(bus).ok_or(Error::NotAvailable)?;
        Ok(format!("/dev/spidev{}.{}", bus.bus_id, bus.slave_s))
    }

    /// i2c-dev character device of I2C bus `bus`
    pub fn i2c_dev_path(&self, bus: usize) -> Result<String> {
        let bus = self.i2c_buses().get(bus).ok_or(Error::NotAvailable)?;
        Ok(format!("/dev/i2c-{}", bus.bus_id))
    }

    /// Character device of UART `index`
    pub fn uart_device_path(&self, index: usize) -> Result<&str> {
        self.uart_devs()
            .get(index)
            .map(|dev| dev.device_path.as_str())
            .ok_or(Error::InvalidResource)
    }

    /// Install board-specific overrides
    pub fn set_hooks(&mut self, hooks: Arc<dyn AdvancedHooks>) {
        self.adv_func = Some(hooks);
    }

    /// Overrides in effect, [`NoHooks`] if the board installed none
    pub fn hooks(&self) -> Arc<dyn AdvancedHooks> {
        match &self.adv_func {
            Some(hooks) => Arc::clone(hooks),
            None => Arc::new(NoHooks),
        }
    }
}
