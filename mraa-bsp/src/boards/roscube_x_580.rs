//! ADLINK ROSCube-X 580 (RQX-580)
//!
//! Jetson Xavier NX based robot controller. The 50-pin DB50 expansion
//! connector exposes 20 GPIO lines from a single controller, one SPI bus,
//! one I2C bus, a UART and a PWM output; the remaining positions are power,
//! ground, CAN and isolated ADC inputs.
//!
//! The GPIO controller is registered at a fixed line base on the supported
//! board revision, so header pins map to `base + offset`. Pin 44 and the
//! unused slot 0 are never declared.

use log::{error, info, warn};
use mraa_hal::board::{Board, PwmParams, SpiPinNames};
use mraa_hal::pin::PinCapabilities;
use mraa_hal::Result;

use crate::config::PlatformConfig;
use crate::probe::I2cBusProbe;

/// Platform name reported by the board descriptor
pub const PLATFORM_NAME: &str = "RQX-580";
/// Physical pin slots (connector pins 1..=50 plus slot 0)
pub const PIN_COUNT: usize = 51;
/// GPIO-capable header pins
pub const GPIO_COUNT: usize = 20;
/// GPIO line base of the supported board revision
pub const GPIO_BASE: u32 = 216;
/// Device-tree node of the I2C controller routed to the connector
pub const I2C_DEVICE_NAME: &str = "31e0000.i2c";

const LEDS: [&str; 6] = ["LED1", "LED2", "LED3", "LED4", "LED5", "LED6"];

const UARTS: [(&str, &str); 3] = [
    ("COM1", "/dev/ttyUSB0"),
    ("COM2", "/dev/ttyUSB1"),
    ("COM3_DB50", "/dev/ttyTHS0"),
];

const SPI_PINS: SpiPinNames<'static> = SpiPinNames {
    cs: "SPI_CS",
    mosi: "SPI_MOSI",
    miso: "SPI_MISO",
    sclk: "SPI_CLK",
};

const PWM: PwmParams = PwmParams {
    default_period: 5000,
    max_period: 660_066_006,
    min_period: 1,
};

const NONE: PinCapabilities = PinCapabilities::RESERVED;
const GPIO: PinCapabilities = PinCapabilities::VALID.union(PinCapabilities::GPIO);
const PWM_OUT: PinCapabilities = PinCapabilities::VALID.union(PinCapabilities::PWM);
const SPI: PinCapabilities = PinCapabilities::VALID.union(PinCapabilities::SPI);
const I2C: PinCapabilities = PinCapabilities::VALID.union(PinCapabilities::I2C);
const UART: PinCapabilities = PinCapabilities::VALID.union(PinCapabilities::UART);

/// One row of a board pin table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEntry {
    /// Connector position
    pub index: usize,
    /// Silkscreen name
    pub name: &'static str,
    /// Functions the pin supports
    pub capabilities: PinCapabilities,
    /// GPIO line relative to the controller base
    pub gpio_offset: Option<u32>,
}

const fn pin(
    index: usize,
    name: &'static str,
    capabilities: PinCapabilities,
    gpio_offset: Option<u32>,
) -> PinEntry {
    PinEntry {
        index,
        name,
        capabilities,
        gpio_offset,
    }
}

/// DB50 connector table
pub const PINS: &[PinEntry] = &[
    pin(1, "ADC1_isolation", NONE, None),
    pin(2, "ADC2_isolation", NONE, None),
    pin(3, "Unused", NONE, None),
    pin(4, "Unused", NONE, None),
    pin(5, "GPIO0", GPIO, Some(0)),
    pin(6, "GPIO1", GPIO, Some(1)),
    pin(7, "GPIO2", GPIO, Some(2)),
    pin(8, "GPIO3", GPIO, Some(3)),
    pin(9, "GPIO4", GPIO, Some(4)),
    pin(10, "GPIO5", GPIO, Some(5)),
    pin(11, "GPIO6", GPIO, Some(6)),
    pin(12, "GPIO7", GPIO, Some(7)),
    pin(13, "GPIO8", GPIO, Some(8)),
    pin(14, "GPIO9", GPIO, Some(9)),
    pin(15, "GPIO10", GPIO, Some(10)),
    pin(16, "GPIO11", GPIO, Some(11)),
    pin(17, "GPIO12", GPIO, Some(12)),
    pin(18, "GND", NONE, None),
    pin(19, "Unused", NONE, None),
    pin(20, "Unused", NONE, None),
    pin(21, "Unused", NONE, None),
    pin(22, "PWM", PWM_OUT, None),
    pin(23, "SPI_CLK", SPI, None),
    pin(24, "SPI_CS", SPI, None),
    pin(25, "SPI_MISO", SPI, None),
    pin(26, "SPI_MOSI", SPI, None),
    pin(27, "GPIO13", GPIO, Some(13)),
    pin(28, "GPIO14", GPIO, Some(14)),
    pin(29, "GPIO15", GPIO, Some(15)),
    // Line 16 of the controller is not routed to the connector
    pin(30, "GPIO16", GPIO, Some(17)),
    pin(31, "GPIO17", GPIO, Some(18)),
    pin(32, "GPIO18", GPIO, Some(19)),
    pin(33, "GPIO19", GPIO, Some(20)),
    pin(34, "GND", NONE, None),
    pin(35, "Unused", NONE, None),
    pin(36, "Unused", NONE, None),
    pin(37, "Unused", NONE, None),
    pin(38, "UART_RX", UART, None),
    pin(39, "UART_TX", UART, None),
    pin(40, "CAN_H", NONE, None),
    pin(41, "CAN_L", NONE, None),
    pin(42, "I2C_CLK", I2C, None),
    pin(43, "I2C_DATA", I2C, None),
    pin(45, "5V", NONE, None),
    pin(46, "3.3V", NONE, None),
    pin(47, "GND", NONE, None),
    pin(48, "GND", NONE, None),
    pin(49, "GND", NONE, None),
    pin(50, "GND", NONE, None),
];

/// Build the RQX-580 board descriptor
///
/// Fails only if the descriptor cannot be allocated. A missing SPI pin or
/// an absent I2C controller leaves that bus uncounted.
pub fn init(config: &PlatformConfig, probe: &dyn I2cBusProbe) -> Result<Board> {
    build(config, probe, PINS)
}

pub(crate) fn build(
    config: &PlatformConfig,
    probe: &dyn I2cBusProbe,
    pins: &[PinEntry],
) -> Result<Board> {
    let mut b = Board::new(PLATFORM_NAME, PIN_COUNT).map_err(|err| {
        error!("{}: Platform failed to initialise", PLATFORM_NAME);
        err
    })?;

    b.gpio_count = GPIO_COUNT;
    b.chardev_capable = false;

    let base = config.gpio_base.unwrap_or(GPIO_BASE);
    info!("{}: GPIO base {}", PLATFORM_NAME, base);

    b.pwm_dev_count = 0;
    b.pwm = PWM;

    for entry in pins {
        let line = entry.gpio_offset.and_then(|offset| base.checked_add(offset));
        if let Err(err) = b.set_pin_info(entry.index, entry.name, entry.capabilities, line) {
            warn!("{}: pin {} ({}): {}", PLATFORM_NAME, entry.index, entry.name, err);
        }
    }

    for (name, path) in UARTS {
        b.add_uart(name, path)?;
    }
    b.def_uart_dev = 0;

    for led in LEDS {
        b.add_led(led)?;
    }

    // SPI #0 CS0
    if let Err(err) = b.configure_spi_bus(0, 0, SPI_PINS) {
        warn!("{}: SPI bus 0 unavailable: {}", PLATFORM_NAME, err);
    }

    b.def_i2c_bus = 0;
    match probe.find_i2c_bus(I2C_DEVICE_NAME, 0) {
        Some(bus_id) => b.add_i2c_bus(bus_id, "I2C_DATA", "I2C_CLK")?,
        None => info!("{}: I2C controller {} not present", PLATFORM_NAME, I2C_DEVICE_NAME),
    }

    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_i2c(_: &str, _: u32) -> Option<u32> {
        None
    }

    #[test]
    fn test_table_fits_pin_count() {
        assert!(PINS.iter().all(|entry| entry.index < PIN_COUNT));
        let gpio = PINS
            .iter()
            .filter(|entry| entry.capabilities.contains(PinCapabilities::GPIO))
            .count();
        assert_eq!(gpio, GPIO_COUNT);
    }

    #[test]
    fn test_missing_spi_pin_keeps_board() {
        let pins: Vec<PinEntry> = PINS
            .iter()
            .copied()
            .filter(|entry| entry.name != "SPI_MISO")
            .collect();
        let board = build(&PlatformConfig::default(), &no_i2c, &pins).unwrap();

        assert_eq!(board.spi_bus_count, 0);
        assert_eq!(board.spi_bus[0].miso, None);
        assert_eq!(board.spi_bus[0].sclk, Some(23));
        assert_eq!(board.spi_bus[0].cs, Some(24));
        assert_eq!(board.spi_bus[0].mosi, Some(26));
        assert_eq!(board.uart_dev_count, 3);
    }

    #[test]
    fn test_out_of_range_entry_is_skipped() {
        let mut pins = PINS.to_vec();
        pins.push(pin(PIN_COUNT, "GPIO99", GPIO, Some(99)));
        let board = build(&PlatformConfig::default(), &no_i2c, &pins).unwrap();

        assert_eq!(board.pins().len(), PIN_COUNT);
        assert!(board.pin_index("GPIO99").is_err());
    }

    #[test]
    fn test_gpio_base_override() {
        let config = PlatformConfig::default().with_gpio_base(300);
        let board = init(&config, &no_i2c).unwrap();

        assert_eq!(board.pin(5).and_then(|p| p.gpio_line()), Some(300));
        assert_eq!(board.pin(30).and_then(|p| p.gpio_line()), Some(317));
    }
}
