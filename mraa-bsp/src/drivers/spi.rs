//! spidev SPI driver
//!
//! Opens the `/dev/spidev<bus>.<cs>` node the board descriptor names for an
//! SPI bus and drives it through the kernel's spidev ioctls.

use std::path::PathBuf;

use log::{debug, error};
use mraa_hal::board::Board;
use mraa_hal::spi::{BitOrder, Spi, SpiConfig, SpiMode};
use mraa_hal::{Error, Result};
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};

use crate::config::PlatformConfig;

/// SPI bus driven through spidev
pub struct SpidevSpi {
    bus: usize,
    path: PathBuf,
    dev: Spidev,
    config: SpiConfig,
}

impl SpidevSpi {
    /// Open SPI bus `bus` of `board` with the default settings
    /// (mode 0, MSB first, 4 MHz, 8 bits per word)
    pub fn open(board: &Board, bus: usize, config: &PlatformConfig) -> Result<Self> {
        let node = board.spidev_path(bus).map_err(|err| {
            error!("spi: {} has no SPI bus {}", board.platform_name, bus);
            err
        })?;
        let path = config.path(&node);
        let dev = Spidev::open(&path).map_err(|err| {
            error!("spi: cannot open {}: {}", path.display(), err);
            err
        })?;

        let mut spi = Self {
            bus,
            path,
            dev,
            config: SpiConfig::default(),
        };
        spi.configure(SpiConfig::default())?;
        Ok(spi)
    }

    /// Board SPI bus index
    pub fn bus(&self) -> usize {
        self.bus
    }
}

fn options(config: &SpiConfig) -> SpidevOptions {
    let mode = match config.mode {
        SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
        SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
        SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
        SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
    };
    SpidevOptions::new()
        .mode(mode)
        .lsb_first(config.bit_order == BitOrder::LsbFirst)
        .max_speed_hz(config.frequency)
        .bits_per_word(config.bits_per_word)
        .build()
}

impl Spi for SpidevSpi {
    type Error = Error;

    fn config(&self) -> SpiConfig {
        self.config
    }

    fn configure(&mut self, config: SpiConfig) -> Result<()> {
        config.validate()?;
        self.dev.configure(&options(&config))?;
        debug!("spi: {} configured {:?}", self.path.display(), config);
        self.config = config;
        Ok(())
    }

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        if write.len() != read.len() {
            return Err(Error::InvalidParameter);
        }
        let mut transfer = SpidevTransfer::read_write(write, read);
        self.dev.transfer(&mut transfer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mraa_hal::board::SpiPinNames;
    use mraa_hal::pin::PinCapabilities;
    use std::fs;

    fn spi_board() -> Board {
        let mut board = Board::new("TEST", 5).unwrap();
        let spi = PinCapabilities::VALID | PinCapabilities::SPI;
        for (index, name) in ["SPI_CS", "SPI_MOSI", "SPI_MISO", "SPI_CLK"].iter().enumerate() {
            board.set_pin_info(index + 1, name, spi, None).unwrap();
        }
        let names = SpiPinNames {
            cs: "SPI_CS",
            mosi: "SPI_MOSI",
            miso: "SPI_MISO",
            sclk: "SPI_CLK",
        };
        board.configure_spi_bus(1, 0, names).unwrap();
        board
    }

    #[test]
    fn test_unconfigured_bus_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlatformConfig::default().with_root(dir.path());
        let board = Board::new("TEST", 1).unwrap();

        assert!(matches!(
            SpidevSpi::open(&board, 0, &config),
            Err(Error::NotAvailable)
        ));
        assert!(matches!(
            SpidevSpi::open(&spi_board(), 1, &config),
            Err(Error::NotAvailable)
        ));
    }

    #[test]
    fn test_missing_device_node() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlatformConfig::default().with_root(dir.path());

        match SpidevSpi::open(&spi_board(), 0, &config) {
            Err(Error::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected result: {:?}", other.map(|spi| spi.bus())),
        }
    }

    #[test]
    fn test_node_without_spidev_ioctls_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dev")).unwrap();
        fs::write(dir.path().join("dev/spidev1.0"), "").unwrap();
        let config = PlatformConfig::default().with_root(dir.path());

        assert!(matches!(
            SpidevSpi::open(&spi_board(), 0, &config),
            Err(Error::Io(_))
        ));
    }
}
