//! Sysfs LED driver
//!
//! Board LEDs are addressed by their index in the descriptor and driven
//! through `/sys/class/leds/<name>`.

use std::path::PathBuf;

use log::{debug, error};
use mraa_hal::board::Board;
use mraa_hal::led::Led;
use mraa_hal::{Error, Result};

use super::sysfs::{read_attr_u32, write_attr};
use crate::config::PlatformConfig;

/// Sysfs LED class directory
pub const SYSFS_CLASS_LEDS: &str = "/sys/class/leds";

/// Board LED driven through sysfs
#[derive(Debug)]
pub struct SysfsLed {
    name: String,
    dir: PathBuf,
}

impl SysfsLed {
    /// Open LED `index` of `board`
    pub fn open(board: &Board, index: usize, config: &PlatformConfig) -> Result<Self> {
        let dev = board.led_devs().get(index).ok_or_else(|| {
            error!("led: {} has no LED {}", board.platform_name, index);
            Error::InvalidResource
        })?;

        let dir = config.path(SYSFS_CLASS_LEDS).join(&dev.name);
        if !dir.is_dir() {
            debug!("led: {} not present", dir.display());
            return Err(Error::NotAvailable);
        }

        Ok(Self {
            name: dev.name.clone(),
            dir,
        })
    }
}

impl Led for SysfsLed {
    type Error = Error;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_brightness(&mut self, value: u32) -> Result<()> {
        write_attr(&self.dir.join("brightness"), value)?;
        Ok(())
    }

    fn brightness(&self) -> Result<u32> {
        Ok(read_attr_u32(&self.dir.join("brightness"))?)
    }

    fn max_brightness(&self) -> Result<u32> {
        Ok(read_attr_u32(&self.dir.join("max_brightness"))?)
    }

    fn set_trigger(&mut self, trigger: &str) -> Result<()> {
        write_attr(&self.dir.join("trigger"), trigger)?;
        Ok(())
    }

    fn clear_trigger(&mut self) -> Result<()> {
        self.set_trigger("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn led_board() -> Board {
        let mut board = Board::new("TEST", 1).unwrap();
        board.add_led("LED1").unwrap();
        board.add_led("LED2").unwrap();
        board
    }

    #[test]
    fn test_open_checks_index_and_presence() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlatformConfig::default().with_root(dir.path());
        let board = led_board();

        assert!(matches!(
            SysfsLed::open(&board, 2, &config),
            Err(Error::InvalidResource)
        ));
        assert!(matches!(
            SysfsLed::open(&board, 1, &config),
            Err(Error::NotAvailable)
        ));
    }

    #[test]
    fn test_brightness_and_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let led = dir.path().join("sys/class/leds/LED2");
        fs::create_dir_all(&led).unwrap();
        fs::write(led.join("brightness"), "0\n").unwrap();
        fs::write(led.join("max_brightness"), "255\n").unwrap();
        fs::write(led.join("trigger"), "[none] heartbeat\n").unwrap();

        let config = PlatformConfig::default().with_root(dir.path());
        let mut sysfs = SysfsLed::open(&led_board(), 1, &config).unwrap();
        assert_eq!(sysfs.name(), "LED2");

        sysfs.on().unwrap();
        assert_eq!(sysfs.brightness().unwrap(), 255);
        sysfs.off().unwrap();
        assert_eq!(sysfs.brightness().unwrap(), 0);

        sysfs.set_trigger("heartbeat").unwrap();
        assert_eq!(fs::read_to_string(led.join("trigger")).unwrap(), "heartbeat");
        sysfs.clear_trigger().unwrap();
        assert_eq!(fs::read_to_string(led.join("trigger")).unwrap(), "none");
    }
}
