//! Kernel bus enumeration
//!
//! Some buses get their number assigned by the kernel at boot, so the board
//! table cannot hard-code it. The I2C adapter is found by matching the
//! device-tree node name of its controller against the `name` attribute the
//! adapter exposes under the i2c-dev class.

use std::fs;
use std::path::PathBuf;

use log::{debug, trace};

use crate::config::PlatformConfig;
use crate::drivers::sysfs::read_attr;

/// Sysfs class listing one entry per I2C adapter
pub const SYSFS_I2C_DEV: &str = "/sys/class/i2c-dev";

/// Lookup of kernel-assigned I2C adapter numbers
pub trait I2cBusProbe {
    /// First adapter number `>= start` whose name starts with `devname`
    fn find_i2c_bus(&self, devname: &str, start: u32) -> Option<u32>;
}

impl<F> I2cBusProbe for F
where
    F: Fn(&str, u32) -> Option<u32>,
{
    fn find_i2c_bus(&self, devname: &str, start: u32) -> Option<u32> {
        self(devname, start)
    }
}

/// Probe reading the running kernel's sysfs tree
#[derive(Debug, Clone)]
pub struct SysfsI2cProbe {
    devices: PathBuf,
}

impl SysfsI2cProbe {
    /// Probe under the configured root
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            devices: config.path(SYSFS_I2C_DEV),
        }
    }

    fn adapters(&self, start: u32) -> Vec<(u32, PathBuf)> {
        let entries = match fs::read_dir(&self.devices) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("i2c: cannot list {}: {}", self.devices.display(), err);
                return Vec::new();
            }
        };

        let mut adapters: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let number = name.to_str()?.strip_prefix("i2c-")?.parse::<u32>().ok()?;
                Some((number, entry.path()))
            })
            .filter(|(number, _)| *number >= start)
            .collect();
        adapters.sort_by_key(|(number, _)| *number);
        adapters
    }
}

impl I2cBusProbe for SysfsI2cProbe {
    fn find_i2c_bus(&self, devname: &str, start: u32) -> Option<u32> {
        for (number, path) in self.adapters(start) {
            let name = match read_attr(&path.join("name")) {
                Ok(name) => name,
                Err(err) => {
                    trace!("i2c-{}: no name: {}", number, err);
                    continue;
                }
            };
            trace!("i2c-{}: {}", number, name);
            // Mux channels are named after their parent adapter, not the controller
            if name.starts_with(devname) {
                debug!("i2c: {} is adapter {}", devname, number);
                return Some(number);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_adapter(root: &std::path::Path, number: u32, name: &str) {
        let dir = root.join(format!("sys/class/i2c-dev/i2c-{number}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{name}\n")).unwrap();
    }

    #[test]
    fn test_finds_adapter_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fake_adapter(dir.path(), 0, "3160000.i2c");
        fake_adapter(dir.path(), 1, "c240000.i2c");
        fake_adapter(dir.path(), 7, "31e0000.i2c");
        fake_adapter(dir.path(), 10, "NVIDIA SOC i2c adapter 0");

        let config = PlatformConfig::default().with_root(dir.path());
        let probe = SysfsI2cProbe::new(&config);

        assert_eq!(probe.find_i2c_bus("31e0000.i2c", 0), Some(7));
        assert_eq!(probe.find_i2c_bus("3160000.i2c", 0), Some(0));
        assert_eq!(probe.find_i2c_bus("3160000.i2c", 1), None);
        assert_eq!(probe.find_i2c_bus("ffff.i2c", 0), None);
    }

    #[test]
    fn test_mux_children_do_not_match() {
        let dir = tempfile::tempdir().unwrap();
        // Muxed channels sit below the controller and are numbered first here
        fake_adapter(dir.path(), 2, "i2c-8-mux (chan_id 0)");
        fake_adapter(dir.path(), 3, "i2c-8-mux (chan_id 1)");
        fake_adapter(dir.path(), 8, "31e0000.i2c");
        // Entry without a name attribute is skipped
        fs::create_dir_all(dir.path().join("sys/class/i2c-dev/i2c-4")).unwrap();

        let config = PlatformConfig::default().with_root(dir.path());
        assert_eq!(
            SysfsI2cProbe::new(&config).find_i2c_bus("31e0000.i2c", 0),
            Some(8)
        );
    }

    #[test]
    fn test_missing_sysfs_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlatformConfig::default().with_root(dir.path());
        assert_eq!(SysfsI2cProbe::new(&config).find_i2c_bus("31e0000.i2c", 0), None);
    }

    #[test]
    fn test_closure_probe() {
        let probe = |name: &str, _start: u32| (name == "31e0000.i2c").then_some(3u32);
        assert_eq!(probe.find_i2c_bus("31e0000.i2c", 0), Some(3));
        assert_eq!(probe.find_i2c_bus("other", 0), None);
    }
}
