//! Runtime platform configuration

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable relocating every kernel path (sysfs, procfs)
pub const SYSFS_ROOT_ENV: &str = "MRAA_SYSFS_ROOT";

/// Platform configuration threaded through board init and the drivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Root that absolute kernel paths are resolved under
    pub root: PathBuf,
    /// GPIO line base override, `None` uses the board revision's base
    pub gpio_base: Option<u32>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            gpio_base: None,
        }
    }
}

impl PlatformConfig {
    /// Default configuration with `MRAA_SYSFS_ROOT` applied
    pub fn from_env() -> Self {
        let config = Self::default();
        match env::var_os(SYSFS_ROOT_ENV) {
            Some(root) if !root.is_empty() => config.with_root(root),
            _ => config,
        }
    }

    /// Relocate kernel paths under `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Override the GPIO line base
    pub fn with_gpio_base(mut self, base: u32) -> Self {
        self.gpio_base = Some(base);
        self
    }

    /// Resolve an absolute kernel path under the configured root
    pub fn path(&self, absolute: impl AsRef<Path>) -> PathBuf {
        let absolute = absolute.as_ref();
        self.root
            .join(absolute.strip_prefix("/").unwrap_or(absolute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root_is_identity() {
        let config = PlatformConfig::default();
        assert_eq!(config.path("/sys/class/gpio"), PathBuf::from("/sys/class/gpio"));
        assert_eq!(config.gpio_base, None);
    }

    #[test]
    fn test_relocated_root() {
        let config = PlatformConfig::default()
            .with_root("/tmp/fake")
            .with_gpio_base(100);
        assert_eq!(
            config.path("/sys/class/leds"),
            PathBuf::from("/tmp/fake/sys/class/leds")
        );
        assert_eq!(config.gpio_base, Some(100));
    }
}
