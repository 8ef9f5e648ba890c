//! Platform detection and the process-wide board registry
//!
//! [`build`] returns an owned [`Board`] and can be called any number of times.
//! [`init`] detects the running board and parks its descriptor in a single
//! registry slot that the rest of the process reads through [`with_board`]
//! until [`deinit`] drops it.

use std::fs;

use log::{debug, error, info};
use mraa_hal::board::Board;
use mraa_hal::{Error, Result};
use parking_lot::{const_mutex, Mutex};

use crate::config::PlatformConfig;
use crate::probe::{I2cBusProbe, SysfsI2cProbe};

/// Device-tree model files, in lookup order
pub const DT_MODEL_PATHS: [&str; 2] = [
    "/proc/device-tree/model",
    "/sys/firmware/devicetree/base/model",
];

static PLATFORM: Mutex<Option<Board>> = const_mutex(None);

/// Boards this crate can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// ADLINK ROSCube-X 580
    #[cfg(feature = "roscube-x-580")]
    RoscubeX580,
}

impl Platform {
    /// Platform name as reported by the board descriptor
    pub fn name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "roscube-x-580")]
            Platform::RoscubeX580 => crate::boards::roscube_x_580::PLATFORM_NAME,
        }
    }

    /// Match a device-tree model string
    pub fn from_model(model: &str) -> Option<Self> {
        // Device-tree strings are NUL terminated
        let model = model.trim_end_matches('\0').trim();

        #[cfg(feature = "roscube-x-580")]
        {
            if model.contains("RQX-580") || model.contains("ROSCube-X 580") {
                return Some(Platform::RoscubeX580);
            }
        }

        debug!("platform: unknown model {:?}", model);
        None
    }
}

/// Identify the running board from its device-tree model
pub fn detect(config: &PlatformConfig) -> Result<Platform> {
    for path in DT_MODEL_PATHS {
        let path = config.path(path);
        let Ok(model) = fs::read_to_string(&path) else {
            continue;
        };
        if let Some(platform) = Platform::from_model(&model) {
            info!("platform: detected {}", platform.name());
            return Ok(platform);
        }
    }
    Err(Error::PlatformNotSupported)
}

/// Construct the descriptor of `platform`
pub fn build(
    platform: Platform,
    config: &PlatformConfig,
    probe: &dyn I2cBusProbe,
) -> Result<Board> {
    match platform {
        #[cfg(feature = "roscube-x-580")]
        Platform::RoscubeX580 => crate::boards::roscube_x_580::init(config, probe),
    }
}

/// Detect the running board and register its descriptor
pub fn init(config: &PlatformConfig) -> Result<Platform> {
    let mut slot = PLATFORM.lock();
    if slot.is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let platform = detect(config)?;
    let board = build(platform, config, &SysfsI2cProbe::new(config)).map_err(|err| {
        error!("platform: {} bring-up failed: {}", platform.name(), err);
        err
    })?;
    *slot = Some(board);
    Ok(platform)
}

/// Register an already built descriptor
pub fn init_with(board: Board) -> Result<()> {
    let mut slot = PLATFORM.lock();
    if slot.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    info!("platform: registered {}", board.platform_name);
    *slot = Some(board);
    Ok(())
}

/// Drop the registered descriptor, returning whether one was present
pub fn deinit() -> bool {
    let board = PLATFORM.lock().take();
    if let Some(board) = &board {
        debug!("platform: releasing {}", board.platform_name);
    }
    board.is_some()
}

/// Run `f` against the registered descriptor
pub fn with_board<R>(f: impl FnOnce(&Board) -> R) -> Result<R> {
    let slot = PLATFORM.lock();
    slot.as_ref().map(f).ok_or(Error::NotInitialized)
}

/// Name of the registered platform
pub fn platform_name() -> Result<String> {
    with_board(|board| board.platform_name.clone())
}

#[cfg(all(test, feature = "roscube-x-580"))]
mod tests {
    use super::*;

    #[test]
    fn test_model_matching() {
        assert_eq!(
            Platform::from_model("ADLINK ROSCube-X 580\0"),
            Some(Platform::RoscubeX580)
        );
        assert_eq!(Platform::from_model("RQX-580"), Some(Platform::RoscubeX580));
        assert_eq!(Platform::from_model("Raspberry Pi 4 Model B"), None);
    }

    #[test]
    fn test_detect_reads_device_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlatformConfig::default().with_root(dir.path());
        assert!(matches!(detect(&config), Err(Error::PlatformNotSupported)));

        let base = dir.path().join("sys/firmware/devicetree/base");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("model"), "ADLINK RQX-580\0").unwrap();
        assert_eq!(detect(&config).unwrap(), Platform::RoscubeX580);
    }

    #[test]
    fn test_build_is_reentrant() {
        let config = PlatformConfig::default();
        let probe = |_: &str, _: u32| -> Option<u32> { None };
        let first = build(Platform::RoscubeX580, &config, &probe).unwrap();
        let second = build(Platform::RoscubeX580, &config, &probe).unwrap();
        assert_eq!(first.pins(), second.pins());
    }
}
