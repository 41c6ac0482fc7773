// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::timing;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Directory name used under the user's config directory
const CONFIG_DIR_NAME: &str = "photobooth";

/// File name of the kiosk configuration
const CONFIG_FILE_NAME: &str = "config.json";

/// Kiosk configuration
///
/// Everything here is wiring: device paths, where photos go and which
/// printer receives them. The countdown itself is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// V4L2 capture device
    pub camera_device: String,
    /// Capture width requested from the camera
    pub capture_width: u32,
    /// Capture height requested from the camera
    pub capture_height: u32,
    /// Serial port of the relay board
    pub serial_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Directory where captured photos are written
    pub snapshot_dir: PathBuf,
    /// Bluetooth address of the photo printer
    pub printer_address: String,
    /// RFCOMM channel of the printer's OBEX push service
    pub printer_channel: u8,
    /// Path to the obexftp binary
    pub obexftp_path: PathBuf,
    /// Seconds after start-up during which button presses are ignored
    pub startup_grace_secs: u64,
    /// Mirror the preview and saved photos horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Pause between shutter release and relay reset, in milliseconds
    pub relay_settle_ms: u64,
    /// JPEG quality for saved photos (1-100)
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_device: "/dev/video0".to_string(),
            capture_width: 1280,
            capture_height: 720,
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            snapshot_dir: default_snapshot_dir(),
            printer_address: "C4:30:18:19:C6:3D".to_string(),
            printer_channel: 4,
            obexftp_path: PathBuf::from("/usr/bin/obexftp"),
            startup_grace_secs: timing::MIN_STARTUP_GRACE.as_secs(),
            mirror_preview: false,
            relay_settle_ms: timing::RELAY_SETTLE.as_millis() as u64,
            jpeg_quality: 95,
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse is an error: the kiosk should not start on half a config.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Start-up grace window, clamped into the supported 5-10 s range
    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
            .clamp(timing::MIN_STARTUP_GRACE, timing::MAX_STARTUP_GRACE)
    }

    /// Pause between shutter release and relay reset
    pub fn relay_settle(&self) -> Duration {
        Duration::from_millis(self.relay_settle_ms)
    }

    /// JPEG quality clamped into the encoder's valid range
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

/// `<config_dir>/photobooth/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// `<home>/selfies/snaps`
fn default_snapshot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("selfies")
        .join("snaps")
}
