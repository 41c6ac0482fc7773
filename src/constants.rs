// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants
//!
//! The countdown offsets and the print cooldown are part of the kiosk's
//! observable behaviour and are deliberately not configurable.

use std::time::Duration;

/// Countdown and relay timing, measured from the moment the shutter button
/// was accepted.
pub mod timing {
    use super::Duration;

    /// Digit "3" is shown until this offset, then "2"
    pub const DIGIT_TWO_AT: Duration = Duration::from_millis(1500);

    /// Digit "1" is shown from this offset
    pub const DIGIT_ONE_AT: Duration = Duration::from_millis(3000);

    /// Focus lock relay engages at this offset
    pub const FOCUS_LOCK_AT: Duration = Duration::from_millis(3000);

    /// Fill lights relay engages at this offset
    pub const LIGHTS_ON_AT: Duration = Duration::from_millis(3500);

    /// Flash frame, capture and shutter release happen at this offset
    pub const FIRE_AT: Duration = Duration::from_millis(4500);

    /// Default pause between shutter release and relay reset
    pub const RELAY_SETTLE: Duration = Duration::from_millis(200);

    /// Minimum interval between two accepted print launches
    pub const PRINT_COOLDOWN: Duration = Duration::from_secs(30);

    /// Lower bound of the start-up window during which button bytes are discarded
    pub const MIN_STARTUP_GRACE: Duration = Duration::from_secs(5);

    /// Upper bound of the start-up grace window
    pub const MAX_STARTUP_GRACE: Duration = Duration::from_secs(10);

    /// Render tick interval (roughly the camera frame rate)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(33);
}

/// Relay board wire protocol
pub mod protocol {
    /// Outbound: engage focus lock
    pub const FOCUS_LOCK: u8 = b'A';

    /// Outbound: engage fill lights
    pub const LIGHTS_ON: u8 = b'B';

    /// Outbound: release shutter
    pub const SHUTTER_FIRE: u8 = b'C';

    /// Outbound: reset all relays
    pub const RELAY_RESET: u8 = b'R';

    /// Line terminator appended to every outbound command
    pub const LINE_TERMINATOR: &[u8] = b"\r\n";

    /// Inbound: shutter button
    pub const BUTTON_SHUTTER: u8 = b'2';

    /// Inbound: print button
    pub const BUTTON_PRINT: u8 = b'3';

    /// Inbound bytes at or below this value are line noise
    pub const NOISE_THRESHOLD: u8 = b' ';
}

/// Image geometry
pub mod geometry {
    /// Saved photo width (3:2 output)
    pub const OUTPUT_WIDTH: u32 = 1080;

    /// Saved photo height
    pub const OUTPUT_HEIGHT: u32 = 720;

    /// Kiosk screen width the history slots are laid out for
    pub const SCREEN_WIDTH: u32 = 900;

    /// Horizontal gutter around the two thumbnail columns
    pub const SLOT_GUTTER: u32 = 40;

    /// Thumbnail width: two columns across the screen
    pub const SLOT_WIDTH: u32 = (SCREEN_WIDTH - SLOT_GUTTER) / 2;

    /// Thumbnail height, 3:2 like the saved photo (430 * 2 / 3 rounded)
    pub const SLOT_HEIGHT: u32 = (SLOT_WIDTH * 2 + 1) / 3;

    /// Number of snapshots kept in the on-screen history
    pub const HISTORY_SLOTS: usize = 4;
}

/// Extension used for saved snapshots
pub const SNAPSHOT_EXTENSION: &str = "jpg";
