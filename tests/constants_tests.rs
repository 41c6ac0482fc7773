// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use photobooth::constants::{geometry, protocol, timing};
use std::time::Duration;

#[test]
fn test_countdown_offsets_are_ordered() {
    assert!(timing::DIGIT_TWO_AT < timing::DIGIT_ONE_AT);
    assert!(timing::FOCUS_LOCK_AT < timing::LIGHTS_ON_AT);
    assert!(timing::LIGHTS_ON_AT < timing::FIRE_AT);
    assert_eq!(timing::FIRE_AT, Duration::from_millis(4500));
}

#[test]
fn test_print_cooldown() {
    assert_eq!(timing::PRINT_COOLDOWN, Duration::from_secs(30));
}

#[test]
fn test_startup_grace_window() {
    assert!(timing::MIN_STARTUP_GRACE <= timing::MAX_STARTUP_GRACE);
    assert_eq!(timing::MIN_STARTUP_GRACE, Duration::from_secs(5));
    assert_eq!(timing::MAX_STARTUP_GRACE, Duration::from_secs(10));
}

#[test]
fn test_protocol_bytes_are_printable() {
    // Inbound bytes at or below the noise threshold are dropped, so the
    // button codes must sit above it
    assert!(protocol::BUTTON_SHUTTER > protocol::NOISE_THRESHOLD);
    assert!(protocol::BUTTON_PRINT > protocol::NOISE_THRESHOLD);
    assert_eq!(protocol::LINE_TERMINATOR, b"\r\n");
}

#[test]
fn test_history_slots_fit_the_screen() {
    // Two thumbnails plus the gutter between them span the screen width
    assert_eq!(
        geometry::SLOT_WIDTH * 2 + geometry::SLOT_GUTTER,
        geometry::SCREEN_WIDTH
    );
    assert_eq!(geometry::HISTORY_SLOTS, 4);
    assert_eq!(geometry::OUTPUT_WIDTH * 2, geometry::OUTPUT_HEIGHT * 3);
}
