// SPDX-License-Identifier: GPL-3.0-only

//! What the render driver should paint this tick
//!
//! Everything here is derived from sequencer state with no side effects.
//! The live preview is always painted and is not part of the directive.

use super::history::Slot;
use crate::constants::geometry::HISTORY_SLOTS;
use crate::constants::timing;
use std::time::Duration;

/// Badge drawn above slot 0 once there is something to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintBadge {
    /// "Print" on yellow
    Ready,
    /// "Printing" on a fill colour that changes every tick
    Printing { fill: [u8; 3] },
}

impl PrintBadge {
    pub fn label(&self) -> &'static str {
        match self {
            PrintBadge::Ready => "Print",
            PrintBadge::Printing { .. } => "Printing",
        }
    }

    /// Background colour for the badge
    pub fn fill(&self) -> [u8; 3] {
        match self {
            PrintBadge::Ready => [255, 255, 0],
            PrintBadge::Printing { fill } => *fill,
        }
    }
}

/// Per-tick display instructions
#[derive(Debug, Clone, Copy)]
pub struct DisplayDirective<'a> {
    /// Big digit over the preview while counting down
    pub countdown: Option<u8>,
    /// Print badge over slot 0
    pub print_badge: Option<PrintBadge>,
    /// History thumbnails, most recent first; blank slots are transparent
    pub snapshots: &'a [Slot; HISTORY_SLOTS],
}

/// Countdown digit for a given time since arming; `None` from the fire
/// offset on.
pub fn countdown_digit(elapsed: Duration) -> Option<u8> {
    if elapsed < timing::DIGIT_TWO_AT {
        Some(3)
    } else if elapsed < timing::DIGIT_ONE_AT {
        Some(2)
    } else if elapsed < timing::FIRE_AT {
        Some(1)
    } else {
        None
    }
}

/// Pseudo-random badge colour for render tick `tick`.
///
/// A pure function of the tick so a given frame always looks the same.
pub fn printing_fill(tick: u64) -> [u8; 3] {
    // splitmix64 finaliser
    let mut z = tick.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    let [r, g, b, ..] = z.to_le_bytes();
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_digits() {
        let ms = Duration::from_millis;
        assert_eq!(countdown_digit(ms(0)), Some(3));
        assert_eq!(countdown_digit(ms(1499)), Some(3));
        assert_eq!(countdown_digit(ms(1500)), Some(2));
        assert_eq!(countdown_digit(ms(2999)), Some(2));
        assert_eq!(countdown_digit(ms(3000)), Some(1));
        assert_eq!(countdown_digit(ms(4499)), Some(1));
        assert_eq!(countdown_digit(ms(4500)), None);
    }

    #[test]
    fn test_printing_fill_is_deterministic_and_varies() {
        assert_eq!(printing_fill(7), printing_fill(7));
        assert_ne!(printing_fill(7), printing_fill(8));
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(PrintBadge::Ready.label(), "Print");
        assert_eq!(PrintBadge::Ready.fill(), [255, 255, 0]);
        let printing = PrintBadge::Printing { fill: [1, 2, 3] };
        assert_eq!(printing.label(), "Printing");
        assert_eq!(printing.fill(), [1, 2, 3]);
    }
}
