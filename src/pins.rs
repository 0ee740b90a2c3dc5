//! GPIO pin assignments for the alarm board.
//!
//! Single source of truth: every loop references this module rather than
//! hard-coding pin numbers. Numbers follow the physical (board) numbering of
//! the Raspberry Pi 40-pin header; backends that address lines by BCM number
//! translate through [`board_to_bcm`].

// ---------------------------------------------------------------------------
// Service supervisor
// ---------------------------------------------------------------------------

/// Digital input: HIGH = alarm service requested, LOW = stop it.
/// Configured with the internal pull-up.
pub const ALARM_CONTROL_PIN: u8 = 15;

// ---------------------------------------------------------------------------
// Siren
// ---------------------------------------------------------------------------

/// Digital output: siren relay (active HIGH).
pub const RELAY_PIN: u8 = 13;
/// Digital output: arm indicator LED (active HIGH).
pub const LED_PIN: u8 = 11;

// ---------------------------------------------------------------------------
// Header map
// ---------------------------------------------------------------------------

/// (board pin, BCM line) for every GPIO-capable pin on the 40-pin header.
const HEADER: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// Translate a physical header pin to its BCM GPIO number.
///
/// Returns `None` for power, ground and out-of-range pins.
pub fn board_to_bcm(board: u8) -> Option<u8> {
    HEADER
        .iter()
        .find(|(b, _)| *b == board)
        .map(|(_, bcm)| *bcm)
}
