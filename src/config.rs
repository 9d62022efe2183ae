//! Hardware configuration for the junction control panel
//! RP2040-based route panel driving Tortoise turnout motors through two 74HC595s

// ===================================================================
// Route Inputs
// ===================================================================

/// One momentary push button on the fascia, wired active-low to a GPIO.
#[derive(Debug, Clone, Copy)]
pub struct InputConfig {
    /// Short label printed on the fascia
    pub name: &'static str,
    /// RP2040 GPIO number (pull-up enabled)
    pub pin: u8,
    /// Stable interval before a level change is accepted
    pub debounce_ms: u64,
    /// Output bits toggled by a press: (motor, normal LED, reverse LED).
    /// `None` marks a spare button with no route behind it.
    pub group: Option<[u8; 3]>,
}

impl InputConfig {
    pub const fn route(name: &'static str, pin: u8, debounce_ms: u64, group: [u8; 3]) -> Self {
        Self { name, pin, debounce_ms, group: Some(group) }
    }

    pub const fn spare(name: &'static str, pin: u8, debounce_ms: u64) -> Self {
        Self { name, pin, debounce_ms, group: None }
    }
}

/// Upper bound on wired inputs (sizes the fixed-capacity tables)
pub const MAX_INPUTS: usize = 16;

/// Inputs in service order. A press on an earlier entry is handled first
/// when several fire in the same scan.
pub const INPUTS: [InputConfig; 8] = [
    InputConfig::route("A", 2, 8, [0, 1, 2]),
    InputConfig::route("B", 3, 8, [3, 4, 5]),
    InputConfig::route("C", 4, 5, [6, 7, 8]),
    InputConfig::route("D", 5, 5, [9, 10, 11]),
    InputConfig::route("E", 6, 5, [12, 13, 14]),
    InputConfig::spare("F", 7, 5),
    InputConfig::spare("G", 8, 5),
    InputConfig::spare("H", 9, 5),
];

// ===================================================================
// Output Word
// ===================================================================

/// Power-on output word: every route in its default position
/// (reverse indicator of each group lit, motors at polarity 0).
pub const DEFAULT_OUTPUT_PATTERN: u16 = 0b0100_1001_0010_0100;

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

// 74HC595 chain (3-wire serial)
pub const SR_DATA_PIN: u8 = 11; // SER (DS)
pub const SR_CLOCK_PIN: u8 = 12; // SRCLK (SHCP)
pub const SR_LATCH_PIN: u8 = 13; // RCLK (STCP)

// Status LED
pub const LED_STATUS_PIN: u8 = 25; // Built-in LED on Pico

// ===================================================================
// Timing
// ===================================================================

pub const BUTTON_SCAN_INTERVAL_MS: u64 = 1; // Control loop period
pub const SR_CLOCK_HALF_PERIOD_US: u32 = 1; // Settling time after each data/clock edge

pub const STATUS_HEARTBEAT_MS: u64 = 1000; // Heartbeat period when idle
pub const STATUS_BLINK_MS: u64 = 60; // On-time of a single blink
pub const BOOT_BLINK_COUNT: u8 = 3; // Blinks shown once at power-on

pub const SUPERVISOR_TICK_SECS: u64 = 10;
pub const SUPERVISOR_REPORT_SECS: u32 = 60;
