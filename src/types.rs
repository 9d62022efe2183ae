//! Common types and data structures used across the junction panel
//!
//! This module contains the output word, its wire frame, and the small
//! records the control loop hands back to its caller.

use crate::error::ConfigError;

/// Width of the output word (two cascaded 8-bit shift registers)
pub const OUTPUT_BITS: u8 = 16;

/// The 16-bit word latched onto the shift-register outputs.
///
/// Bit `n` drives parallel output `n` of the chain: bits 15..8 sit on the
/// first register in the chain's far end, bits 7..0 on the near one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState(u16);

impl OutputState {
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_set(self, bit: u8) -> bool {
        bit < OUTPUT_BITS && self.0 & (1 << bit) != 0
    }

    /// Flip every bit in `mask`.
    pub const fn toggled(self, mask: u16) -> Self {
        Self(self.0 ^ mask)
    }

    /// Split into the two bytes sent on the wire, high byte first.
    pub const fn frame(self) -> SerializedFrame {
        SerializedFrame {
            high: (self.0 >> 8) as u8,
            low: (self.0 & 0xFF) as u8,
        }
    }
}

/// Wire form of one output refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerializedFrame {
    pub high: u8,
    pub low: u8,
}

impl SerializedFrame {
    /// Bytes in transmission order
    pub const fn as_bytes(&self) -> [u8; 2] {
        [self.high, self.low]
    }
}

/// The three output bits owned by one route.
///
/// Construction checks that the indices are distinct and inside the output
/// word, so a group in hand always flips exactly three bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouteBitGroup {
    bits: [u8; 3],
    mask: u16,
}

impl RouteBitGroup {
    /// `motor` drives Tortoise polarity, `normal`/`reverse` the fascia LEDs.
    pub const fn new(motor: u8, normal: u8, reverse: u8) -> Result<Self, ConfigError> {
        let bits = [motor, normal, reverse];
        let mut mask = 0u16;
        let mut i = 0;
        while i < bits.len() {
            let bit = bits[i];
            if bit >= OUTPUT_BITS {
                return Err(ConfigError::BitOutOfRange { bit });
            }
            if mask & (1 << bit) != 0 {
                return Err(ConfigError::RepeatedBit { bit });
            }
            mask |= 1 << bit;
            i += 1;
        }
        Ok(Self { bits, mask })
    }

    pub const fn from_array(bits: [u8; 3]) -> Result<Self, ConfigError> {
        Self::new(bits[0], bits[1], bits[2])
    }

    pub const fn bits(&self) -> [u8; 3] {
        self.bits
    }

    pub const fn mask(&self) -> u16 {
        self.mask
    }

    /// First bit shared with `other`, if any.
    pub const fn overlap(&self, other: &RouteBitGroup) -> Option<u8> {
        let shared = self.mask & other.mask;
        if shared == 0 {
            None
        } else {
            Some(shared.trailing_zeros() as u8)
        }
    }

    /// Indicated position of this route within `state`.
    pub const fn position(&self, state: OutputState) -> RoutePosition {
        match (state.is_set(self.bits[1]), state.is_set(self.bits[2])) {
            (true, false) => RoutePosition::Normal,
            (false, true) => RoutePosition::Reverse,
            _ => RoutePosition::Indeterminate,
        }
    }
}

/// Position shown by a route's indicator LEDs.
///
/// Open-loop: this is what the panel commanded, not where the points are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoutePosition {
    Normal,
    Reverse,
    Indeterminate,
}

/// One serviced button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouteEvent {
    /// Index of the input in the configured table
    pub input: usize,
    pub name: &'static str,
    /// Word committed to the outputs by this press
    pub state: OutputState,
    pub position: RoutePosition,
}

/// Current application version, from the package manifest
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
