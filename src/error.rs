//! Configuration errors
//!
//! Every runtime operation of the panel is infallible; the only failures are
//! defects in the route table, caught once at boot before any output is driven.

use core::fmt;

/// A route table that would let one button disturb another route's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A group names a bit outside the 16-bit output word.
    BitOutOfRange { bit: u8 },
    /// A group names the same bit twice.
    RepeatedBit { bit: u8 },
    /// Two inputs' groups share an output bit.
    OverlappingGroups { first: usize, second: usize, bit: u8 },
    /// More inputs than the fixed-capacity tables hold.
    TooManyInputs { count: usize },
    /// The table and the claimed button pins disagree on the input count.
    InputCountMismatch { configured: usize, wired: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BitOutOfRange { bit } => write!(f, "bit {bit} is outside the 16-bit output word"),
            Self::RepeatedBit { bit } => write!(f, "bit {bit} appears twice in one group"),
            Self::OverlappingGroups { first, second, bit } => {
                write!(f, "inputs {first} and {second} both drive bit {bit}")
            }
            Self::TooManyInputs { count } => write!(f, "{count} inputs configured, table holds fewer"),
            Self::InputCountMismatch { configured, wired } => {
                write!(f, "{configured} inputs configured but {wired} button pins wired")
            }
        }
    }
}
