//! Junction Panel - route control firmware for a model-railroad junction
//!
//! Reads debounced route buttons and drives Tortoise turnout motors and
//! their indicator LEDs through a 16-bit 74HC595 shift-register chain.
//!
//! ## Architecture
//! - **Route table**: each button owns a disjoint 3-bit group of the output word
//! - **Control loop**: a press XOR-toggles its group and re-latches all 16 outputs
//! - **Open loop**: no position feedback; the panel shows what it commanded
//! - **Board support**: RP2040 with Embassy behind the `rp2040` feature; the
//!   rest of the crate builds and tests on the host

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod buttons;
pub mod config;
pub mod error;
pub mod panel;
pub mod route;
pub mod shift_register;
pub mod supervisor;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod channels;
#[cfg(feature = "rp2040")]
pub mod hardware;
