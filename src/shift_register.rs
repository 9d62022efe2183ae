//! 74HC595 output chain
//!
//! Two cascaded serial-in/parallel-out registers carry the 16-bit output
//! word. Data is clocked in with the latch held low, so the parallel outputs
//! keep showing the previous word until the latch rises and all sixteen
//! change together.
//!
//! The write is open-loop: there is no readback, and a broken wire is
//! indistinguishable from a good transfer.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::types::OutputState;

/// Sink for complete output words.
pub trait OutputDriver {
    /// Commit `state` to the physical outputs in one atomic step.
    fn write(&mut self, state: OutputState);
}

/// Bit-banged driver on three GPIOs.
pub struct ShiftRegister<DATA, CLOCK, LATCH, D> {
    data: DATA,
    clock: CLOCK,
    latch: LATCH,
    delay: D,
    half_period_us: u32,
}

impl<DATA, CLOCK, LATCH, D> ShiftRegister<DATA, CLOCK, LATCH, D>
where
    DATA: OutputPin<Error = Infallible>,
    CLOCK: OutputPin<Error = Infallible>,
    LATCH: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Lines are expected idle: clock low, latch high.
    pub fn new(data: DATA, clock: CLOCK, latch: LATCH, delay: D, half_period_us: u32) -> Self {
        Self {
            data,
            clock,
            latch,
            delay,
            half_period_us,
        }
    }

    /// Shift one byte, most significant bit first.
    fn shift_out(&mut self, byte: u8) {
        for i in (0..8).rev() {
            let high = byte & (1 << i) != 0;
            if high {
                self.data.set_high().unwrap_or_else(|e| match e {});
            } else {
                self.data.set_low().unwrap_or_else(|e| match e {});
            }
            self.settle();
            self.clock.set_high().unwrap_or_else(|e| match e {});
            self.settle();
            self.clock.set_low().unwrap_or_else(|e| match e {});
        }
    }

    fn settle(&mut self) {
        if self.half_period_us > 0 {
            self.delay.delay_us(self.half_period_us);
        }
    }
}

impl<DATA, CLOCK, LATCH, D> OutputDriver for ShiftRegister<DATA, CLOCK, LATCH, D>
where
    DATA: OutputPin<Error = Infallible>,
    CLOCK: OutputPin<Error = Infallible>,
    LATCH: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn write(&mut self, state: OutputState) {
        let frame = state.frame();

        self.latch.set_low().unwrap_or_else(|e| match e {});
        self.shift_out(frame.high);
        self.shift_out(frame.low);
        self.latch.set_high().unwrap_or_else(|e| match e {});
    }
}
