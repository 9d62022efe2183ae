//! Route button debouncing
//!
//! Each fascia button is a normally-open switch to ground on a pulled-up
//! GPIO. A level change is accepted once the raw input has held steady for
//! that button's interval; a press is reported as a single falling edge.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

// ===================================================================
// Button Debouncing State
// ===================================================================

/// Stable-interval debouncer over an idle-high line.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval_ms: u64,
    /// Accepted level (true = high / released)
    stable: bool,
    /// Last raw sample
    raw: bool,
    last_change_ms: u64,
    fell: bool,
    rose: bool,
}

impl Debouncer {
    /// Start from the level currently on the pin, so a held button at boot
    /// is not reported as a press.
    pub const fn new(interval_ms: u64, initial_high: bool, now_ms: u64) -> Self {
        Self {
            interval_ms,
            stable: initial_high,
            raw: initial_high,
            last_change_ms: now_ms,
            fell: false,
            rose: false,
        }
    }

    /// Feed one raw sample. Returns true if the accepted level changed.
    pub fn update(&mut self, raw_high: bool, now_ms: u64) -> bool {
        self.fell = false;
        self.rose = false;

        if raw_high != self.raw {
            self.raw = raw_high;
            self.last_change_ms = now_ms;
        }

        if self.raw != self.stable && now_ms.saturating_sub(self.last_change_ms) >= self.interval_ms {
            self.stable = self.raw;
            self.fell = !self.stable;
            self.rose = self.stable;
            true
        } else {
            false
        }
    }

    /// High-to-low on the last update
    pub fn fell(&self) -> bool {
        self.fell
    }

    /// Low-to-high on the last update
    pub fn rose(&self) -> bool {
        self.rose
    }

    pub fn is_high(&self) -> bool {
        self.stable
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

// ===================================================================
// Debounced Input Source
// ===================================================================

/// A button the control loop can poll for presses.
pub trait DebouncedInput {
    /// Sample the line and advance the debouncer to `now_ms`.
    fn update(&mut self, now_ms: u64);

    /// True exactly once per press, on the update that accepted it.
    fn fell(&self) -> bool;
}

/// Debounced active-low button on a GPIO.
pub struct DebouncedButton<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P> DebouncedButton<P>
where
    P: InputPin<Error = Infallible>,
{
    pub fn new(mut pin: P, interval_ms: u64, now_ms: u64) -> Self {
        let initial_high = pin.is_high().unwrap_or_else(|e| match e {});
        Self {
            pin,
            debouncer: Debouncer::new(interval_ms, initial_high, now_ms),
        }
    }

    pub fn is_pressed(&self) -> bool {
        !self.debouncer.is_high()
    }
}

impl<P> DebouncedInput for DebouncedButton<P>
where
    P: InputPin<Error = Infallible>,
{
    fn update(&mut self, now_ms: u64) {
        let raw_high = self.pin.is_high().unwrap_or_else(|e| match e {});
        if self.debouncer.update(raw_high, now_ms) {
            debug!(
                "Button {} after {}ms",
                if self.debouncer.is_high() { "released" } else { "pressed" },
                self.debouncer.interval_ms()
            );
        }
    }

    fn fell(&self) -> bool {
        self.debouncer.fell()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;

    /// Input pin whose level the test drives through a shared cell.
    #[derive(Clone)]
    pub(crate) struct MockInput(pub Rc<Cell<bool>>);

    impl MockInput {
        pub(crate) fn idle() -> Self {
            Self(Rc::new(Cell::new(true)))
        }

        pub(crate) fn set_high(&self, high: bool) {
            self.0.set(high);
        }
    }

    impl ErrorType for MockInput {
        type Error = Infallible;
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    /// Sample `high` every millisecond over `[from, to)`, counting presses.
    fn run(button: &mut DebouncedButton<MockInput>, pin: &MockInput, high: bool, from: u64, to: u64) -> usize {
        pin.set_high(high);
        (from..to)
            .filter(|&t| {
                button.update(t);
                button.fell()
            })
            .count()
    }

    #[test]
    fn single_press_reports_one_edge() {
        let pin = MockInput::idle();
        let mut button = DebouncedButton::new(pin.clone(), 5, 0);
        assert_eq!(run(&mut button, &pin, true, 0, 10), 0);
        assert_eq!(run(&mut button, &pin, false, 10, 100), 1);
        assert!(button.is_pressed());
        assert_eq!(run(&mut button, &pin, true, 100, 120), 0);
        assert!(!button.is_pressed());
    }

    #[test]
    fn edge_waits_for_interval() {
        let pin = MockInput::idle();
        let mut button = DebouncedButton::new(pin.clone(), 8, 0);
        pin.set_high(false);
        for t in 10..18 {
            button.update(t);
            assert!(!button.fell(), "early edge at {t}");
        }
        button.update(18);
        assert!(button.fell());
        button.update(19);
        assert!(!button.fell());
    }

    #[test]
    fn bounces_shorter_than_interval_are_ignored() {
        let pin = MockInput::idle();
        let mut button = DebouncedButton::new(pin.clone(), 5, 0);
        let mut edges = 0;
        for t in 0..40 {
            // chatter: low for 2ms, high for 2ms
            pin.set_high((t / 2) % 2 == 0);
            button.update(t);
            edges += usize::from(button.fell());
        }
        assert_eq!(edges, 0);
    }

    #[test]
    fn bouncy_press_settles_to_one_edge() {
        let pin = MockInput::idle();
        let mut button = DebouncedButton::new(pin.clone(), 5, 0);
        let mut edges = 0;
        for t in 0..6 {
            pin.set_high(t % 2 == 1);
            button.update(t);
            edges += usize::from(button.fell());
        }
        edges += run(&mut button, &pin, false, 6, 50);
        assert_eq!(edges, 1);
    }

    #[test]
    fn held_at_boot_is_not_a_press() {
        let pin = MockInput::idle();
        pin.set_high(false);
        let mut button = DebouncedButton::new(pin.clone(), 5, 0);
        assert_eq!(run(&mut button, &pin, false, 0, 50), 0);
        assert!(button.is_pressed());
    }

    #[test]
    fn release_reports_rose_not_fell() {
        let mut debouncer = Debouncer::new(5, true, 0);
        debouncer.update(false, 1);
        assert!(debouncer.update(false, 6));
        assert!(debouncer.fell());
        debouncer.update(true, 20);
        assert!(debouncer.update(true, 25));
        assert!(debouncer.rose());
        assert!(!debouncer.fell());
    }
}
