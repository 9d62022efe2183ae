//! Control loop
//!
//! One pass samples every button, then services each press in table order:
//! toggle that route's group and immediately push the whole word out. Two
//! presses in the same pass give two complete refreshes, never a merged one.

use heapless::Vec;

use crate::buttons::DebouncedInput;
use crate::config::MAX_INPUTS;
use crate::error::ConfigError;
use crate::route::{RouteStateRegister, RouteTable};
use crate::shift_register::OutputDriver;
use crate::types::{OutputState, RouteEvent, RoutePosition};

/// Owns the output word and the driver it is written through.
pub struct ControlPanel<D> {
    register: RouteStateRegister,
    routes: RouteTable,
    driver: D,
}

impl<D: OutputDriver> ControlPanel<D> {
    pub fn new(routes: RouteTable, driver: D, initial: OutputState) -> Self {
        Self {
            register: RouteStateRegister::new(initial),
            routes,
            driver,
        }
    }

    /// Reject an input set that does not line up one-to-one with the route
    /// table. Must pass before `start`, or a route could be configured but
    /// never polled.
    pub fn check_inputs<I: DebouncedInput>(&self, inputs: &[I]) -> Result<(), ConfigError> {
        self.routes.check_wired(inputs.len())
    }

    /// Drive the outputs to the boot pattern before any input is accepted.
    pub fn start(&mut self) {
        let state = self.register.current();
        info!("Writing boot pattern 0x{:04X}", state.bits());
        self.driver.write(state);
    }

    /// One control-loop pass over `inputs`, which line up with the route
    /// table by index. Returns the presses serviced, in service order.
    pub fn poll<I: DebouncedInput>(&mut self, inputs: &mut [I], now_ms: u64) -> Vec<RouteEvent, MAX_INPUTS> {
        for input in inputs.iter_mut() {
            input.update(now_ms);
        }

        let mut events = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            if !input.fell() {
                continue;
            }
            if let Some(event) = self.press(index) {
                // one event per input at most, capacity is MAX_INPUTS
                let _ = events.push(event);
            }
        }
        events
    }

    /// Service a press on `input`: toggle its group and commit the word.
    /// Spare and unknown inputs leave the outputs alone.
    pub fn press(&mut self, input: usize) -> Option<RouteEvent> {
        let Some(entry) = self.routes.get(input) else {
            warn!("Press on unmapped input {}", input);
            return None;
        };
        let Some(group) = entry.group else {
            debug!("Spare button {} pressed", entry.name);
            return None;
        };

        let state = self.register.toggle_group(&group);
        self.driver.write(state);

        Some(RouteEvent {
            input,
            name: entry.name,
            state,
            position: group.position(state),
        })
    }

    pub fn current(&self) -> OutputState {
        self.register.current()
    }

    /// Commanded position of the route on `input`
    pub fn position(&self, input: usize) -> Option<RoutePosition> {
        self.routes
            .group_for(input)
            .map(|group| group.position(self.register.current()))
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}
