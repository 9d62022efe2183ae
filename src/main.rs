//! Junction Panel - RP2040 firmware entry point
//!
//! Hardware: Raspberry Pi Pico (RP2040)
//! Inputs: 8 momentary route buttons (5 routes, 3 spares), active-low
//! Outputs: 2x 74HC595 driving 5 Tortoise motors and their indicator LEDs

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use panic_halt as _;
use defmt_rtt as _; // global logger

use junction_panel::*;

/// Main application entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut supervisor = supervisor::AppSupervisor::new();

    // Refuse to start on a bad route table: outputs are never driven
    let routes = match route::RouteTable::new(&config::INPUTS) {
        Ok(routes) => routes,
        Err(e) => {
            error!("Route table rejected: {}", e);
            core::panic!("Invalid route configuration");
        }
    };

    let p = embassy_rp::init(Default::default());

    supervisor.print_startup_banner(&routes);

    match hardware::init_panel_tasks(&spawner, p, routes) {
        Ok(()) => supervisor.print_init_success(),
        Err(hardware::InitError::Config(e)) => {
            error!("Route table does not match the wiring: {}", e);
            core::panic!("Invalid route configuration");
        }
        Err(hardware::InitError::Spawn(e)) => {
            error!("Failed to spawn panel tasks: {:?}", e);
            core::panic!("Hardware initialization failed");
        }
    }

    // Run the main supervisor loop
    supervisor.run().await;
}
