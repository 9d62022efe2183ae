//! Application supervisor and monitoring
//!
//! Prints the startup banner and keeps a coarse uptime log. It never touches
//! the output word; that belongs to the control task alone.

use crate::config;
use crate::route::RouteTable;
use crate::types::{OutputState, APP_VERSION};

/// Application supervisor responsible for banners and uptime reporting
pub struct AppSupervisor {
    uptime_seconds: u32,
    last_report: u32,
}

impl AppSupervisor {
    pub const fn new() -> Self {
        Self {
            uptime_seconds: 0,
            last_report: 0,
        }
    }

    /// Print application startup banner with the route map
    pub fn print_startup_banner(&self, routes: &RouteTable) {
        info!("========================================");
        info!("Junction Panel v{}", APP_VERSION);
        info!("Route control for Tortoise turnout motors");
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!(
            "Shift register: data=GPIO{} clock=GPIO{} latch=GPIO{}",
            config::SR_DATA_PIN,
            config::SR_CLOCK_PIN,
            config::SR_LATCH_PIN
        );
        info!("Inputs: {} ({} routes)", routes.len(), routes.route_count());
        for input in routes.iter() {
            match input.group {
                Some(group) => {
                    let [motor, normal, reverse] = group.bits();
                    info!(
                        "  {} GPIO{} {}ms -> motor={} normal={} reverse={}",
                        input.name, input.pin, input.debounce_ms, motor, normal, reverse
                    );
                }
                None => info!("  {} GPIO{} {}ms -> spare", input.name, input.pin, input.debounce_ms),
            }
        }
        info!(
            "Boot pattern: 0x{:04X}",
            OutputState::from_bits(config::DEFAULT_OUTPUT_PATTERN).bits()
        );
        info!("========================================");
    }

    pub fn print_init_success(&self) {
        info!("Junction panel initialized successfully");
        info!("Waiting for route buttons...");
    }

    /// Advance the uptime clock. Returns true when a status report is due.
    pub fn tick(&mut self, elapsed_secs: u32) -> bool {
        self.uptime_seconds = self.uptime_seconds.saturating_add(elapsed_secs);
        if self.uptime_seconds - self.last_report >= config::SUPERVISOR_REPORT_SECS {
            self.last_report = self.uptime_seconds;
            true
        } else {
            false
        }
    }

    /// Run the main supervisor loop
    #[cfg(feature = "rp2040")]
    pub async fn run(&mut self) {
        use embassy_time::{Duration, Timer};

        info!("Application supervisor started");

        loop {
            Timer::after(Duration::from_secs(config::SUPERVISOR_TICK_SECS)).await;
            if self.tick(config::SUPERVISOR_TICK_SECS as u32) {
                self.print_status();
            }
        }
    }

    /// Print current application status
    #[cfg_attr(not(feature = "rp2040"), allow(dead_code))]
    fn print_status(&self) {
        let minutes = self.uptime_seconds / 60;
        let hours = minutes / 60;
        let remaining_minutes = minutes % 60;

        if hours > 0 {
            info!("Status: Uptime {}h{}m", hours, remaining_minutes);
        } else {
            info!("Status: Uptime {}m", minutes);
        }
    }

    /// Get current uptime in seconds
    pub fn uptime(&self) -> u32 {
        self.uptime_seconds
    }
}

impl Default for AppSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_minute() {
        let mut supervisor = AppSupervisor::new();
        let due: usize = (0..18).map(|_| usize::from(supervisor.tick(10))).sum();
        assert_eq!(supervisor.uptime(), 180);
        assert_eq!(due, 3);
    }

    #[test]
    fn banner_walks_the_shipped_table() {
        let routes = RouteTable::new(&config::INPUTS).unwrap();
        let supervisor = AppSupervisor::default();
        supervisor.print_startup_banner(&routes);
        supervisor.print_init_success();
        assert_eq!(supervisor.uptime(), 0);
    }

    #[test]
    fn banner_accepts_a_table_other_than_the_shipped_one() {
        let inputs = [
            config::InputConfig::route("X", 20, 12, [0, 1, 2]),
            config::InputConfig::spare("Y", 21, 3),
        ];
        let routes = RouteTable::new(&inputs).unwrap();
        AppSupervisor::new().print_startup_banner(&routes);
        let wiring: std::vec::Vec<(u8, u64)> = routes.iter().map(|e| (e.pin, e.debounce_ms)).collect();
        assert_eq!(wiring, [(20, 12), (21, 3)]);
    }
}
