//! Hardware abstraction and initialization
//!
//! Builds the RP2040 pins for the route buttons, the 74HC595 chain and the
//! status LED, and spawns the control and status tasks.

use embassy_executor::{SpawnError, Spawner};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::Peripherals;
use embassy_time::{Delay, Duration, Instant, Timer};
use heapless::Vec;

use crate::buttons::DebouncedButton;
use crate::channels::ROUTE_ACTIVITY;
use crate::config::{self, MAX_INPUTS};
use crate::error::ConfigError;
use crate::panel::ControlPanel;
use crate::route::RouteTable;
use crate::shift_register::ShiftRegister;
use crate::types::OutputState;

/// Shift-register chain on GPIO 11 (data), 12 (clock), 13 (latch)
pub type PanelShiftRegister = ShiftRegister<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Route buttons in `config::INPUTS` order
pub type PanelInputs = Vec<DebouncedButton<Input<'static>>, MAX_INPUTS>;

/// Button GPIOs claimed in `PanelHardware::new`, in table order
const BUTTON_PINS: [u8; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

// `config` must describe the pins actually claimed below
const _: () = {
    assert!(
        config::INPUTS.len() == BUTTON_PINS.len(),
        "config::INPUTS needs exactly one entry per claimed button pin"
    );
    let mut i = 0;
    while i < BUTTON_PINS.len() {
        assert!(config::INPUTS[i].pin == BUTTON_PINS[i], "config::INPUTS pin differs from the claimed GPIO");
        i += 1;
    }
    assert!(config::SR_DATA_PIN == 11 && config::SR_CLOCK_PIN == 12 && config::SR_LATCH_PIN == 13);
    assert!(config::LED_STATUS_PIN == 25);
};

/// Reasons the panel tasks could not be brought up
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Config(ConfigError),
    Spawn(SpawnError),
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SpawnError> for InitError {
    fn from(e: SpawnError) -> Self {
        Self::Spawn(e)
    }
}

/// Pins owned by the panel tasks
pub struct PanelHardware {
    pub inputs: PanelInputs,
    pub shift_register: PanelShiftRegister,
    pub status_led: Output<'static>,
}

impl PanelHardware {
    /// Claim the panel's pins. Pin numbers mirror `config`.
    pub fn new(p: Peripherals) -> Self {
        let now = Instant::now().as_millis();

        // Route buttons A..H (active-low with pull-ups)
        let pins = [
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
            Input::new(p.PIN_4, Pull::Up),
            Input::new(p.PIN_5, Pull::Up),
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
            Input::new(p.PIN_9, Pull::Up),
        ];

        let mut inputs: PanelInputs = Vec::new();
        for (pin, input) in pins.into_iter().zip(config::INPUTS.iter()) {
            // BUTTON_PINS has 8 entries, well under MAX_INPUTS
            let _ = inputs.push(DebouncedButton::new(pin, input.debounce_ms, now));
        }

        // Clock idles low; latch idles high so the outputs hold until the first write
        let shift_register = ShiftRegister::new(
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
            Output::new(p.PIN_13, Level::High),
            Delay,
            config::SR_CLOCK_HALF_PERIOD_US,
        );

        Self {
            inputs,
            shift_register,
            status_led: Output::new(p.PIN_25, Level::Low),
        }
    }
}

/// Claim the pins, drive the boot pattern, then spawn the panel tasks.
///
/// Fails without touching the outputs if `routes` does not match the
/// claimed button pins.
pub fn init_panel_tasks(spawner: &Spawner, p: Peripherals, routes: RouteTable) -> Result<(), InitError> {
    let hw = PanelHardware::new(p);

    info!("Claimed {} route inputs", hw.inputs.len());

    let mut panel = ControlPanel::new(
        routes,
        hw.shift_register,
        OutputState::from_bits(config::DEFAULT_OUTPUT_PATTERN),
    );
    panel.check_inputs(&hw.inputs)?;
    // Outputs match the default before any press is read
    panel.start();

    spawner.spawn(status_task(hw.status_led))?;
    spawner.spawn(control_task(panel, hw.inputs))?;

    Ok(())
}

/// Control loop task: sole owner of the output word and the shift register
#[embassy_executor::task]
pub async fn control_task(mut panel: ControlPanel<PanelShiftRegister>, mut inputs: PanelInputs) {
    info!("Control task started");

    let scan_interval = Duration::from_millis(config::BUTTON_SCAN_INTERVAL_MS);

    loop {
        let now = Instant::now().as_millis();

        for event in panel.poll(&mut inputs, now) {
            info!(
                "Route {} -> {} (outputs 0x{:04X})",
                event.name,
                event.position,
                event.state.bits()
            );
            ROUTE_ACTIVITY.signal(event);
        }

        Timer::after(scan_interval).await;
    }
}

/// Status LED task: boot blink, then a heartbeat with a double blink per press
#[embassy_executor::task]
pub async fn status_task(mut status_led: Output<'static>) {
    info!("Status LED task started");

    for _ in 0..config::BOOT_BLINK_COUNT {
        blink(&mut status_led).await;
        Timer::after(Duration::from_millis(config::STATUS_BLINK_MS)).await;
    }

    loop {
        let heartbeat = Timer::after(Duration::from_millis(config::STATUS_HEARTBEAT_MS));
        match select(ROUTE_ACTIVITY.wait(), heartbeat).await {
            Either::First(event) => {
                debug!("Activity on route {}", event.name);
                blink(&mut status_led).await;
                Timer::after(Duration::from_millis(config::STATUS_BLINK_MS)).await;
                blink(&mut status_led).await;
            }
            Either::Second(()) => blink(&mut status_led).await,
        }
    }
}

async fn blink(led: &mut Output<'static>) {
    led.set_high();
    Timer::after(Duration::from_millis(config::STATUS_BLINK_MS)).await;
    led.set_low();
}
