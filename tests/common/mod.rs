//! Shared test fixtures for integration tests.

use demand_sim::appliances::{Appliance, CycleWindow, DutyCycle, SubCycle, Window};
use demand_sim::sim::{Orchestrator, SimConfig, UseCase, User};

/// Wraps a single appliance into a one-member use case and initializes it.
pub fn single_appliance(appliance: Appliance, days: usize, seed: u64) -> Orchestrator {
    let uc = UseCase::new(
        vec![User::new("Facility", 1).with_appliance(appliance)],
        SimConfig::new(days, Some(seed)),
    );
    uc.initialize().expect("fixture should initialize")
}

/// Two always-on 1900 W units switching together, no duty cycle.
pub fn flat_compressor() -> Appliance {
    Appliance::new("Compressor", 1900.0, 1440)
        .with_number(2)
        .with_windows(vec![Window::new(0, 1440)])
        .with_fixed(true)
        .with_variability(0.0)
}

/// The cold-storage compressor with every randomness parameter at zero.
pub fn cycling_compressor() -> Appliance {
    Appliance::new("Compressor", 1900.0, 1440)
        .with_number(2)
        .with_windows(vec![Window::new(0, 1440)])
        .with_fixed(true)
        .with_duty_cycle(
            DutyCycle::new(vec![
                SubCycle::double(79.69 / 2.0, 420, 79.69 / 2.0, 420, 0.0),
                SubCycle::single(197.03 / 2.0, 120, 0.0),
                SubCycle::single(120.06 / 2.0, 480, 0.0),
            ])
            .with_behaviour(vec![
                CycleWindow::new(1, 0, 419),
                CycleWindow::new(1, 1020, 1440),
                CycleWindow::new(2, 420, 539),
                CycleWindow::new(3, 540, 1019),
            ]),
        )
}

/// A single 1 W lamp, so a day's energy equals its active minutes.
pub fn unit_lamp(func_time: usize, variability: f64, window_random_var: f64) -> Appliance {
    Appliance::new("Lamp", 1.0, func_time)
        .with_windows(vec![Window::new(420, 540).with_random_var(window_random_var)])
        .with_variability(variability)
}
