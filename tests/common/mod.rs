//! Shared test fixtures for integration tests.

use hbess_sim::devices::{Battery, FastStorage, Supercapacitor};
use hbess_sim::sim::dispatcher::EnergyManagementDispatcher;
use hbess_sim::sim::types::SimConfig;

/// Default simulation configuration (96 steps/day at 900 s, 1 day, seed 42).
pub fn default_config() -> SimConfig {
    SimConfig::new(96, 1, 42)
}

/// Default battery (500 kWh, 480 V, 250 kW, full charge, 90% efficiency).
pub fn default_battery() -> Battery {
    Battery::new(500.0, 480.0, 250_000.0, 1.0, 0.005, 0.90)
}

/// Default supercapacitor (1000 F at 480 V, 10 kW discharge).
pub fn default_supercap() -> Supercapacitor {
    Supercapacitor::new(1000.0, 480.0, 0.001, 500.0, 10_000.0)
}

/// Default hybrid dispatcher (1 kW transient threshold, 10-sample window).
pub fn default_dispatcher() -> EnergyManagementDispatcher {
    EnergyManagementDispatcher::new(
        default_battery(),
        FastStorage::Supercap(default_supercap()),
        1000.0,
        10,
    )
}
