//! Hybrid battery + supercapacitor energy storage system (HBESS) simulator.

/// TOML scenario configuration and presets.
pub mod config;
/// Generic feedback control primitives (PI, droop).
pub mod control;
/// Selectable battery aging policies.
pub mod degradation;
pub mod devices;
/// Telemetry export.
pub mod io;
/// RMS power metering.
pub mod meter;
/// Dispatcher, transient detection, engine, and KPI modules.
pub mod sim;
