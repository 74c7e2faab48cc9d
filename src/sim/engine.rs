//! Simulation engine that orchestrates the dispatcher, metering, and aging.

use crate::degradation::AgingPolicy;
use crate::devices::Battery;
use crate::meter::PowerMeter;

use super::dispatcher::EnergyManagementDispatcher;
use super::types::{DispatchSnapshot, SimConfig};

/// Simulation engine owning the demand series, dispatcher, meter, and an
/// optional aging policy.
///
/// Each step is a pure sequential composition: dispatch the demand sample,
/// meter the battery terminals, then age the battery. Single-threaded and
/// deterministic; there is exactly one writer per device per step.
pub struct Engine {
    config: SimConfig,
    demand_w: Vec<f32>,
    dispatcher: EnergyManagementDispatcher,
    aging: Option<AgingPolicy>,
    meter: PowerMeter,
    soc_sum: f32,
    soc_count: usize,
}

impl Engine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulation configuration
    /// * `demand_w` - Demand samples in watts; indexed modulo its length,
    ///   so a one-day profile wraps across multi-day runs
    /// * `dispatcher` - Dispatcher owning the storage devices
    /// * `aging` - Optional aging policy applied after every step
    ///
    /// # Panics
    ///
    /// Panics if `demand_w` is empty.
    pub fn new(
        config: SimConfig,
        demand_w: Vec<f32>,
        dispatcher: EnergyManagementDispatcher,
        aging: Option<AgingPolicy>,
    ) -> Self {
        assert!(!demand_w.is_empty(), "demand series must not be empty");
        Self {
            config,
            demand_w,
            dispatcher,
            aging,
            meter: PowerMeter::new("HBESS Meter"),
            soc_sum: 0.0,
            soc_count: 0,
        }
    }

    /// Executes one simulation timestep and returns the snapshot.
    ///
    /// The snapshot reflects end-of-step state: when an aging policy is
    /// configured, its capacity and SoC re-clamp are already applied.
    pub fn step(&mut self, t: usize) -> DispatchSnapshot {
        let demand_w = self.demand_w[t % self.demand_w.len()];
        let dt_s = self.config.dt_s;

        let mut snapshot = self.dispatcher.dispatch(demand_w, dt_s, t);

        // Meter the battery terminals (reporting only, unity phase assumed)
        self.meter.update(snapshot.v_batt, snapshot.i_batt, 0.0);

        // Running average SoC feeds the stress-aging policy
        self.soc_sum += snapshot.soc_batt.clamp(0.0, 1.0);
        self.soc_count += 1;

        if let Some(policy) = &self.aging {
            let energy_discharged_kwh = snapshot.v_batt * snapshot.i_batt * dt_s / 3_600_000.0;
            let avg_soc = self.soc_sum / self.soc_count as f32;
            policy.age(self.dispatcher.battery_mut(), energy_discharged_kwh, avg_soc);

            snapshot.soc_batt = self.dispatcher.battery().soc;
            snapshot.soh_batt = self.dispatcher.battery().soh;
        }

        snapshot
    }

    /// Executes all timesteps and returns the complete snapshot vector.
    pub fn run(&mut self) -> Vec<DispatchSnapshot> {
        let total = self.config.total_steps();
        let mut results = Vec::with_capacity(total);
        for t in 0..total {
            results.push(self.step(t));
        }
        results
    }

    /// Returns a reference to the battery (for KPI capacity queries).
    pub fn battery(&self) -> &Battery {
        self.dispatcher.battery()
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the latest meter reading.
    pub fn meter(&self) -> &PowerMeter {
        &self.meter
    }
}
