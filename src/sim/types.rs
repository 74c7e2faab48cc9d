//! Core simulation types: configuration and per-step dispatch records.

use std::fmt;

/// Centralized simulation configuration.
///
/// All devices and the engine reference this struct for timing parameters.
///
/// # Examples
///
/// ```
/// use hbess_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(96, 1, 42);
/// assert_eq!(cfg.dt_s, 900.0);
/// assert_eq!(cfg.total_steps(), 96);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation steps per day.
    pub steps_per_day: usize,
    /// Number of days to simulate.
    pub days: usize,
    /// Duration of one timestep in seconds, derived as `86400 / steps_per_day`.
    pub dt_s: f32,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_day` or `days` is zero.
    pub fn new(steps_per_day: usize, days: usize, seed: u64) -> Self {
        assert!(steps_per_day > 0, "steps_per_day must be > 0");
        assert!(days > 0, "days must be > 0");
        Self {
            steps_per_day,
            days,
            dt_s: 86_400.0 / steps_per_day as f32,
            seed,
        }
    }

    /// Total number of simulation steps across all days.
    pub fn total_steps(&self) -> usize {
        self.steps_per_day * self.days
    }
}

/// Immutable record of one dispatch step.
///
/// Produced fresh each step by the dispatcher, consumed by reporting and
/// export; the core keeps no history of its own.
#[derive(Debug, Clone)]
pub struct DispatchSnapshot {
    /// Timestep index.
    pub timestep: usize,
    /// Simulation time in hours.
    pub time_hr: f32,
    /// Instantaneous load demand (W, positive).
    pub load_w: f32,
    /// Supercapacitor power request (W, negative while discharging).
    pub sc_w: f32,
    /// Battery power request (W, positive while discharging).
    pub batt_w: f32,
    /// Supercapacitor terminal voltage (V).
    pub v_sc: f32,
    /// Battery terminal voltage (V).
    pub v_batt: f32,
    /// Supercapacitor current (A, negative while discharging).
    pub i_sc: f32,
    /// Battery current (A).
    pub i_batt: f32,
    /// Battery state of charge after this step. May transiently sit outside
    /// [0, 1] (nonlinear drop model); clamp before display if needed.
    pub soc_batt: f32,
    /// Battery state of health after this step.
    pub soh_batt: f32,
    /// Whether a demand transient was flagged this step.
    pub transient: bool,
}

impl fmt::Display for DispatchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({:>6.2}h) | load={:>9.1} W  sc={:>9.1} W  batt={:>9.1} W | \
             v_sc={:>6.1} V  v_batt={:>6.1} V | i_sc={:>7.2} A  i_batt={:>7.2} A | \
             SoC={:>5.1}%  SoH={:>5.1}%{}",
            self.timestep,
            self.time_hr,
            self.load_w,
            self.sc_w,
            self.batt_w,
            self.v_sc,
            self.v_batt,
            self.i_sc,
            self.i_batt,
            self.soc_batt.clamp(0.0, 1.0) * 100.0,
            self.soh_batt * 100.0,
            if self.transient { "  [transient]" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(96, 1, 42);
        assert_eq!(cfg.steps_per_day, 96);
        assert_eq!(cfg.days, 1);
        assert_eq!(cfg.dt_s, 900.0);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.total_steps(), 96);
    }

    #[test]
    fn sim_config_multi_day() {
        let cfg = SimConfig::new(24, 3, 0);
        assert_eq!(cfg.total_steps(), 72);
        assert_eq!(cfg.dt_s, 3600.0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_steps_panics() {
        SimConfig::new(0, 1, 0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_days_panics() {
        SimConfig::new(96, 0, 0);
    }

    #[test]
    fn snapshot_display_does_not_panic() {
        let s = DispatchSnapshot {
            timestep: 3,
            time_hr: 0.75,
            load_w: 105_000.0,
            sc_w: -5_000.0,
            batt_w: 110_000.0,
            v_sc: 479.2,
            v_batt: 478.8,
            i_sc: -10.4,
            i_batt: 229.7,
            soc_batt: 0.93,
            soh_batt: 0.999,
            transient: true,
        };
        let text = format!("{s}");
        assert!(text.contains("[transient]"));
    }
}
