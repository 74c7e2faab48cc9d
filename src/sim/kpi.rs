//! Post-hoc KPI computation from simulation results.

use std::fmt;

use super::types::DispatchSnapshot;

/// Aggregate key performance indicators derived from a complete run.
///
/// Computed post-hoc from `Vec<DispatchSnapshot>` to ensure consistency
/// between step data and reported metrics.
#[derive(Debug, Clone)]
pub struct KpiReport {
    /// Peak instantaneous demand (W).
    pub peak_load_w: f32,
    /// Energy delivered by the battery (kWh).
    pub battery_energy_kwh: f32,
    /// Energy delivered by the supercapacitor (kWh).
    pub supercap_energy_kwh: f32,
    /// Battery equivalent full cycles (discharge-only: energy / capacity).
    pub battery_equivalent_full_cycles: f32,
    /// Number of steps where a transient was flagged.
    pub transient_count: usize,
    /// Lowest battery SoC observed, clamped to [0, 1].
    pub min_soc: f32,
    /// Battery SoC at the end of the run, clamped to [0, 1].
    pub final_soc: f32,
    /// Battery SoH at the end of the run.
    pub final_soh: f32,
    /// First step at which the battery SoC reached zero, if any.
    pub depleted_at_step: Option<usize>,
}

impl KpiReport {
    /// Computes all KPIs from the complete snapshot vector.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation snapshots
    /// * `dt_s` - Timestep duration in seconds
    /// * `battery_capacity_kwh` - Battery capacity for cycle calculation
    pub fn from_snapshots(
        results: &[DispatchSnapshot],
        dt_s: f32,
        battery_capacity_kwh: f32,
    ) -> Self {
        if results.is_empty() {
            return Self {
                peak_load_w: 0.0,
                battery_energy_kwh: 0.0,
                supercap_energy_kwh: 0.0,
                battery_equivalent_full_cycles: 0.0,
                transient_count: 0,
                min_soc: 0.0,
                final_soc: 0.0,
                final_soh: 1.0,
                depleted_at_step: None,
            };
        }

        let mut peak_load_w = 0.0_f32;
        let mut battery_energy_kwh = 0.0_f32;
        let mut supercap_energy_kwh = 0.0_f32;
        let mut transient_count = 0_usize;
        let mut min_soc = 1.0_f32;
        let mut depleted_at_step = None;

        for r in results {
            peak_load_w = peak_load_w.max(r.load_w);
            // Delivered terminal power, not the request
            battery_energy_kwh += (r.v_batt * r.i_batt).max(0.0) * dt_s / 3_600_000.0;
            supercap_energy_kwh += (r.v_sc * r.i_sc).abs() * dt_s / 3_600_000.0;

            if r.transient {
                transient_count += 1;
            }

            let soc = r.soc_batt.clamp(0.0, 1.0);
            min_soc = min_soc.min(soc);
            if depleted_at_step.is_none() && r.soc_batt <= 0.0 {
                depleted_at_step = Some(r.timestep);
            }
        }

        let cycles = if battery_capacity_kwh > 0.0 {
            battery_energy_kwh / battery_capacity_kwh
        } else {
            0.0
        };

        let last = &results[results.len() - 1];

        Self {
            peak_load_w,
            battery_energy_kwh,
            supercap_energy_kwh,
            battery_equivalent_full_cycles: cycles,
            transient_count,
            min_soc,
            final_soc: last.soc_batt.clamp(0.0, 1.0),
            final_soh: last.soh_batt,
            depleted_at_step,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Peak load:             {:.1} W", self.peak_load_w)?;
        writeln!(
            f,
            "Battery energy:        {:.2} kWh ({:.2} equiv. cycles)",
            self.battery_energy_kwh, self.battery_equivalent_full_cycles
        )?;
        writeln!(
            f,
            "Supercap energy:       {:.3} kWh over {} transient steps",
            self.supercap_energy_kwh, self.transient_count
        )?;
        writeln!(
            f,
            "Battery SoC:           min {:.1}%, final {:.1}%",
            self.min_soc * 100.0,
            self.final_soc * 100.0
        )?;
        writeln!(f, "Battery SoH:           {:.2}%", self.final_soh * 100.0)?;
        match self.depleted_at_step {
            Some(t) => write!(f, "Battery depleted at step {t}"),
            None => write!(f, "Battery never depleted"),
        }
    }
}
