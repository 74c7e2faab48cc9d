/// An electrochemical battery model with Ohmic voltage sag and nonlinear
/// state-of-charge decay.
///
/// `Battery` converts a requested discharge power into a delivered terminal
/// voltage and current, and tracks remaining capacity, SoC, and aging state.
///
/// # Power Convention
/// - Positive `power_load_w`: discharge request (load on the battery)
/// - Non-positive requests are no-ops that return open-circuit conditions
///
/// # SoC model
/// SoC is *not* purely `remaining_capacity / capacity`: every discharge call
/// subtracts an additional coulomb-counted drop scaled by
/// `1.5 - exp(-5 * (1 - soc))`, so SoC decays faster than linearly near full
/// charge and may transiently leave [0, 1]. Callers that need a bounded value
/// must clamp it themselves.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nominal (open-circuit) voltage in volts.
    pub nominal_voltage_v: f32,

    /// Internal series resistance in ohms.
    pub internal_resistance_ohm: f32,

    /// Rated capacity in kWh. Shrinks as the battery ages.
    pub capacity_kwh: f32,

    /// Capacity at construction in kWh. Never changes.
    pub initial_capacity_kwh: f32,

    /// Capacity expressed in amp-seconds, fixed from the initial
    /// capacity and nominal voltage.
    pub capacity_as: f32,

    /// Energy still stored, in kWh. Never exceeds `capacity_kwh`.
    pub remaining_capacity_kwh: f32,

    /// State of charge. Tracked independently of the capacity ratio
    /// (see the type-level SoC model note).
    pub soc: f32,

    /// Instantaneous current in amps, updated on every discharge call.
    pub current_a: f32,

    /// Maximum discharge power in watts.
    pub rated_discharge_w: f32,

    /// Discharge efficiency in (0, 1].
    pub discharge_efficiency: f32,

    /// Lifetime energy throughput in kWh, accumulated by aging policies.
    pub throughput_kwh: f32,

    /// State of health: fraction of original capacity remaining (1.0 = new).
    pub soh: f32,
}

impl Battery {
    /// Creates a new battery with the given nameplate parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Rated capacity in kWh (must be > 0)
    /// * `nominal_voltage_v` - Nominal voltage in volts (must be > 0)
    /// * `rated_discharge_w` - Maximum discharge power in watts
    /// * `soc_init` - Initial state of charge, clamped to [0, 1]
    /// * `internal_resistance_ohm` - Internal series resistance in ohms
    /// * `discharge_efficiency` - Discharge efficiency in (0, 1]
    ///
    /// # Panics
    ///
    /// Panics if capacity, voltage, or efficiency is out of range.
    pub fn new(
        capacity_kwh: f32,
        nominal_voltage_v: f32,
        rated_discharge_w: f32,
        soc_init: f32,
        internal_resistance_ohm: f32,
        discharge_efficiency: f32,
    ) -> Self {
        assert!(capacity_kwh > 0.0, "capacity_kwh must be > 0");
        assert!(nominal_voltage_v > 0.0, "nominal_voltage_v must be > 0");
        assert!(
            discharge_efficiency > 0.0 && discharge_efficiency <= 1.0,
            "discharge_efficiency must be in (0, 1]"
        );

        let soc = soc_init.clamp(0.0, 1.0);
        Self {
            nominal_voltage_v,
            internal_resistance_ohm,
            capacity_kwh,
            initial_capacity_kwh: capacity_kwh,
            // kWh -> amp-seconds at nominal voltage
            capacity_as: capacity_kwh * 3_600_000.0 / nominal_voltage_v,
            remaining_capacity_kwh: capacity_kwh * soc,
            soc,
            current_a: 0.0,
            rated_discharge_w,
            discharge_efficiency,
            throughput_kwh: 0.0,
            soh: 1.0,
        }
    }

    /// Discharges the battery at `power_load_w` for `dt_s` seconds.
    ///
    /// Returns `(terminal_voltage_v, current_a)`. Non-positive requests and
    /// a depleted battery short-circuit to `(nominal_voltage, 0.0)` without
    /// touching SoC or remaining capacity. Requests above the rated discharge
    /// power are clamped with a non-fatal advisory on stderr.
    ///
    /// The terminal voltage uses a two-pass linearization of the nonlinear
    /// V(I) relationship: estimate current at nominal voltage, sag the
    /// voltage by `i * R`, then recompute the current at the sagged voltage.
    pub fn discharge(&mut self, power_load_w: f32, dt_s: f32) -> (f32, f32) {
        if power_load_w <= 0.0 || self.soc <= 0.0 {
            self.current_a = 0.0;
            return (self.nominal_voltage_v, 0.0);
        }

        let power_w = if power_load_w > self.rated_discharge_w {
            eprintln!(
                "[battery] request {power_load_w:.0} W exceeds rated discharge {:.0} W, clamping",
                self.rated_discharge_w
            );
            self.rated_discharge_w
        } else {
            power_load_w
        };

        // Two-pass current estimate with Ohmic sag
        let mut current_a = power_w / self.nominal_voltage_v;
        let terminal_voltage_v =
            (self.nominal_voltage_v - current_a * self.internal_resistance_ohm).max(0.0);
        current_a = if terminal_voltage_v > 0.0 {
            power_w / terminal_voltage_v
        } else {
            0.0
        };
        current_a = current_a.min(self.rated_discharge_w / self.nominal_voltage_v);

        // Coulomb-counted drop with the near-full-charge penalty
        let linear_drop = (current_a * dt_s) / self.capacity_as;
        let scale = 1.5 - (-5.0 * (1.0 - self.soc)).exp();
        let nonlinear_drop = linear_drop * scale;

        // Energy actually removed, corrected for discharge efficiency
        let energy_used_kwh = power_w * dt_s / 3_600_000.0;
        let actual_energy_removed_kwh = energy_used_kwh / self.discharge_efficiency;
        self.remaining_capacity_kwh =
            (self.remaining_capacity_kwh - actual_energy_removed_kwh).max(0.0);

        self.soc = (self.remaining_capacity_kwh / self.capacity_kwh) - nonlinear_drop;
        self.current_a = current_a;

        (terminal_voltage_v, current_a)
    }
}
