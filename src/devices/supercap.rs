/// A supercapacitor model for absorbing short power transients.
///
/// Tracks terminal voltage and stored energy (`0.5 * C * V^2`), integrating
/// `dv = i * dt / C` on every discharge.
///
/// # Power Convention
/// - Negative `power_w`: discharge request (supplying the load)
/// - Non-negative `power_w`: charge request, deliberately a no-op; the
///   charging path is a known limitation of the model
#[derive(Debug, Clone)]
pub struct Supercapacitor {
    /// Capacitance in farads.
    pub capacitance_f: f32,

    /// Present terminal voltage in volts, kept within [0, max_voltage].
    pub voltage_v: f32,

    /// Ceiling voltage in volts. Charging never pushes past it (charging
    /// is currently a no-op anyway).
    pub max_voltage_v: f32,

    /// Internal series resistance in ohms.
    pub internal_resistance_ohm: f32,

    /// Maximum discharge power in watts.
    pub rated_discharge_w: f32,

    /// Stored energy in joules, recomputed as `0.5 * C * V^2` on update.
    pub stored_energy_j: f32,
}

impl Supercapacitor {
    /// Creates a new supercapacitor.
    ///
    /// # Arguments
    ///
    /// * `capacitance_f` - Capacitance in farads (must be > 0)
    /// * `voltage_init_v` - Initial terminal voltage in volts
    /// * `internal_resistance_ohm` - Internal resistance in ohms
    /// * `max_voltage_v` - Maximum terminal voltage in volts
    /// * `rated_discharge_w` - Maximum discharge power in watts
    ///
    /// # Panics
    ///
    /// Panics if the capacitance is not positive.
    pub fn new(
        capacitance_f: f32,
        voltage_init_v: f32,
        internal_resistance_ohm: f32,
        max_voltage_v: f32,
        rated_discharge_w: f32,
    ) -> Self {
        assert!(capacitance_f > 0.0, "capacitance_f must be > 0");
        let voltage_v = voltage_init_v.clamp(0.0, max_voltage_v);
        Self {
            capacitance_f,
            voltage_v,
            max_voltage_v,
            internal_resistance_ohm,
            rated_discharge_w,
            stored_energy_j: 0.5 * capacitance_f * voltage_v * voltage_v,
        }
    }

    /// Delivers `power_w` for `dt_s` seconds.
    ///
    /// Returns `(voltage_v, current_a)` with a negative current while
    /// discharging. Charge requests return the present voltage and zero
    /// current without mutation. A near-empty capacitor (voltage at or
    /// below 0.1 V) also returns zero current. Discharge requests are
    /// clamped to the rated discharge power, and the integrated voltage is
    /// floored at 0 so a large `dt_s` cannot drive it negative.
    pub fn deliver_power(&mut self, power_w: f32, dt_s: f32) -> (f32, f32) {
        if power_w >= 0.0 {
            return (self.voltage_v, 0.0);
        }

        if self.voltage_v <= 0.1 {
            return (self.voltage_v, 0.0);
        }

        let power_w = power_w.max(-self.rated_discharge_w);
        let current_a = power_w / self.voltage_v; // negative while discharging
        let dv = (current_a * dt_s) / self.capacitance_f;
        self.voltage_v = (self.voltage_v + dv).max(0.0);
        self.stored_energy_j = 0.5 * self.capacitance_f * self.voltage_v * self.voltage_v;

        (self.voltage_v, current_a)
    }
}

/// Zero-capability stand-in for the supercapacitor.
///
/// Used for battery-only configurations: delivers nothing and reports a
/// zero discharge rate, so the dispatcher routes the full load to the
/// battery.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl NullStorage {
    /// Always returns `(0.0, 0.0)` and mutates nothing.
    pub fn deliver_power(&mut self, _power_w: f32, _dt_s: f32) -> (f32, f32) {
        (0.0, 0.0)
    }
}

/// Fast-storage device behind the dispatcher: a real supercapacitor or a
/// null stand-in for battery-only runs.
#[derive(Debug, Clone)]
pub enum FastStorage {
    Supercap(Supercapacitor),
    Null(NullStorage),
}

impl FastStorage {
    /// Delegates a power-delivery request to the underlying device.
    pub fn deliver_power(&mut self, power_w: f32, dt_s: f32) -> (f32, f32) {
        match self {
            FastStorage::Supercap(sc) => sc.deliver_power(power_w, dt_s),
            FastStorage::Null(n) => n.deliver_power(power_w, dt_s),
        }
    }

    /// Rated discharge power in watts (zero for the null device).
    pub fn rated_discharge_w(&self) -> f32 {
        match self {
            FastStorage::Supercap(sc) => sc.rated_discharge_w,
            FastStorage::Null(_) => 0.0,
        }
    }

    /// Present terminal voltage in volts (zero for the null device).
    pub fn voltage_v(&self) -> f32 {
        match self {
            FastStorage::Supercap(sc) => sc.voltage_v,
            FastStorage::Null(_) => 0.0,
        }
    }
}
