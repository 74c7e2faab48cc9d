//! RMS power metering for reporting.

/// An RMS power meter computing active, reactive, and apparent power plus
/// power factor from voltage, current, and phase angle.
///
/// Readings are pure recomputations on every update; no history is kept.
/// The meter is for reporting only and plays no part in dispatch.
#[derive(Debug, Clone)]
pub struct PowerMeter {
    /// Meter label used in reports.
    pub name: &'static str,
    /// Last measured RMS voltage in volts.
    pub v_rms: f32,
    /// Last measured RMS current in amps.
    pub i_rms: f32,
    /// Active power in watts.
    pub active_w: f32,
    /// Reactive power in VAR.
    pub reactive_var: f32,
    /// Apparent power in VA.
    pub apparent_va: f32,
    /// Power factor, `cos(theta)`.
    pub power_factor: f32,
}

impl PowerMeter {
    /// Creates a new meter with zeroed readings and unity power factor.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            v_rms: 0.0,
            i_rms: 0.0,
            active_w: 0.0,
            reactive_var: 0.0,
            apparent_va: 0.0,
            power_factor: 1.0,
        }
    }

    /// Updates all readings from RMS voltage, RMS current, and the phase
    /// angle between them in degrees.
    pub fn update(&mut self, v_rms: f32, i_rms: f32, phase_deg: f32) {
        let angle_rad = phase_deg.to_radians();

        self.v_rms = v_rms;
        self.i_rms = i_rms;
        self.apparent_va = v_rms * i_rms;
        self.active_w = self.apparent_va * angle_rad.cos();
        self.reactive_var = self.apparent_va * angle_rad.sin();
        self.power_factor = angle_rad.cos();
    }
}
