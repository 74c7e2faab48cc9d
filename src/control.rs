//! Generic feedback control primitives.

/// Proportional-integral controller.
///
/// The integral term accumulates `error * dt` without bound; there is no
/// anti-windup on the accumulator itself, only a clamp on the final output.
/// Reconstruct the controller to reset the integral state.
#[derive(Debug, Clone)]
pub struct PiController {
    /// Proportional gain.
    pub kp: f32,
    /// Integral gain.
    pub ki: f32,
    /// Desired setpoint.
    pub setpoint: f32,
    /// Accumulated integral of the error.
    pub integral: f32,
    /// Lower output bound.
    pub output_min: f32,
    /// Upper output bound.
    pub output_max: f32,
}

impl PiController {
    /// Creates a new PI controller with zero integral state.
    pub fn new(kp: f32, ki: f32, setpoint: f32, output_min: f32, output_max: f32) -> Self {
        Self {
            kp,
            ki,
            setpoint,
            integral: 0.0,
            output_min,
            output_max,
        }
    }

    /// Computes the control output for one step of `dt_s` seconds.
    pub fn update(&mut self, measurement: f32, dt_s: f32) -> f32 {
        let error = self.setpoint - measurement;
        self.integral += error * dt_s;
        let output = self.kp * error + self.ki * self.integral;
        output.clamp(self.output_min, self.output_max)
    }
}

/// Linear droop law for frequency-based power sharing.
///
/// `P = P_nom - k_f * (f_measured - f_nom)`, clamped to `[0, P_nom]`.
#[derive(Debug, Clone, Copy)]
pub struct DroopControl {
    /// Nominal grid frequency in Hz.
    pub f_nom_hz: f32,
    /// Nominal power output in watts.
    pub p_nom_w: f32,
    /// Droop coefficient in watts per Hz.
    pub k_f_w_per_hz: f32,
}

impl Default for DroopControl {
    fn default() -> Self {
        Self {
            f_nom_hz: 50.0,
            p_nom_w: 2000.0,
            k_f_w_per_hz: 500.0,
        }
    }
}

impl DroopControl {
    /// Power output for a measured frequency, clamped to `[0, p_nom_w]`.
    pub fn power_w(&self, f_measured_hz: f32) -> f32 {
        let delta_f = f_measured_hz - self.f_nom_hz;
        (self.p_nom_w - self.k_f_w_per_hz * delta_f).clamp(0.0, self.p_nom_w)
    }
}
