//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Community load profile parameters.
    #[serde(default)]
    pub load: LoadConfig,
    /// Battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Supercapacitor parameters.
    #[serde(default)]
    pub supercap: SupercapConfig,
    /// Dispatcher transient-detection parameters.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Battery aging parameters.
    #[serde(default)]
    pub degradation: DegradationConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of timesteps per simulated day (must be > 0).
    pub steps_per_day: usize,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
    /// Aging policy: `"none"`, `"throughput"`, or `"stress"`.
    pub aging: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 96,
            days: 1,
            seed: 42,
            aging: "none".to_string(),
        }
    }
}

/// Community load profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Number of houses in the community.
    pub num_houses: usize,
    /// Daily energy per house (kWh).
    pub daily_kwh_per_house: f32,
    /// Gaussian noise standard deviation (kW).
    pub noise_std_kw: f32,
    /// Transient events injected per house profile.
    pub transients_per_house: usize,
    /// Minimum transient magnitude (kW).
    pub transient_kw_min: f32,
    /// Maximum transient magnitude (kW).
    pub transient_kw_max: f32,
    /// Minimum transient duration (timesteps).
    pub transient_steps_min: usize,
    /// Maximum transient duration (timesteps).
    pub transient_steps_max: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            num_houses: 10,
            daily_kwh_per_house: 21.0,
            noise_std_kw: 0.05,
            transients_per_house: 5,
            transient_kw_min: 0.5,
            transient_kw_max: 3.0,
            transient_steps_min: 1,
            transient_steps_max: 3,
        }
    }
}

/// Battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Rated capacity (kWh).
    pub capacity_kwh: f32,
    /// Nominal voltage (V).
    pub voltage_v: f32,
    /// Maximum discharge power (kW).
    pub discharge_rate_kw: f32,
    /// Initial state of charge (0.0–1.0).
    pub soc_init: f32,
    /// Internal series resistance (Ω).
    pub internal_resistance_ohm: f32,
    /// Discharge efficiency (0.0–1.0].
    pub discharge_efficiency: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 500.0,
            voltage_v: 480.0,
            discharge_rate_kw: 250.0,
            soc_init: 1.0,
            internal_resistance_ohm: 0.005,
            discharge_efficiency: 0.90,
        }
    }
}

/// Supercapacitor parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupercapConfig {
    /// When `false`, the dispatcher runs battery-only against a null device.
    pub enabled: bool,
    /// Capacitance (F).
    pub capacitance_f: f32,
    /// Initial terminal voltage (V).
    pub voltage_init_v: f32,
    /// Internal series resistance (Ω).
    pub internal_resistance_ohm: f32,
    /// Maximum terminal voltage (V).
    pub max_voltage_v: f32,
    /// Maximum discharge power (kW).
    pub discharge_rate_kw: f32,
}

impl Default for SupercapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacitance_f: 1000.0,
            voltage_init_v: 480.0,
            internal_resistance_ohm: 0.001,
            max_voltage_v: 500.0,
            discharge_rate_kw: 10.0,
        }
    }
}

/// Dispatcher transient-detection parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Step-change threshold (W).
    pub transient_threshold_w: f32,
    /// Detector window length in samples.
    pub window_steps: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            transient_threshold_w: 1000.0,
            window_steps: 10,
        }
    }
}

/// Battery aging parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DegradationConfig {
    /// Capacity fraction lost per kWh of throughput (throughput policy).
    pub rate_per_kwh: f32,
    /// Base capacity fraction lost per kWh before stress multipliers
    /// (stress policy).
    pub stress_rate_per_kwh: f32,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: 0.0001,
            stress_rate_per_kwh: 0.003,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 10-house community day on the
    /// 500 kWh / 480 V hybrid system with no aging.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            load: LoadConfig::default(),
            battery: BatteryConfig::default(),
            supercap: SupercapConfig::default(),
            dispatch: DispatchConfig::default(),
            degradation: DegradationConfig::default(),
        }
    }

    /// Returns the battery-only preset: supercapacitor replaced by the null
    /// device, with the steeper battery-only stress aging curve.
    pub fn battery_only() -> Self {
        Self {
            simulation: SimulationConfig {
                aging: "stress".to_string(),
                ..SimulationConfig::default()
            },
            supercap: SupercapConfig {
                enabled: false,
                ..SupercapConfig::default()
            },
            degradation: DegradationConfig {
                stress_rate_per_kwh: 0.008,
                ..DegradationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the degradation-study preset: a month of hybrid operation
    /// under stress aging with a smaller battery so capacity fade is visible.
    pub fn degradation_study() -> Self {
        Self {
            simulation: SimulationConfig {
                days: 30,
                aging: "stress".to_string(),
                ..SimulationConfig::default()
            },
            battery: BatteryConfig {
                capacity_kwh: 100.0,
                discharge_rate_kw: 100.0,
                ..BatteryConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "battery_only", "degradation_study"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "battery_only" => Ok(Self::battery_only()),
            "degradation_study" => Ok(Self::degradation_study()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.steps_per_day == 0 {
            errors.push(ConfigError {
                field: "simulation.steps_per_day".into(),
                message: "must be > 0".into(),
            });
        }
        if s.days == 0 {
            errors.push(ConfigError {
                field: "simulation.days".into(),
                message: "must be > 0".into(),
            });
        }
        if s.aging != "none" && s.aging != "throughput" && s.aging != "stress" {
            errors.push(ConfigError {
                field: "simulation.aging".into(),
                message: format!(
                    "must be \"none\", \"throughput\", or \"stress\", got \"{}\"",
                    s.aging
                ),
            });
        }

        let l = &self.load;
        if l.num_houses == 0 {
            errors.push(ConfigError {
                field: "load.num_houses".into(),
                message: "must be > 0".into(),
            });
        }
        if l.daily_kwh_per_house <= 0.0 {
            errors.push(ConfigError {
                field: "load.daily_kwh_per_house".into(),
                message: "must be > 0".into(),
            });
        }
        if l.transient_steps_min > l.transient_steps_max {
            errors.push(ConfigError {
                field: "load.transient_steps_min".into(),
                message: "must be <= load.transient_steps_max".into(),
            });
        }
        if l.transient_kw_min > l.transient_kw_max {
            errors.push(ConfigError {
                field: "load.transient_kw_min".into(),
                message: "must be <= load.transient_kw_max".into(),
            });
        }

        let b = &self.battery;
        if b.capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if b.voltage_v <= 0.0 {
            errors.push(ConfigError {
                field: "battery.voltage_v".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.soc_init) {
            errors.push(ConfigError {
                field: "battery.soc_init".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if b.discharge_efficiency <= 0.0 || b.discharge_efficiency > 1.0 {
            errors.push(ConfigError {
                field: "battery.discharge_efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        let sc = &self.supercap;
        if sc.enabled {
            if sc.capacitance_f <= 0.0 {
                errors.push(ConfigError {
                    field: "supercap.capacitance_f".into(),
                    message: "must be > 0".into(),
                });
            }
            if sc.voltage_init_v < 0.0 || sc.voltage_init_v > sc.max_voltage_v {
                errors.push(ConfigError {
                    field: "supercap.voltage_init_v".into(),
                    message: "must be in [0, supercap.max_voltage_v]".into(),
                });
            }
        }

        let d = &self.dispatch;
        if d.window_steps == 0 {
            errors.push(ConfigError {
                field: "dispatch.window_steps".into(),
                message: "must be > 0".into(),
            });
        }
        if d.transient_threshold_w < 0.0 {
            errors.push(ConfigError {
                field: "dispatch.transient_threshold_w".into(),
                message: "must be >= 0".into(),
            });
        }

        let deg = &self.degradation;
        if deg.rate_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "degradation.rate_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if deg.stress_rate_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "degradation.stress_rate_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_baseline() {
        let cfg = ScenarioConfig::from_preset("baseline");
        assert!(cfg.is_ok());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
steps_per_day = 86400
days = 1
seed = 99
aging = "throughput"

[load]
num_houses = 10
daily_kwh_per_house = 21.0
noise_std_kw = 0.05
transients_per_house = 5
transient_kw_min = 0.5
transient_kw_max = 3.0
transient_steps_min = 1
transient_steps_max = 3

[battery]
capacity_kwh = 500.0
voltage_v = 480.0
discharge_rate_kw = 250.0
soc_init = 1.0
internal_resistance_ohm = 0.005
discharge_efficiency = 0.90

[supercap]
enabled = true
capacitance_f = 1000.0
voltage_init_v = 480.0
internal_resistance_ohm = 0.001
max_voltage_v = 500.0
discharge_rate_kw = 10.0

[dispatch]
transient_threshold_w = 1000.0
window_steps = 10

[degradation]
rate_per_kwh = 0.0001
stress_rate_per_kwh = 0.003
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.steps_per_day), Some(86400));
        assert_eq!(cfg.as_ref().map(|c| &*c.simulation.aging), Some("throughput"));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_kwh), Some(500.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_kwh = 500.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.steps_per_day), Some(96));
        assert_eq!(cfg.as_ref().map(|c| c.supercap.capacitance_f), Some(1000.0));
    }

    #[test]
    fn validation_catches_zero_steps() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.steps_per_day = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.steps_per_day"));
    }

    #[test]
    fn validation_catches_invalid_soc() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.soc_init = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.soc_init"));
    }

    #[test]
    fn validation_catches_bad_aging_policy() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.aging = "bogus".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.aging"));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.discharge_efficiency = 0.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "battery.discharge_efficiency")
        );
    }

    #[test]
    fn disabled_supercap_skips_supercap_validation() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.supercap.enabled = false;
        cfg.supercap.capacitance_f = 0.0;
        let errors = cfg.validate();
        assert!(errors.is_empty(), "disabled supercap is not validated: {errors:?}");
    }

    #[test]
    fn validation_catches_zero_window() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.dispatch.window_steps = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "dispatch.window_steps"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn battery_only_preset_disables_supercap() {
        let cfg = ScenarioConfig::battery_only();
        assert!(!cfg.supercap.enabled);
        assert_eq!(cfg.simulation.aging, "stress");
        assert!(cfg.degradation.stress_rate_per_kwh > ScenarioConfig::baseline().degradation.stress_rate_per_kwh);
    }

    #[test]
    fn degradation_study_runs_multiple_days() {
        let cfg = ScenarioConfig::degradation_study();
        assert!(cfg.simulation.days > 1);
        assert_eq!(cfg.simulation.aging, "stress");
    }
}
