//! Energy-management dispatch: splits instantaneous demand between the
//! supercapacitor and the battery.

use crate::devices::{Battery, FastStorage};

use super::transient::TransientDetector;
use super::types::DispatchSnapshot;

/// Dispatcher composing the transient detector, the battery, and the fast
/// storage device.
///
/// Policy: on a detected transient the supercapacitor discharges up to its
/// rated power toward the demand; the residual always goes to the battery.
/// The supercapacitor is dispatched *before* the battery because the battery
/// request is computed as that residual. Both devices are called every step,
/// zero-power calls included, and a fully populated snapshot is returned on
/// every path.
pub struct EnergyManagementDispatcher {
    battery: Battery,
    storage: FastStorage,
    detector: TransientDetector,
}

impl EnergyManagementDispatcher {
    /// Creates a dispatcher owning its devices.
    ///
    /// # Arguments
    ///
    /// * `battery` - Battery handling the bulk of the load
    /// * `storage` - Supercapacitor (or null stand-in) for transients
    /// * `transient_threshold_w` - Step-change threshold in watts
    /// * `window_len` - Detector window length in samples
    pub fn new(
        battery: Battery,
        storage: FastStorage,
        transient_threshold_w: f32,
        window_len: usize,
    ) -> Self {
        Self {
            battery,
            storage,
            detector: TransientDetector::new(transient_threshold_w, window_len),
        }
    }

    /// Executes one dispatch step and returns the telemetry snapshot.
    ///
    /// Never fails: boundary conditions (depleted devices, over-rated
    /// requests) saturate inside the device models.
    pub fn dispatch(&mut self, demand_w: f32, dt_s: f32, timestep: usize) -> DispatchSnapshot {
        let transient = self.detector.detect(demand_w);

        // Discharge requests are negative by convention
        let sc_w = if transient {
            -demand_w.abs().min(self.storage.rated_discharge_w())
        } else {
            0.0
        };
        let batt_w = demand_w - sc_w;

        let (v_sc, i_sc) = self.storage.deliver_power(sc_w, dt_s);
        let (v_batt, i_batt) = self.battery.discharge(batt_w, dt_s);

        DispatchSnapshot {
            timestep,
            time_hr: timestep as f32 * dt_s / 3600.0,
            load_w: demand_w,
            sc_w,
            batt_w,
            v_sc,
            v_batt,
            i_sc,
            i_batt,
            soc_batt: self.battery.soc,
            soh_batt: self.battery.soh,
            transient,
        }
    }

    /// Battery read access (KPI capacity queries, assertions).
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Battery write access for aging policies.
    pub fn battery_mut(&mut self) -> &mut Battery {
        &mut self.battery
    }

    /// Fast-storage read access.
    pub fn storage(&self) -> &FastStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{NullStorage, Supercapacitor};

    fn test_dispatcher() -> EnergyManagementDispatcher {
        let battery = Battery::new(500.0, 480.0, 250_000.0, 1.0, 0.005, 0.90);
        let sc = Supercapacitor::new(1000.0, 480.0, 0.001, 500.0, 10_000.0);
        EnergyManagementDispatcher::new(battery, FastStorage::Supercap(sc), 1000.0, 10)
    }

    #[test]
    fn constant_load_goes_entirely_to_battery() {
        let mut d = test_dispatcher();
        for t in 0..20 {
            let snap = d.dispatch(100_000.0, 900.0, t);
            assert!(!snap.transient);
            assert_eq!(snap.sc_w, 0.0);
            assert_eq!(snap.batt_w, 100_000.0);
            assert_eq!(snap.i_sc, 0.0);
            assert_eq!(snap.v_sc, 480.0);
        }
    }

    #[test]
    fn transient_routes_capped_power_to_supercap() {
        let mut d = test_dispatcher();
        for t in 0..9 {
            d.dispatch(0.0, 1.0, t);
        }
        let snap = d.dispatch(50_000.0, 1.0, 9);
        assert!(snap.transient);
        // Capped at the supercap's 10 kW rating, sign-corrected negative
        assert_eq!(snap.sc_w, -10_000.0);
        assert_eq!(snap.batt_w, 60_000.0);
        assert!(snap.i_sc < 0.0);
    }

    #[test]
    fn small_transient_fully_absorbed_by_supercap() {
        let mut d = test_dispatcher();
        for t in 0..9 {
            d.dispatch(0.0, 1.0, t);
        }
        let snap = d.dispatch(2_000.0, 1.0, 9);
        assert!(snap.transient);
        assert_eq!(snap.sc_w, -2_000.0);
        assert_eq!(snap.batt_w, 4_000.0);
    }

    #[test]
    fn null_storage_routes_everything_to_battery() {
        let battery = Battery::new(500.0, 480.0, 250_000.0, 1.0, 0.005, 0.90);
        let mut d = EnergyManagementDispatcher::new(
            battery,
            FastStorage::Null(NullStorage),
            1000.0,
            10,
        );
        for t in 0..9 {
            d.dispatch(0.0, 1.0, t);
        }
        let snap = d.dispatch(50_000.0, 1.0, 9);
        assert!(snap.transient);
        // Null device caps at zero, so the battery absorbs the whole step
        assert_eq!(snap.sc_w, 0.0);
        assert_eq!(snap.batt_w, 50_000.0);
        assert_eq!(snap.i_sc, 0.0);
    }

    #[test]
    fn snapshot_is_populated_every_step() {
        let mut d = test_dispatcher();
        let snap = d.dispatch(0.0, 900.0, 0);
        assert_eq!(snap.load_w, 0.0);
        assert_eq!(snap.v_batt, 480.0);
        assert_eq!(snap.soc_batt, 1.0);
        assert_eq!(snap.soh_batt, 1.0);
    }

    #[test]
    fn snapshot_time_uses_dt() {
        let mut d = test_dispatcher();
        let snap = d.dispatch(0.0, 900.0, 4);
        assert!((snap.time_hr - 1.0).abs() < 1e-6);
    }
}
