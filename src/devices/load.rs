use rand::{Rng, SeedableRng, rngs::StdRng};

/// Synthetic community load profile generator.
///
/// Builds one day of demand for a small community by summing per-house
/// profiles. Each house gets a sinusoidal base load, Gaussian morning and
/// evening peaks, seeded noise, and a handful of injected transient spikes
/// or dips, then is scaled to hit a daily-energy target.
///
/// Output is in kW, one sample per timestep, always non-negative, and fully
/// deterministic for a fixed seed.
#[derive(Debug, Clone)]
pub struct CommunityLoad {
    /// Number of houses in the community.
    pub num_houses: usize,

    /// Daily energy target per house in kWh.
    pub daily_kwh_per_house: f32,

    /// Number of samples in the generated day.
    pub steps_per_day: usize,

    /// Standard deviation of the per-sample Gaussian noise in kW.
    pub noise_std_kw: f32,

    /// Transient events injected per house profile.
    pub transients_per_house: usize,

    /// Minimum transient magnitude in kW.
    pub transient_kw_min: f32,

    /// Maximum transient magnitude in kW.
    pub transient_kw_max: f32,

    /// Minimum transient duration in timesteps.
    pub transient_steps_min: usize,

    /// Maximum transient duration in timesteps.
    pub transient_steps_max: usize,

    rng: StdRng,
}

impl CommunityLoad {
    /// Creates a new community load generator.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_day` is zero or the transient duration range is
    /// inverted.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        num_houses: usize,
        daily_kwh_per_house: f32,
        steps_per_day: usize,
        noise_std_kw: f32,
        transients_per_house: usize,
        transient_kw_min: f32,
        transient_kw_max: f32,
        transient_steps_min: usize,
        transient_steps_max: usize,
        seed: u64,
    ) -> Self {
        assert!(steps_per_day > 0, "steps_per_day must be > 0");
        assert!(
            transient_steps_min <= transient_steps_max,
            "transient duration range is inverted"
        );
        Self {
            num_houses,
            daily_kwh_per_house,
            steps_per_day,
            noise_std_kw,
            transients_per_house,
            transient_kw_min,
            transient_kw_max,
            transient_steps_min,
            transient_steps_max,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates one day of community demand in kW, one sample per step.
    pub fn generate(&mut self) -> Vec<f32> {
        let mut community = vec![0.0_f32; self.steps_per_day];
        for _ in 0..self.num_houses {
            let house = self.single_house_profile();
            for (total, kw) in community.iter_mut().zip(house) {
                *total += kw;
            }
        }
        community
    }

    fn single_house_profile(&mut self) -> Vec<f32> {
        let n = self.steps_per_day;
        let mut profile = Vec::with_capacity(n);

        for i in 0..n {
            let t_hr = i as f32 * 24.0 / n as f32;

            let morning_peak = (-0.5 * ((t_hr - 7.5) / 1.0).powi(2)).exp();
            let evening_peak = (-0.5 * ((t_hr - 18.5) / 1.5).powi(2)).exp();
            let base_kw = 0.2 + 0.1 * (2.0 * std::f32::consts::PI * t_hr / 24.0).sin();

            let kw = base_kw + 2.0 * morning_peak + 3.0 * evening_peak + self.gaussian_noise();
            profile.push(kw.max(0.0));
        }

        self.add_transients(&mut profile);

        // Scale to the daily-energy target
        let dt_hr = 24.0 / n as f32;
        let energy_kwh: f32 = profile.iter().sum::<f32>() * dt_hr;
        if energy_kwh > 0.0 {
            let scale = self.daily_kwh_per_house / energy_kwh;
            for kw in &mut profile {
                *kw *= scale;
            }
        }

        profile
    }

    /// Injects random spikes or dips, keeping the profile non-negative.
    fn add_transients(&mut self, profile: &mut [f32]) {
        let n = profile.len();
        if n < 2 {
            return;
        }

        for _ in 0..self.transients_per_house {
            let start = self.rng.random_range(0..n - 1);
            let duration = self
                .rng
                .random_range(self.transient_steps_min..=self.transient_steps_max);
            let end = (start + duration.max(1)).min(n);

            let magnitude_kw = self
                .rng
                .random_range(self.transient_kw_min..=self.transient_kw_max);
            let sign = if self.rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };

            for kw in &mut profile[start..end] {
                *kw = (*kw + sign * magnitude_kw).max(0.0);
            }
        }
    }

    fn gaussian_noise(&mut self) -> f32 {
        if self.noise_std_kw <= 0.0 {
            return 0.0;
        }
        // Box-Muller
        let u1: f32 = self.rng.random::<f32>().clamp(1e-6, 1.0);
        let u2: f32 = self.rng.random::<f32>();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        z0 * self.noise_std_kw
    }
}
