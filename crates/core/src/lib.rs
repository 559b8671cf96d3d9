//! Core units, constants, and shared primitives for the lidar mission planner workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Speed of light used by the mission model (m/s).
    pub const SPEED_OF_LIGHT_M_S: f64 = 2.998e8;
    /// Exact CODATA speed of light (m/s), used where timing windows need it.
    pub const SPEED_OF_LIGHT_EXACT_M_S: f64 = 299_792_458.0;
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.6726e-11;
    /// Mass of the Earth (kg).
    pub const EARTH_MASS_KG: f64 = 5.98e24;
    /// Mean radius of the Earth (m).
    pub const EARTH_RADIUS_M: f64 = 6_370_000.0;
    /// Planck constant (J s).
    pub const PLANCK_J_S: f64 = 6.6260755e-34;
    /// Lambertian ground reflectance assumed for the link budget.
    pub const SURFACE_REFLECTANCE: f64 = 0.4;
    /// Seconds per Julian year.
    pub const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;
    /// Default laser wavelength (m).
    pub const DEFAULT_WAVELENGTH_M: f64 = 850.0e-9;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert seconds to milliseconds.
    #[inline]
    pub fn s_to_ms(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert nanoseconds to seconds.
    #[inline]
    pub fn ns_to_s(v: f64) -> f64 {
        v * 1.0e-9
    }

    /// Convert joules to millijoules.
    #[inline]
    pub fn j_to_mj(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert nanometres to metres.
    #[inline]
    pub fn nm_to_m(v: f64) -> f64 {
        v * 1.0e-9
    }

    /// Convert a one-way range (m) into a two-way light travel time (s).
    #[inline]
    pub fn two_way_time(range_m: f64, speed_of_light_m_s: f64) -> f64 {
        2.0 * range_m / speed_of_light_m_s
    }
}

/// Photon counting helpers.
pub mod photons {
    use super::constants::{PLANCK_J_S, SPEED_OF_LIGHT_M_S};

    /// Energy of a single photon at `wavelength_m` (J).
    #[inline]
    pub fn photon_energy(wavelength_m: f64) -> f64 {
        PLANCK_J_S * SPEED_OF_LIGHT_M_S / wavelength_m
    }

    /// Total energy carried by `n_photons` at `wavelength_m` (J).
    #[inline]
    pub fn photons_to_energy(n_photons: f64, wavelength_m: f64) -> f64 {
        n_photons * photon_energy(wavelength_m)
    }

    /// Number of photons at `wavelength_m` carrying `energy_j`.
    #[inline]
    pub fn energy_to_photons(energy_j: f64, wavelength_m: f64) -> f64 {
        energy_j / photon_energy(wavelength_m)
    }
}

/// Telescope geometry helpers.
pub mod optics {
    use std::f64::consts::PI;

    /// Collecting area of a circular aperture of diameter `diameter_m` (m²).
    #[inline]
    pub fn circular_area(diameter_m: f64) -> f64 {
        PI * (diameter_m / 2.0).powi(2)
    }
}

/// Rounding used when presenting results.
pub mod rounding {
    /// Round to `digits` significant figures. Zero and non-finite values pass through.
    pub fn round_sig(x: f64, digits: u32) -> f64 {
        if x == 0.0 || !x.is_finite() {
            return x;
        }
        let magnitude = x.abs().log10().floor() as i32;
        let decimals = digits as i32 - 1 - magnitude;
        let factor = 10f64.powi(decimals.abs());
        if decimals >= 0 {
            (x * factor).round() / factor
        } else {
            (x / factor).round() * factor
        }
    }

    /// Three significant figures, the default for console reports.
    #[inline]
    pub fn round3(x: f64) -> f64 {
        round_sig(x, 3)
    }
}

/// Inclusive `start:stop:step` ranges for parameter sweeps.
pub mod range {
    use std::fmt;
    use std::str::FromStr;

    /// Largest number of samples a single range may expand to.
    pub const MAX_SAMPLES: usize = 100_000;

    /// Inclusive sweep range. Construct with [`SweepRange::new`] or parse from `start:stop:step`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SweepRange {
        start: f64,
        stop: f64,
        step: f64,
    }

    impl SweepRange {
        pub fn new(start: f64, stop: f64, step: f64) -> Result<Self, String> {
            if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
                return Err("range bounds must be finite".to_string());
            }
            if step == 0.0 {
                return Err("step cannot be zero".to_string());
            }
            if step > 0.0 && start > stop {
                return Err("for positive step, start must not exceed stop".to_string());
            }
            if step < 0.0 && start < stop {
                return Err("for negative step, start must not be below stop".to_string());
            }
            // infinite when the span overflows or the step underflows
            let span = (stop - start) / step;
            if !(span < MAX_SAMPLES as f64) {
                return Err(format!("range expands to more than {MAX_SAMPLES} samples"));
            }
            Ok(Self { start, stop, step })
        }

        pub fn start(&self) -> f64 {
            self.start
        }

        pub fn stop(&self) -> f64 {
            self.stop
        }

        pub fn step(&self) -> f64 {
            self.step
        }

        /// Sample values from start to stop inclusive. Values are computed as
        /// `start + i * step` so rounding error does not accumulate. At most
        /// [`MAX_SAMPLES`] values are produced.
        pub fn values(&self) -> Vec<f64> {
            let span = (self.stop - self.start) / self.step;
            // tolerate the last sample landing a hair past `stop`
            let count = ((span + 1.0e-9).floor() as usize + 1).min(MAX_SAMPLES);
            (0..count)
                .map(|i| self.start + i as f64 * self.step)
                .collect()
        }
    }

    impl FromStr for SweepRange {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let parts: Vec<&str> = s.split(':').collect();
            if parts.len() != 3 {
                return Err("range must be in format 'start:stop:step'".to_string());
            }
            let parse = |label: &str, raw: &str| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid {label} value '{}'", raw.trim()))
            };
            let start = parse("start", parts[0])?;
            let stop = parse("stop", parts[1])?;
            let step = parse("step", parts[2])?;
            Self::new(start, stop, step)
        }
    }

    impl fmt::Display for SweepRange {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}:{}:{}", self.start, self.stop, self.step)
        }
    }
}
