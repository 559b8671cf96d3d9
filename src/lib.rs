//! Lidar mission planning calculators.
//!
//! The physics lives in the member crates; this crate re-exports them so the
//! command-line front-ends (and any other consumer) depend on a single library.

pub use gls_config as config;
pub use gls_core::{constants, optics, photons, range, rounding, units};
pub use gls_deadtime as deadtime;
pub use gls_export as export;
pub use gls_mission as mission;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
