use approx::assert_relative_eq;
use gls_planner::constants::{DEFAULT_WAVELENGTH_M, PLANCK_J_S, SPEED_OF_LIGHT_M_S};
use gls_planner::optics::circular_area;
use gls_planner::photons::{energy_to_photons, photon_energy, photons_to_energy};
use gls_planner::range::{MAX_SAMPLES, SweepRange};
use gls_planner::rounding::{round3, round_sig};

#[test]
fn photon_energy_round_trip() {
    for (photons, wavelength) in [(1.0, 532.0e-9), (205.0, 850.0e-9), (2.4e3, 1064.0e-9)] {
        let energy = photons_to_energy(photons, wavelength);
        assert_relative_eq!(energy_to_photons(energy, wavelength), photons, max_relative = 1e-12);
    }
}

#[test]
fn photon_energy_at_850nm() {
    let expected = PLANCK_J_S * SPEED_OF_LIGHT_M_S / 850.0e-9;
    assert_relative_eq!(photon_energy(DEFAULT_WAVELENGTH_M), expected);
    // ~2.34e-19 J per near-infrared photon
    assert!((2.3e-19..2.4e-19).contains(&photon_energy(DEFAULT_WAVELENGTH_M)));
}

#[test]
fn circular_area_from_diameter() {
    assert_relative_eq!(circular_area(0.8), 0.4 * 0.4 * std::f64::consts::PI);
    assert_relative_eq!(circular_area(0.8), 0.502_654_8, max_relative = 1e-6);
}

#[test]
fn significant_figure_rounding() {
    assert_eq!(round3(35.240_203), 35.2);
    assert_eq!(round3(490.349), 490.0);
    assert_eq!(round3(81_623.27), 81_600.0);
    assert_relative_eq!(round3(4.878_472e-3), 4.88e-3, max_relative = 1e-12);
    assert_eq!(round3(-7.716), -7.72);
    assert_eq!(round_sig(123_456.0, 2), 120_000.0);
    assert_eq!(round3(0.0), 0.0);
    assert!(round3(f64::NAN).is_nan());
}

#[test]
fn sweep_range_is_inclusive() {
    let range: SweepRange = "300000:500000:50000".parse().unwrap();
    assert_eq!(
        range.values(),
        vec![300_000.0, 350_000.0, 400_000.0, 450_000.0, 500_000.0]
    );

    let fractional = SweepRange::new(0.1, 0.3, 0.1).unwrap();
    assert_eq!(fractional.values().len(), 3);

    let reverse: SweepRange = "60:-60:-30".parse().unwrap();
    assert_eq!(reverse.values(), vec![60.0, 30.0, 0.0, -30.0, -60.0]);

    let single = SweepRange::new(5.0, 5.0, 1.0).unwrap();
    assert_eq!(single.values(), vec![5.0]);
    assert_eq!(single.to_string(), "5:5:1");
}

#[test]
fn malformed_ranges_are_rejected() {
    assert!("1:2".parse::<SweepRange>().is_err());
    assert!("1:2:0".parse::<SweepRange>().is_err());
    assert!("5:1:1".parse::<SweepRange>().is_err());
    assert!("1:5:-1".parse::<SweepRange>().is_err());
    assert!("a:5:1".parse::<SweepRange>().is_err());
}

#[test]
fn oversized_ranges_are_rejected() {
    for raw in ["0:1e20:1", "0:1e12:1", "-1e308:1e308:1", "0:1:1e-320"] {
        let err = raw.parse::<SweepRange>().unwrap_err();
        assert!(err.contains("samples"), "{raw}: {err}");
    }

    let widest = SweepRange::new(0.0, (MAX_SAMPLES - 1) as f64, 1.0).unwrap();
    assert_eq!(widest.values().len(), MAX_SAMPLES);
    assert!(SweepRange::new(0.0, MAX_SAMPLES as f64, 1.0).is_err());
}
