//! Energy Model Tests.
//!
//! Checks the per-access energy against hand-computed values for the default
//! L1 (1 KiB, 32-byte blocks, 4-way: 24 tag bits, 32 lines), voltage scaling,
//! and that running totals always equal the sum of their components.
//!
//! Default-geometry reference values at 1.0 V:
//! - storage: 1024 + 32 * 24 / 8 = 1120 bytes, leakage 560, configured 10
//! - static: 570
//! - dynamic hit: 24 * 2 + 256 * 5 = 1328
//! - dynamic miss: 48 + 1280 * 0.35 = 496, penalty 50

use memsim_core::common::Geometry;
use memsim_core::config::PowerConfig;
use memsim_core::core::units::power::{EnergyModel, EnergyTotals};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn default_model(voltage: f64) -> EnergyModel {
    let geometry = Geometry::new(1024, 32, 4).unwrap();
    let power = PowerConfig {
        voltage,
        ..PowerConfig::default()
    };
    EnergyModel::new(&geometry, &power)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS * b.abs().max(1.0)
}

// ══════════════════════════════════════════════════════════
// 1. Reference values
// ══════════════════════════════════════════════════════════

/// A hit at 1.0 V.
#[test]
fn hit_energy_default() {
    let e = default_model(1.0).access_energy(true);
    assert!(close(e.static_energy, 570.0), "{e:?}");
    assert!(close(e.dynamic_energy, 1328.0), "{e:?}");
    assert_eq!(e.penalty_energy, 0.0);
    assert!(close(e.total, 1898.0), "{e:?}");
}

/// A miss at 1.0 V reads out only part of the block and pays the penalty.
#[test]
fn miss_energy_default() {
    let e = default_model(1.0).access_energy(false);
    assert!(close(e.static_energy, 570.0), "{e:?}");
    assert!(close(e.dynamic_energy, 496.0), "{e:?}");
    assert!(close(e.penalty_energy, 50.0), "{e:?}");
    assert!(close(e.total, 1116.0), "{e:?}");
}

/// Static energy is a property of the configuration, not the outcome.
#[test]
fn static_energy_independent_of_outcome() {
    let m = default_model(1.3);
    assert_eq!(
        m.access_energy(true).static_energy,
        m.access_energy(false).static_energy
    );
}

// ══════════════════════════════════════════════════════════
// 2. Voltage scaling
// ══════════════════════════════════════════════════════════

/// Doubling the voltage quadruples dynamic and penalty energy.
#[test]
fn doubling_voltage_quadruples_dynamic_and_penalty() {
    let low = default_model(1.0);
    let high = default_model(2.0);
    assert!(close(high.voltage_factor(), 4.0));
    for hit in [true, false] {
        let (l, h) = (low.access_energy(hit), high.access_energy(hit));
        assert!(close(h.dynamic_energy, 4.0 * l.dynamic_energy));
        assert!(close(h.penalty_energy, 4.0 * l.penalty_energy));
    }
}

/// Leakage carries an extra linear voltage factor: (1120 * 0.5 * 2 + 10) * 4.
#[test]
fn static_energy_at_double_voltage() {
    assert!(close(default_model(2.0).static_energy(), 4520.0));
}

/// At zero volts nothing is charged.
#[test]
fn zero_voltage_charges_nothing() {
    let e = default_model(0.0).access_energy(false);
    assert_eq!(e.total, 0.0);
}

// ══════════════════════════════════════════════════════════
// 3. Totals
// ══════════════════════════════════════════════════════════

/// `charge` accumulates each component.
#[test]
fn charge_accumulates() {
    let m = default_model(1.0);
    let mut totals = EnergyTotals::default();
    let _ = m.charge(false, &mut totals);
    let _ = m.charge(true, &mut totals);
    assert!(close(totals.static_energy, 1140.0));
    assert!(close(totals.dynamic_energy, 1824.0));
    assert!(close(totals.miss_penalty_energy, 50.0));
    assert!(close(totals.total_energy, 3014.0));
}

proptest! {
    /// Totals never decrease and always equal the sum of their components.
    #[test]
    fn totals_monotonic_and_consistent(
        voltage in 0.0f64..3.0,
        outcomes in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let m = default_model(voltage);
        let mut totals = EnergyTotals::default();
        let mut last = 0.0;
        for hit in outcomes {
            let _ = m.charge(hit, &mut totals);
            prop_assert!(totals.total_energy >= last);
            last = totals.total_energy;
            let sum = totals.static_energy + totals.dynamic_energy + totals.miss_penalty_energy;
            prop_assert!((sum - totals.total_energy).abs() <= 1e-6 * sum.max(1.0));
        }
    }
}
