//! Statistics Verification Tests.
//!
//! Verifies the derived metrics of `SimStats` (hit rate, miss rate, AMAT, L2
//! hit rate), the miss-type counters, and section filtering of the text report.

use memsim_core::common::MissType;
use memsim_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::configs::single_set;
use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Derived metrics
// ══════════════════════════════════════════════════════════

/// Before any access every rate is zero and AMAT is the hit time.
#[test]
fn empty_stats() {
    let s = SimStats::default();
    assert_eq!(s.hit_rate(), 0.0);
    assert_eq!(s.miss_rate(), 0.0);
    assert_eq!(s.l2_hit_rate(), 0.0);
    assert_eq!(s.amat(), 1.0);
}

#[test]
fn rates_and_amat() {
    let s = SimStats {
        accesses: 4,
        hits: 3,
        misses: 1,
        l2_hits: 1,
        l2_misses: 3,
        ..SimStats::default()
    };
    assert!((s.hit_rate() - 0.75).abs() < 1e-12);
    assert!((s.miss_rate() - 0.25).abs() < 1e-12);
    assert!((s.amat() - 26.0).abs() < 1e-12);
    assert!((s.l2_hit_rate() - 0.25).abs() < 1e-12);
}

/// Every access missing gives the worst-case AMAT.
#[test]
fn all_misses_amat() {
    let s = SimStats {
        accesses: 10,
        misses: 10,
        ..SimStats::default()
    };
    assert!((s.amat() - 101.0).abs() < 1e-12);
}

#[test]
fn miss_types_counted() {
    let mut s = SimStats::default();
    for m in [
        MissType::Compulsory,
        MissType::Compulsory,
        MissType::Capacity,
        MissType::Conflict,
        MissType::None,
    ] {
        s.record_miss_type(m);
    }
    assert_eq!(
        (s.compulsory_misses, s.capacity_misses, s.conflict_misses),
        (2, 1, 1)
    );
}

/// Counters gathered by a real run.
#[test]
fn counters_from_run() {
    let mut ctx = TestContext::with_config(single_set());
    let _ = ctx.read(0x00);
    let _ = ctx.write(0x20, 1);
    let _ = ctx.read(0x40);
    let _ = ctx.read(0x40);

    let s = ctx.sim.stats();
    assert_eq!((s.accesses, s.reads, s.writes), (4, 3, 1));
    assert_eq!((s.hits, s.misses), (1, 3));
    assert_eq!((s.compulsory_misses, s.capacity_misses), (2, 1));
    assert_eq!(s.l2_misses, 3);
    assert!(s.energy.total_energy > 0.0);
}

// ══════════════════════════════════════════════════════════
// 2. Report sections
// ══════════════════════════════════════════════════════════

#[test]
fn all_sections_by_default() {
    let text = SimStats::default().render_sections(&[]);
    for key in ["accesses", "miss.compulsory", "l2.hits", "energy.total", "amat"] {
        assert!(text.contains(key), "missing {key}");
    }
}

#[test]
fn selected_sections_only() {
    let text = SimStats::default().render_sections(&["energy".to_string()]);
    assert!(text.contains("energy.static"));
    assert!(!text.contains("accesses"));
    assert!(!text.contains("l2.hits"));
}

#[test]
fn section_names() {
    assert_eq!(STATS_SECTIONS, &["summary", "misses", "l2", "energy"]);
}
