//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the cache simulator. It provides:
//! 1. **Access mix:** Total accesses, reads, and writes.
//! 2. **L1 outcome:** Hits, misses, and the compulsory/capacity/conflict breakdown.
//! 3. **L2 outcome:** Hits and misses of the second level, and write-backs.
//! 4. **Energy:** Cumulative static, dynamic, and miss-penalty energy.
//! 5. **Derived metrics:** Hit rate, miss rate, and AMAT, computed on demand.
//!
//! Counters only grow; they are cleared by replacing the struct on reset.

use serde::Serialize;

use crate::common::MissType;
use crate::common::constants::{HIT_TIME_CYCLES, MISS_PENALTY_CYCLES};
use crate::core::units::power::EnergyTotals;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Total accesses performed.
    pub accesses: u64,
    /// L1 hits.
    pub hits: u64,
    /// L1 misses.
    pub misses: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,

    /// L1 misses to a set with an invalid way.
    pub compulsory_misses: u64,
    /// L1 misses in a single-set level.
    pub capacity_misses: u64,
    /// L1 misses in a full set of a multi-set level.
    pub conflict_misses: u64,

    /// L2 hits (only looked up on L1 misses).
    pub l2_hits: u64,
    /// L2 misses.
    pub l2_misses: u64,
    /// Dirty blocks propagated to a lower level on eviction.
    pub writebacks: u64,

    /// Cumulative energy.
    pub energy: EnergyTotals,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"misses"`, `"l2"`, `"energy"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "misses", "l2", "energy"];

impl SimStats {
    /// Counts one miss of the given type.
    pub fn record_miss_type(&mut self, miss: MissType) {
        match miss {
            MissType::None => {}
            MissType::Compulsory => self.compulsory_misses += 1,
            MissType::Capacity => self.capacity_misses += 1,
            MissType::Conflict => self.conflict_misses += 1,
        }
    }

    /// Fraction of accesses that hit in L1; 0 before the first access.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Fraction of accesses that missed in L1; 0 before the first access.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    /// Average memory access time in cycles: `hit_time + miss_rate * miss_penalty`.
    ///
    /// Always at least 1, and exactly 1 when nothing has missed.
    pub fn amat(&self) -> f64 {
        HIT_TIME_CYCLES + self.miss_rate() * MISS_PENALTY_CYCLES
    }

    /// Fraction of L2 lookups that hit; 0 before the first lookup.
    pub fn l2_hit_rate(&self) -> f64 {
        let lookups = self.l2_hits + self.l2_misses;
        if lookups == 0 {
            0.0
        } else {
            self.l2_hits as f64 / lookups as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Renders the requested sections as text.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        if want("summary") {
            out.push_str("==========================================================\n");
            out.push_str("CACHE SIMULATION STATISTICS\n");
            out.push_str("==========================================================\n");
            out.push_str(&format!("accesses                 {}\n", self.accesses));
            out.push_str(&format!("  reads                  {}\n", self.reads));
            out.push_str(&format!("  writes                 {}\n", self.writes));
            out.push_str(&format!(
                "l1.hits                  {} ({:.2}%)\n",
                self.hits,
                self.hit_rate() * 100.0
            ));
            out.push_str(&format!(
                "l1.misses                {} ({:.2}%)\n",
                self.misses,
                self.miss_rate() * 100.0
            ));
            out.push_str(&format!("amat                     {:.2} cycles\n", self.amat()));
        }
        if want("misses") {
            out.push_str("----------------------------------------------------------\n");
            out.push_str(&format!("miss.compulsory          {}\n", self.compulsory_misses));
            out.push_str(&format!("miss.capacity            {}\n", self.capacity_misses));
            out.push_str(&format!("miss.conflict            {}\n", self.conflict_misses));
        }
        if want("l2") {
            out.push_str("----------------------------------------------------------\n");
            out.push_str(&format!(
                "l2.hits                  {} ({:.2}%)\n",
                self.l2_hits,
                self.l2_hit_rate() * 100.0
            ));
            out.push_str(&format!("l2.misses                {}\n", self.l2_misses));
            out.push_str(&format!("writebacks               {}\n", self.writebacks));
        }
        if want("energy") {
            out.push_str("----------------------------------------------------------\n");
            out.push_str(&format!(
                "energy.static            {:.2} pJ\n",
                self.energy.static_energy
            ));
            out.push_str(&format!(
                "energy.dynamic           {:.2} pJ\n",
                self.energy.dynamic_energy
            ));
            out.push_str(&format!(
                "energy.miss_penalty      {:.2} pJ\n",
                self.energy.miss_penalty_energy
            ));
            out.push_str(&format!(
                "energy.total             {:.2} pJ\n",
                self.energy.total_energy
            ));
        }
        out
    }
}
