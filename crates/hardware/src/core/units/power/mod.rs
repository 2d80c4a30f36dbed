//! Cache Energy Model.
//!
//! This module charges energy for every L1 access. It models:
//! 1. **Static energy:** Leakage over data and tag storage plus the configured
//!    static power, charged on every access.
//! 2. **Dynamic energy:** Tag comparison plus block read-out; a miss only reads
//!    out a fraction of the block before the fill.
//! 3. **Miss penalty:** A configured energy charged on every miss.
//!
//! All three scale with `voltage²`. Static leakage carries an additional
//! linear `voltage` factor.

use serde::Serialize;

use crate::common::Geometry;
use crate::config::PowerConfig;

/// Energy to read or write one bit of a block (pJ).
pub const BIT_ACCESS_ENERGY: f64 = 5.0;

/// Energy to compare one tag bit (pJ).
pub const TAG_COMPARE_ENERGY: f64 = 2.0;

/// Leakage per byte of storage (nW).
pub const LEAKAGE_PER_BYTE: f64 = 0.5;

/// Fraction of the block read out on a miss.
pub const MISS_READOUT_FRACTION: f64 = 0.35;

/// Energy charged for a single access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AccessEnergy {
    /// Static (leakage + configured) energy.
    pub static_energy: f64,
    /// Tag compare and block access energy.
    pub dynamic_energy: f64,
    /// Miss penalty energy; zero on a hit.
    pub penalty_energy: f64,
    /// Sum of the three components.
    pub total: f64,
}

/// Running energy totals.
///
/// `total_energy` always equals the sum of the three components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EnergyTotals {
    /// Accumulated static energy.
    pub static_energy: f64,
    /// Accumulated dynamic energy.
    pub dynamic_energy: f64,
    /// Accumulated miss penalty energy.
    pub miss_penalty_energy: f64,
    /// Accumulated total energy.
    pub total_energy: f64,
}

impl EnergyTotals {
    /// Adds one access's energy.
    pub fn add(&mut self, energy: &AccessEnergy) {
        self.static_energy += energy.static_energy;
        self.dynamic_energy += energy.dynamic_energy;
        self.miss_penalty_energy += energy.penalty_energy;
        self.total_energy += energy.total;
    }
}

/// Voltage-scaled energy model for one cache level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyModel {
    tag_bits: u32,
    block_bits: f64,
    static_energy: f64,
    voltage_factor: f64,
    miss_penalty_power: f64,
}

impl EnergyModel {
    /// Builds the model for a cache geometry and power coefficients.
    ///
    /// Static energy depends only on the configuration, so it is computed once here.
    pub fn new(geometry: &Geometry, power: &PowerConfig) -> Self {
        let voltage = power.voltage;
        let voltage_factor = voltage * voltage;
        let size = geometry.size_bytes() as f64;

        let total_tag_bits =
            (geometry.num_sets() * geometry.ways()) as f64 * f64::from(geometry.tag_bits());
        let total_size_bytes = size + total_tag_bits / 8.0;
        let leakage = total_size_bytes * LEAKAGE_PER_BYTE * voltage;
        let configured = power.static_power * (size / 1024.0);

        Self {
            tag_bits: geometry.tag_bits(),
            block_bits: (geometry.block_bytes() * 8) as f64,
            static_energy: (leakage + configured) * voltage_factor,
            voltage_factor,
            miss_penalty_power: power.miss_penalty_power,
        }
    }

    /// Energy of one access with the given outcome.
    pub fn access_energy(&self, hit: bool) -> AccessEnergy {
        let tag_compare = f64::from(self.tag_bits) * TAG_COMPARE_ENERGY;
        let (readout, penalty) = if hit {
            (self.block_bits * BIT_ACCESS_ENERGY, 0.0)
        } else {
            (
                self.block_bits * BIT_ACCESS_ENERGY * MISS_READOUT_FRACTION,
                self.miss_penalty_power * self.voltage_factor,
            )
        };
        let dynamic = (tag_compare + readout) * self.voltage_factor;

        AccessEnergy {
            static_energy: self.static_energy,
            dynamic_energy: dynamic,
            penalty_energy: penalty,
            total: self.static_energy + dynamic + penalty,
        }
    }

    /// Computes the energy of one access and adds it to `totals`.
    pub fn charge(&self, hit: bool, totals: &mut EnergyTotals) -> AccessEnergy {
        let energy = self.access_energy(hit);
        totals.add(&energy);
        energy
    }

    /// Static energy charged per access.
    pub fn static_energy(&self) -> f64 {
        self.static_energy
    }

    /// `voltage²`.
    pub fn voltage_factor(&self) -> f64 {
        self.voltage_factor
    }
}
