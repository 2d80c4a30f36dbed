//! Two-Level Memory Hierarchy.
//!
//! This module ties the cache levels, the backing store, and the energy model
//! together. It performs:
//! 1. **Resolution:** Literal and symbolic addresses become 32-bit byte addresses.
//! 2. **Lookup chain:** L1, then L2 on an L1 miss, then main memory on an L2 miss.
//!    Each level decomposes the address against its own geometry.
//! 3. **Write propagation:** Dirty evictions move down one level (write-back), or
//!    every write reaches memory immediately (write-through).
//! 4. **Accounting:** Statistics and energy are charged from the L1 outcome only.
//!
//! [`MemorySystem::access`] is the only operation that changes cache state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::{AccessType, AddressRef, MissType, SimResult, SymbolTable};
use crate::config::{Config, WritePolicy};
use crate::core::units::cache::{Cache, CacheLine, Evicted};
use crate::core::units::power::{EnergyModel, EnergyTotals};
use crate::soc::memory::MemoryImage;
use crate::stats::SimStats;

/// Outcome of one access through the hierarchy.
///
/// Location fields (`set_index`, `way_index`, `tag`) describe the L1 line
/// that was hit or filled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccessResult {
    /// `true` when the access hit in L1.
    pub is_hit: bool,
    /// Cause of the L1 miss; [`MissType::None`] on a hit.
    pub miss_type: MissType,
    /// L1 set index.
    pub set_index: usize,
    /// L1 way that was hit or filled.
    pub way_index: usize,
    /// L1 tag of the address.
    pub tag: u32,
    /// Energy charged for this access (pJ).
    pub energy: f64,
    /// Read or write.
    pub access_type: AccessType,
    /// Value stored at the address after the access; `None` if never written.
    pub data: Option<i32>,
    /// `true` when L1 missed and L2 hit.
    pub l2_hit: bool,
    /// Resolved byte address.
    pub address: u32,
}

/// L1, L2, and main memory with their shared access clock and statistics.
#[derive(Debug)]
pub struct MemorySystem {
    config: Config,
    l1: Cache,
    l2: Cache,
    memory: MemoryImage,
    symbols: SymbolTable,
    energy: EnergyModel,
    stats: SimStats,
    clock: u64,
}

impl MemorySystem {
    /// Builds an empty hierarchy for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`](crate::common::SimError::Configuration)
    /// if the configuration fails validation; nothing is built in that case.
    pub fn new(config: &Config) -> SimResult<Self> {
        config.validate()?;
        let l1 = Cache::new(&config.l1, config.random_seed)?;
        let l2 = Cache::new(&config.l2, config.random_seed.rotate_left(17))?;
        let energy = EnergyModel::new(l1.geometry(), &config.power);
        let symbols = SymbolTable::new(config.symbol_base, l1.geometry().block_bytes() as u32);

        tracing::info!(
            l1_sets = l1.geometry().num_sets(),
            l1_ways = l1.geometry().ways(),
            l2_sets = l2.geometry().num_sets(),
            l2_ways = l2.geometry().ways(),
            block = l1.geometry().block_bytes(),
            write_policy = ?config.write_policy,
            "memory hierarchy configured"
        );

        Ok(Self {
            config: config.clone(),
            l1,
            l2,
            memory: MemoryImage::new(),
            symbols,
            energy,
            stats: SimStats::default(),
            clock: 0,
        })
    }

    /// Returns every level, the symbol table, and the statistics to their
    /// initial state. The Random policy is reseeded.
    pub fn reset(&mut self) -> SimResult<()> {
        *self = Self::new(&self.config)?;
        Ok(())
    }

    /// Performs one access end to end.
    ///
    /// # Arguments
    ///
    /// * `addr` - Literal address or symbolic variable name
    /// * `kind` - Read or write
    /// * `value` - Value to store; ignored for reads, a write without one stores 0
    ///
    /// # Returns
    ///
    /// The [`AccessResult`] describing the L1 outcome.
    pub fn access(
        &mut self,
        addr: impl Into<AddressRef>,
        kind: AccessType,
        value: Option<i32>,
    ) -> AccessResult {
        self.clock += 1;
        let clock = self.clock;
        let address = self.symbols.resolve(&addr.into());
        let write = kind.is_write().then(|| value.unwrap_or(0));
        let write_back = self.config.write_policy == WritePolicy::WriteBack;

        if let (false, Some(v)) = (write_back, write) {
            self.memory.write(address, v);
            let _ = self.l2.absorb(address, v, false);
        }

        let fill_start = self.l1.block_base(address);
        let fill_end = self.l1.block_end(address);
        let mut l2_hit = None;
        let mut writebacks = 0;

        let l2 = &mut self.l2;
        let memory = &mut self.memory;
        let outcome = self.l1.access(address, write, clock, || {
            let (hit, evicted) = fetch_into_l2(l2, memory, address, clock);
            l2_hit = Some(hit);
            if let Some(block) = evicted.filter(|b| b.dirty && write_back) {
                for (a, v) in block.words {
                    memory.write(a, v);
                }
                writebacks += 1;
            }
            words_below(l2, memory, fill_start, fill_end)
        });

        if let Some(block) = outcome.evicted.filter(|b| b.dirty && write_back) {
            self.write_back_from_l1(block);
            writebacks += 1;
        }

        let stats = &mut self.stats;
        stats.accesses += 1;
        match kind {
            AccessType::Read => stats.reads += 1,
            AccessType::Write => stats.writes += 1,
        }
        if outcome.hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
            stats.record_miss_type(outcome.miss);
        }
        match l2_hit {
            Some(true) => stats.l2_hits += 1,
            Some(false) => stats.l2_misses += 1,
            None => {}
        }
        stats.writebacks += writebacks;
        let energy = self.energy.charge(outcome.hit, &mut stats.energy);

        tracing::debug!(
            addr = address,
            %kind,
            hit = outcome.hit,
            miss = %outcome.miss,
            set = outcome.fields.set,
            way = outcome.way,
            l2_hit = l2_hit.unwrap_or(false),
            "access"
        );

        AccessResult {
            is_hit: outcome.hit,
            miss_type: outcome.miss,
            set_index: outcome.fields.set,
            way_index: outcome.way,
            tag: outcome.fields.tag,
            energy: energy.total,
            access_type: kind,
            data: outcome.data,
            l2_hit: l2_hit.unwrap_or(false),
            address,
        }
    }

    /// Reads `addr`.
    pub fn read(&mut self, addr: impl Into<AddressRef>) -> AccessResult {
        self.access(addr, AccessType::Read, None)
    }

    /// Writes `value` to `addr`.
    pub fn write(&mut self, addr: impl Into<AddressRef>, value: i32) -> AccessResult {
        self.access(addr, AccessType::Write, Some(value))
    }

    /// Words of an evicted dirty L1 block go into L2 if it holds them, otherwise to memory.
    fn write_back_from_l1(&mut self, block: Evicted) {
        tracing::trace!(block = block.block_addr, "L1 write-back");
        for (a, v) in block.words {
            if !self.l2.absorb(a, v, true) {
                self.memory.write(a, v);
            }
        }
    }

    /// Newest value stored at `addr` without touching any replacement state.
    pub fn peek(&self, addr: u32) -> Option<i32> {
        let in_level = |cache: &Cache| {
            let (fields, way) = cache.probe(addr);
            way.and_then(|w| cache.line(fields.set, w).word(addr))
        };
        in_level(&self.l1)
            .or_else(|| in_level(&self.l2))
            .or_else(|| self.memory.read(addr))
    }

    /// Pushes every dirty word down to main memory.
    ///
    /// Lines stay resident and become clean. Replacement state and statistics
    /// are not affected.
    pub fn flush(&mut self) {
        for (a, v) in self.l1.drain_dirty() {
            if !self.l2.absorb(a, v, true) {
                self.memory.write(a, v);
            }
        }
        for (a, v) in self.l2.drain_dirty() {
            self.memory.write(a, v);
        }
    }

    /// Looks up the address a symbol was allocated, without allocating.
    pub fn symbol(&self, name: &str) -> Option<u32> {
        self.symbols.get(name)
    }

    /// Configuration the hierarchy was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First-level cache.
    pub fn l1(&self) -> &Cache {
        &self.l1
    }

    /// Second-level cache.
    pub fn l2(&self) -> &Cache {
        &self.l2
    }

    /// Backing store.
    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    /// Allocated variable names.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Running statistics.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Running energy totals.
    pub fn energy_totals(&self) -> &EnergyTotals {
        &self.stats.energy
    }

    /// Energy model of L1.
    pub fn energy_model(&self) -> &EnergyModel {
        &self.energy
    }

    /// Number of accesses performed since the last reset.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Per-set snapshot of L1.
    pub fn l1_snapshot(&self) -> Vec<Vec<CacheLine>> {
        self.l1.snapshot()
    }

    /// Per-set snapshot of L2.
    pub fn l2_snapshot(&self) -> Vec<Vec<CacheLine>> {
        self.l2.snapshot()
    }
}

/// Looks the address up in L2, filling from memory on a miss.
///
/// Returns whether L2 hit and the block it evicted, if any.
fn fetch_into_l2(
    l2: &mut Cache,
    memory: &MemoryImage,
    address: u32,
    clock: u64,
) -> (bool, Option<Evicted>) {
    let start = l2.block_base(address);
    let end = l2.block_end(address);
    let access = l2.access(address, None, clock, || memory.block(start, end));
    (access.hit, access.evicted)
}

/// Words of `[start, end]` as seen from below L1: memory overlaid with L2.
fn words_below(l2: &Cache, memory: &MemoryImage, start: u32, end: u32) -> BTreeMap<u32, i32> {
    let mut words = memory.block(start, end);
    words.extend(l2.resident_words(start, end));
    words
}
