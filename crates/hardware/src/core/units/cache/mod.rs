//! Set-Associative Cache Level.
//!
//! This module implements one configurable set-associative cache level, used for
//! both L1 and L2. It models:
//! 1. **Lookup:** Linear scan of the indexed set for a valid line with a matching tag.
//! 2. **Fill:** Installation into the first invalid way, or a policy-selected victim.
//! 3. **Miss classification:** Compulsory, capacity, or conflict (three-C taxonomy).
//! 4. **Dirty tracking:** Written lines are marked dirty; evicted lines are handed back
//!    to the caller so their data can be written to the level below.
//!
//! Lines hold the words written to their block, keyed by byte address, so a
//! written-back block carries exactly the values the program stored.

/// Cache replacement policy implementations (FIFO, LRU, Random).
pub mod policies;

use std::collections::BTreeMap;

use serde::Serialize;

use self::policies::ReplacementPolicy;
use crate::common::{Decomposed, Geometry, MissType, SimResult};
use crate::config::CacheConfig;

/// Cache line entry: tag, validity, dirty bit, replacement stamps, and data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheLine {
    valid: bool,
    tag: u32,
    dirty: bool,
    last_used: u64,
    inserted: u64,
    last_addr: u32,
    words: BTreeMap<u32, i32>,
}

impl CacheLine {
    /// Whether the line holds a block.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Tag of the resident block.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Whether the line was written since it was filled.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clock value of the most recent hit or fill.
    pub fn last_used(&self) -> u64 {
        self.last_used
    }

    /// Clock value of the fill that installed the block.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Value at the most recently accessed address, if that address holds one.
    pub fn data(&self) -> Option<i32> {
        self.words.get(&self.last_addr).copied()
    }

    /// Value stored for `addr` within this block.
    pub fn word(&self, addr: u32) -> Option<i32> {
        self.words.get(&addr).copied()
    }

    /// All stored words, ordered by address.
    pub fn words(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.words.iter().map(|(&a, &v)| (a, v))
    }
}

/// A block pushed out of a cache level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// Base address of the evicted block.
    pub block_addr: u32,
    /// Whether the block was dirty.
    pub dirty: bool,
    /// Words the block held.
    pub words: BTreeMap<u32, i32>,
}

/// Outcome of installing a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fill {
    /// Way the block was installed in.
    pub way: usize,
    /// Why the block was missing.
    pub miss: MissType,
    /// The previous occupant, if a valid line was replaced.
    pub evicted: Option<Evicted>,
}

/// Outcome of a single-level access (see [`Cache::access`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelAccess {
    /// Address fields for this level's geometry.
    pub fields: Decomposed,
    /// Way that was hit or filled.
    pub way: usize,
    /// `true` on a hit.
    pub hit: bool,
    /// Miss classification; [`MissType::None`] on a hit.
    pub miss: MissType,
    /// Value at the accessed address after the access.
    pub data: Option<i32>,
    /// Block replaced by the fill, if any.
    pub evicted: Option<Evicted>,
}

/// Set-associative cache level.
///
/// Lines are stored flat, `num_sets * ways` long, set-major.
#[derive(Debug)]
pub struct Cache {
    geometry: Geometry,
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy>,
}

impl Cache {
    /// Creates a cache level from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`](crate::common::SimError::Configuration)
    /// when the geometry is invalid.
    pub fn new(config: &CacheConfig, seed: u64) -> SimResult<Self> {
        let geometry = config.geometry()?;
        Ok(Self::with_policy(geometry, policies::build(config.policy, seed)))
    }

    /// Creates a cache level from an already validated geometry and policy.
    pub fn with_policy(geometry: Geometry, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            lines: vec![CacheLine::default(); geometry.num_blocks()],
            geometry,
            policy,
        }
    }

    /// Geometry (address codec) of this level.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Splits an address for this level.
    #[inline]
    pub fn decompose(&self, addr: u32) -> Decomposed {
        self.geometry.decompose(addr)
    }

    /// Lines of one set, way 0 first.
    ///
    /// # Panics
    ///
    /// Panics if `set >= num_sets`.
    pub fn set(&self, set: usize) -> &[CacheLine] {
        let ways = self.geometry.ways();
        &self.lines[set * ways..(set + 1) * ways]
    }

    /// Line at `(set, way)`.
    pub fn line(&self, set: usize, way: usize) -> &CacheLine {
        &self.lines[set * self.geometry.ways() + way]
    }

    fn line_mut(&mut self, set: usize, way: usize) -> &mut CacheLine {
        let ways = self.geometry.ways();
        &mut self.lines[set * ways + way]
    }

    /// Finds the way holding `tag` in `set`.
    pub fn lookup(&self, tag: u32, set: usize) -> Option<usize> {
        self.set(set)
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Decomposes `addr` and looks it up.
    pub fn probe(&self, addr: u32) -> (Decomposed, Option<usize>) {
        let fields = self.decompose(addr);
        (fields, self.lookup(fields.tag, fields.set))
    }

    /// Checks if the block holding `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        self.probe(addr).1.is_some()
    }

    /// Classifies a miss in `set`.
    ///
    /// Compulsory while the set has an invalid way; otherwise Conflict when the
    /// level has more than one set and Capacity when it has exactly one.
    pub fn classify_miss(&self, set: usize) -> MissType {
        if self.set(set).iter().any(|line| !line.valid) {
            MissType::Compulsory
        } else if self.geometry.num_sets() > 1 {
            MissType::Conflict
        } else {
            MissType::Capacity
        }
    }

    /// Stamps a line as used at `clock` and records the accessed address.
    pub fn touch(&mut self, set: usize, way: usize, addr: u32, clock: u64) {
        let line = self.line_mut(set, way);
        line.last_used = clock;
        line.last_addr = addr;
    }

    /// Stores `value` at `addr` in a resident line.
    ///
    /// `mark_dirty` is false for write-through updates of lower levels.
    pub fn write_word(&mut self, set: usize, way: usize, addr: u32, value: i32, mark_dirty: bool) {
        let line = self.line_mut(set, way);
        let _ = line.words.insert(addr, value);
        if mark_dirty {
            line.dirty = true;
        }
    }

    /// Stores `value` into the resident block holding `addr`, if any.
    ///
    /// Used for words written back from the level above (`mark_dirty`) and for
    /// write-through updates (clean). Returns `false` if the block is not resident.
    pub fn absorb(&mut self, addr: u32, value: i32, mark_dirty: bool) -> bool {
        let (fields, way) = self.probe(addr);
        match way {
            Some(way) => {
                self.write_word(fields.set, way, addr, value, mark_dirty);
                true
            }
            None => false,
        }
    }

    /// Installs the block holding `addr` with the given words.
    ///
    /// Uses the first invalid way if one exists, otherwise asks the replacement
    /// policy. The block is stamped with `clock` for both recency and insertion.
    pub fn fill(
        &mut self,
        addr: u32,
        words: BTreeMap<u32, i32>,
        dirty: bool,
        clock: u64,
    ) -> Fill {
        let fields = self.decompose(addr);
        let miss = self.classify_miss(fields.set);
        let way = match self.set(fields.set).iter().position(|line| !line.valid) {
            Some(way) => way,
            None => {
                let ways = self.geometry.ways();
                let start = fields.set * ways;
                self.policy.select_victim(&self.lines[start..start + ways])
            }
        };

        let new_line = CacheLine {
            valid: true,
            tag: fields.tag,
            dirty,
            last_used: clock,
            inserted: clock,
            last_addr: addr,
            words,
        };
        let old = std::mem::replace(self.line_mut(fields.set, way), new_line);
        let evicted = old.valid.then(|| Evicted {
            block_addr: self.geometry.block_address(old.tag, fields.set),
            dirty: old.dirty,
            words: old.words,
        });

        tracing::trace!(
            set = fields.set,
            way,
            tag = fields.tag,
            ?miss,
            evicted = evicted.as_ref().map(|e| e.block_addr),
            "filled line"
        );

        Fill { way, miss, evicted }
    }

    /// Performs a complete access against this level alone.
    ///
    /// On a hit the line is stamped and, for writes, the word is stored and the
    /// line marked dirty. On a miss the block is filled with `below` (the words
    /// fetched from the next level) and the write, if any, applied on top.
    pub fn access(
        &mut self,
        addr: u32,
        write: Option<i32>,
        clock: u64,
        below: impl FnOnce() -> BTreeMap<u32, i32>,
    ) -> LevelAccess {
        let (fields, hit_way) = self.probe(addr);
        let (way, miss, evicted) = match hit_way {
            Some(way) => {
                self.touch(fields.set, way, addr, clock);
                (way, MissType::None, None)
            }
            None => {
                let fill = self.fill(addr, below(), false, clock);
                (fill.way, fill.miss, fill.evicted)
            }
        };
        if let Some(value) = write {
            self.write_word(fields.set, way, addr, value, true);
        }
        LevelAccess {
            fields,
            way,
            hit: hit_way.is_some(),
            miss,
            data: self.line(fields.set, way).word(addr),
            evicted,
        }
    }

    /// Base address of the block holding `addr`.
    pub fn block_base(&self, addr: u32) -> u32 {
        addr & !(self.geometry.block_bytes() as u32).wrapping_sub(1)
    }

    /// Last byte address of the block holding `addr`.
    pub fn block_end(&self, addr: u32) -> u32 {
        let end = u64::from(self.block_base(addr)) + self.geometry.block_bytes() as u64 - 1;
        end.min(u64::from(u32::MAX)) as u32
    }

    /// Words held for addresses in `[start, end]` by resident lines.
    pub fn resident_words(&self, start: u32, end: u32) -> Vec<(u32, i32)> {
        let step = self.geometry.block_bytes() as u64;
        let mut out = Vec::new();
        let mut base = u64::from(self.block_base(start));
        while base <= u64::from(end) {
            let (fields, way) = self.probe(base as u32);
            if let Some(way) = way {
                out.extend(
                    self.line(fields.set, way)
                        .words()
                        .filter(|&(a, _)| a >= start && a <= end),
                );
            }
            base += step;
        }
        out
    }

    /// Snapshot of every set for display.
    pub fn snapshot(&self) -> Vec<Vec<CacheLine>> {
        (0..self.geometry.num_sets())
            .map(|set| self.set(set).to_vec())
            .collect()
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Takes every dirty line's words and marks the lines clean.
    ///
    /// Lines stay valid; used to drain the hierarchy into main memory.
    pub fn drain_dirty(&mut self) -> Vec<(u32, i32)> {
        let mut out = Vec::new();
        for line in self.lines.iter_mut().filter(|line| line.valid && line.dirty) {
            out.extend(line.words.iter().map(|(&a, &v)| (a, v)));
            line.dirty = false;
        }
        out
    }

    /// Invalidates every line.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
    }
}
