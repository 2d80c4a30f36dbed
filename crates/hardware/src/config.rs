//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline cache geometry, power coefficients, and interpreter limits.
//! 2. **Structures:** Hierarchical config for both cache levels, power, and the interpreter.
//! 3. **Enums:** Replacement policy and write policy selection.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built from `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::constants::{ASSEMBLER_REGISTERS, INTERPRETER_REGISTERS};
use crate::common::{Geometry, SimError, SimResult};

/// Default configuration constants for the simulator.
///
/// These values define the baseline configuration when not explicitly overridden.
mod defaults {
    /// Default L1 size in bytes (1 KiB).
    pub const L1_SIZE: usize = 1024;

    /// Default block size in bytes, shared by both levels.
    pub const BLOCK_SIZE: usize = 32;

    /// Default L1 associativity (4-way).
    pub const L1_WAYS: usize = 4;

    /// Default L2 size in bytes (4 KiB).
    pub const L2_SIZE: usize = 4096;

    /// Default L2 associativity (4-way).
    pub const L2_WAYS: usize = 4;

    /// Configured static power coefficient, scaled per KiB of L1.
    pub const STATIC_POWER: f64 = 10.0;

    /// Energy charged on every L1 miss before voltage scaling.
    pub const MISS_PENALTY_POWER: f64 = 50.0;

    /// Supply voltage in volts.
    pub const VOLTAGE: f64 = 1.0;

    /// First address allocated to symbolic variables.
    pub const SYMBOL_BASE: u32 = crate::common::constants::SYMBOL_BASE;

    /// Initial program counter.
    pub const BASE_PC: u32 = crate::common::constants::BASE_PC;

    /// Step cap for bounded execution.
    pub const MAX_STEPS: usize = crate::common::constants::MAX_STEPS;

    /// Live interpreter register count (`x0`..`x31`).
    pub const REGISTER_COUNT: usize = crate::common::constants::INTERPRETER_REGISTERS;

    /// Seed for the Random replacement policy's generator.
    pub const RANDOM_SEED: u64 = 123456789;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to evict when a new
/// block must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the way with the oldest last-use stamp.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// First In First Out replacement policy.
    ///
    /// Evicts the way with the oldest insertion stamp, ignoring later hits.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Random replacement policy.
    ///
    /// Evicts a uniformly selected way.
    #[serde(alias = "Random", alias = "random")]
    Random,
}

/// When written data reaches the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Writes stay in the cache; dirty data is propagated down on eviction.
    #[default]
    WriteBack,
    /// Every write also updates main memory immediately.
    ///
    /// The dirty bit is still tracked, but only for display.
    WriteThrough,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use memsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.l1.size_bytes, 1024);
/// assert_eq!(config.l2.size_bytes, 4096);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use memsim_core::config::{Config, ReplacementPolicy, WritePolicy};
///
/// let json = r#"{
///     "l1": { "size_bytes": 1024, "block_bytes": 32, "associativity": 1, "policy": "FIFO" },
///     "power": { "voltage": 1.2 },
///     "write_policy": "WriteThrough"
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.l1.associativity, 1);
/// assert_eq!(config.l1.policy, ReplacementPolicy::Fifo);
/// assert_eq!(config.write_policy, WritePolicy::WriteThrough);
/// assert_eq!(config.l2.size_bytes, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// First-level cache.
    #[serde(default = "CacheConfig::default_l1")]
    pub l1: CacheConfig,
    /// Second-level cache.
    #[serde(default = "CacheConfig::default_l2")]
    pub l2: CacheConfig,
    /// Energy model coefficients.
    #[serde(default)]
    pub power: PowerConfig,
    /// Write propagation policy.
    #[serde(default)]
    pub write_policy: WritePolicy,
    /// Instruction interpreter settings.
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    /// First address allocated to symbolic variables.
    #[serde(default = "Config::default_symbol_base")]
    pub symbol_base: u32,
    /// Seed for the Random replacement policy.
    #[serde(default = "Config::default_random_seed")]
    pub random_seed: u64,
}

impl Config {
    /// Returns the default symbol allocation base.
    fn default_symbol_base() -> u32 {
        defaults::SYMBOL_BASE
    }

    /// Returns the default random seed.
    fn default_random_seed() -> u64 {
        defaults::RANDOM_SEED
    }

    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if the JSON is malformed or the
    /// resulting configuration fails [`Config::validate`].
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::Configuration(format!("bad configuration JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] for an invalid cache geometry,
    /// a negative or non-finite power parameter, or an unsupported register count.
    pub fn validate(&self) -> SimResult<()> {
        let _ = self.l1.geometry()?;
        let _ = self.l2.geometry()?;
        self.power.validate()?;
        self.interpreter.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1: CacheConfig::default_l1(),
            l2: CacheConfig::default_l2(),
            power: PowerConfig::default(),
            write_policy: WritePolicy::default(),
            interpreter: InterpreterConfig::default(),
            symbol_base: defaults::SYMBOL_BASE,
            random_seed: defaults::RANDOM_SEED,
        }
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Block (line) size in bytes
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: usize,

    /// Ways per set; 0 means fully associative
    #[serde(default = "CacheConfig::default_ways")]
    pub associativity: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::L1_SIZE
    }

    /// Returns the default block size in bytes.
    fn default_block() -> usize {
        defaults::BLOCK_SIZE
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::L1_WAYS
    }

    /// Default first-level cache: 1 KiB, 32-byte blocks, 4-way, LRU.
    pub fn default_l1() -> Self {
        Self {
            size_bytes: defaults::L1_SIZE,
            block_bytes: defaults::BLOCK_SIZE,
            associativity: defaults::L1_WAYS,
            policy: ReplacementPolicy::Lru,
        }
    }

    /// Default second-level cache: 4 KiB, 32-byte blocks, 4-way, LRU.
    pub fn default_l2() -> Self {
        Self {
            size_bytes: defaults::L2_SIZE,
            block_bytes: defaults::BLOCK_SIZE,
            associativity: defaults::L2_WAYS,
            policy: ReplacementPolicy::Lru,
        }
    }

    /// Validates the level and derives its geometry.
    ///
    /// # Errors
    ///
    /// See [`Geometry::new`].
    pub fn geometry(&self) -> SimResult<Geometry> {
        Geometry::new(self.size_bytes, self.block_bytes, self.associativity)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::default_l1()
    }
}

/// Energy model coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PowerConfig {
    /// Configured static power, charged per KiB of L1 on every access
    #[serde(default = "PowerConfig::default_static_power")]
    pub static_power: f64,

    /// Energy charged on every L1 miss
    #[serde(default = "PowerConfig::default_miss_penalty_power")]
    pub miss_penalty_power: f64,

    /// Supply voltage; energy scales with its square
    #[serde(default = "PowerConfig::default_voltage")]
    pub voltage: f64,
}

impl PowerConfig {
    /// Returns the default static power coefficient.
    fn default_static_power() -> f64 {
        defaults::STATIC_POWER
    }

    /// Returns the default miss penalty power.
    fn default_miss_penalty_power() -> f64 {
        defaults::MISS_PENALTY_POWER
    }

    /// Returns the default supply voltage.
    fn default_voltage() -> f64 {
        defaults::VOLTAGE
    }

    /// Rejects negative or non-finite coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] naming the offending field.
    pub fn validate(&self) -> SimResult<()> {
        for (name, value) in [
            ("static_power", self.static_power),
            ("miss_penalty_power", self.miss_penalty_power),
            ("voltage", self.voltage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::Configuration(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            static_power: defaults::STATIC_POWER,
            miss_penalty_power: defaults::MISS_PENALTY_POWER,
            voltage: defaults::VOLTAGE,
        }
    }
}

/// Instruction interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterpreterConfig {
    /// Register-file size: 32 (`x0`..`x31`) or 8 (`R0`..`R7`)
    #[serde(default = "InterpreterConfig::default_register_count")]
    pub register_count: usize,

    /// Program counter after reset
    #[serde(default = "InterpreterConfig::default_base_pc")]
    pub base_pc: u32,

    /// Step cap for `run` and the trace assembler
    #[serde(default = "InterpreterConfig::default_max_steps")]
    pub max_steps: usize,
}

impl InterpreterConfig {
    /// Returns the default register count.
    fn default_register_count() -> usize {
        defaults::REGISTER_COUNT
    }

    /// Returns the default base program counter.
    fn default_base_pc() -> u32 {
        defaults::BASE_PC
    }

    /// Returns the default step cap.
    fn default_max_steps() -> usize {
        defaults::MAX_STEPS
    }

    /// Only the two register-file variants are supported.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] for any other register count.
    pub fn validate(&self) -> SimResult<()> {
        if self.register_count != INTERPRETER_REGISTERS && self.register_count != ASSEMBLER_REGISTERS
        {
            return Err(SimError::Configuration(format!(
                "register_count must be {ASSEMBLER_REGISTERS} or {INTERPRETER_REGISTERS} (got {})",
                self.register_count
            )));
        }
        Ok(())
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            register_count: defaults::REGISTER_COUNT,
            base_pc: defaults::BASE_PC,
            max_steps: defaults::MAX_STEPS,
        }
    }
}
