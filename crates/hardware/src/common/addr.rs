//! Address references, cache geometry, and symbol allocation.
//!
//! This module turns the loosely-typed addresses found in traces and programs into
//! 32-bit byte addresses and splits them into cache fields. It provides:
//! 1. **`AddressRef`:** A literal address or a symbolic variable name.
//! 2. **`Geometry`:** The address codec for one cache level (tag/index/offset split).
//! 3. **`SymbolTable`:** Block-aligned allocation of variable names from a fixed base.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::constants::ADDRESS_MASK;
use super::error::{SimError, SimResult};

/// An address as written by the user: either a literal or a variable name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressRef {
    /// A literal byte address, already masked to 32 bits.
    Literal(u32),
    /// A variable name resolved through the [`SymbolTable`].
    Symbol(String),
}

impl AddressRef {
    /// Parses a single address token.
    ///
    /// `0x`-prefixed hex and plain decimal become literals (masked to 32 bits);
    /// identifiers (`[A-Za-z_][A-Za-z0-9_]*`) become symbols. Anything else is rejected.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            return u64::from_str_radix(hex, 16)
                .ok()
                .map(|v| Self::Literal((v & ADDRESS_MASK) as u32));
        }
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse::<u64>()
                .ok()
                .map(|v| Self::Literal((v & ADDRESS_MASK) as u32));
        }
        if is_identifier(token) {
            return Some(Self::Symbol(token.to_string()));
        }
        None
    }

    /// Builds a symbolic reference to the variable `name`.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }
}

impl From<u32> for AddressRef {
    fn from(addr: u32) -> Self {
        Self::Literal(addr)
    }
}

impl TryFrom<&str> for AddressRef {
    type Error = SimError;

    /// Parses the token with [`AddressRef::parse`].
    ///
    /// Tokens that are neither a literal nor an identifier are rejected with
    /// [`SimError::MalformedLine`] (line 0, as there is no source line).
    fn try_from(token: &str) -> SimResult<Self> {
        Self::parse(token).ok_or_else(|| SimError::malformed(0, token.trim(), "bad address"))
    }
}

impl fmt::Display for AddressRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(addr) => write!(f, "0x{addr:X}"),
            Self::Symbol(name) => f.write_str(name),
        }
    }
}

/// Returns `true` if `token` is a valid variable name.
pub fn is_identifier(token: &str) -> bool {
    let mut bytes = token.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Parses a signed integer literal: decimal or `0x` hex, with an optional sign.
///
/// Values are returned as `i64`; [`parse_word`] narrows them to a data word.
pub fn parse_literal(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
        body.parse::<i64>().ok()?
    } else {
        return None;
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a 32-bit data word.
///
/// Accepts `i32::MIN..=u32::MAX`; values above `i32::MAX` keep their bit
/// pattern (`0xFFFFFFFF` is `-1`). Anything wider is rejected.
pub fn parse_word(token: &str) -> Option<i32> {
    parse_literal(token)
        .filter(|v| (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(v))
        .map(|v| v as i32)
}

/// An address split into the fields used to index one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Decomposed {
    /// Tag bits identifying the block within its set.
    pub tag: u32,
    /// Raw index field.
    pub index: u32,
    /// Byte offset within the block.
    pub offset: u32,
    /// Set the block maps to (`index mod num_sets`).
    pub set: usize,
}

/// Geometry of one cache level; doubles as its address codec.
///
/// Invariants (checked in [`Geometry::new`]):
/// - `block_bytes` and `num_sets` are powers of two.
/// - `num_sets * ways * block_bytes == size_bytes`.
/// - `offset_bits + index_bits + tag_bits == 32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Geometry {
    size_bytes: usize,
    block_bytes: usize,
    ways: usize,
    num_sets: usize,
    offset_bits: u32,
    index_bits: u32,
    tag_bits: u32,
}

impl Geometry {
    /// Validates and builds a geometry.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Total data capacity of the level.
    /// * `block_bytes` - Line size; must be a power of two.
    /// * `associativity` - Ways per set; `0` means fully associative.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] when the block size or resulting set
    /// count is not a power of two, when the size is not a multiple of the block
    /// size, or when the associativity does not evenly divide the block count.
    pub fn new(size_bytes: usize, block_bytes: usize, associativity: usize) -> SimResult<Self> {
        if block_bytes == 0 || !block_bytes.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "block size {block_bytes} is not a power of two"
            )));
        }
        if size_bytes == 0 || size_bytes % block_bytes != 0 {
            return Err(SimError::Configuration(format!(
                "cache size {size_bytes} is not a non-zero multiple of block size {block_bytes}"
            )));
        }
        let num_blocks = size_bytes / block_bytes;
        let ways = if associativity == 0 {
            num_blocks
        } else {
            associativity
        };
        if ways > num_blocks || num_blocks % ways != 0 {
            return Err(SimError::Configuration(format!(
                "associativity {ways} does not evenly divide {num_blocks} blocks"
            )));
        }
        let num_sets = num_blocks / ways;
        if !num_sets.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "set count {num_sets} is not a power of two"
            )));
        }

        let offset_bits = block_bytes.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits > 32 {
            return Err(SimError::Configuration(format!(
                "{offset_bits} offset bits and {index_bits} index bits exceed a 32-bit address"
            )));
        }

        Ok(Self {
            size_bytes,
            block_bytes,
            ways,
            num_sets,
            offset_bits,
            index_bits,
            tag_bits: 32 - index_bits - offset_bits,
        })
    }

    /// Splits `addr` into tag, index, and offset.
    #[inline]
    pub fn decompose(&self, addr: u32) -> Decomposed {
        let addr = u64::from(addr);
        let offset = addr & (self.block_bytes as u64 - 1);
        let index = (addr >> self.offset_bits) & (self.num_sets as u64 - 1);
        let tag = addr >> (self.offset_bits + self.index_bits);
        Decomposed {
            tag: tag as u32,
            index: index as u32,
            offset: offset as u32,
            set: (index as usize) % self.num_sets,
        }
    }

    /// Rebuilds the block base address from a tag and set.
    #[inline]
    pub fn block_address(&self, tag: u32, set: usize) -> u32 {
        let addr = (u64::from(tag) << (self.offset_bits + self.index_bits))
            | ((set as u64) << self.offset_bits);
        (addr & ADDRESS_MASK) as u32
    }

    /// Total data capacity in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Line size in bytes.
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Ways per set (after resolving fully-associative `0`).
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of lines in the level.
    pub fn num_blocks(&self) -> usize {
        self.num_sets * self.ways
    }

    /// `log2(block_bytes)`.
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// `log2(num_sets)`.
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// `32 - index_bits - offset_bits`.
    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }
}

/// Maps variable names to block-aligned addresses.
///
/// Append-only: a name keeps its address until the table is cleared.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    base: u32,
    next: u32,
    stride: u32,
    symbols: BTreeMap<String, u32>,
}

impl SymbolTable {
    /// Creates an empty table allocating from `base` in steps of `stride` bytes.
    pub fn new(base: u32, stride: u32) -> Self {
        Self {
            base,
            next: base,
            stride,
            symbols: BTreeMap::new(),
        }
    }

    /// Resolves an address reference, allocating a slot for unseen symbols.
    pub fn resolve(&mut self, addr: &AddressRef) -> u32 {
        match addr {
            AddressRef::Literal(a) => *a,
            AddressRef::Symbol(name) => {
                if let Some(&a) = self.symbols.get(name) {
                    return a;
                }
                let a = self.next;
                self.next = self.next.wrapping_add(self.stride);
                let _ = self.symbols.insert(name.clone(), a);
                tracing::trace!(symbol = %name, addr = a, "allocated symbol");
                a
            }
        }
    }

    /// Looks up a symbol without allocating.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.symbols.get(name).copied()
    }

    /// All allocated symbols, ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.symbols.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of allocated symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbol has been allocated.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Forgets every symbol and rewinds the allocator to its base.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.next = self.base;
    }
}
