//! Memory segment addressing.
//!
//! Maps VM segments onto Hack RAM. Each segment's addressing rule lives in
//! exactly one place: [`Location::resolve`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest value a Hack A-instruction can load.
pub const MAX_A_VALUE: u16 = 0x7FFF;

/// First RAM address of the temp segment (RAM[5..=12]).
pub const TEMP_BASE: u16 = 5;

/// Scratch register holding a destination address across a pop.
pub const SCRATCH_REGISTER: &str = "R13";

/// Memory segments (8 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant, // Push only, immediate value
    Local,    // RAM[LCL + index]
    Argument, // RAM[ARG + index]
    This,     // RAM[THIS + index]
    That,     // RAM[THAT + index]
    Pointer,  // THIS (0) or THAT (1)
    Temp,     // RAM[5-12]
    Static,   // Module.index
}

/// A segment name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown segment name: {0}")]
pub struct UnknownSegmentName(pub String);

/// Index beyond what a segment can address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("index {index} out of range for segment {segment} (max: {max})")]
pub struct SegmentIndexError {
    pub segment: Segment,
    pub index: u16,
    pub max: u16,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Constant,
        Segment::Local,
        Segment::Argument,
        Segment::This,
        Segment::That,
        Segment::Pointer,
        Segment::Temp,
        Segment::Static,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
        }
    }

    /// Maximum valid index for this segment
    pub fn max_index(&self) -> u16 {
        match self {
            Segment::Pointer => 1,
            Segment::Temp => 7,
            // Static symbols are names, not A-instruction literals
            Segment::Static => u16::MAX,
            _ => MAX_A_VALUE,
        }
    }
}

impl FromStr for Segment {
    type Err = UnknownSegmentName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|segment| segment.name() == s)
            .ok_or_else(|| UnknownSegmentName(s.to_string()))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A RAM cell that can be written by `pop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// RAM[RAM[base] + offset]
    Based { base: &'static str, offset: u16 },
    /// A named register, accessed directly (pointer segment)
    Register(&'static str),
    /// Fixed RAM address (temp segment)
    Fixed(u16),
    /// Assembler-allocated variable `Module.index`
    Static(String),
}

impl Address {
    fn based(base: &'static str, offset: u16) -> Self {
        Address::Based { base, offset }
    }
}

/// Where a pushed value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Immediate value; cannot be popped into
    Constant(u16),
    Memory(Address),
}

impl Location {
    /// Resolve `segment index` inside `module_name` to a concrete location.
    pub fn resolve(
        segment: Segment,
        index: u16,
        module_name: &str,
    ) -> Result<Self, SegmentIndexError> {
        let max = segment.max_index();
        if index > max {
            return Err(SegmentIndexError {
                segment,
                index,
                max,
            });
        }

        let address = match segment {
            Segment::Constant => return Ok(Location::Constant(index)),
            Segment::Local => Address::based("LCL", index),
            Segment::Argument => Address::based("ARG", index),
            Segment::This => Address::based("THIS", index),
            Segment::That => Address::based("THAT", index),
            Segment::Pointer if index == 0 => Address::Register("THIS"),
            Segment::Pointer => Address::Register("THAT"),
            Segment::Temp => Address::Fixed(TEMP_BASE + index),
            Segment::Static => Address::Static(static_symbol(module_name, index)),
        };

        Ok(Location::Memory(address))
    }

    /// The writable address, or `None` for constants.
    pub fn into_address(self) -> Option<Address> {
        match self {
            Location::Constant(_) => None,
            Location::Memory(address) => Some(address),
        }
    }
}

/// Symbol naming static variable `index` of `module_name`.
pub fn static_symbol(module_name: &str, index: u16) -> String {
    format!("{}.{}", module_name, index)
}
