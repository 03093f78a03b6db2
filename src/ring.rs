//! Token-ring ranges and repair segments
//!
//! Ring positions are signed 128-bit integers, wide enough for the
//! Murmur3 token space with headroom. Ranges are half-aware of ring
//! wraparound: a range whose start is >= its end covers the region
//! crossing the minimum token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on the token ring.
pub type Token = i128;

/// A contiguous slice of the token ring, `(start, end]` oriented
/// clockwise. `start >= end` denotes a range wrapping past the ring
/// minimum (a full ring is represented as a wrapping range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingRange {
    start: Token,
    end: Token,
}

impl RingRange {
    pub fn new(start: Token, end: Token) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Token {
        self.start
    }

    pub fn end(&self) -> Token {
        self.end
    }

    /// Whether this range crosses the ring minimum.
    pub fn is_wrapping(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `other` lies entirely within this range, bounds inclusive.
    ///
    /// A non-wrapping range can only enclose a non-wrapping range whose
    /// bounds fall between its own. A wrapping range encloses a
    /// non-wrapping range sitting on either side of the ring minimum,
    /// and a wrapping range whose bounds are within its own.
    pub fn encloses(&self, other: &RingRange) -> bool {
        if !self.is_wrapping() {
            !other.is_wrapping() && self.start <= other.start && other.end <= self.end
        } else if !other.is_wrapping() {
            self.start <= other.start || other.end <= self.end
        } else {
            self.start <= other.start && other.end <= self.end
        }
    }

}

impl fmt::Display for RingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}]", self.start, self.end)
    }
}

/// The unit of work for one repair sub-task: one or more token ranges
/// repaired together. The first range is the segment's primary range,
/// used for replica resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    token_ranges: Vec<RingRange>,
}

impl Segment {
    pub fn new(token_ranges: Vec<RingRange>) -> Self {
        Self { token_ranges }
    }

    /// Single-range segment, the common case.
    pub fn from_range(range: RingRange) -> Self {
        Self {
            token_ranges: vec![range],
        }
    }

    pub fn token_ranges(&self) -> &[RingRange] {
        &self.token_ranges
    }

    /// The range replica resolution is performed against.
    pub fn primary_range(&self) -> Option<&RingRange> {
        self.token_ranges.first()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, range) in self.token_ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", range)?;
        }
        write!(f, "]")
    }
}
