//! Validated cache capacity

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum number of entries a cache may hold. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validate a capacity, rejecting zero
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Capacity)
            .ok_or_else(|| Error::InvalidCapacity(capacity.to_string()))
    }

    /// Number of entries
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Capacity {
    type Error = Error;

    fn try_from(capacity: usize) -> Result<Self> {
        Capacity::new(capacity)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = Error;

    fn try_from(capacity: i64) -> Result<Self> {
        usize::try_from(capacity)
            .map_err(|_| Error::InvalidCapacity(capacity.to_string()))
            .and_then(Capacity::new)
    }
}

impl FromStr for Capacity {
    type Err = Error;

    /// Parse a capacity from text such as a flag or environment value.
    ///
    /// Anything that is not a positive base-10 integer fails, including
    /// `"1.5"`, `"-1"` and `"0"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<usize>()
            .map_err(|_| Error::InvalidCapacity(trimmed.to_string()))
            .and_then(Capacity::new)
    }
}

impl From<Capacity> for usize {
    fn from(capacity: Capacity) -> Self {
        capacity.get()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
