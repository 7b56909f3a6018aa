//! Line-item identity hashing
//!
//! Every line item carries a [`Uid`] derived from the report's opaque
//! `identity/LineItemId` string. The hash is 64-bit and non-cryptographic;
//! two distinct identifiers that collide are treated as the same record by
//! the store. The algorithm is selectable so integrators can see and change
//! that tradeoff.
//!
//! # Examples
//! ```
//! use costline_core::identity::IdentityHasher;
//!
//! let hasher = IdentityHasher::default();
//! let a = hasher.hash("kt7mhpr2tzvoiqxilt6f4qaqfjuc3xfa7gqbrm3ynmpqjxrmkpia");
//! let b = hasher.hash("kt7mhpr2tzvoiqxilt6f4qaqfjuc3xfa7gqbrm3ynmpqjxrmkpia");
//! assert_eq!(a, b);
//! ```

use crate::types::Uid;
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::{xxh3::xxh3_64, xxh64::xxh64};

/// Hash algorithm used to derive [`Uid`]s from line-item identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityHasher {
    /// XXH64 with the given seed. Seed 0 reproduces the identities
    /// produced by earlier releases.
    Xxh64 { seed: u64 },
    /// XXH3, 64-bit output
    Xxh3,
}

impl Default for IdentityHasher {
    fn default() -> Self {
        Self::Xxh64 { seed: 0 }
    }
}

impl IdentityHasher {
    /// Hash an identifier string into a [`Uid`]
    pub fn hash(&self, id: &str) -> Uid {
        let value = match self {
            Self::Xxh64 { seed } => xxh64(id.as_bytes(), *seed),
            Self::Xxh3 => xxh3_64(id.as_bytes()),
        };
        Uid::new(value)
    }
}

impl fmt::Display for IdentityHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xxh64 { seed: 0 } => write!(f, "xxh64"),
            Self::Xxh64 { seed } => write!(f, "xxh64:{seed}"),
            Self::Xxh3 => write!(f, "xxh3"),
        }
    }
}

impl std::str::FromStr for IdentityHasher {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.split_once(':') {
            None if lower == "xxh64" => Ok(Self::default()),
            None if lower == "xxh3" => Ok(Self::Xxh3),
            Some(("xxh64", seed)) => seed
                .parse::<u64>()
                .map(|seed| Self::Xxh64 { seed })
                .map_err(|_| format!("Invalid xxh64 seed: {seed}")),
            _ => Err(format!(
                "Invalid identity hash: {s} (expected xxh64, xxh64:<seed> or xxh3)"
            )),
        }
    }
}
