//! Parameter types for normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest dimensions a normalized image may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBound {
    pub max_width: u32,
    pub max_height: u32,
}

impl SizeBound {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Whether `(width, height)` already fits.
    pub fn contains(self, width: u32, height: u32) -> bool {
        width <= self.max_width && height <= self.max_height
    }
}

impl Default for SizeBound {
    fn default() -> Self {
        Self::new(2000, 2000)
    }
}

impl fmt::Display for SizeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.max_width, self.max_height)
    }
}
