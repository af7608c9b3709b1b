//! Masking levels and the attribute lattice
//!
//! A column's sensitivity is a [`MaskingLevel`]. During lineage evaluation
//! levels flow from source columns into derived columns through
//! [`MaskingAttributes::transmitted_by`], a lattice join where the most
//! restrictive level wins.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column sensitivity classification, ordered from least to most restrictive
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MaskingLevel {
    /// Value is shown as-is
    #[default]
    None,
    /// Value is partially masked
    Partial,
    /// Value is fully masked
    Full,
}

impl MaskingLevel {
    /// Top of the lattice; once reached an attribute can no longer change
    pub const MAX: MaskingLevel = MaskingLevel::Full;

    /// Numeric rank (higher = more restrictive)
    pub fn rank(self) -> u8 {
        match self {
            MaskingLevel::None => 0,
            MaskingLevel::Partial => 1,
            MaskingLevel::Full => 2,
        }
    }

    /// Lowercase name as used in catalogs and config
    pub fn as_str(self) -> &'static str {
        match self {
            MaskingLevel::None => "none",
            MaskingLevel::Partial => "partial",
            MaskingLevel::Full => "full",
        }
    }
}

impl fmt::Display for MaskingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskingLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(MaskingLevel::None),
            "partial" => Ok(MaskingLevel::Partial),
            "full" => Ok(MaskingLevel::Full),
            other => Err(CoreError::UnknownMaskingLevel(other.to_string())),
        }
    }
}

/// A masking level plus the "never changes under transmission" flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskingAttributes {
    level: MaskingLevel,
    never_changes: bool,
}

impl MaskingAttributes {
    /// Attributes holding `level`
    pub fn new(level: MaskingLevel) -> Self {
        Self {
            level,
            never_changes: level == MaskingLevel::MAX,
        }
    }

    /// The current level
    pub fn level(&self) -> MaskingLevel {
        self.level
    }

    /// True once the attribute sits at the lattice top
    pub fn is_never_change(&self) -> bool {
        self.never_changes
    }

    /// Join `other` into `self`. Returns whether `self` changed.
    pub fn transmitted_by(&mut self, other: &MaskingAttributes) -> bool {
        if self.never_changes || other.level <= self.level {
            return false;
        }
        self.level = other.level;
        self.never_changes = self.level == MaskingLevel::MAX;
        true
    }

    /// Join used while folding the operands of a single expression.
    ///
    /// Same lattice join as [`transmitted_by`](Self::transmitted_by); kept
    /// separate so callers can short-circuit expression walks on
    /// [`is_never_change`](Self::is_never_change).
    pub fn transmitted_by_in_expression(&mut self, other: &MaskingAttributes) -> bool {
        self.transmitted_by(other)
    }

    /// Join of two attributes as a new value
    pub fn joined(mut self, other: &MaskingAttributes) -> Self {
        self.transmitted_by(other);
        self
    }
}

impl From<MaskingLevel> for MaskingAttributes {
    fn from(level: MaskingLevel) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
#[path = "masking_test.rs"]
mod tests;
