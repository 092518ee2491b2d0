//! How byte pairs are formed for bigram features.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};

/// Bigram pairing mode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, FromRepr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum NgramMode {
    /// Non-overlapping pairs: bytes 0-1, 2-3, 4-5, ...
    Disjoint = 0,
    /// Every consecutive pair: bytes 0-1, 1-2, 2-3, ...
    #[default]
    Overlapping = 1,
    /// Pairs two bytes apart, so even offsets pair with even offsets and odd
    /// with odd: bytes 0-2, 1-3, 2-4, ...
    EvenOdd = 2,
}

impl NgramMode {
    /// Mode for a numeric command line value.
    pub fn from_number(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_numeric_modes() {
        assert_eq!(NgramMode::from_number(0), Some(NgramMode::Disjoint));
        assert_eq!(NgramMode::from_number(1), Some(NgramMode::Overlapping));
        assert_eq!(NgramMode::from_number(2), Some(NgramMode::EvenOdd));
        assert_eq!(NgramMode::from_number(3), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(NgramMode::EvenOdd.to_string(), "even-odd");
        assert_eq!(NgramMode::from_str("disjoint").unwrap(), NgramMode::Disjoint);
    }
}
