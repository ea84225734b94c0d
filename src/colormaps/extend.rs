//! Colorbar overflow-arrow direction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which ends of a colorbar get an overflow arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    #[default]
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    /// Combine the below/above overflow flags
    pub fn from_flags(below: bool, above: bool) -> Self {
        match (below, above) {
            (true, true) => Extend::Both,
            (true, false) => Extend::Min,
            (false, true) => Extend::Max,
            (false, false) => Extend::Neither,
        }
    }

    pub fn has_min(&self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn has_max(&self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Extend::Neither => "neither",
            Extend::Min => "min",
            Extend::Max => "max",
            Extend::Both => "both",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Extend::from_flags(true, true), Extend::Both);
        assert_eq!(Extend::from_flags(true, false), Extend::Min);
        assert_eq!(Extend::from_flags(false, true), Extend::Max);
        assert_eq!(Extend::from_flags(false, false), Extend::Neither);
        assert!(Extend::Both.has_min() && Extend::Both.has_max());
        assert!(!Extend::Max.has_min());
    }
}
