//! Curriculum levels and their reading categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Curriculum level, ordered from pre-K counting through calculus, followed
/// by the elective levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "6A")]
    L6A,
    #[serde(rename = "5A")]
    L5A,
    #[serde(rename = "4A")]
    L4A,
    #[serde(rename = "3A")]
    L3A,
    #[serde(rename = "2A")]
    L2A,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    /// Elective: vectors
    XV,
    /// Elective: matrices
    XM,
    /// Elective: probability
    XP,
    /// Elective: statistics
    XS,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::L6A => "6A",
            Level::L5A => "5A",
            Level::L4A => "4A",
            Level::L3A => "3A",
            Level::L2A => "2A",
            Level::A => "A",
            Level::B => "B",
            Level::C => "C",
            Level::D => "D",
            Level::E => "E",
            Level::F => "F",
            Level::G => "G",
            Level::H => "H",
            Level::I => "I",
            Level::J => "J",
            Level::K => "K",
            Level::L => "L",
            Level::M => "M",
            Level::N => "N",
            Level::O => "O",
            Level::XV => "XV",
            Level::XM => "XM",
            Level::XP => "XP",
            Level::XS => "XS",
        }
    }

    /// All levels in curriculum order
    pub fn all() -> &'static [Level] {
        &[
            Level::L6A,
            Level::L5A,
            Level::L4A,
            Level::L3A,
            Level::L2A,
            Level::A,
            Level::B,
            Level::C,
            Level::D,
            Level::E,
            Level::F,
            Level::G,
            Level::H,
            Level::I,
            Level::J,
            Level::K,
            Level::L,
            Level::M,
            Level::N,
            Level::O,
            Level::XV,
            Level::XM,
            Level::XP,
            Level::XS,
        ]
    }

    /// Reading category used by the readability checks
    pub fn category(&self) -> ReadingCategory {
        match self {
            Level::L6A | Level::L5A | Level::L4A | Level::L3A => ReadingCategory::PreK,
            Level::L2A | Level::A | Level::B => ReadingCategory::ElementaryBasic,
            Level::C | Level::D | Level::E | Level::F => ReadingCategory::ElementaryAdvanced,
            Level::G | Level::H | Level::I => ReadingCategory::MiddleSchool,
            Level::J | Level::K => ReadingCategory::HighSchool,
            Level::L | Level::M | Level::N | Level::O => ReadingCategory::Calculus,
            Level::XV | Level::XM | Level::XP | Level::XS => ReadingCategory::HighSchool,
        }
    }

    pub fn is_elective(&self) -> bool {
        matches!(self, Level::XV | Level::XM | Level::XP | Level::XS)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Level::all()
            .iter()
            .find(|level| level.as_str() == wanted)
            .copied()
            .ok_or_else(|| LevelParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("unknown level '{0}' (valid: 6A-2A, A-O, XV, XM, XP, XS)")]
pub struct LevelParseError(pub String);

/// Reading categories, ordered from youngest to oldest audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingCategory {
    PreK,
    ElementaryBasic,
    ElementaryAdvanced,
    MiddleSchool,
    HighSchool,
    Calculus,
}

impl ReadingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingCategory::PreK => "pre-k",
            ReadingCategory::ElementaryBasic => "elementary-basic",
            ReadingCategory::ElementaryAdvanced => "elementary-advanced",
            ReadingCategory::MiddleSchool => "middle-school",
            ReadingCategory::HighSchool => "high-school",
            ReadingCategory::Calculus => "calculus",
        }
    }
}

impl fmt::Display for ReadingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_follows_curriculum() {
        assert!(Level::L6A < Level::L2A);
        assert!(Level::L2A < Level::A);
        assert!(Level::C < Level::O);
        assert!(Level::O < Level::XV);
    }

    #[test]
    fn test_level_parse_roundtrip() {
        for level in Level::all() {
            let parsed: Level = level.as_str().parse().unwrap();
            assert_eq!(parsed, *level);
        }
        assert_eq!("c".parse::<Level>().unwrap(), Level::C);
        assert_eq!("xm".parse::<Level>().unwrap(), Level::XM);
    }

    #[test]
    fn test_level_parse_unknown() {
        assert!("Z".parse::<Level>().is_err());
        assert!("7A".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_serde_names() {
        let json = serde_json::to_string(&Level::L3A).unwrap();
        assert_eq!(json, "\"3A\"");
        let back: Level = serde_json::from_str("\"XS\"").unwrap();
        assert_eq!(back, Level::XS);
    }

    #[test]
    fn test_reading_category_order() {
        assert!(ReadingCategory::PreK < ReadingCategory::ElementaryBasic);
        assert!(ReadingCategory::MiddleSchool < ReadingCategory::HighSchool);
        assert!(ReadingCategory::HighSchool < ReadingCategory::Calculus);
        assert_eq!(Level::L5A.category(), ReadingCategory::PreK);
        assert_eq!(Level::M.category(), ReadingCategory::Calculus);
    }
}
