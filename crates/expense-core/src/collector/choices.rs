//! Closed option sets offered by the survey
//!
//! Each question with a fixed set of answers is a Rust enum. Codes and labels
//! come from exhaustive `match`es, so adding an option without a code is a
//! compile error rather than a silent default.

use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

/// A single-choice survey question backed by a closed set of options
pub trait Choice: Copy + Sized + 'static {
    /// Question name used in error reports
    const FIELD: &'static str;

    /// Every option, in the order they are offered to the user
    const ALL: &'static [Self];

    /// Label exactly as shown to the user
    fn label(self) -> &'static str;

    /// Short lowercase spellings accepted from the command line
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Resolve a label exactly as shown to the user.
    ///
    /// Anything else, including a differently cased label, is `InvalidInput`.
    fn parse(input: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|c| c.label() == input)
            .copied()
            .ok_or_else(|| PredictorError::invalid_input(Self::FIELD, input))
    }

    /// Lenient lookup for command-line entry: trims, ignores case and
    /// accepts the short aliases.
    fn parse_alias(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Ok(choice) = Self::parse(trimmed) {
            return Ok(choice);
        }
        let lowered = trimmed.to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|c| {
                c.label().to_ascii_lowercase() == lowered
                    || c.aliases().iter().any(|a| *a == lowered)
            })
            .copied()
            .ok_or_else(|| PredictorError::invalid_input(Self::FIELD, input))
    }

    /// Labels of every option, for prompts and help text
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

/// Where the student lives during the semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingArrangement {
    WithFamily,
    OnCampusHostel,
    OffCampusRental,
}

impl LivingArrangement {
    pub fn is_hostel(self) -> bool {
        matches!(self, Self::OnCampusHostel)
    }

    pub fn is_rental(self) -> bool {
        matches!(self, Self::OffCampusRental)
    }
}

impl Choice for LivingArrangement {
    const FIELD: &'static str = "living";
    const ALL: &'static [Self] = &[Self::WithFamily, Self::OnCampusHostel, Self::OffCampusRental];

    fn label(self) -> &'static str {
        match self {
            Self::WithFamily => "With Family",
            Self::OnCampusHostel => "On-Campus Hostel",
            Self::OffCampusRental => "Off-Campus Rental",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::WithFamily => &["family", "with-family"],
            Self::OnCampusHostel => &["hostel", "on-campus-hostel"],
            Self::OffCampusRental => &["rental", "off-campus-rental"],
        }
    }
}

/// How often the student shops for non-essential items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopFrequency {
    Rarely,
    Occasionally,
    Frequently,
}

impl ShopFrequency {
    pub fn code(self) -> u8 {
        match self {
            Self::Rarely => 0,
            Self::Occasionally => 1,
            Self::Frequently => 2,
        }
    }
}

impl Choice for ShopFrequency {
    const FIELD: &'static str = "shop_frequency";
    const ALL: &'static [Self] = &[Self::Rarely, Self::Occasionally, Self::Frequently];

    fn label(self) -> &'static str {
        match self {
            Self::Rarely => "Rarely",
            Self::Occasionally => "Occasionally",
            Self::Frequently => "Frequently",
        }
    }
}

/// How often the student eats out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EatOutFrequency {
    Rarely,
    Sometimes,
    Often,
}

impl EatOutFrequency {
    pub fn code(self) -> u8 {
        match self {
            Self::Rarely => 0,
            Self::Sometimes => 1,
            Self::Often => 2,
        }
    }
}

impl Choice for EatOutFrequency {
    const FIELD: &'static str = "eat_out";
    const ALL: &'static [Self] = &[Self::Rarely, Self::Sometimes, Self::Often];

    fn label(self) -> &'static str {
        match self {
            Self::Rarely => "Rarely",
            Self::Sometimes => "Sometimes",
            Self::Often => "Often (daily)",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Often => &["often", "daily"],
            _ => &[],
        }
    }
}

/// Answer to a yes/no toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn code(self) -> u8 {
        match self {
            Self::No => 0,
            Self::Yes => 1,
        }
    }
}

impl Choice for YesNo {
    const FIELD: &'static str = "yes_no";
    const ALL: &'static [Self] = &[Self::No, Self::Yes];

    fn label(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => "Yes",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::No => &["n", "false"],
            Self::Yes => &["y", "true"],
        }
    }
}
