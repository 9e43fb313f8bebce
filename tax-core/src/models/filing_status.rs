use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a recognised filing status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised filing status '{0}' (expected single, joint or head)")]
pub struct ParseFilingStatusError(pub String);

/// Filing status used to select bracket tables and the standard deduction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    #[default]
    Single,
    Joint,
    Head,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 3] = [Self::Single, Self::Joint, Self::Head];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Joint => "joint",
            Self::Head => "head",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Joint => "Married Filing Jointly",
            Self::Head => "Head of Household",
        }
    }

    /// Parses a status code. Accepts the long codes (`single`, `joint`,
    /// `head`) and the IRS abbreviations (`S`, `MFJ`, `HOH`), ignoring case
    /// and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "s" => Some(Self::Single),
            "joint" | "mfj" => Some(Self::Joint),
            "head" | "hoh" => Some(Self::Head),
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingStatus {
    type Err = ParseFilingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseFilingStatusError(s.to_string()))
    }
}
