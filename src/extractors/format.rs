// src/extractors/format.rs
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ExtractError;

/// The message formats a specification sheet can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Json,
    EdiX12,
    Edifact,
    Idoc,
}

impl FormatTag {
    pub const ALL: [FormatTag; 4] = [FormatTag::Json, FormatTag::EdiX12, FormatTag::Edifact, FormatTag::Idoc];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Json => "JSON",
            FormatTag::EdiX12 => "EDI-X12",
            FormatTag::Edifact => "EDIFACT",
            FormatTag::Idoc => "IDOC",
        }
    }

    /// Nested canonical trees; the rest are flat segment formats.
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, FormatTag::Json)
    }

    /// `<TAG>_structure.json`
    pub fn output_file_name(&self) -> String {
        format!("{}_structure.json", self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ExtractError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
