use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of alerts and messages.
///
/// Written by name. Read from either the name or ATSD's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "SeverityRepr")]
pub enum Severity {
    Undefined,
    Unknown,
    Normal,
    Warning,
    Minor,
    Major,
    Critical,
    Fatal,
}

const ALL: [Severity; 8] = [
    Severity::Undefined,
    Severity::Unknown,
    Severity::Normal,
    Severity::Warning,
    Severity::Minor,
    Severity::Major,
    Severity::Critical,
    Severity::Fatal,
];

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Undefined => "UNDEFINED",
            Severity::Unknown => "UNKNOWN",
            Severity::Normal => "NORMAL",
            Severity::Warning => "WARNING",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
            Severity::Fatal => "FATAL",
        }
    }

    /// ATSD numeric code, 0 for UNDEFINED through 7 for FATAL.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        ALL.get(usize::from(code)).copied()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown severity '{}'", s))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = String;

    fn try_from(repr: SeverityRepr) -> Result<Self, Self::Error> {
        match repr {
            SeverityRepr::Code(code) => {
                Severity::from_code(code).ok_or_else(|| format!("unknown severity code {}", code))
            }
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}
