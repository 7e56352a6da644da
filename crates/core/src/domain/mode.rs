use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Settings key under which the operating mode is persisted.
pub const MODE_KEY: &str = "mode";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Standard,
    Quiet,
    Verbose,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Standard, Mode::Quiet, Mode::Verbose];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Quiet => "quiet",
            Self::Verbose => "verbose",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Quiet => "Quiet",
            Self::Verbose => "Verbose",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "quiet" => Ok(Self::Quiet),
            "verbose" => Ok(Self::Verbose),
            other => Err(DomainError::UnsupportedMode(other.to_owned())),
        }
    }
}
