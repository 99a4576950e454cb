//! Guest language handling.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Languages supported by the invitation and its confirmation emails.
///
/// Spanish is the site default; anything unrecognised normalises to it
/// rather than failing, matching the original email function's fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish (site default).
    #[default]
    Es,
    /// English.
    En,
    /// Italian.
    It,
}

impl Language {
    /// Lowercase language code as stored in guest rows and event metadata.
    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
            Self::It => "it",
        }
    }

    /// Normalise an arbitrary code to a supported language.
    ///
    /// Unknown or empty values fall back to Spanish.
    pub fn normalise(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            "it" => Ok(Self::It),
            other => Err(UnsupportedLanguage(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Raised when a language code is not one of the supported three.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);
