//! Entity tags and document languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Entity type tag. Declaration order is catalog order: extraction,
/// serialisation, and mismatch reporting all iterate tags in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    Date,
    Number,
    EurAmount,
    Percent,
    LegalRef,
    Article,
    Range,
}

impl EntityTag {
    pub const ALL: [EntityTag; 7] = [
        EntityTag::Date,
        EntityTag::Number,
        EntityTag::EurAmount,
        EntityTag::Percent,
        EntityTag::LegalRef,
        EntityTag::Article,
        EntityTag::Range,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Number => "number",
            Self::EurAmount => "eur_amount",
            Self::Percent => "percent",
            Self::LegalRef => "legal_ref",
            Self::Article => "article",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownTag(s.to_string()))
    }
}

/// Language of one document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Lv,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Lv];

    /// Lowercase wire code, e.g. `"en"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Lv => "lv",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().to_ascii_uppercase())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownLanguage(s.to_string()))
    }
}
