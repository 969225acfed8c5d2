//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Languages supported by the portal UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Bangla
    Bn,
}

/// Returned when a language code is not one of [`Language::ALL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown language code '{0}'. Supported codes: en, bn")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Self; 2] = [Self::En, Self::Bn];

    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Bn => "bn",
        }
    }

    /// Name of the language written in that language.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Bn => "বাংলা",
        }
    }

    /// The other language, for the header switch.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::En => Self::Bn,
            Self::Bn => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts bare codes and tags with a region or script suffix
    /// (`en`, `en-US`, `bn_BD`, `BN`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.trim().split(['-', '_']).next().unwrap_or_default().to_lowercase();
        match primary.as_str() {
            "en" => Ok(Self::En),
            "bn" => Ok(Self::Bn),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::bare_en("en", Language::En)]
    #[case::bare_bn("bn", Language::Bn)]
    #[case::upper("BN", Language::Bn)]
    #[case::region_dash("en-US", Language::En)]
    #[case::region_underscore("bn_BD", Language::Bn)]
    #[case::padded(" en ", Language::En)]
    fn test_from_str(#[case] input: &str, #[case] expected: Language) {
        assert_eq!(input.parse::<Language>(), Ok(expected));
    }

    #[rstest]
    #[case::empty("")]
    #[case::unknown("ja")]
    #[case::prefix_only("eng")]
    fn test_from_str_unknown(#[case] input: &str) {
        assert_eq!(input.parse::<Language>(), Err(UnknownLanguage(input.to_string())));
    }

    #[googletest::test]
    fn test_toggle_round_trips() {
        for language in Language::ALL {
            expect_that!(language.toggle().toggle(), eq(language));
            expect_that!(language.toggle(), not(eq(language)));
        }
    }

    #[googletest::test]
    fn test_serde_uses_code() {
        expect_that!(serde_json::to_string(&Language::Bn).unwrap(), eq("\"bn\""));
        expect_that!(serde_json::from_str::<Language>("\"en\"").unwrap(), eq(Language::En));
    }

    #[googletest::test]
    fn test_display_and_default() {
        expect_that!(Language::default(), eq(Language::En));
        expect_that!(Language::Bn.to_string(), eq("bn"));
        expect_that!(Language::Bn.native_name(), eq("বাংলা"));
    }
}
