//! Storefront locale (language + country).
//!
//! Requests may carry a locale prefix as the first path segment, e.g.
//! `/en-ca/collections/all`. The locale drives the `@inContext` directive on
//! every Storefront API query so prices come back in the visitor's market.

use core::fmt;

/// Errors that can occur when parsing a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Not of the form `xx-yy`.
    #[error("locale must look like en-us, got {0:?}")]
    Malformed(String),
}

/// Language and country pair, stored upper-case (`EN`, `US`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: Self::DEFAULT_LANGUAGE.to_string(),
            country: Self::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Locale {
    /// Language used when the path carries no locale prefix.
    pub const DEFAULT_LANGUAGE: &'static str = "EN";
    /// Country used when the path carries no locale prefix.
    pub const DEFAULT_COUNTRY: &'static str = "US";

    /// Parse a path segment such as `en-ca` or `FR-ca`.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Malformed`] unless the segment is two ASCII
    /// letters, a dash, and two more ASCII letters.
    pub fn parse(segment: &str) -> Result<Self, LocaleError> {
        let malformed = || LocaleError::Malformed(segment.to_string());
        let (language, country) = segment.split_once('-').ok_or_else(malformed)?;

        let two_letters = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic());
        if !two_letters(language) || !two_letters(country) {
            return Err(malformed());
        }

        Ok(Self {
            language: language.to_ascii_uppercase(),
            country: country.to_ascii_uppercase(),
        })
    }

    /// ISO 639-1 language code, upper-case.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// ISO 3166-1 alpha-2 country code, upper-case.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Whether this is the default `EN-US` locale.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.language == Self::DEFAULT_LANGUAGE && self.country == Self::DEFAULT_COUNTRY
    }

    /// Path prefix for links, e.g. `/en-ca`; empty for the default locale.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        if self.is_default() {
            String::new()
        } else {
            format!(
                "/{}-{}",
                self.language.to_ascii_lowercase(),
                self.country.to_ascii_lowercase()
            )
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.language.to_ascii_lowercase(),
            self.country.to_ascii_lowercase()
        )
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
