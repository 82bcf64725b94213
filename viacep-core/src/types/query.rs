//! Validated request arguments.
//!
//! The API answers malformed input with HTTP 400; these types reject it
//! before any request is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CEP_DIGITS, MIN_SEARCH_TERM_LEN, UF_LEN};
use crate::error::{Result, ViaCepError};

// ═══════════════════════════════════════════════════════════════════════════════
// CEP
// ═══════════════════════════════════════════════════════════════════════════════

/// A Brazilian postal code, normalized to its 8 digits.
///
/// Accepts `01001000` and `01001-000`; surrounding whitespace is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Parses and normalizes a postal code.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits: String = match trimmed.split_once('-') {
            Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
            Some(_) => return Err(ViaCepError::InvalidCep(raw.to_string())),
            None => trimmed.to_string(),
        };

        if digits.len() != CEP_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ViaCepError::InvalidCep(raw.to_string()));
        }

        Ok(Self(digits))
    }

    /// Returns the 8 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the code formatted as `NNNNN-NNN`.
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl FromStr for Cep {
    type Err = ViaCepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cep {
    type Error = ViaCepError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Cep> for String {
    fn from(cep: Cep) -> Self {
        cep.0
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SEARCH QUERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of an address search by state, city and street.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Two-letter state code, upper-case
    pub uf: String,
    /// City name
    pub city: String,
    /// Street name or fragment
    pub street: String,
}

impl SearchQuery {
    /// Validates and normalizes search arguments.
    ///
    /// `uf` must be two ASCII letters; `city` and `street` must have at least
    /// three characters after trimming.
    pub fn new(uf: &str, city: &str, street: &str) -> Result<Self> {
        let uf = uf.trim();
        if uf.len() != UF_LEN || !uf.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ViaCepError::InvalidSearch(format!(
                "UF must be {} letters, got '{}'",
                UF_LEN, uf
            )));
        }

        let city = city.trim();
        if city.chars().count() < MIN_SEARCH_TERM_LEN {
            return Err(ViaCepError::InvalidSearch(format!(
                "city must have at least {} characters, got '{}'",
                MIN_SEARCH_TERM_LEN, city
            )));
        }

        let street = street.trim();
        if street.chars().count() < MIN_SEARCH_TERM_LEN {
            return Err(ViaCepError::InvalidSearch(format!(
                "street must have at least {} characters, got '{}'",
                MIN_SEARCH_TERM_LEN, street
            )));
        }

        Ok(Self {
            uf: uf.to_ascii_uppercase(),
            city: city.to_string(),
            street: street.to_string(),
        })
    }

    /// Returns the components in request order: uf, city, street.
    pub fn components(&self) -> [&str; 3] {
        [&self.uf, &self.city, &self.street]
    }
}
