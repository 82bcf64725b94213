//! Address record returned by ViaCEP.

use std::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A single address as returned by the ViaCEP API.
///
/// Field names follow Rust conventions; the JSON names are the API's
/// Portuguese ones (`logradouro`, `bairro`, `localidade`, ...). Any field the
/// API omits decodes as an empty string.
///
/// # Example
/// ```
/// use viacep_core::Address;
///
/// let json = r#"{"cep":"01001-000","logradouro":"Praça da Sé","uf":"SP"}"#;
/// let address: Address = serde_json::from_str(json).unwrap();
/// assert_eq!(address.street, "Praça da Sé");
/// assert!(address.city.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Postal code, formatted `NNNNN-NNN`
    pub cep: String,
    /// Street name
    #[serde(rename = "logradouro")]
    pub street: String,
    /// Complement (e.g. "lado ímpar")
    #[serde(rename = "complemento")]
    pub complement: String,
    /// Unit, for CEPs assigned to a single building or organization
    #[serde(rename = "unidade")]
    pub unit: String,
    /// Neighborhood
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    /// City
    #[serde(rename = "localidade")]
    pub city: String,
    /// Two-letter state code
    pub uf: String,
    /// Full state name
    #[serde(rename = "estado")]
    pub state: String,
    /// Region (e.g. "Sudeste")
    #[serde(rename = "regiao")]
    pub region: String,
    /// IBGE municipality code
    pub ibge: String,
    /// GIA code (São Paulo state only)
    pub gia: String,
    /// Telephone area code
    pub ddd: String,
    /// SIAFI municipality code
    pub siafi: String,
}

impl Address {
    /// Returns the postal code with the hyphen removed.
    pub fn cep_digits(&self) -> String {
        self.cep.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.street)?;
        if !self.neighborhood.is_empty() {
            write!(f, ", {}", self.neighborhood)?;
        }
        write!(f, ", {} - {}, {}", self.city, self.uf, self.cep)
    }
}
