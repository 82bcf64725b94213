//! Domain types for ViaCEP.
//!
//! - [`Address`]: One address record as returned by the API
//! - [`Cep`]: A validated, normalized postal code
//! - [`SearchQuery`]: A validated state/city/street search

mod address;
mod query;

pub use address::*;
pub use query::*;
