//! # ViaCEP Core
//!
//! Core types, errors, and traits shared by the ViaCEP client crates.
//!
//! - **Types**: [`Address`], [`Cep`] and [`SearchQuery`]
//! - **Errors**: [`ViaCepError`] and the [`Result`] alias
//! - **Constants**: API defaults, cache key namespace, retry defaults
//! - **Traits**: [`Cache`], [`RemoteStore`] and [`HttpFetcher`] seams
//!
//! ## Example
//!
//! ```rust
//! use viacep_core::{Cep, ViaCepError};
//!
//! let cep = Cep::parse("01001-000").unwrap();
//! assert_eq!(cep.as_str(), "01001000");
//!
//! assert!(matches!(Cep::parse("123"), Err(ViaCepError::InvalidCep(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, ViaCepError};
pub use traits::*;
pub use types::*;
