//! HTTP transport for the ViaCEP client.
//!
//! Sends JSON GET requests with a fixed retry budget and strict 200 checking.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod http;

pub use http::{decode_json, HttpClient, HttpConfig};
