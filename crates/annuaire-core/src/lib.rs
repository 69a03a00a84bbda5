//! Core types and logic for the annuaire directory client.
//!
//! This crate is deliberately free of HTTP dependencies. It defines the
//! domain types, the [`source::DirectorySource`] abstraction over the remote
//! API, and the three behavioral pieces of the directory: aggregation
//! ([`aggregate`]), filtering ([`filter`]) and the rolodex toggle
//! ([`toggle`]). All other crates depend on it; it depends on nothing
//! transport-specific.

pub mod aggregate;
pub mod card;
pub mod error;
pub mod filter;
pub mod relation;
pub mod session;
pub mod source;
pub mod toggle;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
