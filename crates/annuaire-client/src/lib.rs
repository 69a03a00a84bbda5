//! HTTP implementation of [`annuaire_core::source::DirectorySource`].
//!
//! Talks to the remote annuaire JSON API with `reqwest`. The wire layer
//! tolerates the loosely-typed card payloads the server emits, in particular
//! the owner identifier appearing under several different field names.

pub mod error;
pub mod http;
pub mod wire;

pub use error::{Error, Result};
pub use http::HttpDirectory;
