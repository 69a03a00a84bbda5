//! Error types for `annuaire-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{path} returned status {status}")]
  Status { status: u16, path: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
