//! Error types for `annuaire-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Rolodex mutations are not allowed on the caller's own cards.
  #[error("cannot add your own card to the rolodex")]
  OwnCard,

  /// The attempted action requires an authentication token.
  #[error("this action requires being logged in")]
  LoginRequired,

  /// The targeted card is not present in the aggregated list.
  #[error("card not found: {0}")]
  CardNotFound(String),

  /// A remote source call failed.
  #[error("source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a source backend error.
  pub fn source<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Source(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
