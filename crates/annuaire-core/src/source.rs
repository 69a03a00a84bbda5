//! The `DirectorySource` trait — abstraction over the remote annuaire API.
//!
//! The trait is implemented by transport backends (e.g. `annuaire-client`).
//! Higher layers (aggregation, toggle, TUI) depend on this abstraction, not
//! on any concrete transport.

use std::future::Future;

use crate::{
  card::{Card, CardDetail},
  relation::Relation,
};

/// Abstraction over the remote directory service.
///
/// Methods that require authentication take the bearer token explicitly;
/// token presence is decided by the caller (see
/// [`Session`](crate::session::Session)).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait DirectorySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the public directory list. No authentication required.
  fn fetch_public_cards(
    &self,
  ) -> impl Future<Output = Result<Vec<Card>, Self::Error>> + Send + '_;

  /// Fetch the caller's own cards, active or not.
  fn fetch_personal_cards<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Vec<Card>, Self::Error>> + Send + 'a;

  /// Fetch a single card's detail view. Contact information is only
  /// returned by the server when a token is supplied.
  fn fetch_card_detail<'a>(
    &'a self,
    card_id: &'a str,
    token: Option<&'a str>,
  ) -> impl Future<Output = Result<CardDetail, Self::Error>> + Send + 'a;

  /// Fetch the caller's full relation (rolodex) list.
  fn fetch_relations<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Vec<Relation>, Self::Error>> + Send + 'a;

  /// Create a relation tracking `card_id`. Returns the persisted relation.
  fn create_relation<'a>(
    &'a self,
    token: &'a str,
    card_id: &'a str,
    notes: &'a str,
  ) -> impl Future<Output = Result<Relation, Self::Error>> + Send + 'a;

  /// Delete a relation by its own identifier (not the card id).
  fn delete_relation<'a>(
    &'a self,
    token: &'a str,
    relation_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
