//! Rolodex toggle controller — flips one card's membership.
//!
//! Creation only needs the card id, but deletion targets the relation's own
//! identifier, which the client does not cache; removal therefore re-fetches
//! the relation list before issuing the delete. Flags flip only after the
//! remote call succeeds — there is no optimistic pre-set and hence nothing
//! to roll back.

use crate::{
  Error, Result, card::Card, session::Session, source::DirectorySource,
};

/// What a successful toggle invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
  /// A relation was created; the card's flag is now true.
  Added,
  /// The relation was deleted; the card's flag is now false.
  Removed,
  /// The flag said the card was tracked but no matching relation exists
  /// remotely. Nothing was mutated; the next full load recomputes the flag.
  AlreadyAbsent,
}

/// Toggle `card_id`'s rolodex membership against the remote source.
///
/// Preconditions are checked before any network call: the caller's own cards
/// are rejected with [`Error::OwnCard`], and a missing token with
/// [`Error::LoginRequired`]. Exactly one card's flag is mutated per
/// invocation; the rest of the list is untouched.
pub async fn toggle_rolodex<S>(
  source: &S,
  session: &Session,
  cards: &mut [Card],
  card_id: &str,
) -> Result<ToggleOutcome>
where
  S: DirectorySource,
{
  let card = cards
    .iter_mut()
    .find(|c| c.id == card_id)
    .ok_or_else(|| Error::CardNotFound(card_id.to_owned()))?;

  if card.is_mine {
    return Err(Error::OwnCard);
  }
  let Some(token) = session.token() else {
    return Err(Error::LoginRequired);
  };

  if !card.is_in_rolodex {
    source
      .create_relation(token, &card.id, "")
      .await
      .map_err(Error::source)?;
    card.is_in_rolodex = true;
    tracing::debug!(card_id, "relation created");
    return Ok(ToggleOutcome::Added);
  }

  // Removal path: look up the relation's own id first.
  let relations =
    source.fetch_relations(token).await.map_err(Error::source)?;
  let Some(relation) =
    relations.into_iter().find(|r| r.card_id == card.id)
  else {
    tracing::debug!(card_id, "no matching relation; already consistent");
    return Ok(ToggleOutcome::AlreadyAbsent);
  };

  source
    .delete_relation(token, &relation.id)
    .await
    .map_err(Error::source)?;
  card.is_in_rolodex = false;
  tracing::debug!(card_id, relation_id = %relation.id, "relation deleted");
  Ok(ToggleOutcome::Removed)
}
