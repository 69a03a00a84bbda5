//! Directory aggregation — assembling the single source-of-truth card list.
//!
//! The visible directory is built from up to three remote sources: the
//! public card list, the caller's own cards, and the caller's rolodex
//! relations. The public fetch failing fails the whole aggregation; the two
//! authenticated fetches degrade silently when unavailable.

use std::collections::HashSet;

use crate::{
  Error, Result,
  card::Card,
  relation::Relation,
  session::{CurrentUser, Session},
  source::DirectorySource,
};

// ─── Pure steps ───────────────────────────────────────────────────────────────

/// Normalized owner-id comparison. Absent values normalize to the empty
/// string, and the empty string never matches.
fn owner_matches(owner_id: Option<&str>, user_id: &str) -> bool {
  let owner = owner_id.unwrap_or_default();
  !owner.is_empty() && owner == user_id
}

/// Merge the caller's active personal cards into the public list and compute
/// `is_mine` for every card in the result.
///
/// Personal cards whose id already appears in the public list are dropped —
/// the server-side directory should already contain them; parity is enforced
/// here anyway. Surviving personal cards are stamped with the current user's
/// owner attributes and appended.
pub fn merge_personal(
  mut public: Vec<Card>,
  personal: Vec<Card>,
  user: &CurrentUser,
) -> Vec<Card> {
  let appended: Vec<Card> = {
    let known: HashSet<&str> =
      public.iter().map(|c| c.id.as_str()).collect();
    personal
      .into_iter()
      .filter(|c| c.is_active && !known.contains(c.id.as_str()))
      .map(|mut c| {
        c.owner_name = user.name.clone();
        c.owner_category = user.category;
        c.is_mine = true;
        c
      })
      .collect()
  };

  for card in &mut public {
    card.is_mine = owner_matches(card.owner_id.as_deref(), &user.id);
  }

  public.extend(appended);
  public
}

/// Recompute `is_in_rolodex` for every card from the given relation list.
/// Prior values are replaced, never merged.
pub fn apply_rolodex(cards: &mut [Card], relations: &[Relation]) {
  for card in cards {
    card.is_in_rolodex = relations.iter().any(|r| r.card_id == card.id);
  }
}

// ─── Orchestration ────────────────────────────────────────────────────────────

/// Load and annotate the full directory list.
///
/// Fetches the public list (hard failure), then — when authenticated — the
/// personal card list and the relation list (each degrading silently when
/// unavailable), and runs [`merge_personal`] and [`apply_rolodex`] over the
/// results. No side effects beyond the returned list.
pub async fn load_directory<S>(
  source: &S,
  session: &Session,
) -> Result<Vec<Card>>
where
  S: DirectorySource,
{
  let public =
    source.fetch_public_cards().await.map_err(Error::source)?;

  let personal = match session.token() {
    Some(token) => match source.fetch_personal_cards(token).await {
      Ok(cards) => cards,
      Err(e) => {
        tracing::warn!(error = %e, "personal cards unavailable; merge skipped");
        Vec::new()
      }
    },
    None => Vec::new(),
  };

  let mut cards = merge_personal(public, personal, session.user());

  if let Some(token) = session.token() {
    match source.fetch_relations(token).await {
      Ok(relations) => apply_rolodex(&mut cards, &relations),
      Err(e) => {
        tracing::warn!(error = %e, "relations unavailable; rolodex flags skipped");
      }
    }
  }

  tracing::debug!(count = cards.len(), "directory loaded");
  Ok(cards)
}
