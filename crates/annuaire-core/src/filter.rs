//! Filter/search view-model — computes the visible subset of the directory.
//!
//! Pure and re-derivable at any time from its inputs; no incremental state.
//! The aggregated list is never mutated by filtering.

use crate::card::{Card, OwnerCategory};

/// Free-text query plus optional category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
  /// Raw query string as typed; trimmed and lowercased at match time.
  pub query:    String,
  /// `None` means "all categories".
  pub category: Option<OwnerCategory>,
}

impl DirectoryFilter {
  /// True when the filter matches everything.
  pub fn is_neutral(&self) -> bool {
    self.query.trim().is_empty() && self.category.is_none()
  }

  /// A card is visible iff it matches both the text rule and the category
  /// rule.
  pub fn matches(&self, card: &Card) -> bool {
    self.matches_text(card) && self.matches_category(card)
  }

  /// Text rule: the trimmed, case-insensitive query is a substring of the
  /// space-joined `name`, `owner_name` and matriculation (missing fields
  /// treated as empty). An empty query matches vacuously.
  fn matches_text(&self, card: &Card) -> bool {
    let query = self.query.trim().to_lowercase();
    if query.is_empty() {
      return true;
    }
    let haystack = format!(
      "{} {} {}",
      card.name,
      card.owner_name,
      card.matriculation.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    haystack.contains(&query)
  }

  /// Category rule: no selection matches all; a selection requires exact
  /// equality.
  fn matches_category(&self, card: &Card) -> bool {
    match self.category {
      None => true,
      Some(c) => card.owner_category == c,
    }
  }

  /// The visible subset, in input order.
  pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
    cards.iter().filter(|c| self.matches(c)).collect()
  }
}
