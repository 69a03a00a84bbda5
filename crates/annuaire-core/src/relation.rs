//! Relation — the rolodex join record.
//!
//! A relation links the current user to a card they track. It carries its
//! own identifier, distinct from the card id; deletion targets the relation
//! id, which is why removal requires a lookup (see [`crate::toggle`]).

use serde::{Deserialize, Serialize};

/// "Current user tracks this card." At most one relation per (user, card)
/// pair is assumed by the toggle logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
  /// The relation's own identifier.
  pub id:      String,
  /// The tracked card.
  pub card_id: String,
  pub notes:   Option<String>,
}
