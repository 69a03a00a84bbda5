//! Card — the shareable identity record shown in the directory.
//!
//! A card is fetched fresh on every load and never persisted locally. The
//! two derived flags (`is_mine`, `is_in_rolodex`) are computed by the
//! aggregator; they are independent of each other.

use serde::{Deserialize, Serialize};

/// The enumerated classification of a card's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerCategory {
  Institution,
  School,
  Individual,
  /// Catch-all for category strings the client does not know about.
  #[serde(other)]
  Other,
}

impl OwnerCategory {
  /// Short label for list rendering.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Institution => "institution",
      Self::School => "school",
      Self::Individual => "individual",
      Self::Other => "other",
    }
  }
}

/// A shareable identity record owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  /// Opaque server-issued identifier; unique within the aggregated list.
  pub id:             String,
  pub name:           String,
  /// Denormalized owner attributes.
  pub owner_name:     String,
  pub owner_category: OwnerCategory,
  /// Registration identifier ("matricule"); searchable, often absent.
  pub matriculation:  Option<String>,
  /// Normalized owner identifier extracted from the wire payload, if any.
  /// Empty-after-normalization values are represented as `None`.
  pub owner_id:       Option<String>,
  /// Only active personal cards are eligible for the directory merge.
  pub is_active:      bool,
  /// Derived: the current user owns this card.
  pub is_mine:        bool,
  /// Derived: a rolodex relation exists for this card.
  pub is_in_rolodex:  bool,
}

// ─── Detail read model ───────────────────────────────────────────────────────

/// Optional contact information attached to a card's detail view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<String>,
  pub city:        Option<String>,
  pub postal_code: Option<String>,
  pub country:     Option<String>,
}

/// The detail-screen payload: the card plus whatever contact information the
/// server is willing to reveal to this caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetail {
  pub card:      Card,
  pub user_info: Option<UserInfo>,
}
