//! Wire types for the annuaire JSON API.
//!
//! The server wraps every list in an envelope (`{cards}`, `{contacts}`) and
//! the detail view in `{card, userInfo}`. Card payloads are loosely typed:
//! the owner identifier may appear under several field names depending on
//! which server-side aggregation produced the record, so unknown fields are
//! kept in a flattened map and probed by [`OWNER_ID_RULES`].

use annuaire_core::{
  card::{Card, CardDetail, OwnerCategory, UserInfo},
  relation::Relation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Owner-id extraction ─────────────────────────────────────────────────────

/// Candidate locations for a card's owner identifier, evaluated in priority
/// order. The first rule yielding a nonempty value wins. Multi-segment rules
/// descend into nested objects.
const OWNER_ID_RULES: &[&[&str]] = &[
  &["ownerId"],
  &["userId"],
  &["ownerUserId"],
  &["owner", "id"],
];

/// Normalize a candidate value to an identifier string. Strings are trimmed
/// (empty means absent), numbers are stringified, everything else is
/// ignored.
fn normalize_id(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => {
      let s = s.trim();
      (!s.is_empty()).then(|| s.to_owned())
    }
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn lookup<'a>(
  extra: &'a Map<String, Value>,
  path: &[&str],
) -> Option<&'a Value> {
  let (first, rest) = path.split_first()?;
  let mut value = extra.get(*first)?;
  for key in rest {
    value = value.get(*key)?;
  }
  Some(value)
}

// ─── Card payloads ───────────────────────────────────────────────────────────

fn default_true() -> bool { true }

fn default_category() -> OwnerCategory { OwnerCategory::Other }

/// A card as the server sends it. Fields the client does not model land in
/// `extra` for the owner-id probe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
  pub id:   String,
  pub name: String,

  #[serde(default)]
  pub owner_name: String,

  #[serde(default = "default_category")]
  pub owner_type: OwnerCategory,

  #[serde(default)]
  pub matriculation: Option<String>,

  #[serde(default = "default_true")]
  pub is_active: bool,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl CardPayload {
  /// Apply [`OWNER_ID_RULES`] to this payload.
  pub fn owner_id(&self) -> Option<String> {
    OWNER_ID_RULES
      .iter()
      .find_map(|path| lookup(&self.extra, path).and_then(normalize_id))
  }

  /// Shape into the domain [`Card`]. The derived flags start out false;
  /// they are computed by the aggregator, never trusted from the wire.
  pub fn into_card(self) -> Card {
    let owner_id = self.owner_id();
    Card {
      id: self.id,
      name: self.name,
      owner_name: self.owner_name,
      owner_category: self.owner_type,
      matriculation: self.matriculation,
      owner_id,
      is_active: self.is_active,
      is_mine: false,
      is_in_rolodex: false,
    }
  }
}

// ─── Relation payloads ───────────────────────────────────────────────────────

/// A rolodex entry as the server sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
  pub id:      String,
  pub card_id: String,
  #[serde(default)]
  pub notes:   Option<String>,
}

impl ContactPayload {
  pub fn into_relation(self) -> Relation {
    Relation { id: self.id, card_id: self.card_id, notes: self.notes }
  }
}

/// Request body for `POST /rolodex`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactBody<'a> {
  pub card_id: &'a str,
  pub notes:   &'a str,
}

// ─── Envelopes ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CardsEnvelope {
  pub cards: Vec<CardPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ContactsEnvelope {
  pub contacts: Vec<ContactPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ContactEnvelope {
  pub contact: ContactPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoPayload {
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<String>,
  pub city:        Option<String>,
  pub postal_code: Option<String>,
  pub country:     Option<String>,
}

impl UserInfoPayload {
  pub fn into_user_info(self) -> UserInfo {
    UserInfo {
      name:        self.name,
      email:       self.email,
      phone:       self.phone,
      address:     self.address,
      city:        self.city,
      postal_code: self.postal_code,
      country:     self.country,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailEnvelope {
  pub card:      CardPayload,
  #[serde(default)]
  pub user_info: Option<UserInfoPayload>,
}

impl DetailEnvelope {
  pub fn into_detail(self) -> CardDetail {
    CardDetail {
      card:      self.card.into_card(),
      user_info: self.user_info.map(UserInfoPayload::into_user_info),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(json: serde_json::Value) -> CardPayload {
    serde_json::from_value(json).unwrap()
  }

  #[test]
  fn owner_id_prefers_the_highest_priority_rule() {
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "ownerId": "u-owner",
      "userId": "u-user",
      "owner": { "id": "u-nested" },
    }));
    assert_eq!(p.owner_id().as_deref(), Some("u-owner"));
  }

  #[test]
  fn owner_id_falls_through_empty_and_missing_fields() {
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "ownerId": "  ",
      "owner": { "id": "u-nested" },
    }));
    assert_eq!(p.owner_id().as_deref(), Some("u-nested"));
  }

  #[test]
  fn numeric_owner_ids_are_stringified() {
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "userId": 42,
    }));
    assert_eq!(p.owner_id().as_deref(), Some("42"));
  }

  #[test]
  fn absent_owner_id_normalizes_to_none() {
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "ownerId": null,
    }));
    assert_eq!(p.owner_id(), None);
  }

  #[test]
  fn unknown_owner_type_maps_to_other() {
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "ownerType": "syndicate",
    }));
    assert_eq!(p.owner_type, OwnerCategory::Other);
  }

  #[test]
  fn cards_envelope_decodes_and_defaults_is_active() {
    let envelope: CardsEnvelope = serde_json::from_str(
      r#"{"cards": [
        {"id": "c1", "name": "A", "ownerName": "O", "ownerType": "school"},
        {"id": "c2", "name": "B", "isActive": false}
      ]}"#,
    )
    .unwrap();

    assert_eq!(envelope.cards.len(), 2);
    assert!(envelope.cards[0].is_active);
    assert_eq!(envelope.cards[0].owner_type, OwnerCategory::School);
    assert!(!envelope.cards[1].is_active);
  }

  #[test]
  fn detail_envelope_decodes_optional_user_info() {
    let detail: DetailEnvelope = serde_json::from_str(
      r#"{"card": {"id": "c1", "name": "A"},
          "userInfo": {"email": "a@example.com", "postalCode": "75001"}}"#,
    )
    .unwrap();

    let detail = detail.into_detail();
    let info = detail.user_info.unwrap();
    assert_eq!(info.email.as_deref(), Some("a@example.com"));
    assert_eq!(info.postal_code.as_deref(), Some("75001"));
    assert!(info.name.is_none());
  }

  #[test]
  fn wire_flags_on_cards_are_never_trusted() {
    // A hostile or buggy server setting isMine has no effect.
    let p = payload(serde_json::json!({
      "id": "c1",
      "name": "Card",
      "isMine": true,
      "isInRolodex": true,
    }));
    let card = p.into_card();
    assert!(!card.is_mine);
    assert!(!card.is_in_rolodex);
  }
}
