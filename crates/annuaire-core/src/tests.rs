//! Tests for aggregation, filtering and the rolodex toggle, driven by an
//! in-memory mock source that records call counts.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use thiserror::Error;

use crate::{
  Error,
  aggregate::{apply_rolodex, load_directory, merge_personal},
  card::{Card, CardDetail, OwnerCategory},
  filter::DirectoryFilter,
  relation::Relation,
  session::{CurrentUser, Session},
  source::DirectorySource,
  toggle::{ToggleOutcome, toggle_rolodex},
};

// ─── Mock source ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mock transport failure: {0}")]
struct MockError(&'static str);

#[derive(Default)]
struct MockSource {
  public:   Vec<Card>,
  personal: Vec<Card>,
  relations: Mutex<Vec<Relation>>,

  fail_public:    bool,
  fail_personal:  bool,
  fail_relations: bool,
  fail_create:    bool,
  fail_delete:    bool,

  relation_fetches: AtomicUsize,
  create_calls:     AtomicUsize,
  delete_calls:     AtomicUsize,
}

impl DirectorySource for MockSource {
  type Error = MockError;

  async fn fetch_public_cards(&self) -> Result<Vec<Card>, MockError> {
    if self.fail_public {
      return Err(MockError("public"));
    }
    Ok(self.public.clone())
  }

  async fn fetch_personal_cards(
    &self,
    _token: &str,
  ) -> Result<Vec<Card>, MockError> {
    if self.fail_personal {
      return Err(MockError("personal"));
    }
    Ok(self.personal.clone())
  }

  async fn fetch_card_detail(
    &self,
    card_id: &str,
    _token: Option<&str>,
  ) -> Result<CardDetail, MockError> {
    self
      .public
      .iter()
      .find(|c| c.id == card_id)
      .cloned()
      .map(|card| CardDetail { card, user_info: None })
      .ok_or(MockError("detail"))
  }

  async fn fetch_relations(
    &self,
    _token: &str,
  ) -> Result<Vec<Relation>, MockError> {
    self.relation_fetches.fetch_add(1, Ordering::SeqCst);
    if self.fail_relations {
      return Err(MockError("relations"));
    }
    Ok(self.relations.lock().unwrap().clone())
  }

  async fn create_relation(
    &self,
    _token: &str,
    card_id: &str,
    notes: &str,
  ) -> Result<Relation, MockError> {
    self.create_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_create {
      return Err(MockError("create"));
    }
    let relation = Relation {
      id:      format!("rel-{card_id}"),
      card_id: card_id.to_owned(),
      notes:   (!notes.is_empty()).then(|| notes.to_owned()),
    };
    self.relations.lock().unwrap().push(relation.clone());
    Ok(relation)
  }

  async fn delete_relation(
    &self,
    _token: &str,
    relation_id: &str,
  ) -> Result<(), MockError> {
    self.delete_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_delete {
      return Err(MockError("delete"));
    }
    self
      .relations
      .lock()
      .unwrap()
      .retain(|r| r.id != relation_id);
    Ok(())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn card(id: &str) -> Card {
  Card {
    id:             id.to_owned(),
    name:           format!("Card {id}"),
    owner_name:     "Someone Else".to_owned(),
    owner_category: OwnerCategory::Individual,
    matriculation:  None,
    owner_id:       None,
    is_active:      true,
    is_mine:        false,
    is_in_rolodex:  false,
  }
}

fn owned_card(id: &str, owner_id: &str) -> Card {
  let mut c = card(id);
  c.owner_id = Some(owner_id.to_owned());
  c
}

fn relation(id: &str, card_id: &str) -> Relation {
  Relation {
    id:      id.to_owned(),
    card_id: card_id.to_owned(),
    notes:   None,
  }
}

fn user() -> CurrentUser {
  CurrentUser {
    id:       "user-1".to_owned(),
    name:     "Alice Martin".to_owned(),
    category: OwnerCategory::School,
  }
}

fn authed() -> Session { Session::new(Some("token-abc".into()), user()) }

fn anonymous() -> Session { Session::new(None, user()) }

fn ids(cards: &[Card]) -> Vec<&str> {
  cards.iter().map(|c| c.id.as_str()).collect()
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

#[test]
fn merge_keeps_every_public_id_once_and_appends_new_personal() {
  let public = vec![card("a"), card("b")];
  let personal = vec![
    card("b"), // duplicate of a public card: dropped
    card("c"), // new and active: appended
    {
      let mut d = card("d"); // inactive: dropped
      d.is_active = false;
      d
    },
  ];

  let merged = merge_personal(public, personal, &user());
  assert_eq!(ids(&merged), ["a", "b", "c"]);
}

#[test]
fn merged_personal_cards_carry_the_user_identity() {
  let merged =
    merge_personal(vec![card("a")], vec![card("c")], &user());

  let c = merged.iter().find(|c| c.id == "c").unwrap();
  assert!(c.is_mine);
  assert_eq!(c.owner_name, "Alice Martin");
  assert_eq!(c.owner_category, OwnerCategory::School);
}

#[test]
fn is_mine_requires_a_nonempty_owner_id_match() {
  let public = vec![
    owned_card("a", "user-1"),
    owned_card("b", "user-2"),
    owned_card("c", ""),
    card("d"), // no owner id at all
  ];

  let merged = merge_personal(public, Vec::new(), &user());
  let mine: Vec<&str> = merged
    .iter()
    .filter(|c| c.is_mine)
    .map(|c| c.id.as_str())
    .collect();
  assert_eq!(mine, ["a"]);
}

#[test]
fn rolodex_flags_are_replaced_not_accumulated() {
  let mut cards = vec![card("a"), card("b")];
  // Stale state: both flagged.
  cards[0].is_in_rolodex = true;
  cards[1].is_in_rolodex = true;

  apply_rolodex(&mut cards, &[relation("r1", "b")]);

  assert!(!cards[0].is_in_rolodex);
  assert!(cards[1].is_in_rolodex);
}

#[tokio::test]
async fn load_unauthenticated_uses_public_list_only() {
  let source = MockSource {
    public: vec![card("a"), card("b")],
    personal: vec![card("c")],
    ..Default::default()
  };

  let cards = load_directory(&source, &anonymous()).await.unwrap();
  assert_eq!(ids(&cards), ["a", "b"]);
  assert_eq!(source.relation_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn load_merges_and_flags_when_authenticated() {
  let source = MockSource {
    public: vec![owned_card("a", "user-1"), card("b")],
    personal: vec![card("c")],
    relations: Mutex::new(vec![relation("r1", "b")]),
    ..Default::default()
  };

  let cards = load_directory(&source, &authed()).await.unwrap();
  assert_eq!(ids(&cards), ["a", "b", "c"]);

  let by_id = |id: &str| cards.iter().find(|c| c.id == id).unwrap();
  assert!(by_id("a").is_mine);
  assert!(!by_id("b").is_mine);
  assert!(by_id("c").is_mine);
  assert!(by_id("b").is_in_rolodex);
  assert!(!by_id("a").is_in_rolodex);
}

#[tokio::test]
async fn personal_fetch_failure_degrades_silently() {
  let source = MockSource {
    public: vec![card("a")],
    personal: vec![card("c")],
    fail_personal: true,
    ..Default::default()
  };

  let cards = load_directory(&source, &authed()).await.unwrap();
  assert_eq!(ids(&cards), ["a"]);
}

#[tokio::test]
async fn relation_fetch_failure_degrades_silently() {
  let source = MockSource {
    public: vec![card("a")],
    relations: Mutex::new(vec![relation("r1", "a")]),
    fail_relations: true,
    ..Default::default()
  };

  let cards = load_directory(&source, &authed()).await.unwrap();
  assert!(cards.iter().all(|c| !c.is_in_rolodex));
}

#[tokio::test]
async fn public_fetch_failure_is_hard() {
  let source = MockSource { fail_public: true, ..Default::default() };
  let err = load_directory(&source, &authed()).await.unwrap_err();
  assert!(matches!(err, Error::Source(_)));
}

// ─── Filtering ───────────────────────────────────────────────────────────────

fn sample_cards() -> Vec<Card> {
  let mut a = card("a");
  a.name = "Boulangerie Dupont".into();
  a.owner_name = "Jean Dupont".into();
  a.owner_category = OwnerCategory::Individual;

  let mut b = card("b");
  b.name = "Lycée Pasteur".into();
  b.owner_name = "Académie".into();
  b.owner_category = OwnerCategory::School;
  b.matriculation = Some("MAT-4471".into());

  let mut c = card("c");
  c.name = "Mairie".into();
  c.owner_name = "Commune".into();
  c.owner_category = OwnerCategory::Institution;

  vec![a, b, c]
}

#[test]
fn empty_query_and_all_categories_returns_everything_in_order() {
  let cards = sample_cards();
  let filter = DirectoryFilter::default();
  assert!(filter.is_neutral());

  let visible = filter.apply(&cards);
  assert_eq!(visible.len(), cards.len());
  let visible_ids: Vec<&str> =
    visible.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(visible_ids, ids(&cards));
}

#[test]
fn whitespace_only_query_matches_vacuously() {
  let cards = sample_cards();
  let filter = DirectoryFilter { query: "   ".into(), category: None };
  assert_eq!(filter.apply(&cards).len(), cards.len());
}

#[test]
fn text_match_is_case_insensitive_and_trimmed() {
  let cards = sample_cards();
  let filter =
    DirectoryFilter { query: "  DUPONT ".into(), category: None };

  let visible = filter.apply(&cards);
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, "a");
}

#[test]
fn text_match_covers_the_matriculation_field() {
  let cards = sample_cards();
  let filter =
    DirectoryFilter { query: "mat-4471".into(), category: None };

  let visible = filter.apply(&cards);
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, "b");
}

#[test]
fn category_filter_requires_exact_equality() {
  let cards = sample_cards();
  let filter = DirectoryFilter {
    query:    String::new(),
    category: Some(OwnerCategory::School),
  };

  let visible = filter.apply(&cards);
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0].id, "b");
}

#[test]
fn both_rules_must_match() {
  let cards = sample_cards();
  let filter = DirectoryFilter {
    query:    "dupont".into(),
    category: Some(OwnerCategory::School),
  };
  assert!(filter.apply(&cards).is_empty());
}

#[test]
fn filtering_is_idempotent() {
  let cards = sample_cards();
  let filter = DirectoryFilter {
    query:    "a".into(),
    category: Some(OwnerCategory::School),
  };

  let once: Vec<Card> =
    filter.apply(&cards).into_iter().cloned().collect();
  let twice: Vec<Card> =
    filter.apply(&once).into_iter().cloned().collect();
  assert_eq!(ids(&once), ids(&twice));
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_creates_relation_then_flips_flag() {
  let source = MockSource::default();
  let mut cards = vec![card("a")];

  let outcome = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap();

  assert_eq!(outcome, ToggleOutcome::Added);
  assert!(cards[0].is_in_rolodex);
  assert_eq!(source.create_calls.load(Ordering::SeqCst), 1);
  assert_eq!(source.delete_calls.load(Ordering::SeqCst), 0);
  assert_eq!(source.relations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn toggle_removal_looks_up_the_relation_id_then_deletes() {
  let source = MockSource {
    relations: Mutex::new(vec![relation("r9", "a")]),
    ..Default::default()
  };
  let mut cards = vec![card("a")];
  cards[0].is_in_rolodex = true;

  let outcome = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap();

  assert_eq!(outcome, ToggleOutcome::Removed);
  assert!(!cards[0].is_in_rolodex);
  assert_eq!(source.relation_fetches.load(Ordering::SeqCst), 1);
  assert_eq!(source.delete_calls.load(Ordering::SeqCst), 1);
  assert!(source.relations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_own_card_is_rejected_without_any_network_call() {
  let source = MockSource::default();
  let mut cards = vec![card("a")];
  cards[0].is_mine = true;

  let err = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::OwnCard));
  assert!(!cards[0].is_in_rolodex);
  assert_eq!(source.create_calls.load(Ordering::SeqCst), 0);
  assert_eq!(source.delete_calls.load(Ordering::SeqCst), 0);
  assert_eq!(source.relation_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn toggle_without_token_is_rejected_without_any_network_call() {
  let source = MockSource::default();
  let mut cards = vec![card("a")];

  let err = toggle_rolodex(&source, &anonymous(), &mut cards, "a")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::LoginRequired));
  assert!(!cards[0].is_in_rolodex);
  assert_eq!(source.create_calls.load(Ordering::SeqCst), 0);
  assert_eq!(source.relation_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn toggle_consistency_miss_is_a_silent_noop() {
  // Flag says tracked, but the remote relation list has no match.
  let source = MockSource::default();
  let mut cards = vec![card("a")];
  cards[0].is_in_rolodex = true;

  let outcome = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap();

  assert_eq!(outcome, ToggleOutcome::AlreadyAbsent);
  assert!(cards[0].is_in_rolodex);
  assert_eq!(source.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_failure_surfaces_and_leaves_flag_unset() {
  let source = MockSource { fail_create: true, ..Default::default() };
  let mut cards = vec![card("a")];

  let err = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Source(_)));
  assert!(!cards[0].is_in_rolodex);
}

#[tokio::test]
async fn delete_failure_surfaces_and_leaves_flag_set() {
  let source = MockSource {
    relations: Mutex::new(vec![relation("r9", "a")]),
    fail_delete: true,
    ..Default::default()
  };
  let mut cards = vec![card("a")];
  cards[0].is_in_rolodex = true;

  let err = toggle_rolodex(&source, &authed(), &mut cards, "a")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Source(_)));
  assert!(cards[0].is_in_rolodex);
}

#[tokio::test]
async fn toggle_touches_only_the_target_card() {
  let source = MockSource::default();
  let mut cards = vec![card("a"), card("b")];

  toggle_rolodex(&source, &authed(), &mut cards, "b")
    .await
    .unwrap();

  assert!(!cards[0].is_in_rolodex);
  assert!(cards[1].is_in_rolodex);
}

#[tokio::test]
async fn toggle_unknown_card_errors() {
  let source = MockSource::default();
  let mut cards = vec![card("a")];

  let err = toggle_rolodex(&source, &authed(), &mut cards, "zzz")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CardNotFound(_)));
}
