//! Application state machine and event dispatcher.

use std::sync::Arc;

use annuaire_client::HttpDirectory;
use annuaire_core::{
  Error, aggregate,
  card::{Card, CardDetail, OwnerCategory},
  filter::DirectoryFilter,
  session::Session,
  source::DirectorySource,
  toggle::{ToggleOutcome, toggle_rolodex},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the directory list; right pane is empty or shows a detail.
  DirectoryList,
  /// Focus on the card detail pane.
  CardDetail,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// The aggregated, annotated card list.
  pub cards: Vec<Card>,

  /// Current filter state (free-text query + category selector).
  pub filter: DirectoryFilter,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *visible* (filtered) list.
  pub list_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: usize,

  /// Detail payload for the currently-opened card, if any.
  pub detail: Option<CardDetail>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Monotonically increasing load counter. Only the response belonging to
  /// the most recent load is allowed to commit to the visible list.
  load_generation: u64,

  /// The caller's identity and token.
  pub session: Session,

  /// Shared HTTP source.
  pub source: Arc<HttpDirectory>,
}

impl App {
  /// Create an [`App`] with an empty card list.
  pub fn new(source: HttpDirectory, session: Session) -> Self {
    Self {
      screen: Screen::DirectoryList,
      cards: Vec::new(),
      filter: DirectoryFilter::default(),
      filter_active: false,
      list_cursor: 0,
      detail_scroll: 0,
      detail: None,
      status_msg: String::new(),
      load_generation: 0,
      session,
      source: Arc::new(source),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Run the full aggregation load and commit the result, unless a newer
  /// load started in the meantime. A hard failure empties the list and
  /// surfaces the error in the status bar; the interface stays up.
  pub async fn load_directory(&mut self) {
    self.status_msg = "Loading directory…".into();
    self.load_generation += 1;
    let generation = self.load_generation;

    let result =
      aggregate::load_directory(self.source.as_ref(), &self.session).await;

    if generation != self.load_generation {
      // A newer load superseded this one; drop the stale response.
      return;
    }

    match result {
      Ok(cards) => {
        self.cards = cards;
        self.list_cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => {
        self.cards.clear();
        self.list_cursor = 0;
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  /// Open the detail screen for `card_id`. The derived flags shown in the
  /// detail come from the aggregated list, never from the wire.
  async fn open_detail(&mut self, card_id: String) {
    self.status_msg = "Loading…".into();
    match self
      .source
      .fetch_card_detail(&card_id, self.session.token())
      .await
    {
      Ok(mut detail) => {
        if let Some(card) = self.cards.iter().find(|c| c.id == card_id) {
          detail.card.is_mine = card.is_mine;
          detail.card.is_in_rolodex = card.is_in_rolodex;
        }
        self.detail = Some(detail);
        self.detail_scroll = 0;
        self.screen = Screen::CardDetail;
        self.status_msg.clear();
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  /// Toggle the rolodex membership of `card_id` and reflect the result in
  /// the status bar per the error taxonomy: rejections are informational,
  /// transport failures are errors, consistency-misses are silent.
  async fn toggle_card(&mut self, card_id: String) {
    let result = toggle_rolodex(
      self.source.as_ref(),
      &self.session,
      &mut self.cards,
      &card_id,
    )
    .await;

    match result {
      Ok(ToggleOutcome::Added) => {
        self.status_msg = "Added to rolodex.".into();
      }
      Ok(ToggleOutcome::Removed) => {
        self.status_msg = "Removed from rolodex.".into();
      }
      Ok(ToggleOutcome::AlreadyAbsent) => {}
      Err(e @ (Error::OwnCard | Error::LoginRequired)) => {
        self.status_msg = e.to_string();
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
      }
    }

    // Keep an open detail pane consistent with the list.
    if let Some(detail) = &mut self.detail
      && let Some(card) = self.cards.iter().find(|c| c.id == detail.card.id)
    {
      detail.card.is_mine = card.is_mine;
      detail.card.is_in_rolodex = card.is_in_rolodex;
    }
  }

  // ── Visible list ──────────────────────────────────────────────────────────

  /// Cards matching the current filter, in aggregation order.
  pub fn visible_cards(&self) -> Vec<&Card> { self.filter.apply(&self.cards) }

  /// The card under the list cursor in the visible list, if any.
  pub fn cursor_card(&self) -> Option<&Card> {
    let list = self.visible_cards();
    list.get(self.list_cursor).copied()
  }

  /// Advance the category selector: all → institution → school →
  /// individual → all.
  fn cycle_category(&mut self) {
    use OwnerCategory::*;
    self.filter.category = match self.filter.category {
      None => Some(Institution),
      Some(Institution) => Some(School),
      Some(School) => Some(Individual),
      Some(Individual) | Some(Other) => None,
    };
    self.list_cursor = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    // Filter input mode: all printable keys go into the query string.
    if self.filter_active {
      return Ok(self.handle_filter_key(key));
    }

    match self.screen {
      Screen::DirectoryList => self.handle_list_key(key).await,
      Screen::CardDetail => self.handle_detail_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.query.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.query.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.query.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    true
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_cards().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_card().map(|c| c.id.clone()) {
          self.open_detail(id).await;
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.query.clear();
        self.list_cursor = 0;
      }

      // Category selector
      KeyCode::Char('c') => self.cycle_category(),

      // Rolodex toggle on the card under the cursor
      KeyCode::Char('r') => {
        if let Some(id) = self.cursor_card().map(|c| c.id.clone()) {
          self.toggle_card(id).await;
        }
      }

      // Reload
      KeyCode::Char('R') => self.load_directory().await,

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::DirectoryList;
        self.detail = None;
        self.detail_scroll = 0;
      }

      // Scroll detail
      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      // Rolodex toggle on the opened card
      KeyCode::Char('r') => {
        if let Some(id) = self.detail.as_ref().map(|d| d.card.id.clone()) {
          self.toggle_card(id).await;
        }
      }

      _ => {}
    }
    Ok(true)
  }
}
