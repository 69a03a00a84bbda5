//! [`HttpDirectory`] — the reqwest implementation of [`DirectorySource`].

use std::time::Duration;

use annuaire_core::{
  card::{Card, CardDetail},
  relation::Relation,
  source::DirectorySource,
};
use reqwest::{Client, RequestBuilder, Response};

use crate::{
  Error, Result,
  wire::{
    CardPayload, CardsEnvelope, ContactEnvelope, ContactPayload,
    ContactsEnvelope, CreateContactBody, DetailEnvelope,
  },
};

/// Async HTTP client for the annuaire JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
  client:   Client,
  base_url: String,
}

impl HttpDirectory {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client =
      Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Attach a bearer token when one is supplied.
  fn bearer(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
      Some(t) => req.bearer_auth(t),
      None => req,
    }
  }

  /// Translate non-2xx statuses into [`Error::Status`].
  fn check(resp: Response, path: &str) -> Result<Response> {
    if resp.status().is_success() {
      Ok(resp)
    } else {
      Err(Error::Status {
        status: resp.status().as_u16(),
        path:   path.to_owned(),
      })
    }
  }
}

impl DirectorySource for HttpDirectory {
  type Error = Error;

  /// `GET /cards` — the public directory.
  async fn fetch_public_cards(&self) -> Result<Vec<Card>> {
    let path = "/cards";
    tracing::debug!(path, "GET");
    let resp = self.client.get(self.url(path)).send().await?;
    let envelope: CardsEnvelope = Self::check(resp, path)?.json().await?;
    Ok(envelope.cards.into_iter().map(CardPayload::into_card).collect())
  }

  /// `GET /me/cards` — the caller's own cards.
  async fn fetch_personal_cards(&self, token: &str) -> Result<Vec<Card>> {
    let path = "/me/cards";
    tracing::debug!(path, "GET");
    let resp = Self::bearer(self.client.get(self.url(path)), Some(token))
      .send()
      .await?;
    let envelope: CardsEnvelope = Self::check(resp, path)?.json().await?;
    Ok(envelope.cards.into_iter().map(CardPayload::into_card).collect())
  }

  /// `GET /cards/{id}` — detail view; contact info requires a token.
  async fn fetch_card_detail(
    &self,
    card_id: &str,
    token: Option<&str>,
  ) -> Result<CardDetail> {
    let path = format!("/cards/{card_id}");
    tracing::debug!(path = %path, "GET");
    let resp = Self::bearer(self.client.get(self.url(&path)), token)
      .send()
      .await?;
    let envelope: DetailEnvelope = Self::check(resp, &path)?.json().await?;
    Ok(envelope.into_detail())
  }

  /// `GET /rolodex` — the caller's relation list.
  async fn fetch_relations(&self, token: &str) -> Result<Vec<Relation>> {
    let path = "/rolodex";
    tracing::debug!(path, "GET");
    let resp = Self::bearer(self.client.get(self.url(path)), Some(token))
      .send()
      .await?;
    let envelope: ContactsEnvelope =
      Self::check(resp, path)?.json().await?;
    Ok(
      envelope
        .contacts
        .into_iter()
        .map(ContactPayload::into_relation)
        .collect(),
    )
  }

  /// `POST /rolodex` with `{cardId, notes}`.
  async fn create_relation(
    &self,
    token: &str,
    card_id: &str,
    notes: &str,
  ) -> Result<Relation> {
    let path = "/rolodex";
    tracing::debug!(path, card_id, "POST");
    let resp = Self::bearer(self.client.post(self.url(path)), Some(token))
      .json(&CreateContactBody { card_id, notes })
      .send()
      .await?;
    let envelope: ContactEnvelope = Self::check(resp, path)?.json().await?;
    Ok(envelope.contact.into_relation())
  }

  /// `DELETE /rolodex/{id}` — targets the relation's own id.
  async fn delete_relation(
    &self,
    token: &str,
    relation_id: &str,
  ) -> Result<()> {
    let path = format!("/rolodex/{relation_id}");
    tracing::debug!(path = %path, "DELETE");
    let resp = Self::bearer(self.client.delete(self.url(&path)), Some(token))
      .send()
      .await?;
    Self::check(resp, &path)?;
    Ok(())
  }
}
