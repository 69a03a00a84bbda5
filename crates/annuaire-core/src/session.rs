//! Session — the caller's identity and authentication state.
//!
//! The token is read from outside (config file, flag, environment); this
//! crate never produces or refreshes it. Token presence is the sole
//! authentication signal the directory logic looks at.

use serde::{Deserialize, Serialize};

use crate::card::OwnerCategory;

/// The current user's identity, used to annotate ownership and to stamp
/// merged personal cards with owner attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
  pub id:       String,
  pub name:     String,
  pub category: OwnerCategory,
}

/// Authentication state plus identity for one user session.
#[derive(Debug, Clone)]
pub struct Session {
  token: Option<String>,
  user:  CurrentUser,
}

impl Session {
  pub fn new(token: Option<String>, user: CurrentUser) -> Self {
    // An empty token string is treated as absent.
    let token = token.filter(|t| !t.trim().is_empty());
    Self { token, user }
  }

  pub fn is_authenticated(&self) -> bool { self.token.is_some() }

  pub fn token(&self) -> Option<&str> { self.token.as_deref() }

  pub fn user(&self) -> &CurrentUser { &self.user }
}
