//! Public types for the catalog client.
//!
//! Response payloads stay opaque (`serde_json::Value`); only the request
//! bodies and the session token are typed here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask a secret for display: show first 4 and last 4 chars.
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let head: String = secret.chars().take(4).collect();
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}

/// Bearer token handed out by `POST /login`.
///
/// Held in memory only. `Debug` output is masked.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token. Empty strings are not tokens.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Pull the `token` field out of a login response.
    ///
    /// Returns `None` when the field is missing, not a string, or empty.
    pub fn from_login_response(body: &serde_json::Value) -> Option<Self> {
        body.get("token")
            .and_then(|t| t.as_str())
            .and_then(Self::new)
    }

    /// Raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken")
            .field(&mask_secret(&self.0))
            .finish()
    }
}

/// Body of `POST /register` and `POST /login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Full result of `POST /login`: the raw body plus the extracted token.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub body: serde_json::Value,
    pub token: Option<SessionToken>,
}

impl LoginResponse {
    pub fn from_body(body: serde_json::Value) -> Self {
        let token = SessionToken::from_login_response(&body);
        Self { body, token }
    }

    /// The body with a string `token` field masked, safe to log.
    pub fn redacted_body(&self) -> serde_json::Value {
        let mut body = self.body.clone();
        if let Some(token) = body.get_mut("token") {
            if let Some(raw) = token.as_str() {
                *token = serde_json::Value::String(mask_secret(raw));
            }
        }
        body
    }
}

/// Body of `PUT /books/review/{isbn}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub review: String,
}

/// Key for a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    Isbn(String),
    Author(String),
    Title(String),
}

impl SearchKey {
    /// Human-readable label, e.g. `author "J.K. Rowling"`.
    pub fn describe(&self) -> String {
        match self {
            Self::Isbn(isbn) => format!("ISBN {}", isbn),
            Self::Author(author) => format!("author \"{}\"", author),
            Self::Title(title) => format!("title \"{}\"", title),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
