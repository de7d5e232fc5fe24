//! Catalog client — the remote record store's three endpoints.
//!
//! The service stores published pieces as flat JSON records; this client
//! lists them, publishes a piece (words travel share-encoded in the `code`
//! field), and bumps a view counter. Feature-gated: built only with
//! `--features catalog`.

use serde::Deserialize;
use std::fmt;

use super::Piece;
use crate::share;

/// A published record as the catalog returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub composer: String,
    pub description: String,
    /// Share-encoded word list.
    pub code: String,
    /// Hex theme color.
    pub hex: String,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub date: String,
}

impl CatalogEntry {
    /// Decode the record's words.
    pub fn words(&self) -> Result<Vec<String>, share::ShareError> {
        share::decode(&self.code)
    }
}

/// Catalog client errors.
#[derive(Debug)]
pub enum CatalogError {
    Http(reqwest::Error),
    Status(u16),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Http(e) => write!(f, "catalog request failed: {e}"),
            CatalogError::Status(code) => write!(f, "catalog returned status {code}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Http(e)
    }
}

/// Blocking client for one catalog service.
pub struct CatalogClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl CatalogClient {
    /// Client for the service at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, CatalogError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(CatalogError::Status(response.status().as_u16()))
        }
    }

    /// List all published pieces.
    pub fn list(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/api/systems", self.base_url))
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    /// Publish a piece. The word list is share-encoded into the `code`
    /// field; the service fills in id, clicks, and date.
    pub fn publish(&self, piece: &Piece) -> Result<CatalogEntry, CatalogError> {
        let body = serde_json::json!({
            "name": piece.name,
            "composer": piece.composer,
            "desc": piece.description,
            "code": share::encode(&piece.words),
            "hex": piece.theme,
        });
        let response = self
            .http
            .post(format!("{}/api/publish", self.base_url))
            .json(&body)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    /// Record one view of a published piece.
    pub fn click(&self, id: u64) -> Result<CatalogEntry, CatalogError> {
        let response = self
            .http
            .post(format!("{}/api/click/{id}", self.base_url))
            .send()?;
        Ok(Self::check(response)?.json()?)
    }
}
