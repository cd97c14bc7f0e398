//! IGDB catalog client - Twitch OAuth and game search
//!
//! Blocking HTTP via `ureq`. The bearer token lives in an explicit
//! [`TokenSession`] whose expiry is checked against a caller-supplied
//! instant, so tests never have to wait a validity window out.

use chrono::{DateTime, Datelike};
use serde::Deserialize;
use std::time::{Duration, SystemTime};
use thiserror::Error;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const GAMES_URL: &str = "https://api.igdb.com/v4/games";

// Apicalypse filter values: main games only, on the fixed PC platform.
const MAIN_GAME_CATEGORY: u32 = 0;
const PC_PLATFORM: u32 = 6;
const SEARCH_LIMIT: usize = 15;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Authentication was rejected. Fatal for the run.
    #[error("catalog authentication failed: {0}")]
    Auth(String),
    /// A single search attempt failed. The caller may try another query.
    #[error("catalog search failed: {0}")]
    Search(String),
}

/// A bearer token together with its validity window.
#[derive(Debug, Clone)]
pub struct TokenSession {
    access_token: String,
    expires_at: SystemTime,
}

impl TokenSession {
    pub fn new(access_token: String, expires_at: SystemTime) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    /// Whether the session is still usable at `now`.
    pub fn is_valid(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// A search hit considered as a possible identity for a folder.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub release_year: Option<i32>,
    /// The record references a version parent, i.e. it is a re-release of
    /// an original entry. Display-only annotation, never a filter.
    pub remake: bool,
}

impl Candidate {
    /// Year label as shown to the operator; undated records are "TBA".
    pub fn year_label(&self) -> String {
        match self.release_year {
            Some(year) => year.to_string(),
            None => "TBA".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct GameRecord {
    name: String,
    #[serde(default)]
    first_release_date: Option<i64>,
    #[serde(default)]
    version_parent: Option<u64>,
}

impl From<GameRecord> for Candidate {
    fn from(record: GameRecord) -> Self {
        Candidate {
            name: record.name,
            release_year: release_year(record.first_release_date),
            remake: record.version_parent.is_some(),
        }
    }
}

/// Convert a Unix release timestamp to a UTC year.
fn release_year(timestamp: Option<i64>) -> Option<i32> {
    DateTime::from_timestamp(timestamp?, 0).map(|date| date.year())
}

/// Search seam between the folder processor and the live client, so tests
/// can drive processing with scripted catalogs.
pub trait SearchCatalog {
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>, CatalogError>;
}

/// IGDB client holding Twitch credentials and the current token session.
pub struct CatalogClient {
    agent: ureq::Agent,
    client_id: String,
    client_secret: String,
    session: Option<TokenSession>,
}

impl CatalogClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            agent,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            session: None,
        }
    }

    /// Exchange client credentials for a fresh token session.
    fn authenticate(&self, now: SystemTime) -> Result<TokenSession, CatalogError> {
        let response = self
            .agent
            .post(TOKEN_URL)
            .send_form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .map_err(|err| CatalogError::Auth(err.to_string()))?;
        let auth: AuthResponse = response
            .into_json()
            .map_err(|err| CatalogError::Auth(format!("malformed token response: {err}")))?;
        Ok(TokenSession::new(
            auth.access_token,
            now + Duration::from_secs(auth.expires_in),
        ))
    }

    /// Return a bearer header value, re-authenticating only when no session
    /// is held or the held one has expired relative to `now`.
    fn bearer_token(&mut self, now: SystemTime) -> Result<String, CatalogError> {
        if let Some(session) = &self.session
            && session.is_valid(now)
        {
            return Ok(session.bearer());
        }
        let session = self.authenticate(now)?;
        let bearer = session.bearer();
        self.session = Some(session);
        Ok(bearer)
    }

    fn search_at(&mut self, query: &str, now: SystemTime) -> Result<Vec<Candidate>, CatalogError> {
        let bearer = self.bearer_token(now)?;
        let body = search_body(query);
        let response = self
            .agent
            .post(GAMES_URL)
            .set("Client-ID", &self.client_id)
            .set("Authorization", &bearer)
            .set("Accept", "application/json")
            .send_string(&body)
            .map_err(|err| CatalogError::Search(err.to_string()))?;
        let records: Vec<GameRecord> = response
            .into_json()
            .map_err(|err| CatalogError::Search(format!("malformed search response: {err}")))?;
        Ok(records.into_iter().map(Candidate::from).collect())
    }
}

impl SearchCatalog for CatalogClient {
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>, CatalogError> {
        self.search_at(query, SystemTime::now())
    }
}

/// Build the Apicalypse request body for a search query.
fn search_body(query: &str) -> String {
    format!(
        "search \"{}\"; fields name, first_release_date, version_parent; \
         where category = {MAIN_GAME_CATEGORY} & platforms = ({PC_PLATFORM}); \
         limit {SEARCH_LIMIT};",
        escape_query(query)
    )
}

fn escape_query(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}
