//! Stateless request builder and response parser for the TVmaze API.
//!
//! # Design
//! `TvMazeClient` holds only a `base_url` and carries no mutable state
//! between calls. Every endpoint has a `build_*` method producing a GET
//! `HttpRequest`; every response goes through the single `parse_json`.
//! The host executes the HTTP round-trip in between.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::Query;
use crate::types::LookupSource;

/// Root of the public TVmaze API.
pub const DEFAULT_BASE_URL: &str = "http://api.tvmaze.com";

#[derive(Debug, Clone)]
pub struct TvMazeClient {
    base_url: String,
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TvMazeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str, query: Query) -> HttpRequest {
        HttpRequest::get(format!("{}{path}{query}", self.base_url))
    }

    /// `/search/shows?q={query}`
    pub fn build_show_search(&self, query: &str) -> HttpRequest {
        self.get("/search/shows", Query::new().encoded("q", query))
    }

    /// `/singlesearch/shows?q={query}`
    pub fn build_single_search(&self, query: &str) -> HttpRequest {
        self.get("/singlesearch/shows", Query::new().encoded("q", query))
    }

    /// `/lookup/shows?{source}={id}`
    pub fn build_show_lookup(&self, id: u64, source: LookupSource) -> HttpRequest {
        self.get("/lookup/shows", Query::new().param(source.as_str(), id))
    }

    /// `/search/people?q={query}`
    pub fn build_people_search(&self, query: &str) -> HttpRequest {
        self.get("/search/people", Query::new().encoded("q", query))
    }

    /// `/schedule`, with `country` and `date` added when given and non-empty.
    /// The service defaults to the US and today.
    pub fn build_schedule(&self, country_code: Option<&str>, date: Option<&str>) -> HttpRequest {
        let query = Query::new().opt("country", country_code).opt("date", date);
        self.get("/schedule", query)
    }

    pub fn build_full_schedule(&self) -> HttpRequest {
        self.get("/schedule/full", Query::new())
    }

    pub fn build_shows(&self, id: u64) -> HttpRequest {
        self.get(&format!("/shows/{id}"), Query::new())
    }

    pub fn build_show_episode_list(&self, id: u64, specials: bool) -> HttpRequest {
        let query = Query::new().flag("specials", "1", specials);
        self.get(&format!("/shows/{id}/episodes"), query)
    }

    pub fn build_episode_by_number(&self, id: u64, season: u32, episode: u32) -> HttpRequest {
        let query = Query::new().param("season", season).param("number", episode);
        self.get(&format!("/shows/{id}/episodebynumber"), query)
    }

    pub fn build_episode_by_date(&self, id: u64, date: &str) -> HttpRequest {
        self.get(&format!("/shows/{id}/episodesbydate"), Query::new().param("date", date))
    }

    pub fn build_show_cast(&self, id: u64) -> HttpRequest {
        self.get(&format!("/shows/{id}/cast"), Query::new())
    }

    pub fn build_show_akas(&self, id: u64) -> HttpRequest {
        self.get(&format!("/shows/{id}/akas"), Query::new())
    }

    /// One page (up to 250 shows, paginated by show id) of the show index.
    pub fn build_show_index(&self, page: u32) -> HttpRequest {
        self.get("/shows", Query::new().param("page", page))
    }

    pub fn build_person_info(&self, id: u64, embed: bool) -> HttpRequest {
        let query = Query::new().flag("embed", "castcredits", embed);
        self.get(&format!("/people/{id}"), query)
    }

    pub fn build_person_cast_credits(&self, id: u64, embed: bool) -> HttpRequest {
        let query = Query::new().flag("embed", "show", embed);
        self.get(&format!("/people/{id}/castcredits"), query)
    }

    pub fn build_person_crew_credits(&self, id: u64, embed: bool) -> HttpRequest {
        let query = Query::new().flag("embed", "show", embed);
        self.get(&format!("/people/{id}/crewcredits"), query)
    }

    pub fn build_show_updates(&self) -> HttpRequest {
        self.get("/updates/shows", Query::new())
    }

    /// Decode a response body as JSON, returned unmodified. A 200 whose body
    /// is empty or not JSON resolves to `Value::Null`.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).unwrap_or(Value::Null))
    }

    /// Decode a response body into a caller-chosen type. Unlike `parse_json`,
    /// a body that does not decode is an `ApiError::Deserialization`.
    pub fn parse_json_as<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Anything but exactly 200 is an error carrying the status text.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        status_text: response.status_text(),
    })
}
