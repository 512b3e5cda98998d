//! The endpoint catalog as async methods.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tvmaze_core::{ApiError, HttpRequest, LookupSource, TvMazeClient};

use crate::transport::{ReqwestTransport, Transport};

/// Async TVmaze client.
///
/// Every endpoint method issues exactly one GET and resolves to the
/// response body as JSON, unmodified. A status other than 200 fails with
/// `ApiError::Http` (displayed as the status text); a call that never got a
/// response fails with `ApiError::Network` (displayed as "Network Error").
#[derive(Debug, Clone)]
pub struct TvMaze<T = ReqwestTransport> {
    core: TvMazeClient,
    transport: T,
}

impl TvMaze {
    /// Client for the public API at `DEFAULT_BASE_URL`.
    pub fn new() -> Self {
        Self::with_transport(TvMazeClient::default(), ReqwestTransport::default())
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(TvMazeClient::new(base_url), ReqwestTransport::default())
    }
}

impl Default for TvMaze {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> TvMaze<T> {
    pub fn with_transport(core: TvMazeClient, transport: T) -> Self {
        Self { core, transport }
    }

    /// The request builder, for callers that want the raw `HttpRequest`.
    pub fn core(&self) -> &TvMazeClient {
        &self.core
    }

    /// GET an absolute URL and decode the body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.send(HttpRequest::get(url.to_string())).await
    }

    /// GET an absolute URL and decode the body into `D`.
    pub async fn get_json_as<D: DeserializeOwned>(&self, url: &str) -> Result<D, ApiError> {
        self.send_as(HttpRequest::get(url.to_string())).await
    }

    pub async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        self.send_as(request).await
    }

    pub async fn send_as<D: DeserializeOwned>(&self, request: HttpRequest) -> Result<D, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(source) => {
                debug!(error = %source, "no response");
                return Err(ApiError::Network { source });
            }
        };
        debug!(status = response.status, "received response");
        self.core.parse_json_as(response)
    }

    /// Shows whose name matches `query`, with relevance scores.
    pub async fn show_search(&self, query: &str) -> Result<Value, ApiError> {
        self.send(self.core.build_show_search(query)).await
    }

    /// The single best match for `query`.
    pub async fn single_search(&self, query: &str) -> Result<Value, ApiError> {
        self.send(self.core.build_single_search(query)).await
    }

    /// A show by its TVRage or TheTVDB id.
    pub async fn show_lookup(&self, id: u64, source: LookupSource) -> Result<Value, ApiError> {
        self.send(self.core.build_show_lookup(id, source)).await
    }

    pub async fn people_search(&self, query: &str) -> Result<Value, ApiError> {
        self.send(self.core.build_people_search(query)).await
    }

    /// Episodes airing in `country_code` (ISO 3166-1, default US) on `date`
    /// (ISO 8601, default today).
    pub async fn schedule(&self, country_code: Option<&str>, date: Option<&str>) -> Result<Value, ApiError> {
        self.send(self.core.build_schedule(country_code, date)).await
    }

    /// Every future episode known to TVmaze, regardless of country.
    pub async fn full_schedule(&self) -> Result<Value, ApiError> {
        self.send(self.core.build_full_schedule()).await
    }

    pub async fn shows(&self, id: u64) -> Result<Value, ApiError> {
        self.send(self.core.build_shows(id)).await
    }

    pub async fn show_episode_list(&self, id: u64, specials: bool) -> Result<Value, ApiError> {
        self.send(self.core.build_show_episode_list(id, specials)).await
    }

    pub async fn episode_by_number(&self, id: u64, season: u32, episode: u32) -> Result<Value, ApiError> {
        self.send(self.core.build_episode_by_number(id, season, episode)).await
    }

    pub async fn episode_by_date(&self, id: u64, date: &str) -> Result<Value, ApiError> {
        self.send(self.core.build_episode_by_date(id, date)).await
    }

    pub async fn show_cast(&self, id: u64) -> Result<Value, ApiError> {
        self.send(self.core.build_show_cast(id)).await
    }

    pub async fn show_akas(&self, id: u64) -> Result<Value, ApiError> {
        self.send(self.core.build_show_akas(id)).await
    }

    /// One page of the full show index, up to 250 shows ordered by id.
    pub async fn show_index(&self, page: u32) -> Result<Value, ApiError> {
        self.send(self.core.build_show_index(page)).await
    }

    /// A person; with `embed`, their cast credits are included.
    pub async fn person_info(&self, id: u64, embed: bool) -> Result<Value, ApiError> {
        self.send(self.core.build_person_info(id, embed)).await
    }

    /// Show-level cast credits; with `embed`, full show information too.
    pub async fn person_cast_credits(&self, id: u64, embed: bool) -> Result<Value, ApiError> {
        self.send(self.core.build_person_cast_credits(id, embed)).await
    }

    pub async fn person_crew_credits(&self, id: u64, embed: bool) -> Result<Value, ApiError> {
        self.send(self.core.build_person_crew_credits(id, embed)).await
    }

    /// Every show id mapped to the timestamp of its last update.
    pub async fn show_updates(&self) -> Result<Value, ApiError> {
        self.send(self.core.build_show_updates()).await
    }
}
