use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Shows per page of `/shows?page=`.
pub const PAGE_SIZE: u64 = 250;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub name: String,
    pub genres: Vec<String>,
    pub country: String,
    pub externals: Externals,
    pub updated: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Externals {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(skip)]
    pub show_id: u64,
    pub name: String,
    pub season: u32,
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub airdate: String,
}

impl Episode {
    fn is_special(&self) -> bool {
        self.kind != "regular"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug)]
struct CastCredit {
    person_id: u64,
    show_id: u64,
    character: &'static str,
}

#[derive(Clone, Debug)]
struct CrewCredit {
    person_id: u64,
    show_id: u64,
    kind: &'static str,
}

#[derive(Clone, Debug)]
struct Aka {
    show_id: u64,
    name: &'static str,
    country: &'static str,
}

/// Read-only TVmaze data served by the mock.
#[derive(Debug)]
pub struct Catalog {
    shows: Vec<Show>,
    episodes: Vec<Episode>,
    people: Vec<Person>,
    cast: Vec<CastCredit>,
    crew: Vec<CrewCredit>,
    akas: Vec<Aka>,
}

fn show(id: u64, name: &str, genres: &[&str], country: &str, tvrage: u64, thetvdb: u64, updated: u64) -> Show {
    Show {
        id,
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        country: country.to_string(),
        externals: Externals {
            tvrage: Some(tvrage),
            thetvdb: Some(thetvdb),
        },
        updated,
    }
}

fn episode(id: u64, show_id: u64, season: u32, number: Option<u32>, name: &str, airdate: &str) -> Episode {
    Episode {
        id,
        show_id,
        name: name.to_string(),
        season,
        number,
        kind: (if number.is_some() { "regular" } else { "significant_special" }).to_string(),
        airdate: airdate.to_string(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let shows = vec![
            show(1, "Under the Dome", &["Drama", "Science-Fiction"], "US", 25988, 264492, 1631010933),
            show(82, "Game of Thrones", &["Drama", "Adventure", "Fantasy"], "US", 24493, 121361, 1638716563),
            show(335, "Sherlock", &["Drama", "Crime", "Mystery"], "GB", 23433, 176941, 1632143013),
            show(431, "Friends", &["Comedy", "Romance"], "US", 3616, 79168, 1636549516),
            show(527, "The Walking Dead", &["Drama", "Horror"], "US", 25056, 153021, 1639318451),
        ];
        let episodes = vec![
            episode(1, 1, 1, Some(1), "Pilot", "2013-06-24"),
            episode(2, 1, 1, Some(2), "The Fire", "2013-07-01"),
            episode(4952, 82, 1, Some(1), "Winter is Coming", "2011-04-17"),
            episode(4953, 82, 1, Some(2), "The Kingsroad", "2011-04-24"),
            episode(12192, 335, 1, Some(1), "A Study in Pink", "2010-07-25"),
            episode(12193, 335, 1, Some(2), "The Blind Banker", "2010-08-01"),
            episode(12200, 335, 3, None, "Many Happy Returns", "2013-12-24"),
            episode(40646, 431, 1, Some(1), "The One Where It All Began", "1994-09-22"),
            episode(40647, 431, 1, Some(2), "The One with the Sonogram at the End", "1994-09-29"),
            episode(40648, 527, 6, Some(8), "Start to Finish", "2015-11-29"),
        ];
        let people = vec![
            Person { id: 1, name: "Mike Vogel".to_string() },
            Person { id: 284, name: "Steven Moffat".to_string() },
            Person { id: 3358, name: "Benedict Cumberbatch".to_string() },
            Person { id: 10260, name: "Jennifer Aniston".to_string() },
            Person { id: 14599, name: "Andrew Lincoln".to_string() },
        ];
        let cast = vec![
            CastCredit { person_id: 1, show_id: 1, character: "Dale \"Barbie\" Barbara" },
            CastCredit { person_id: 3358, show_id: 335, character: "Sherlock Holmes" },
            CastCredit { person_id: 10260, show_id: 431, character: "Rachel Green" },
            CastCredit { person_id: 14599, show_id: 527, character: "Rick Grimes" },
        ];
        let crew = vec![
            CrewCredit { person_id: 284, show_id: 335, kind: "Creator" },
            CrewCredit { person_id: 284, show_id: 335, kind: "Executive Producer" },
        ];
        let akas = vec![
            Aka { show_id: 82, name: "Igra prestolov", country: "SI" },
            Aka { show_id: 82, name: "Le Trône de fer", country: "FR" },
        ];
        Self {
            shows,
            episodes,
            people,
            cast,
            crew,
            akas,
        }
    }
}

impl Catalog {
    fn show(&self, id: u64) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == id)
    }

    fn person(&self, id: u64) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    fn show_json(&self, id: u64) -> Value {
        self.show(id).map(|s| json!(s)).unwrap_or(Value::Null)
    }

    fn cast_credits(&self, person_id: u64, embed: bool) -> Vec<Value> {
        self.cast
            .iter()
            .filter(|c| c.person_id == person_id)
            .map(|c| self.credit_json(c.show_id, json!({ "character": { "name": c.character } }), embed))
            .collect()
    }

    fn crew_credits(&self, person_id: u64, embed: bool) -> Vec<Value> {
        self.crew
            .iter()
            .filter(|c| c.person_id == person_id)
            .map(|c| self.credit_json(c.show_id, json!({ "type": c.kind }), embed))
            .collect()
    }

    fn credit_json(&self, show_id: u64, mut credit: Value, embed: bool) -> Value {
        credit["_links"] = json!({ "show": { "href": format!("/shows/{show_id}") } });
        if embed {
            credit["_embedded"] = json!({ "show": self.show_json(show_id) });
        }
        credit
    }

    /// Episode with its show embedded, as schedule endpoints return it.
    fn scheduled(&self, episode: &Episode) -> Value {
        let mut value = json!(episode);
        value["show"] = self.show_json(episode.show_id);
        value
    }
}

/// Shared server state: the catalog plus a log of every request URI.
#[derive(Clone, Default)]
pub struct MockState {
    catalog: Arc<Catalog>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockState {
    /// Path and query of every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

type ApiResult = Result<Json<Value>, StatusCode>;

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/search/shows", get(search_shows))
        .route("/singlesearch/shows", get(single_search))
        .route("/lookup/shows", get(lookup_show))
        .route("/search/people", get(search_people))
        .route("/schedule", get(schedule))
        .route("/schedule/full", get(full_schedule))
        .route("/shows", get(show_index))
        .route("/shows/{id}", get(get_show))
        .route("/shows/{id}/episodes", get(episode_list))
        .route("/shows/{id}/episodebynumber", get(episode_by_number))
        .route("/shows/{id}/episodesbydate", get(episodes_by_date))
        .route("/shows/{id}/cast", get(show_cast))
        .route("/shows/{id}/akas", get(show_akas))
        .route("/people/{id}", get(get_person))
        .route("/people/{id}/castcredits", get(person_cast_credits))
        .route("/people/{id}/crewcredits", get(person_crew_credits))
        .route("/updates/shows", get(show_updates))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn record_request(State(state): State<MockState>, req: Request, next: Next) -> Response {
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    info!(%uri, "request");
    state.requests.write().await.push(uri);
    next.run(req).await
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct LookupParams {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
}

#[derive(Deserialize)]
pub struct ScheduleParams {
    pub country: Option<String>,
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct EpisodeListParams {
    pub specials: Option<u8>,
}

#[derive(Deserialize)]
pub struct EpisodeNumberParams {
    pub season: u32,
    pub number: u32,
}

#[derive(Deserialize)]
pub struct DateParams {
    pub date: String,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: u64,
}

#[derive(Deserialize)]
pub struct EmbedParams {
    pub embed: Option<String>,
}

/// Case-insensitive substring match; earlier, shorter names score higher.
fn score(name: &str, q: &str) -> Option<f64> {
    let name = name.to_lowercase();
    let q = q.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }
    name.find(&q).map(|pos| 1.0 / (1.0 + pos as f64 + (name.len() - q.len()) as f64 / 10.0))
}

async fn search_shows(State(state): State<MockState>, Query(params): Query<SearchParams>) -> Json<Vec<Value>> {
    let results = state
        .catalog
        .shows
        .iter()
        .filter_map(|s| score(&s.name, &params.q).map(|score| json!({ "score": score, "show": s })))
        .collect();
    Json(results)
}

async fn single_search(State(state): State<MockState>, Query(params): Query<SearchParams>) -> ApiResult {
    state
        .catalog
        .shows
        .iter()
        .find(|s| score(&s.name, &params.q).is_some())
        .map(|s| Json(json!(s)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn lookup_show(State(state): State<MockState>, Query(params): Query<LookupParams>) -> ApiResult {
    let found = state.catalog.shows.iter().find(|s| match (params.tvrage, params.thetvdb) {
        (Some(id), _) => s.externals.tvrage == Some(id),
        (None, Some(id)) => s.externals.thetvdb == Some(id),
        (None, None) => false,
    });
    found.map(|s| Json(json!(s))).ok_or(StatusCode::NOT_FOUND)
}

async fn search_people(State(state): State<MockState>, Query(params): Query<SearchParams>) -> Json<Vec<Value>> {
    let results = state
        .catalog
        .people
        .iter()
        .filter_map(|p| score(&p.name, &params.q).map(|score| json!({ "score": score, "person": p })))
        .collect();
    Json(results)
}

async fn schedule(State(state): State<MockState>, Query(params): Query<ScheduleParams>) -> Json<Vec<Value>> {
    let catalog = &state.catalog;
    let country = params.country.as_deref().unwrap_or("US");
    let results = catalog
        .episodes
        .iter()
        .filter(|e| catalog.show(e.show_id).is_some_and(|s| s.country == country))
        .filter(|e| params.date.as_deref().is_none_or(|date| e.airdate == date))
        .map(|e| catalog.scheduled(e))
        .collect();
    Json(results)
}

async fn full_schedule(State(state): State<MockState>) -> Json<Vec<Value>> {
    let catalog = &state.catalog;
    Json(catalog.episodes.iter().map(|e| catalog.scheduled(e)).collect())
}

async fn show_index(State(state): State<MockState>, Query(params): Query<PageParams>) -> ApiResult {
    let page: Vec<&Show> = state
        .catalog
        .shows
        .iter()
        .filter(|s| s.id / PAGE_SIZE == params.page)
        .collect();
    if page.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(page)))
}

async fn get_show(State(state): State<MockState>, Path(id): Path<u64>) -> ApiResult {
    state.catalog.show(id).map(|s| Json(json!(s))).ok_or(StatusCode::NOT_FOUND)
}

async fn episode_list(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<EpisodeListParams>,
) -> ApiResult {
    state.catalog.show(id).ok_or(StatusCode::NOT_FOUND)?;
    let specials = params.specials == Some(1);
    let episodes: Vec<&Episode> = state
        .catalog
        .episodes
        .iter()
        .filter(|e| e.show_id == id && (specials || !e.is_special()))
        .collect();
    Ok(Json(json!(episodes)))
}

async fn episode_by_number(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<EpisodeNumberParams>,
) -> ApiResult {
    state
        .catalog
        .episodes
        .iter()
        .find(|e| e.show_id == id && e.season == params.season && e.number == Some(params.number))
        .map(|e| Json(json!(e)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn episodes_by_date(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<DateParams>,
) -> ApiResult {
    let episodes: Vec<&Episode> = state
        .catalog
        .episodes
        .iter()
        .filter(|e| e.show_id == id && e.airdate == params.date)
        .collect();
    if episodes.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(episodes)))
}

async fn show_cast(State(state): State<MockState>, Path(id): Path<u64>) -> ApiResult {
    let catalog = &state.catalog;
    catalog.show(id).ok_or(StatusCode::NOT_FOUND)?;
    let cast: Vec<Value> = catalog
        .cast
        .iter()
        .filter(|c| c.show_id == id)
        .filter_map(|c| {
            catalog
                .person(c.person_id)
                .map(|p| json!({ "person": p, "character": { "name": c.character } }))
        })
        .collect();
    Ok(Json(json!(cast)))
}

async fn show_akas(State(state): State<MockState>, Path(id): Path<u64>) -> ApiResult {
    state.catalog.show(id).ok_or(StatusCode::NOT_FOUND)?;
    let akas: Vec<Value> = state
        .catalog
        .akas
        .iter()
        .filter(|a| a.show_id == id)
        .map(|a| json!({ "name": a.name, "country": { "code": a.country } }))
        .collect();
    Ok(Json(json!(akas)))
}

async fn get_person(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<EmbedParams>,
) -> ApiResult {
    let catalog = &state.catalog;
    let person = catalog.person(id).ok_or(StatusCode::NOT_FOUND)?;
    let mut value = json!(person);
    if params.embed.as_deref() == Some("castcredits") {
        value["_embedded"] = json!({ "castcredits": catalog.cast_credits(id, false) });
    }
    Ok(Json(value))
}

async fn person_cast_credits(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<EmbedParams>,
) -> ApiResult {
    state.catalog.person(id).ok_or(StatusCode::NOT_FOUND)?;
    let embed = params.embed.as_deref() == Some("show");
    Ok(Json(json!(state.catalog.cast_credits(id, embed))))
}

async fn person_crew_credits(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Query(params): Query<EmbedParams>,
) -> ApiResult {
    state.catalog.person(id).ok_or(StatusCode::NOT_FOUND)?;
    let embed = params.embed.as_deref() == Some("show");
    Ok(Json(json!(state.catalog.crew_credits(id, embed))))
}

async fn show_updates(State(state): State<MockState>) -> Json<Map<String, Value>> {
    let updates = state
        .catalog
        .shows
        .iter()
        .map(|s| (s.id.to_string(), json!(s.updated)))
        .collect();
    Json(updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_serializes_type_and_hides_show_id() {
        let ep = episode(1, 1, 1, Some(1), "Pilot", "2013-06-24");
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["type"], "regular");
        assert_eq!(json["airdate"], "2013-06-24");
        assert!(json.get("show_id").is_none());
    }

    #[test]
    fn unnumbered_episode_is_special() {
        let ep = episode(2, 1, 3, None, "Special", "2013-12-24");
        assert!(ep.is_special());
        assert_eq!(serde_json::to_value(&ep).unwrap()["number"], Value::Null);
    }

    #[test]
    fn score_matches_case_insensitive_substrings() {
        assert!(score("Game of Thrones", "thrones").is_some());
        assert!(score("Game of Thrones", "dome").is_none());
        assert!(score("Game of Thrones", "  ").is_none());
    }

    #[test]
    fn score_prefers_exact_names() {
        let exact = score("Friends", "friends").unwrap();
        let partial = score("Friends from College", "friends").unwrap();
        assert!(exact > partial);
    }

    #[test]
    fn credit_links_point_at_show() {
        let catalog = Catalog::default();
        let credits = catalog.crew_credits(284, false);
        assert_eq!(credits.len(), 2);
        assert_eq!(credits[0]["_links"]["show"]["href"], "/shows/335");
        assert!(credits[0].get("_embedded").is_none());
    }

    #[test]
    fn embedded_credit_carries_show() {
        let catalog = Catalog::default();
        let credits = catalog.cast_credits(10260, true);
        assert_eq!(credits[0]["_embedded"]["show"]["name"], "Friends");
        assert_eq!(credits[0]["character"]["name"], "Rachel Green");
    }
}
