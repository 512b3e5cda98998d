use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState, Show};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

// --- search ---

#[tokio::test]
async fn show_search_decodes_query() {
    let resp = get(app(), "/search/shows?q=game%20of%20thrones").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let results: Vec<Value> = body_json(resp).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["show"]["name"], "Game of Thrones");
    assert!(results[0]["score"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn show_search_without_matches_is_empty() {
    let resp = get(app(), "/search/shows?q=zzzz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let results: Vec<Value> = body_json(resp).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn show_search_missing_query_returns_400() {
    let resp = get(app(), "/search/shows").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_search_returns_one_show() {
    let resp = get(app(), "/singlesearch/shows?q=sherlock").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let show: Show = body_json(resp).await;
    assert_eq!(show.id, 335);
}

#[tokio::test]
async fn single_search_no_match_returns_404() {
    let resp = get(app(), "/singlesearch/shows?q=nothing%20here").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn people_search() {
    let resp = get(app(), "/search/people?q=andrew%20lincoln").await;
    let results: Vec<Value> = body_json(resp).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["person"]["id"], 14599);
}

// --- lookup ---

#[tokio::test]
async fn lookup_by_either_source() {
    let resp = get(app(), "/lookup/shows?thetvdb=121361").await;
    let show: Show = body_json(resp).await;
    assert_eq!(show.id, 82);

    let resp = get(app(), "/lookup/shows?tvrage=3616").await;
    let show: Show = body_json(resp).await;
    assert_eq!(show.id, 431);
}

#[tokio::test]
async fn lookup_unknown_returns_404() {
    let resp = get(app(), "/lookup/shows?tvrage=1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- schedule ---

#[tokio::test]
async fn schedule_defaults_to_us() {
    let resp = get(app(), "/schedule").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert!(!episodes.is_empty());
    assert!(episodes.iter().all(|e| e["show"]["country"] == "US"));
}

#[tokio::test]
async fn schedule_filters_country_and_date() {
    let resp = get(app(), "/schedule?country=GB&date=2010-07-25").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0]["name"], "A Study in Pink");
    assert_eq!(episodes[0]["show"]["name"], "Sherlock");
}

#[tokio::test]
async fn full_schedule_lists_every_episode() {
    let resp = get(app(), "/schedule/full").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert_eq!(episodes.len(), 10);
}

// --- shows ---

#[tokio::test]
async fn show_not_found() {
    let resp = get(app(), "/shows/999999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn show_bad_id_returns_400() {
    let resp = get(app(), "/shows/not-a-number").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn episode_list_hides_specials_unless_asked() {
    let resp = get(app(), "/shows/335/episodes").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert_eq!(episodes.len(), 2);

    let resp = get(app(), "/shows/335/episodes?specials=1").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert_eq!(episodes.len(), 3);
    assert!(episodes.iter().any(|e| e["type"] == "significant_special"));
}

#[tokio::test]
async fn episode_by_number_and_date() {
    let resp = get(app(), "/shows/82/episodebynumber?season=1&number=2").await;
    let episode: Value = body_json(resp).await;
    assert_eq!(episode["name"], "The Kingsroad");

    let resp = get(app(), "/shows/431/episodesbydate?date=1994-09-22").await;
    let episodes: Vec<Value> = body_json(resp).await;
    assert_eq!(episodes[0]["name"], "The One Where It All Began");

    let resp = get(app(), "/shows/431/episodesbydate?date=2000-01-01").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cast_and_akas() {
    let resp = get(app(), "/shows/527/cast").await;
    let cast: Vec<Value> = body_json(resp).await;
    assert_eq!(cast[0]["person"]["name"], "Andrew Lincoln");
    assert_eq!(cast[0]["character"]["name"], "Rick Grimes");

    let resp = get(app(), "/shows/82/akas").await;
    let akas: Vec<Value> = body_json(resp).await;
    assert_eq!(akas.len(), 2);
    assert_eq!(akas[0]["country"]["code"], "SI");
}

#[tokio::test]
async fn show_index_pages_by_id() {
    let resp = get(app(), "/shows?page=0").await;
    let page: Vec<Show> = body_json(resp).await;
    assert_eq!(page.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 82]);

    let resp = get(app(), "/shows?page=2").await;
    let page: Vec<Show> = body_json(resp).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "The Walking Dead");

    let resp = get(app(), "/shows?page=7").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- people ---

#[tokio::test]
async fn person_info_embeds_cast_credits() {
    let resp = get(app(), "/people/3358").await;
    let person: Value = body_json(resp).await;
    assert_eq!(person["name"], "Benedict Cumberbatch");
    assert!(person.get("_embedded").is_none());

    let resp = get(app(), "/people/3358?embed=castcredits").await;
    let person: Value = body_json(resp).await;
    assert_eq!(person["_embedded"]["castcredits"][0]["_links"]["show"]["href"], "/shows/335");
}

#[tokio::test]
async fn crew_credits_embed_show() {
    let resp = get(app(), "/people/284/crewcredits?embed=show").await;
    let credits: Vec<Value> = body_json(resp).await;
    assert_eq!(credits.len(), 2);
    assert_eq!(credits[0]["type"], "Creator");
    assert_eq!(credits[0]["_embedded"]["show"]["name"], "Sherlock");
}

#[tokio::test]
async fn unknown_person_returns_404() {
    let resp = get(app(), "/people/424242/castcredits").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- updates ---

#[tokio::test]
async fn show_updates_map_ids_to_timestamps() {
    let resp = get(app(), "/updates/shows").await;
    let updates: Value = body_json(resp).await;
    assert_eq!(updates["82"], 1638716563);
    assert_eq!(updates.as_object().unwrap().len(), 5);
}

// --- request log ---

#[tokio::test]
async fn requests_are_recorded_in_order() {
    let state = MockState::default();
    let router = app_with_state(state.clone());

    get(router.clone(), "/schedule?country=GB").await;
    get(router.clone(), "/search/shows?q=breaking%20bad").await;
    get(router, "/shows/999999").await;

    assert_eq!(
        state.requests().await,
        vec![
            "/schedule?country=GB".to_string(),
            "/search/shows?q=breaking%20bad".to_string(),
            "/shows/999999".to_string(),
        ]
    );
}
