//! REST endpoints served next to JSON-RPC by the HTTP transport.
//!
//! - `GET /health`
//! - `GET /v1/bgg/search?query=...&limit=30&type=boardgame|all`
//! - `GET /v1/bgg/details/{id}`
//! - `GET /v1/bgg/hot`
//! - `GET /v1/bgg/user?username=...`
//! - `GET /v1/bgg/collection?username=...&subtype=...&owned=true...`
//! - `GET /v1/bgg/price?ids=12,844&currency=USD&destination=US`
//! - `GET /v1/bgg/recommendations?name=...&id=...&min_votes=30`
//! - `GET /v1/bgg/trade-finder?user1=...&user2=...`
//! - `GET /v1/bgg/rules?name=...&id=...`
//! - `GET /v1/bgg/thread/{id}`
//!
//! Every response is JSON, cacheable for an hour and readable cross-origin.
//! Failed lookups answer `200` with an `{"error": ...}` body; only malformed
//! input (`400`) and unknown game ids (`404`) change the status.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::{info, warn};

use crate::bgg::BggApi;
use crate::domains::tools::ToolContext;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::bgg::{
    collection::CollectionParams,
    common::GameSummary,
    price::PriceParams,
    ranking::{GameType, find_best_match, rank_search_results},
    recommender::{DEFAULT_MIN_VOTES, recommend},
    rules::{THREADS_PER_PAGE, fetch_rules_forum},
    trade::find_trades,
};

const MIN_QUERY_LEN: usize = 3;
const DEFAULT_SEARCH_LIMIT: usize = 30;
const MAX_SEARCH_LIMIT: usize = 100;
const RULES_MAX_PAGES: usize = 3;

/// A REST failure and the status it is reported with.
#[derive(Debug)]
enum RestError {
    BadRequest(String),
    NotFound(String),
    Failed(String),
}

impl RestError {
    fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl From<ToolError> for RestError {
    fn from(err: ToolError) -> Self {
        Self::Failed(err.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Failed(msg) => {
                warn!("REST request failed: {}", msg);
                (StatusCode::OK, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type RestResult = Result<Json<Value>, RestError>;

/// Build the REST router.
pub fn router(ctx: ToolContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/v1/bgg/search", get(search))
        .route("/v1/bgg/details/{id}", get(details))
        .route("/v1/bgg/hot", get(hot))
        .route("/v1/bgg/user", get(user))
        .route("/v1/bgg/collection", get(collection))
        .route("/v1/bgg/price", get(price))
        .route("/v1/bgg/recommendations", get(recommendations))
        .route("/v1/bgg/trade-finder", get(trade_finder))
        .route("/v1/bgg/rules", get(rules))
        .route("/v1/bgg/thread/{id}", get(thread))
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
        .layer(cors)
}

/// Run `f` against a fresh client on the blocking pool.
async fn with_api<T, F>(ctx: &ToolContext, f: F) -> Result<T, RestError>
where
    T: Send + 'static,
    F: FnOnce(&dyn BggApi) -> Result<T, RestError> + Send + 'static,
{
    let ctx = ctx.clone();
    tokio::task::spawn_blocking(move || {
        let api = ctx
            .connect()
            .map_err(|e| RestError::failed(format!("Failed to create BoardGameGeek client: {}", e)))?;
        f(api.as_ref())
    })
    .await
    .map_err(|e| RestError::failed(format!("Task failed: {}", e)))?
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RestError> {
    serde_json::to_value(value).map_err(|e| RestError::failed(e.to_string()))
}

/// Empty or `SELF` means the configured default user.
fn username_or_default(ctx: &ToolContext, name: Option<&str>) -> Option<String> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() || name.eq_ignore_ascii_case("SELF") {
        ctx.config().default_username().map(str::to_string)
    } else {
        Some(name.to_string())
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|id| *id > 0)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
    limit: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn search(State(ctx): State<ToolContext>, Query(q): Query<SearchQuery>) -> Json<Value> {
    let query = q.query.trim().to_string();
    if query.chars().count() < MIN_QUERY_LEN {
        return Json(json!({ "games": [], "total": 0, "warning": "query too short" }));
    }

    let limit = q
        .limit
        .and_then(|l| l.trim().parse::<usize>().ok())
        .filter(|n| (1..=MAX_SEARCH_LIMIT).contains(n))
        .unwrap_or(DEFAULT_SEARCH_LIMIT);
    let filter = match q.kind.as_deref() {
        Some("all") => GameType::All,
        _ => GameType::BoardGame,
    };

    info!("REST search for '{}' ({}, limit {})", query, filter.as_str(), limit);
    let ranked = with_api(&ctx, move |api| {
        Ok(rank_search_results(api, &query, filter, limit)?)
    })
    .await;

    match ranked {
        Ok(games) => {
            let games = GameSummary::from_things(&games);
            Json(json!({ "total": games.len(), "games": games }))
        }
        Err(RestError::Failed(msg) | RestError::BadRequest(msg) | RestError::NotFound(msg)) => {
            Json(json!({ "games": [], "total": 0, "error": msg }))
        }
    }
}

async fn details(State(ctx): State<ToolContext>, Path(raw_id): Path<String>) -> RestResult {
    let id = parse_id(&raw_id).ok_or_else(|| RestError::BadRequest("invalid id".to_string()))?;

    let summary = with_api(&ctx, move |api| {
        let things = api
            .things(&[id])
            .map_err(|_| RestError::NotFound("not found".to_string()))?;
        things
            .first()
            .map(|thing| GameSummary::from(thing).with_clean_description())
            .ok_or_else(|| RestError::NotFound("not found".to_string()))
    })
    .await?;

    Ok(Json(to_value(&summary)?))
}

async fn hot(State(ctx): State<ToolContext>) -> RestResult {
    with_api(&ctx, |api| {
        let items = api.hot().map_err(|e| RestError::failed(e.to_string()))?;
        to_value(&items).map(Json)
    })
    .await
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    username: Option<String>,
}

async fn user(State(ctx): State<ToolContext>, Query(q): Query<UserQuery>) -> RestResult {
    let name = username_or_default(&ctx, q.username.as_deref())
        .ok_or_else(|| RestError::BadRequest("username required".to_string()))?;

    with_api(&ctx, move |api| {
        let user = api.user(&name).map_err(|e| RestError::failed(e.to_string()))?;
        to_value(&user).map(Json)
    })
    .await
}

/// Translate query-string filters into the tool's collection parameters.
fn collection_params(username: String, q: &HashMap<String, String>) -> CollectionParams {
    let flag = |key: &str| {
        q.get(key)
            .filter(|v| !v.is_empty())
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
    };
    let number = |key: &str| q.get(key).and_then(|v| v.trim().parse::<f64>().ok());
    let count = |key: &str| number(key).filter(|n| *n >= 0.0).map(|n| n as u32);

    CollectionParams {
        username,
        subtype: q.get("subtype").filter(|v| !v.is_empty()).cloned(),
        owned: flag("owned"),
        wishlist: flag("wishlist"),
        preordered: flag("preordered"),
        fortrade: flag("fortrade"),
        rated: flag("rated"),
        wanttoplay: flag("wanttoplay"),
        played: flag("played"),
        wanttobuy: flag("wanttobuy"),
        hasparts: flag("hasparts"),
        minrating: number("minrating"),
        maxrating: number("maxrating"),
        minbggrating: number("minbggrating"),
        maxbggrating: number("maxbggrating"),
        minplays: count("minplays"),
        maxplays: count("maxplays"),
    }
}

async fn collection(
    State(ctx): State<ToolContext>,
    Query(q): Query<HashMap<String, String>>,
) -> RestResult {
    let name = username_or_default(&ctx, q.get("username").map(String::as_str))
        .ok_or_else(|| RestError::BadRequest("username required".to_string()))?;
    let params = collection_params(name, &q);

    with_api(&ctx, move |api| {
        let items = api
            .collection(&params.username, &params.to_query())
            .map_err(|e| RestError::failed(e.to_string()))?;
        to_value(&items).map(Json)
    })
    .await
}

#[derive(Debug, Deserialize)]
struct PriceQuery {
    #[serde(default)]
    ids: String,
    currency: Option<String>,
    destination: Option<String>,
}

async fn price(State(ctx): State<ToolContext>, Query(q): Query<PriceQuery>) -> RestResult {
    let params = PriceParams {
        ids: q.ids.trim().to_string(),
        currency: q.currency,
        destination: q.destination,
    };
    if params.ids.is_empty() {
        return Err(RestError::BadRequest("ids required".to_string()));
    }

    with_api(&ctx, move |api| {
        api.prices(&params.ids, &params.currency(), &params.destination())
            .map(Json)
            .map_err(|e| RestError::failed(e.to_string()))
    })
    .await
}

#[derive(Debug, Deserialize)]
struct GameQuery {
    name: Option<String>,
    id: Option<String>,
    min_votes: Option<String>,
}

impl GameQuery {
    fn name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }

    fn id(&self) -> Option<u64> {
        self.id.as_deref().and_then(parse_id)
    }
}

async fn recommendations(State(ctx): State<ToolContext>, Query(q): Query<GameQuery>) -> RestResult {
    let min_votes = q
        .min_votes
        .as_deref()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MIN_VOTES);
    let (name, id) = (q.name(), q.id());

    with_api(&ctx, move |api| {
        let game_id = id
            .or_else(|| {
                let name = name.as_deref()?;
                rank_search_results(api, name, GameType::BoardGame, 1)
                    .ok()?
                    .first()
                    .map(|game| game.id)
            })
            .ok_or_else(|| RestError::BadRequest("name or id required".to_string()))?;

        match recommend(api, game_id, min_votes) {
            Ok(games) => to_value(&GameSummary::from_things(&games)).map(Json),
            Err(ToolError::NotFound(_)) => Ok(Json(json!([]))),
            Err(e) => Err(e.into()),
        }
    })
    .await
}

#[derive(Debug, Deserialize)]
struct TradeQuery {
    user1: Option<String>,
    user2: Option<String>,
}

async fn trade_finder(State(ctx): State<ToolContext>, Query(q): Query<TradeQuery>) -> RestResult {
    let user1 = username_or_default(&ctx, q.user1.as_deref());
    let user2 = match q.user2.as_deref().map(str::trim) {
        Some(name) if name.eq_ignore_ascii_case("SELF") => {
            ctx.config().default_username().map(str::to_string)
        }
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => None,
    };
    let (Some(user1), Some(user2)) = (user1, user2) else {
        return Err(RestError::BadRequest("user1 and user2 required".to_string()));
    };

    with_api(&ctx, move |api| {
        let trades = find_trades(api, &user1, &user2)?;
        to_value(&trades).map(Json)
    })
    .await
}

async fn rules(State(ctx): State<ToolContext>, Query(q): Query<GameQuery>) -> RestResult {
    let (name, id) = (q.name(), q.id());

    with_api(&ctx, move |api| {
        let (game_id, game_name) = match id {
            Some(id) => (id, String::new()),
            None => name
                .as_deref()
                .and_then(|name| find_best_match(api, name).ok())
                .map(|hit| (hit.id, hit.name))
                .ok_or_else(|| RestError::BadRequest("name or id required".to_string()))?,
        };

        let forum = fetch_rules_forum(
            api,
            game_id,
            game_name,
            RULES_MAX_PAGES * THREADS_PER_PAGE,
            RULES_MAX_PAGES,
        )?;

        let threads: Vec<Value> = forum
            .threads
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "subject": t.subject,
                    "replies": t.replies(),
                    "link": t.link(),
                })
            })
            .collect();

        Ok(Json(json!({
            "game_name": forum.game_name,
            "game_id": forum.game_id,
            "forum_title": forum.forum_title,
            "threads": threads,
        })))
    })
    .await
}

async fn thread(State(ctx): State<ToolContext>, Path(raw_id): Path<String>) -> RestResult {
    let id = parse_id(&raw_id).ok_or_else(|| RestError::BadRequest("invalid id".to_string()))?;

    with_api(&ctx, move |api| {
        let thread = api.thread(id).map_err(|e| RestError::failed(e.to_string()))?;
        to_value(&thread).map(Json)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::{StubBgg, hit, owned, thread_summary, thing, wishlisted};
    use crate::bgg::{ForumSummary, User};
    use crate::domains::tools::test_support::stub_context;
    use axum::body::Body;
    use http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(stub: StubBgg, username: Option<&str>, uri: &str) -> (StatusCode, Value, Response) {
        let app = router(stub_context(stub, username));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value, Response::from_parts(parts, Body::empty()))
    }

    #[tokio::test]
    async fn test_health_sets_cache_headers() {
        let (status, body, response) = get_json(StubBgg::default(), None, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );
    }

    #[tokio::test]
    async fn test_search_short_query_warns() {
        let (_, body, _) = get_json(StubBgg::default(), None, "/v1/bgg/search?query=az").await;
        assert_eq!(body["warning"], "query too short");
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_search_defaults_to_base_games() {
        let stub = StubBgg {
            search_hits: vec![
                hit(1, "Azul: Summer Pavilion", "boardgame"),
                hit(2, "Azul: Crystal Mosaic", "boardgameexpansion"),
                hit(3, "Azul Duel", "boardgame"),
            ],
            things: vec![thing(1, "Azul: Summer Pavilion", 30_000), thing(3, "Azul Duel", 90_000)],
            ..StubBgg::default()
        };
        let (_, body, _) = get_json(stub, None, "/v1/bgg/search?query=azul&limit=500").await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["games"][0]["id"], 3);
    }

    #[tokio::test]
    async fn test_search_failure_reports_error() {
        let stub = StubBgg {
            failure: Some("service unavailable".to_string()),
            ..StubBgg::default()
        };
        let (status, body, _) = get_json(stub, None, "/v1/bgg/search?query=azul").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert!(body["error"].as_str().unwrap().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_details_status_codes() {
        let mut game = thing(13, "Catan", 100_000);
        game.description = "Trade &amp; build.&#10;&#10;  Settle the island.  ".to_string();
        let stub = StubBgg {
            things: vec![game],
            ..StubBgg::default()
        };

        let (status, _, _) = get_json(stub.clone(), None, "/v1/bgg/details/catan").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = get_json(stub.clone(), None, "/v1/bgg/details/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body, _) = get_json(stub, None, "/v1/bgg/details/13").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "Trade & build.\nSettle the island.");
        assert_eq!(body["description_short"], "Trade & build.\nSettle the island.");
    }

    #[tokio::test]
    async fn test_user_requires_a_name() {
        let (status, body, _) = get_json(StubBgg::default(), None, "/v1/bgg/user?username=SELF").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "username required");
    }

    #[tokio::test]
    async fn test_user_self_uses_default() {
        let stub = StubBgg {
            users: vec![User {
                id: 7,
                name: "meeple_fan".to_string(),
                ..User::default()
            }],
            ..StubBgg::default()
        };
        let (status, body, _) = get_json(stub, Some("meeple_fan"), "/v1/bgg/user").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 7);
    }

    #[tokio::test]
    async fn test_collection_flags_accept_one() {
        let stub = StubBgg::default();
        let queries = stub.collection_queries.clone();
        get_json(
            stub,
            None,
            "/v1/bgg/collection?username=meeple_fan&fortrade=1&played=false&minplays=2",
        )
        .await;

        let queries = queries.lock().unwrap();
        assert_eq!(queries[0].trade, Some(true));
        assert_eq!(queries[0].played, Some(false));
        assert_eq!(queries[0].own, None);
        assert_eq!(queries[0].min_plays, Some(2));
    }

    #[tokio::test]
    async fn test_price_requires_ids() {
        let (status, _, _) = get_json(StubBgg::default(), None, "/v1/bgg/price").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body, _) =
            get_json(StubBgg::default(), None, "/v1/bgg/price?ids=13&currency=gbp").await;
        assert_eq!(body["currency"], "GBP");
        assert_eq!(body["destination"], "US");
    }

    #[tokio::test]
    async fn test_recommendations_empty_list() {
        let (_, body, _) =
            get_json(StubBgg::default(), None, "/v1/bgg/recommendations?id=13").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_trade_finder_self() {
        let mut collections = HashMap::new();
        collections.insert("meeple_fan".to_string(), vec![owned(13, "Catan")]);
        collections.insert("friend".to_string(), vec![wishlisted(13, "Catan")]);
        let stub = StubBgg {
            collections,
            ..StubBgg::default()
        };

        let (_, body, _) = get_json(
            stub,
            Some("meeple_fan"),
            "/v1/bgg/trade-finder?user1=SELF&user2=friend",
        )
        .await;
        assert_eq!(body["summary"]["has_trade_opportunity"], true);
    }

    #[tokio::test]
    async fn test_trade_finder_missing_user2() {
        let (status, _, _) =
            get_json(StubBgg::default(), Some("meeple_fan"), "/v1/bgg/trade-finder").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rules_lists_threads() {
        let mut forum_pages = HashMap::new();
        forum_pages.insert(1, vec![thread_summary(501, "Robber question")]);
        let stub = StubBgg {
            forums: vec![ForumSummary {
                id: 90,
                title: "Rules".to_string(),
                description: String::new(),
                num_threads: 1,
                num_posts: 3,
                last_post_date: String::new(),
                no_posting: false,
            }],
            forum_pages,
            ..StubBgg::default()
        };

        let (_, body, _) = get_json(stub, None, "/v1/bgg/rules?id=13").await;
        assert_eq!(body["game_id"], 13);
        assert_eq!(body["forum_title"], "Rules");
        assert_eq!(body["threads"][0]["id"], 501);
        assert_eq!(body["threads"][0]["replies"], 2);
    }

    #[tokio::test]
    async fn test_thread_invalid_id() {
        let (status, body, _) = get_json(StubBgg::default(), None, "/v1/bgg/thread/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid id");
    }
}
