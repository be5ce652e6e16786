//! Blocking HTTP client for BoardGameGeek and its companion services.

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::{BggError, BggResult};
use super::types::{
    CollectionItem, CollectionQuery, Forum, ForumSummary, HotItem, SearchHit, Thing, ThreadDetail,
    User,
};
use super::xml::{self, Notice};
use super::BggApi;
use crate::core::config::BggConfig;

/// Identifies this server to the price comparison service.
const PRICES_SITENAME: &str = "bgg-mcp";

/// Number of similar games requested from the recommendation service.
const MAX_RECOMMENDATIONS: usize = 10;

/// Client for the XML API2 plus the prices and recommendation services.
///
/// Uses `reqwest::blocking`, so it must be created and used outside of an
/// async context (the tool layer runs it on the blocking thread pool).
pub struct BggClient {
    http: Client,
    config: BggConfig,
}

#[derive(Debug, Deserialize)]
struct SimilarGames {
    #[serde(default)]
    results: Vec<SimilarGame>,
}

#[derive(Debug, Deserialize)]
struct SimilarGame {
    bgg_id: u64,
}

impl BggClient {
    /// Build a client from configuration.
    pub fn new(config: &BggConfig) -> BggResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Fetch an XML API2 document.
    ///
    /// BoardGameGeek answers `202 Accepted` (or a `<message>` document) while
    /// it prepares some exports; those are re-polled up to the configured
    /// number of attempts.
    fn get_xml(&self, path: &str, query: &[(&str, String)]) -> BggResult<String> {
        let url = self.endpoint(path);
        let attempts = self.config.queued_retries + 1;

        for attempt in 1..=attempts {
            debug!("GET {} {:?} (attempt {})", url, query, attempt);
            let response = self.http.get(&url).query(query).send()?;
            let status = response.status();
            let body = response.text()?;

            let pending = status == StatusCode::ACCEPTED
                || matches!(xml::notice(&body), Some(Notice::Pending(_)));
            if pending {
                debug!("{} is queued, waiting before retry", path);
                if attempt < attempts {
                    thread::sleep(Duration::from_millis(self.config.queued_retry_delay_ms));
                }
                continue;
            }

            if let Some(Notice::Error(message)) = xml::notice(&body) {
                return Err(BggError::Api(message));
            }

            if !status.is_success() {
                warn!("BoardGameGeek {} answered {}", path, status);
                return Err(BggError::status("BoardGameGeek", status.as_u16()));
            }

            return Ok(body);
        }

        Err(BggError::Queued { attempts })
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl BggApi for BggClient {
    fn search(&self, query: &str, exact: bool) -> BggResult<Vec<SearchHit>> {
        let mut params = vec![
            ("query", query.to_string()),
            ("type", "boardgame,boardgameexpansion".to_string()),
        ];
        if exact {
            params.push(("exact", "1".to_string()));
        }
        xml::parse_search(&self.get_xml("search", &params)?)
    }

    fn things(&self, ids: &[u64]) -> BggResult<Vec<Thing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let params = [("id", join_ids(ids)), ("stats", "1".to_string())];
        xml::parse_things(&self.get_xml("thing", &params)?)
    }

    fn collection(
        &self,
        username: &str,
        query: &CollectionQuery,
    ) -> BggResult<Vec<CollectionItem>> {
        let mut params = vec![
            ("username", username.to_string()),
            ("stats", "1".to_string()),
        ];
        params.extend(query.to_query_pairs());
        xml::parse_collection(&self.get_xml("collection", &params)?)
    }

    fn user(&self, username: &str) -> BggResult<User> {
        let params = [("name", username.to_string())];
        xml::parse_user(&self.get_xml("user", &params)?, username)
    }

    fn hot(&self) -> BggResult<Vec<HotItem>> {
        let params = [("type", "boardgame".to_string())];
        xml::parse_hot(&self.get_xml("hot", &params)?)
    }

    fn forum_list(&self, thing_id: u64) -> BggResult<Vec<ForumSummary>> {
        let params = [("id", thing_id.to_string()), ("type", "thing".to_string())];
        xml::parse_forum_list(&self.get_xml("forumlist", &params)?)
    }

    fn forum(&self, forum_id: u64, page: u32) -> BggResult<Forum> {
        let params = [("id", forum_id.to_string()), ("page", page.to_string())];
        xml::parse_forum(&self.get_xml("forum", &params)?)
    }

    fn thread(&self, thread_id: u64) -> BggResult<ThreadDetail> {
        let params = [("id", thread_id.to_string())];
        xml::parse_thread(&self.get_xml("thread", &params)?, thread_id)
    }

    fn prices(&self, ids: &str, currency: &str, destination: &str) -> BggResult<serde_json::Value> {
        let params = [
            ("eid", ids),
            ("currency", currency),
            ("destination", destination),
            ("sitename", PRICES_SITENAME),
        ];
        let body = self
            .http
            .get(&self.config.prices_url)
            .query(&params)
            .send()?
            .text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn similar_games(&self, id: u64, min_votes: u32) -> BggResult<Vec<u64>> {
        let url = format!(
            "{}/games/{}/similar.json",
            self.config.recommend_url.trim_end_matches('/'),
            id
        );
        let params = [
            ("num_votes__gte", min_votes.to_string()),
            ("page", "1".to_string()),
        ];
        let response = self.http.get(&url).query(&params).send()?;
        if response.status() != StatusCode::OK {
            return Err(BggError::status(
                "Recommendation API",
                response.status().as_u16(),
            ));
        }

        let similar: SimilarGames = serde_json::from_str(&response.text()?)?;
        Ok(similar
            .results
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|g| g.bgg_id)
            .collect())
    }
}
