//! Search result ranking.
//!
//! BoardGameGeek's name search returns hits in no useful order, so results are
//! re-ranked: exact names first, then base games whose title starts with the
//! query, then everything else, and finally by how many users rated them.

use std::cmp::Reverse;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bgg::{BggApi, SearchHit, Thing};
use crate::domains::tools::ToolError;

/// Ids per `thing` request.
pub const DETAIL_BATCH_SIZE: usize = 20;

/// Separators between a base title and an edition or expansion suffix.
const TITLE_DELIMITERS: [&str; 6] = [":", " – ", " - ", " — ", " (", " ["];

/// Which kinds of search hits to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GameType {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "boardgame")]
    BoardGame,
    #[serde(rename = "boardgameexpansion")]
    Expansion,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::All => "all",
            GameType::BoardGame => "boardgame",
            GameType::Expansion => "boardgameexpansion",
        }
    }

    fn accepts(&self, kind: &str) -> bool {
        *self == GameType::All || kind == self.as_str()
    }
}

/// Shortest non-empty title prefix before any delimiter, lowercased input.
fn leading_segment(name: &str) -> &str {
    let mut first = name;
    for delimiter in TITLE_DELIMITERS {
        if let Some(idx) = name.find(delimiter) {
            if idx == 0 {
                continue;
            }
            let candidate = name[..idx].trim();
            if candidate.len() < first.len() {
                first = candidate;
            }
        }
    }
    first
}

/// Order hits by how well their names answer `query`.
///
/// Exact case-insensitive matches replace the whole list. Otherwise base games
/// whose leading title segment equals the query move to the front. Relative
/// order is kept within each group.
pub fn prioritize_hits(hits: Vec<SearchHit>, query: &str) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();

    let exact: Vec<SearchHit> = hits
        .iter()
        .filter(|hit| hit.name.to_lowercase() == query)
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let (mut base_games, others): (Vec<_>, Vec<_>) = hits.into_iter().partition(|hit| {
        let name = hit.name.to_lowercase();
        hit.kind == "boardgame" && leading_segment(&name) == query
    });
    base_games.extend(others);
    base_games
}

/// Search, rank and fetch full records for up to `limit` games.
pub fn rank_search_results(
    api: &dyn BggApi,
    query: &str,
    filter: GameType,
    limit: usize,
) -> Result<Vec<Thing>, ToolError> {
    let hits = api
        .search(query, false)
        .map_err(|e| ToolError::remote("search error", e))?;

    if hits.is_empty() {
        return Err(ToolError::not_found("no search results found"));
    }

    let hits: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| filter.accepts(&hit.kind))
        .collect();

    if hits.is_empty() {
        return Err(ToolError::not_found(format!(
            "no {} results found",
            filter.as_str()
        )));
    }

    let ids: Vec<u64> = prioritize_hits(hits, query).iter().map(|hit| hit.id).collect();
    debug!("Fetching details for {} search hits", ids.len());

    let mut games = Vec::with_capacity(ids.len());
    for batch in ids.chunks(DETAIL_BATCH_SIZE) {
        let things = api
            .things(batch)
            .map_err(|e| ToolError::remote("error fetching game details", e))?;
        games.extend(things);
    }

    games.sort_by_key(|game| Reverse(game.users_rated()));
    games.truncate(limit);
    Ok(games)
}

/// Pick the single search hit that best matches `name`.
///
/// An exact search is tried before a fuzzy one. Exact names win outright;
/// otherwise base games beat expansions that contain the name, and names
/// starting with the query beat ones that merely contain it.
pub fn find_best_match(api: &dyn BggApi, name: &str) -> Result<SearchHit, ToolError> {
    let mut hits = api
        .search(name, true)
        .map_err(|e| ToolError::remote("search failed", e))?;

    if hits.is_empty() {
        hits = api
            .search(name, false)
            .map_err(|e| ToolError::remote("search failed", e))?;
    }
    if hits.is_empty() {
        return Err(ToolError::not_found(format!(
            "no games found matching '{}'",
            name
        )));
    }

    let wanted = name.to_lowercase();
    let mut best = 0;

    for (i, hit) in hits.iter().enumerate() {
        let hit_name = hit.name.to_lowercase();
        if hit_name == wanted {
            best = i;
            break;
        }

        let current = &hits[best];
        if current.kind == "boardgameexpansion"
            && hit.kind == "boardgame"
            && (hit_name.contains(&wanted) || wanted.contains(&hit_name))
        {
            best = i;
            continue;
        }

        if current.kind == hit.kind
            && hit_name.starts_with(&wanted)
            && !current.name.to_lowercase().starts_with(&wanted)
        {
            best = i;
        }
    }

    Ok(hits.swap_remove(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::{StubBgg, hit, thing};

    fn names(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_leading_segment() {
        assert_eq!(leading_segment("catan: seafarers"), "catan");
        assert_eq!(leading_segment("catan (5-6 player) – extension"), "catan");
        assert_eq!(leading_segment("catan"), "catan");
        assert_eq!(leading_segment(":odd"), ":odd");
    }

    #[test]
    fn test_exact_match_wins() {
        let hits = vec![
            hit(1, "Catan: Seafarers", "boardgameexpansion"),
            hit(2, "CATAN", "boardgame"),
            hit(3, "Catan Junior", "boardgame"),
        ];
        let ranked = prioritize_hits(hits, "  catan ");
        assert_eq!(names(&ranked), vec!["CATAN"]);
    }

    #[test]
    fn test_base_games_first_and_stable() {
        let hits = vec![
            hit(1, "Azul: Summer Pavilion", "boardgameexpansion"),
            hit(2, "Azul - Crystal Mosaic", "boardgameexpansion"),
            hit(3, "Azul: Stained Glass of Sintra", "boardgame"),
            hit(4, "Azulejos", "boardgame"),
            hit(5, "Azul (Mini)", "boardgame"),
        ];
        let ranked = prioritize_hits(hits, "azul");
        let ids: Vec<u64> = ranked.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 5, 1, 2, 4]);
    }

    #[test]
    fn test_rank_sorts_by_ratings_and_truncates() {
        let stub = StubBgg {
            search_hits: vec![
                hit(1, "Gloom", "boardgame"),
                hit(2, "Gloomhaven: Second Edition", "boardgame"),
                hit(3, "Gloomhaven (Big Box)", "boardgame"),
            ],
            things: vec![
                thing(1, "Gloom", 500),
                thing(2, "Gloomhaven: Second Edition", 60_000),
                thing(3, "Gloomhaven (Big Box)", 500),
            ],
            ..StubBgg::default()
        };

        let games = rank_search_results(&stub, "gloomhaven", GameType::All, 2).unwrap();
        let ids: Vec<u64> = games.iter().map(|g| g.id).collect();
        // hit 3 is a base-game prefix match, so it precedes hit 1 at equal ratings
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_rank_fetches_in_batches() {
        let hits: Vec<SearchHit> = (1..=45).map(|id| hit(id, "Game", "boardgame")).collect();
        let things: Vec<Thing> = (1..=45).map(|id| thing(id, "Game", id as u32)).collect();
        let stub = StubBgg {
            search_hits: hits,
            things,
            ..StubBgg::default()
        };

        let games = rank_search_results(&stub, "something else", GameType::All, 100).unwrap();
        assert_eq!(games.len(), 45);
        assert_eq!(games[0].id, 45);

        let batches = stub.thing_batches.lock().unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn test_rank_empty_results() {
        let stub = StubBgg::default();
        let err = rank_search_results(&stub, "zzz", GameType::All, 10).unwrap_err();
        assert_eq!(err.to_string(), "no search results found");

        let stub = StubBgg {
            search_hits: vec![hit(1, "Catan: Seafarers", "boardgameexpansion")],
            ..StubBgg::default()
        };
        let err = rank_search_results(&stub, "catan", GameType::BoardGame, 10).unwrap_err();
        assert_eq!(err.to_string(), "no boardgame results found");
    }

    #[test]
    fn test_rank_search_failure() {
        let stub = StubBgg {
            failure: Some("boom".to_string()),
            ..StubBgg::default()
        };
        let err = rank_search_results(&stub, "catan", GameType::All, 10).unwrap_err();
        assert_eq!(err.to_string(), "search error: boom");
    }

    #[test]
    fn test_best_match_prefers_exact_search() {
        let stub = StubBgg {
            exact_hits: vec![hit(13, "Catan", "boardgame")],
            search_hits: vec![hit(99, "Catan Junior", "boardgame")],
            ..StubBgg::default()
        };
        assert_eq!(find_best_match(&stub, "Catan").unwrap().id, 13);
    }

    #[test]
    fn test_best_match_prefers_base_game_over_expansion() {
        let stub = StubBgg {
            search_hits: vec![
                hit(1, "Wingspan: European Expansion", "boardgameexpansion"),
                hit(2, "Wingspan Asia", "boardgame"),
            ],
            ..StubBgg::default()
        };
        assert_eq!(find_best_match(&stub, "wingspan").unwrap().id, 2);
    }

    #[test]
    fn test_best_match_prefers_prefix() {
        let stub = StubBgg {
            search_hits: vec![
                hit(1, "The Lord of the Rings", "boardgame"),
                hit(2, "Lord of the Rings: The Card Game", "boardgame"),
            ],
            ..StubBgg::default()
        };
        assert_eq!(find_best_match(&stub, "lord of").unwrap().id, 2);
    }

    #[test]
    fn test_best_match_not_found() {
        let err = find_best_match(&StubBgg::default(), "Nothing").unwrap_err();
        assert_eq!(err.to_string(), "no games found matching 'Nothing'");
    }
}
