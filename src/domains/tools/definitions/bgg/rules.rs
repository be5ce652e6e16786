//! Rules forum tool.
//!
//! Lists the threads of a game's rules forum so the model can pick the
//! relevant ones and read them with `bgg-thread-details`.

use std::fmt::{self, Write};

use html_escape::encode_quoted_attribute;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bgg::{BggApi, ThreadSummary};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{LooseId, loose_count};
use super::ranking::find_best_match;

/// Threads per forum page.
pub const THREADS_PER_PAGE: usize = 50;

/// Most pages fetched by the tool.
pub const MAX_PAGES: usize = 4;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 200;

/// The threads collected from a game's rules forum.
#[derive(Debug, Clone, Serialize)]
pub struct RulesForum {
    pub game_name: String,
    pub game_id: u64,
    pub forum_id: u64,
    pub forum_title: String,
    pub total_threads: u32,
    pub threads: Vec<ThreadSummary>,
}

/// Resolve a game from an id (preferred) or a name.
///
/// Returns the id and, when looked up by name, the matched name.
pub fn resolve_game(
    api: &dyn BggApi,
    name: Option<&str>,
    id: Option<&LooseId>,
) -> Result<(u64, String), ToolError> {
    if let Some(id) = id {
        return id
            .value()
            .map(|id| (id, String::new()))
            .ok_or_else(|| ToolError::invalid_arguments("Invalid game ID format"));
    }

    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => {
            let hit = find_best_match(api, name)?;
            Ok((hit.id, hit.name))
        }
        None => Err(ToolError::invalid_arguments(
            "Either 'name' or 'id' parameter is required",
        )),
    }
}

/// Collect up to `limit` threads from the first forum titled "rules",
/// reading at most `max_pages` pages.
pub fn fetch_rules_forum(
    api: &dyn BggApi,
    game_id: u64,
    game_name: String,
    limit: usize,
    max_pages: usize,
) -> Result<RulesForum, ToolError> {
    let forums = api
        .forum_list(game_id)
        .map_err(|e| ToolError::remote("Failed to get forum list", e))?;

    let forum = forums
        .into_iter()
        .find(|f| f.title.to_lowercase().contains("rules"))
        .ok_or_else(|| ToolError::not_found(format!("No rules forum found for game ID {}", game_id)))?;

    let mut result = RulesForum {
        game_name,
        game_id,
        forum_id: forum.id,
        forum_title: forum.title,
        total_threads: 0,
        threads: Vec::new(),
    };

    for page in 1..=max_pages {
        let listing = api
            .forum(result.forum_id, page as u32)
            .map_err(|e| ToolError::remote("Failed to get rules forum threads", e))?;

        if page == 1 {
            result.total_threads = listing.num_threads;
        }
        if listing.threads.is_empty() {
            break;
        }

        let page_len = listing.threads.len();
        result.threads.extend(listing.threads);

        if result.threads.len() >= limit || page_len < THREADS_PER_PAGE {
            break;
        }
    }

    debug!("Collected {} rules threads for game {}", result.threads.len(), game_id);
    result.threads.truncate(limit);
    Ok(result)
}

fn render_report(forum: &RulesForum) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "<rules_forum_analysis>")?;
    writeln!(out, "<instructions>")?;
    writeln!(out, "Your goal is to help the user resolve their rules question or understand game mechanics.")?;
    writeln!(out, "1. First, identify threads that directly address the user's specific rules query based on their titles")?;
    writeln!(out, "2. Look for threads with high reply counts (indicating thorough discussions) or official-sounding titles")?;
    writeln!(out, "3. Present the 1-4 most relevant threads with brief descriptions of what the titles suggest they discuss")?;
    writeln!(out, "4. For the most promising thread(s), proactively use bgg-thread-details to fetch the actual content")?;
    writeln!(out, "5. After reading the thread content, provide a clear answer to the user's rules question")?;
    writeln!(out, "Remember: You're seeing thread titles only. Use bgg-thread-details to get actual answers.")?;
    writeln!(out, "</instructions>")?;
    writeln!(out)?;

    writeln!(out, "<game_context>")?;
    writeln!(out, "  <game_name>{}</game_name>", encode_quoted_attribute(&forum.game_name))?;
    writeln!(out, "  <game_id>{}</game_id>", forum.game_id)?;
    writeln!(out, "  <forum_title>{}</forum_title>", encode_quoted_attribute(&forum.forum_title))?;
    writeln!(out, "  <total_threads>{}</total_threads>", forum.total_threads)?;
    writeln!(out, "  <threads_retrieved>{}</threads_retrieved>", forum.threads.len())?;
    writeln!(out, "</game_context>")?;
    writeln!(out)?;

    writeln!(out, "<threads>")?;
    writeln!(out, "<!-- Threads are sorted by most recent activity. High reply counts often indicate thorough rules discussions. -->")?;
    for thread in &forum.threads {
        writeln!(out, "  <thread>")?;
        writeln!(out, "    <id>{}</id>", thread.id)?;
        writeln!(out, "    <subject>{}</subject>", encode_quoted_attribute(&thread.subject))?;
        writeln!(out, "    <author>{}</author>", encode_quoted_attribute(&thread.author))?;
        writeln!(out, "    <replies>{}</replies>", thread.replies())?;
        writeln!(out, "    <posted>{}</posted>", thread.post_date)?;
        writeln!(out, "    <last_post>{}</last_post>", thread.last_post_date)?;
        writeln!(out, "    <link>{}</link>", thread.link())?;
        writeln!(out, "  </thread>")?;
    }
    writeln!(out, "</threads>")?;
    writeln!(out, "</rules_forum_analysis>")?;

    Ok(out)
}

/// Parameters for `bgg-rules`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RulesParams {
    #[schemars(description = "The name of the board game")]
    #[serde(default)]
    pub name: Option<String>,

    #[schemars(description = "The BoardGameGeek ID of the board game")]
    #[serde(default)]
    pub id: Option<LooseId>,

    #[schemars(description = "Maximum number of threads to return (default: 100, max: 200)")]
    #[serde(default, deserialize_with = "loose_count")]
    pub limit: Option<u32>,
}

impl RulesParams {
    pub fn limit(&self) -> usize {
        self.limit
            .filter(|n| *n > 0)
            .map_or(DEFAULT_LIMIT, |n| n as usize)
            .min(MAX_LIMIT)
    }

    /// Pages needed for the limit, capped.
    pub fn max_pages(&self) -> usize {
        (self.limit() / THREADS_PER_PAGE + 1).min(MAX_PAGES)
    }
}

#[derive(Debug, Clone)]
pub struct RulesTool;

impl ToolDefinition for RulesTool {
    const NAME: &'static str = "bgg-rules";
    const DESCRIPTION: &'static str = "Find rules clarifications and discussions for a board game from BoardGameGeek forums. Returns thread summaries that can be explored further with bgg-thread-details.";

    type Params = RulesParams;

    fn execute(params: RulesParams, api: &dyn BggApi, _ctx: &ToolContext) -> Result<String, ToolError> {
        let (game_id, game_name) = resolve_game(api, params.name.as_deref(), params.id.as_ref())?;
        let forum = fetch_rules_forum(api, game_id, game_name, params.limit(), params.max_pages())?;
        render_report(&forum).map_err(|e| ToolError::internal(e.to_string()))
    }
}
