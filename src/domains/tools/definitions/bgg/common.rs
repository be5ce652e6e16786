//! Common utilities shared across BoardGameGeek tools.
//!
//! This module provides the compact game summary handed to clients,
//! flexible id parsing, description cleanup and result helpers.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::bgg::Thing;
use crate::domains::tools::ToolError;

/// Characters kept in `description_short`.
pub const SHORT_DESCRIPTION_LEN: usize = 400;

/// Essential information about a game.
///
/// Much smaller than a full [`Thing`], which keeps model context usage low.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameSummary {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description_short: String,
    pub year: i32,
    pub complexity: f64,
    pub players: String,
    pub bgg_rating: f64,
    pub bayes_average: f64,
    pub play_time: String,
    pub min_age: u32,
    pub designer: String,
    pub publisher: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail: String,
    pub image: String,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub num_ratings: u32,
    pub owned: u32,
    pub wishing: u32,
    pub trading: u32,
    pub wanting: u32,
}

/// Render `min`/`max` as `"3"` or `"3-4"`, empty when either is unknown.
fn span(min: u32, max: u32, unit: &str) -> String {
    if min == 0 || max == 0 {
        String::new()
    } else if min == max {
        format!("{}{}", min, unit)
    } else {
        format!("{}-{}{}", min, max, unit)
    }
}

impl From<&Thing> for GameSummary {
    fn from(thing: &Thing) -> Self {
        let mut summary = GameSummary {
            id: thing.id,
            name: thing.name.clone(),
            description: thing.description.clone(),
            year: thing.year_published,
            players: span(thing.min_players, thing.max_players, ""),
            play_time: span(thing.min_play_time, thing.max_play_time, " min"),
            min_age: thing.min_age,
            designer: thing.link_values("boardgamedesigner").join(", "),
            publisher: thing.link_values("boardgamepublisher").join(", "),
            kind: thing.kind.clone(),
            thumbnail: thing.thumbnail.clone(),
            image: thing.image.clone(),
            categories: thing.link_values("boardgamecategory"),
            mechanics: thing.link_values("boardgamemechanic"),
            ..GameSummary::default()
        };

        if let Some(stats) = &thing.statistics {
            summary.complexity = stats.average_weight.max(0.0);
            summary.bgg_rating = stats.average.max(0.0);
            summary.bayes_average = stats.bayes_average.max(0.0);
            summary.num_ratings = stats.users_rated;
            summary.owned = stats.owned;
            summary.wishing = stats.wishing;
            summary.trading = stats.trading;
            summary.wanting = stats.wanting;
        }

        summary
    }
}

impl GameSummary {
    /// Summarize a list of full records, keeping order.
    pub fn from_things(things: &[Thing]) -> Vec<Self> {
        things.iter().map(Self::from).collect()
    }

    /// Replace the raw description with a cleaned one and fill
    /// `description_short`.
    pub fn with_clean_description(mut self) -> Self {
        if !self.description.is_empty() {
            let clean = sanitize_description(&self.description);
            self.description_short = truncate_word_safe(&clean, SHORT_DESCRIPTION_LEN);
            self.description = clean;
        }
        self
    }
}

/// An id given either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseId {
    Number(u64),
    Float(f64),
    Text(String),
}

impl LooseId {
    /// The numeric value, if there is one.
    pub fn value(&self) -> Option<u64> {
        match self {
            LooseId::Number(n) => Some(*n),
            LooseId::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
            LooseId::Float(_) => None,
            LooseId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Deserialize a count sent as an integer, a float or a numeric string.
///
/// Floats are truncated. Negative, non-numeric or out-of-range values read
/// as absent so the caller's default applies.
pub fn loose_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn count_from_value(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX)).then(|| n as u32)
}

/// Decode HTML entities and drop blank lines from a game description.
pub fn sanitize_description(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw)
        .replace("&#10;", "\n")
        .replace('\r', "\n");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `max` bytes, preferring a word boundary near the
/// end, and mark the cut with an ellipsis.
pub fn truncate_word_safe(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut cut = &text[..end];

    if let Some(idx) = cut.rfind(' ') {
        if idx > 0 && idx + 80 > max {
            cut = &cut[..idx];
        }
    }

    format!("{}…", cut.trim())
}

/// Serialize a value as compact JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a value as indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Report a problem to the caller as an ordinary text result.
pub fn diagnostic_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::success(vec![Content::text(message.to_string())])
}
