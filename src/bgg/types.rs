//! Domain records decoded from BoardGameGeek responses.
//!
//! These are the cleaned-up shapes handed to the tools: numeric values are
//! already parsed, `0/1` flags are booleans and missing values fall back to
//! their defaults.

use serde::Serialize;

/// A single hit from the name search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
}

/// A full game record from the `thing` endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Thing {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub description: String,
    pub year_published: i32,
    pub min_players: u32,
    pub max_players: u32,
    pub playing_time: u32,
    pub min_play_time: u32,
    pub max_play_time: u32,
    pub min_age: u32,
    pub thumbnail: String,
    pub image: String,
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

impl Thing {
    /// Number of users who rated the game, zero when statistics are missing.
    pub fn users_rated(&self) -> u32 {
        self.statistics.as_ref().map_or(0, |s| s.users_rated)
    }

    /// Values of all links of the given type, in document order.
    pub fn link_values(&self, kind: &str) -> Vec<String> {
        self.links
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.value.clone())
            .collect()
    }
}

/// A typed reference from a game to a designer, publisher, category, etc.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    pub value: String,
}

/// Community statistics attached to a game.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub users_rated: u32,
    pub average: f64,
    pub bayes_average: f64,
    pub std_dev: f64,
    pub owned: u32,
    pub trading: u32,
    pub wanting: u32,
    pub wishing: u32,
    pub num_comments: u32,
    pub num_weights: u32,
    pub average_weight: f64,
    pub ranks: Vec<Rank>,
}

/// One ranking entry; `value` is `None` for "Not Ranked".
#[derive(Debug, Clone, Serialize)]
pub struct Rank {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub friendly_name: String,
    pub value: Option<u32>,
    pub bayes_average: Option<f64>,
}

/// An entry in a user's collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionItem {
    pub game_id: u64,
    pub collection_id: u64,
    pub name: String,
    pub subtype: String,
    pub year_published: i32,
    pub image: String,
    pub thumbnail: String,
    pub status: CollectionStatus,
    pub num_plays: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgg_rating: Option<f64>,
}

/// Ownership and interest flags of a collection entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStatus {
    pub own: bool,
    pub prev_owned: bool,
    pub for_trade: bool,
    pub want: bool,
    pub want_to_play: bool,
    pub want_to_buy: bool,
    pub wishlist: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlist_priority: Option<u8>,
    pub preordered: bool,
    pub last_modified: String,
}

/// Filters for a collection request.
///
/// Unset fields are not sent, so BoardGameGeek applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionQuery {
    pub subtype: Option<String>,
    pub exclude_subtype: Option<String>,
    pub own: Option<bool>,
    pub wishlist: Option<bool>,
    pub preordered: Option<bool>,
    pub trade: Option<bool>,
    pub rated: Option<bool>,
    pub want_to_play: Option<bool>,
    pub played: Option<bool>,
    pub want_to_buy: Option<bool>,
    pub has_parts: Option<bool>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_bgg_rating: Option<f64>,
    pub max_bgg_rating: Option<f64>,
    pub min_plays: Option<u32>,
    pub max_plays: Option<u32>,
}

impl CollectionQuery {
    /// Owned games only.
    pub fn owned() -> Self {
        Self {
            own: Some(true),
            ..Self::default()
        }
    }

    /// Wishlisted games only.
    pub fn wishlisted() -> Self {
        Self {
            wishlist: Some(true),
            ..Self::default()
        }
    }

    /// Encode the filters as query-string pairs for the collection endpoint.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(subtype) = &self.subtype {
            pairs.push(("subtype", subtype.clone()));
        }
        if let Some(excluded) = &self.exclude_subtype {
            pairs.push(("excludesubtype", excluded.clone()));
        }

        let flags = [
            ("own", self.own),
            ("wishlist", self.wishlist),
            ("preordered", self.preordered),
            ("trade", self.trade),
            ("rated", self.rated),
            ("wanttoplay", self.want_to_play),
            ("played", self.played),
            ("wanttobuy", self.want_to_buy),
            ("hasparts", self.has_parts),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                pairs.push((key, if value { "1" } else { "0" }.to_string()));
            }
        }

        let ratings = [
            ("minrating", self.min_rating),
            ("rating", self.max_rating),
            ("minbggrating", self.min_bgg_rating),
            ("bggrating", self.max_bgg_rating),
        ];
        for (key, value) in ratings {
            if let Some(value) = value {
                pairs.push((key, value.to_string()));
            }
        }

        if let Some(plays) = self.min_plays {
            pairs.push(("minplays", plays.to_string()));
        }
        if let Some(plays) = self.max_plays {
            pairs.push(("maxplays", plays.to_string()));
        }

        pairs
    }
}

/// A BoardGameGeek user profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_link: String,
    pub year_registered: i32,
    pub last_login: String,
    pub state_or_province: String,
    pub country: String,
    pub web_address: String,
    pub trade_rating: u32,
    pub market_rating: u32,
}

/// An entry in the hotness list.
#[derive(Debug, Clone, Serialize)]
pub struct HotItem {
    pub id: u64,
    pub rank: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
    pub thumbnail: String,
}

/// A forum attached to a game, as listed by `forumlist`.
#[derive(Debug, Clone, Serialize)]
pub struct ForumSummary {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub num_threads: u32,
    pub num_posts: u32,
    pub last_post_date: String,
    pub no_posting: bool,
}

/// One page of a forum's thread listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Forum {
    pub id: u64,
    pub title: String,
    pub num_threads: u32,
    pub num_posts: u32,
    pub threads: Vec<ThreadSummary>,
}

/// A thread as it appears in a forum listing.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    pub id: u64,
    pub subject: String,
    pub author: String,
    pub num_articles: u32,
    pub post_date: String,
    pub last_post_date: String,
}

impl ThreadSummary {
    /// Replies exclude the opening post.
    pub fn replies(&self) -> u32 {
        self.num_articles.saturating_sub(1)
    }

    /// Public web link for the thread.
    pub fn link(&self) -> String {
        format!("https://boardgamegeek.com/thread/{}", self.id)
    }
}

/// A full forum thread with every article.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThreadDetail {
    pub id: u64,
    pub subject: String,
    pub num_articles: u32,
    pub link: String,
    pub articles: Vec<Article>,
}

/// A single post inside a thread.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: u64,
    pub username: String,
    pub link: String,
    pub post_date: String,
    pub edit_date: String,
    pub num_edits: u32,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_query_sends_nothing() {
        assert!(CollectionQuery::default().to_query_pairs().is_empty());
    }

    #[test]
    fn test_collection_query_pairs() {
        let query = CollectionQuery {
            subtype: Some("boardgame".to_string()),
            exclude_subtype: Some("boardgameexpansion".to_string()),
            own: Some(true),
            rated: Some(false),
            max_rating: Some(7.5),
            min_plays: Some(2),
            ..CollectionQuery::default()
        };

        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("subtype", "boardgame".to_string())));
        assert!(pairs.contains(&("excludesubtype", "boardgameexpansion".to_string())));
        assert!(pairs.contains(&("own", "1".to_string())));
        assert!(pairs.contains(&("rated", "0".to_string())));
        assert!(pairs.contains(&("rating", "7.5".to_string())));
        assert!(pairs.contains(&("minplays", "2".to_string())));
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_thread_summary_replies() {
        let thread = ThreadSummary {
            id: 42,
            subject: "Setup question".to_string(),
            author: "someone".to_string(),
            num_articles: 1,
            post_date: String::new(),
            last_post_date: String::new(),
        };
        assert_eq!(thread.replies(), 0);
        assert_eq!(thread.link(), "https://boardgamegeek.com/thread/42");
    }
}
