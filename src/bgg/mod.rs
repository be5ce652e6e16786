//! BoardGameGeek data access.
//!
//! - `client.rs` - blocking HTTP client for XML API2, prices and recommendations
//! - `xml.rs` - XML API2 document decoding
//! - `types.rs` - decoded records handed to the tools
//! - `error.rs` - client error types
//!
//! Tools only see the [`BggApi`] trait, so they can be exercised against an
//! in-memory implementation.

mod client;
mod error;
pub mod types;
pub mod xml;

#[cfg(test)]
pub mod testing;

pub use client::BggClient;
pub use error::{BggError, BggResult};
pub use types::{
    Article, CollectionItem, CollectionQuery, CollectionStatus, Forum, ForumSummary, HotItem,
    Link, Rank, SearchHit, Statistics, Thing, ThreadDetail, ThreadSummary, User,
};

/// Operations offered by the remote game-data services.
///
/// All calls are blocking.
pub trait BggApi {
    /// Search games and expansions by name.
    fn search(&self, query: &str, exact: bool) -> BggResult<Vec<SearchHit>>;

    /// Fetch full records (with statistics) for the given ids.
    fn things(&self, ids: &[u64]) -> BggResult<Vec<Thing>>;

    /// Fetch a user's collection, filtered by `query`.
    fn collection(&self, username: &str, query: &CollectionQuery)
    -> BggResult<Vec<CollectionItem>>;

    /// Fetch a user profile.
    fn user(&self, username: &str) -> BggResult<User>;

    /// Fetch the current board game hotness list.
    fn hot(&self) -> BggResult<Vec<HotItem>>;

    /// List the forums attached to a game.
    fn forum_list(&self, thing_id: u64) -> BggResult<Vec<ForumSummary>>;

    /// Fetch one page (1-based) of a forum's threads.
    fn forum(&self, forum_id: u64, page: u32) -> BggResult<Forum>;

    /// Fetch a full thread.
    fn thread(&self, thread_id: u64) -> BggResult<ThreadDetail>;

    /// Retailer prices for a comma-separated list of ids, passed through as JSON.
    fn prices(&self, ids: &str, currency: &str, destination: &str) -> BggResult<serde_json::Value>;

    /// Ids of games similar to `id`, most similar first.
    fn similar_games(&self, id: u64, min_votes: u32) -> BggResult<Vec<u64>>;
}
