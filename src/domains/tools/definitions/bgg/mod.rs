//! BoardGameGeek tools.
//!
//! - `search`, `details`, `hotness`: game lookup
//! - `collection`, `user`, `trade`: user data and trade matching
//! - `price`, `recommender`: companion services
//! - `rules`, `thread_details`: rules forums
//!
//! `ranking` holds the search ranker shared by several tools and `common`
//! the summary shape and result helpers.

pub mod collection;
pub mod common;
pub mod details;
pub mod hotness;
pub mod price;
pub mod ranking;
pub mod recommender;
pub mod rules;
pub mod search;
pub mod thread_details;
pub mod trade;
pub mod user;

pub use collection::{CollectionParams, CollectionTool};
pub use details::{DetailsParams, DetailsTool};
pub use hotness::{HotParams, HotTool};
pub use price::{PriceParams, PriceTool};
pub use recommender::{RecommenderParams, RecommenderTool};
pub use rules::{RulesParams, RulesTool};
pub use search::{SearchParams, SearchTool};
pub use thread_details::{ThreadDetailsParams, ThreadDetailsTool};
pub use trade::{TradeFinderParams, TradeFinderTool};
pub use user::{UserParams, UserTool};
