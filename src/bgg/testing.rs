//! In-memory [`BggApi`] used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    BggApi, BggError, BggResult, CollectionItem, CollectionQuery, CollectionStatus, Forum,
    ForumSummary, HotItem, SearchHit, Statistics, Thing, ThreadDetail, ThreadSummary, User,
};

#[derive(Clone, Default)]
pub struct StubBgg {
    pub search_hits: Vec<SearchHit>,
    pub exact_hits: Vec<SearchHit>,
    pub things: Vec<Thing>,
    pub collections: HashMap<String, Vec<CollectionItem>>,
    pub users: Vec<User>,
    pub hot: Vec<HotItem>,
    pub forums: Vec<ForumSummary>,
    pub forum_pages: HashMap<u32, Vec<ThreadSummary>>,
    pub threads: Vec<ThreadDetail>,
    pub similar: Vec<u64>,
    pub failure: Option<String>,
    pub thing_batches: Arc<Mutex<Vec<Vec<u64>>>>,
    pub collection_queries: Arc<Mutex<Vec<CollectionQuery>>>,
    pub forum_requests: Arc<Mutex<Vec<u32>>>,
}

impl StubBgg {
    fn check(&self) -> BggResult<()> {
        match &self.failure {
            Some(message) => Err(BggError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn hit(id: u64, name: &str, kind: &str) -> SearchHit {
    SearchHit {
        id,
        kind: kind.to_string(),
        name: name.to_string(),
        year_published: None,
    }
}

pub fn thing(id: u64, name: &str, users_rated: u32) -> Thing {
    Thing {
        id,
        kind: "boardgame".to_string(),
        name: name.to_string(),
        statistics: Some(Statistics {
            users_rated,
            ..Statistics::default()
        }),
        ..Thing::default()
    }
}

pub fn owned(id: u64, name: &str) -> CollectionItem {
    CollectionItem {
        game_id: id,
        name: name.to_string(),
        status: CollectionStatus {
            own: true,
            ..CollectionStatus::default()
        },
        ..CollectionItem::default()
    }
}

pub fn wishlisted(id: u64, name: &str) -> CollectionItem {
    CollectionItem {
        game_id: id,
        name: name.to_string(),
        status: CollectionStatus {
            wishlist: true,
            ..CollectionStatus::default()
        },
        ..CollectionItem::default()
    }
}

pub fn thread_summary(id: u64, subject: &str) -> ThreadSummary {
    ThreadSummary {
        id,
        subject: subject.to_string(),
        author: "tester".to_string(),
        num_articles: 3,
        post_date: String::new(),
        last_post_date: String::new(),
    }
}

impl BggApi for StubBgg {
    fn search(&self, _query: &str, exact: bool) -> BggResult<Vec<SearchHit>> {
        self.check()?;
        Ok(if exact {
            self.exact_hits.clone()
        } else {
            self.search_hits.clone()
        })
    }

    fn things(&self, ids: &[u64]) -> BggResult<Vec<Thing>> {
        self.check()?;
        if let Ok(mut batches) = self.thing_batches.lock() {
            batches.push(ids.to_vec());
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.things.iter().find(|t| t.id == *id).cloned())
            .collect())
    }

    fn collection(
        &self,
        username: &str,
        query: &CollectionQuery,
    ) -> BggResult<Vec<CollectionItem>> {
        self.check()?;
        if let Ok(mut queries) = self.collection_queries.lock() {
            queries.push(query.clone());
        }
        let items = self.collections.get(username).cloned().unwrap_or_default();
        Ok(items
            .into_iter()
            .filter(|item| query.own != Some(true) || item.status.own)
            .filter(|item| query.wishlist != Some(true) || item.status.wishlist)
            .collect())
    }

    fn user(&self, username: &str) -> BggResult<User> {
        self.check()?;
        self.users
            .iter()
            .find(|u| u.name == username)
            .cloned()
            .ok_or_else(|| BggError::not_found(format!("user '{}'", username)))
    }

    fn hot(&self) -> BggResult<Vec<HotItem>> {
        self.check()?;
        Ok(self.hot.clone())
    }

    fn forum_list(&self, _thing_id: u64) -> BggResult<Vec<ForumSummary>> {
        self.check()?;
        Ok(self.forums.clone())
    }

    fn forum(&self, forum_id: u64, page: u32) -> BggResult<Forum> {
        self.check()?;
        if let Ok(mut pages) = self.forum_requests.lock() {
            pages.push(page);
        }
        let threads = self.forum_pages.get(&page).cloned().unwrap_or_default();
        Ok(Forum {
            id: forum_id,
            title: "Rules".to_string(),
            num_threads: self.forum_pages.values().map(|p| p.len() as u32).sum(),
            num_posts: 0,
            threads,
        })
    }

    fn thread(&self, thread_id: u64) -> BggResult<ThreadDetail> {
        self.check()?;
        self.threads
            .iter()
            .find(|t| t.id == thread_id)
            .cloned()
            .ok_or_else(|| BggError::not_found(format!("thread {}", thread_id)))
    }

    fn prices(&self, ids: &str, currency: &str, destination: &str) -> BggResult<serde_json::Value> {
        self.check()?;
        Ok(serde_json::json!({
            "ids": ids,
            "currency": currency,
            "destination": destination,
        }))
    }

    fn similar_games(&self, _id: u64, _min_votes: u32) -> BggResult<Vec<u64>> {
        self.check()?;
        Ok(self.similar.clone())
    }
}
