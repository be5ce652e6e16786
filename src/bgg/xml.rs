//! XML API2 document decoding.
//!
//! Every endpoint is decoded in two steps: `quick-xml`'s serde support maps
//! the document onto loose `Raw*` structs (all attributes kept as strings),
//! then a conversion turns them into the records in [`super::types`].
//! BoardGameGeek is inconsistent about empty values, so numbers are parsed
//! leniently and default to zero.

use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use super::error::{BggError, BggResult};
use super::types::{
    Article, CollectionItem, CollectionStatus, Forum, ForumSummary, HotItem, Link, Rank,
    SearchHit, Statistics, Thing, ThreadDetail, ThreadSummary, User,
};

// ============================================================================
// Shared raw shapes
// ============================================================================

/// `<tag value="..."/>`
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(rename = "@value", default)]
    value: String,
}

/// `<tag>text</tag>` with attributes that are not needed.
#[derive(Debug, Default, Deserialize)]
struct RawText {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawName {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@value", default)]
    value: String,
}

fn num<T: FromStr + Default>(raw: &str) -> T {
    raw.trim().parse().unwrap_or_default()
}

fn opt_num<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn value_of<T: FromStr + Default>(raw: &Option<RawValue>) -> T {
    raw.as_ref().map(|v| num(&v.value)).unwrap_or_default()
}

fn text_of(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn primary_name(names: &[RawName]) -> String {
    names
        .iter()
        .find(|n| n.kind == "primary")
        .or_else(|| names.first())
        .map(|n| n.value.clone())
        .unwrap_or_default()
}

// ============================================================================
// Error and queue notices
// ============================================================================

/// A non-data document returned in place of the requested payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// BoardGameGeek reported an error.
    Error(String),
    /// The request was accepted but the data is not ready yet.
    Pending(String),
}

#[derive(Debug, Deserialize)]
struct RawErrors {
    #[serde(rename = "error", default)]
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(rename = "@message")]
    attribute: Option<String>,
    message: Option<String>,
}

impl RawError {
    fn text(self) -> String {
        self.message
            .or(self.attribute)
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Name of the document's root element.
fn root_element(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Detect error and "please try again later" documents.
pub fn notice(xml: &str) -> Option<Notice> {
    match root_element(xml)?.as_str() {
        "errors" => {
            let raw: RawErrors = quick_xml::de::from_str(xml).ok()?;
            let messages: Vec<String> = raw.errors.into_iter().map(RawError::text).collect();
            Some(Notice::Error(messages.join("; ")))
        }
        "error" => {
            let raw: RawError = quick_xml::de::from_str(xml).ok()?;
            Some(Notice::Error(raw.text()))
        }
        "message" => {
            let raw: RawText = quick_xml::de::from_str(xml).ok()?;
            Some(Notice::Pending(raw.text.trim().to_string()))
        }
        _ => None,
    }
}

// ============================================================================
// search
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(rename = "item", default)]
    items: Vec<RawSearchItem>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "name", default)]
    names: Vec<RawName>,
    yearpublished: Option<RawValue>,
}

/// Decode a `search` response.
pub fn parse_search(xml: &str) -> BggResult<Vec<SearchHit>> {
    let raw: RawSearch = quick_xml::de::from_str(xml)?;
    Ok(raw
        .items
        .into_iter()
        .map(|item| SearchHit {
            id: num(&item.id),
            name: primary_name(&item.names),
            year_published: item
                .yearpublished
                .as_ref()
                .and_then(|y| opt_num(&y.value)),
            kind: item.kind,
        })
        .collect())
}

// ============================================================================
// thing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawThings {
    #[serde(rename = "item", default)]
    items: Vec<RawThing>,
}

#[derive(Debug, Deserialize)]
struct RawThing {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@id", default)]
    id: String,
    thumbnail: Option<String>,
    image: Option<String>,
    #[serde(rename = "name", default)]
    names: Vec<RawName>,
    description: Option<String>,
    yearpublished: Option<RawValue>,
    minplayers: Option<RawValue>,
    maxplayers: Option<RawValue>,
    playingtime: Option<RawValue>,
    minplaytime: Option<RawValue>,
    maxplaytime: Option<RawValue>,
    minage: Option<RawValue>,
    #[serde(rename = "link", default)]
    links: Vec<RawLink>,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@value", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawStatistics {
    ratings: Option<RawRatings>,
}

#[derive(Debug, Deserialize)]
struct RawRatings {
    usersrated: Option<RawValue>,
    average: Option<RawValue>,
    bayesaverage: Option<RawValue>,
    stddev: Option<RawValue>,
    owned: Option<RawValue>,
    trading: Option<RawValue>,
    wanting: Option<RawValue>,
    wishing: Option<RawValue>,
    numcomments: Option<RawValue>,
    numweights: Option<RawValue>,
    averageweight: Option<RawValue>,
    ranks: Option<RawRanks>,
}

#[derive(Debug, Deserialize)]
struct RawRanks {
    #[serde(rename = "rank", default)]
    ranks: Vec<RawRank>,
}

#[derive(Debug, Deserialize)]
struct RawRank {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@friendlyname", default)]
    friendly_name: String,
    #[serde(rename = "@value", default)]
    value: String,
    #[serde(rename = "@bayesaverage", default)]
    bayes_average: String,
}

impl From<RawRatings> for Statistics {
    fn from(raw: RawRatings) -> Self {
        Self {
            users_rated: value_of(&raw.usersrated),
            average: value_of(&raw.average),
            bayes_average: value_of(&raw.bayesaverage),
            std_dev: value_of(&raw.stddev),
            owned: value_of(&raw.owned),
            trading: value_of(&raw.trading),
            wanting: value_of(&raw.wanting),
            wishing: value_of(&raw.wishing),
            num_comments: value_of(&raw.numcomments),
            num_weights: value_of(&raw.numweights),
            average_weight: value_of(&raw.averageweight),
            ranks: raw
                .ranks
                .map(|r| r.ranks)
                .unwrap_or_default()
                .into_iter()
                .map(|r| Rank {
                    value: opt_num(&r.value),
                    bayes_average: opt_num(&r.bayes_average),
                    kind: r.kind,
                    name: r.name,
                    friendly_name: r.friendly_name,
                })
                .collect(),
        }
    }
}

impl From<RawThing> for Thing {
    fn from(raw: RawThing) -> Self {
        let name = primary_name(&raw.names);
        let alternate_names = raw
            .names
            .iter()
            .filter(|n| n.kind == "alternate")
            .map(|n| n.value.clone())
            .collect();

        Self {
            id: num(&raw.id),
            kind: raw.kind,
            name,
            alternate_names,
            description: text_of(raw.description),
            year_published: value_of(&raw.yearpublished),
            min_players: value_of(&raw.minplayers),
            max_players: value_of(&raw.maxplayers),
            playing_time: value_of(&raw.playingtime),
            min_play_time: value_of(&raw.minplaytime),
            max_play_time: value_of(&raw.maxplaytime),
            min_age: value_of(&raw.minage),
            thumbnail: text_of(raw.thumbnail),
            image: text_of(raw.image),
            links: raw
                .links
                .into_iter()
                .map(|l| Link {
                    id: num(&l.id),
                    kind: l.kind,
                    value: l.value,
                })
                .collect(),
            statistics: raw
                .statistics
                .and_then(|s| s.ratings)
                .map(Statistics::from),
        }
    }
}

/// Decode a `thing` response.
pub fn parse_things(xml: &str) -> BggResult<Vec<Thing>> {
    let raw: RawThings = quick_xml::de::from_str(xml)?;
    Ok(raw.items.into_iter().map(Thing::from).collect())
}

// ============================================================================
// collection
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "item", default)]
    items: Vec<RawCollectionItem>,
}

#[derive(Debug, Deserialize)]
struct RawCollectionItem {
    #[serde(rename = "@objectid", default)]
    object_id: String,
    #[serde(rename = "@subtype", default)]
    subtype: String,
    #[serde(rename = "@collid", default)]
    coll_id: String,
    name: Option<RawText>,
    yearpublished: Option<String>,
    image: Option<String>,
    thumbnail: Option<String>,
    stats: Option<RawCollectionStats>,
    status: Option<RawStatus>,
    numplays: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCollectionStats {
    rating: Option<RawCollectionRating>,
}

#[derive(Debug, Deserialize)]
struct RawCollectionRating {
    #[serde(rename = "@value", default)]
    value: String,
    average: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatus {
    #[serde(rename = "@own", default)]
    own: String,
    #[serde(rename = "@prevowned", default)]
    prev_owned: String,
    #[serde(rename = "@fortrade", default)]
    for_trade: String,
    #[serde(rename = "@want", default)]
    want: String,
    #[serde(rename = "@wanttoplay", default)]
    want_to_play: String,
    #[serde(rename = "@wanttobuy", default)]
    want_to_buy: String,
    #[serde(rename = "@wishlist", default)]
    wishlist: String,
    #[serde(rename = "@wishlistpriority", default)]
    wishlist_priority: String,
    #[serde(rename = "@preordered", default)]
    preordered: String,
    #[serde(rename = "@lastmodified", default)]
    last_modified: String,
}

fn flag(raw: &str) -> bool {
    raw.trim() == "1"
}

impl From<RawStatus> for CollectionStatus {
    fn from(raw: RawStatus) -> Self {
        Self {
            own: flag(&raw.own),
            prev_owned: flag(&raw.prev_owned),
            for_trade: flag(&raw.for_trade),
            want: flag(&raw.want),
            want_to_play: flag(&raw.want_to_play),
            want_to_buy: flag(&raw.want_to_buy),
            wishlist: flag(&raw.wishlist),
            wishlist_priority: opt_num(&raw.wishlist_priority),
            preordered: flag(&raw.preordered),
            last_modified: raw.last_modified,
        }
    }
}

impl From<RawCollectionItem> for CollectionItem {
    fn from(raw: RawCollectionItem) -> Self {
        let rating = raw.stats.and_then(|s| s.rating);
        // "N/A" when the user has not rated the game.
        let user_rating = rating.as_ref().and_then(|r| opt_num::<f64>(&r.value));
        let bgg_rating = rating
            .as_ref()
            .and_then(|r| r.average.as_ref())
            .and_then(|a| opt_num::<f64>(&a.value))
            .filter(|avg| *avg > 0.0);

        Self {
            game_id: num(&raw.object_id),
            collection_id: num(&raw.coll_id),
            name: raw.name.map(|n| n.text.trim().to_string()).unwrap_or_default(),
            subtype: raw.subtype,
            year_published: raw.yearpublished.as_deref().map(num).unwrap_or_default(),
            image: text_of(raw.image),
            thumbnail: text_of(raw.thumbnail),
            status: raw.status.unwrap_or_default().into(),
            num_plays: raw.numplays.as_deref().map(num).unwrap_or_default(),
            user_rating,
            bgg_rating,
        }
    }
}

/// Decode a `collection` response.
pub fn parse_collection(xml: &str) -> BggResult<Vec<CollectionItem>> {
    let raw: RawCollection = quick_xml::de::from_str(xml)?;
    Ok(raw.items.into_iter().map(CollectionItem::from).collect())
}

// ============================================================================
// user
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@name", default)]
    name: String,
    firstname: Option<RawValue>,
    lastname: Option<RawValue>,
    avatarlink: Option<RawValue>,
    yearregistered: Option<RawValue>,
    lastlogin: Option<RawValue>,
    stateorprovince: Option<RawValue>,
    country: Option<RawValue>,
    webaddress: Option<RawValue>,
    traderating: Option<RawValue>,
    marketrating: Option<RawValue>,
}

fn string_of(raw: &Option<RawValue>) -> String {
    raw.as_ref().map(|v| v.value.trim().to_string()).unwrap_or_default()
}

/// Decode a `user` response. BoardGameGeek answers unknown users with an
/// empty `id` attribute rather than an error.
pub fn parse_user(xml: &str, requested: &str) -> BggResult<User> {
    let raw: RawUser = quick_xml::de::from_str(xml)?;
    let id: u64 = num(&raw.id);
    if id == 0 {
        return Err(BggError::not_found(format!("user '{}'", requested)));
    }

    let avatar_link = string_of(&raw.avatarlink);
    Ok(User {
        id,
        name: raw.name,
        first_name: string_of(&raw.firstname),
        last_name: string_of(&raw.lastname),
        avatar_link: if avatar_link == "N/A" {
            String::new()
        } else {
            avatar_link
        },
        year_registered: value_of(&raw.yearregistered),
        last_login: string_of(&raw.lastlogin),
        state_or_province: string_of(&raw.stateorprovince),
        country: string_of(&raw.country),
        web_address: string_of(&raw.webaddress),
        trade_rating: value_of(&raw.traderating),
        market_rating: value_of(&raw.marketrating),
    })
}

// ============================================================================
// hot
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawHot {
    #[serde(rename = "item", default)]
    items: Vec<RawHotItem>,
}

#[derive(Debug, Deserialize)]
struct RawHotItem {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@rank", default)]
    rank: String,
    thumbnail: Option<RawValue>,
    name: Option<RawValue>,
    yearpublished: Option<RawValue>,
}

/// Decode a `hot` response.
pub fn parse_hot(xml: &str) -> BggResult<Vec<HotItem>> {
    let raw: RawHot = quick_xml::de::from_str(xml)?;
    Ok(raw
        .items
        .into_iter()
        .map(|item| HotItem {
            id: num(&item.id),
            rank: num(&item.rank),
            name: string_of(&item.name),
            year_published: item
                .yearpublished
                .as_ref()
                .and_then(|y| opt_num(&y.value)),
            thumbnail: string_of(&item.thumbnail),
        })
        .collect())
}

// ============================================================================
// forumlist / forum
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawForumList {
    #[serde(rename = "forum", default)]
    forums: Vec<RawForumSummary>,
}

#[derive(Debug, Deserialize)]
struct RawForumSummary {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@title", default)]
    title: String,
    #[serde(rename = "@description", default)]
    description: String,
    #[serde(rename = "@numthreads", default)]
    num_threads: String,
    #[serde(rename = "@numposts", default)]
    num_posts: String,
    #[serde(rename = "@lastpostdate", default)]
    last_post_date: String,
    #[serde(rename = "@noposting", default)]
    no_posting: String,
}

/// Decode a `forumlist` response.
pub fn parse_forum_list(xml: &str) -> BggResult<Vec<ForumSummary>> {
    let raw: RawForumList = quick_xml::de::from_str(xml)?;
    Ok(raw
        .forums
        .into_iter()
        .map(|f| ForumSummary {
            id: num(&f.id),
            num_threads: num(&f.num_threads),
            num_posts: num(&f.num_posts),
            no_posting: flag(&f.no_posting),
            title: f.title,
            description: f.description,
            last_post_date: f.last_post_date,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct RawForum {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@title", default)]
    title: String,
    #[serde(rename = "@numthreads", default)]
    num_threads: String,
    #[serde(rename = "@numposts", default)]
    num_posts: String,
    threads: Option<RawThreads>,
}

#[derive(Debug, Deserialize)]
struct RawThreads {
    #[serde(rename = "thread", default)]
    threads: Vec<RawThreadSummary>,
}

#[derive(Debug, Deserialize)]
struct RawThreadSummary {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@subject", default)]
    subject: String,
    #[serde(rename = "@author", default)]
    author: String,
    #[serde(rename = "@numarticles", default)]
    num_articles: String,
    #[serde(rename = "@postdate", default)]
    post_date: String,
    #[serde(rename = "@lastpostdate", default)]
    last_post_date: String,
}

/// Decode one page of a `forum` response.
pub fn parse_forum(xml: &str) -> BggResult<Forum> {
    let raw: RawForum = quick_xml::de::from_str(xml)?;
    Ok(Forum {
        id: num(&raw.id),
        title: raw.title,
        num_threads: num(&raw.num_threads),
        num_posts: num(&raw.num_posts),
        threads: raw
            .threads
            .map(|t| t.threads)
            .unwrap_or_default()
            .into_iter()
            .map(|t| ThreadSummary {
                id: num(&t.id),
                num_articles: num(&t.num_articles),
                subject: t.subject,
                author: t.author,
                post_date: t.post_date,
                last_post_date: t.last_post_date,
            })
            .collect(),
    })
}

// ============================================================================
// thread
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawThread {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@numarticles", default)]
    num_articles: String,
    #[serde(rename = "@link", default)]
    link: String,
    subject: Option<String>,
    articles: Option<RawArticles>,
}

#[derive(Debug, Deserialize)]
struct RawArticles {
    #[serde(rename = "article", default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@username", default)]
    username: String,
    #[serde(rename = "@link", default)]
    link: String,
    #[serde(rename = "@postdate", default)]
    post_date: String,
    #[serde(rename = "@editdate", default)]
    edit_date: String,
    #[serde(rename = "@numedits", default)]
    num_edits: String,
    subject: Option<String>,
    body: Option<String>,
}

/// Decode a `thread` response.
pub fn parse_thread(xml: &str, requested: u64) -> BggResult<ThreadDetail> {
    let raw: RawThread = quick_xml::de::from_str(xml)?;
    let id: u64 = num(&raw.id);
    if id == 0 {
        return Err(BggError::not_found(format!("thread {}", requested)));
    }

    Ok(ThreadDetail {
        id,
        subject: text_of(raw.subject),
        num_articles: num(&raw.num_articles),
        link: raw.link,
        articles: raw
            .articles
            .map(|a| a.articles)
            .unwrap_or_default()
            .into_iter()
            .map(|a| Article {
                id: num(&a.id),
                num_edits: num(&a.num_edits),
                username: a.username,
                link: a.link,
                post_date: a.post_date,
                edit_date: a.edit_date,
                subject: text_of(a.subject),
                body: text_of(a.body),
            })
            .collect(),
    })
}
