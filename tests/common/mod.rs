#![allow(dead_code)]

use std::cell::RefCell;

use esbuilder::error::BoxError;
use esbuilder::{Attributes, EsBuilderError, Model, Result, SearchClient, SearchRequest, Timestamp};
use serde_json::{json, Value};

/// Replays one canned response and keeps every request it was sent.
pub struct FakeClient {
    response: Value,
    pub requests: RefCell<Vec<SearchRequest>>,
}

impl FakeClient {
    pub fn new(response: Value) -> Self {
        Self { response, requests: RefCell::new(Vec::new()) }
    }
    pub fn empty() -> Self {
        Self::new(json!({}))
    }
    pub fn with_hits(total: u64, sources: Vec<Value>) -> Self {
        let hits: Vec<Value> = sources.into_iter().map(|s| json!({ "_source": s })).collect();
        Self::new(json!({ "hits": { "total": { "value": total }, "hits": hits } }))
    }
    pub fn last_request(&self) -> SearchRequest {
        self.requests.borrow().last().cloned().expect("no request was sent")
    }
}

impl SearchClient for FakeClient {
    fn search(&self, request: &SearchRequest) -> std::result::Result<Value, BoxError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.response.clone())
    }
}

/// A client that is never reachable.
pub struct DownClient;

#[derive(Debug)]
pub struct Unavailable;

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "search engine unavailable")
    }
}
impl std::error::Error for Unavailable {}

impl SearchClient for DownClient {
    fn search(&self, _: &SearchRequest) -> std::result::Result<Value, BoxError> {
        Err(Box::new(Unavailable))
    }
}

/// Plain records, no soft deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<Timestamp>,
    pub posts: Vec<String>,
}

impl Model for User {
    const TABLE: &'static str = "users";
    fn hydrate(attributes: Attributes) -> Result<Self> {
        Ok(User {
            id: attributes.integer("id"),
            name: attributes.string("name"),
            status: attributes.string("status"),
            created_at: attributes.time("created_at"),
            posts: Vec::new(),
        })
    }
}

/// Soft deleted records living in their own index.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: Option<String>,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

impl Model for Post {
    const TABLE: &'static str = "posts";
    const INDEX: Option<&'static str> = Some("blog_posts");
    const SOFT_DELETES: bool = true;
    const DATES: &'static [&'static str] = &["published_at", "deleted_at"];
    fn hydrate(attributes: Attributes) -> Result<Self> {
        Ok(Post {
            title: attributes.string("title"),
            published_at: attributes.time("published_at"),
            deleted_at: attributes.time("deleted_at"),
        })
    }
}

/// Soft deleted with its own not-deleted sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment;

impl Model for Comment {
    const TABLE: &'static str = "comments";
    const SOFT_DELETES: bool = true;
    const NULLABLE_DATE: Option<&'static str> = Some("0001-01-01T00:00:00+00:00");
    fn hydrate(attributes: Attributes) -> Result<Self> {
        match attributes.string("body") {
            Some(_) => Ok(Comment),
            None => Err(EsBuilderError::Persistence("comment without body".into())),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
