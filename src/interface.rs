//! The boundary towards the search engine.
//!
//! The engine itself is reached through a [`SearchClient`], which owns the
//! connection, retries and timeouts. This module only hands it a compiled
//! [`SearchRequest`], picks the hits and the total out of whatever comes back,
//! and rebuilds typed records from the hits.

use serde_json::{Map, Value};

use crate::compile::SearchRequest;
use crate::datatype::Attributes;
use crate::error::{BoxError, EsBuilderError, Result};
use crate::persist::{Loader, Model};
use crate::settings::Settings;

/// A connection to the search engine. The response is the raw JSON document,
/// exposing `hits.hits[*]._source` and `hits.total.value`.
pub trait SearchClient {
    fn search(&self, request: &SearchRequest) -> std::result::Result<Value, BoxError>;
}

impl<F> SearchClient for F
where
    F: Fn(&SearchRequest) -> std::result::Result<Value, BoxError>,
{
    fn search(&self, request: &SearchRequest) -> std::result::Result<Value, BoxError> {
        self(request)
    }
}

/// Resolves the base path of the current request, used for page links.
pub trait PathResolver {
    fn current_path(&self) -> String;
}

impl PathResolver for Settings {
    fn current_path(&self) -> String {
        self.base_path.clone()
    }
}

impl PathResolver for String {
    fn current_path(&self) -> String {
        self.clone()
    }
}

/// Sends the request. Client errors are handed back untouched.
pub fn execute(client: &dyn SearchClient, request: &SearchRequest) -> Result<Value> {
    client.search(request).map_err(EsBuilderError::Engine)
}

/// The `_source` of every hit, in engine order. Anything missing or of the
/// wrong shape simply contributes nothing.
pub fn extract_hits(response: &Value) -> Vec<Map<String, Value>> {
    response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| {
                    hit.get("_source")
                        .and_then(Value::as_object)
                        .cloned()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `hits.total.value`, or the older plain `hits.total`, or zero.
pub fn extract_total(response: &Value) -> u64 {
    response
        .pointer("/hits/total/value")
        .or_else(|| response.pointer("/hits/total"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// One record per hit, order preserved. The fields `M` declares as dates are
/// parsed into timestamps before the record is built.
pub fn rehydrate<M: Model>(sources: Vec<Map<String, Value>>) -> Result<Vec<M>> {
    sources
        .into_iter()
        .map(|source| M::hydrate(Attributes::from_source(source, M::DATES)?))
        .collect()
}

/// Loads `relations` onto `records` when any were asked for.
pub fn eager_load_if_requested<M: Model>(
    records: &mut [M],
    relations: &[String],
    loader: Option<&dyn Loader<M>>,
) -> Result<()> {
    if relations.is_empty() {
        return Ok(());
    }
    match loader {
        Some(loader) => loader.load(records, relations),
        None => Err(EsBuilderError::Persistence(format!(
            "relations {:?} requested on {} without a loader",
            relations,
            M::TABLE
        ))),
    }
}
