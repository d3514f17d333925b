//! The fluent filter API.
//!
//! A [`Builder`] collects filters, sorting, relations and pagination for one
//! query expression without interpreting them. Every call hands the builder
//! back so calls chain; the fetch calls consume it, compile the collected
//! state, run the request and rebuild the records.
//!
//! ```
//! use esbuilder::{Attributes, Builder, Direction, Model, Result, SearchRequest, Settings};
//! use esbuilder::error::BoxError;
//! use serde_json::{json, Value};
//!
//! struct User { name: Option<String> }
//! impl Model for User {
//!     const TABLE: &'static str = "users";
//!     fn hydrate(attributes: Attributes) -> Result<Self> {
//!         Ok(User { name: attributes.string("name") })
//!     }
//! }
//!
//! let client = |_: &SearchRequest| -> std::result::Result<Value, BoxError> {
//!     Ok(json!({"hits": {"total": {"value": 1}, "hits": [{"_source": {"name": "Alice"}}]}}))
//! };
//! let settings = Settings::default();
//! let users = Builder::<User>::new(&client, &settings)
//!     .equals("status", "active")
//!     .sort_by("created_at", Direction::Desc)
//!     .fetch_many(None)
//!     .unwrap();
//! assert_eq!(users[0].name.as_deref(), Some("Alice"));
//! ```

use serde_json::Value;
use tracing::{info, warn};

use std::fmt;
use std::marker::PhantomData;
use std::time::Instant;

use crate::compile::{Compiler, QueryState, SearchRequest};
use crate::construct::{Direction, Operator, PatternFilter, RangeFilter, SortClause};
use crate::datatype::{parse_time_value, to_iso8601};
use crate::error::Result;
use crate::interface::{self, PathResolver, SearchClient};
use crate::page::Page;
use crate::persist::{Loader, Model};
use crate::settings::Settings;

/// Names of relations to load once records are fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations(Vec<String>);

impl Relations {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Relations {
    fn from(relation: &str) -> Self {
        Relations(vec![relation.to_string()])
    }
}
impl From<String> for Relations {
    fn from(relation: String) -> Self {
        Relations(vec![relation])
    }
}
impl From<&[&str]> for Relations {
    fn from(relations: &[&str]) -> Self {
        Relations(relations.iter().map(|r| r.to_string()).collect())
    }
}
impl<const N: usize> From<[&str; N]> for Relations {
    fn from(relations: [&str; N]) -> Self {
        Relations(relations.iter().map(|r| r.to_string()).collect())
    }
}
impl From<Vec<&str>> for Relations {
    fn from(relations: Vec<&str>) -> Self {
        Relations::from(relations.as_slice())
    }
}
impl From<Vec<String>> for Relations {
    fn from(relations: Vec<String>) -> Self {
        Relations(relations)
    }
}

pub struct Builder<'a, M: Model> {
    client: &'a dyn SearchClient,
    loader: Option<&'a dyn Loader<M>>,
    paths: Option<&'a dyn PathResolver>,
    compiler: Compiler,
    base_path: String,
    page_name: String,
    state: QueryState,
    model: PhantomData<M>,
}

impl<'a, M: Model> Builder<'a, M> {
    pub fn new(client: &'a dyn SearchClient, settings: &Settings) -> Self {
        Self {
            client,
            loader: None,
            paths: None,
            compiler: Compiler::new(settings),
            base_path: settings.base_path.clone(),
            page_name: settings.page_name.clone(),
            state: QueryState::new(settings.per_page),
            model: PhantomData,
        }
    }

    /// Needed as soon as relations are eager loaded.
    pub fn with_loader(mut self, loader: &'a dyn Loader<M>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Where page links point to; defaults to the configured base path.
    pub fn with_paths(mut self, paths: &'a dyn PathResolver) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The document the current state compiles to.
    pub fn compile(&self) -> SearchRequest {
        self.compiler.compile::<M>(&self.state)
    }

    /// Accepts records whose `field` equals `value`, or any of its elements
    /// when `value` is an array. Repeated calls on a field widen the accepted set.
    pub fn equals(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.state.equality.union(field, value.into());
        self
    }

    /// The operator form: `=`, `!=`/`<>`, `>`, `>=`, `<`, `<=` and `like`.
    /// Comparisons take a moment (see [`crate::datatype::parse_time`]) and fail
    /// right away when it cannot be parsed. Unknown operators are ignored.
    pub fn compare(
        mut self,
        field: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let value = value.into();
        match Operator::parse(operator) {
            Some(Operator::Eq) => return Ok(self.equals(field, value)),
            Some(Operator::Ne) => return Ok(self.exclude_values(field, [value])),
            Some(Operator::Range(kind)) => {
                let moment = parse_time_value(&value)?;
                self.state.ranges.push(RangeFilter {
                    field: field.to_string(),
                    kind,
                    value: to_iso8601(&moment),
                });
            }
            Some(Operator::Like) => {
                let like = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                self.state.patterns.push(PatternFilter::from_like(field, &like));
            }
            None => {
                warn!(field, operator, "unsupported operator, filter ignored");
            }
        }
        Ok(self)
    }

    pub fn exclude_values<V: Into<Value>>(
        mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.state.exclusion.union(field, Value::Array(values));
        self
    }

    pub fn include_values<V: Into<Value>>(
        mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.state.equality.union(field, Value::Array(values));
        self
    }

    /// Earlier calls take priority over later ones.
    pub fn sort_by(mut self, field: &str, direction: Direction) -> Self {
        self.state.sort.push(SortClause {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Makes soft deleted records visible. Does nothing for models that are
    /// not soft deleted.
    pub fn include_soft_deleted(mut self) -> Self {
        if M::SOFT_DELETES {
            self.state.with_trashed = true;
        }
        self
    }

    /// Replaces the relations to load after fetching.
    pub fn eager_load(mut self, relations: impl Into<Relations>) -> Self {
        self.state.relations = relations.into().into_vec();
        self
    }

    pub fn fetch_one(self, fields: Option<&[&str]>) -> Result<Option<M>> {
        Ok(self.fetch_many(fields)?.into_iter().next())
    }

    /// Every matching record, up to the configured ceiling.
    pub fn fetch_many(mut self, fields: Option<&[&str]>) -> Result<Vec<M>> {
        self.state.paginate = false;
        self.select(fields);
        let (records, _) = self.run()?;
        Ok(records)
    }

    /// Page `page` of `per_page` records; pages below one mean the first page.
    pub fn fetch_page(
        mut self,
        per_page: u64,
        fields: Option<&[&str]>,
        page: i64,
    ) -> Result<Page<M>> {
        self.state.paginate = true;
        self.state.per_page = per_page;
        self.state.page = page;
        self.select(fields);
        let (records, total) = self.run()?;
        let path = match self.paths {
            Some(paths) => paths.current_path(),
            None => self.base_path.clone(),
        };
        Ok(Page::new(records, total, per_page, page, path, self.page_name))
    }

    // `None` or `["*"]` keep every field
    fn select(&mut self, fields: Option<&[&str]>) {
        if let Some(fields) = fields {
            if !matches!(fields, ["*"]) {
                self.state.source = Some(fields.iter().map(|f| f.to_string()).collect());
            }
        }
    }

    fn run(&self) -> Result<(Vec<M>, u64)> {
        let started = Instant::now();
        let request = self.compile();
        let response = interface::execute(self.client, &request)?;
        let total = interface::extract_total(&response);
        let mut records = interface::rehydrate::<M>(interface::extract_hits(&response))?;
        interface::eager_load_if_requested(&mut records, &self.state.relations, self.loader)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            index = request.index(),
            rows = records.len(),
            total,
            ms = elapsed_ms,
            "search complete"
        );
        Ok((records, total))
    }
}

impl<M: Model> fmt::Debug for Builder<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Builder")
            .field("model", &M::TABLE)
            .field("compiler", &self.compiler)
            .field("state", &self.state)
            .finish()
    }
}
