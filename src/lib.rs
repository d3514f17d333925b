//! esbuilder – a fluent, ORM-like filter API compiled into search engine requests.
//!
//! Filters are gathered on a [`builder::Builder`], compiled into one
//! [`compile::SearchRequest`] of the shape
//! `{index, type, body: {query: {bool: {must, must_not}}, sort}, size, from, _source?}`,
//! sent through a [`interface::SearchClient`] and the hits are rebuilt into
//! typed records.
//!
//! ## Modules
//! * [`builder`] – The chainable accumulator and the `fetch_*` operations.
//! * [`compile`] – Accumulated state, the pure [`compile::Compiler`] and the request document.
//! * [`construct`] – Operator table, range kinds, sort directions and clause shapes.
//! * [`datatype`] – Temporal parsing/formatting and the [`datatype::Attributes`] of a hit.
//! * [`interface`] – Search client boundary, hit/total extraction and rehydration.
//! * [`persist`] – The [`persist::Model`] schema trait and relation [`persist::Loader`]s.
//! * [`page`] – Length aware [`page::Page`] results.
//! * [`settings`] – [`settings::Settings`] read through the `config` crate.
//!
//! ## Translation rules
//! * `equals(f, v)` and `include_values` accumulate per field; one distinct value
//!   compiles to `term`, several to `terms`, none to an empty clause.
//! * `exclude_values` and `!=` do the same inside `must_not`.
//! * `>`, `>=`, `<`, `<=` take moments, normalised to ISO 8601, and all bounds of
//!   one field merge into a single `range` clause.
//! * `like` turns `%` into `.*` and becomes a `regexp` clause.
//! * Soft deleting models get their delete marker pinned to a sentinel unless
//!   `include_soft_deleted` was called.
//! * Paginated fetches ask for `per_page` records from `per_page × (page − 1)`,
//!   anything else for up to `track_total_hits` records from zero.
//!
//! ## Quick Start
//! ```
//! use esbuilder::{Attributes, Builder, Clause, Model, Result, SearchRequest, Settings};
//! use esbuilder::error::BoxError;
//! use serde_json::{json, Value};
//!
//! struct Post;
//! impl Model for Post {
//!     const TABLE: &'static str = "posts";
//!     const SOFT_DELETES: bool = true;
//!     fn hydrate(_: Attributes) -> Result<Self> { Ok(Post) }
//! }
//!
//! let client = |_: &SearchRequest| -> std::result::Result<Value, BoxError> { Ok(json!({})) };
//! let settings = Settings::default();
//! let request = Builder::<Post>::new(&client, &settings)
//!     .equals("author", 7)
//!     .compare("published_at", ">=", "2024-01-01")
//!     .unwrap()
//!     .compile();
//! assert_eq!(request.must().len(), 3);
//! assert!(matches!(request.must()[1], Clause::Term { ref field, .. } if field == "deleted_at"));
//! ```

pub mod builder;
pub mod compile;
pub mod construct;
pub mod datatype;
pub mod error;
pub mod interface;
pub mod page;
pub mod persist;
pub mod settings;

pub use builder::{Builder, Relations};
pub use compile::{Compiler, QueryState, ResultWindow, SearchRequest};
pub use construct::{Clause, Direction, Operator, RangeKind, SortClause};
pub use datatype::{Attribute, Attributes, Timestamp};
pub use error::{EsBuilderError, Result};
pub use interface::{PathResolver, SearchClient};
pub use page::Page;
pub use persist::{Loader, Model};
pub use settings::Settings;
