//! Compilation of accumulated filter state into a search request.
//!
//! [`QueryState`] is plain data gathered by the builder. [`Compiler::compile`]
//! turns it into a [`SearchRequest`] without touching the state, so compiling
//! the same state twice yields identical documents. The order of the steps
//! matters:
//!
//! 1. soft delete visibility is resolved into the equality filters,
//! 2. equality and exclusion filters become `term`/`terms` clauses,
//! 3. the result window is derived from the pagination mode,
//! 4. range filters are grouped per field into one `range` clause each,
//! 5. every pattern filter becomes its own `regexp` clause,
//! 6. `must` is equality ++ range ++ pattern clauses, `must_not` the exclusions.

use serde::Serialize;
use tracing::debug;

use crate::construct::{Clause, FieldValues, PatternFilter, RangeFilter, RangeKind, SortClause};
use crate::persist::Model;
use crate::settings::{DEFAULT_PER_PAGE, Settings};

/// Everything the builder accumulates for one query expression.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub equality: FieldValues,
    pub exclusion: FieldValues,
    pub ranges: Vec<RangeFilter>,
    pub patterns: Vec<PatternFilter>,
    pub sort: Vec<SortClause>,
    pub relations: Vec<String>,
    pub with_trashed: bool,
    /// `None` returns every field.
    pub source: Option<Vec<String>>,
    pub per_page: u64,
    pub page: i64,
    pub paginate: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl QueryState {
    pub fn new(per_page: u64) -> Self {
        Self {
            equality: FieldValues::new(),
            exclusion: FieldValues::new(),
            ranges: Vec::new(),
            patterns: Vec::new(),
            sort: Vec::new(),
            relations: Vec::new(),
            with_trashed: false,
            source: None,
            per_page,
            page: 1,
            paginate: true,
        }
    }
}

/// The `{offset, limit}` slice of matching records a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultWindow {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
    pub must_not: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryBody {
    #[serde(rename = "bool")]
    pub boolean: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    pub query: QueryBody,
    pub sort: Vec<SortClause>,
}

/// The compiled document, shaped exactly as the search client expects it:
/// `{index, type, body: {query: {bool: {must, must_not}}, sort}, size, from, _source?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub index: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub body: SearchBody,
    pub size: u64,
    pub from: u64,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
}

impl SearchRequest {
    pub fn index(&self) -> &str {
        &self.index
    }
    pub fn must(&self) -> &[Clause] {
        &self.body.query.boolean.must
    }
    pub fn must_not(&self) -> &[Clause] {
        &self.body.query.boolean.must_not
    }
    pub fn sort(&self) -> &[SortClause] {
        &self.body.sort
    }
    pub fn source(&self) -> Option<&[String]> {
        self.source.as_deref()
    }
    pub fn window(&self) -> ResultWindow {
        ResultWindow { offset: self.from, limit: self.size }
    }
    pub fn to_json(&self) -> serde_json::Value {
        // a derived Serialize over strings, numbers and JSON values cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compiler {
    track_total_hits: u64,
    nullable_date: String,
    document_type: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Compiler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            track_total_hits: settings.track_total_hits,
            nullable_date: settings.nullable_date.clone(),
            document_type: settings.document_type.clone(),
        }
    }

    pub fn track_total_hits(&self) -> u64 {
        self.track_total_hits
    }

    pub fn compile<M: Model>(&self, state: &QueryState) -> SearchRequest {
        let equality = self.resolve_soft_delete::<M>(state);
        let window = self.window(state);

        let mut must: Vec<Clause> = equality
            .iter()
            .map(|(field, values)| Clause::matching(field, values))
            .collect();
        must.extend(group_ranges(&state.ranges));
        must.extend(state.patterns.iter().map(|p| Clause::Regexp {
            field: p.field.clone(),
            pattern: p.pattern.clone(),
        }));
        let must_not: Vec<Clause> = state
            .exclusion
            .iter()
            .map(|(field, values)| Clause::matching(field, values))
            .collect();

        debug!(
            index = M::index(),
            from = window.offset,
            size = window.limit,
            must = must.len(),
            must_not = must_not.len(),
            "compiled search request"
        );
        SearchRequest {
            index: M::index().to_string(),
            document_type: self.document_type.clone(),
            body: SearchBody {
                query: QueryBody {
                    boolean: BoolQuery { must, must_not },
                },
                sort: state.sort.clone(),
            },
            size: window.limit,
            from: window.offset,
            source: state.source.clone(),
        }
    }

    /// Pins the delete marker to the not-deleted sentinel, or drops any
    /// filter on it once trashed records were asked for. Models without soft
    /// deletes are left untouched.
    fn resolve_soft_delete<M: Model>(&self, state: &QueryState) -> FieldValues {
        let mut equality = state.equality.clone();
        if !M::SOFT_DELETES {
            return equality;
        }
        if state.with_trashed {
            equality.remove(M::DELETED_AT);
        } else {
            let sentinel = M::NULLABLE_DATE.unwrap_or(self.nullable_date.as_str());
            equality.replace(M::DELETED_AT, vec![sentinel.into()]);
        }
        equality
    }

    /// `size` is the page size when paginating, otherwise the configured
    /// ceiling. A page number below one counts as the first page.
    pub fn window(&self, state: &QueryState) -> ResultWindow {
        if !state.paginate {
            return ResultWindow { offset: 0, limit: self.track_total_hits };
        }
        let skipped = u64::try_from(state.page.saturating_sub(1)).unwrap_or(0);
        ResultWindow {
            offset: state.per_page.saturating_mul(skipped),
            limit: state.per_page,
        }
    }
}

/// One `range` clause per field, holding all of that field's bounds. A kind
/// given twice for the same field keeps its first position and its last value.
fn group_ranges(ranges: &[RangeFilter]) -> Vec<Clause> {
    let mut grouped: Vec<(String, Vec<(RangeKind, String)>)> = Vec::new();
    for range in ranges {
        let position = match grouped.iter().position(|(field, _)| *field == range.field) {
            Some(position) => position,
            None => {
                grouped.push((range.field.clone(), Vec::new()));
                grouped.len() - 1
            }
        };
        let bounds = &mut grouped[position].1;
        match bounds.iter_mut().find(|(kind, _)| *kind == range.kind) {
            Some(bound) => bound.1 = range.value.clone(),
            None => bounds.push((range.kind, range.value.clone())),
        }
    }
    grouped
        .into_iter()
        .map(|(field, bounds)| Clause::Range { field, bounds })
        .collect()
}
