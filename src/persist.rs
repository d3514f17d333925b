//! The record side of the query layer.
//!
//! A [`Model`] describes how its records are stored in the search engine and
//! how they are built again from a hit. Everything a query needs to know about
//! a record type is declared statically, once per type, through associated
//! constants, in the same spirit as `UID`/`DATA_TYPE` on a data type.
//!
//! Relations are not part of the index, so loading them is delegated to a
//! [`Loader`] supplied by whatever persistence layer owns the records.

use crate::datatype::Attributes;
use crate::error::Result;

/// The temporal fields every record carries unless told otherwise.
pub const DEFAULT_DATES: &[&str] = &["created_at", "updated_at"];
pub const DEFAULT_SOFT_DELETE_DATES: &[&str] = &["created_at", "updated_at", "deleted_at"];

pub trait Model: Sized {
    // static stuff which needs to be implemented downstream
    const TABLE: &'static str;
    fn hydrate(attributes: Attributes) -> Result<Self>;

    // overridable defaults
    /// Fields parsed into timestamps on the way back.
    const DATES: &'static [&'static str] = if Self::SOFT_DELETES {
        DEFAULT_SOFT_DELETE_DATES
    } else {
        DEFAULT_DATES
    };
    /// Whether records are soft deleted rather than removed.
    const SOFT_DELETES: bool = false;
    const DELETED_AT: &'static str = "deleted_at";
    /// Overrides the configured not-deleted sentinel.
    const NULLABLE_DATE: Option<&'static str> = None;
    /// Overrides the index name, which otherwise is the table name.
    const INDEX: Option<&'static str> = None;

    fn index() -> &'static str {
        Self::INDEX.unwrap_or(Self::TABLE)
    }
}

/// Loads named relations onto records that were just rehydrated.
pub trait Loader<M: Model> {
    fn load(&self, records: &mut [M], relations: &[String]) -> Result<()>;
}

impl<M: Model, F> Loader<M> for F
where
    F: Fn(&mut [M], &[String]) -> Result<()>,
{
    fn load(&self, records: &mut [M], relations: &[String]) -> Result<()> {
        self(records, relations)
    }
}
