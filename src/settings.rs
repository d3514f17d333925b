//! Settings for the query layer, read through the `config` crate.
//!
//! Every value has a default, so `Settings::default()` works without any file.
//! [`Settings::load`] layers an optional file (toml, json, yaml, ...) and then
//! `ESBUILDER_`-prefixed environment variables on top of those defaults, e.g.
//! `ESBUILDER_TRACK_TOTAL_HITS=500`.

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_TRACK_TOTAL_HITS: u64 = 10_000;
pub const DEFAULT_NULLABLE_DATE: &str = "1970-01-01T00:00:00+08:00";
pub const DEFAULT_DOCUMENT_TYPE: &str = "_doc";
pub const DEFAULT_PER_PAGE: u64 = 15;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fetch size used when results are not paginated.
    pub track_total_hits: u64,
    /// Value stored in the delete marker of records that are not deleted.
    pub nullable_date: String,
    pub document_type: String,
    pub per_page: u64,
    pub base_path: String,
    pub page_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            track_total_hits: DEFAULT_TRACK_TOTAL_HITS,
            nullable_date: DEFAULT_NULLABLE_DATE.to_string(),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            base_path: "/".to_string(),
            page_name: "page".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path` (the extension picks the format, a missing
    /// file is fine) overlaid with the environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ESBUILDER").try_parsing(true))
            .build()?;
        let settings: Settings = settings.try_deserialize()?;
        debug!(?settings, path, "settings loaded");
        Ok(settings)
    }
}
