//! Argument types for the endpoint catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// External database a show can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    TvRage,
    TheTvdb,
}

impl LookupSource {
    /// Query parameter name used by `/lookup/shows`.
    pub fn as_str(self) -> &'static str {
        match self {
            LookupSource::TvRage => "tvrage",
            LookupSource::TheTvdb => "thetvdb",
        }
    }
}

impl fmt::Display for LookupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
