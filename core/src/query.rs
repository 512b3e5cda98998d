//! Query-string builder.
//!
//! Parameters are kept in insertion order. Only values that are present end
//! up in the rendered string, so optional arguments never need their own
//! branch at the call site.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in free-text values: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a free-text query value. Spaces become `%20`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value verbatim.
    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a free-text value, percent-encoded.
    pub fn encoded(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), encode_component(value)));
        self
    }

    /// Append a value verbatim if present. An empty value counts as absent.
    pub fn opt(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Append `key=value` only when `enabled` is true.
    pub fn flag(self, key: &str, value: &str, enabled: bool) -> Self {
        if enabled {
            self.param(key, value)
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Renders `?k=v&k=v`, or nothing when empty.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str("?")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
