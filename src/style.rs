//! Rule-based styling: map a label (usually a station name) to a color or marker.
//!
//! Rules are regular expressions kept in the order they were given. The first
//! pattern that matches anywhere in the label wins; when nothing matches the
//! label gets [`DEFAULT_STYLE`].
//!
//! # Example
//!
//! ```rust
//! use pghydro_rs::style::{StyleRules, DEFAULT_STYLE};
//!
//! let colors = StyleRules::new([("^A", "red"), ("^B", "blue")])?;
//! assert_eq!(colors.assign("Alpha-1"), "red");
//! assert_eq!(colors.assign("Gamma"), DEFAULT_STYLE);
//! # Ok::<(), pghydro_rs::Error>(())
//! ```

use crate::error::Result;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Value assigned when no rule matches.
pub const DEFAULT_STYLE: &str = ".";

/// An ordered list of compiled `pattern -> value` rules.
#[derive(Debug, Clone, Default)]
pub struct StyleRules {
    rules: Vec<(Regex, String)>,
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    pattern: String,
    value: String,
}

impl StyleRules {
    /// Compile rules in iteration order. A malformed pattern fails with
    /// [`Error::Pattern`](crate::Error::Pattern).
    pub fn new<I, P, V>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, V)>,
        P: AsRef<str>,
        V: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(p, v)| -> Result<(Regex, String)> {
                Ok((Regex::new(p.as_ref())?, v.into()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Load rules from a CSV file with a `pattern,value` header. Row order is rule order.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut pairs = Vec::new();
        for row in rdr.deserialize() {
            let row: RuleRow = row?;
            pairs.push((row.pattern, row.value));
        }
        Self::new(pairs)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Value of the first rule whose pattern matches `name`, if any.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(name))
            .map(|(_, v)| v.as_str())
    }

    /// Like [`find`](Self::find) but falls back to [`DEFAULT_STYLE`].
    pub fn assign(&self, name: &str) -> &str {
        self.find(name).unwrap_or(DEFAULT_STYLE)
    }
}

/// One-shot matcher: compile `rules` and return the value for `name`.
///
/// Prefer [`StyleRules`] when matching many names against the same rules.
pub fn match_pattern(name: &str, rules: &[(&str, &str)]) -> Result<String> {
    let rules = StyleRules::new(rules.iter().copied())?;
    Ok(rules.assign(name).to_string())
}
