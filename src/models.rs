use serde::{Deserialize, Serialize};

/// Lower date bound sent when the caller does not supply one.
pub const DEFAULT_TIMESTAMP_START: &str = "1900-01-01";
/// Upper date bound sent when the caller does not supply one.
pub const DEFAULT_TIMESTAMP_END: &str = "2100-01-01";

/// A filter value that is either a single name or a list of names.
///
/// Lists are sent to the service as one comma-separated value
/// (`["Ca", "Cl"]` becomes `Ca,Cl`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    pub fn to_query_value(&self) -> String {
        match self {
            Selection::One(s) => s.clone(),
            Selection::Many(items) => items.join(","),
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        Selection::One(s.to_string())
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        Selection::One(s)
    }
}

impl From<Vec<String>> for Selection {
    fn from(items: Vec<String>) -> Self {
        Selection::Many(items)
    }
}

impl From<Vec<&str>> for Selection {
    fn from(items: Vec<&str>) -> Self {
        Selection::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Selection {
    fn from(items: &[&str]) -> Self {
        Selection::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(items: [&str; N]) -> Self {
        Selection::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

/// The measurement endpoints exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GroundwaterLevel,
    PhysicochemicalParameter,
    Analysis,
}

impl Endpoint {
    /// Path segment appended to the base URL (with trailing slash).
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::GroundwaterLevel => "groundwaterlevel/",
            Endpoint::PhysicochemicalParameter => "physicochemicalparameter/",
            Endpoint::Analysis => "analysis/",
        }
    }
}
