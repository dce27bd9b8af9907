use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod category;
pub mod keys;
pub mod strength;

pub use category::{Category, PlatformType};
pub use keys::{EdgeKey, LevelPairKey, LevelTag};
pub use strength::{ConnectionStrength, StrengthThresholds};

/// Separator between segments of a hierarchical id, e.g. `"Surveys-Online surveys"`.
pub const HIERARCHY_SEPARATOR: char = '-';

/// Strips a known `parent-` prefix from a hierarchical id.
///
/// Returns `None` when `id` is not qualified by `parent`. Child names may
/// themselves contain the separator (`"Interviews-Semi-structured"`), so the
/// split is anchored on the parent rather than on the last separator.
pub fn strip_parent<'a>(id: &'a str, parent: &str) -> Option<&'a str> {
    id.strip_prefix(parent)?
        .strip_prefix(HIERARCHY_SEPARATOR)
        .filter(|child| !child.is_empty())
}

/// Full hierarchical id of `child` under `parent`, keeping ids that are
/// already qualified.
pub fn qualified_id(parent: &str, child: &str) -> String {
    if strip_parent(child, parent).is_some() {
        child.to_string()
    } else {
        format!("{parent}{HIERARCHY_SEPARATOR}{child}")
    }
}

/// Taxonomy node identifier as it appears in the loader documents.
///
/// Depending on the document this is either a display id (`"Online surveys"`)
/// or the full hierarchical id (`"Surveys-Online surveys"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PaperId(pub String);

impl PaperId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaperId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for PaperId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Error type for string/index conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid column index: {0}")]
    InvalidColumn(usize),
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Unknown platform type: {0}")]
    UnknownPlatformType(String),
    #[error("Malformed level-pair key: {0}")]
    MalformedLevelPairKey(String),
    #[error("Malformed edge key: {0}")]
    MalformedEdgeKey(String),
}

/// One of the three fixed visualization columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Column {
    Platform,
    Method,
    Content,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Platform, Column::Method, Column::Content];

    pub fn index(self) -> usize {
        match self {
            Column::Platform => 0,
            Column::Method => 1,
            Column::Content => 2,
        }
    }

    /// Deepest level the column can be drilled to. The platform taxonomy has no L3.
    pub fn max_level(self) -> Level {
        match self {
            Column::Platform => Level::L2,
            Column::Method | Column::Content => Level::L3,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Platform => write!(f, "platform"),
            Column::Method => write!(f, "method"),
            Column::Content => write!(f, "content"),
        }
    }
}

impl TryFrom<usize> for Column {
    type Error = ConversionError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Column::Platform),
            1 => Ok(Column::Method),
            2 => Ok(Column::Content),
            _ => Err(ConversionError::InvalidColumn(value)),
        }
    }
}

impl TryFrom<u8> for Column {
    type Error = ConversionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Column::try_from(usize::from(value))
    }
}

impl From<Column> for u8 {
    fn from(value: Column) -> Self {
        value.index() as u8
    }
}

/// Hierarchy depth of a taxonomy column, coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    L1,
    L2,
    L3,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::L1, Level::L2, Level::L3];

    pub fn depth(self) -> u8 {
        match self {
            Level::L1 => 1,
            Level::L2 => 2,
            Level::L3 => 3,
        }
    }

    pub fn from_depth(depth: u8) -> Option<Level> {
        match depth {
            1 => Some(Level::L1),
            2 => Some(Level::L2),
            3 => Some(Level::L3),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Level> {
        Level::from_depth(self.depth() + 1)
    }

    pub fn prev(self) -> Option<Level> {
        Level::from_depth(self.depth().saturating_sub(1))
    }

    /// Level of a metadata entry, where L1 category nodes are stored as `level == 2`.
    pub fn from_metadata_level(level: u8) -> Option<Level> {
        level.checked_sub(1).and_then(Level::from_depth)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L1" => Ok(Level::L1),
            "L2" => Ok(Level::L2),
            "L3" => Ok(Level::L3),
            _ => Err(ConversionError::InvalidLevel(s.to_string())),
        }
    }
}
