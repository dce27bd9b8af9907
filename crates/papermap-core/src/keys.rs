use crate::{Category, ConversionError, Level, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PAIR_DELIMITER: &str = "__";

/// A `(category, level)` half of a level-pair key, e.g. `Content_L1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LevelTag {
    pub category: Category,
    pub level: Level,
}

impl LevelTag {
    pub fn new(category: Category, level: Level) -> Self {
        Self { category, level }
    }
}

impl fmt::Display for LevelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category, self.level)
    }
}

impl FromStr for LevelTag {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, level) = s
            .rsplit_once('_')
            .ok_or_else(|| ConversionError::MalformedLevelPairKey(s.to_string()))?;
        Ok(Self {
            category: category.parse()?,
            level: level.parse()?,
        })
    }
}

/// Identifies which two `(category, level)` combinations a connection table describes,
/// e.g. `Platform-ContentForm_L2__Content_L1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelPairKey {
    pub left: LevelTag,
    pub right: LevelTag,
}

impl LevelPairKey {
    pub fn new(left: LevelTag, right: LevelTag) -> Self {
        Self { left, right }
    }

    pub fn reversed(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

impl fmt::Display for LevelPairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, PAIR_DELIMITER, self.right)
    }
}

impl FromStr for LevelPairKey {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = s
            .split_once(PAIR_DELIMITER)
            .ok_or_else(|| ConversionError::MalformedLevelPairKey(s.to_string()))?;
        let malformed = |_| ConversionError::MalformedLevelPairKey(s.to_string());
        Ok(Self {
            left: left.parse().map_err(malformed)?,
            right: right.parse().map_err(malformed)?,
        })
    }
}

impl TryFrom<String> for LevelPairKey {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelPairKey> for String {
    fn from(value: LevelPairKey) -> Self {
        value.to_string()
    }
}

/// `"{source}__{target}"` key of a single connection entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeKey {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, PAIR_DELIMITER, self.target)
    }
}

impl FromStr for EdgeKey {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(PAIR_DELIMITER) {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                Ok(EdgeKey::new(source, target))
            }
            _ => Err(ConversionError::MalformedEdgeKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for EdgeKey {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EdgeKey> for String {
    fn from(value: EdgeKey) -> Self {
        value.to_string()
    }
}
