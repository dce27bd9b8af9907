use crate::{Column, ConversionError, Level};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two alternative platform sub-taxonomies shown in the platform column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum PlatformType {
    #[default]
    ContentForm,
    Attribute,
}

impl PlatformType {
    pub const ALL: [PlatformType; 2] = [PlatformType::ContentForm, PlatformType::Attribute];

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformType::ContentForm => "ContentForm",
            PlatformType::Attribute => "Attribute",
        }
    }

    pub fn category(self) -> Category {
        match self {
            PlatformType::ContentForm => Category::PlatformContentForm,
            PlatformType::Attribute => Category::PlatformAttribute,
        }
    }

    /// Key of the `switchMapping` table translating ids from `self` to `to`.
    pub fn switch_mapping_key(self, to: PlatformType) -> String {
        format!("{}_to_{}", self.as_str(), to.as_str())
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ContentForm" => Ok(PlatformType::ContentForm),
            "Attribute" => Ok(PlatformType::Attribute),
            _ => Err(ConversionError::UnknownPlatformType(s.to_string())),
        }
    }
}

/// Taxonomy category as used in hierarchy, metadata and connection documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Platform-ContentForm")]
    PlatformContentForm,
    #[serde(rename = "Platform-Attribute")]
    PlatformAttribute,
    Method,
    Content,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PlatformContentForm,
        Category::PlatformAttribute,
        Category::Method,
        Category::Content,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::PlatformContentForm => "Platform-ContentForm",
            Category::PlatformAttribute => "Platform-Attribute",
            Category::Method => "Method",
            Category::Content => "Content",
        }
    }

    pub fn is_platform(self) -> bool {
        matches!(
            self,
            Category::PlatformContentForm | Category::PlatformAttribute
        )
    }

    pub fn platform_type(self) -> Option<PlatformType> {
        match self {
            Category::PlatformContentForm => Some(PlatformType::ContentForm),
            Category::PlatformAttribute => Some(PlatformType::Attribute),
            Category::Method | Category::Content => None,
        }
    }

    pub fn column(self) -> Column {
        match self {
            Category::PlatformContentForm | Category::PlatformAttribute => Column::Platform,
            Category::Method => Column::Method,
            Category::Content => Column::Content,
        }
    }

    pub fn for_column(column: Column, platform_type: PlatformType) -> Category {
        match column {
            Column::Platform => platform_type.category(),
            Column::Method => Category::Method,
            Column::Content => Category::Content,
        }
    }

    /// Level under which connection tables store a node displayed at `display`.
    ///
    /// Platform tables are keyed by paper tag level, one below the display level:
    /// display L1 is stored as L2 and display L2 as L3.
    pub fn storage_level(self, display: Level) -> Level {
        if self.is_platform() {
            display.next().unwrap_or(Level::L3)
        } else {
            display
        }
    }

    /// Inverse of [`Category::storage_level`]. Platform storage L1 is the taxonomy
    /// root and has no display counterpart.
    pub fn display_level(self, storage: Level) -> Option<Level> {
        if self.is_platform() {
            storage.prev()
        } else {
            Some(storage)
        }
    }

    /// Storage levels that correspond to a displayable level.
    pub fn storage_levels(self) -> &'static [Level] {
        if self.is_platform() {
            &[Level::L2, Level::L3]
        } else {
            &Level::ALL
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ConversionError::UnknownCategory(s.to_string()))
    }
}
