use papermap_core::{Column, StrengthThresholds};
use serde::{Deserialize, Serialize};

/// Fallback node colors, used when neither a node nor its ancestors carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnColors {
    pub platform: String,
    pub method: String,
    pub content: String,
}

impl Default for ColumnColors {
    fn default() -> Self {
        Self {
            platform: "#6ca0dc".to_string(),
            method: "#97a7aa".to_string(),
            content: "#dc6866".to_string(),
        }
    }
}

impl ColumnColors {
    pub fn for_column(&self, column: Column) -> &str {
        match column {
            Column::Platform => &self.platform,
            Column::Method => &self.method,
            Column::Content => &self.content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    pub colors: ColumnColors,
    pub strength: StrengthThresholds,
}
