//! Serde shapes of the documents produced by the data loader.
//!
//! These mirror the JSON files one to one. Ingestion (see [`crate::Dataset`])
//! turns them into the typed lookup structures used by the snapshot engine.

use papermap_core::{ConnectionStrength, PaperId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `hierarchyMapping[category]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyMapping {
    #[serde(default)]
    pub l1_to_l2: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub l2_to_l3: BTreeMap<String, Vec<String>>,
}

/// `nodeMetadata[category][nodeId]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub total_papers: u32,
    /// Data convention: L1 category nodes are stored as `2`.
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

/// `crossLevelConnections.connections[levelPairKey][edgeKey]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeInfo {
    #[serde(default)]
    pub paper_count: u32,
    #[serde(default)]
    pub paper_ids: Vec<PaperId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strength: Option<ConnectionStrength>,
}

impl EdgeInfo {
    pub fn new(paper_ids: &[&str]) -> Self {
        Self {
            paper_count: paper_ids.len() as u32,
            paper_ids: paper_ids.iter().map(|id| PaperId::from(*id)).collect(),
            connection_strength: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsDocument {
    #[serde(default)]
    pub connections: BTreeMap<String, BTreeMap<String, EdgeInfo>>,
    #[serde(default)]
    pub level_combinations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPlatformL1")]
pub struct PlatformL1Entry {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Older configurations list L1 platform nodes as bare ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlatformL1 {
    Id(String),
    Entry {
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
}

impl From<RawPlatformL1> for PlatformL1Entry {
    fn from(raw: RawPlatformL1) -> Self {
        match raw {
            RawPlatformL1::Id(id) => Self {
                name: id.clone(),
                id,
                color: None,
            },
            RawPlatformL1::Entry { id, name, color } => Self {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                color,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformHierarchyDocument {
    #[serde(default)]
    pub l1: Vec<PlatformL1Entry>,
    #[serde(default)]
    pub l2: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTypeDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub hierarchy: PlatformHierarchyDocument,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfigurationDocument {
    #[serde(default)]
    pub platform_types: BTreeMap<String, PlatformTypeDocument>,
    /// `switchMapping["ContentForm_to_Attribute"][oldId] = [newId, ...]`
    #[serde(default)]
    pub switch_mapping: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// A year as found in raw paper records, either `2021` or `"2021"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl YearValue {
    pub fn normalized(&self) -> Option<String> {
        match self {
            YearValue::Number(year) => Some(year.to_string()),
            YearValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: PaperId,
    #[serde(default, alias = "Year")]
    pub year: Option<YearValue>,
}

/// `papers.json` is either a bare list or wrapped as `{"papers": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PapersDocument {
    List(Vec<PaperRecord>),
    Wrapped { papers: Vec<PaperRecord> },
}

impl PapersDocument {
    pub fn into_records(self) -> Vec<PaperRecord> {
        match self {
            PapersDocument::List(records) | PapersDocument::Wrapped { papers: records } => records,
        }
    }
}
