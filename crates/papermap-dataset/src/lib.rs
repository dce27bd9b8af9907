use papermap_core::{Category, Level, LevelTag, NodeId, PaperId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

pub mod connections;
pub mod documents;
pub mod hierarchy;
pub mod platform;
pub mod years;

pub use connections::{ConnectionTable, OrientedTable, PaperIndex};
pub use documents::{
    ConnectionsDocument, EdgeInfo, HierarchyMapping, NodeMeta, PaperRecord, PapersDocument,
    PlatformConfigurationDocument, PlatformL1Entry,
};
pub use hierarchy::{HierarchyIndex, PLACEHOLDER_COLOR, is_real_color};
pub use platform::{PlatformCatalog, PlatformTaxonomy};
pub use years::YearIndex;

pub const HIERARCHY_FILE: &str = "hierarchyMapping.json";
pub const METADATA_FILE: &str = "nodeMetadata.json";
pub const CONNECTIONS_FILE: &str = "crossLevelConnections.json";
pub const PLATFORM_FILE: &str = "platformConfiguration.json";
pub const PAPERS_FILE: &str = "papers.json";
pub const YEAR_INDEX_FILE: &str = "paperIdToYear.json";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The parsed loader documents, before indexing.
///
/// Also deserializable as one bundle keyed by `hierarchy`, `metadata`,
/// `connections`, `platforms`, `papers` and `paperYears`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasetDocuments {
    pub hierarchy: BTreeMap<String, HierarchyMapping>,
    pub metadata: BTreeMap<String, BTreeMap<String, NodeMeta>>,
    pub connections: ConnectionsDocument,
    pub platforms: PlatformConfigurationDocument,
    pub papers: Vec<PaperRecord>,
    /// A precomputed `paperIdToYear` map, merged over `papers`.
    pub paper_years: BTreeMap<String, String>,
}

/// Immutable, indexed view of one corpus.
#[derive(Debug, Default)]
pub struct Dataset {
    pub hierarchy: HierarchyIndex,
    pub connections: ConnectionTable,
    pub platforms: PlatformCatalog,
    pub years: YearIndex,
    pub papers: PaperIndex,
    missing_years_reported: AtomicBool,
}

impl Dataset {
    pub fn from_documents(documents: DatasetDocuments) -> Self {
        let hierarchy = HierarchyIndex::from_documents(documents.hierarchy, documents.metadata);
        let connections = ConnectionTable::from_document(documents.connections);
        let papers = PaperIndex::build(&connections);
        let platforms = PlatformCatalog::from_document(documents.platforms);
        let mut years = YearIndex::from_records(documents.papers);
        years.extend(documents.paper_years);

        info!(
            tables = connections.len(),
            papers_with_year = years.len(),
            "Dataset indexed"
        );

        Self {
            hierarchy,
            connections,
            platforms,
            years,
            papers,
            missing_years_reported: AtomicBool::new(false),
        }
    }

    /// Reads the loader documents from `dir`. The paper files are optional.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let papers = match read_optional_json::<PapersDocument>(&dir.join(PAPERS_FILE))? {
            Some(document) => document.into_records(),
            None => Vec::new(),
        };
        let paper_years: BTreeMap<String, String> =
            read_optional_json(&dir.join(YEAR_INDEX_FILE))?.unwrap_or_default();
        if papers.is_empty() && paper_years.is_empty() {
            info!(dir = %dir.display(), "No paper years found, year filter disabled");
        }

        Ok(Self::from_documents(DatasetDocuments {
            hierarchy: read_json(&dir.join(HIERARCHY_FILE))?,
            metadata: read_json(&dir.join(METADATA_FILE))?,
            connections: read_json(&dir.join(CONNECTIONS_FILE))?,
            platforms: read_json(&dir.join(PLATFORM_FILE))?,
            papers,
            paper_years,
        }))
    }

    /// Children of `id` displayed at `level` in `category`.
    ///
    /// Platform children come from the platform configuration and stop at L2.
    pub fn children_of(&self, category: Category, level: Level, id: &str) -> &[NodeId] {
        match category.platform_type() {
            Some(platform_type) if level == Level::L1 => {
                self.platforms.children_of(platform_type, id)
            }
            Some(_) => &[],
            None => self.hierarchy.children_of(category, level, id),
        }
    }

    pub fn has_children(&self, category: Category, level: Level, id: &str) -> bool {
        !self.children_of(category, level, id).is_empty()
    }

    /// Parent of `id` displayed at `level`, one level up.
    pub fn parent_of(&self, category: Category, level: Level, id: &str) -> Option<&NodeId> {
        match category.platform_type() {
            Some(platform_type) if level == Level::L2 => {
                self.platforms.parent_of(platform_type, id)
            }
            Some(_) => None,
            None => self.hierarchy.parent_of(category, level, id),
        }
    }

    /// Distinct papers of a node displayed at `level`, looked up at its storage level.
    pub fn papers_of(
        &self,
        category: Category,
        level: Level,
        id: &str,
    ) -> Option<&BTreeSet<PaperId>> {
        let tag = LevelTag::new(category, category.storage_level(level));
        self.papers.papers_of(tag, id)
    }

    /// Logs the missing year index once per dataset. Returns whether it is missing.
    pub fn check_year_index(&self) -> bool {
        if !self.years.is_empty() {
            return false;
        }
        if !self.missing_years_reported.swap(true, Ordering::Relaxed) {
            warn!("Year index is empty, year filter passes papers through");
        }
        true
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DatasetError> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}
