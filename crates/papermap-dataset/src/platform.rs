use crate::documents::{PlatformConfigurationDocument, PlatformL1Entry};
use papermap_core::{NodeId, PlatformType, qualified_id, strip_parent};
use std::collections::HashMap;
use tracing::warn;

/// One platform sub-taxonomy (ContentForm or Attribute).
#[derive(Debug, Default)]
pub struct PlatformTaxonomy {
    pub l1: Vec<PlatformL1Entry>,
    l2: HashMap<NodeId, Vec<NodeId>>,
    parents: HashMap<String, NodeId>,
}

impl PlatformTaxonomy {
    pub fn entry(&self, id: &str) -> Option<&PlatformL1Entry> {
        self.l1.iter().find(|entry| entry.id == id)
    }

    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.l2.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent_of(&self, id: &str) -> Option<&NodeId> {
        self.parents.get(id)
    }
}

/// Both platform sub-taxonomies plus the id translation between them.
#[derive(Debug, Default)]
pub struct PlatformCatalog {
    taxonomies: HashMap<PlatformType, PlatformTaxonomy>,
    switch_mapping: HashMap<(PlatformType, PlatformType), HashMap<NodeId, Vec<NodeId>>>,
}

impl PlatformCatalog {
    pub fn from_document(document: PlatformConfigurationDocument) -> Self {
        let mut taxonomies = HashMap::new();
        for (name, platform) in document.platform_types {
            let Ok(platform_type) = name.parse::<PlatformType>() else {
                warn!(platform_type = %name, "Skipping unknown platform type");
                continue;
            };
            let mut parents = HashMap::new();
            let l2: HashMap<NodeId, Vec<NodeId>> = platform
                .hierarchy
                .l2
                .into_iter()
                .map(|(parent, children)| {
                    let parent = NodeId(parent);
                    let children: Vec<NodeId> = children.into_iter().map(NodeId).collect();
                    for child in &children {
                        let short = strip_parent(child.as_str(), parent.as_str())
                            .unwrap_or(child.as_str());
                        for alias in [
                            child.as_str().to_string(),
                            short.to_string(),
                            qualified_id(parent.as_str(), child.as_str()),
                        ] {
                            parents.entry(alias).or_insert_with(|| parent.clone());
                        }
                    }
                    (parent, children)
                })
                .collect();
            taxonomies.insert(
                platform_type,
                PlatformTaxonomy {
                    l1: platform.hierarchy.l1,
                    l2,
                    parents,
                },
            );
        }

        let mut switch_mapping = HashMap::new();
        let mut documents = document.switch_mapping;
        for from in PlatformType::ALL {
            for to in PlatformType::ALL.into_iter().filter(|&to| to != from) {
                let Some(mapping) = documents.remove(&from.switch_mapping_key(to)) else {
                    continue;
                };
                let mapping = mapping
                    .into_iter()
                    .map(|(id, targets)| (NodeId(id), targets.into_iter().map(NodeId).collect()))
                    .collect();
                switch_mapping.insert((from, to), mapping);
            }
        }
        for name in documents.keys() {
            warn!(mapping = %name, "Skipping malformed switch mapping");
        }

        Self {
            taxonomies,
            switch_mapping,
        }
    }

    pub fn taxonomy(&self, platform_type: PlatformType) -> Option<&PlatformTaxonomy> {
        self.taxonomies.get(&platform_type)
    }

    pub fn l1(&self, platform_type: PlatformType) -> &[PlatformL1Entry] {
        self.taxonomy(platform_type)
            .map(|taxonomy| taxonomy.l1.as_slice())
            .unwrap_or(&[])
    }

    pub fn children_of(&self, platform_type: PlatformType, id: &str) -> &[NodeId] {
        self.taxonomy(platform_type)
            .map(|taxonomy| taxonomy.children_of(id))
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, platform_type: PlatformType, id: &str) -> Option<&NodeId> {
        self.taxonomy(platform_type)?.parent_of(id)
    }

    /// Ids in `to` corresponding to the L1 id `id` of `from`.
    pub fn translate(&self, from: PlatformType, to: PlatformType, id: &str) -> &[NodeId] {
        self.switch_mapping
            .get(&(from, to))
            .and_then(|mapping| mapping.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PlatformCatalog {
        let document: PlatformConfigurationDocument = serde_json::from_str(
            r##"{
                "platformTypes": {
                    "ContentForm": {
                        "hierarchy": {
                            "l1": [{"id": "Video", "name": "Video", "color": "#6ca0dc"}, "Text"],
                            "l2": {"Video": ["Short video", "Live"], "Text": []}
                        }
                    },
                    "Attribute": {"hierarchy": {"l1": ["Open"], "l2": {}}},
                    "Unknown": {"hierarchy": {"l1": ["x"]}}
                },
                "switchMapping": {
                    "ContentForm_to_Attribute": {"Video": ["Open"]},
                    "Sideways": {"a": ["b"]}
                }
            }"##,
        )
        .unwrap();
        PlatformCatalog::from_document(document)
    }

    #[test]
    fn test_taxonomy_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.l1(PlatformType::ContentForm).len(), 2);
        assert_eq!(catalog.l1(PlatformType::Attribute).len(), 1);
        assert_eq!(catalog.children_of(PlatformType::ContentForm, "Video").len(), 2);
        assert!(catalog.children_of(PlatformType::ContentForm, "Text").is_empty());
        assert!(catalog.children_of(PlatformType::Attribute, "Video").is_empty());
        assert_eq!(
            catalog
                .parent_of(PlatformType::ContentForm, "Video-Live")
                .map(NodeId::as_str),
            Some("Video")
        );
    }

    #[test]
    fn test_hyphenated_child_is_not_split() {
        let document: PlatformConfigurationDocument = serde_json::from_str(
            r#"{
                "platformTypes": {
                    "ContentForm": {
                        "hierarchy": {"l1": ["Video"], "l2": {"Video": ["Long-form", "Video-Live"]}}
                    }
                }
            }"#,
        )
        .unwrap();
        let catalog = PlatformCatalog::from_document(document);
        let parent = |id| {
            catalog
                .parent_of(PlatformType::ContentForm, id)
                .map(NodeId::as_str)
        };
        assert_eq!(parent("Long-form"), Some("Video"));
        assert_eq!(parent("Video-Long-form"), Some("Video"));
        assert_eq!(parent("Live"), Some("Video"));
        assert_eq!(parent("form"), None);
    }

    #[test]
    fn test_translate_between_platform_types() {
        let catalog = catalog();
        let translated: Vec<_> = catalog
            .translate(PlatformType::ContentForm, PlatformType::Attribute, "Video")
            .iter()
            .map(NodeId::as_str)
            .collect();
        assert_eq!(translated, vec!["Open"]);
        assert!(
            catalog
                .translate(PlatformType::Attribute, PlatformType::ContentForm, "Open")
                .is_empty()
        );
        // "Sideways" names no known direction and is dropped.
        assert!(
            catalog
                .translate(PlatformType::ContentForm, PlatformType::ContentForm, "a")
                .is_empty()
        );
    }
}
