use crate::documents::{HierarchyMapping, NodeMeta};
use papermap_core::{Category, Level, NodeId, qualified_id, strip_parent};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Color value the data loader uses for "no color assigned".
pub const PLACEHOLDER_COLOR: &str = "#PLACEHOLDER";

/// Read-only taxonomy lookups for every category.
#[derive(Debug, Default)]
pub struct HierarchyIndex {
    categories: HashMap<Category, CategoryHierarchy>,
}

/// One L2 node of the taxonomy and the ids it is known by.
#[derive(Debug, Clone)]
struct L2Entry {
    /// `parent-child` form.
    full: NodeId,
    /// `full` without its L1 prefix.
    short: NodeId,
    parent: Option<NodeId>,
    /// `l2_to_l3` key holding the node's children, if it has any.
    children_key: Option<NodeId>,
}

#[derive(Debug, Default)]
struct CategoryHierarchy {
    l1_to_l2: HashMap<NodeId, Vec<NodeId>>,
    l2_to_l3: BTreeMap<NodeId, Vec<NodeId>>,
    metadata: BTreeMap<NodeId, NodeMeta>,
    /// displayName -> metadata key
    display_aliases: HashMap<String, NodeId>,
    l2_entries: Vec<L2Entry>,
    /// Every spelling of an L2 id -> entry. `None` marks a spelling shared
    /// by several entries.
    l2_aliases: HashMap<String, Option<usize>>,
    /// Parents declared in metadata for ids no child list mentions.
    declared_l2_parents: HashMap<NodeId, NodeId>,
    /// L3 id -> `l2_to_l3` key
    l3_parents: HashMap<NodeId, NodeId>,
}

impl HierarchyIndex {
    pub fn from_documents(
        mappings: BTreeMap<String, HierarchyMapping>,
        mut metadata: BTreeMap<String, BTreeMap<String, NodeMeta>>,
    ) -> Self {
        let mut categories = HashMap::new();

        for (name, mapping) in mappings {
            let Ok(category) = name.parse::<Category>() else {
                warn!(category = %name, "Skipping hierarchy of unknown category");
                continue;
            };
            let meta = metadata.remove(&name).unwrap_or_default();
            categories.insert(category, CategoryHierarchy::build(mapping, meta));
        }
        // Metadata without a hierarchy still answers display lookups.
        for (name, meta) in metadata {
            let Ok(category) = name.parse::<Category>() else {
                warn!(category = %name, "Skipping metadata of unknown category");
                continue;
            };
            categories.insert(
                category,
                CategoryHierarchy::build(HierarchyMapping::default(), meta),
            );
        }

        Self { categories }
    }

    /// Children of `id`, where `level` is the level of `id` itself.
    ///
    /// L2 lookups go through [`HierarchyIndex::resolve_l2`]. L3 nodes are leaves.
    pub fn children_of(&self, category: Category, level: Level, id: &str) -> &[NodeId] {
        let Some(hierarchy) = self.categories.get(&category) else {
            return &[];
        };
        let children = match level {
            Level::L1 => hierarchy.l1_to_l2.get(id).or_else(|| {
                hierarchy
                    .display_aliases
                    .get(id)
                    .and_then(|key| hierarchy.l1_to_l2.get(key.as_str()))
            }),
            Level::L2 => self
                .resolve_l2(category, id)
                .and_then(|key| hierarchy.l2_to_l3.get(key)),
            Level::L3 => None,
        };
        children.map(Vec::as_slice).unwrap_or(&[])
    }

    /// Maps any spelling of an L2 id (full, short or display name) to the key
    /// under which its L3 children are stored.
    ///
    /// Ids the taxonomy knows resolve through the alias index only, so a
    /// known L2 node without children yields `None`. The structural scan
    /// (`*-{id}`, then `*{id}*`) runs for unknown ids alone.
    pub fn resolve_l2(&self, category: Category, id: &str) -> Option<&NodeId> {
        let hierarchy = self.categories.get(&category)?;
        if let Some((key, _)) = hierarchy.l2_to_l3.get_key_value(id) {
            return Some(key);
        }
        match hierarchy.l2_aliases.get(id) {
            Some(Some(index)) => return hierarchy.l2_entries[*index].children_key.as_ref(),
            Some(None) => {
                debug!(%category, id, "L2 id names several nodes, not resolving");
                return None;
            }
            None => {}
        }

        let suffix = format!("-{id}");
        let matched = hierarchy
            .l2_to_l3
            .keys()
            .find(|key| key.as_str().ends_with(&suffix))
            .or_else(|| {
                hierarchy
                    .l2_to_l3
                    .keys()
                    .find(|key| key.as_str().contains(id))
            });
        match matched {
            Some(key) => debug!(%category, id, matched = %key, "Resolved L2 id by structural scan"),
            None => debug!(%category, id, "No L2 entry for id"),
        }
        matched
    }

    /// The `parent-child` id of a known L2 node, without any fuzzy matching.
    pub fn canonical_l2(&self, category: Category, id: &str) -> Option<&NodeId> {
        let hierarchy = self.categories.get(&category)?;
        hierarchy.l2_entry(id).map(|entry| &entry.full)
    }

    /// True when `id` is a spelling shared by several L2 nodes, typically a
    /// display name reused under different L1 parents.
    pub fn is_ambiguous_l2(&self, category: Category, id: &str) -> bool {
        self.categories
            .get(&category)
            .is_some_and(|hierarchy| matches!(hierarchy.l2_aliases.get(id), Some(None)))
    }

    /// Parent of `id`, where `level` is the level of `id` itself.
    pub fn parent_of(&self, category: Category, level: Level, id: &str) -> Option<&NodeId> {
        let hierarchy = self.categories.get(&category)?;
        match level {
            Level::L1 => None,
            Level::L2 => match hierarchy.l2_aliases.get(id) {
                Some(Some(index)) => hierarchy.l2_entries[*index].parent.as_ref(),
                Some(None) => None,
                None => hierarchy.declared_l2_parents.get(id),
            },
            Level::L3 => hierarchy.l3_parents.get(id).or_else(|| {
                hierarchy
                    .display_aliases
                    .get(id)
                    .and_then(|key| hierarchy.l3_parents.get(key))
            }),
        }
    }

    pub fn metadata(&self, category: Category, id: &str) -> Option<&NodeMeta> {
        let hierarchy = self.categories.get(&category)?;
        hierarchy
            .metadata
            .get(id)
            .or_else(|| {
                hierarchy
                    .display_aliases
                    .get(id)
                    .and_then(|key| hierarchy.metadata.get(key))
            })
            .or_else(|| {
                let entry = hierarchy.l2_entry(id)?;
                hierarchy
                    .metadata
                    .get(&entry.short)
                    .or_else(|| hierarchy.metadata.get(&entry.full))
            })
    }

    /// The node's own color, ignoring the placeholder value.
    pub fn color(&self, category: Category, id: &str) -> Option<&str> {
        self.metadata(category, id)
            .and_then(|meta| meta.color.as_deref())
            .filter(|color| is_real_color(color))
    }

    /// L1 nodes of a category, keyed by display name.
    pub fn l1_nodes(&self, category: Category) -> impl Iterator<Item = (&str, &NodeMeta)> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|hierarchy| hierarchy.metadata.iter())
            .filter(|(_, meta)| Level::from_metadata_level(meta.level) == Some(Level::L1))
            .map(|(key, meta)| (meta.display_name.as_deref().unwrap_or(key.as_str()), meta))
    }
}

pub fn is_real_color(color: &str) -> bool {
    !color.is_empty() && color != PLACEHOLDER_COLOR
}

impl CategoryHierarchy {
    fn build(mapping: HierarchyMapping, metadata: BTreeMap<String, NodeMeta>) -> Self {
        let metadata: BTreeMap<NodeId, NodeMeta> = metadata
            .into_iter()
            .map(|(id, meta)| (NodeId(id), meta))
            .collect();
        let mut hierarchy = CategoryHierarchy {
            l1_to_l2: mapping
                .l1_to_l2
                .into_iter()
                .map(|(id, children)| (NodeId(id), children.into_iter().map(NodeId).collect()))
                .collect(),
            l2_to_l3: mapping
                .l2_to_l3
                .into_iter()
                .map(|(id, children)| (NodeId(id), children.into_iter().map(NodeId).collect()))
                .collect(),
            metadata,
            ..Default::default()
        };

        for (key, meta) in &hierarchy.metadata {
            if let Some(display) = meta.display_name.as_deref() {
                hierarchy
                    .display_aliases
                    .entry(display.to_string())
                    .or_insert_with(|| key.clone());
            }
        }

        // Child lists first, sorted so entry order does not depend on hashing.
        let mut listed: Vec<(NodeId, NodeId)> = hierarchy
            .l1_to_l2
            .iter()
            .flat_map(|(parent, children)| {
                children.iter().map(move |child| (parent.clone(), child.clone()))
            })
            .collect();
        listed.sort();
        for (parent, child) in listed {
            let full = NodeId(qualified_id(parent.as_str(), child.as_str()));
            let short = strip_parent(child.as_str(), parent.as_str())
                .map_or_else(|| child.clone(), NodeId::from);
            hierarchy.register_l2(&child, full, short, Some(parent));
        }

        // L3 keys whose L2 node no child list mentions.
        let unlisted: Vec<NodeId> = hierarchy
            .l2_to_l3
            .keys()
            .filter(|key| !hierarchy.l2_aliases.contains_key(key.as_str()))
            .cloned()
            .collect();
        for key in unlisted {
            let parent = hierarchy
                .l1_to_l2
                .keys()
                .filter(|parent| strip_parent(key.as_str(), parent.as_str()).is_some())
                .max_by_key(|parent| parent.as_str().len())
                .cloned();
            let short = parent
                .as_ref()
                .and_then(|parent| strip_parent(key.as_str(), parent.as_str()))
                .map_or_else(|| key.clone(), NodeId::from);
            hierarchy.register_l2(&key, key.clone(), short, parent);
        }

        let mut l3_parents = HashMap::new();
        for (parent, children) in &hierarchy.l2_to_l3 {
            for child in children {
                l3_parents
                    .entry(child.clone())
                    .or_insert_with(|| parent.clone());
            }
        }

        // Explicit metadata parents fill whatever the child lists left out.
        let declared: Vec<(NodeId, Level, NodeId)> = hierarchy
            .metadata
            .iter()
            .filter_map(|(id, meta)| {
                let level = Level::from_metadata_level(meta.level)?;
                Some((id.clone(), level, NodeId::from(meta.parent.as_deref()?)))
            })
            .collect();
        for (id, level, parent) in declared {
            match level {
                Level::L2 => match hierarchy.l2_aliases.get(id.as_str()) {
                    Some(Some(index)) => {
                        hierarchy.l2_entries[*index].parent.get_or_insert(parent);
                    }
                    Some(None) => {}
                    None => {
                        hierarchy.declared_l2_parents.entry(id).or_insert(parent);
                    }
                },
                Level::L3 => {
                    let parent = hierarchy
                        .l2_entry(parent.as_str())
                        .map(|entry| entry.children_key.as_ref().unwrap_or(&entry.full).clone())
                        .unwrap_or(parent);
                    l3_parents.entry(id).or_insert(parent);
                }
                Level::L1 => {}
            }
        }

        hierarchy.l3_parents = l3_parents;
        hierarchy
    }

    fn l2_entry(&self, id: &str) -> Option<&L2Entry> {
        match self.l2_aliases.get(id) {
            Some(Some(index)) => self.l2_entries.get(*index),
            _ => None,
        }
    }

    /// Adds an L2 node under every spelling it may appear as: the listed id,
    /// its full and short forms and their display names.
    fn register_l2(
        &mut self,
        listed: &NodeId,
        full: NodeId,
        short: NodeId,
        parent: Option<NodeId>,
    ) {
        if self
            .l2_entry(full.as_str())
            .is_some_and(|entry| entry.full == full)
        {
            debug!(id = %full, "Duplicate L2 child listing");
            return;
        }
        let children_key = [&full, listed, &short]
            .into_iter()
            .find(|id| self.l2_to_l3.contains_key(id.as_str()))
            .cloned();
        let mut spellings = vec![
            listed.as_str().to_string(),
            full.as_str().to_string(),
            short.as_str().to_string(),
        ];
        for id in [listed, &full, &short] {
            if let Some(display) = self
                .metadata
                .get(id)
                .and_then(|meta| meta.display_name.clone())
            {
                spellings.push(display);
            }
        }

        let index = self.l2_entries.len();
        self.l2_entries.push(L2Entry {
            full,
            short,
            parent,
            children_key,
        });
        for spelling in spellings {
            match self.l2_aliases.entry(spelling) {
                Entry::Vacant(vacant) => {
                    vacant.insert(Some(index));
                }
                Entry::Occupied(mut occupied) => {
                    if *occupied.get() != Some(index) {
                        occupied.insert(None);
                    }
                }
            }
        }
    }
}
