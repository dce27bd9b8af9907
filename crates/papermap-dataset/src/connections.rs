use crate::documents::{ConnectionsDocument, EdgeInfo};
use papermap_core::{EdgeKey, LevelPairKey, LevelTag, NodeId, PaperId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

type EdgeMap = BTreeMap<EdgeKey, EdgeInfo>;

static EMPTY_EDGES: EdgeMap = BTreeMap::new();

/// Cross-level connection tables keyed by level pair.
#[derive(Debug, Default)]
pub struct ConnectionTable {
    tables: HashMap<LevelPairKey, EdgeMap>,
}

/// A stored table read in a requested direction.
#[derive(Debug, Clone, Copy)]
pub struct OrientedTable<'a> {
    /// Key as stored in the document.
    pub stored_key: LevelPairKey,
    /// Whether the stored key is the reverse of the requested direction.
    pub reversed: bool,
    pub edges: &'a EdgeMap,
}

impl<'a> OrientedTable<'a> {
    /// Edges as `(source, target, info)` in the requested direction.
    pub fn iter(&self) -> impl Iterator<Item = (&'a NodeId, &'a NodeId, &'a EdgeInfo)> + use<'a> {
        let reversed = self.reversed;
        self.edges.iter().map(move |(key, info)| {
            if reversed {
                (&key.target, &key.source, info)
            } else {
                (&key.source, &key.target, info)
            }
        })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl ConnectionTable {
    pub fn from_document(document: ConnectionsDocument) -> Self {
        let mut tables = HashMap::new();
        for (raw_key, raw_edges) in document.connections {
            let key = match raw_key.parse::<LevelPairKey>() {
                Ok(key) => key,
                Err(err) => {
                    warn!(key = %raw_key, error = %err, "Skipping connection table");
                    continue;
                }
            };
            let mut edges = EdgeMap::new();
            for (raw_edge, info) in raw_edges {
                match raw_edge.parse::<EdgeKey>() {
                    Ok(edge) => {
                        edges.insert(edge, info);
                    }
                    Err(err) => warn!(%key, edge = %raw_edge, error = %err, "Skipping connection"),
                }
            }
            tables.insert(key, edges);
        }
        Self { tables }
    }

    /// Edges stored under `key`, or an empty map.
    pub fn connections_for(&self, key: &LevelPairKey) -> &EdgeMap {
        self.tables.get(key).unwrap_or(&EMPTY_EDGES)
    }

    /// Non-empty table describing `from -> to`, accepting the reversed key.
    pub fn oriented(&self, from: LevelTag, to: LevelTag) -> Option<OrientedTable<'_>> {
        let key = LevelPairKey::new(from, to);
        [(key, false), (key.reversed(), true)]
            .into_iter()
            .find_map(|(stored_key, reversed)| {
                self.tables
                    .get(&stored_key)
                    .filter(|edges| !edges.is_empty())
                    .map(|edges| OrientedTable {
                        stored_key,
                        reversed,
                        edges,
                    })
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &LevelPairKey> {
        self.tables.keys()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Distinct paper ids per node, gathered from every table the node appears in.
#[derive(Debug, Default)]
pub struct PaperIndex {
    papers: HashMap<LevelTag, HashMap<NodeId, BTreeSet<PaperId>>>,
}

impl PaperIndex {
    pub fn build(connections: &ConnectionTable) -> Self {
        let mut papers: HashMap<LevelTag, HashMap<NodeId, BTreeSet<PaperId>>> = HashMap::new();
        for (key, edges) in &connections.tables {
            for (edge, info) in edges {
                for (tag, node) in [(key.left, &edge.source), (key.right, &edge.target)] {
                    papers
                        .entry(tag)
                        .or_default()
                        .entry(node.clone())
                        .or_default()
                        .extend(info.paper_ids.iter().cloned());
                }
            }
        }
        Self { papers }
    }

    pub fn papers_of(&self, tag: LevelTag, id: &str) -> Option<&BTreeSet<PaperId>> {
        self.papers.get(&tag).and_then(|nodes| nodes.get(id))
    }
}
