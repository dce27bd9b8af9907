use papermap_core::{Column, ConnectionStrength, Level, NodeId, PaperId};
use serde::{Deserialize, Serialize};

/// Hierarchy position of a visible node, with the ids needed to look it up again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level")]
pub enum NodeTier {
    L1,
    #[serde(rename_all = "camelCase")]
    L2 {
        parent_id: NodeId,
        /// Id as listed under the parent, used for further lookups.
        original_id: NodeId,
    },
    #[serde(rename_all = "camelCase")]
    L3 {
        parent_id: NodeId,
        /// The `l2_to_l3` key the children were read from.
        original_l2_parent: NodeId,
    },
}

impl NodeTier {
    pub fn level(&self) -> Level {
        match self {
            NodeTier::L1 => Level::L1,
            NodeTier::L2 { .. } => Level::L2,
            NodeTier::L3 { .. } => Level::L3,
        }
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        match self {
            NodeTier::L1 => None,
            NodeTier::L2 { parent_id, .. } | NodeTier::L3 { parent_id, .. } => Some(parent_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleNode {
    pub id: NodeId,
    pub name: String,
    pub column: Column,
    pub color: String,
    /// Distinct papers behind the node, never below 1.
    pub value: usize,
    pub has_children: bool,
    #[serde(flatten)]
    pub tier: NodeTier,
}

impl VisibleNode {
    pub fn level(&self) -> Level {
        self.tier.level()
    }

    /// Id under which the node is stored in the hierarchy documents.
    pub fn lookup_id(&self) -> &NodeId {
        match &self.tier {
            NodeTier::L2 { original_id, .. } => original_id,
            NodeTier::L1 | NodeTier::L3 { .. } => &self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleLink {
    pub source: NodeId,
    pub target: NodeId,
    pub value: usize,
    pub paper_ids: Vec<PaperId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strength: Option<ConnectionStrength>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<VisibleNode>,
    pub links: Vec<VisibleLink>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn nodes_in(&self, column: Column) -> impl Iterator<Item = &VisibleNode> {
        self.nodes.iter().filter(move |node| node.column == column)
    }

    pub fn node(&self, column: Column, id: &str) -> Option<&VisibleNode> {
        self.nodes_in(column).find(|node| node.id.as_str() == id)
    }

    pub fn link(&self, source: &str, target: &str) -> Option<&VisibleLink> {
        self.links
            .iter()
            .find(|link| link.source.as_str() == source && link.target.as_str() == target)
    }
}
