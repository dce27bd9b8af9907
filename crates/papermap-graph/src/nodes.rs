//! Visible nodes of each column.

use crate::model::{NodeTier, VisibleNode};
use crate::options::SnapshotOptions;
use crate::state::{ColumnExpansion, InteractionState};
use crate::year_filter::YearFilter;
use papermap_core::{Category, Column, Level, NodeId, PaperId, qualified_id};
use papermap_dataset::{Dataset, is_real_color};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Nodes of one column with the filtered papers each was counted from.
/// Node ids are unique within the column.
#[derive(Debug, Default)]
pub(crate) struct ColumnNodes {
    pub nodes: Vec<VisibleNode>,
    pub papers: Vec<BTreeSet<PaperId>>,
    ids: HashSet<NodeId>,
}

impl ColumnNodes {
    fn push(&mut self, mut node: VisibleNode, papers: BTreeSet<PaperId>) {
        if !self.ids.insert(node.id.clone()) {
            warn!(column = %node.column, id = %node.id, "Skipping duplicate node");
            return;
        }
        node.value = papers.len().max(1);
        self.nodes.push(node);
        self.papers.push(papers);
    }
}

pub fn build_platform_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> Vec<VisibleNode> {
    platform_nodes(dataset, state, filter, options).nodes
}

pub fn build_method_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> Vec<VisibleNode> {
    taxonomy_nodes(dataset, state, filter, options, Column::Method).nodes
}

pub fn build_content_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> Vec<VisibleNode> {
    taxonomy_nodes(dataset, state, filter, options, Column::Content).nodes
}

pub(crate) fn column_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
    column: Column,
) -> ColumnNodes {
    match column {
        Column::Platform => platform_nodes(dataset, state, filter, options),
        Column::Method | Column::Content => taxonomy_nodes(dataset, state, filter, options, column),
    }
}

fn platform_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> ColumnNodes {
    let platform_type = state.platform_type();
    let category = platform_type.category();
    let default_color = options.colors.for_column(Column::Platform);
    let mut nodes = ColumnNodes::default();

    let branches = match state.column(Column::Platform) {
        ColumnExpansion::Collapsed => {
            for entry in dataset.platforms.l1(platform_type) {
                let color = pick_color(
                    [entry.color.as_deref(), dataset.hierarchy.color(category, &entry.id)],
                    default_color,
                );
                let papers = own_papers(
                    dataset,
                    category,
                    Level::L1,
                    &[entry.id.as_str(), entry.name.as_str()],
                    filter,
                );
                nodes.push(
                    VisibleNode {
                        id: NodeId::from(entry.id.as_str()),
                        name: entry.name.clone(),
                        column: Column::Platform,
                        color,
                        value: 0,
                        has_children: dataset.has_children(category, Level::L1, &entry.id),
                        tier: NodeTier::L1,
                    },
                    papers,
                );
            }
            return nodes;
        }
        ColumnExpansion::Branches { expanded } => expanded,
        ColumnExpansion::Drilled { branches, .. } => branches,
    };

    let taxonomy = dataset.platforms.taxonomy(platform_type);
    let mut seen = HashSet::new();
    let listed_twice: HashSet<&NodeId> = branches
        .iter()
        .flat_map(|parent| dataset.children_of(category, Level::L1, parent.as_str()))
        .filter(|child| !seen.insert(*child))
        .collect();
    for parent in branches {
        let parent_color = taxonomy
            .and_then(|taxonomy| taxonomy.entry(parent.as_str()))
            .and_then(|entry| entry.color.as_deref())
            .filter(|color| is_real_color(color))
            .or_else(|| dataset.hierarchy.color(category, parent.as_str()));
        for child in dataset.children_of(category, Level::L1, parent.as_str()) {
            let name = dataset
                .hierarchy
                .metadata(category, child.as_str())
                .and_then(|meta| meta.display_name.clone())
                .unwrap_or_else(|| child.to_string());
            let color = pick_color(
                [dataset.hierarchy.color(category, child.as_str()), parent_color],
                default_color,
            );
            let qualified = qualified_id(parent.as_str(), child.as_str());
            let papers = own_papers(
                dataset,
                category,
                Level::L2,
                &[child.as_str(), qualified.as_str(), name.as_str()],
                filter,
            );
            // A child listed under several L1 parents keeps one node per parent.
            let id = if listed_twice.contains(child) {
                NodeId::from(qualified)
            } else {
                child.clone()
            };
            nodes.push(
                VisibleNode {
                    id,
                    name,
                    column: Column::Platform,
                    color,
                    value: 0,
                    has_children: false,
                    tier: NodeTier::L2 {
                        parent_id: parent.clone(),
                        original_id: child.clone(),
                    },
                },
                papers,
            );
        }
    }
    nodes
}

/// Method and Content share one taxonomy layout.
fn taxonomy_nodes(
    dataset: &Dataset,
    state: &InteractionState,
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
    column: Column,
) -> ColumnNodes {
    let category = state.category(column);
    let default_color = options.colors.for_column(column);
    match state.column(column) {
        ColumnExpansion::Collapsed => l1_nodes(dataset, filter, category, column, default_color),
        ColumnExpansion::Branches { expanded } => {
            l2_nodes(dataset, filter, category, column, default_color, expanded)
        }
        ColumnExpansion::Drilled { node, focus, .. } => {
            l3_nodes(dataset, filter, category, column, default_color, node, focus)
        }
    }
}

fn l1_nodes(
    dataset: &Dataset,
    filter: &YearFilter<'_>,
    category: Category,
    column: Column,
    default_color: &str,
) -> ColumnNodes {
    let mut nodes = ColumnNodes::default();
    for (id, meta) in dataset.hierarchy.l1_nodes(category) {
        let papers = own_papers(dataset, category, Level::L1, &[id], filter);
        nodes.push(
            VisibleNode {
                id: NodeId::from(id),
                name: id.to_string(),
                column,
                color: pick_color([meta.color.as_deref()], default_color),
                value: 0,
                has_children: dataset.has_children(category, Level::L1, id),
                tier: NodeTier::L1,
            },
            papers,
        );
    }
    nodes
}

fn l2_nodes(
    dataset: &Dataset,
    filter: &YearFilter<'_>,
    category: Category,
    column: Column,
    default_color: &str,
    parents: &[NodeId],
) -> ColumnNodes {
    let mut nodes = ColumnNodes::default();
    for parent in parents {
        let parent_color = dataset.hierarchy.color(category, parent.as_str());
        for child in dataset.children_of(category, Level::L1, parent.as_str()) {
            let Some(meta) = dataset.hierarchy.metadata(category, child.as_str()) else {
                warn!(%category, %parent, %child, "Skipping L2 node without metadata");
                continue;
            };
            let name = meta.display_name.as_deref().unwrap_or(child.as_str());
            let qualified = qualified_id(parent.as_str(), child.as_str());
            // Display names reused under another L1 parent fall back to the full id.
            let id = if dataset.hierarchy.is_ambiguous_l2(category, name) {
                qualified.as_str()
            } else {
                name
            };
            let papers = own_papers(
                dataset,
                category,
                Level::L2,
                &[id, child.as_str(), qualified.as_str()],
                filter,
            );
            nodes.push(
                VisibleNode {
                    id: NodeId::from(id),
                    name: name.to_string(),
                    column,
                    color: pick_color([meta.color.as_deref(), parent_color], default_color),
                    value: 0,
                    has_children: dataset.has_children(category, Level::L2, child.as_str()),
                    tier: NodeTier::L2 {
                        parent_id: parent.clone(),
                        original_id: child.clone(),
                    },
                },
                papers,
            );
        }
    }
    nodes
}

fn l3_nodes(
    dataset: &Dataset,
    filter: &YearFilter<'_>,
    category: Category,
    column: Column,
    default_color: &str,
    parent_id: &NodeId,
    focus: &NodeId,
) -> ColumnNodes {
    let mut nodes = ColumnNodes::default();
    let Some(parent_key) = dataset.hierarchy.resolve_l2(category, focus.as_str()) else {
        debug!(%category, %focus, "Drilled node has no L3 children");
        return nodes;
    };
    let parent_color = dataset.hierarchy.color(category, parent_key.as_str());
    let grandparent_color = dataset
        .hierarchy
        .parent_of(category, Level::L2, parent_key.as_str())
        .and_then(|grandparent| dataset.hierarchy.color(category, grandparent.as_str()));

    for child in dataset.children_of(category, Level::L2, parent_key.as_str()) {
        let meta = dataset.hierarchy.metadata(category, child.as_str());
        let name = meta
            .and_then(|meta| meta.display_name.clone())
            .unwrap_or_else(|| child.to_string());
        let color = pick_color(
            [
                meta.and_then(|meta| meta.color.as_deref()),
                parent_color,
                grandparent_color,
            ],
            default_color,
        );
        let qualified = format!("{parent_key}-{child}");
        let papers = own_papers(
            dataset,
            category,
            Level::L3,
            &[child.as_str(), qualified.as_str(), name.as_str()],
            filter,
        );
        nodes.push(
            VisibleNode {
                id: child.clone(),
                name,
                column,
                color,
                value: 0,
                has_children: false,
                tier: NodeTier::L3 {
                    parent_id: parent_id.clone(),
                    original_l2_parent: parent_key.clone(),
                },
            },
            papers,
        );
    }
    nodes
}

/// Filtered papers stored under the first candidate id that has any.
fn own_papers(
    dataset: &Dataset,
    category: Category,
    level: Level,
    candidates: &[&str],
    filter: &YearFilter<'_>,
) -> BTreeSet<PaperId> {
    candidates
        .iter()
        .find_map(|id| dataset.papers_of(category, level, id))
        .map(|papers| {
            papers
                .iter()
                .filter(|paper| filter.keeps(paper.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn pick_color<'c>(
    candidates: impl IntoIterator<Item = Option<&'c str>>,
    fallback: &'c str,
) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|color| is_real_color(color))
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_color_skips_placeholders() {
        assert_eq!(
            pick_color([Some("#PLACEHOLDER"), None, Some("#111111")], "#000000"),
            "#111111"
        );
        assert_eq!(pick_color([Some("")], "#000000"), "#000000");
    }
}
