use crate::links::{self, ColumnPairLinks, PairLinks};
use crate::model::Snapshot;
use crate::nodes::{self, ColumnNodes};
use crate::options::SnapshotOptions;
use crate::state::InteractionState;
use crate::year_filter::YearFilter;
use papermap_core::{Column, PaperId};
use papermap_dataset::Dataset;
use std::collections::{BTreeSet, HashMap};

/// Which link construction to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPath {
    /// L1 shortcut when every column is at L1 and both L1 tables exist.
    #[default]
    Auto,
    /// Always resolve through the fold/split machinery.
    General,
}

/// Computes the visible nodes and links for `state`. Never mutates anything.
pub fn build_snapshot(
    dataset: &Dataset,
    state: &InteractionState,
    options: &SnapshotOptions,
) -> Snapshot {
    build_snapshot_with(dataset, state, options, SnapshotPath::Auto)
}

pub fn build_snapshot_with(
    dataset: &Dataset,
    state: &InteractionState,
    options: &SnapshotOptions,
    path: SnapshotPath,
) -> Snapshot {
    let filter = YearFilter::new(dataset, state.selected_year());
    let mut columns =
        Column::ALL.map(|column| nodes::column_nodes(dataset, state, &filter, options, column));

    let visible = [
        columns[0].nodes.as_slice(),
        columns[1].nodes.as_slice(),
        columns[2].nodes.as_slice(),
    ];
    let pair_links = match (path, links::l1_tables(dataset, state)) {
        (SnapshotPath::Auto, Some(tables)) => {
            links::link_l1_columns(dataset, state, visible, tables, &filter, options)
        }
        _ => links::link_columns(dataset, state, visible, &filter, options),
    };

    reconcile_values(&mut columns, &pair_links);
    Snapshot {
        nodes: columns.into_iter().flat_map(|column| column.nodes).collect(),
        links: pair_links.into_links(),
    }
}

/// Raises each node's value to cover every paper on its incident links.
///
/// Links are matched to nodes by position, never by id.
fn reconcile_values(columns: &mut [ColumnNodes; 3], links: &PairLinks) {
    let platform_content = &links.platform_content;
    let content_method = &links.content_method;
    let per_column = [
        incident_papers(&[(platform_content, Side::Source)]),
        incident_papers(&[(content_method, Side::Target)]),
        incident_papers(&[(platform_content, Side::Target), (content_method, Side::Source)]),
    ];

    for (column, incident) in columns.iter_mut().zip(per_column) {
        let ColumnNodes { nodes, papers, .. } = column;
        for (index, (node, own)) in nodes.iter_mut().zip(papers.iter()).enumerate() {
            let Some(link_papers) = incident.get(&index) else {
                continue;
            };
            let mut all: BTreeSet<&PaperId> = own.iter().collect();
            all.extend(link_papers.iter().copied());
            node.value = all.len().max(1);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Source,
    Target,
}

/// Papers per node position on one side of the given links.
fn incident_papers<'l>(
    sides: &[(&'l ColumnPairLinks, Side)],
) -> HashMap<usize, Vec<&'l PaperId>> {
    let mut papers: HashMap<usize, Vec<&PaperId>> = HashMap::new();
    for &(pair, side) in sides {
        for (link, &(source, target)) in pair.links.iter().zip(&pair.endpoints) {
            let index = match side {
                Side::Source => source,
                Side::Target => target,
            };
            papers.entry(index).or_default().extend(link.paper_ids.iter());
        }
    }
    papers
}
