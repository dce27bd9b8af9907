//! Visible edges between adjacent columns.
//!
//! Each column pair reads one stored connection table. When the table is
//! finer than what a column displays, raw endpoints fold onto their visible
//! ancestor and merge. When it is coarser, the paper list is split across the
//! visible descendants in ceiling-sized chunks so totals are conserved.

use crate::model::{NodeTier, VisibleLink, VisibleNode};
use crate::options::SnapshotOptions;
use crate::state::InteractionState;
use crate::year_filter::YearFilter;
use papermap_core::{
    Category, Column, ConnectionStrength, Level, LevelTag, PaperId, StrengthThresholds,
    qualified_id,
};
use papermap_dataset::{Dataset, EdgeInfo, OrientedTable};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Links of one column pair with the node indices each one joins.
#[derive(Debug, Default)]
pub(crate) struct ColumnPairLinks {
    pub links: Vec<VisibleLink>,
    /// `(source, target)` positions in the two columns' node lists, parallel to `links`.
    pub endpoints: Vec<(usize, usize)>,
}

/// Links of both column pairs, kept apart so node values can be reconciled per column.
#[derive(Debug, Default)]
pub(crate) struct PairLinks {
    pub platform_content: ColumnPairLinks,
    pub content_method: ColumnPairLinks,
}

impl PairLinks {
    pub fn into_links(self) -> Vec<VisibleLink> {
        let mut links = self.platform_content.links;
        links.extend(self.content_method.links);
        links
    }
}

/// Visible nodes of one column, indexed by every spelling a table may use.
pub(crate) struct ColumnView<'a> {
    dataset: &'a Dataset,
    category: Category,
    level: Level,
    nodes: &'a [VisibleNode],
    /// `None` marks a spelling shared by several visible nodes.
    aliases: HashMap<String, Option<usize>>,
}

enum Resolution {
    Exact(usize),
    Folded(usize),
    Split(Vec<usize>),
    Missing,
}

impl<'a> ColumnView<'a> {
    pub fn new(
        dataset: &'a Dataset,
        category: Category,
        level: Level,
        nodes: &'a [VisibleNode],
    ) -> Self {
        let mut aliases = HashMap::new();
        for (index, node) in nodes.iter().enumerate() {
            let mut names = vec![
                node.id.to_string(),
                node.name.clone(),
                node.lookup_id().to_string(),
            ];
            if let Some(parent) = node.tier.parent_id() {
                names.push(qualified_id(parent.as_str(), node.lookup_id().as_str()));
            }
            if level == Level::L2
                && !category.is_platform()
                && let Some(full) = dataset
                    .hierarchy
                    .canonical_l2(category, node.lookup_id().as_str())
            {
                names.push(full.to_string());
            }
            if let NodeTier::L3 {
                original_l2_parent, ..
            } = &node.tier
            {
                names.push(qualified_id(original_l2_parent.as_str(), node.id.as_str()));
            }
            for name in names {
                match aliases.entry(name) {
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
        Self {
            dataset,
            category,
            level,
            nodes,
            aliases,
        }
    }

    fn lookup(&self, raw: &str) -> Option<usize> {
        match self.aliases.get(raw) {
            Some(found) => *found,
            None if self.level == Level::L2 && !self.category.is_platform() => {
                let full = self.dataset.hierarchy.canonical_l2(self.category, raw)?;
                self.aliases.get(full.as_str()).copied().flatten()
            }
            None => None,
        }
    }

    /// Visible nodes that a raw id stored at display level `raw_level` lands on.
    fn resolve(&self, raw: &str, raw_level: Level) -> Resolution {
        if raw_level == self.level {
            return self.lookup(raw).map_or(Resolution::Missing, Resolution::Exact);
        }

        if raw_level > self.level {
            let mut current = raw;
            let mut level = raw_level;
            while level > self.level {
                let Some(parent) = self.dataset.parent_of(self.category, level, current) else {
                    debug!(category = %self.category, raw, %level, "No parent to fold onto");
                    return Resolution::Missing;
                };
                current = parent.as_str();
                level = level.prev().unwrap_or(Level::L1);
            }
            return self.lookup(current).map_or(Resolution::Missing, Resolution::Folded);
        }

        let targets: Vec<usize> = (0..self.nodes.len())
            .filter(|&index| {
                self.ancestor(index, raw_level)
                    .is_some_and(|ancestor| self.same_node(raw_level, ancestor, raw))
            })
            .collect();
        if targets.is_empty() {
            Resolution::Missing
        } else {
            Resolution::Split(targets)
        }
    }

    /// Id of the visible node's ancestor at `level`.
    fn ancestor(&self, index: usize, level: Level) -> Option<&str> {
        let node = &self.nodes[index];
        let mut current = node.lookup_id().as_str();
        let mut current_level = node.level();
        while current_level > level {
            current = match (&node.tier, current_level) {
                (NodeTier::L3 { original_l2_parent, .. }, Level::L3) => {
                    original_l2_parent.as_str()
                }
                (NodeTier::L2 { parent_id, .. }, Level::L2) => parent_id.as_str(),
                _ => self
                    .dataset
                    .parent_of(self.category, current_level, current)?
                    .as_str(),
            };
            current_level = current_level.prev()?;
        }
        Some(current)
    }

    fn same_node(&self, level: Level, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        if level == Level::L2 && !self.category.is_platform() {
            let hierarchy = &self.dataset.hierarchy;
            let left = hierarchy.canonical_l2(self.category, a);
            return left.is_some() && left == hierarchy.canonical_l2(self.category, b);
        }
        self.dataset
            .hierarchy
            .metadata(self.category, b)
            .and_then(|meta| meta.display_name.as_deref())
            == Some(a)
    }

    fn tag(&self, level: Level) -> LevelTag {
        LevelTag::new(self.category, self.category.storage_level(level))
    }

    /// Display levels with a stored counterpart, best first: exact, then finer, then coarser.
    fn candidate_levels(&self) -> Vec<(Level, (u8, u8))> {
        let mut levels: Vec<(Level, (u8, u8))> = self
            .category
            .storage_levels()
            .iter()
            .filter_map(|&storage| self.category.display_level(storage))
            .map(|level| {
                let rank = if level >= self.level {
                    (0, level.depth() - self.level.depth())
                } else {
                    (1, self.level.depth() - level.depth())
                };
                (level, rank)
            })
            .collect();
        levels.sort_by_key(|&(_, rank)| rank);
        levels
    }
}

/// Picks the table for `from -> to`, falling back to the nearest stored
/// granularity when the exact table is missing or empty.
fn select_table<'d>(
    dataset: &'d Dataset,
    from: &ColumnView<'_>,
    to: &ColumnView<'_>,
) -> Option<(OrientedTable<'d>, Level, Level)> {
    let mut pairs = Vec::new();
    for &(from_level, (from_coarse, from_distance)) in &from.candidate_levels() {
        for &(to_level, (to_coarse, to_distance)) in &to.candidate_levels() {
            pairs.push((
                (from_coarse + to_coarse, from_distance + to_distance),
                from_level,
                to_level,
            ));
        }
    }
    pairs.sort_by_key(|&(rank, _, _)| rank);

    let selected = pairs.into_iter().find_map(|(_, from_level, to_level)| {
        dataset
            .connections
            .oriented(from.tag(from_level), to.tag(to_level))
            .map(|table| (table, from_level, to_level))
    });
    match &selected {
        Some((table, from_level, to_level))
            if *from_level != from.level || *to_level != to.level =>
        {
            debug!(key = %table.stored_key, "Exact table missing, using nearest stored table");
        }
        None => debug!(
            from = %from.tag(from.level),
            to = %to.tag(to.level),
            "No connection table for column pair"
        ),
        _ => {}
    }
    selected
}

#[derive(Debug)]
struct PendingLink {
    source: usize,
    target: usize,
    papers: Vec<PaperId>,
    strength: Option<ConnectionStrength>,
    reshaped: bool,
}

/// Merges candidate edges per visible pair, in first-seen order.
#[derive(Debug, Default)]
struct LinkAccumulator {
    pending: Vec<PendingLink>,
    positions: HashMap<(usize, usize), usize>,
}

impl LinkAccumulator {
    fn add(
        &mut self,
        (source, target): (usize, usize),
        papers: Vec<PaperId>,
        strength: Option<ConnectionStrength>,
        reshaped: bool,
    ) {
        match self.positions.get(&(source, target)) {
            Some(&position) => {
                let existing = &mut self.pending[position];
                existing.papers.extend(papers);
                existing.reshaped = true;
            }
            None => {
                self.positions.insert((source, target), self.pending.len());
                self.pending.push(PendingLink {
                    source,
                    target,
                    papers,
                    strength,
                    reshaped,
                });
            }
        }
    }

    fn emit(
        self,
        sources: &[VisibleNode],
        targets: &[VisibleNode],
        thresholds: &StrengthThresholds,
    ) -> ColumnPairLinks {
        let mut emitted = ColumnPairLinks::default();
        for mut link in self.pending {
            let mut seen = HashSet::new();
            link.papers.retain(|paper| seen.insert(paper.clone()));
            if link.papers.is_empty() {
                continue;
            }
            let value = link.papers.len();
            let strength = match link.strength {
                Some(strength) if !link.reshaped => strength,
                _ => thresholds.classify(value),
            };
            emitted.links.push(VisibleLink {
                source: sources[link.source].id.clone(),
                target: targets[link.target].id.clone(),
                value,
                paper_ids: link.papers,
                connection_strength: Some(strength),
            });
            emitted.endpoints.push((link.source, link.target));
        }
        emitted
    }
}

fn link_pair(
    dataset: &Dataset,
    from: &ColumnView<'_>,
    to: &ColumnView<'_>,
    filter: &YearFilter<'_>,
    thresholds: &StrengthThresholds,
) -> ColumnPairLinks {
    if from.nodes.is_empty() || to.nodes.is_empty() {
        return ColumnPairLinks::default();
    }
    let Some((table, from_level, to_level)) = select_table(dataset, from, to) else {
        return ColumnPairLinks::default();
    };

    let mut accumulator = LinkAccumulator::default();
    for (raw_source, raw_target, info) in table.iter() {
        let (sources, source_reshaped) = match from.resolve(raw_source.as_str(), from_level) {
            Resolution::Exact(index) => (vec![index], false),
            Resolution::Folded(index) => (vec![index], true),
            Resolution::Split(indices) => (indices, true),
            Resolution::Missing => continue,
        };
        let (targets, target_reshaped) = match to.resolve(raw_target.as_str(), to_level) {
            Resolution::Exact(index) => (vec![index], false),
            Resolution::Folded(index) => (vec![index], true),
            Resolution::Split(indices) => (indices, true),
            Resolution::Missing => continue,
        };

        let pairs: Vec<(usize, usize)> = sources
            .iter()
            .flat_map(|&source| targets.iter().map(move |&target| (source, target)))
            .collect();
        for (pair, papers) in split_papers(&pairs, info) {
            let kept = filter.filter_papers(papers);
            let filtered = kept.len() != papers.len();
            accumulator.add(
                pair,
                kept,
                info.connection_strength,
                source_reshaped || target_reshaped || filtered,
            );
        }
    }
    accumulator.emit(from.nodes, to.nodes, thresholds)
}

/// Exact partition of an edge's papers over `pairs`, in enumeration order.
/// Trailing pairs receive nothing once the list runs out.
fn split_papers<'i>(
    pairs: &[(usize, usize)],
    info: &'i EdgeInfo,
) -> Vec<((usize, usize), &'i [PaperId])> {
    if pairs.len() == 1 {
        return vec![(pairs[0], info.paper_ids.as_slice())];
    }
    let chunk = info.paper_ids.len().div_ceil(pairs.len());
    if chunk == 0 {
        return Vec::new();
    }
    pairs
        .iter()
        .copied()
        .zip(info.paper_ids.chunks(chunk))
        .collect()
}

/// Links of every adjacent column pair for arbitrary column levels.
pub fn build_links(
    dataset: &Dataset,
    state: &InteractionState,
    nodes: [&[VisibleNode]; 3],
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> Vec<VisibleLink> {
    link_columns(dataset, state, nodes, filter, options).into_links()
}

pub(crate) fn link_columns(
    dataset: &Dataset,
    state: &InteractionState,
    nodes: [&[VisibleNode]; 3],
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> PairLinks {
    let views = Column::ALL.map(|column| {
        ColumnView::new(
            dataset,
            state.category(column),
            state.column_level(column),
            nodes[column.index()],
        )
    });
    let [platform, method, content] = &views;
    PairLinks {
        platform_content: link_pair(dataset, platform, content, filter, &options.strength),
        content_method: link_pair(dataset, content, method, filter, &options.strength),
    }
}

/// The two L1 tables, when every column is at L1 and both are stored.
pub(crate) fn l1_tables<'d>(
    dataset: &'d Dataset,
    state: &InteractionState,
) -> Option<(OrientedTable<'d>, OrientedTable<'d>)> {
    if state.column_levels() != [Level::L1; 3] {
        return None;
    }
    let tag = |column: Column| {
        let category = state.category(column);
        LevelTag::new(category, category.storage_level(Level::L1))
    };
    let platform_content = dataset
        .connections
        .oriented(tag(Column::Platform), tag(Column::Content))?;
    let content_method = dataset
        .connections
        .oriented(tag(Column::Content), tag(Column::Method))?;
    Some((platform_content, content_method))
}

/// Direct L1 linking: every endpoint is a same-level lookup.
pub(crate) fn link_l1_columns(
    dataset: &Dataset,
    state: &InteractionState,
    nodes: [&[VisibleNode]; 3],
    tables: (OrientedTable<'_>, OrientedTable<'_>),
    filter: &YearFilter<'_>,
    options: &SnapshotOptions,
) -> PairLinks {
    let views = Column::ALL.map(|column| {
        ColumnView::new(dataset, state.category(column), Level::L1, nodes[column.index()])
    });
    let [platform, method, content] = &views;
    PairLinks {
        platform_content: link_l1_pair(tables.0, platform, content, filter, &options.strength),
        content_method: link_l1_pair(tables.1, content, method, filter, &options.strength),
    }
}

fn link_l1_pair(
    table: OrientedTable<'_>,
    from: &ColumnView<'_>,
    to: &ColumnView<'_>,
    filter: &YearFilter<'_>,
    thresholds: &StrengthThresholds,
) -> ColumnPairLinks {
    let mut accumulator = LinkAccumulator::default();
    for (raw_source, raw_target, info) in table.iter() {
        let (Some(source), Some(target)) =
            (from.lookup(raw_source.as_str()), to.lookup(raw_target.as_str()))
        else {
            continue;
        };
        let kept = filter.filter_papers(&info.paper_ids);
        let filtered = kept.len() != info.paper_ids.len();
        accumulator.add((source, target), kept, info.connection_strength, filtered);
    }
    accumulator.emit(from.nodes, to.nodes, thresholds)
}
