//! Per-column drill state and its undo history.

use papermap_core::{Category, Column, Level, NodeId, PlatformType};
use papermap_dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// What one column is showing.
///
/// The level is derived from the variant, so a column above L1 always has at
/// least one expanded node and an L3 column has exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColumnExpansion {
    #[default]
    Collapsed,
    /// L2: children of each expanded L1 node.
    Branches { expanded: Vec<NodeId> },
    /// L3: children of `focus`, the stored key of the L2 node `node`.
    /// `branches` is restored when stepping back to L2.
    Drilled {
        branches: Vec<NodeId>,
        node: NodeId,
        focus: NodeId,
    },
}

impl ColumnExpansion {
    pub fn level(&self) -> Level {
        match self {
            ColumnExpansion::Collapsed => Level::L1,
            ColumnExpansion::Branches { .. } => Level::L2,
            ColumnExpansion::Drilled { .. } => Level::L3,
        }
    }

    /// The expansion list of the current level.
    pub fn expanded_nodes(&self) -> &[NodeId] {
        match self {
            ColumnExpansion::Collapsed => &[],
            ColumnExpansion::Branches { expanded } => expanded,
            ColumnExpansion::Drilled { focus, .. } => std::slice::from_ref(focus),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        match self {
            ColumnExpansion::Collapsed => false,
            ColumnExpansion::Branches { expanded } => expanded.iter().any(|node| node.as_str() == id),
            ColumnExpansion::Drilled { node, focus, .. } => {
                node.as_str() == id || focus.as_str() == id
            }
        }
    }
}

/// The part of the state that undo restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub platform_type: PlatformType,
    pub columns: [ColumnExpansion; 3],
}

impl ViewState {
    pub fn new(platform_type: PlatformType) -> Self {
        Self {
            platform_type,
            columns: Default::default(),
        }
    }

    pub fn column(&self, column: Column) -> &ColumnExpansion {
        &self.columns[column.index()]
    }

    pub fn column_levels(&self) -> [Level; 3] {
        self.columns.each_ref().map(ColumnExpansion::level)
    }
}

/// Undo stack that drops its oldest entry once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<ViewState>,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_DEPTH)
    }
}

impl UndoHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: ViewState) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<ViewState> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Interaction state machine. Every mutating operation returns whether
/// anything changed; no-ops leave the history untouched.
#[derive(Debug, Clone)]
pub struct InteractionState {
    view: ViewState,
    selected_year: Option<String>,
    history: UndoHistory,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(PlatformType::default(), DEFAULT_HISTORY_DEPTH)
    }
}

impl InteractionState {
    pub fn new(platform_type: PlatformType, history_depth: usize) -> Self {
        Self {
            view: ViewState::new(platform_type),
            selected_year: None,
            history: UndoHistory::with_capacity(history_depth),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn platform_type(&self) -> PlatformType {
        self.view.platform_type
    }

    pub fn column(&self, column: Column) -> &ColumnExpansion {
        self.view.column(column)
    }

    pub fn column_level(&self, column: Column) -> Level {
        self.column(column).level()
    }

    pub fn column_levels(&self) -> [Level; 3] {
        self.view.column_levels()
    }

    pub fn expanded_nodes(&self, column: Column) -> &[NodeId] {
        self.column(column).expanded_nodes()
    }

    pub fn selected_year(&self) -> Option<&str> {
        self.selected_year.as_deref()
    }

    pub fn category(&self, column: Column) -> Category {
        Category::for_column(column, self.view.platform_type)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Drills `column` one level down into `node_id`.
    ///
    /// At L2 an L1 id opens another branch next to the expanded ones instead.
    pub fn expand(&mut self, dataset: &Dataset, column: Column, node_id: &str) -> bool {
        let level = self.column_level(column);
        if level >= column.max_level() {
            debug!(%column, %level, node_id, "Expand ignored at max level");
            return false;
        }
        let category = self.category(column);

        let next = match self.column(column) {
            ColumnExpansion::Collapsed if dataset.has_children(category, Level::L1, node_id) => {
                ColumnExpansion::Branches {
                    expanded: vec![NodeId::from(node_id)],
                }
            }
            ColumnExpansion::Branches { expanded }
                if dataset.has_children(category, Level::L1, node_id) =>
            {
                if expanded.iter().any(|node| node.as_str() == node_id) {
                    debug!(%column, node_id, "Expand ignored, branch already open");
                    return false;
                }
                let mut expanded = expanded.clone();
                expanded.push(NodeId::from(node_id));
                ColumnExpansion::Branches { expanded }
            }
            ColumnExpansion::Branches { expanded }
                if dataset.has_children(category, Level::L2, node_id) =>
            {
                let focus = dataset
                    .hierarchy
                    .resolve_l2(category, node_id)
                    .cloned()
                    .unwrap_or_else(|| NodeId::from(node_id));
                ColumnExpansion::Drilled {
                    branches: expanded.clone(),
                    node: NodeId::from(node_id),
                    focus,
                }
            }
            _ => {
                debug!(%column, %level, node_id, "Expand ignored, node has no children");
                return false;
            }
        };
        self.replace_column(column, next);
        true
    }

    /// Removes `node_id` from the column's expansion, or steps one level up
    /// when no id is given.
    pub fn collapse(&mut self, column: Column, node_id: Option<&str>) -> bool {
        let next = match (self.column(column), node_id) {
            (ColumnExpansion::Collapsed, _) => {
                debug!(%column, "Collapse ignored at L1");
                return false;
            }
            (ColumnExpansion::Branches { expanded }, Some(id)) => {
                if !expanded.iter().any(|node| node.as_str() == id) {
                    debug!(%column, id, "Collapse ignored, node not expanded");
                    return false;
                }
                let remaining: Vec<NodeId> = expanded
                    .iter()
                    .filter(|node| node.as_str() != id)
                    .cloned()
                    .collect();
                if remaining.is_empty() {
                    ColumnExpansion::Collapsed
                } else {
                    ColumnExpansion::Branches {
                        expanded: remaining,
                    }
                }
            }
            (ColumnExpansion::Branches { .. }, None) => ColumnExpansion::Collapsed,
            (drilled @ ColumnExpansion::Drilled { branches, .. }, id) => {
                if let Some(id) = id
                    && !drilled.is_expanded(id)
                {
                    debug!(%column, id, "Collapse ignored, node not expanded");
                    return false;
                }
                step_back_to_branches(branches)
            }
        };
        self.replace_column(column, next);
        true
    }

    pub fn toggle(&mut self, dataset: &Dataset, column: Column, node_id: &str) -> bool {
        if self.column(column).is_expanded(node_id) {
            self.collapse(column, Some(node_id))
        } else {
            self.expand(dataset, column, node_id)
        }
    }

    pub fn reset_column(&mut self, column: Column) -> bool {
        if self.column(column) == &ColumnExpansion::Collapsed {
            return false;
        }
        self.replace_column(column, ColumnExpansion::Collapsed);
        true
    }

    /// Swaps the platform sub-taxonomy, leaving every column as it is.
    pub fn set_platform_type(&mut self, platform_type: PlatformType) -> bool {
        if self.view.platform_type == platform_type {
            return false;
        }
        self.push_history();
        self.view.platform_type = platform_type;
        true
    }

    /// Swaps the platform sub-taxonomy and translates the platform column's
    /// expanded nodes through the switch mapping. Untranslatable expansions
    /// collapse the platform column.
    pub fn switch_platform_type(&mut self, dataset: &Dataset, platform_type: PlatformType) -> bool {
        let from = self.view.platform_type;
        if from == platform_type {
            return false;
        }

        let platform = match self.column(Column::Platform) {
            ColumnExpansion::Collapsed => ColumnExpansion::Collapsed,
            expansion => {
                let mut translated: Vec<NodeId> = Vec::new();
                for id in expansion.expanded_nodes() {
                    for target in dataset.platforms.translate(from, platform_type, id.as_str()) {
                        if !translated.contains(target) {
                            translated.push(target.clone());
                        }
                    }
                }
                if translated.is_empty() {
                    debug!(%from, to = %platform_type, "No platform expansion survives the switch");
                    ColumnExpansion::Collapsed
                } else {
                    ColumnExpansion::Branches {
                        expanded: translated,
                    }
                }
            }
        };

        self.push_history();
        self.view.platform_type = platform_type;
        self.view.columns[Column::Platform.index()] = platform;
        true
    }

    /// Sets the year filter. Not recorded in the undo history.
    pub fn select_year(&mut self, year: Option<String>) -> bool {
        if self.selected_year == year {
            return false;
        }
        self.selected_year = year;
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(view) => {
                self.view = view;
                true
            }
            None => false,
        }
    }

    fn replace_column(&mut self, column: Column, expansion: ColumnExpansion) {
        self.push_history();
        self.view.columns[column.index()] = expansion;
    }

    fn push_history(&mut self) {
        self.history.push(self.view.clone());
    }
}

fn step_back_to_branches(branches: &[NodeId]) -> ColumnExpansion {
    if branches.is_empty() {
        ColumnExpansion::Collapsed
    } else {
        ColumnExpansion::Branches {
            expanded: branches.to_vec(),
        }
    }
}
