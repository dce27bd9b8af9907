//! Hierarchical graph snapshots for the three-column paper map.
//!
//! [`InteractionState`] records what each column is drilled into and
//! [`build_snapshot`] turns it, together with a [`papermap_dataset::Dataset`],
//! into the visible nodes and links.

pub mod links;
pub mod model;
pub mod nodes;
pub mod options;
pub mod snapshot;
pub mod state;
pub mod year_filter;

pub use links::build_links;
pub use model::{NodeTier, Snapshot, VisibleLink, VisibleNode};
pub use nodes::{build_content_nodes, build_method_nodes, build_platform_nodes};
pub use options::{ColumnColors, SnapshotOptions};
pub use snapshot::{SnapshotPath, build_snapshot, build_snapshot_with};
pub use state::{ColumnExpansion, DEFAULT_HISTORY_DEPTH, InteractionState, UndoHistory, ViewState};
pub use year_filter::YearFilter;
