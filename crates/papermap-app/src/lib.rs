//! Application-facing wrapper around the snapshot engine.
//!
//! [`VisualizationContext`] owns the shared dataset, the interaction state and
//! the last computed snapshot. Shells drive it directly or through
//! [`papermap_events::EventBus`].

mod context;
pub mod settings;

pub use context::VisualizationContext;
pub use settings::ExplorerSettings;
