use crate::settings::ExplorerSettings;
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use papermap_core::{Column, PlatformType};
use papermap_dataset::Dataset;
use papermap_events::{Event, EventBus, EventListener};
use papermap_graph::{InteractionState, Snapshot, SnapshotOptions, build_snapshot};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dataset, interaction state and the snapshot derived from them.
///
/// Until a dataset is attached every operation is a no-op and the snapshot is empty.
pub struct VisualizationContext {
    dataset: Option<Arc<Dataset>>,
    state: InteractionState,
    settings: ExplorerSettings,
    options: SnapshotOptions,
    cache: Mutex<Option<Arc<Snapshot>>>,
    notify: Option<Sender<Event>>,
}

impl Default for VisualizationContext {
    fn default() -> Self {
        Self::new(ExplorerSettings::default())
    }
}

impl VisualizationContext {
    pub fn new(settings: ExplorerSettings) -> Self {
        Self {
            dataset: None,
            state: InteractionState::new(settings.default_platform_type, settings.history_depth),
            options: settings.snapshot_options(),
            settings,
            cache: Mutex::new(None),
            notify: None,
        }
    }

    /// Builds a context and loads `settings.data_dir` when one is configured.
    ///
    /// Load events are not published, notifications start with
    /// [`VisualizationContext::with_notifications`].
    pub fn open(settings: ExplorerSettings) -> Result<Self> {
        let data_dir = settings.data_dir.clone();
        let mut context = Self::new(settings);
        match data_dir {
            Some(dir) => context.load_dataset(&dir)?,
            None => debug!("No data directory configured, starting without a dataset"),
        }
        Ok(context)
    }

    /// Publishes `SnapshotChanged` and `UndoStackChanged` on `bus` after each change.
    pub fn with_notifications(mut self, bus: &EventBus) -> Self {
        self.notify = Some(bus.sender());
        self
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    /// Replaces the dataset and starts from a fresh interaction state.
    pub fn attach_dataset(&mut self, dataset: Arc<Dataset>) {
        self.dataset = Some(dataset);
        self.state = InteractionState::new(
            self.settings.default_platform_type,
            self.settings.history_depth,
        );
        self.changed();
    }

    pub fn load_dataset(&mut self, dir: &Path) -> Result<()> {
        let dataset = Dataset::load_dir(dir)
            .with_context(|| format!("Failed to load dataset from {}", dir.display()))?;
        info!(dir = %dir.display(), "Dataset attached");
        self.publish(Event::DatasetLoaded {
            tables: dataset.connections.len(),
            papers_with_year: dataset.years.len(),
        });
        if dataset.years.is_empty() {
            self.publish(Event::ShowWarning {
                message: "No paper years in this dataset, year filter is disabled".to_string(),
            });
        }
        self.attach_dataset(Arc::new(dataset));
        Ok(())
    }

    /// The current snapshot, recomputed only after a change.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let Some(dataset) = &self.dataset else {
            return Arc::new(Snapshot::default());
        };
        let mut cache = self.cache.lock();
        cache
            .get_or_insert_with(|| Arc::new(build_snapshot(dataset, &self.state, &self.options)))
            .clone()
    }

    pub fn can_undo(&self) -> bool {
        self.dataset.is_some() && self.state.can_undo()
    }

    pub fn expand(&mut self, column: Column, node_id: &str) -> bool {
        self.apply(|state, dataset| state.expand(dataset, column, node_id))
    }

    pub fn collapse(&mut self, column: Column, node_id: Option<&str>) -> bool {
        self.apply(|state, _| state.collapse(column, node_id))
    }

    pub fn toggle(&mut self, column: Column, node_id: &str) -> bool {
        self.apply(|state, dataset| state.toggle(dataset, column, node_id))
    }

    pub fn reset_column(&mut self, column: Column) -> bool {
        self.apply(|state, _| state.reset_column(column))
    }

    pub fn set_platform_type(&mut self, platform_type: PlatformType) -> bool {
        self.apply(|state, _| state.set_platform_type(platform_type))
    }

    pub fn switch_platform_type(&mut self, platform_type: PlatformType) -> bool {
        self.apply(|state, dataset| state.switch_platform_type(dataset, platform_type))
    }

    pub fn select_year(&mut self, year: Option<String>) -> bool {
        self.apply(|state, _| state.select_year(year))
    }

    pub fn undo(&mut self) -> bool {
        self.apply(|state, _| state.undo())
    }

    fn apply(&mut self, operation: impl FnOnce(&mut InteractionState, &Dataset) -> bool) -> bool {
        let Some(dataset) = self.dataset.clone() else {
            debug!("No dataset attached, ignoring operation");
            return false;
        };
        let changed = operation(&mut self.state, &dataset);
        if changed {
            self.changed();
        }
        changed
    }

    fn changed(&mut self) {
        *self.cache.get_mut() = None;
        if self.notify.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        self.publish(Event::SnapshotChanged {
            nodes: snapshot.nodes.len(),
            links: snapshot.links.len(),
        });
        self.publish(Event::UndoStackChanged {
            can_undo: self.state.can_undo(),
            depth: self.state.history().len(),
        });
    }

    fn publish(&self, event: Event) {
        if let Some(tx) = &self.notify {
            let _ = tx.send(event);
        }
    }
}

impl EventListener for VisualizationContext {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::ExpandNode { column, node_id } => {
                self.expand(*column, node_id);
            }
            Event::CollapseNode { column, node_id } => {
                self.collapse(*column, node_id.as_deref());
            }
            Event::ToggleNode { column, node_id } => {
                self.toggle(*column, node_id);
            }
            Event::ResetColumn { column } => {
                self.reset_column(*column);
            }
            Event::SetPlatformType(platform_type) => {
                self.set_platform_type(*platform_type);
            }
            Event::SwitchPlatformType(platform_type) => {
                self.switch_platform_type(*platform_type);
            }
            Event::SelectYear { year } => {
                self.select_year(year.clone());
            }
            Event::Undo => {
                self.undo();
            }
            Event::DatasetLoad { dir } => {
                if let Err(e) = self.load_dataset(dir) {
                    warn!("{:#}", e);
                    self.publish(Event::DatasetLoadFailed {
                        error: format!("{e:#}"),
                    });
                }
            }
            Event::DatasetLoaded { .. }
            | Event::DatasetLoadFailed { .. }
            | Event::SnapshotChanged { .. }
            | Event::UndoStackChanged { .. }
            | Event::ShowWarning { .. } => {}
        }
    }
}
