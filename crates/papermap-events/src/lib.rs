use crossbeam_channel::{Receiver, Sender, unbounded};
use papermap_core::{Column, PlatformType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Interaction
    ExpandNode {
        column: Column,
        node_id: String,
    },
    /// `node_id: None` steps the column one level up.
    CollapseNode {
        column: Column,
        node_id: Option<String>,
    },
    ToggleNode {
        column: Column,
        node_id: String,
    },
    ResetColumn {
        column: Column,
    },
    /// Swap the platform taxonomy and keep every column as it is.
    SetPlatformType(PlatformType),
    /// Swap the platform taxonomy and translate the platform expansions.
    SwitchPlatformType(PlatformType),
    SelectYear {
        year: Option<String>,
    },
    Undo,

    // Dataset
    DatasetLoad {
        dir: PathBuf,
    },
    DatasetLoaded {
        tables: usize,
        papers_with_year: usize,
    },
    DatasetLoadFailed {
        error: String,
    },

    // Notifications
    /// The visible snapshot was rebuilt.
    SnapshotChanged {
        nodes: usize,
        links: usize,
    },
    UndoStackChanged {
        can_undo: bool,
        depth: usize,
    },
    ShowWarning {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        trace!(?event, "Publishing event");
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    ///
    /// Events the listener publishes while handling are dispatched in the same call.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
