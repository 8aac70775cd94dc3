//! Tracking which rows are selected.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::logging::targets;
use trellis_core::{IndexPath, Signal};

use super::Plugin;
use crate::event::CollectionEvent;
use crate::manager::StateManager;
use crate::widget::ListWidget;

/// How many rows can be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Selecting a row replaces the previous selection.
    #[default]
    Single,
    /// Rows are added to and removed from the selection independently.
    Multiple,
}

/// Read access to a [`SelectionTrackingPlugin`]'s selection after the plugin
/// has been handed to a plugin collection.
#[derive(Debug, Clone, Default)]
pub struct SelectionHandle {
    selected: Arc<Mutex<BTreeSet<IndexPath>>>,
    changed: Arc<Signal<Vec<IndexPath>>>,
}

impl SelectionHandle {
    /// Selected rows, in index path order.
    pub fn selected(&self) -> Vec<IndexPath> {
        self.selected.lock().iter().copied().collect()
    }

    /// Returns `true` if `path` is selected.
    pub fn is_selected(&self, path: IndexPath) -> bool {
        self.selected.lock().contains(&path)
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.lock().len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.lock().is_empty()
    }

    /// Emitted with the new selection whenever it changes.
    pub fn selection_changed(&self) -> &Signal<Vec<IndexPath>> {
        &self.changed
    }
}

/// Keeps the set of selected rows from select and deselect events.
///
/// Selections of positions that no longer address a row are ignored, and
/// previously selected positions that fell out of bounds are dropped on the
/// next event.
#[derive(Debug, Default)]
pub struct SelectionTrackingPlugin {
    mode: SelectionMode,
    handle: SelectionHandle,
}

impl SelectionTrackingPlugin {
    /// Creates a plugin tracking selections in `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            handle: SelectionHandle::default(),
        }
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// A handle for reading the selection.
    pub fn handle(&self) -> SelectionHandle {
        self.handle.clone()
    }

    fn apply<W: ListWidget>(&self, event: &CollectionEvent, manager: &StateManager<W>) -> bool {
        let mut selected = self.handle.selected.lock();
        let before = selected.len();
        selected.retain(|path| manager.generator_at(*path).is_some());
        let mut changed = selected.len() != before;

        match event {
            CollectionEvent::DidSelect(path) if manager.generator_at(*path).is_some() => {
                if self.mode == SelectionMode::Single && !(selected.len() == 1 && selected.contains(path)) {
                    changed |= !selected.is_empty();
                    selected.clear();
                }
                changed |= selected.insert(*path);
            }
            CollectionEvent::DidSelect(path) => {
                tracing::debug!(target: targets::PLUGIN, %path, "ignoring selection of stale position");
            }
            CollectionEvent::DidDeselect(path) => {
                changed |= selected.remove(path);
            }
            _ => {}
        }
        changed
    }
}

impl<W: ListWidget> Plugin<CollectionEvent, W> for SelectionTrackingPlugin {
    fn name(&self) -> &str {
        "selection_tracking"
    }

    fn process(&mut self, event: &CollectionEvent, manager: &StateManager<W>) {
        if !matches!(event, CollectionEvent::DidSelect(_) | CollectionEvent::DidDeselect(_)) {
            return;
        }
        if self.apply(event, manager) {
            let selection = self.handle.selected();
            tracing::trace!(target: targets::PLUGIN, count = selection.len(), "selection changed");
            self.handle.changed.emit(selection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BaseCellGenerator, ConfigurableView};
    use crate::testing::RecordingWidget;
    use std::rc::Rc;

    #[derive(Default)]
    struct Row;

    impl ConfigurableView for Row {
        type Model = u8;
        fn configure(&mut self, _model: &u8) {}
    }

    fn manager(rows: u8) -> StateManager<RecordingWidget> {
        let mut manager = StateManager::new(RecordingWidget::new());
        for model in 0..rows {
            manager.add_cell_generator(Rc::new(BaseCellGenerator::<Row>::new(model)));
        }
        manager
    }

    fn path(row: usize) -> IndexPath {
        IndexPath::new(0, row)
    }

    #[test]
    fn test_single_mode_replaces() {
        let manager = manager(3);
        let mut plugin = SelectionTrackingPlugin::new(SelectionMode::Single);
        let handle = plugin.handle();

        plugin.process(&CollectionEvent::DidSelect(path(0)), &manager);
        plugin.process(&CollectionEvent::DidSelect(path(2)), &manager);
        assert_eq!(handle.selected(), vec![path(2)]);
    }

    #[test]
    fn test_multiple_mode_accumulates() {
        let manager = manager(3);
        let mut plugin = SelectionTrackingPlugin::new(SelectionMode::Multiple);
        let handle = plugin.handle();

        plugin.process(&CollectionEvent::DidSelect(path(2)), &manager);
        plugin.process(&CollectionEvent::DidSelect(path(0)), &manager);
        plugin.process(&CollectionEvent::DidDeselect(path(2)), &manager);
        assert_eq!(handle.selected(), vec![path(0)]);
        assert!(handle.is_selected(path(0)));
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_changes_are_signalled_once() {
        let manager = manager(2);
        let mut plugin = SelectionTrackingPlugin::new(SelectionMode::Single);
        let handle = plugin.handle();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        handle
            .selection_changed()
            .connect(move |selection| sink.lock().push(selection.clone()));

        plugin.process(&CollectionEvent::DidSelect(path(1)), &manager);
        plugin.process(&CollectionEvent::DidSelect(path(1)), &manager);
        plugin.process(&CollectionEvent::DidSelect(path(9)), &manager);
        plugin.process(&CollectionEvent::WillDisplayCell(path(0)), &manager);

        assert_eq!(*log.lock(), vec![vec![path(1)]]);
    }

    #[test]
    fn test_stale_selection_is_pruned() {
        let mut manager = manager(2);
        let mut plugin = SelectionTrackingPlugin::new(SelectionMode::Multiple);
        let handle = plugin.handle();
        plugin.process(&CollectionEvent::DidSelect(path(1)), &manager);

        let last = manager.generator_at(path(1)).cloned().unwrap();
        manager.remove(&last, None, false).unwrap();
        plugin.process(&CollectionEvent::DidSelect(path(0)), &manager);

        assert_eq!(handle.selected(), vec![path(0)]);
    }
}
