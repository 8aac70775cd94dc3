//! An in-memory [`ListWidget`] for tests and examples.
//!
//! [`RecordingWidget`] keeps the counts a real widget would display, creates
//! views from registered templates, and records every call it receives so
//! tests can assert on the exact updates the manager issued.
//!
//! Like a real host, it treats positional calls with paths that are invalid
//! for its current counts as fatal and panics.

use std::collections::HashMap;

use trellis_core::IndexPath;
use trellis_core::logging::targets;

use crate::widget::{
    Completion, ElementKind, ItemCounts, ListWidget, RenderedView, ReuseIdentifier, ScrollPosition,
    ViewFactory,
};

/// One call received by a [`RecordingWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCall {
    RegisterTemplate { kind: ElementKind, id: String },
    InsertItems(Vec<IndexPath>),
    DeleteItems(Vec<IndexPath>),
    ReloadItems(Vec<IndexPath>),
    MoveItem { from: IndexPath, to: IndexPath },
    InsertSections(Vec<usize>),
    DeleteSections(Vec<usize>),
    ReloadSections(Vec<usize>),
    ReloadData,
    ScrollToItem {
        path: IndexPath,
        position: ScrollPosition,
        animated: bool,
    },
    DeselectItem { path: IndexPath, animated: bool },
    BeginUpdates,
    EndUpdates,
}

/// The view handed out when nothing usable was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderView(pub ElementKind);

/// A recording, count-keeping widget.
#[derive(Default)]
pub struct RecordingWidget {
    templates: HashMap<(ElementKind, ReuseIdentifier), ViewFactory>,
    item_counts: Vec<usize>,
    displaying: bool,
    calls: Vec<WidgetCall>,
    pending: Vec<Completion>,
    complete_immediately: bool,
    dequeued: usize,
}

impl RecordingWidget {
    /// Creates a widget that has not loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs reload completions inside `reload_data` instead of holding them
    /// until [`complete_reloads`](Self::complete_reloads).
    pub fn completing_immediately(mut self) -> Self {
        self.complete_immediately = true;
        self
    }

    /// Returns `true` if `view` is a [`PlaceholderView`].
    pub fn is_placeholder(view: &RenderedView) -> bool {
        view.is::<PlaceholderView>()
    }

    /// Returns `true` if a template is registered for `(kind, id)`.
    pub fn is_registered(&self, kind: ElementKind, id: &ReuseIdentifier) -> bool {
        self.templates.contains_key(&(kind, id.clone()))
    }

    /// Number of distinct registered templates.
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Number of views handed out so far.
    pub fn dequeue_count(&self) -> usize {
        self.dequeued
    }

    /// The counts the widget currently displays.
    pub fn item_counts(&self) -> &[usize] {
        &self.item_counts
    }

    /// Simulates a loaded widget displaying `counts`.
    pub fn set_item_counts(&mut self, counts: Vec<usize>) {
        self.item_counts = counts;
        self.displaying = true;
    }

    /// Overwrites the count of one section, as if the host drifted.
    pub fn set_item_count(&mut self, section: usize, count: usize) {
        if section >= self.item_counts.len() {
            self.item_counts.resize(section + 1, 0);
        }
        self.item_counts[section] = count;
    }

    /// Every call received, oldest first.
    pub fn calls(&self) -> &[WidgetCall] {
        &self.calls
    }

    /// Calls other than template registrations.
    pub fn positional_calls(&self) -> Vec<WidgetCall> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, WidgetCall::RegisterTemplate { .. }))
            .cloned()
            .collect()
    }

    /// Returns and forgets the recorded calls.
    pub fn take_calls(&mut self) -> Vec<WidgetCall> {
        std::mem::take(&mut self.calls)
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of reload completions not yet run.
    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    /// Runs every held reload completion.
    pub fn complete_reloads(&mut self) {
        for completion in std::mem::take(&mut self.pending) {
            completion();
        }
    }

    fn check_section(&self, section: usize, limit: usize, operation: &str) {
        assert!(
            section < limit,
            "{operation}: section {section} out of bounds ({limit} sections)"
        );
    }

    fn check_path(&self, path: IndexPath, extra: usize, operation: &str) {
        self.check_section(path.section(), self.item_counts.len(), operation);
        let count = self.item_counts[path.section()] + extra;
        assert!(
            path.row() < count,
            "{operation}: {path} out of bounds ({count} items)"
        );
    }
}

impl ListWidget for RecordingWidget {
    fn register_template(&mut self, kind: ElementKind, id: &ReuseIdentifier, factory: ViewFactory) {
        self.calls.push(WidgetCall::RegisterTemplate {
            kind,
            id: id.as_str().to_string(),
        });
        self.templates.insert((kind, id.clone()), factory);
    }

    fn dequeue_reusable_view(
        &mut self,
        kind: ElementKind,
        id: &ReuseIdentifier,
        _path: IndexPath,
    ) -> Option<RenderedView> {
        let factory = self.templates.get(&(kind, id.clone()))?;
        self.dequeued += 1;
        Some(factory())
    }

    fn placeholder_view(&self, kind: ElementKind) -> RenderedView {
        Box::new(PlaceholderView(kind))
    }

    fn is_displaying(&self) -> bool {
        self.displaying
    }

    fn number_of_sections(&self) -> usize {
        self.item_counts.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.item_counts.get(section).copied().unwrap_or(0)
    }

    fn insert_items(&mut self, paths: &[IndexPath]) {
        let mut sorted = paths.to_vec();
        sorted.sort();
        for path in &sorted {
            self.check_path(*path, 1, "insert_items");
            self.item_counts[path.section()] += 1;
        }
        self.calls.push(WidgetCall::InsertItems(paths.to_vec()));
    }

    fn delete_items(&mut self, paths: &[IndexPath]) {
        for path in paths {
            self.check_path(*path, 0, "delete_items");
        }
        for path in paths {
            self.item_counts[path.section()] -= 1;
        }
        self.calls.push(WidgetCall::DeleteItems(paths.to_vec()));
    }

    fn reload_items(&mut self, paths: &[IndexPath]) {
        for path in paths {
            self.check_path(*path, 0, "reload_items");
        }
        self.calls.push(WidgetCall::ReloadItems(paths.to_vec()));
    }

    fn move_item(&mut self, from: IndexPath, to: IndexPath) {
        self.check_path(from, 0, "move_item");
        self.item_counts[from.section()] -= 1;
        self.check_path(to, 1, "move_item");
        self.item_counts[to.section()] += 1;
        self.calls.push(WidgetCall::MoveItem { from, to });
    }

    fn insert_sections(&mut self, sections: &[usize], counts: &dyn ItemCounts) {
        let mut sorted = sections.to_vec();
        sorted.sort_unstable();
        for &section in &sorted {
            self.check_section(section, self.item_counts.len() + 1, "insert_sections");
            self.item_counts
                .insert(section, counts.number_of_items(section));
        }
        self.calls.push(WidgetCall::InsertSections(sections.to_vec()));
    }

    fn delete_sections(&mut self, sections: &[usize]) {
        let mut sorted = sections.to_vec();
        sorted.sort_unstable();
        for &section in sorted.iter().rev() {
            self.check_section(section, self.item_counts.len(), "delete_sections");
            self.item_counts.remove(section);
        }
        self.calls.push(WidgetCall::DeleteSections(sections.to_vec()));
    }

    fn reload_sections(&mut self, sections: &[usize]) {
        for &section in sections {
            self.check_section(section, self.item_counts.len(), "reload_sections");
        }
        self.calls.push(WidgetCall::ReloadSections(sections.to_vec()));
    }

    fn reload_data(&mut self, counts: &dyn ItemCounts, completion: Option<Completion>) {
        self.item_counts = (0..counts.number_of_sections())
            .map(|section| counts.number_of_items(section))
            .collect();
        self.displaying = true;
        self.calls.push(WidgetCall::ReloadData);
        tracing::trace!(target: targets::WIDGET, sections = self.item_counts.len(), "recording widget reloaded");

        if let Some(completion) = completion {
            if self.complete_immediately {
                completion();
            } else {
                self.pending.push(completion);
            }
        }
    }

    fn scroll_to_item(&mut self, path: IndexPath, position: ScrollPosition, animated: bool) {
        self.check_path(path, 0, "scroll_to_item");
        self.calls.push(WidgetCall::ScrollToItem {
            path,
            position,
            animated,
        });
    }

    fn deselect_item(&mut self, path: IndexPath, animated: bool) {
        self.calls.push(WidgetCall::DeselectItem { path, animated });
    }

    fn perform_batch_updates(&mut self, updates: &mut dyn FnMut(&mut dyn ListWidget)) {
        self.calls.push(WidgetCall::BeginUpdates);
        updates(self);
        self.calls.push(WidgetCall::EndUpdates);
    }
}
