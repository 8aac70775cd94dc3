//! Assembling a manager, its bridges and its plugins.
//!
//! [`DataDisplayManager::builder`] collects configuration and plugins, and
//! [`DisplayManagerBuilder::build`] wires the manager, delegate and data
//! source together in one step. The result derefs to [`StateManager`], so
//! state mutations are called on it directly, and exposes the host-facing
//! entry points that route through the bridges.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis::generator::{BaseCellGenerator, ConfigurableView};
//! use trellis::plugin::{DisplayablePlugin, SelectionMode, SelectionTrackingPlugin};
//! use trellis::testing::RecordingWidget;
//! use trellis::{DataDisplayManager, ManagerConfig};
//! use trellis_core::IndexPath;
//!
//! #[derive(Default)]
//! struct TitleCell;
//!
//! impl ConfigurableView for TitleCell {
//!     type Model = &'static str;
//!     fn configure(&mut self, _model: &&'static str) {}
//! }
//!
//! let selection = SelectionTrackingPlugin::new(SelectionMode::Single);
//! let selected = selection.handle();
//!
//! let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
//!     .config(ManagerConfig::default().with_scroll_animated(false))
//!     .add_collection_plugin(DisplayablePlugin::new())
//!     .add_collection_plugin(selection)
//!     .build();
//!
//! ddm.add_cell_generator(Rc::new(BaseCellGenerator::<TitleCell>::new("Inbox")));
//! ddm.force_refill();
//!
//! ddm.did_select(IndexPath::new(0, 0));
//! assert_eq!(selected.selected(), vec![IndexPath::new(0, 0)]);
//! ```

use std::ops::{Deref, DerefMut};

use trellis_core::logging::targets;
use trellis_core::{IndexPath, Point, Size};

use crate::bridge::{CollectionDataSource, CollectionDelegate};
use crate::event::{CollectionEvent, PrefetchEvent, ScrollEvent};
use crate::manager::{Animator, ManagerConfig, StateManager};
use crate::plugin::{DragAndDrop, DragItem, DropCoordinator, DropProposal, Plugin, PluginCollection};
use crate::widget::{ElementKind, ListWidget, RenderedView};

/// A manager wired to its delegate and data source.
pub struct DataDisplayManager<W: ListWidget> {
    manager: StateManager<W>,
    delegate: CollectionDelegate<W>,
    data_source: CollectionDataSource<W>,
}

impl<W: ListWidget> DataDisplayManager<W> {
    /// Starts building a display manager driving `view`.
    pub fn builder(view: W) -> DisplayManagerBuilder<W> {
        DisplayManagerBuilder::new(view)
    }

    /// The underlying state manager.
    pub fn manager(&self) -> &StateManager<W> {
        &self.manager
    }

    /// The delegate bridge.
    pub fn delegate(&self) -> &CollectionDelegate<W> {
        &self.delegate
    }

    /// The data source bridge.
    pub fn data_source(&self) -> &CollectionDataSource<W> {
        &self.data_source
    }

    /// Takes the parts apart.
    pub fn into_parts(self) -> (StateManager<W>, CollectionDelegate<W>, CollectionDataSource<W>) {
        (self.manager, self.delegate, self.data_source)
    }

    // -------------------------------------------------------------------------
    // Data source entry points
    // -------------------------------------------------------------------------

    /// The configured cell for `path`, or a placeholder if the position is stale.
    pub fn cell_for_item(&mut self, path: IndexPath) -> RenderedView {
        self.data_source.cell_for_item(&mut self.manager, path)
    }

    /// The configured header or footer for `section`.
    pub fn supplementary_view(&mut self, kind: ElementKind, section: usize) -> RenderedView {
        self.data_source
            .supplementary_view(&mut self.manager, kind, section)
    }

    /// Forwards rows that will soon be displayed to the prefetch plugins.
    pub fn prefetch_items(&mut self, paths: Vec<IndexPath>) {
        self.data_source.prefetch_items(&self.manager, paths);
    }

    /// Forwards rows that no longer need prefetching.
    pub fn cancel_prefetching(&mut self, paths: Vec<IndexPath>) {
        self.data_source.cancel_prefetching(&self.manager, paths);
    }

    // -------------------------------------------------------------------------
    // Delegate entry points
    // -------------------------------------------------------------------------

    /// Handles a tap on the row at `path`.
    pub fn did_select(&mut self, path: IndexPath) {
        self.delegate.did_select(&mut self.manager, path);
    }

    /// Reports that the row at `path` was deselected.
    pub fn did_deselect(&mut self, path: IndexPath) {
        self.delegate.did_deselect(&self.manager, path);
    }

    /// Reports that the row at `path` is about to appear.
    pub fn will_display(&mut self, path: IndexPath) {
        self.delegate.will_display(&self.manager, path);
    }

    /// Reports that the row at `path` left the screen.
    pub fn did_end_displaying(&mut self, path: IndexPath) {
        self.delegate.did_end_displaying(&self.manager, path);
    }

    /// Reports that a header or footer is about to appear.
    pub fn will_display_supplementary(&mut self, kind: ElementKind, section: usize) {
        self.delegate
            .will_display_supplementary(&self.manager, kind, section);
    }

    /// Reports that a header or footer left the screen.
    pub fn did_end_displaying_supplementary(&mut self, kind: ElementKind, section: usize) {
        self.delegate
            .did_end_displaying_supplementary(&self.manager, kind, section);
    }

    /// Delivers a raw scroll event to the scroll plugins.
    pub fn scroll_event(&mut self, event: ScrollEvent) {
        self.delegate.scroll_event(&self.manager, event);
    }

    /// Reports the new content offset.
    pub fn did_scroll(&mut self, offset: Point) {
        self.delegate.did_scroll(&self.manager, offset);
    }

    /// Size hint for the row at `path`, or `Size::ZERO` if it has none.
    pub fn size_for_item(&self, path: IndexPath, available: Size) -> Size {
        self.delegate.size_for_item(&self.manager, path, available)
    }

    /// Size hint for the header of `section`, or `Size::ZERO` if it has none.
    pub fn size_for_header(&self, section: usize, available: Size) -> Size {
        self.delegate
            .size_for_header(&self.manager, section, available)
    }

    /// Size hint for the footer of `section`, or `Size::ZERO` if it has none.
    pub fn size_for_footer(&self, section: usize, available: Size) -> Size {
        self.delegate
            .size_for_footer(&self.manager, section, available)
    }

    /// Drag items for a drag starting at `path`.
    pub fn items_for_beginning(&mut self, path: IndexPath) -> Vec<DragItem> {
        self.delegate.items_for_beginning(&self.manager, path)
    }

    /// Proposes how a drop at `destination` would be handled.
    pub fn drop_proposal(&self, destination: Option<IndexPath>, has_active_drag: bool) -> DropProposal {
        self.delegate
            .drop_proposal(&self.manager, destination, has_active_drag)
    }

    /// Applies a drop and returns the rows that moved.
    pub fn perform_drop(&mut self, coordinator: &DropCoordinator) -> Vec<IndexPath> {
        self.delegate.perform_drop(&mut self.manager, coordinator)
    }

    /// Reports that the drag session finished.
    pub fn drag_session_ended(&mut self) {
        self.delegate.drag_session_ended(&self.manager);
    }
}

impl<W: ListWidget> Deref for DataDisplayManager<W> {
    type Target = StateManager<W>;

    fn deref(&self) -> &StateManager<W> {
        &self.manager
    }
}

impl<W: ListWidget> DerefMut for DataDisplayManager<W> {
    fn deref_mut(&mut self) -> &mut StateManager<W> {
        &mut self.manager
    }
}

/// Builder for [`DataDisplayManager`].
///
/// Plugins are delivered events in the order they were added.
pub struct DisplayManagerBuilder<W: ListWidget> {
    view: W,
    config: ManagerConfig,
    animator: Option<Box<dyn Animator>>,
    collection_plugins: PluginCollection<CollectionEvent, W>,
    scroll_plugins: PluginCollection<ScrollEvent, W>,
    prefetch_plugins: PluginCollection<PrefetchEvent, W>,
    drag_and_drop: Option<Box<dyn DragAndDrop<W>>>,
}

impl<W: ListWidget> DisplayManagerBuilder<W> {
    /// Creates a builder with default configuration and no plugins.
    pub fn new(view: W) -> Self {
        Self {
            view,
            config: ManagerConfig::default(),
            animator: None,
            collection_plugins: PluginCollection::new(),
            scroll_plugins: PluginCollection::new(),
            prefetch_plugins: PluginCollection::new(),
            drag_and_drop: None,
        }
    }

    /// Set the manager configuration.
    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the animator, overriding the one chosen from the configuration.
    pub fn animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Add a plugin for selection, display and drag events.
    pub fn add_collection_plugin(mut self, plugin: impl Plugin<CollectionEvent, W> + 'static) -> Self {
        self.collection_plugins.add(plugin);
        self
    }

    /// Add a plugin for scroll events.
    pub fn add_scroll_plugin(mut self, plugin: impl Plugin<ScrollEvent, W> + 'static) -> Self {
        self.scroll_plugins.add(plugin);
        self
    }

    /// Add a plugin for prefetch events.
    pub fn add_prefetch_plugin(mut self, plugin: impl Plugin<PrefetchEvent, W> + 'static) -> Self {
        self.prefetch_plugins.add(plugin);
        self
    }

    /// Set the drag and drop handler.
    pub fn drag_and_drop(mut self, handler: impl DragAndDrop<W> + 'static) -> Self {
        self.drag_and_drop = Some(Box::new(handler));
        self
    }

    /// Wire everything together.
    pub fn build(self) -> DataDisplayManager<W> {
        tracing::debug!(
            target: targets::MANAGER,
            collection_plugins = self.collection_plugins.len(),
            scroll_plugins = self.scroll_plugins.len(),
            prefetch_plugins = self.prefetch_plugins.len(),
            drag_and_drop = self.drag_and_drop.is_some(),
            "building display manager"
        );

        let mut manager = StateManager::with_config(self.view, self.config);
        if let Some(animator) = self.animator {
            manager.set_animator(animator);
        }

        DataDisplayManager {
            manager,
            delegate: CollectionDelegate::from_parts(
                self.collection_plugins,
                self.scroll_plugins,
                self.drag_and_drop,
            ),
            data_source: CollectionDataSource::with_prefetch_plugins(self.prefetch_plugins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BaseCellGenerator, CellGeneratorRef, ConfigurableView};
    use crate::manager::ImmediateAnimator;
    use crate::plugin::{ClosurePlugin, DragAndDroppablePlugin};
    use crate::testing::{RecordingWidget, WidgetCall};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_build_wires_plugins_in_order() {
        let ddm = DataDisplayManager::builder(RecordingWidget::new())
            .add_collection_plugin(ClosurePlugin::new("a", |_: &CollectionEvent, _: &StateManager<RecordingWidget>| {}))
            .add_collection_plugin(ClosurePlugin::new("b", |_: &CollectionEvent, _: &StateManager<RecordingWidget>| {}))
            .add_scroll_plugin(ClosurePlugin::new("s", |_: &ScrollEvent, _: &StateManager<RecordingWidget>| {}))
            .drag_and_drop(DragAndDroppablePlugin::new())
            .build();

        assert_eq!(ddm.delegate().collection_plugins().names(), vec!["a", "b"]);
        assert_eq!(ddm.delegate().scroll_plugins().len(), 1);
        assert!(ddm.data_source().prefetch_plugins().is_empty());
        assert!(ddm.delegate().supports_drag_and_drop());
    }

    #[test]
    fn test_animator_override() {
        let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
            .animator(ImmediateAnimator)
            .build();
        let row: CellGeneratorRef = Rc::new(BaseCellGenerator::<Blank>::new(()));
        ddm.add_cell_generator(row.clone());
        ddm.force_refill();
        ddm.view_mut().clear_calls();

        assert!(ddm.config().animate_updates);
        assert_eq!(ddm.remove(&row, None, false), Ok(Some(IndexPath::new(0, 0))));
        assert_eq!(
            ddm.view().calls(),
            &[WidgetCall::DeleteItems(vec![IndexPath::new(0, 0)])]
        );
    }

    #[derive(Default)]
    struct Blank;

    impl ConfigurableView for Blank {
        type Model = ();
        fn configure(&mut self, _model: &()) {}
    }

    #[test]
    fn test_entry_points_route_through_bridges() {
        let scrolls = Rc::new(RefCell::new(0));
        let counter = scrolls.clone();
        let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
            .add_scroll_plugin(ClosurePlugin::new(
                "count",
                move |_: &ScrollEvent, _: &StateManager<RecordingWidget>| *counter.borrow_mut() += 1,
            ))
            .build();
        ddm.add_cell_generator(Rc::new(BaseCellGenerator::<Blank>::new(())));
        ddm.force_refill();

        assert!(ddm.cell_for_item(IndexPath::new(0, 0)).is::<Blank>());
        assert!(RecordingWidget::is_placeholder(&ddm.cell_for_item(IndexPath::new(1, 0))));
        ddm.did_scroll(Point::new(0.0, 4.0));
        ddm.scroll_event(ScrollEvent::DidEndScrollingAnimation);
        assert_eq!(*scrolls.borrow(), 2);
        assert_eq!(ddm.size_for_item(IndexPath::new(0, 0), Size::new(10.0, 10.0)), Size::ZERO);
    }

    #[test]
    fn test_into_parts_keeps_state() {
        let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
            .add_collection_plugin(ClosurePlugin::new("a", |_: &CollectionEvent, _: &StateManager<RecordingWidget>| {}))
            .build();
        ddm.add_cell_generator(Rc::new(BaseCellGenerator::<Blank>::new(())));

        let (mut manager, delegate, data_source) = ddm.into_parts();
        assert_eq!(manager.number_of_items(0), 1);
        assert_eq!(delegate.collection_plugins().names(), vec!["a"]);
        assert_eq!(data_source.number_of_sections(&manager), 1);
        assert!(data_source.cell_for_item(&mut manager, IndexPath::new(0, 0)).is::<Blank>());
    }
}
