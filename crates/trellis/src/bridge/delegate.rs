use trellis_core::logging::targets;
use trellis_core::{IndexPath, Point, Size};

use crate::event::{CollectionEvent, ScrollEvent};
use crate::manager::StateManager;
use crate::plugin::{DragAndDrop, DragItem, DropCoordinator, DropProposal, Plugin, PluginCollection};
use crate::widget::{ElementKind, ListWidget};

/// Routes the host widget's interaction callbacks.
///
/// Every callback is first delivered to the matching plugin collection, then
/// acted on where the core has something to do (selection signals, sizes,
/// drag and drop).
pub struct CollectionDelegate<W: ListWidget> {
    collection_plugins: PluginCollection<CollectionEvent, W>,
    scroll_plugins: PluginCollection<ScrollEvent, W>,
    drag_and_drop: Option<Box<dyn DragAndDrop<W>>>,
}

impl<W: ListWidget> Default for CollectionDelegate<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ListWidget> CollectionDelegate<W> {
    /// Creates an empty delegate.
    pub fn new() -> Self {
        Self {
            collection_plugins: PluginCollection::new(),
            scroll_plugins: PluginCollection::new(),
            drag_and_drop: None,
        }
    }

    pub(crate) fn from_parts(
        collection_plugins: PluginCollection<CollectionEvent, W>,
        scroll_plugins: PluginCollection<ScrollEvent, W>,
        drag_and_drop: Option<Box<dyn DragAndDrop<W>>>,
    ) -> Self {
        Self {
            collection_plugins,
            scroll_plugins,
            drag_and_drop,
        }
    }

    /// Plugins receiving collection events, in registration order.
    pub fn collection_plugins(&self) -> &PluginCollection<CollectionEvent, W> {
        &self.collection_plugins
    }

    /// Plugins receiving scroll events, in registration order.
    pub fn scroll_plugins(&self) -> &PluginCollection<ScrollEvent, W> {
        &self.scroll_plugins
    }

    /// Appends a plugin for collection events.
    pub fn add_collection_plugin(&mut self, plugin: impl Plugin<CollectionEvent, W> + 'static) {
        self.collection_plugins.add(plugin);
    }

    /// Appends a plugin for scroll events.
    pub fn add_scroll_plugin(&mut self, plugin: impl Plugin<ScrollEvent, W> + 'static) {
        self.scroll_plugins.add(plugin);
    }

    /// Installs the drag and drop handler, replacing any previous one.
    pub fn set_drag_and_drop(&mut self, handler: impl DragAndDrop<W> + 'static) {
        self.drag_and_drop = Some(Box::new(handler));
    }

    /// Returns `true` if a drag and drop handler is installed.
    pub fn supports_drag_and_drop(&self) -> bool {
        self.drag_and_drop.is_some()
    }

    // -------------------------------------------------------------------------
    // Selection and display
    // -------------------------------------------------------------------------

    /// The user selected the row at `path`.
    ///
    /// Plugins see the event first; then the row's `did_select` signal fires
    /// and, if the generator asks for it, the highlight is cleared.
    pub fn did_select(&mut self, manager: &mut StateManager<W>, path: IndexPath) {
        self.collection_plugins
            .process(&CollectionEvent::DidSelect(path), manager);

        let Some(generator) = manager.generator_at(path).cloned() else {
            tracing::debug!(target: targets::BRIDGE, %path, "selection of stale position");
            return;
        };
        let Some(selectable) = generator.as_selectable() else {
            return;
        };

        selectable.did_select().emit(());
        if manager.config().deselect_after_selection && selectable.needs_deselect() {
            manager.deselect(path, true);
        }
    }

    /// Reports that the row at `path` was deselected.
    pub fn did_deselect(&mut self, manager: &StateManager<W>, path: IndexPath) {
        self.collection_plugins
            .process(&CollectionEvent::DidDeselect(path), manager);
    }

    /// Reports that the row at `path` is about to appear.
    pub fn will_display(&mut self, manager: &StateManager<W>, path: IndexPath) {
        self.collection_plugins
            .process(&CollectionEvent::WillDisplayCell(path), manager);
    }

    /// Reports that the row at `path` left the screen.
    pub fn did_end_displaying(&mut self, manager: &StateManager<W>, path: IndexPath) {
        self.collection_plugins
            .process(&CollectionEvent::DidEndDisplayCell(path), manager);
    }

    /// Reports that a header or footer is about to appear.
    pub fn will_display_supplementary(&mut self, manager: &StateManager<W>, kind: ElementKind, section: usize) {
        self.collection_plugins
            .process(&CollectionEvent::WillDisplaySupplementary { kind, section }, manager);
    }

    /// Reports that a header or footer left the screen.
    pub fn did_end_displaying_supplementary(&mut self, manager: &StateManager<W>, kind: ElementKind, section: usize) {
        self.collection_plugins
            .process(&CollectionEvent::DidEndDisplaySupplementary { kind, section }, manager);
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Delivers any scroll callback to the scroll plugins.
    pub fn scroll_event(&mut self, manager: &StateManager<W>, event: ScrollEvent) {
        self.scroll_plugins.process(&event, manager);
    }

    /// Reports the new content offset.
    pub fn did_scroll(&mut self, manager: &StateManager<W>, offset: Point) {
        self.scroll_event(manager, ScrollEvent::DidScroll { offset });
    }

    /// Reports that the user started dragging the content.
    pub fn will_begin_dragging(&mut self, manager: &StateManager<W>, offset: Point) {
        self.scroll_event(manager, ScrollEvent::WillBeginDragging { offset });
    }

    /// Reports that the user is about to lift their finger.
    pub fn will_end_dragging(&mut self, manager: &StateManager<W>, velocity: Point, target_offset: Point) {
        self.scroll_event(
            manager,
            ScrollEvent::WillEndDragging {
                velocity,
                target_offset,
            },
        );
    }

    /// Reports that the user stopped dragging the content.
    pub fn did_end_dragging(&mut self, manager: &StateManager<W>, will_decelerate: bool) {
        self.scroll_event(manager, ScrollEvent::DidEndDragging { will_decelerate });
    }

    /// Reports that scrolling came to rest at `offset`.
    pub fn did_end_decelerating(&mut self, manager: &StateManager<W>, offset: Point) {
        self.scroll_event(manager, ScrollEvent::DidEndDecelerating { offset });
    }

    /// Reports that a programmatic scroll finished.
    pub fn did_end_scrolling_animation(&mut self, manager: &StateManager<W>) {
        self.scroll_event(manager, ScrollEvent::DidEndScrollingAnimation);
    }

    /// Reports that the content scrolled to the top.
    pub fn did_scroll_to_top(&mut self, manager: &StateManager<W>) {
        self.scroll_event(manager, ScrollEvent::DidScrollToTop);
    }

    // -------------------------------------------------------------------------
    // Sizes
    // -------------------------------------------------------------------------

    /// Size of the row at `path`, or [`Size::ZERO`] to let the host decide.
    pub fn size_for_item(&self, manager: &StateManager<W>, path: IndexPath, available: Size) -> Size {
        manager
            .generator_at(path)
            .and_then(|generator| generator.as_sizable())
            .map_or(Size::ZERO, |sizable| sizable.size(available))
    }

    /// Size of the header of `section`, or [`Size::ZERO`].
    pub fn size_for_header(&self, manager: &StateManager<W>, section: usize, available: Size) -> Size {
        manager
            .header_at(section)
            .and_then(|header| header.as_sizable())
            .map_or(Size::ZERO, |sizable| sizable.size(available))
    }

    /// Size of the footer of `section`, or [`Size::ZERO`].
    pub fn size_for_footer(&self, manager: &StateManager<W>, section: usize, available: Size) -> Size {
        manager
            .footer_at(section)
            .and_then(|footer| footer.as_sizable())
            .map_or(Size::ZERO, |sizable| sizable.size(available))
    }

    // -------------------------------------------------------------------------
    // Drag and drop
    // -------------------------------------------------------------------------

    /// Items for a drag starting at `path`; empty refuses the drag.
    pub fn items_for_beginning(&mut self, manager: &StateManager<W>, path: IndexPath) -> Vec<DragItem> {
        let Some(handler) = self.drag_and_drop.as_mut() else {
            return Vec::new();
        };
        let items = handler.items_for_beginning(path, manager);
        if !items.is_empty() {
            self.collection_plugins
                .process(&CollectionEvent::DragBegan(path), manager);
        }
        items
    }

    /// What a drop at `destination` would do.
    pub fn drop_proposal(
        &self,
        manager: &StateManager<W>,
        destination: Option<IndexPath>,
        has_active_drag: bool,
    ) -> DropProposal {
        self.drag_and_drop
            .as_ref()
            .map_or_else(DropProposal::forbidden, |handler| {
                handler.drop_proposal(manager, destination, has_active_drag)
            })
    }

    /// Performs a drop; returns the final positions of the moved rows.
    pub fn perform_drop(&mut self, manager: &mut StateManager<W>, coordinator: &DropCoordinator) -> Vec<IndexPath> {
        let Some(handler) = self.drag_and_drop.as_mut() else {
            return Vec::new();
        };
        let moved = handler.perform_drop(manager, coordinator);
        for &destination in &moved {
            self.collection_plugins
                .process(&CollectionEvent::DidDrop { destination }, manager);
        }
        moved
    }

    /// The drag session ended.
    pub fn drag_session_ended(&mut self, manager: &StateManager<W>) {
        if let Some(handler) = self.drag_and_drop.as_mut() {
            handler.drag_session_ended();
        }
        self.collection_plugins
            .process(&CollectionEvent::DragEnded, manager);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{
        BaseCellGenerator, BaseSupplementaryGenerator, ConfigurableView, SizableCellGenerator,
    };
    use crate::plugin::{ClosurePlugin, DragAndDroppablePlugin, DropOperation};
    use crate::testing::{RecordingWidget, WidgetCall};
    use parking_lot::Mutex;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    #[derive(Default)]
    struct Row;

    impl ConfigurableView for Row {
        type Model = u32;
        fn configure(&mut self, _model: &u32) {}
    }

    fn spy<E: Clone + 'static>(
        log: &Rc<RefCell<Vec<E>>>,
    ) -> ClosurePlugin<E, RecordingWidget, impl FnMut(&E, &StateManager<RecordingWidget>) + use<E>> {
        let sink = log.clone();
        ClosurePlugin::new("spy", move |event: &E, _: &StateManager<RecordingWidget>| {
            sink.borrow_mut().push(event.clone())
        })
    }

    #[test]
    fn test_did_select_runs_plugins_then_signal_then_deselect() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let generator = Rc::new(BaseCellGenerator::<Row>::new(1));
        let signal_order = order.clone();
        generator
            .did_select_event()
            .connect(move |_| signal_order.lock().push("signal"));

        let mut manager = StateManager::new(RecordingWidget::new());
        manager.add_cell_generator(generator);
        manager.force_refill();
        manager.view_mut().clear_calls();

        let plugin_order = order.clone();
        let mut delegate = CollectionDelegate::new();
        delegate.add_collection_plugin(ClosurePlugin::new(
            "order",
            move |_: &CollectionEvent, _: &StateManager<RecordingWidget>| plugin_order.lock().push("plugin"),
        ));

        delegate.did_select(&mut manager, IndexPath::new(0, 0));
        assert_eq!(*order.lock(), vec!["plugin", "signal"]);
        assert_eq!(
            manager.view().calls(),
            &[WidgetCall::DeselectItem {
                path: IndexPath::new(0, 0),
                animated: true
            }]
        );
    }

    #[test]
    fn test_did_select_respects_needs_deselect() {
        let mut manager = StateManager::new(RecordingWidget::new());
        manager.add_cell_generator(Rc::new(BaseCellGenerator::<Row>::new(1).with_deselect(false)));
        manager.force_refill();
        manager.view_mut().clear_calls();

        let mut delegate = CollectionDelegate::new();
        delegate.did_select(&mut manager, IndexPath::new(0, 0));
        delegate.did_select(&mut manager, IndexPath::new(3, 3));
        assert!(manager.view().calls().is_empty());
    }

    #[test]
    fn test_events_reach_plugins() {
        let manager = StateManager::new(RecordingWidget::new());
        let collection = Rc::new(RefCell::new(Vec::new()));
        let scroll = Rc::new(RefCell::new(Vec::new()));
        let mut delegate = CollectionDelegate::new();
        delegate.add_collection_plugin(spy(&collection));
        delegate.add_scroll_plugin(spy(&scroll));

        let path = IndexPath::new(0, 2);
        delegate.will_display(&manager, path);
        delegate.did_end_displaying(&manager, path);
        delegate.did_deselect(&manager, path);
        delegate.will_display_supplementary(&manager, ElementKind::Header, 1);
        delegate.did_scroll(&manager, Point::new(0.0, 12.0));
        delegate.did_end_dragging(&manager, false);
        delegate.did_scroll_to_top(&manager);

        assert_eq!(
            *collection.borrow(),
            vec![
                CollectionEvent::WillDisplayCell(path),
                CollectionEvent::DidEndDisplayCell(path),
                CollectionEvent::DidDeselect(path),
                CollectionEvent::WillDisplaySupplementary {
                    kind: ElementKind::Header,
                    section: 1
                },
            ]
        );
        assert_eq!(
            *scroll.borrow(),
            vec![
                ScrollEvent::DidScroll {
                    offset: Point::new(0.0, 12.0)
                },
                ScrollEvent::DidEndDragging {
                    will_decelerate: false
                },
                ScrollEvent::DidScrollToTop,
            ]
        );
    }

    #[test]
    fn test_sizes() {
        let mut manager = StateManager::new(RecordingWidget::new());
        manager.add_section_header_generator(Rc::new(
            BaseSupplementaryGenerator::<Row>::new(0).with_size(Size::new(320.0, 30.0)),
        ));
        manager.add_cell_generator(Rc::new(SizableCellGenerator::<Row>::new(1, Size::new(320.0, 44.0))));
        manager.add_cell_generator(Rc::new(BaseCellGenerator::<Row>::new(2)));
        let delegate = CollectionDelegate::new();
        let available = Size::new(320.0, 600.0);

        assert_eq!(delegate.size_for_item(&manager, IndexPath::new(0, 0), available), Size::new(320.0, 44.0));
        assert_eq!(delegate.size_for_item(&manager, IndexPath::new(0, 1), available), Size::ZERO);
        assert_eq!(delegate.size_for_item(&manager, IndexPath::new(0, 9), available), Size::ZERO);
        assert_eq!(delegate.size_for_header(&manager, 0, available), Size::new(320.0, 30.0));
        assert_eq!(delegate.size_for_footer(&manager, 0, available), Size::ZERO);
    }

    #[test]
    fn test_drag_and_drop_without_handler() {
        let mut manager = StateManager::new(RecordingWidget::new());
        let mut delegate = CollectionDelegate::new();
        assert!(!delegate.supports_drag_and_drop());
        assert!(delegate.items_for_beginning(&manager, IndexPath::new(0, 0)).is_empty());
        assert_eq!(delegate.drop_proposal(&manager, None, true), DropProposal::forbidden());
        assert!(delegate.perform_drop(&mut manager, &DropCoordinator::default()).is_empty());
    }

    #[test]
    fn test_drag_and_drop_session() {
        let mut manager = StateManager::new(RecordingWidget::new());
        for model in 0..3 {
            manager.add_cell_generator(Rc::new(
                BaseCellGenerator::<Row>::new(model).with_drag_identifier(format!("row-{model}")),
            ));
        }
        manager.force_refill();

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut delegate = CollectionDelegate::new();
        delegate.set_drag_and_drop(DragAndDroppablePlugin::new());
        delegate.add_collection_plugin(spy(&events));

        let items = delegate.items_for_beginning(&manager, IndexPath::new(0, 2));
        assert_eq!(items.len(), 1);
        assert_eq!(
            delegate.drop_proposal(&manager, Some(IndexPath::new(0, 0)), true).operation,
            DropOperation::Move
        );

        let moved = delegate.perform_drop(
            &mut manager,
            &DropCoordinator {
                destination: Some(IndexPath::new(0, 0)),
                items: Vec::new(),
            },
        );
        delegate.drag_session_ended(&manager);

        assert_eq!(moved, vec![IndexPath::new(0, 0)]);
        assert_eq!(manager.view().item_counts(), &[3]);
        assert_eq!(
            *events.borrow(),
            vec![
                CollectionEvent::DragBegan(IndexPath::new(0, 2)),
                CollectionEvent::DidDrop {
                    destination: IndexPath::new(0, 0)
                },
                CollectionEvent::DragEnded,
            ]
        );
    }
}
