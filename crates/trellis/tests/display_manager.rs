//! Integration tests for the assembled display manager: plugins, bridges and
//! drag and drop working against one manager.

use std::cell::RefCell;
use std::rc::Rc;

use trellis::event::CollectionEvent;
use trellis::generator::{
    AccurateHeight, AccurateHeightCellGenerator, BaseCellGenerator, CellGeneratorRef,
    ConfigurableView,
};
use trellis::plugin::{
    ContentPrefetcher, DisplayablePlugin, DragAndDroppablePlugin, DropCoordinator, Plugin,
    PrefetcherablePlugin, ScrollDirection, ScrollDirectionPlugin, SelectionMode,
    SelectionTrackingPlugin,
};
use trellis::testing::{RecordingWidget, WidgetCall};
use trellis::{DataDisplayManager, IndexPath, ManagerConfig, Point, Size, StateManager};

#[derive(Default)]
struct PhotoCell;

impl ConfigurableView for PhotoCell {
    type Model = &'static str;
    fn configure(&mut self, _model: &&'static str) {}
}

#[derive(Default)]
struct NoteCell;

impl ConfigurableView for NoteCell {
    type Model = String;
    fn configure(&mut self, _model: &String) {}
}

impl AccurateHeight for NoteCell {
    fn height(_width: f32, model: &String) -> f32 {
        20.0 * model.lines().count().max(1) as f32
    }
}

#[derive(Default)]
struct UrlPrefetcher {
    started: RefCell<Vec<Vec<String>>>,
}

impl ContentPrefetcher for UrlPrefetcher {
    type Content = String;

    fn start_prefetching(&self, contents: &[String]) {
        self.started.borrow_mut().push(contents.to_vec());
    }

    fn cancel_prefetching(&self, _contents: &[String]) {}
}

fn photo(url: &'static str) -> CellGeneratorRef {
    Rc::new(
        BaseCellGenerator::<PhotoCell>::new(url)
            .with_request_id(url.to_string())
            .with_drag_identifier(url),
    )
}

#[test]
fn test_prefetch_skips_out_of_bounds_positions() {
    let prefetcher = Rc::new(UrlPrefetcher::default());
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
        .add_prefetch_plugin(PrefetcherablePlugin::new(prefetcher.clone()))
        .build();
    for url in ["a.png", "b.png", "c.png"] {
        ddm.add_cell_generator(photo(url));
    }
    ddm.force_refill();

    ddm.prefetch_items(vec![IndexPath::new(0, 2), IndexPath::new(0, 5)]);

    assert_eq!(*prefetcher.started.borrow(), vec![vec!["c.png".to_string()]]);
}

#[test]
fn test_plugins_see_events_in_registration_order() {
    struct Tagged(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl Plugin<CollectionEvent, RecordingWidget> for Tagged {
        fn process(&mut self, _event: &CollectionEvent, _manager: &StateManager<RecordingWidget>) {
            self.1.borrow_mut().push(self.0);
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
        .add_collection_plugin(Tagged("first", log.clone()))
        .add_collection_plugin(DisplayablePlugin::new())
        .add_collection_plugin(Tagged("second", log.clone()))
        .build();
    ddm.add_cell_generator(photo("a.png"));
    ddm.force_refill();

    ddm.will_display(IndexPath::new(0, 0));
    ddm.did_select(IndexPath::new(0, 0));

    assert_eq!(*log.borrow(), vec!["first", "second", "first", "second"]);
}

#[test]
fn test_selection_follows_rows() {
    let selection = SelectionTrackingPlugin::new(SelectionMode::Multiple);
    let handle = selection.handle();
    let config = ManagerConfig::default().with_deselect_after_selection(false);
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
        .config(config)
        .add_collection_plugin(selection)
        .build();
    let photos: Vec<_> = ["a.png", "b.png", "c.png"].into_iter().map(photo).collect();
    ddm.add_cell_generators(photos.iter().cloned());
    ddm.force_refill();
    ddm.view_mut().clear_calls();

    ddm.did_select(IndexPath::new(0, 0));
    ddm.did_select(IndexPath::new(0, 2));
    ddm.did_deselect(IndexPath::new(0, 0));

    assert_eq!(handle.selected(), vec![IndexPath::new(0, 2)]);
    assert!(
        !ddm.view()
            .calls()
            .iter()
            .any(|call| matches!(call, WidgetCall::DeselectItem { .. }))
    );
}

#[test]
fn test_scroll_direction_through_delegate() {
    let directions = Rc::new(RefCell::new(Vec::new()));
    let sink = directions.clone();
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
        .add_scroll_plugin(ScrollDirectionPlugin::new(move |d| sink.borrow_mut().push(d)))
        .build();

    ddm.did_scroll(Point::new(0.0, 0.0));
    ddm.did_scroll(Point::new(0.0, 80.0));
    ddm.did_scroll(Point::new(0.0, 20.0));

    assert_eq!(*directions.borrow(), vec![ScrollDirection::Down, ScrollDirection::Up]);
}

#[test]
fn test_drag_reorders_rows() {
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new())
        .drag_and_drop(DragAndDroppablePlugin::new())
        .build();
    let photos: Vec<_> = ["a.png", "b.png", "c.png"].into_iter().map(photo).collect();
    ddm.add_cell_generators(photos.iter().cloned());
    ddm.force_refill();

    let items = ddm.items_for_beginning(IndexPath::new(0, 2));
    assert_eq!(items[0].identifier, "c.png");
    let moved = ddm.perform_drop(&DropCoordinator {
        destination: Some(IndexPath::new(0, 0)),
        items: Vec::new(),
    });
    ddm.drag_session_ended();

    assert_eq!(moved, vec![IndexPath::new(0, 0)]);
    assert_eq!(ddm.index_path_of(&photos[2]), Some(IndexPath::new(0, 0)));
    assert_eq!(ddm.index_path_of(&photos[0]), Some(IndexPath::new(0, 1)));
    assert_eq!(ddm.view().item_counts(), &[3]);
}

#[test]
fn test_accurate_height_sizes() {
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new()).build();
    ddm.add_cell_generator(Rc::new(AccurateHeightCellGenerator::<NoteCell>::new(
        "one\ntwo\nthree".to_string(),
    )));

    let size = ddm.size_for_item(IndexPath::new(0, 0), Size::new(375.0, 0.0));
    assert_eq!(size, Size::new(375.0, 60.0));
}

#[test]
fn test_refill_completion_runs_after_host_reload() {
    let mut ddm = DataDisplayManager::builder(RecordingWidget::new().completing_immediately()).build();
    let done = Rc::new(RefCell::new(false));
    let flag = done.clone();

    ddm.add_cell_generator(photo("a.png"));
    ddm.force_refill_with_completion(move || *flag.borrow_mut() = true);

    assert!(*done.borrow());
    assert_eq!(ddm.view().item_counts(), &[1]);
}
