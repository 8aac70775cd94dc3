//! Plugins: observers of widget events.
//!
//! A [`Plugin`] handles one event family (`E` is [`CollectionEvent`],
//! [`ScrollEvent`] or [`PrefetchEvent`]). Plugins are reactive: each event is
//! delivered together with a shared borrow of the [`StateManager`] that lasts
//! for that one call, so a plugin can look generators up but never keeps the
//! manager or mutates its state.
//!
//! # Bundled plugins
//!
//! | plugin | events | what it does |
//! |--------|--------|--------------|
//! | [`PrefetcherablePlugin`] | prefetch | forwards prefetch keys to a [`ContentPrefetcher`] |
//! | [`DisplayablePlugin`] | collection | emits generators' display signals |
//! | [`SelectionTrackingPlugin`] | collection | tracks the selected rows |
//! | [`ScrollDirectionPlugin`] | scroll | reports scroll direction changes |
//! | [`DragAndDroppablePlugin`] | drag and drop | reorders rows by dragging |
//!
//! [`CollectionEvent`]: crate::event::CollectionEvent
//! [`ScrollEvent`]: crate::event::ScrollEvent
//! [`PrefetchEvent`]: crate::event::PrefetchEvent

mod displayable;
mod drag_drop;
mod prefetch;
mod scroll;
mod selection;

pub use displayable::DisplayablePlugin;
pub use drag_drop::{
    DragAndDrop, DragAndDroppablePlugin, DragItem, DropCoordinator, DropIntent, DropItem,
    DropOperation, DropProposal,
};
pub use prefetch::{ContentPrefetcher, PrefetcherablePlugin};
pub use scroll::{ScrollDirection, ScrollDirectionPlugin};
pub use selection::{SelectionHandle, SelectionMode, SelectionTrackingPlugin};

use std::fmt;
use std::marker::PhantomData;

use trellis_core::logging::targets;

use crate::manager::StateManager;
use crate::widget::ListWidget;

/// An observer of one event family.
pub trait Plugin<E, W: ListWidget> {
    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Handles `event`. `manager` is borrowed for this call only.
    fn process(&mut self, event: &E, manager: &StateManager<W>);
}

/// A plugin made from a closure.
///
/// ```
/// use trellis::event::CollectionEvent;
/// use trellis::plugin::{ClosurePlugin, PluginCollection};
/// use trellis::testing::RecordingWidget;
/// use trellis::StateManager;
///
/// let mut plugins = PluginCollection::<CollectionEvent, RecordingWidget>::new();
/// plugins.add(ClosurePlugin::new("log", |event: &CollectionEvent, _manager: &StateManager<RecordingWidget>| {
///     println!("{event:?}");
/// }));
/// assert_eq!(plugins.len(), 1);
/// ```
pub struct ClosurePlugin<E, W, F> {
    name: &'static str,
    handler: F,
    _marker: PhantomData<fn(&E, &W)>,
}

impl<E, W, F> ClosurePlugin<E, W, F>
where
    W: ListWidget,
    F: FnMut(&E, &StateManager<W>),
{
    /// Wraps `handler` under `name`.
    pub fn new(name: &'static str, handler: F) -> Self {
        Self {
            name,
            handler,
            _marker: PhantomData,
        }
    }
}

impl<E, W, F> Plugin<E, W> for ClosurePlugin<E, W, F>
where
    W: ListWidget,
    F: FnMut(&E, &StateManager<W>),
{
    fn name(&self) -> &str {
        self.name
    }

    fn process(&mut self, event: &E, manager: &StateManager<W>) {
        (self.handler)(event, manager);
    }
}

/// An ordered list of plugins for one event family.
pub struct PluginCollection<E, W: ListWidget> {
    plugins: Vec<Box<dyn Plugin<E, W>>>,
}

impl<E, W: ListWidget> Default for PluginCollection<E, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, W: ListWidget> PluginCollection<E, W> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Appends `plugin`; it will see events after every plugin added before it.
    pub fn add(&mut self, plugin: impl Plugin<E, W> + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Appends an already boxed plugin.
    pub fn add_boxed(&mut self, plugin: Box<dyn Plugin<E, W>>) {
        self.plugins.push(plugin);
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if there are no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugin names, in delivery order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Delivers `event` to every plugin in registration order.
    pub fn process(&mut self, event: &E, manager: &StateManager<W>) {
        for plugin in &mut self.plugins {
            tracing::trace!(target: targets::PLUGIN, plugin = plugin.name(), "delivering event");
            plugin.process(event, manager);
        }
    }
}

impl<E, W: ListWidget> fmt::Debug for PluginCollection<E, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
