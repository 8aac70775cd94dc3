use trellis_core::IndexPath;
use trellis_core::logging::targets;

use crate::event::PrefetchEvent;
use crate::manager::StateManager;
use crate::plugin::{Plugin, PluginCollection};
use crate::widget::{ElementKind, ListWidget, RenderedView};

/// Answers the host widget's data queries from manager state.
///
/// Holds the prefetch plugins; the manager is passed in on every call.
pub struct CollectionDataSource<W: ListWidget> {
    prefetch_plugins: PluginCollection<PrefetchEvent, W>,
}

impl<W: ListWidget> Default for CollectionDataSource<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ListWidget> CollectionDataSource<W> {
    /// Creates an empty data source.
    pub fn new() -> Self {
        Self {
            prefetch_plugins: PluginCollection::new(),
        }
    }

    /// Creates a data source delivering prefetch events to `plugins`.
    pub fn with_prefetch_plugins(plugins: PluginCollection<PrefetchEvent, W>) -> Self {
        Self {
            prefetch_plugins: plugins,
        }
    }

    /// The prefetch plugins.
    pub fn prefetch_plugins(&self) -> &PluginCollection<PrefetchEvent, W> {
        &self.prefetch_plugins
    }

    /// Adds a prefetch plugin.
    pub fn add_prefetch_plugin(&mut self, plugin: impl Plugin<PrefetchEvent, W> + 'static) {
        self.prefetch_plugins.add(plugin);
    }

    /// Number of sections to display.
    pub fn number_of_sections(&self, manager: &StateManager<W>) -> usize {
        manager.number_of_sections()
    }

    /// Rows in `section`; 0 for a section that does not exist.
    pub fn number_of_items(&self, manager: &StateManager<W>, section: usize) -> usize {
        manager.number_of_items(section)
    }

    /// The configured view for the row at `path`.
    ///
    /// A stale position yields the widget's placeholder view instead of a
    /// panic.
    pub fn cell_for_item(&self, manager: &mut StateManager<W>, path: IndexPath) -> RenderedView {
        let Some(generator) = manager.generator_at(path).cloned() else {
            tracing::warn!(target: targets::BRIDGE, %path, "cell requested for stale position, using placeholder");
            return manager.view().placeholder_view(ElementKind::Cell);
        };
        tracing::trace!(target: targets::BRIDGE, %path, "generating cell");
        generator.generate(manager.view_mut(), path)
    }

    /// The header or footer view of `section`.
    pub fn supplementary_view(
        &self,
        manager: &mut StateManager<W>,
        kind: ElementKind,
        section: usize,
    ) -> RenderedView {
        let generator = match kind {
            ElementKind::Header => manager.header_at(section).cloned(),
            ElementKind::Footer => manager.footer_at(section).cloned(),
            ElementKind::Cell => None,
        };
        let Some(generator) = generator else {
            tracing::warn!(target: targets::BRIDGE, %kind, section, "supplementary view requested for stale position, using placeholder");
            return manager.view().placeholder_view(kind);
        };
        generator.generate(manager.view_mut(), kind, section)
    }

    /// The host expects rows at `paths` to appear soon.
    pub fn prefetch_items(&mut self, manager: &StateManager<W>, paths: Vec<IndexPath>) {
        self.prefetch_plugins
            .process(&PrefetchEvent::Prefetch(paths), manager);
    }

    /// The host no longer expects rows at `paths` to appear.
    pub fn cancel_prefetching(&mut self, manager: &StateManager<W>, paths: Vec<IndexPath>) {
        self.prefetch_plugins
            .process(&PrefetchEvent::CancelPrefetching(paths), manager);
    }
}
