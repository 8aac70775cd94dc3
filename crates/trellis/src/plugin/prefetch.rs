//! Prefetching content for rows that are about to appear.

use trellis_core::IndexPath;
use trellis_core::logging::targets;

use super::Plugin;
use crate::event::PrefetchEvent;
use crate::manager::StateManager;
use crate::widget::ListWidget;

/// Loads and caches content ahead of display.
///
/// Start and cancel requests may race; implementations handle repeated or
/// out-of-order calls for the same content.
pub trait ContentPrefetcher {
    /// The key identifying one piece of content (an image URL, a record id).
    type Content: Clone + 'static;

    /// Begins loading `contents`.
    fn start_prefetching(&self, contents: &[Self::Content]);

    /// Abandons loading `contents`.
    fn cancel_prefetching(&self, contents: &[Self::Content]);
}

/// Forwards prefetch requests to a [`ContentPrefetcher`].
///
/// Each requested position is resolved with a bounds-checked lookup. Rows
/// that no longer exist, that are not prefetchable, or whose key is not a
/// `P::Content` are skipped; the remaining keys go to the prefetcher in one
/// batch.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use trellis::generator::{BaseCellGenerator, ConfigurableView};
/// use trellis::event::PrefetchEvent;
/// use trellis::plugin::{ContentPrefetcher, Plugin, PrefetcherablePlugin};
/// use trellis::testing::RecordingWidget;
/// use trellis::StateManager;
/// use trellis_core::IndexPath;
///
/// #[derive(Default)]
/// struct ImageCell;
///
/// impl ConfigurableView for ImageCell {
///     type Model = ();
///     fn configure(&mut self, _model: &()) {}
/// }
///
/// #[derive(Default)]
/// struct ImageLoader {
///     started: RefCell<Vec<String>>,
/// }
///
/// impl ContentPrefetcher for ImageLoader {
///     type Content = String;
///     fn start_prefetching(&self, contents: &[String]) {
///         self.started.borrow_mut().extend_from_slice(contents);
///     }
///     fn cancel_prefetching(&self, _contents: &[String]) {}
/// }
///
/// let mut manager = StateManager::new(RecordingWidget::new());
/// manager.add_cell_generator(Rc::new(
///     BaseCellGenerator::<ImageCell>::new(()).with_request_id("cat.png".to_string()),
/// ));
///
/// let loader = Rc::new(ImageLoader::default());
/// let mut plugin = PrefetcherablePlugin::new(loader.clone());
/// plugin.process(&PrefetchEvent::Prefetch(vec![IndexPath::new(0, 0)]), &manager);
/// assert_eq!(*loader.started.borrow(), vec!["cat.png".to_string()]);
/// ```
pub struct PrefetcherablePlugin<P> {
    prefetcher: P,
}

impl<P: ContentPrefetcher> PrefetcherablePlugin<P> {
    /// Creates a plugin feeding `prefetcher`.
    pub fn new(prefetcher: P) -> Self {
        Self { prefetcher }
    }

    /// The wrapped prefetcher.
    pub fn prefetcher(&self) -> &P {
        &self.prefetcher
    }

    fn contents<W: ListWidget>(&self, manager: &StateManager<W>, paths: &[IndexPath]) -> Vec<P::Content> {
        paths
            .iter()
            .filter_map(|&path| {
                let generator = manager.generator_at(path);
                if generator.is_none() {
                    tracing::debug!(target: targets::PLUGIN, %path, "skipping prefetch for stale position");
                }
                generator?
                    .as_prefetchable()?
                    .request_id()
                    .downcast_ref::<P::Content>()
                    .cloned()
            })
            .collect()
    }
}

impl<P: ContentPrefetcher, W: ListWidget> Plugin<PrefetchEvent, W> for PrefetcherablePlugin<P> {
    fn name(&self) -> &str {
        "prefetch"
    }

    fn process(&mut self, event: &PrefetchEvent, manager: &StateManager<W>) {
        let contents = self.contents(manager, event.index_paths());
        if contents.is_empty() {
            return;
        }

        match event {
            PrefetchEvent::Prefetch(_) => {
                tracing::trace!(target: targets::PLUGIN, count = contents.len(), "start prefetching");
                self.prefetcher.start_prefetching(&contents);
            }
            PrefetchEvent::CancelPrefetching(_) => {
                tracing::trace!(target: targets::PLUGIN, count = contents.len(), "cancel prefetching");
                self.prefetcher.cancel_prefetching(&contents);
            }
        }
    }
}

impl<P: ContentPrefetcher + ?Sized> ContentPrefetcher for std::rc::Rc<P> {
    type Content = P::Content;

    fn start_prefetching(&self, contents: &[Self::Content]) {
        (**self).start_prefetching(contents);
    }

    fn cancel_prefetching(&self, contents: &[Self::Content]) {
        (**self).cancel_prefetching(contents);
    }
}
