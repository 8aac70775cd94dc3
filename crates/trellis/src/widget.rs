//! The host widget contract.
//!
//! Trellis never renders anything itself. It drives a host list or grid
//! widget through the [`ListWidget`] trait: template registration, view
//! acquisition, positional mutations and full reloads. Hosts implement the
//! trait once for their widget type; the [`RecordingWidget`] in
//! [`crate::testing`] implements it in memory.
//!
//! [`RecordingWidget`]: crate::testing::RecordingWidget

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use trellis_core::IndexPath;

/// A view produced by the host widget and configured by a generator.
///
/// Views are type-erased so that one widget can host any number of view
/// types. Generators downcast the dequeued view to the type they registered.
pub type RenderedView = Box<dyn Any>;

/// Constructs a fresh view for a registered template.
pub type ViewFactory = Rc<dyn Fn() -> RenderedView>;

/// Called once a full reload has been applied by the host.
pub type Completion = Box<dyn FnOnce()>;

/// The role of a view inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A row or grid item.
    Cell,
    /// The view above a section's items.
    Header,
    /// The view below a section's items.
    Footer,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::Header => write!(f, "header"),
            Self::Footer => write!(f, "footer"),
        }
    }
}

/// Identifier under which a reusable view template is registered.
///
/// Generators derive it from their view type with [`ReuseIdentifier::of`],
/// so all generators that render the same view type share one template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReuseIdentifier(Cow<'static, str>);

impl ReuseIdentifier {
    /// Creates an identifier from an explicit name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Creates the identifier for view type `V`.
    pub fn of<V: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<V>()))
    }

    /// Returns the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment, for readable diagnostics.
    pub fn short_name(&self) -> &str {
        let name = self.as_str();
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Display for ReuseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an item should end up after a programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPosition {
    /// Scroll as little as needed to make the item visible.
    #[default]
    Nearest,
    Top,
    CenteredVertically,
    Bottom,
    Left,
    CenteredHorizontally,
    Right,
}

/// Read-only item counts, as a host widget queries them from its data source.
///
/// Passed to [`ListWidget::reload_data`] and [`ListWidget::insert_sections`]
/// so the widget can learn how many items the new sections contain.
pub trait ItemCounts {
    /// Number of sections.
    fn number_of_sections(&self) -> usize;

    /// Number of items in `section`, or 0 if the section does not exist.
    fn number_of_items(&self, section: usize) -> usize;
}

/// The capability set Trellis consumes from a host list/grid widget.
///
/// # Contract
///
/// - Positional mutations are applied immediately and change the counts the
///   widget reports from [`number_of_sections`](Self::number_of_sections) and
///   [`number_of_items`](Self::number_of_items).
/// - Paths passed to positional calls are valid for the widget's current
///   counts. Hosts may treat violations as fatal.
/// - Nothing reports failure; the manager checks counts before it mutates.
///
/// The trait is object-safe: generators receive `&mut dyn ListWidget`.
pub trait ListWidget {
    /// Registers a reusable template under `id`.
    ///
    /// Registering the same `(kind, id)` again replaces the factory and has no
    /// other effect.
    fn register_template(&mut self, kind: ElementKind, id: &ReuseIdentifier, factory: ViewFactory);

    /// Acquires a reusable view for `id` at `path`.
    ///
    /// Returns `None` if no template is registered under `id`.
    fn dequeue_reusable_view(
        &mut self,
        kind: ElementKind,
        id: &ReuseIdentifier,
        path: IndexPath,
    ) -> Option<RenderedView>;

    /// A minimal view used when a generator cannot produce a configured one.
    fn placeholder_view(&self, kind: ElementKind) -> RenderedView;

    /// Returns `true` once the widget has loaded its data at least once.
    ///
    /// Before that, the manager skips positional updates: the first reload
    /// picks up the whole state.
    fn is_displaying(&self) -> bool;

    /// Number of sections the widget currently displays.
    fn number_of_sections(&self) -> usize;

    /// Number of items the widget currently displays in `section`.
    fn number_of_items(&self, section: usize) -> usize;

    /// Inserts items at `paths`.
    fn insert_items(&mut self, paths: &[IndexPath]);

    /// Deletes the items at `paths`.
    fn delete_items(&mut self, paths: &[IndexPath]);

    /// Reconfigures the items at `paths` without changing counts.
    fn reload_items(&mut self, paths: &[IndexPath]);

    /// Moves one item.
    fn move_item(&mut self, from: IndexPath, to: IndexPath);

    /// Inserts whole sections, reading their item counts from `counts`.
    fn insert_sections(&mut self, sections: &[usize], counts: &dyn ItemCounts);

    /// Deletes whole sections.
    fn delete_sections(&mut self, sections: &[usize]);

    /// Reconfigures the headers and footers of `sections`.
    fn reload_sections(&mut self, sections: &[usize]);

    /// Discards everything and reloads from `counts`.
    ///
    /// `completion`, if any, runs once the host has applied the reload, which
    /// may be after this call returns.
    fn reload_data(&mut self, counts: &dyn ItemCounts, completion: Option<Completion>);

    /// Scrolls so the item at `path` is visible at `position`.
    fn scroll_to_item(&mut self, path: IndexPath, position: ScrollPosition, animated: bool);

    /// Clears the selection highlight of the item at `path`.
    fn deselect_item(&mut self, path: IndexPath, animated: bool);

    /// Applies the mutations made by `updates` as one animated transaction.
    fn perform_batch_updates(&mut self, updates: &mut dyn FnMut(&mut dyn ListWidget));
}
