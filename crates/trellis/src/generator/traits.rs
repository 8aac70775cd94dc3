//! Core generator traits and the optional capabilities generators can expose.
//!
//! A generator implements only the base contract ([`CellGenerator`] or
//! [`SupplementaryGenerator`]) plus whichever capabilities it needs. Callers
//! discover capabilities through the `as_*` accessors, which return `None`
//! unless the generator opts in.

use std::any::Any;
use std::rc::Rc;

use trellis_core::{IndexPath, Signal, Size};

use crate::widget::{ElementKind, ListWidget, RenderedView, ReuseIdentifier};

/// Shared handle to a row generator.
pub type CellGeneratorRef = Rc<dyn CellGenerator>;

/// Shared handle to a header or footer generator.
pub type SupplementaryRef = Rc<dyn SupplementaryGenerator>;

/// A view type that can be configured from a model.
///
/// Implemented by application view types; generators create them through
/// `Default` when registering a template.
///
/// # Example
///
/// ```
/// use trellis::generator::ConfigurableView;
///
/// #[derive(Default)]
/// struct TitleCell {
///     text: String,
/// }
///
/// impl ConfigurableView for TitleCell {
///     type Model = String;
///
///     fn configure(&mut self, model: &String) {
///         self.text = model.clone();
///     }
/// }
/// ```
pub trait ConfigurableView: 'static {
    /// The data the view displays.
    type Model: 'static;

    /// Applies `model` to this view.
    fn configure(&mut self, model: &Self::Model);
}

/// Produces one row (or grid item) of a section.
///
/// Generators are compared by identity, not by model: two generators built
/// from equal models are two different rows. See [`same_generator`].
pub trait CellGenerator: 'static {
    /// The template this generator dequeues.
    fn reuse_identifier(&self) -> ReuseIdentifier;

    /// Registers the template with `widget`.
    ///
    /// Must be idempotent; the manager calls it every time the generator is
    /// added.
    fn register(&self, widget: &mut dyn ListWidget);

    /// Dequeues and configures the view for `path`.
    ///
    /// Never panics: if the dequeued view is missing or of another type, the
    /// widget's placeholder view is returned instead.
    fn generate(&self, widget: &mut dyn ListWidget, path: IndexPath) -> RenderedView;

    /// Selection capability.
    fn as_selectable(&self) -> Option<&dyn SelectableItem> {
        None
    }

    /// Size query capability.
    fn as_sizable(&self) -> Option<&dyn SizableItem> {
        None
    }

    /// Prefetch key capability.
    fn as_prefetchable(&self) -> Option<&dyn PrefetchableItem> {
        None
    }

    /// Drag payload capability.
    fn as_draggable(&self) -> Option<&dyn DraggableItem> {
        None
    }

    /// Display notification capability.
    fn as_displayable(&self) -> Option<&dyn DisplayableItem> {
        None
    }

    /// Downcast support for application code.
    fn as_any(&self) -> &dyn Any;
}

/// Produces the header or footer of a section.
pub trait SupplementaryGenerator: 'static {
    /// The template this generator dequeues, if it renders anything.
    fn reuse_identifier(&self) -> Option<ReuseIdentifier>;

    /// Registers the template with `widget` as a `kind` view.
    fn register(&self, widget: &mut dyn ListWidget, kind: ElementKind);

    /// Dequeues and configures the `kind` view of `section`.
    fn generate(&self, widget: &mut dyn ListWidget, kind: ElementKind, section: usize) -> RenderedView;

    /// Returns `true` for the empty generator used to pad sections.
    fn is_placeholder(&self) -> bool {
        false
    }

    /// Size query capability.
    fn as_sizable(&self) -> Option<&dyn SizableItem> {
        None
    }

    /// Downcast support for application code.
    fn as_any(&self) -> &dyn Any;
}

/// An item that reacts to selection.
pub trait SelectableItem {
    /// Emitted when the host reports the item was selected.
    fn did_select(&self) -> &Signal<()>;

    /// Whether the selection highlight is cleared right after selection.
    fn needs_deselect(&self) -> bool {
        true
    }
}

/// An item that knows its size.
pub trait SizableItem {
    /// The item's size given the space the container offers.
    fn size(&self, available: Size) -> Size;
}

/// An item whose content can be fetched ahead of display.
pub trait PrefetchableItem {
    /// The key handed to a content prefetcher.
    ///
    /// Prefetch plugins downcast it to their prefetcher's content type and
    /// skip items whose key has another type.
    fn request_id(&self) -> &dyn Any;
}

/// An item that can be dragged.
pub trait DraggableItem {
    /// Payload identifier carried by the drag session.
    fn drag_identifier(&self) -> &str;
}

/// An item that wants to know when it enters or leaves the screen.
pub trait DisplayableItem {
    /// Emitted with the item's path just before it is displayed.
    fn will_display(&self) -> &Signal<IndexPath>;

    /// Emitted with the item's path after it left the screen.
    fn did_end_display(&self) -> &Signal<IndexPath>;
}

/// A view whose height follows from its model and the available width.
///
/// Lets sizes be computed before any view instance exists.
pub trait AccurateHeight: ConfigurableView {
    /// Height of a view showing `model` at `width`.
    fn height(width: f32, model: &Self::Model) -> f32;
}

/// A view whose width follows from its model and the available height.
pub trait AccurateWidth: ConfigurableView {
    /// Width of a view showing `model` at `height`.
    fn width(height: f32, model: &Self::Model) -> f32;
}

/// Returns `true` if `a` and `b` are the same generator instance.
///
/// Compares the data address only, so handles of different trait object
/// types (or a concrete `Rc<T>` and its `Rc<dyn CellGenerator>`) compare
/// equal when they share the allocation.
#[inline]
pub fn same_generator<T: ?Sized, U: ?Sized>(a: &Rc<T>, b: &Rc<U>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
