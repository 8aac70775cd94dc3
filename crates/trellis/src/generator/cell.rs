//! Row generator implementations.
//!
//! - [`BaseCellGenerator`]: model-bound, selectable, optionally prefetchable
//!   and draggable
//! - [`SizableCellGenerator`]: a base generator with a fixed size
//! - [`AccurateHeightCellGenerator`] / [`AccurateWidthCellGenerator`]: sizes
//!   computed from the model through the view type's static measurement

use std::any::Any;
use std::marker::PhantomData;

use trellis_core::{IndexPath, Signal, Size};

use super::dequeue_configured;
use super::traits::{
    AccurateHeight, AccurateWidth, CellGenerator, ConfigurableView, DisplayableItem,
    DraggableItem, PrefetchableItem, SelectableItem, SizableItem,
};
use crate::widget::{ElementKind, ListWidget, RenderedView, ReuseIdentifier};

/// Generates a reusable `V` configured with a model.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use trellis::generator::{BaseCellGenerator, CellGeneratorRef, ConfigurableView};
///
/// #[derive(Default)]
/// struct TitleCell {
///     text: String,
/// }
///
/// impl ConfigurableView for TitleCell {
///     type Model = String;
///     fn configure(&mut self, model: &String) {
///         self.text = model.clone();
///     }
/// }
///
/// let generator = Rc::new(BaseCellGenerator::<TitleCell>::new("Inbox".to_string()));
/// generator.did_select_event().connect(|_| println!("Inbox tapped"));
///
/// let handle: CellGeneratorRef = generator;
/// ```
pub struct BaseCellGenerator<V: ConfigurableView> {
    model: V::Model,
    did_select: Signal<()>,
    will_display: Signal<IndexPath>,
    did_end_display: Signal<IndexPath>,
    needs_deselect: bool,
    request_id: Option<Box<dyn Any>>,
    drag_identifier: Option<String>,
    _view: PhantomData<fn() -> V>,
}

impl<V: ConfigurableView> BaseCellGenerator<V> {
    /// Creates a generator for `model`.
    pub fn new(model: V::Model) -> Self {
        Self {
            model,
            did_select: Signal::new(),
            will_display: Signal::new(),
            did_end_display: Signal::new(),
            needs_deselect: true,
            request_id: None,
            drag_identifier: None,
            _view: PhantomData,
        }
    }

    /// Keeps the selection highlight after selection when `false`.
    pub fn with_deselect(mut self, needs_deselect: bool) -> Self {
        self.needs_deselect = needs_deselect;
        self
    }

    /// Makes the generator prefetchable under `key`.
    pub fn with_request_id<K: Any>(mut self, key: K) -> Self {
        self.request_id = Some(Box::new(key));
        self
    }

    /// Makes the generator draggable with `identifier` as payload.
    pub fn with_drag_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.drag_identifier = Some(identifier.into());
        self
    }

    /// The bound model.
    pub fn model(&self) -> &V::Model {
        &self.model
    }

    /// Emitted when the row is selected.
    pub fn did_select_event(&self) -> &Signal<()> {
        &self.did_select
    }

    /// Emitted when the row is about to be displayed.
    pub fn will_display_event(&self) -> &Signal<IndexPath> {
        &self.will_display
    }
}

impl<V: ConfigurableView + Default> CellGenerator for BaseCellGenerator<V> {
    fn reuse_identifier(&self) -> ReuseIdentifier {
        ReuseIdentifier::of::<V>()
    }

    fn register(&self, widget: &mut dyn ListWidget) {
        widget.register_template(
            ElementKind::Cell,
            &self.reuse_identifier(),
            std::rc::Rc::new(|| Box::new(V::default()) as RenderedView),
        );
    }

    fn generate(&self, widget: &mut dyn ListWidget, path: IndexPath) -> RenderedView {
        dequeue_configured::<V>(widget, ElementKind::Cell, path, &self.model)
    }

    fn as_selectable(&self) -> Option<&dyn SelectableItem> {
        Some(self)
    }

    fn as_prefetchable(&self) -> Option<&dyn PrefetchableItem> {
        self.request_id.as_ref().map(|_| self as &dyn PrefetchableItem)
    }

    fn as_draggable(&self) -> Option<&dyn DraggableItem> {
        self.drag_identifier.as_ref().map(|_| self as &dyn DraggableItem)
    }

    fn as_displayable(&self) -> Option<&dyn DisplayableItem> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<V: ConfigurableView> SelectableItem for BaseCellGenerator<V> {
    fn did_select(&self) -> &Signal<()> {
        &self.did_select
    }

    fn needs_deselect(&self) -> bool {
        self.needs_deselect
    }
}

impl<V: ConfigurableView> PrefetchableItem for BaseCellGenerator<V> {
    fn request_id(&self) -> &dyn Any {
        match &self.request_id {
            Some(key) => key.as_ref(),
            None => &(),
        }
    }
}

impl<V: ConfigurableView> DraggableItem for BaseCellGenerator<V> {
    fn drag_identifier(&self) -> &str {
        self.drag_identifier.as_deref().unwrap_or_default()
    }
}

impl<V: ConfigurableView> DisplayableItem for BaseCellGenerator<V> {
    fn will_display(&self) -> &Signal<IndexPath> {
        &self.will_display
    }

    fn did_end_display(&self) -> &Signal<IndexPath> {
        &self.did_end_display
    }
}

/// Forwards every `CellGenerator` method except `as_sizable` to `self.base`.
macro_rules! forward_to_base {
    () => {
        fn reuse_identifier(&self) -> ReuseIdentifier {
            self.base.reuse_identifier()
        }

        fn register(&self, widget: &mut dyn ListWidget) {
            self.base.register(widget)
        }

        fn generate(&self, widget: &mut dyn ListWidget, path: IndexPath) -> RenderedView {
            self.base.generate(widget, path)
        }

        fn as_selectable(&self) -> Option<&dyn SelectableItem> {
            self.base.as_selectable()
        }

        fn as_sizable(&self) -> Option<&dyn SizableItem> {
            Some(self)
        }

        fn as_prefetchable(&self) -> Option<&dyn PrefetchableItem> {
            self.base.as_prefetchable()
        }

        fn as_draggable(&self) -> Option<&dyn DraggableItem> {
            self.base.as_draggable()
        }

        fn as_displayable(&self) -> Option<&dyn DisplayableItem> {
            self.base.as_displayable()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    };
}

/// A base generator that reports a fixed size.
pub struct SizableCellGenerator<V: ConfigurableView> {
    base: BaseCellGenerator<V>,
    size: Size,
}

impl<V: ConfigurableView> SizableCellGenerator<V> {
    /// Creates a generator for `model` that always measures `size`.
    pub fn new(model: V::Model, size: Size) -> Self {
        Self::from_base(BaseCellGenerator::new(model), size)
    }

    /// Wraps an already configured base generator.
    pub fn from_base(base: BaseCellGenerator<V>, size: Size) -> Self {
        Self { base, size }
    }

    /// The wrapped base generator.
    pub fn base(&self) -> &BaseCellGenerator<V> {
        &self.base
    }
}

impl<V: ConfigurableView + Default> CellGenerator for SizableCellGenerator<V> {
    forward_to_base!();
}

impl<V: ConfigurableView> SizableItem for SizableCellGenerator<V> {
    fn size(&self, _available: Size) -> Size {
        self.size
    }
}

/// A base generator whose height is computed from the model.
///
/// The width is whatever the container offers.
pub struct AccurateHeightCellGenerator<V: AccurateHeight> {
    base: BaseCellGenerator<V>,
}

impl<V: AccurateHeight> AccurateHeightCellGenerator<V> {
    pub fn new(model: V::Model) -> Self {
        Self::from_base(BaseCellGenerator::new(model))
    }

    pub fn from_base(base: BaseCellGenerator<V>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BaseCellGenerator<V> {
        &self.base
    }
}

impl<V: AccurateHeight + Default> CellGenerator for AccurateHeightCellGenerator<V> {
    forward_to_base!();
}

impl<V: AccurateHeight> SizableItem for AccurateHeightCellGenerator<V> {
    fn size(&self, available: Size) -> Size {
        available.with_height(V::height(available.width, self.base.model()))
    }
}

/// A base generator whose width is computed from the model.
///
/// The height is whatever the container offers.
pub struct AccurateWidthCellGenerator<V: AccurateWidth> {
    base: BaseCellGenerator<V>,
}

impl<V: AccurateWidth> AccurateWidthCellGenerator<V> {
    pub fn new(model: V::Model) -> Self {
        Self::from_base(BaseCellGenerator::new(model))
    }

    pub fn from_base(base: BaseCellGenerator<V>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BaseCellGenerator<V> {
        &self.base
    }
}

impl<V: AccurateWidth + Default> CellGenerator for AccurateWidthCellGenerator<V> {
    forward_to_base!();
}

impl<V: AccurateWidth> SizableItem for AccurateWidthCellGenerator<V> {
    fn size(&self, available: Size) -> Size {
        available.with_width(V::width(available.height, self.base.model()))
    }
}
