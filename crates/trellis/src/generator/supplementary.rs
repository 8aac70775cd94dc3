//! Header and footer generators.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use trellis_core::{IndexPath, Size};

use super::dequeue_configured;
use super::traits::{ConfigurableView, SizableItem, SupplementaryGenerator};
use crate::widget::{ElementKind, ListWidget, RenderedView, ReuseIdentifier};

/// Generates a reusable `V` header or footer configured with a model.
///
/// The same generator type serves both roles; the manager registers it with
/// the kind it is added as.
pub struct BaseSupplementaryGenerator<V: ConfigurableView> {
    model: V::Model,
    size: Option<Size>,
    _view: PhantomData<fn() -> V>,
}

impl<V: ConfigurableView> BaseSupplementaryGenerator<V> {
    /// Creates a generator for `model`.
    pub fn new(model: V::Model) -> Self {
        Self {
            model,
            size: None,
            _view: PhantomData,
        }
    }

    /// Reports a fixed size to the host.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// The bound model.
    pub fn model(&self) -> &V::Model {
        &self.model
    }
}

impl<V: ConfigurableView + Default> SupplementaryGenerator for BaseSupplementaryGenerator<V> {
    fn reuse_identifier(&self) -> Option<ReuseIdentifier> {
        Some(ReuseIdentifier::of::<V>())
    }

    fn register(&self, widget: &mut dyn ListWidget, kind: ElementKind) {
        widget.register_template(
            kind,
            &ReuseIdentifier::of::<V>(),
            Rc::new(|| Box::new(V::default()) as RenderedView),
        );
    }

    fn generate(&self, widget: &mut dyn ListWidget, kind: ElementKind, section: usize) -> RenderedView {
        dequeue_configured::<V>(widget, kind, IndexPath::new(section, 0), &self.model)
    }

    fn as_sizable(&self) -> Option<&dyn SizableItem> {
        self.size.map(|_| self as &dyn SizableItem)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<V: ConfigurableView> SizableItem for BaseSupplementaryGenerator<V> {
    fn size(&self, _available: Size) -> Size {
        self.size.unwrap_or(Size::ZERO)
    }
}

/// The no-op header/footer that pads sections without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySupplementaryGenerator;

impl EmptySupplementaryGenerator {
    /// A shared placeholder handle.
    pub fn shared() -> Rc<dyn SupplementaryGenerator> {
        Rc::new(Self)
    }
}

impl SupplementaryGenerator for EmptySupplementaryGenerator {
    fn reuse_identifier(&self) -> Option<ReuseIdentifier> {
        None
    }

    fn register(&self, _widget: &mut dyn ListWidget, _kind: ElementKind) {}

    fn generate(&self, widget: &mut dyn ListWidget, kind: ElementKind, _section: usize) -> RenderedView {
        widget.placeholder_view(kind)
    }

    fn is_placeholder(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
