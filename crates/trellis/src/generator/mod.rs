//! Generators: data-bound producers of rows, headers and footers.
//!
//! A generator pairs a model with the knowledge of which reusable view type
//! renders it. The state manager stores generators; the data-source bridge
//! asks them for views when the host widget needs one.
//!
//! # Core Types
//!
//! - [`CellGenerator`]: the row contract
//! - [`SupplementaryGenerator`]: the header/footer contract
//! - [`ConfigurableView`]: implemented by application view types
//! - Capabilities: [`SelectableItem`], [`SizableItem`], [`PrefetchableItem`],
//!   [`DraggableItem`], [`DisplayableItem`]
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐ register  ┌──────────────┐
//! │  Generator   │──────────>│  ListWidget  │
//! │ (model + V)  │<──────────│  (host)      │
//! └──────────────┘  dequeue  └──────────────┘
//!        │ configure
//!        v
//!  ┌───────────┐
//!  │ V: view   │
//!  └───────────┘
//! ```

mod cell;
mod supplementary;
mod traits;

pub use cell::{
    AccurateHeightCellGenerator, AccurateWidthCellGenerator, BaseCellGenerator,
    SizableCellGenerator,
};
pub use supplementary::{BaseSupplementaryGenerator, EmptySupplementaryGenerator};
pub use traits::{
    AccurateHeight, AccurateWidth, CellGenerator, CellGeneratorRef, ConfigurableView,
    DisplayableItem, DraggableItem, PrefetchableItem, SelectableItem, SizableItem,
    SupplementaryGenerator, SupplementaryRef, same_generator,
};

use trellis_core::IndexPath;
use trellis_core::logging::targets;

use crate::widget::{ElementKind, ListWidget, RenderedView, ReuseIdentifier};

/// Dequeues the `V` template and configures it with `model`.
///
/// Falls back to the widget's placeholder if nothing is registered or the
/// dequeued view is not a `V`.
pub(crate) fn dequeue_configured<V: ConfigurableView>(
    widget: &mut dyn ListWidget,
    kind: ElementKind,
    path: IndexPath,
    model: &V::Model,
) -> RenderedView {
    let id = ReuseIdentifier::of::<V>();
    let Some(mut view) = widget.dequeue_reusable_view(kind, &id, path) else {
        tracing::warn!(target: targets::GENERATOR, %kind, %path, template = %id, "template not registered, using placeholder");
        return widget.placeholder_view(kind);
    };

    if let Some(configurable) = view.downcast_mut::<V>() {
        configurable.configure(model);
        return view;
    }

    tracing::warn!(target: targets::GENERATOR, %kind, %path, template = %id, "dequeued view has unexpected type, using placeholder");
    widget.placeholder_view(kind)
}
