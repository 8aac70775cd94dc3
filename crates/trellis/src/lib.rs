//! Trellis - declarative sections and rows for list and grid widgets.
//!
//! Application code describes what a list shows as data-bound *generators*
//! grouped into sections with optional headers and footers. Trellis keeps that
//! state, mirrors every change onto a host widget as positional updates,
//! answers the widget's data queries, and routes its callbacks through
//! plugins.
//!
//! # Modules
//!
//! - [`generator`]: the row and header/footer contracts and stock generators
//! - [`widget`]: the [`ListWidget`] contract hosts implement
//! - [`manager`]: [`StateManager`], the owner of section state
//! - [`event`] and [`plugin`]: widget events and their observers
//! - [`bridge`]: data source and delegate bridges for host callbacks
//! - [`builder`]: [`DataDisplayManager`], everything wired together
//! - [`testing`]: [`RecordingWidget`](testing::RecordingWidget), an in-memory host
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis::prelude::*;
//! use trellis::testing::RecordingWidget;
//!
//! #[derive(Default)]
//! struct TitleHeader;
//!
//! impl ConfigurableView for TitleHeader {
//!     type Model = &'static str;
//!     fn configure(&mut self, _model: &&'static str) {}
//! }
//!
//! #[derive(Default)]
//! struct MessageCell;
//!
//! impl ConfigurableView for MessageCell {
//!     type Model = String;
//!     fn configure(&mut self, _model: &String) {}
//! }
//!
//! let mut ddm = DataDisplayManager::builder(RecordingWidget::new()).build();
//!
//! ddm.add_section_header_generator(Rc::new(BaseSupplementaryGenerator::<TitleHeader>::new("Today")));
//! let first: CellGeneratorRef = Rc::new(BaseCellGenerator::<MessageCell>::new("Hello".into()));
//! ddm.add_cell_generator(first.clone());
//! ddm.force_refill();
//!
//! ddm.add_cell_generator_after(Rc::new(BaseCellGenerator::<MessageCell>::new("Hi!".into())), &first);
//! assert_eq!(ddm.number_of_items(0), 2);
//! assert_eq!(ddm.view().item_counts(), &[2]);
//! ```

pub mod bridge;
pub mod builder;
pub mod event;
pub mod generator;
pub mod manager;
pub mod plugin;
mod section;
pub mod testing;
pub mod widget;

pub use builder::{DataDisplayManager, DisplayManagerBuilder};
pub use manager::{ManagerConfig, StateManager};
pub use section::Section;
pub use trellis_core::{IndexPath, ManagerError, Point, Result, Size};
pub use widget::{ElementKind, ListWidget, ReuseIdentifier, ScrollPosition};

/// Common imports for application code.
pub mod prelude {
    pub use crate::builder::DataDisplayManager;
    pub use crate::event::{CollectionEvent, PrefetchEvent, ScrollEvent};
    pub use crate::generator::{
        BaseCellGenerator, BaseSupplementaryGenerator, CellGenerator, CellGeneratorRef,
        ConfigurableView, SupplementaryGenerator, SupplementaryRef,
    };
    pub use crate::manager::{ManagerConfig, StateManager};
    pub use crate::plugin::{Plugin, PluginCollection};
    pub use crate::widget::{ElementKind, ListWidget, ScrollPosition};
    pub use trellis_core::{IndexPath, Size};
}
