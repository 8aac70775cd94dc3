use trellis_core::logging::targets;

use super::Plugin;
use crate::event::CollectionEvent;
use crate::manager::StateManager;
use crate::widget::ListWidget;

/// Emits [`DisplayableItem`](crate::generator::DisplayableItem) signals as
/// rows enter and leave the screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayablePlugin;

impl DisplayablePlugin {
    pub fn new() -> Self {
        Self
    }
}

impl<W: ListWidget> Plugin<CollectionEvent, W> for DisplayablePlugin {
    fn name(&self) -> &str {
        "displayable"
    }

    fn process(&mut self, event: &CollectionEvent, manager: &StateManager<W>) {
        let (path, appearing) = match event {
            CollectionEvent::WillDisplayCell(path) => (*path, true),
            CollectionEvent::DidEndDisplayCell(path) => (*path, false),
            _ => return,
        };

        let Some(displayable) = manager
            .generator_at(path)
            .and_then(|generator| generator.as_displayable())
        else {
            tracing::trace!(target: targets::PLUGIN, %path, "no displayable generator");
            return;
        };

        if appearing {
            displayable.will_display().emit(path);
        } else {
            displayable.did_end_display().emit(path);
        }
    }
}
