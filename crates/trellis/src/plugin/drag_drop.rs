//! Reordering rows by drag and drop.
//!
//! Drag and drop is a query protocol rather than an event stream: the host
//! asks which items a drag carries, what a drop at a position would do, and
//! finally asks for the drop to be performed. [`DragAndDrop`] is that
//! contract; the delegate bridge routes host callbacks to at most one
//! implementation.

use trellis_core::IndexPath;
use trellis_core::logging::targets;

use crate::manager::StateManager;
use crate::widget::ListWidget;

/// One item carried by a drag session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    /// Payload identifier, from [`DraggableItem`](crate::generator::DraggableItem).
    pub identifier: String,
    /// Where the item was picked up.
    pub source: IndexPath,
}

/// What a drop would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropOperation {
    /// Nothing happens; the drag continues.
    #[default]
    Cancel,
    /// Drops are not allowed at this position.
    Forbidden,
    /// The dropped content is copied.
    Copy,
    /// The dropped content is moved.
    Move,
}

/// How a drop relates to the item under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropIntent {
    #[default]
    Unspecified,
    /// Insert the content as new rows at the destination.
    InsertAtDestination,
    /// Merge the content into the row at the destination.
    InsertIntoDestination,
}

/// Answer to "what happens if the user drops here".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropProposal {
    pub operation: DropOperation,
    pub intent: DropIntent,
}

impl DropProposal {
    pub const fn new(operation: DropOperation, intent: DropIntent) -> Self {
        Self { operation, intent }
    }

    /// A proposal refusing the drop.
    pub const fn forbidden() -> Self {
        Self::new(DropOperation::Forbidden, DropIntent::Unspecified)
    }
}

/// One item arriving in a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropItem {
    /// The position it came from, for drags that started in this widget.
    pub source: Option<IndexPath>,
    pub identifier: String,
}

/// Everything known about a drop being performed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropCoordinator {
    /// The position under the drop, if it landed on the list's content.
    pub destination: Option<IndexPath>,
    pub items: Vec<DropItem>,
}

/// Answers the host's drag and drop queries.
pub trait DragAndDrop<W: ListWidget> {
    /// Items a drag started at `path` carries. Empty refuses the drag.
    fn items_for_beginning(&mut self, path: IndexPath, manager: &StateManager<W>) -> Vec<DragItem>;

    /// What a drop at `destination` would do.
    fn drop_proposal(
        &self,
        manager: &StateManager<W>,
        destination: Option<IndexPath>,
        has_active_drag: bool,
    ) -> DropProposal;

    /// Applies the drop; returns the final positions of the moved rows.
    fn perform_drop(&mut self, manager: &mut StateManager<W>, coordinator: &DropCoordinator) -> Vec<IndexPath>;

    /// The drag session ended, with or without a drop.
    fn drag_session_ended(&mut self) {}
}

/// Reorders rows within the list.
///
/// Only rows whose generator is [`DraggableItem`](crate::generator::DraggableItem)
/// can be picked up, and only drags that started in this list can be dropped.
/// A drop moves the picked row through [`StateManager::move_generator`]; drops
/// beyond the end of a section land on its last valid position, and drops
/// outside the content append to the last section.
#[derive(Debug, Default)]
pub struct DragAndDroppablePlugin {
    source: Option<IndexPath>,
}

impl DragAndDroppablePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// The position of the row being dragged, if a drag is active.
    pub fn active_source(&self) -> Option<IndexPath> {
        self.source
    }

    /// Final position for a row moved from `from` to the requested `to`.
    fn clamp_destination<W: ListWidget>(
        manager: &StateManager<W>,
        from: IndexPath,
        to: Option<IndexPath>,
    ) -> Option<IndexPath> {
        let last = manager.number_of_sections().checked_sub(1)?;
        let to = to.unwrap_or_else(|| IndexPath::new(last, manager.number_of_items(last)));
        let section = to.section().min(last);
        let len = manager.number_of_items(section);
        let max_row = if section == from.section() {
            len.saturating_sub(1)
        } else {
            len
        };
        Some(IndexPath::new(section, to.row().min(max_row)))
    }
}

impl<W: ListWidget> DragAndDrop<W> for DragAndDroppablePlugin {
    fn items_for_beginning(&mut self, path: IndexPath, manager: &StateManager<W>) -> Vec<DragItem> {
        let Some(draggable) = manager
            .generator_at(path)
            .and_then(|generator| generator.as_draggable())
        else {
            tracing::debug!(target: targets::PLUGIN, %path, "row is not draggable");
            return Vec::new();
        };

        self.source = Some(path);
        vec![DragItem {
            identifier: draggable.drag_identifier().to_string(),
            source: path,
        }]
    }

    fn drop_proposal(
        &self,
        _manager: &StateManager<W>,
        _destination: Option<IndexPath>,
        has_active_drag: bool,
    ) -> DropProposal {
        if has_active_drag && self.source.is_some() {
            DropProposal::new(DropOperation::Move, DropIntent::InsertAtDestination)
        } else {
            DropProposal::forbidden()
        }
    }

    fn perform_drop(&mut self, manager: &mut StateManager<W>, coordinator: &DropCoordinator) -> Vec<IndexPath> {
        let Some(from) = coordinator
            .items
            .iter()
            .find_map(|item| item.source)
            .or(self.source.take())
        else {
            tracing::debug!(target: targets::PLUGIN, "drop without a local source, ignoring");
            return Vec::new();
        };
        self.source = None;

        let Some(to) = Self::clamp_destination(manager, from, coordinator.destination) else {
            return Vec::new();
        };

        match manager.move_generator(from, to) {
            Ok(()) => {
                tracing::debug!(target: targets::PLUGIN, %from, %to, "dropped row");
                vec![to]
            }
            Err(err) => {
                tracing::warn!(target: targets::PLUGIN, %err, %from, %to, "drop could not be applied");
                Vec::new()
            }
        }
    }

    fn drag_session_ended(&mut self) {
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BaseCellGenerator, CellGeneratorRef, ConfigurableView};
    use crate::testing::{RecordingWidget, WidgetCall};
    use std::rc::Rc;

    #[derive(Default)]
    struct Card;

    impl ConfigurableView for Card {
        type Model = &'static str;
        fn configure(&mut self, _model: &&'static str) {}
    }

    fn card(name: &'static str) -> CellGeneratorRef {
        Rc::new(BaseCellGenerator::<Card>::new(name).with_drag_identifier(name))
    }

    fn board() -> (StateManager<RecordingWidget>, Vec<CellGeneratorRef>) {
        let mut manager = StateManager::new(RecordingWidget::new());
        let cards = vec![card("a"), card("b"), card("c")];
        manager.add_cell_generators(cards.clone());
        manager.force_refill();
        (manager, cards)
    }

    #[test]
    fn test_begin_drag_requires_draggable() {
        let (mut manager, _) = board();
        manager.add_cell_generator(Rc::new(BaseCellGenerator::<Card>::new("fixed")));
        let mut plugin = DragAndDroppablePlugin::new();

        assert!(plugin.items_for_beginning(IndexPath::new(0, 3), &manager).is_empty());
        assert_eq!(plugin.active_source(), None);

        let items = plugin.items_for_beginning(IndexPath::new(0, 1), &manager);
        assert_eq!(
            items,
            vec![DragItem {
                identifier: "b".to_string(),
                source: IndexPath::new(0, 1)
            }]
        );
        assert_eq!(plugin.active_source(), Some(IndexPath::new(0, 1)));
    }

    #[test]
    fn test_proposal_depends_on_local_drag() {
        let (manager, _) = board();
        let mut plugin = DragAndDroppablePlugin::new();
        assert_eq!(
            plugin.drop_proposal(&manager, Some(IndexPath::new(0, 0)), true),
            DropProposal::forbidden()
        );

        plugin.items_for_beginning(IndexPath::new(0, 0), &manager);
        assert_eq!(
            plugin.drop_proposal(&manager, Some(IndexPath::new(0, 2)), true).operation,
            DropOperation::Move
        );
        assert_eq!(
            plugin.drop_proposal(&manager, None, false),
            DropProposal::forbidden()
        );
    }

    #[test]
    fn test_drop_moves_row() {
        let (mut manager, cards) = board();
        let mut plugin = DragAndDroppablePlugin::new();
        plugin.items_for_beginning(IndexPath::new(0, 0), &manager);
        manager.view_mut().clear_calls();

        let coordinator = DropCoordinator {
            destination: Some(IndexPath::new(0, 2)),
            items: vec![DropItem {
                source: Some(IndexPath::new(0, 0)),
                identifier: "a".to_string(),
            }],
        };
        let moved = plugin.perform_drop(&mut manager, &coordinator);

        assert_eq!(moved, vec![IndexPath::new(0, 2)]);
        assert_eq!(manager.index_path_of(&cards[0]), Some(IndexPath::new(0, 2)));
        assert!(manager.view().calls().contains(&WidgetCall::MoveItem {
            from: IndexPath::new(0, 0),
            to: IndexPath::new(0, 2)
        }));
        assert_eq!(plugin.active_source(), None);
    }

    #[test]
    fn test_drop_outside_content_appends() {
        let (mut manager, cards) = board();
        let mut plugin = DragAndDroppablePlugin::new();
        plugin.items_for_beginning(IndexPath::new(0, 0), &manager);

        let moved = plugin.perform_drop(&mut manager, &DropCoordinator::default());
        assert_eq!(moved, vec![IndexPath::new(0, 2)]);
        assert_eq!(manager.index_path_of(&cards[0]), Some(IndexPath::new(0, 2)));
    }

    #[test]
    fn test_drop_without_source_is_ignored() {
        let (mut manager, _) = board();
        let mut plugin = DragAndDroppablePlugin::new();
        assert!(plugin.perform_drop(&mut manager, &DropCoordinator::default()).is_empty());
    }
}
