use trellis_core::Point;
use trellis_core::logging::targets;

use super::Plugin;
use crate::event::ScrollEvent;
use crate::manager::StateManager;
use crate::widget::ListWidget;

/// The direction content moves under the user's finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Reports scroll direction changes.
///
/// The direction is derived from successive `DidScroll` offsets along the
/// axis that moved further; the callback only runs when it changes. Scrolling
/// to the top resets the tracking.
pub struct ScrollDirectionPlugin {
    last_offset: Option<Point>,
    direction: Option<ScrollDirection>,
    on_change: Box<dyn FnMut(ScrollDirection)>,
}

impl ScrollDirectionPlugin {
    /// Creates a plugin calling `on_change` with each new direction.
    pub fn new(on_change: impl FnMut(ScrollDirection) + 'static) -> Self {
        Self {
            last_offset: None,
            direction: None,
            on_change: Box::new(on_change),
        }
    }

    /// The most recent direction, if the content has moved.
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    fn track(&mut self, offset: Point) {
        let Some(previous) = self.last_offset.replace(offset) else {
            return;
        };
        let dx = offset.x - previous.x;
        let dy = offset.y - previous.y;
        let direction = if dy.abs() >= dx.abs() {
            if dy > 0.0 {
                ScrollDirection::Down
            } else if dy < 0.0 {
                ScrollDirection::Up
            } else {
                return;
            }
        } else if dx > 0.0 {
            ScrollDirection::Right
        } else {
            ScrollDirection::Left
        };

        if self.direction != Some(direction) {
            tracing::trace!(target: targets::PLUGIN, ?direction, "scroll direction changed");
            self.direction = Some(direction);
            (self.on_change)(direction);
        }
    }
}

impl<W: ListWidget> Plugin<ScrollEvent, W> for ScrollDirectionPlugin {
    fn name(&self) -> &str {
        "scroll_direction"
    }

    fn process(&mut self, event: &ScrollEvent, _manager: &StateManager<W>) {
        match event {
            ScrollEvent::DidScroll { offset } => self.track(*offset),
            ScrollEvent::DidScrollToTop => {
                self.last_offset = None;
                self.direction = None;
            }
            _ => {}
        }
    }
}
