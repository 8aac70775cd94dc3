//! Animators: how a group of widget mutations is applied.

use crate::widget::ListWidget;

/// The mutations applied as one step.
pub type Animations<'a> = Box<dyn FnOnce(&mut dyn ListWidget) + 'a>;

/// Applies a group of widget mutations.
///
/// Implementations must run `animations` exactly once, before returning.
pub trait Animator {
    fn perform(&self, view: &mut dyn ListWidget, animations: Animations<'_>);
}

/// Runs mutations inside the widget's batch-update transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchAnimator;

impl Animator for BatchAnimator {
    fn perform(&self, view: &mut dyn ListWidget, animations: Animations<'_>) {
        let mut animations = Some(animations);
        view.perform_batch_updates(&mut |view: &mut dyn ListWidget| {
            if let Some(animations) = animations.take() {
                animations(view);
            }
        });
    }
}

/// Runs mutations directly, without a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAnimator;

impl Animator for ImmediateAnimator {
    fn perform(&self, view: &mut dyn ListWidget, animations: Animations<'_>) {
        animations(view);
    }
}
