//! The seam between the widget and whatever draws it.

use std::time::Duration;

use crate::gesture::TransitionClone;

/// A surface whose property changes can be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Clone,
    Shadow(usize),
}

/// Visual side effects requested by the widget.
pub trait FlipRenderer {
    /// Rotates the transition clone to a signed angle in degrees.
    fn apply_rotation(&mut self, degrees: f64);
    /// Duration over which later property changes of `surface` animate.
    fn set_transition_duration(&mut self, surface: Surface, duration: Duration);
    fn set_shadow_opacity(&mut self, panel: usize, opacity: f64);
    /// Toggles the state in which the card's back face is on top.
    fn set_over(&mut self, over: bool);
    fn mount_clone(&mut self, clone: &TransitionClone);
    fn remove_clone(&mut self);
}

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Rotate(f64),
    Transition(Surface, Duration),
    ShadowOpacity(usize, f64),
    Over(bool),
    MountClone { front: usize, back: usize },
    RemoveClone,
}

/// Renderer that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<RenderCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn last_rotation(&self) -> Option<f64> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::Rotate(deg) => Some(*deg),
            _ => None,
        })
    }
}

impl FlipRenderer for RecordingRenderer {
    fn apply_rotation(&mut self, degrees: f64) {
        self.commands.push(RenderCommand::Rotate(degrees));
    }

    fn set_transition_duration(&mut self, surface: Surface, duration: Duration) {
        self.commands.push(RenderCommand::Transition(surface, duration));
    }

    fn set_shadow_opacity(&mut self, panel: usize, opacity: f64) {
        self.commands.push(RenderCommand::ShadowOpacity(panel, opacity));
    }

    fn set_over(&mut self, over: bool) {
        self.commands.push(RenderCommand::Over(over));
    }

    fn mount_clone(&mut self, clone: &TransitionClone) {
        self.commands.push(RenderCommand::MountClone {
            front: clone.front_panel,
            back: clone.back_panel,
        });
    }

    fn remove_clone(&mut self) {
        self.commands.push(RenderCommand::RemoveClone);
    }
}
