use std::time::Duration;

use crate::panel::Panel;

/// Direction a drag is locked to once it leaves the debounce zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pointer moved up; advances to the next panel in document order.
    Up,
    /// Pointer moved down; returns to the previous panel.
    Down,
}

impl Direction {
    /// Direction of a net vertical delta, or `None` while it is zero.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta < 0.0 {
            Some(Direction::Up)
        } else if delta > 0.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Whether a net delta still points this way.
    pub fn accepts(self, delta: f64) -> bool {
        match self {
            Direction::Up => delta <= 0.0,
            Direction::Down => delta > 0.0,
        }
    }

    /// Index of the neighbour of `current` in this direction, if any.
    pub fn neighbour(self, current: usize, count: usize) -> Option<usize> {
        match self {
            Direction::Up => Some(current + 1).filter(|&i| i < count),
            Direction::Down => current.checked_sub(1),
        }
    }

    /// Clone angle for a rotation of `degrees` in this direction.
    pub fn signed(self, degrees: f64) -> f64 {
        match self {
            Direction::Up => degrees,
            Direction::Down => -degrees,
        }
    }
}

/// Edge of the panel the flipping half is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hinge {
    /// The lower half lifts up around the centre line.
    Bottom,
    /// The upper half folds down around the centre line.
    Top,
}

impl From<Direction> for Hinge {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Hinge::Bottom,
            Direction::Down => Hinge::Top,
        }
    }
}

/// Ephemeral card rendering both faces during a flip.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionClone {
    pub front_panel: usize,
    pub back_panel: usize,
    /// Copy of the current panel's inner content.
    pub front: Vec<String>,
    /// Copy of the candidate panel's content, shown once the card passes 90°.
    pub back: Vec<String>,
    pub hinge: Hinge,
    /// Signed angle last applied to the card.
    pub angle: f64,
    pub transition: Duration,
}

impl TransitionClone {
    pub fn materialize(panels: &[Panel], current: usize, candidate: usize, direction: Direction) -> Self {
        TransitionClone {
            front_panel: current,
            back_panel: candidate,
            front: panels[current].content.clone(),
            back: panels[candidate].content.clone(),
            hinge: direction.into(),
            angle: 0.0,
            transition: Duration::ZERO,
        }
    }
}

/// Panels whose shadows animate during the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowPair {
    pub current: usize,
    pub candidate: usize,
}

/// State of one drag, from pointer-down until it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub start_y: f64,
    pub last_y: f64,
    /// Accumulated absolute movement.
    pub steps: f64,
    /// Latest position minus start position.
    pub net: f64,
    pub direction: Option<Direction>,
    pub threshold_exceeded: bool,
    pub candidate: Option<usize>,
    pub clone: Option<TransitionClone>,
    pub shadows: Option<ShadowPair>,
}

impl Gesture {
    pub fn begin(y: f64) -> Self {
        Gesture {
            start_y: y,
            last_y: y,
            steps: 0.0,
            net: 0.0,
            direction: None,
            threshold_exceeded: false,
            candidate: None,
            clone: None,
            shadows: None,
        }
    }

    /// Records a pointer position, returning the accumulated movement.
    pub fn track(&mut self, y: f64) -> f64 {
        self.steps += (y - self.last_y).abs();
        self.last_y = y;
        self.net = y - self.start_y;
        self.steps
    }
}

/// Externally visible phase of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    Committing,
    Reverting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_delta() {
        assert_eq!(Direction::from_delta(-3.0), Some(Direction::Up));
        assert_eq!(Direction::from_delta(3.0), Some(Direction::Down));
        assert_eq!(Direction::from_delta(0.0), None);
    }

    #[test]
    fn neighbours_stop_at_edges() {
        assert_eq!(Direction::Up.neighbour(0, 3), Some(1));
        assert_eq!(Direction::Up.neighbour(2, 3), None);
        assert_eq!(Direction::Down.neighbour(0, 3), None);
        assert_eq!(Direction::Down.neighbour(2, 3), Some(1));
    }

    #[test]
    fn track_accumulates_absolute_movement() {
        let mut gesture = Gesture::begin(100.0);
        gesture.track(94.0);
        gesture.track(97.0);
        assert_eq!(gesture.steps, 9.0);
        assert_eq!(gesture.net, -3.0);
    }
}
