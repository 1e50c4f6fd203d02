//! Platform input capabilities, detected once at start-up.

/// Which input families the host delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Pointer events arrive as touch lists instead of mouse positions.
    pub touch: bool,
    /// The host reports orientation changes instead of plain resizes.
    pub orientation_change: bool,
}

impl Capabilities {
    /// Capabilities of a console host: mouse reporting plus resize events.
    pub fn detect() -> Self {
        Capabilities::default()
    }

    pub fn touch() -> Self {
        Capabilities {
            touch: true,
            orientation_change: true,
        }
    }

    pub fn bindings(&self) -> EventBindings {
        EventBindings::for_capabilities(*self)
    }

    /// Reads the vertical coordinate the widget tracks from a pointer input.
    ///
    /// Touch hosts read the first active touch. Inputs of the wrong family
    /// yield `None`.
    pub fn pointer_y(&self, input: &PointerInput) -> Option<f64> {
        match (self.touch, input) {
            (false, PointerInput::Mouse { y }) => Some(*y),
            (true, PointerInput::Touch { touches, .. }) => touches.first().copied(),
            _ => None,
        }
    }
}

/// Raw pointer payload as a host delivers it.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { y: f64 },
    Touch { touches: Vec<f64>, changed: Vec<f64> },
}

impl PointerInput {
    pub fn mouse(y: f64) -> Self {
        PointerInput::Mouse { y }
    }

    /// A single-finger touch that is still on the surface.
    pub fn touch(y: f64) -> Self {
        PointerInput::Touch {
            touches: vec![y],
            changed: vec![y],
        }
    }
}

/// Kinds of event the widget listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Move,
    End,
    Cancel,
    Resize,
    TransitionEnd,
}

/// Concrete event names bound for a set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBindings {
    pub start: &'static str,
    pub move_: &'static str,
    pub end: &'static str,
    pub cancel: &'static str,
    pub resize: &'static str,
    pub transition_end: &'static str,
}

impl EventBindings {
    pub fn for_capabilities(caps: Capabilities) -> Self {
        EventBindings {
            start: if caps.touch { "touchstart" } else { "mousedown" },
            move_: if caps.touch { "touchmove" } else { "mousemove" },
            end: if caps.touch { "touchend" } else { "mouseup" },
            cancel: if caps.touch { "touchcancel" } else { "mouseup" },
            resize: if caps.orientation_change {
                "orientationchange"
            } else {
                "resize"
            },
            transition_end: "transitionend",
        }
    }

    /// Resolves a bound event name. End wins over cancel when both share a name.
    pub fn kind_of(&self, name: &str) -> Option<EventKind> {
        if name == self.start {
            Some(EventKind::Start)
        } else if name == self.move_ {
            Some(EventKind::Move)
        } else if name == self.end {
            Some(EventKind::End)
        } else if name == self.cancel {
            Some(EventKind::Cancel)
        } else if name == self.resize {
            Some(EventKind::Resize)
        } else if name == self.transition_end {
            Some(EventKind::TransitionEnd)
        } else {
            None
        }
    }
}
