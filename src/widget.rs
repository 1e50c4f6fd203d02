use std::collections::HashMap;

use log::{debug, info, trace};

use crate::capabilities::{Capabilities, EventKind, PointerInput};
use crate::config::{AttachOptions, FlipConfig};
use crate::error::FlipError;
use crate::gesture::{Direction, Gesture, GesturePhase, ShadowPair, TransitionClone};
use crate::markup::Element;
use crate::math::{falling_shadow, rising_shadow, rotation_degrees};
use crate::panel::{stacking_order, Panel};
use crate::renderer::{FlipRenderer, Surface};

/// Events the widget reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum FlipEvent {
    PointerStart(PointerInput),
    PointerMove(PointerInput),
    PointerEnd,
    PointerCancel,
    /// The clone's transition finished animating.
    TransitionEnd,
    Resize { height: f64 },
}

impl FlipEvent {
    /// Builds an event from a bound event kind and an optional coordinate.
    ///
    /// Pointer-start and pointer-move need a coordinate, resize needs the new
    /// height; returns `None` when it is missing.
    pub fn from_kind(kind: EventKind, caps: Capabilities, value: Option<f64>) -> Option<Self> {
        let input = |y: f64| {
            if caps.touch {
                PointerInput::touch(y)
            } else {
                PointerInput::mouse(y)
            }
        };
        match kind {
            EventKind::Start => value.map(|y| FlipEvent::PointerStart(input(y))),
            EventKind::Move => value.map(|y| FlipEvent::PointerMove(input(y))),
            EventKind::End => Some(FlipEvent::PointerEnd),
            EventKind::Cancel => Some(FlipEvent::PointerCancel),
            EventKind::Resize => value.map(|height| FlipEvent::Resize { height }),
            EventKind::TransitionEnd => Some(FlipEvent::TransitionEnd),
        }
    }
}

/// How the clone settles after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Animating forward onto the candidate panel.
    Committing,
    /// Animating back onto the current panel.
    Reverting,
    /// Nothing was flipping; the widget is already idle.
    Immediate,
}

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    /// The event does not apply in the current phase.
    Ignored,
    Started,
    /// Movement still inside the debounce zone.
    Absorbed,
    Rotated { degrees: f64 },
    /// Movement against the locked direction.
    DirectionLocked,
    /// No panel exists in the drag direction.
    Aborted,
    Released(Settle),
    Settled { advanced: bool },
    Resized,
}

impl EventOutcome {
    /// Whether the host must suppress its default scrolling for this event.
    pub fn prevents_default(&self) -> bool {
        matches!(self, EventOutcome::Rotated { .. } | EventOutcome::DirectionLocked)
    }
}

enum Phase {
    Idle,
    Dragging(Gesture),
    Settling(Gesture),
}

/// The page flip widget bound to one container.
pub struct FlipWidget<R> {
    config: FlipConfig,
    capabilities: Capabilities,
    panels: Vec<Panel>,
    current: usize,
    height: f64,
    deg: f64,
    over: bool,
    phase: Phase,
    renderer: R,
}

impl<R: FlipRenderer> FlipWidget<R> {
    /// Binds a widget to `container` with the given container height.
    pub fn attach(
        container: &Element,
        height: f64,
        options: &AttachOptions,
        config: FlipConfig,
        capabilities: Capabilities,
        renderer: R,
    ) -> Result<Self, FlipError> {
        if !(height.is_finite() && height > 0.0) {
            return Err(FlipError::InvalidHeight { height });
        }
        let (panel_selector, inner_selector) = options.selectors()?;

        let sections: Vec<&Element> = container.select(&panel_selector).collect();
        if sections.is_empty() {
            return Err(FlipError::NoPanels {
                container: container.id.clone().unwrap_or_else(|| container.tag.clone()),
                selector: panel_selector.as_str().to_string(),
            });
        }

        let mut panels = Vec::with_capacity(sections.len());
        for ((index, section), z_index) in sections.iter().enumerate().zip(stacking_order(sections.len())) {
            let inner = section
                .select(&inner_selector)
                .next()
                .ok_or_else(|| FlipError::MissingInner {
                    index,
                    selector: inner_selector.as_str().to_string(),
                })?;
            panels.push(Panel::new(inner.text_content(), z_index));
        }
        panels[0].markers.current = true;

        info!(
            "attached flip widget to {} panels (height {height})",
            panels.len()
        );

        Ok(FlipWidget {
            config,
            capabilities,
            panels,
            current: 0,
            height,
            deg: 0.0,
            over: false,
            phase: Phase::Idle,
            renderer,
        })
    }

    /// Routes one event to its state transition.
    pub fn handle_event(&mut self, event: FlipEvent) -> EventOutcome {
        match event {
            FlipEvent::PointerStart(input) => {
                match self.capabilities.pointer_y(&input) {
                    Some(y) => self.start(y),
                    None => EventOutcome::Ignored,
                }
            }
            FlipEvent::PointerMove(input) => {
                match self.capabilities.pointer_y(&input) {
                    Some(y) => self.move_to(y),
                    None => EventOutcome::Ignored,
                }
            }
            FlipEvent::PointerEnd | FlipEvent::PointerCancel => self.end(),
            FlipEvent::TransitionEnd => self.after_transition_end(),
            FlipEvent::Resize { height } => self.resize(height),
        }
    }

    fn start(&mut self, y: f64) -> EventOutcome {
        if !matches!(self.phase, Phase::Idle) {
            return EventOutcome::Ignored;
        }
        debug!("gesture started at y={y}");
        self.phase = Phase::Dragging(Gesture::begin(y));
        EventOutcome::Started
    }

    fn move_to(&mut self, y: f64) -> EventOutcome {
        let mut gesture = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(gesture) => gesture,
            other => {
                self.phase = other;
                return EventOutcome::Ignored;
            }
        };

        if gesture.track(y) < self.config.debounce {
            self.phase = Phase::Dragging(gesture);
            return EventOutcome::Absorbed;
        }

        let direction = match gesture.direction {
            Some(direction) => direction,
            None => {
                let Some(direction) = Direction::from_delta(gesture.net) else {
                    self.phase = Phase::Dragging(gesture);
                    return EventOutcome::Absorbed;
                };
                let Some(candidate) = direction.neighbour(self.current, self.panels.len()) else {
                    return self.abort_at_boundary(direction);
                };
                self.lock(&mut gesture, direction, candidate);
                direction
            }
        };

        if !direction.accepts(gesture.net) {
            trace!("move against locked direction {direction:?} ignored");
            // Back past the start: a release from here reverts.
            if gesture.threshold_exceeded {
                debug!("snap threshold recrossed by reversing past the start");
                gesture.threshold_exceeded = false;
            }
            self.phase = Phase::Dragging(gesture);
            return EventOutcome::DirectionLocked;
        }

        let degrees = rotation_degrees(gesture.net, self.height, self.config.total_deg);
        let past = degrees >= self.config.snap_threshold;
        if past != gesture.threshold_exceeded {
            debug!("snap threshold {} at {degrees:.2}°", if past { "crossed" } else { "recrossed" });
            gesture.threshold_exceeded = past;
        }

        self.rotate(&mut gesture, degrees, false);
        trace!("rotated to {degrees:.2}°");
        self.phase = Phase::Dragging(gesture);
        EventOutcome::Rotated { degrees }
    }

    /// Locks the gesture's direction and sets up the flip towards `candidate`.
    fn lock(&mut self, gesture: &mut Gesture, direction: Direction, candidate: usize) {
        debug!(
            "direction locked {direction:?}: panel {} -> {candidate}",
            self.current
        );
        gesture.direction = Some(direction);
        gesture.candidate = Some(candidate);
        self.panels[candidate].markers.next = true;

        let clone = TransitionClone::materialize(&self.panels, self.current, candidate, direction);
        self.renderer.set_transition_duration(Surface::Clone, clone.transition);
        self.renderer.mount_clone(&clone);
        gesture.clone = Some(clone);

        let shadows = ShadowPair {
            current: self.current,
            candidate,
        };
        for panel in [shadows.current, shadows.candidate] {
            self.set_shadow_transition(panel, std::time::Duration::ZERO);
        }
        gesture.shadows = Some(shadows);
    }

    fn rotate(&mut self, gesture: &mut Gesture, deg: f64, terminal: bool) {
        if !terminal {
            if let Some(direction) = gesture.direction {
                if !direction.accepts(gesture.net) {
                    return;
                }
            }
        }

        self.deg = deg;
        let over = deg > self.config.snap_threshold;
        if over != self.over {
            self.over = over;
            self.renderer.set_over(over);
        }

        if !terminal {
            if let Some(shadows) = gesture.shadows {
                let threshold = self.config.snap_threshold;
                if over {
                    self.set_shadow_opacity(shadows.candidate, falling_shadow(deg, threshold));
                } else {
                    self.set_shadow_opacity(shadows.current, rising_shadow(deg, threshold));
                }
            }
        }

        if let (Some(clone), Some(direction)) = (gesture.clone.as_mut(), gesture.direction) {
            clone.angle = direction.signed(deg);
            self.renderer.apply_rotation(clone.angle);
        }
    }

    fn end(&mut self) -> EventOutcome {
        let mut gesture = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(gesture) => gesture,
            other => {
                self.phase = other;
                return EventOutcome::Ignored;
            }
        };

        let (Some(shadows), Some(candidate)) = (gesture.shadows, gesture.candidate) else {
            debug!("released before the flip began");
            self.rotate(&mut gesture, self.config.min_deg, true);
            return EventOutcome::Released(Settle::Immediate);
        };

        let settle = self.config.settle_duration();
        if let Some(clone) = gesture.clone.as_mut() {
            clone.transition = settle;
            self.renderer.set_transition_duration(Surface::Clone, settle);
        }
        for panel in [shadows.current, shadows.candidate] {
            self.set_shadow_transition(panel, settle);
            self.set_shadow_opacity(panel, 0.0);
        }

        let outcome = if gesture.threshold_exceeded {
            info!("committing flip to panel {candidate}");
            self.current = candidate;
            self.rotate(&mut gesture, self.config.total_deg, true);
            Settle::Committing
        } else {
            debug!("reverting flip to panel {}", self.current);
            self.rotate(&mut gesture, self.config.min_deg, true);
            Settle::Reverting
        };
        self.phase = Phase::Settling(gesture);
        EventOutcome::Released(outcome)
    }

    fn after_transition_end(&mut self) -> EventOutcome {
        let gesture = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Settling(gesture) => gesture,
            other => {
                self.phase = other;
                return EventOutcome::Ignored;
            }
        };
        let advanced = gesture.threshold_exceeded;
        self.cleanup(advanced);
        debug!("flip settled on panel {}", self.current);
        EventOutcome::Settled { advanced }
    }

    /// Ends a gesture that points past the first or last panel.
    ///
    /// No clone exists yet, so cleanup runs synchronously instead of waiting
    /// for a transition.
    fn abort_at_boundary(&mut self, direction: Direction) -> EventOutcome {
        debug!(
            "no panel {direction:?} of {}; gesture aborted",
            self.current
        );
        self.phase = Phase::Idle;
        self.cleanup(false);
        EventOutcome::Aborted
    }

    fn cleanup(&mut self, advanced: bool) {
        self.renderer.remove_clone();
        if self.over {
            self.over = false;
            self.renderer.set_over(false);
        }
        for panel in &mut self.panels {
            panel.markers.next = false;
        }
        if advanced {
            for panel in &mut self.panels {
                panel.markers.current = false;
            }
            self.panels[self.current].markers.current = true;
        }
    }

    fn resize(&mut self, height: f64) -> EventOutcome {
        if !(height.is_finite() && height > 0.0) {
            return EventOutcome::Ignored;
        }
        debug!("container height {} -> {height}", self.height);
        self.height = height;
        EventOutcome::Resized
    }

    fn set_shadow_transition(&mut self, panel: usize, duration: std::time::Duration) {
        self.panels[panel].shadow.transition = duration;
        self.renderer.set_transition_duration(Surface::Shadow(panel), duration);
    }

    fn set_shadow_opacity(&mut self, panel: usize, opacity: f64) {
        self.panels[panel].shadow.opacity = opacity;
        self.renderer.set_shadow_opacity(panel, opacity);
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Index of the current panel; already the candidate while a commit settles.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> GesturePhase {
        match &self.phase {
            Phase::Idle => GesturePhase::Idle,
            Phase::Dragging(_) => GesturePhase::Dragging,
            Phase::Settling(g) if g.threshold_exceeded => GesturePhase::Committing,
            Phase::Settling(_) => GesturePhase::Reverting,
        }
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Dragging(g) | Phase::Settling(g) => Some(g),
        }
    }

    pub fn transition_clone(&self) -> Option<&TransitionClone> {
        self.gesture().and_then(|g| g.clone.as_ref())
    }

    pub fn angle(&self) -> f64 {
        self.deg
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

/// Widgets keyed by container id; attaching twice is a no-op.
pub struct Board<R> {
    widgets: HashMap<String, FlipWidget<R>>,
}

impl<R> Default for Board<R> {
    fn default() -> Self {
        Board {
            widgets: HashMap::new(),
        }
    }
}

impl<R: FlipRenderer> Board<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a widget to `container` unless one is already attached.
    ///
    /// `make_renderer` is only called for a fresh attachment.
    pub fn attach(
        &mut self,
        container: &Element,
        height: f64,
        options: &AttachOptions,
        config: FlipConfig,
        capabilities: Capabilities,
        make_renderer: impl FnOnce() -> R,
    ) -> Result<&mut FlipWidget<R>, FlipError> {
        let id = container.id.clone().ok_or(FlipError::AnonymousContainer)?;
        match self.widgets.entry(id) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                debug!("container '{}' already has a flip widget", entry.key());
                Ok(entry.into_mut())
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                let widget =
                    FlipWidget::attach(container, height, options, config, capabilities, make_renderer())?;
                Ok(entry.insert(widget))
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&FlipWidget<R>> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FlipWidget<R>> {
        self.widgets.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::markup::parse_deck;
    use crate::renderer::{RecordingRenderer, RenderCommand};

    fn widget(panels: usize) -> FlipWidget<RecordingRenderer> {
        let deck = (0..panels)
            .map(|i| format!("Panel {i}"))
            .collect::<Vec<_>>()
            .join("\n---\n");
        FlipWidget::attach(
            &parse_deck("board", &deck),
            200.0,
            &AttachOptions::default(),
            FlipConfig::default(),
            Capabilities::detect(),
            RecordingRenderer::new(),
        )
        .unwrap()
    }

    fn start(w: &mut FlipWidget<RecordingRenderer>, y: f64) -> EventOutcome {
        w.handle_event(FlipEvent::PointerStart(PointerInput::mouse(y)))
    }

    fn drag(w: &mut FlipWidget<RecordingRenderer>, y: f64) -> EventOutcome {
        w.handle_event(FlipEvent::PointerMove(PointerInput::mouse(y)))
    }

    fn current_markers(w: &FlipWidget<RecordingRenderer>) -> Vec<usize> {
        w.panels()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.markers.current)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn attach_stacks_first_panel_on_top() {
        let w = widget(3);
        let z: Vec<u32> = w.panels().iter().map(|p| p.z_index).collect();
        assert_eq!(z, vec![3, 2, 1]);
        assert_eq!(current_markers(&w), vec![0]);
        assert!(w.panels().iter().all(|p| p.shadow.opacity == 0.0));
        assert_eq!(w.phase(), GesturePhase::Idle);
    }

    #[test]
    fn attach_requires_panels_and_height() {
        let empty = Element::new("div").with_id("board");
        let err = FlipWidget::attach(
            &empty,
            200.0,
            &AttachOptions::default(),
            FlipConfig::default(),
            Capabilities::detect(),
            RecordingRenderer::new(),
        )
        .err();
        assert!(matches!(err, Some(FlipError::NoPanels { .. })));

        let err = FlipWidget::attach(
            &parse_deck("board", "A"),
            0.0,
            &AttachOptions::default(),
            FlipConfig::default(),
            Capabilities::detect(),
            RecordingRenderer::new(),
        )
        .err();
        assert!(matches!(err, Some(FlipError::InvalidHeight { .. })));
    }

    #[test]
    fn attach_requires_inner_content() {
        let container = Element::new("div")
            .with_id("board")
            .with_child(Element::new("section").with_text(["bare"]));
        let err = FlipWidget::attach(
            &container,
            100.0,
            &AttachOptions::default(),
            FlipConfig::default(),
            Capabilities::detect(),
            RecordingRenderer::new(),
        )
        .err();
        assert!(matches!(err, Some(FlipError::MissingInner { index: 0, .. })));
    }

    #[test]
    fn start_is_not_reentrant() {
        let mut w = widget(3);
        assert_eq!(start(&mut w, 100.0), EventOutcome::Started);
        assert_eq!(start(&mut w, 50.0), EventOutcome::Ignored);
        assert_eq!(w.gesture().unwrap().start_y, 100.0);
    }

    #[test]
    fn moves_and_releases_need_a_drag() {
        let mut w = widget(3);
        assert_eq!(drag(&mut w, 10.0), EventOutcome::Ignored);
        assert_eq!(w.handle_event(FlipEvent::PointerEnd), EventOutcome::Ignored);
        assert_eq!(w.handle_event(FlipEvent::TransitionEnd), EventOutcome::Ignored);
    }

    #[test]
    fn jitter_below_debounce_is_inert() {
        let mut w = widget(3);
        start(&mut w, 100.0);
        for y in [97.0, 100.0, 98.0] {
            assert_eq!(drag(&mut w, y), EventOutcome::Absorbed);
        }
        assert!(w.transition_clone().is_none());
        assert_eq!(
            w.handle_event(FlipEvent::PointerEnd),
            EventOutcome::Released(Settle::Immediate)
        );
        assert_eq!(w.phase(), GesturePhase::Idle);
        assert_eq!(w.current_index(), 0);
        assert!(!w
            .renderer()
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::MountClone { .. })));
    }

    #[test]
    fn first_crossing_builds_clone_and_instant_shadows() {
        let mut w = widget(3);
        start(&mut w, 150.0);
        assert!(matches!(drag(&mut w, 130.0), EventOutcome::Rotated { .. }));

        let clone = w.transition_clone().unwrap();
        assert_eq!((clone.front_panel, clone.back_panel), (0, 1));
        assert_eq!(clone.front, vec!["Panel 0"]);
        assert_eq!(clone.back, vec!["Panel 1"]);
        assert!(w.panels()[1].markers.next);

        let commands = w.renderer().commands.clone();
        assert!(commands.contains(&RenderCommand::Transition(Surface::Clone, Duration::ZERO)));
        assert!(commands.contains(&RenderCommand::Transition(Surface::Shadow(0), Duration::ZERO)));
        assert!(commands.contains(&RenderCommand::Transition(Surface::Shadow(1), Duration::ZERO)));
        assert!(commands.contains(&RenderCommand::MountClone { front: 0, back: 1 }));
    }

    #[test]
    fn direction_stays_locked() {
        let mut w = widget(3);
        start(&mut w, 100.0);
        drag(&mut w, 80.0);
        assert_eq!(w.gesture().unwrap().direction, Some(Direction::Up));
        let angle = w.angle();

        let outcome = drag(&mut w, 140.0);
        assert_eq!(outcome, EventOutcome::DirectionLocked);
        assert!(outcome.prevents_default());
        assert_eq!(w.gesture().unwrap().direction, Some(Direction::Up));
        assert_eq!(w.angle(), angle);
    }

    #[test]
    fn reversing_past_start_reverts() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        assert_eq!(
            drag(&mut w, 50.0),
            EventOutcome::Rotated { degrees: 134.25 }
        );
        assert!(w.gesture().unwrap().threshold_exceeded);

        assert_eq!(drag(&mut w, 250.0), EventOutcome::DirectionLocked);
        assert!(!w.gesture().unwrap().threshold_exceeded);
        assert_eq!(w.angle(), 134.25);

        assert_eq!(
            w.handle_event(FlipEvent::PointerEnd),
            EventOutcome::Released(Settle::Reverting)
        );
        w.handle_event(FlipEvent::TransitionEnd);
        assert_eq!(w.current_index(), 0);
        assert!(w.panels()[0].markers.current);
        assert!(!w.panels()[1].markers.next);
    }

    #[test]
    fn angle_grows_with_distance() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        let mut last = 0.0;
        for y in (0..=200).rev().step_by(20).map(f64::from) {
            if let EventOutcome::Rotated { degrees } = drag(&mut w, y) {
                assert!(degrees >= last);
                assert!((degrees - (200.0 - y) / 200.0 * 179.0).abs() < 1e-9);
                last = degrees;
            }
        }
        assert!((last - 179.0).abs() < 1e-9);
    }

    #[test]
    fn downward_flip_uses_negative_angle() {
        let mut w = widget(3);
        // Move to the middle panel first.
        start(&mut w, 200.0);
        drag(&mut w, 0.0);
        w.handle_event(FlipEvent::PointerEnd);
        w.handle_event(FlipEvent::TransitionEnd);
        assert_eq!(w.current_index(), 1);

        start(&mut w, 0.0);
        drag(&mut w, 40.0);
        assert_eq!(w.gesture().unwrap().direction, Some(Direction::Down));
        assert!(w.renderer().last_rotation().unwrap() < 0.0);
        assert_eq!(w.transition_clone().unwrap().back_panel, 0);
    }

    #[test]
    fn shadows_follow_the_threshold() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        drag(&mut w, 150.0);
        let below = w.panels()[0].shadow.opacity;
        assert!(below > 0.0 && below < 1.0);
        assert!(!w.is_over());

        drag(&mut w, 50.0);
        assert!(w.is_over());
        let candidate = w.panels()[1].shadow.opacity;
        assert!(candidate > 0.0 && candidate < 1.0);
        assert!(w.gesture().unwrap().threshold_exceeded);

        drag(&mut w, 150.0);
        assert!(!w.gesture().unwrap().threshold_exceeded);
    }

    #[test]
    fn release_past_threshold_commits() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        drag(&mut w, 0.0);
        assert_eq!(
            w.handle_event(FlipEvent::PointerEnd),
            EventOutcome::Released(Settle::Committing)
        );
        assert_eq!(w.phase(), GesturePhase::Committing);
        assert_eq!(w.current_index(), 1);
        assert_eq!(current_markers(&w), vec![0]);
        assert_eq!(w.renderer().last_rotation(), Some(179.0));
        assert!(w.panels().iter().all(|p| p.shadow.opacity == 0.0));
        assert!(w
            .panels()
            .iter()
            .take(2)
            .all(|p| p.shadow.transition == Duration::from_millis(300)));
        assert_eq!(w.transition_clone().unwrap().transition, Duration::from_millis(300));

        assert_eq!(
            w.handle_event(FlipEvent::TransitionEnd),
            EventOutcome::Settled { advanced: true }
        );
        assert_eq!(current_markers(&w), vec![1]);
        assert!(w.panels().iter().all(|p| !p.markers.next));
        assert!(w.transition_clone().is_none());
        assert!(!w.is_over());
        assert_eq!(w.renderer().commands.last(), Some(&RenderCommand::Over(false)));
    }

    #[test]
    fn release_below_threshold_reverts() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        drag(&mut w, 150.0);
        assert_eq!(
            w.handle_event(FlipEvent::PointerCancel),
            EventOutcome::Released(Settle::Reverting)
        );
        assert_eq!(w.renderer().last_rotation(), Some(1.0));
        assert_eq!(
            w.handle_event(FlipEvent::TransitionEnd),
            EventOutcome::Settled { advanced: false }
        );
        assert_eq!(w.current_index(), 0);
        assert_eq!(current_markers(&w), vec![0]);
    }

    #[test]
    fn settling_blocks_new_gestures() {
        let mut w = widget(3);
        start(&mut w, 200.0);
        drag(&mut w, 150.0);
        w.handle_event(FlipEvent::PointerEnd);
        assert_eq!(start(&mut w, 100.0), EventOutcome::Ignored);
        w.handle_event(FlipEvent::TransitionEnd);
        assert_eq!(start(&mut w, 100.0), EventOutcome::Started);
    }

    #[test]
    fn boundary_drags_abort() {
        let mut w = widget(2);
        start(&mut w, 50.0);
        assert_eq!(drag(&mut w, 80.0), EventOutcome::Aborted);
        assert_eq!(w.phase(), GesturePhase::Idle);
        assert_eq!(w.current_index(), 0);
        assert!(w.panels().iter().all(|p| !p.markers.next));

        start(&mut w, 200.0);
        drag(&mut w, 0.0);
        w.handle_event(FlipEvent::PointerEnd);
        w.handle_event(FlipEvent::TransitionEnd);
        assert_eq!(w.current_index(), 1);

        start(&mut w, 100.0);
        assert_eq!(drag(&mut w, 60.0), EventOutcome::Aborted);
        assert_eq!(w.current_index(), 1);
        assert_eq!(current_markers(&w), vec![1]);
    }

    #[test]
    fn zero_net_delta_defers_direction() {
        let mut w = widget(3);
        start(&mut w, 100.0);
        drag(&mut w, 94.0);
        assert_eq!(drag(&mut w, 100.0), EventOutcome::Absorbed);
        assert!(w.gesture().unwrap().direction.is_none());
        assert!(matches!(drag(&mut w, 98.0), EventOutcome::Rotated { .. }));
    }

    #[test]
    fn resize_changes_scale() {
        let mut w = widget(3);
        assert_eq!(w.handle_event(FlipEvent::Resize { height: 400.0 }), EventOutcome::Resized);
        assert_eq!(w.handle_event(FlipEvent::Resize { height: -1.0 }), EventOutcome::Ignored);
        start(&mut w, 400.0);
        match drag(&mut w, 200.0) {
            EventOutcome::Rotated { degrees } => assert!((degrees - 89.5).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn touch_widget_ignores_mouse_input() {
        let mut w = FlipWidget::attach(
            &parse_deck("board", "A\n---\nB"),
            200.0,
            &AttachOptions::default(),
            FlipConfig::default(),
            Capabilities::touch(),
            RecordingRenderer::new(),
        )
        .unwrap();
        assert_eq!(start(&mut w, 10.0), EventOutcome::Ignored);
        assert_eq!(
            w.handle_event(FlipEvent::PointerStart(PointerInput::touch(10.0))),
            EventOutcome::Started
        );
    }

    #[test]
    fn board_attaches_once_per_container() {
        let deck = parse_deck("board", "A\n---\nB");
        let mut board = Board::new();
        let mut built = 0;
        for _ in 0..2 {
            board
                .attach(
                    &deck,
                    100.0,
                    &AttachOptions::default(),
                    FlipConfig::default(),
                    Capabilities::detect(),
                    || {
                        built += 1;
                        RecordingRenderer::new()
                    },
                )
                .unwrap();
        }
        assert_eq!(built, 1);
        assert_eq!(board.len(), 1);
        assert!(board.get("board").is_some());

        let anonymous = Element::new("div");
        assert!(matches!(
            board
                .attach(
                    &anonymous,
                    100.0,
                    &AttachOptions::default(),
                    FlipConfig::default(),
                    Capabilities::detect(),
                    RecordingRenderer::new,
                )
                .err(),
            Some(FlipError::AnonymousContainer)
        ));
    }
}
