//! Console host: crossterm mouse events in, character frames out.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, MouseButton, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, warn};

use crate::animation::Track;
use crate::capabilities::PointerInput;
use crate::config::TerminalConfig;
use crate::gesture::TransitionClone;
use crate::graphics::{compose, Frame, Rgb, Scene};
use crate::renderer::{FlipRenderer, Surface};
use crate::widget::{EventOutcome, FlipEvent, FlipWidget};

/// Renderer that animates the widget's requests in a terminal.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    rotation: Track,
    shadows: Vec<Track>,
    clone: Option<TransitionClone>,
    over: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        TerminalRenderer {
            rotation: Track::new(0.0),
            shadows: Vec::new(),
            clone: None,
            over: false,
        }
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn shadow_track(&mut self, panel: usize) -> &mut Track {
        if self.shadows.len() <= panel {
            self.shadows.resize(panel + 1, Track::new(0.0));
        }
        &mut self.shadows[panel]
    }

    /// Advances running transitions.
    ///
    /// Returns true on the tick the clone's rotation finishes animating,
    /// which is when the host delivers the transition-end event.
    pub fn tick(&mut self, now: Instant) -> bool {
        for shadow in &mut self.shadows {
            shadow.tick(now);
        }
        self.rotation.tick(now) && self.clone.is_some()
    }

    pub fn angle(&self) -> f64 {
        self.rotation.value()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn clone_ref(&self) -> Option<&TransitionClone> {
        self.clone.as_ref()
    }

    pub fn shadow_values(&self, panels: usize) -> Vec<f64> {
        (0..panels)
            .map(|i| self.shadows.get(i).map_or(0.0, Track::value))
            .collect()
    }
}

impl FlipRenderer for TerminalRenderer {
    fn apply_rotation(&mut self, degrees: f64) {
        self.rotation.set(degrees, Instant::now());
    }

    fn set_transition_duration(&mut self, surface: Surface, duration: Duration) {
        match surface {
            Surface::Clone => self.rotation.set_transition(duration),
            Surface::Shadow(panel) => self.shadow_track(panel).set_transition(duration),
        }
    }

    fn set_shadow_opacity(&mut self, panel: usize, opacity: f64) {
        self.shadow_track(panel).set(opacity, Instant::now());
    }

    fn set_over(&mut self, over: bool) {
        self.over = over;
    }

    fn mount_clone(&mut self, clone: &TransitionClone) {
        self.clone = Some(clone.clone());
    }

    fn remove_clone(&mut self) {
        self.clone = None;
        self.rotation = Track::new(0.0);
    }
}

/// Translates a crossterm event into a widget event.
pub fn translate(event: &Event, cell_height: f64) -> Option<FlipEvent> {
    match event {
        Event::Mouse(mouse) => {
            let y = f64::from(mouse.row) * cell_height;
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    Some(FlipEvent::PointerStart(PointerInput::mouse(y)))
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    Some(FlipEvent::PointerMove(PointerInput::mouse(y)))
                }
                MouseEventKind::Up(MouseButton::Left) => Some(FlipEvent::PointerEnd),
                _ => None,
            }
        }
        Event::FocusLost => Some(FlipEvent::PointerCancel),
        Event::Resize(_, rows) => Some(FlipEvent::Resize {
            height: container_rows(*rows) as f64 * cell_height,
        }),
        _ => None,
    }
}

/// Rows available to the widget; the last row holds the status line.
pub fn container_rows(rows: u16) -> usize {
    (rows as usize).saturating_sub(1).max(1)
}

/// Terminal size, preferring termsize and falling back to crossterm.
pub fn terminal_size() -> Result<(u16, u16)> {
    if let Some(size) = termsize::get() {
        return Ok((size.cols, size.rows));
    }
    terminal::size().context("failed to query terminal size")
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Restores the terminal however the event loop exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            Hide
        )?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            ResetColor,
            Show,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Interactive session around one widget.
pub struct App {
    widget: FlipWidget<TerminalRenderer>,
    config: TerminalConfig,
    debug: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl App {
    pub fn new(widget: FlipWidget<TerminalRenderer>, config: TerminalConfig) -> Self {
        App {
            widget,
            config,
            debug: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut stdout = io::stdout();

        loop {
            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                if let Event::Key(key) = &event {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                            KeyCode::Char('d') | KeyCode::Char('D') => self.debug = !self.debug,
                            _ => {}
                        }
                    }
                }
                if let Some(flip_event) = translate(&event, self.config.cell_height) {
                    let outcome = self.widget.handle_event(flip_event);
                    if outcome == EventOutcome::Aborted {
                        debug!("drag ran past the end of the deck");
                    }
                }
            }

            if self.widget.renderer_mut().tick(Instant::now()) {
                let outcome = self.widget.handle_event(FlipEvent::TransitionEnd);
                if outcome == EventOutcome::Ignored {
                    warn!("transition finished with no flip settling");
                }
            }

            let (cols, rows) = terminal_size()?;
            let frame = self.render(cols as usize, rows);
            draw(&mut stdout, &frame)?;
        }
        Ok(())
    }

    /// Composes the widget, status line and debug overlay.
    fn render(&mut self, width: usize, rows: u16) -> Frame {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_calculation);
        if elapsed.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / elapsed.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let panels = self.widget.panels();
        let renderer = self.widget.renderer();
        let shadows = renderer.shadow_values(panels.len());
        let current = panels
            .iter()
            .position(|p| p.markers.current)
            .unwrap_or(self.widget.current_index());
        let scene = Scene {
            panels,
            current,
            clone: renderer.clone_ref(),
            angle: renderer.angle(),
            shadows: &shadows,
            perspective: self.config.perspective,
        };

        let height = container_rows(rows);
        let mut frame = compose(&scene, width, height);
        frame.push_row();
        let status = format!(
            " {}/{}  {}  drag to flip  [d]ebug  [q]uit",
            current + 1,
            panels.len(),
            panels[current].title()
        );
        for col in 0..width {
            frame.put_str(height, col, " ", Rgb::BLACK, Rgb(200, 200, 200));
        }
        frame.put_str(height, 0, &status, Rgb::BLACK, Rgb(200, 200, 200));

        if self.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Angle: {:.2} (displayed {:.2})", self.widget.angle(), renderer.angle()),
                format!("Phase: {:?}  Over: {}", self.widget.phase(), renderer.is_over()),
                format!("Height: {:.0}", self.widget.height()),
                format!("FPS: {:.2}", self.fps),
            ];
            for (i, line) in lines.iter().enumerate() {
                frame.put_str(i, width.saturating_sub(line.len() + 1), line, Rgb::WHITE, Rgb::BLACK);
            }
        }
        frame
    }
}

/// Writes a frame, batching runs of cells that share colours.
fn draw(out: &mut impl Write, frame: &Frame) -> Result<()> {
    for row in 0..frame.height {
        queue!(out, MoveTo(0, row as u16))?;
        let mut run = String::new();
        let mut colors: Option<(Rgb, Rgb)> = None;
        for cell in frame.row(row) {
            if colors != Some((cell.fg, cell.bg)) {
                if let Some((fg, bg)) = colors {
                    queue!(out, SetForegroundColor(to_color(fg)), SetBackgroundColor(to_color(bg)), Print(&run))?;
                    run.clear();
                }
                colors = Some((cell.fg, cell.bg));
            }
            run.push(cell.ch);
        }
        if let Some((fg, bg)) = colors {
            queue!(out, SetForegroundColor(to_color(fg)), SetBackgroundColor(to_color(bg)), Print(&run))?;
        }
    }
    queue!(out, ResetColor)?;
    out.flush()?;
    Ok(())
}
