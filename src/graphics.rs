use crate::gesture::{Hinge, TransitionClone};
use crate::math::project_card_point;
use crate::panel::Panel;

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Panel background colours, cycled by panel index
const PANEL_COLORS: [Rgb; 6] = [
    Rgb(160, 30, 30),  // Red
    Rgb(30, 120, 30),  // Green
    Rgb(30, 50, 160),  // Blue
    Rgb(150, 130, 20), // Yellow
    Rgb(130, 30, 130), // Magenta
    Rgb(20, 120, 130), // Cyan
];

const TEXT_COLOR: Rgb = Rgb(235, 235, 235);

/// Rows above and columns left of the panel text.
const PAD_TOP: usize = 1;
const PAD_LEFT: usize = 2;

/// Card samples per row, to avoid gaps when the card is foreshortened
const SAMPLES_PER_ROW: usize = 4;

pub fn panel_color(index: usize) -> Rgb {
    PANEL_COLORS[index % PANEL_COLORS.len()]
}

/// Darkens a colour by a shadow of the given opacity
pub fn apply_shadow(color: Rgb, opacity: f64) -> Rgb {
    let keep = 1.0 - 0.85 * opacity.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f64 * keep).round().min(255.0) as u8;
    Rgb(scale(color.0), scale(color.1), scale(color.2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
        }
    }
}

/// A grid of character cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Appends a blank row at the bottom.
    pub fn push_row(&mut self) {
        self.cells.resize(self.cells.len() + self.width, Cell::default());
        self.height += 1;
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = cell;
        }
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// Writes text starting at `(row, col)`, clipped to the frame.
    pub fn put_str(&mut self, row: usize, col: usize, text: &str, fg: Rgb, bg: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            self.set(row, col + i, Cell { ch, fg, bg });
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.row(row).iter().map(|c| c.ch).collect()
    }
}

/// Everything needed to draw one frame of the widget.
pub struct Scene<'a> {
    pub panels: &'a [Panel],
    /// Panel drawn when nothing is flipping.
    pub current: usize,
    pub clone: Option<&'a TransitionClone>,
    /// Displayed card angle in degrees; the sign is ignored.
    pub angle: f64,
    /// Displayed shadow opacity per panel.
    pub shadows: &'a [f64],
    /// Viewer distance in frame heights.
    pub perspective: f64,
}

impl Scene<'_> {
    fn shadow(&self, panel: usize) -> f64 {
        self.shadows.get(panel).copied().unwrap_or(0.0)
    }
}

/// Content cell of a panel at a position inside the container
fn content_cell(panel: usize, lines: &[String], row: usize, col: usize, shadow: f64) -> Cell {
    let ch = row
        .checked_sub(PAD_TOP)
        .zip(col.checked_sub(PAD_LEFT))
        .and_then(|(line, index)| lines.get(line).and_then(|l| l.chars().nth(index)))
        .unwrap_or(' ');
    Cell {
        ch,
        fg: apply_shadow(TEXT_COLOR, shadow),
        bg: apply_shadow(panel_color(panel), shadow),
    }
}

fn draw_rows(frame: &mut Frame, scene: &Scene, panel: usize, rows: std::ops::Range<usize>) {
    let lines = &scene.panels[panel].content;
    let shadow = scene.shadow(panel);
    for row in rows {
        for col in 0..frame.width {
            frame.set(row, col, content_cell(panel, lines, row, col, shadow));
        }
    }
}

/// Draws the widget into a frame of the given size
pub fn compose(scene: &Scene, width: usize, height: usize) -> Frame {
    let mut frame = Frame::new(width, height);
    if width == 0 || height == 0 || scene.panels.is_empty() {
        return frame;
    }

    let Some(clone) = scene.clone else {
        draw_rows(&mut frame, scene, scene.current, 0..height);
        return frame;
    };

    let center = height / 2;
    let (top_panel, bottom_panel) = match clone.hinge {
        Hinge::Bottom => (clone.front_panel, clone.back_panel),
        Hinge::Top => (clone.back_panel, clone.front_panel),
    };
    draw_rows(&mut frame, scene, top_panel, 0..center);
    draw_rows(&mut frame, scene, bottom_panel, center..height);
    draw_card(&mut frame, scene, clone, center);
    frame
}

/// Draws the flipping half around the centre line
fn draw_card(frame: &mut Frame, scene: &Scene, clone: &TransitionClone, center: usize) {
    let height = frame.height;
    let card_rows = match clone.hinge {
        Hinge::Bottom => height - center,
        Hinge::Top => center,
    };
    let viewer = scene.perspective.max(1.0) * height as f64;
    let cx = frame.width as f64 / 2.0;

    for k in 0..card_rows * SAMPLES_PER_ROW {
        let s = (k as f64 + 0.5) / SAMPLES_PER_ROW as f64;
        let step = s.floor() as usize;
        let p = project_card_point(s, scene.angle, viewer);
        let front = p.offset >= 0.0;

        let (screen, source) = match clone.hinge {
            Hinge::Bottom => (
                center as f64 + p.offset,
                if front {
                    Some(center + step)
                } else {
                    center.checked_sub(1 + step)
                },
            ),
            Hinge::Top => (
                center as f64 - p.offset,
                if front {
                    center.checked_sub(1 + step)
                } else {
                    Some(center + step)
                },
            ),
        };
        let (Some(source), true) = (source, screen >= 0.0) else {
            continue;
        };
        let row = screen.floor() as usize;
        if row >= height {
            continue;
        }

        let (panel, lines) = if front {
            (clone.front_panel, &clone.front)
        } else {
            (clone.back_panel, &clone.back)
        };
        let shadow = scene.shadow(panel);
        for col in 0..frame.width {
            let src_col = cx + (col as f64 + 0.5 - cx) / p.scale;
            if src_col < 0.0 || src_col >= frame.width as f64 {
                continue;
            }
            frame.set(row, col, content_cell(panel, lines, source, src_col as usize, shadow));
        }
    }
}
