use std::time::Duration;

/// Shadow overlay laid over a panel's content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shadow {
    /// Opacity in `[0, 1]`; 0 is fully transparent.
    pub opacity: f64,
    pub transition: Duration,
}

/// Marker classes a panel can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Markers {
    pub current: bool,
    pub next: bool,
}

/// One stacked section the user flips between.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Lines of the panel's inner content region.
    pub content: Vec<String>,
    /// Stacking order; higher is closer to the viewer.
    pub z_index: u32,
    pub markers: Markers,
    pub shadow: Shadow,
}

impl Panel {
    pub fn new(content: Vec<String>, z_index: u32) -> Self {
        Panel {
            content,
            z_index,
            markers: Markers::default(),
            shadow: Shadow::default(),
        }
    }

    /// The first non-blank line, used as the panel's title.
    pub fn title(&self) -> &str {
        self.content
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}

/// Stacking order for `count` panels: first panel on top, last at the back.
///
/// The first panel is the initially current one, so it must be the highest;
/// do not invert this to "last panel highest".
pub fn stacking_order(count: usize) -> impl Iterator<Item = u32> {
    (1..=count as u32).rev()
}
