//! A drag-driven page flip widget.
//!
//! [`FlipWidget`] keeps a stack of panels and turns vertical drags into a
//! 3D flip towards the next or previous panel. Visual effects go through a
//! [`FlipRenderer`]; the [`terminal`] module hosts the widget in a console.

pub mod animation;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod gesture;
pub mod graphics;
pub mod markup;
pub mod math;
pub mod panel;
pub mod renderer;
pub mod script;
pub mod terminal;
pub mod widget;

pub use capabilities::{Capabilities, PointerInput};
pub use config::{AttachOptions, FlipConfig, Settings};
pub use error::FlipError;
pub use gesture::{Direction, GesturePhase};
pub use markup::{parse_deck, Element, Selector};
pub use renderer::{FlipRenderer, RecordingRenderer, RenderCommand, Surface};
pub use widget::{Board, EventOutcome, FlipEvent, FlipWidget, Settle};
