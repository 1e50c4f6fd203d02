use thiserror::Error;

/// Precondition violations detected while attaching a widget to a container.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlipError {
    #[error("container '{container}' has no panels matching '{selector}'")]
    NoPanels { container: String, selector: String },
    #[error("panel {index} has no inner content matching '{selector}'")]
    MissingInner { index: usize, selector: String },
    #[error("container height must be positive, got {height}")]
    InvalidHeight { height: f64 },
    #[error("invalid selector '{selector}'")]
    InvalidSelector { selector: String },
    #[error("container has no id to register the widget under")]
    AnonymousContainer,
}
