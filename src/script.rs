//! Scripted gestures for replaying a flip without a pointer device.
//!
//! One event per line: `<event-name> [value]`. Names are the event names
//! bound for the host's capabilities (`mousedown 120`, `touchmove 80`,
//! `resize 400`, `transitionend`). Lines starting with `#` and blank lines
//! are skipped. Names bound only on other hosts are dropped, since the host
//! would never deliver them.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::capabilities::{Capabilities, EventBindings};
use crate::widget::FlipEvent;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read gesture script {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown event '{name}'")]
    UnknownEvent { line: usize, name: String },
    #[error("line {line}: '{name}' needs a numeric value")]
    MissingValue { line: usize, name: String },
    #[error("line {line}: invalid value '{value}'")]
    InvalidValue { line: usize, value: String },
}

/// One event of a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub name: String,
    pub event: FlipEvent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
    /// Events bound only on other hosts.
    pub skipped: usize,
}

fn is_known(name: &str) -> bool {
    [
        Capabilities::default(),
        Capabilities::touch(),
    ]
    .iter()
    .any(|caps| EventBindings::for_capabilities(*caps).kind_of(name).is_some())
}

impl Script {
    pub fn parse(source: &str, caps: Capabilities) -> Result<Self, ScriptError> {
        let bindings = caps.bindings();
        let mut script = Script::default();

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let mut parts = text.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let value = parts
                .next()
                .map(|v| {
                    v.parse::<f64>().map_err(|_| ScriptError::InvalidValue {
                        line,
                        value: v.to_string(),
                    })
                })
                .transpose()?;

            let Some(kind) = bindings.kind_of(name) else {
                if is_known(name) {
                    debug!("line {line}: '{name}' is not bound on this host, skipped");
                    script.skipped += 1;
                    continue;
                }
                return Err(ScriptError::UnknownEvent {
                    line,
                    name: name.to_string(),
                });
            };
            let event = FlipEvent::from_kind(kind, caps, value).ok_or_else(|| {
                ScriptError::MissingValue {
                    line,
                    name: name.to_string(),
                }
            })?;
            script.steps.push(ScriptStep {
                line,
                name: name.to_string(),
                event,
            });
        }
        Ok(script)
    }

    pub fn load(path: &Path, caps: Capabilities) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::PointerInput;

    #[test]
    fn parses_mouse_script() {
        let script = Script::parse(
            "# flip forward\nmousedown 200\nmousemove 0\n\nmouseup\ntransitionend\nresize 300\n",
            Capabilities::detect(),
        )
        .unwrap();
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[0].line, 2);
        assert_eq!(
            script.steps[1].event,
            FlipEvent::PointerMove(PointerInput::mouse(0.0))
        );
        assert_eq!(script.steps[2].event, FlipEvent::PointerEnd);
        assert_eq!(script.steps[4].event, FlipEvent::Resize { height: 300.0 });
    }

    #[test]
    fn foreign_events_are_skipped() {
        let script = Script::parse("touchstart 10\nmousedown 10\n", Capabilities::detect()).unwrap();
        assert_eq!(script.skipped, 1);
        assert_eq!(script.steps.len(), 1);

        let touch = Script::parse("touchstart 10\ntouchcancel\n", Capabilities::touch()).unwrap();
        assert_eq!(touch.steps[0].event, FlipEvent::PointerStart(PointerInput::touch(10.0)));
        assert_eq!(touch.steps[1].event, FlipEvent::PointerCancel);
    }

    #[test]
    fn reports_bad_lines() {
        let caps = Capabilities::detect();
        assert!(matches!(
            Script::parse("click 3", caps),
            Err(ScriptError::UnknownEvent { line: 1, .. })
        ));
        assert!(matches!(
            Script::parse("mouseup\nmousedown", caps),
            Err(ScriptError::MissingValue { line: 2, .. })
        ));
        assert!(matches!(
            Script::parse("mousedown ten", caps),
            Err(ScriptError::InvalidValue { line: 1, .. })
        ));
    }
}
