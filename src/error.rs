// src/error.rs

//! Typed failures raised while binding to the native windowing system.
//!
//! These travel inside `anyhow::Error` like every other error in the crate;
//! callers that need to react to a specific failure use `downcast_ref`.

use std::error::Error;
use std::fmt;

/// The native display server could not be reached.
///
/// Raised by `DisplayConnection::open` when the open-connection call yields no
/// handle. There is no retry at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnavailable {
    /// The display name that was requested, or `None` for the platform default
    /// (`$DISPLAY` on X11).
    pub name: Option<String>,
}

impl fmt::Display for DisplayUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "failed to open display '{}'", name),
            None => write!(
                f,
                "failed to open default display. Check DISPLAY environment variable or X server status"
            ),
        }
    }
}

impl Error for DisplayUnavailable {}

/// The display server refused to create a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCreationFailed {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for WindowCreationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "native window creation failed for a {}x{} window",
            self.width, self.height
        )
    }
}

impl Error for WindowCreationFailed {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unavailable_names_the_display() {
        let err = DisplayUnavailable {
            name: Some(":7".to_string()),
        };
        assert_eq!(err.to_string(), "failed to open display ':7'");

        let err = DisplayUnavailable { name: None };
        assert!(err.to_string().contains("DISPLAY"));
    }

    #[test]
    fn typed_errors_survive_anyhow_wrapping() {
        let err = anyhow::Error::new(WindowCreationFailed {
            width: 10,
            height: 20,
        })
        .context("while opening main window");
        let inner = err
            .downcast_ref::<WindowCreationFailed>()
            .expect("typed error should be reachable through context");
        assert_eq!((inner.width, inner.height), (10, 20));
    }
}
