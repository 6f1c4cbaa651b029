// src/platform/backends/mod.rs

//! The native windowing boundary and the platform-neutral window capability.
//!
//! Two traits live here:
//! - `WindowingApi`: the raw calls a backend makes into a native windowing
//!   library (open/close a display connection, create/destroy/map windows).
//!   `x11::Xlib` is the production implementation; tests substitute a
//!   recording double.
//! - `Window`: what the application layer can do with a window, independent
//!   of the platform that backs it. `x11::window::XorgWindow` is the Xorg
//!   variant.

use libc::c_int;
use std::ffi::CStr;
use std::fmt;
use std::os::unix::io::RawFd;

#[cfg(test)]
pub mod mock;
pub mod x11;

/// Smallest width or height a native window may have. X rejects zero-sized
/// windows with `BadValue`.
pub const MIN_WINDOW_DIMENSION: u32 = 1;

/// Geometry and title requested for a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowAttributes {
    /// Returns `(width, height)` with each dimension raised to at least
    /// `MIN_WINDOW_DIMENSION`.
    pub fn clamped_size(&self) -> (u32, u32) {
        clamp_size(self.width, self.height)
    }
}

impl Default for WindowAttributes {
    fn default() -> Self {
        WindowAttributes {
            title: "ruisapp".to_string(),
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        }
    }
}

pub(crate) fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    (
        width.max(MIN_WINDOW_DIMENSION),
        height.max(MIN_WINDOW_DIMENSION),
    )
}

/// Raw calls into a native windowing library.
///
/// Implementations are thin: no ownership tracking, no logging beyond
/// tracing, no validation. Lifetime rules are enforced one level up by
/// `DisplayConnection` and the window wrappers.
pub trait WindowingApi {
    /// Native display connection handle.
    type Display: Copy + fmt::Debug;
    /// Native window identifier.
    type WindowId: Copy + fmt::Debug + PartialEq + Into<u64>;

    /// Opens a connection. `None` selects the platform default.
    /// Returns `None` when no connection could be established.
    fn open_display(&self, name: Option<&CStr>) -> Option<Self::Display>;

    /// Closes a connection previously returned by `open_display`.
    fn close_display(&self, display: Self::Display);

    fn default_screen(&self, display: Self::Display) -> c_int;

    /// File descriptor of the underlying connection, for external poll loops.
    fn connection_fd(&self, display: Self::Display) -> RawFd;

    /// Creates an unmapped top-level window on `screen`.
    /// Returns `None` if the server hands back no window id.
    fn create_window(
        &self,
        display: Self::Display,
        screen: c_int,
        attrs: &WindowAttributes,
    ) -> Option<Self::WindowId>;

    fn destroy_window(&self, display: Self::Display, window: Self::WindowId);

    fn map_window(&self, display: Self::Display, window: Self::WindowId);

    fn unmap_window(&self, display: Self::Display, window: Self::WindowId);

    fn resize_window(&self, display: Self::Display, window: Self::WindowId, width: u32, height: u32);

    fn store_name(&self, display: Self::Display, window: Self::WindowId, title: &CStr);

    /// Pushes buffered requests to the server.
    fn flush(&self, display: Self::Display);
}

/// Platform-neutral window capability set.
///
/// The application layer holds windows as `Box<dyn Window>` and never names
/// the concrete platform type.
pub trait Window {
    /// Native window id, widened to `u64`.
    fn id(&self) -> u64;

    fn title(&self) -> &str;

    /// Fails if `title` contains an interior NUL byte.
    fn set_title(&mut self, title: &str) -> anyhow::Result<()>;

    /// Maps the window and flushes the connection.
    fn show(&mut self);

    /// Unmaps the window and flushes the connection.
    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    /// Current size in pixels as last requested by this process.
    fn size(&self) -> (u32, u32);

    /// Requests a new size. Zero dimensions are clamped to `MIN_WINDOW_DIMENSION`.
    fn resize(&mut self, width: u32, height: u32);
}
