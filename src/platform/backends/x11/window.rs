// src/platform/backends/x11/window.rs

use super::connection::DisplayConnection;
use super::Xlib;
use crate::error::WindowCreationFailed;
use crate::platform::backends::{clamp_size, Window, WindowAttributes, WindowingApi};
use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::ffi::CString;
use std::fmt;
use std::rc::Rc;

/// An Xorg top-level window.
///
/// Holds a strong reference to the `DisplayConnection` it was created on, so
/// the connection cannot be closed while the window exists. Dropping the
/// window destroys the native window first and only then releases that
/// reference.
pub struct XorgWindow<A: WindowingApi = Xlib> {
    id: A::WindowId,
    title: String,
    width: u32,
    height: u32,
    visible: bool,
    connection: Rc<DisplayConnection<A>>,
}

impl<A: WindowingApi> XorgWindow<A> {
    /// Creates an unmapped window on `connection`.
    ///
    /// # Returns
    ///
    /// * `Ok(XorgWindow)` holding one more strong reference to `connection`.
    /// * `Err` if the title contains a NUL byte, or wrapping
    ///   `WindowCreationFailed` if the server returned no window id. In both
    ///   cases the reference to `connection` is released again.
    pub fn new(connection: Rc<DisplayConnection<A>>, attrs: &WindowAttributes) -> Result<Self> {
        let (width, height) = attrs.clamped_size();
        info!(
            "Creating X11 window '{}': {}x{}px at ({}, {})",
            attrs.title, width, height, attrs.x, attrs.y
        );
        let title_cstr =
            CString::new(attrs.title.as_str()).context("Failed to create CString for title")?;

        let id = connection
            .api()
            .create_window(connection.handle(), connection.default_screen(), attrs)
            .ok_or(WindowCreationFailed { width, height })?;
        debug!("X window created (ID: {:?}), initial size: {}x{}", id, width, height);

        connection.api().store_name(connection.handle(), id, &title_cstr);

        Ok(Self {
            id,
            title: attrs.title.clone(),
            width,
            height,
            visible: false,
            connection,
        })
    }

    /// The connection this window was created on.
    pub fn connection(&self) -> &Rc<DisplayConnection<A>> {
        &self.connection
    }

    /// Native window id in the backend's own type.
    pub fn native_id(&self) -> A::WindowId {
        self.id
    }
}

impl<A: WindowingApi> Window for XorgWindow<A> {
    fn id(&self) -> u64 {
        self.id.into()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        trace!("Setting window title to '{}' for window ID: {:?}", title, self.id);
        let title_cstr = CString::new(title).context("Failed to create CString for title")?;
        self.connection
            .api()
            .store_name(self.connection.handle(), self.id, &title_cstr);
        self.title = title.to_string();
        Ok(())
    }

    fn show(&mut self) {
        if self.visible {
            trace!("Window {:?} already mapped.", self.id);
            return;
        }
        info!("Mapping window ID: {:?} and flushing display.", self.id);
        let api = self.connection.api();
        api.map_window(self.connection.handle(), self.id);
        api.flush(self.connection.handle());
        self.visible = true;
    }

    fn hide(&mut self) {
        if !self.visible {
            trace!("Window {:?} already unmapped.", self.id);
            return;
        }
        info!("Unmapping window ID: {:?} and flushing display.", self.id);
        let api = self.connection.api();
        api.unmap_window(self.connection.handle(), self.id);
        api.flush(self.connection.handle());
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(
            "Resizing window ID: {:?} from {}x{} to {}x{}",
            self.id, self.width, self.height, width, height
        );
        self.connection
            .api()
            .resize_window(self.connection.handle(), self.id, width, height);
        self.width = width;
        self.height = height;
    }
}

impl<A: WindowingApi> fmt::Debug for XorgWindow<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XorgWindow")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &(self.width, self.height))
            .field("visible", &self.visible)
            .field("connection", &self.connection.handle())
            .finish()
    }
}

impl<A: WindowingApi> Drop for XorgWindow<A> {
    fn drop(&mut self) {
        info!("Destroying X11 window ID: {:?}", self.id);
        let handle = self.connection.handle();
        self.connection.api().destroy_window(handle, self.id);
        self.connection.api().flush(handle);
        if Rc::strong_count(&self.connection) == 1 {
            debug!("Window {:?} held the last reference to its display connection.", self.id);
        }
    }
}
