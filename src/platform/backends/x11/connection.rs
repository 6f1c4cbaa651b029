// src/platform/backends/x11/connection.rs

use super::Xlib;
use crate::error::DisplayUnavailable;
use crate::platform::backends::WindowingApi;
use anyhow::{Context, Result};
use libc::c_int;
use log::{debug, info};
use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::os::unix::io::RawFd;
use std::rc::Rc;

/// Owns the raw handle and closes it on drop.
///
/// Kept separate from `DisplayConnection` so that the close runs even if a
/// later step of `DisplayConnection::open` bails out with `?`.
struct ManagedDisplay<A: WindowingApi> {
    api: A,
    handle: A::Display,
}

impl<A: WindowingApi> ManagedDisplay<A> {
    fn open(api: A, name: Option<&str>) -> Result<Self> {
        let c_name = name
            .map(CString::new)
            .transpose()
            .context("Display name contains an interior NUL byte")?;
        match api.open_display(c_name.as_deref()) {
            Some(handle) => {
                debug!("Display opened via ManagedDisplay: {:?}", handle);
                Ok(Self { api, handle })
            }
            None => Err(DisplayUnavailable {
                name: name.map(str::to_owned),
            }
            .into()),
        }
    }
}

impl<A: WindowingApi> Drop for ManagedDisplay<A> {
    fn drop(&mut self) {
        info!("Closing display connection via ManagedDisplay: {:?}", self.handle);
        self.api.close_display(self.handle);
    }
}

/// One open connection to the display server.
///
/// The connection is only ever handed out as `Rc<DisplayConnection>`: windows
/// keep a clone of that `Rc`, so the native connection is closed exactly once,
/// when the last owner (the application or a window) goes away. The type is
/// neither `Clone` nor `Copy`, and it is confined to the thread that opened it.
///
/// ```compile_fail
/// use ruisapp::platform::backends::x11::DisplayConnection;
///
/// fn duplicate(conn: &DisplayConnection) -> DisplayConnection {
///     conn.clone()
/// }
/// ```
///
/// ```compile_fail
/// use ruisapp::platform::backends::x11::DisplayConnection;
///
/// fn assert_send<T: Send>() {}
/// assert_send::<DisplayConnection>();
/// ```
pub struct DisplayConnection<A: WindowingApi = Xlib> {
    managed_display: ManagedDisplay<A>,
    name: Option<String>,
    screen: c_int,
    _single_thread: PhantomData<*mut ()>,
}

impl DisplayConnection<Xlib> {
    /// Opens the display named by `$DISPLAY`.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// # use ruisapp::platform::backends::x11::DisplayConnection;
    /// # fn main() -> Result<()> {
    /// let connection = DisplayConnection::open_default()?;
    /// println!("connected on fd {}", connection.connection_fd());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open_default() -> Result<Rc<Self>> {
        Self::open(Xlib, None)
    }
}

impl<A: WindowingApi> DisplayConnection<A> {
    /// Acquires a display connection through `api`.
    ///
    /// # Returns
    ///
    /// * `Ok(Rc<DisplayConnection>)` holding a live handle.
    /// * `Err` wrapping `DisplayUnavailable` if the server could not be
    ///   reached. No retry is attempted.
    pub fn open(api: A, name: Option<&str>) -> Result<Rc<Self>> {
        info!(
            "Establishing display connection ({}).",
            name.unwrap_or("default")
        );
        let managed_display = ManagedDisplay::open(api, name)?;
        let screen = managed_display.api.default_screen(managed_display.handle);
        debug!("Default screen number: {}", screen);

        info!("Display connection established successfully.");
        Ok(Rc::new(DisplayConnection {
            managed_display,
            name: name.map(str::to_owned),
            screen,
            _single_thread: PhantomData,
        }))
    }

    /// Returns the raw native handle.
    ///
    /// The handle is valid for as long as `self` is alive. Do not close it.
    #[inline]
    pub fn handle(&self) -> A::Display {
        self.managed_display.handle
    }

    #[inline]
    pub fn api(&self) -> &A {
        &self.managed_display.api
    }

    /// The display name passed to `open`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn default_screen(&self) -> c_int {
        self.screen
    }

    /// File descriptor of the connection, readable when events are pending.
    pub fn connection_fd(&self) -> RawFd {
        self.api().connection_fd(self.handle())
    }

    pub fn flush(&self) {
        self.api().flush(self.handle());
    }
}

impl<A: WindowingApi> fmt::Debug for DisplayConnection<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayConnection")
            .field("handle", &self.managed_display.handle)
            .field("name", &self.name)
            .field("screen", &self.screen)
            .finish()
    }
}

impl<A: WindowingApi> Drop for DisplayConnection<A> {
    fn drop(&mut self) {
        info!("Dropping DisplayConnection. ManagedDisplay's drop will close the handle.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::backends::mock::MockApi;
    use test_log::test;

    #[test]
    fn open_failure_reports_display_unavailable() {
        let api = MockApi::unavailable();
        let err = DisplayConnection::open(api.clone(), Some(":9")).unwrap_err();

        let unavailable = err
            .downcast_ref::<DisplayUnavailable>()
            .expect("error should be DisplayUnavailable");
        assert_eq!(unavailable.name.as_deref(), Some(":9"));

        let log = api.log();
        assert_eq!(log.opened, 1);
        assert_eq!(log.closed, 0, "no handle was obtained, nothing to close");
        assert!(log.open_handles.is_empty());
    }

    #[test]
    fn drop_closes_handle_exactly_once() {
        let api = MockApi::new();
        let connection = DisplayConnection::open(api.clone(), None).unwrap();
        let handle = connection.handle();
        assert_eq!(api.log().closed, 0);

        drop(connection);

        let log = api.log();
        assert_eq!(log.opened, 1);
        assert_eq!(log.closed, 1);
        assert_eq!(log.closed_handles, vec![handle]);
    }

    #[test]
    fn early_return_still_closes() {
        fn fails_after_open(api: MockApi) -> Result<()> {
            let _connection = DisplayConnection::open(api, None)?;
            anyhow::bail!("later startup step failed")
        }

        let api = MockApi::new();
        assert!(fails_after_open(api.clone()).is_err());
        assert_eq!(api.log().closed, 1);
    }

    #[test]
    fn interior_nul_in_name_is_rejected_before_native_call() {
        let api = MockApi::new();
        let err = DisplayConnection::open(api.clone(), Some("bad\0name")).unwrap_err();
        assert!(err.downcast_ref::<DisplayUnavailable>().is_none());
        assert_eq!(api.log().opened, 0);
    }

    #[test]
    fn accessors_forward_to_native_api() {
        let api = MockApi::new();
        let connection = DisplayConnection::open(api.clone(), Some(":1")).unwrap();

        assert_eq!(connection.name(), Some(":1"));
        assert_eq!(connection.default_screen(), MockApi::SCREEN);
        assert_eq!(connection.connection_fd(), MockApi::FD);
        connection.flush();
        assert_eq!(api.log().flushes, 1);
        assert_eq!(api.log().requested_names, vec![Some(":1".to_string())]);
    }

    #[test]
    fn shared_owners_delay_close_until_last_drop() {
        let api = MockApi::new();
        let connection = DisplayConnection::open(api.clone(), None).unwrap();
        let second_owner = Rc::clone(&connection);
        assert_eq!(Rc::strong_count(&connection), 2);

        drop(connection);
        assert_eq!(api.log().closed, 0);

        drop(second_owner);
        assert_eq!(api.log().closed, 1);
    }
}
