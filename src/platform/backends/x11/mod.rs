// src/platform/backends/x11/mod.rs

//! Xorg backend.
//!
//! - `connection`: `DisplayConnection`, the owned display connection.
//! - `window`: `XorgWindow`, the Xorg variant of the `Window` capability.
//!
//! `Xlib` below is the production `WindowingApi`, a zero-sized set of direct
//! Xlib calls.

#![allow(non_snake_case)] // Allow non-snake case for X11 types

pub mod connection;
pub mod window;

pub use connection::DisplayConnection;
pub use window::XorgWindow;

use super::{WindowAttributes, WindowingApi};
use libc::{c_char, c_int, c_uint};
use log::trace;
use std::ffi::CStr;
use std::os::unix::io::RawFd;
use std::ptr::{self, NonNull};
use x11::xlib;

/// Direct Xlib calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xlib;

impl WindowingApi for Xlib {
    type Display = NonNull<xlib::Display>;
    type WindowId = xlib::Window;

    fn open_display(&self, name: Option<&CStr>) -> Option<Self::Display> {
        // NULL makes Xlib read the DISPLAY environment variable.
        let name_ptr = name.map_or(ptr::null(), CStr::as_ptr);
        // SAFETY: name_ptr is NULL or a NUL-terminated string that outlives the call.
        let display = unsafe { xlib::XOpenDisplay(name_ptr) };
        trace!("XOpenDisplay returned {:p}", display);
        NonNull::new(display)
    }

    fn close_display(&self, display: Self::Display) {
        // SAFETY: display came from XOpenDisplay and is closed exactly once by its owner.
        let status = unsafe { xlib::XCloseDisplay(display.as_ptr()) };
        trace!("XCloseDisplay({:p}) returned {}", display, status);
    }

    fn default_screen(&self, display: Self::Display) -> c_int {
        // SAFETY: display is a live connection.
        unsafe { xlib::XDefaultScreen(display.as_ptr()) }
    }

    fn connection_fd(&self, display: Self::Display) -> RawFd {
        // SAFETY: display is a live connection.
        unsafe { xlib::XConnectionNumber(display.as_ptr()) }
    }

    fn create_window(
        &self,
        display: Self::Display,
        screen: c_int,
        attrs: &WindowAttributes,
    ) -> Option<Self::WindowId> {
        let (width, height) = attrs.clamped_size();
        // SAFETY: display is a live connection and screen came from it.
        let window = unsafe {
            let dpy = display.as_ptr();
            let root = xlib::XRootWindow(dpy, screen);
            xlib::XCreateSimpleWindow(
                dpy,
                root,
                attrs.x as c_int,
                attrs.y as c_int,
                width as c_uint,
                height as c_uint,
                0, // border width
                xlib::XBlackPixel(dpy, screen),
                xlib::XWhitePixel(dpy, screen),
            )
        };
        trace!("XCreateSimpleWindow returned {}", window);
        if window == 0 {
            None
        } else {
            Some(window)
        }
    }

    fn destroy_window(&self, display: Self::Display, window: Self::WindowId) {
        // SAFETY: window was created on this display and is destroyed once by its owner.
        unsafe {
            xlib::XDestroyWindow(display.as_ptr(), window);
        }
    }

    fn map_window(&self, display: Self::Display, window: Self::WindowId) {
        // SAFETY: display and window are live.
        unsafe {
            xlib::XMapWindow(display.as_ptr(), window);
        }
    }

    fn unmap_window(&self, display: Self::Display, window: Self::WindowId) {
        // SAFETY: display and window are live.
        unsafe {
            xlib::XUnmapWindow(display.as_ptr(), window);
        }
    }

    fn resize_window(&self, display: Self::Display, window: Self::WindowId, width: u32, height: u32) {
        // SAFETY: display and window are live.
        unsafe {
            xlib::XResizeWindow(display.as_ptr(), window, width as c_uint, height as c_uint);
        }
    }

    fn store_name(&self, display: Self::Display, window: Self::WindowId, title: &CStr) {
        let dpy = display.as_ptr();
        // SAFETY: display and window are live; title is NUL-terminated and
        // outlives the calls.
        unsafe {
            xlib::XStoreName(dpy, window, title.as_ptr() as *mut c_char);

            // _NET_WM_NAME carries the UTF-8 title for EWMH window managers.
            let net_wm_name = xlib::XInternAtom(
                dpy,
                b"_NET_WM_NAME\0".as_ptr() as *const c_char,
                xlib::False,
            );
            let utf8_string = xlib::XInternAtom(
                dpy,
                b"UTF8_STRING\0".as_ptr() as *const c_char,
                xlib::False,
            );
            if net_wm_name != 0 && utf8_string != 0 {
                xlib::XChangeProperty(
                    dpy,
                    window,
                    net_wm_name,
                    utf8_string,
                    8,
                    xlib::PropModeReplace,
                    title.as_ptr() as *const u8,
                    title.to_bytes().len() as c_int,
                );
            } else {
                trace!("_NET_WM_NAME or UTF8_STRING not interned; title set via XStoreName only.");
            }
        }
    }

    fn flush(&self, display: Self::Display) {
        // SAFETY: display is a live connection.
        unsafe {
            xlib::XFlush(display.as_ptr());
        }
    }
}
