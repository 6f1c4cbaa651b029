// src/lib.rs

//! `ruisapp`: application and windowing glue between a GUI toolkit and the
//! native windowing system (X11 via Xlib).
//!
//! A `DisplayConnection` owns the native connection and is shared through
//! `Rc` by every window created on it, so the connection is closed exactly
//! once, after the last window is gone.

pub mod application;
pub mod config;
pub mod error;
pub mod platform;

pub use application::{create_application, Application};
pub use error::{DisplayUnavailable, WindowCreationFailed};
