// src/platform/mod.rs
//
// Native windowing backends. Only Xorg is implemented.

pub mod backends;

pub use backends::x11::{DisplayConnection, Xlib, XorgWindow};
pub use backends::{Window, WindowAttributes, WindowingApi};
