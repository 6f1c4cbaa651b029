// src/platform/backends/mock.rs

//! Recording stand-in for a native windowing library.
//!
//! Every call is appended to a shared `ApiLog`. Clones of a `MockApi` share
//! the same log, so a test keeps one clone and hands the other to the code
//! under test.

use super::{WindowAttributes, WindowingApi};
use libc::c_int;
use std::cell::RefCell;
use std::ffi::CStr;
use std::os::unix::io::RawFd;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    OpenDisplay(Option<String>),
    CloseDisplay(usize),
    CreateWindow(u64),
    DestroyWindow(u64),
    MapWindow(u64),
    UnmapWindow(u64),
    ResizeWindow(u64, u32, u32),
    StoreName(u64, String),
    Flush,
}

#[derive(Debug, Clone, Default)]
pub struct ApiLog {
    pub calls: Vec<NativeCall>,
    pub opened: usize,
    pub closed: usize,
    pub open_handles: Vec<usize>,
    pub closed_handles: Vec<usize>,
    pub requested_names: Vec<Option<String>>,
    pub created_windows: usize,
    pub destroyed_windows: Vec<u64>,
    pub flushes: usize,
}

#[derive(Debug, Default)]
struct MockState {
    log: ApiLog,
    display_unavailable: bool,
    fail_window_creation: bool,
    next_handle: usize,
    next_window: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Rc<RefCell<MockState>>,
}

impl MockApi {
    pub const SCREEN: c_int = 0;
    pub const FD: RawFd = 42;

    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `open_display` always fails.
    pub fn unavailable() -> Self {
        let api = Self::new();
        api.state.borrow_mut().display_unavailable = true;
        api
    }

    pub fn fail_window_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_window_creation = fail;
    }

    /// Snapshot of everything recorded so far.
    pub fn log(&self) -> ApiLog {
        self.state.borrow().log.clone()
    }
}

impl WindowingApi for MockApi {
    type Display = usize;
    type WindowId = u64;

    fn open_display(&self, name: Option<&CStr>) -> Option<usize> {
        let mut state = self.state.borrow_mut();
        let name = name.map(|n| n.to_string_lossy().into_owned());
        state.log.calls.push(NativeCall::OpenDisplay(name.clone()));
        state.log.requested_names.push(name);
        state.log.opened += 1;
        if state.display_unavailable {
            return None;
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.log.open_handles.push(handle);
        Some(handle)
    }

    fn close_display(&self, display: usize) {
        let mut state = self.state.borrow_mut();
        state.log.calls.push(NativeCall::CloseDisplay(display));
        state.log.closed += 1;
        state.log.open_handles.retain(|h| *h != display);
        state.log.closed_handles.push(display);
    }

    fn default_screen(&self, _display: usize) -> c_int {
        Self::SCREEN
    }

    fn connection_fd(&self, _display: usize) -> RawFd {
        Self::FD
    }

    fn create_window(&self, _display: usize, _screen: c_int, _attrs: &WindowAttributes) -> Option<u64> {
        let mut state = self.state.borrow_mut();
        if state.fail_window_creation {
            return None;
        }
        state.next_window += 1;
        let id = state.next_window;
        state.log.calls.push(NativeCall::CreateWindow(id));
        state.log.created_windows += 1;
        Some(id)
    }

    fn destroy_window(&self, _display: usize, window: u64) {
        let mut state = self.state.borrow_mut();
        state.log.calls.push(NativeCall::DestroyWindow(window));
        state.log.destroyed_windows.push(window);
    }

    fn map_window(&self, _display: usize, window: u64) {
        self.state
            .borrow_mut()
            .log
            .calls
            .push(NativeCall::MapWindow(window));
    }

    fn unmap_window(&self, _display: usize, window: u64) {
        self.state
            .borrow_mut()
            .log
            .calls
            .push(NativeCall::UnmapWindow(window));
    }

    fn resize_window(&self, _display: usize, window: u64, width: u32, height: u32) {
        self.state
            .borrow_mut()
            .log
            .calls
            .push(NativeCall::ResizeWindow(window, width, height));
    }

    fn store_name(&self, _display: usize, window: u64, title: &CStr) {
        self.state
            .borrow_mut()
            .log
            .calls
            .push(NativeCall::StoreName(window, title.to_string_lossy().into_owned()));
    }

    fn flush(&self, _display: usize) {
        let mut state = self.state.borrow_mut();
        state.log.calls.push(NativeCall::Flush);
        state.log.flushes += 1;
    }
}
