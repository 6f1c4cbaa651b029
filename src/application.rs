// src/application.rs

//! The top-level application object and its factory.
//!
//! `create_application` is the bootstrap entry point: it turns an executable
//! name plus arguments into an `Application` that owns the display connection
//! and the main window. It returns `Ok(None)` when the arguments ask for no
//! application at all (`--help`, `--version`).

use crate::config::{Config, CONFIG};
use crate::platform::backends::x11::{DisplayConnection, Xlib, XorgWindow};
use crate::platform::backends::{Window, WindowAttributes, WindowingApi};
use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, info};
use std::rc::Rc;

/// Command-line options accepted by the application factory.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Open a native window through the ruisapp glue layer")]
pub struct Args {
    /// X display to connect to (overrides config and $DISPLAY)
    #[arg(short, long)]
    pub display: Option<String>,

    /// Main window title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Main window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Main window height in pixels
    #[arg(long)]
    pub height: Option<u32>,
}

impl Args {
    /// Overlays command-line values on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(display) = &self.display {
            config.display.name = Some(display.clone());
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

/// Parses `args` (without the executable name).
///
/// `Ok(None)` means clap already handled the request (help or version text
/// was printed).
pub fn parse_args(executable: &str, args: &[String]) -> Result<Option<Args>> {
    let argv = std::iter::once(executable.to_string()).chain(args.iter().cloned());
    match Args::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().context("Failed to print help text")?;
            Ok(None)
        }
        Err(e) => bail!("Invalid arguments for {}: {}", executable, e.render()),
    }
}

/// Builds the application from the process-wide configuration.
pub fn create_application(executable: &str, args: &[String]) -> Result<Option<Application>> {
    create_application_with(Xlib, (*CONFIG).clone(), executable, args)
}

/// Builds an application on an arbitrary windowing backend.
pub fn create_application_with<A: WindowingApi + 'static>(
    api: A,
    mut config: Config,
    executable: &str,
    args: &[String],
) -> Result<Option<Application<A>>> {
    let Some(parsed) = parse_args(executable, args)? else {
        return Ok(None);
    };
    debug!("Parsed arguments: {:?}", parsed);
    parsed.apply_to(&mut config);

    Application::new(api, executable, &config).map(Some)
}

/// Owns the display connection and every window opened on it.
pub struct Application<A: WindowingApi + 'static = Xlib> {
    name: String,
    windows: Vec<Box<dyn Window>>,
    connection: Rc<DisplayConnection<A>>,
}

impl<A: WindowingApi + 'static> Application<A> {
    /// Opens the display and creates the (unmapped) main window.
    ///
    /// If the main window cannot be created the connection is closed again
    /// before the error is returned.
    pub fn new(api: A, name: &str, config: &Config) -> Result<Self> {
        info!("Starting application '{}'.", name);
        let connection = DisplayConnection::open(api, config.display.name.as_deref())
            .context("Failed to open display connection")?;

        let mut app = Application {
            name: name.to_string(),
            windows: Vec::new(),
            connection,
        };
        app.open_window(&config.window.attributes())
            .context("Failed to create main window")?;
        Ok(app)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Rc<DisplayConnection<A>> {
        &self.connection
    }

    /// Creates another window on the application's connection and returns its
    /// index.
    pub fn open_window(&mut self, attrs: &WindowAttributes) -> Result<usize> {
        let window = XorgWindow::new(Rc::clone(&self.connection), attrs)?;
        self.windows.push(Box::new(window));
        Ok(self.windows.len() - 1)
    }

    /// Destroys the window at `index`. Later windows shift down by one.
    pub fn close_window(&mut self, index: usize) -> Result<()> {
        if index >= self.windows.len() {
            bail!(
                "No window at index {} ({} open)",
                index,
                self.windows.len()
            );
        }
        let window = self.windows.remove(index);
        debug!("Closing window {} (ID: {}).", index, window.id());
        Ok(())
    }

    pub fn windows(&self) -> &[Box<dyn Window>] {
        &self.windows
    }

    /// The first window created, if it is still open.
    pub fn main_window_mut(&mut self) -> Option<&mut (dyn Window + 'static)> {
        self.windows.first_mut().map(|w| w.as_mut())
    }
}

impl<A: WindowingApi + 'static> Drop for Application<A> {
    fn drop(&mut self) {
        info!(
            "Shutting down application '{}' ({} window(s) open).",
            self.name,
            self.windows.len()
        );
        // Windows first; the connection goes with the last Rc.
        self.windows.clear();
    }
}
