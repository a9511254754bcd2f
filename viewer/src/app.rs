use crate::camera::FrameSource;
use crate::error::ViewerError;
use crate::snapshot::save_snapshot;
use crate::window::ViewerWindow;
use common::display_config::{DisplayConfig, Reaction};
use common::image_frame::ImageFrame;
use common::key_command::KeyCommand;
use common::overlay;
use common::transform;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why the viewer loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `q` or Esc
    Quit,
    /// the window was closed by the window manager
    WindowClosed,
    /// reading a frame failed
    EndOfStream,
}

/// The capture-display loop. Owns the frame source and the window for its
/// whole lifetime; both are released when `run` returns, on every path.
pub struct App<S: FrameSource, W: ViewerWindow> {
    source: S,
    window: W,
    config: DisplayConfig,
    snapshot_dir: PathBuf,
    poll_timeout: Duration,
    frames_shown: u64,
    /// last frame handed to the window, kept for snapshots
    last_frame: Option<ImageFrame>,
}

impl<S: FrameSource, W: ViewerWindow> App<S, W> {
    pub fn new(
        source: S,
        window: W,
        config: DisplayConfig,
        snapshot_dir: PathBuf,
        poll_timeout: Duration,
    ) -> Self {
        App {
            source,
            window,
            config,
            snapshot_dir,
            poll_timeout,
            frames_shown: 0,
            last_frame: None,
        }
    }

    /// Run until quit, window close or end of stream
    pub fn run(mut self) -> Result<StopReason, ViewerError> {
        loop {
            if let Some(reason) = self.step()? {
                info!(
                    "stopping after {} frames: {:?}",
                    self.frames_shown, reason
                );
                debug!("final display settings: {:?}", self.config());
                return Ok(reason);
            }
        }
    }

    /// One iteration: capture, transform, overlay, present, poll a key
    fn step(&mut self) -> Result<Option<StopReason>, ViewerError> {
        let frame = match self.source.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("frame capture failed: {}", e);
                return Ok(Some(StopReason::EndOfStream));
            }
        };

        if self.frames_shown == 0 {
            describe_first_frame(&frame);
        }

        let mut frame = transform::apply_chain(frame, &self.config)?;
        if self.config.overlay_visible() {
            overlay::draw_overlay(&mut frame, &overlay::overlay_lines(&self.config));
        }

        self.window.present(&frame)?;
        self.last_frame = Some(frame);
        self.frames_shown += 1;

        if !self.window.is_open() {
            return Ok(Some(StopReason::WindowClosed));
        }

        match self.window.poll_key(self.poll_timeout) {
            Some(code) => self.handle_key(code),
            None => Ok(None),
        }
    }

    fn handle_key(&mut self, code: u32) -> Result<Option<StopReason>, ViewerError> {
        let command = KeyCommand::from_code(code);
        let (config, reaction) = self.config.apply(command);
        self.config = config;
        debug!("{:?} -> {:?}", command, reaction);

        match reaction {
            Reaction::None => {}
            Reaction::ResizeWindow { w, h } => self.window.resize(w, h)?,
            Reaction::SetFullscreen { enabled, w, h } => {
                self.window.set_fullscreen(enabled, w, h)?
            }
            Reaction::Snapshot => self.snapshot(),
            Reaction::Quit => return Ok(Some(StopReason::Quit)),
            Reaction::Unrecognized(code) => match char::from_u32(code) {
                Some(c) if !c.is_control() => info!("unknown key: {} '{}'", code, c),
                _ => info!("unknown key: {}", code),
            },
        }

        Ok(None)
    }

    fn snapshot(&self) {
        let Some(frame) = &self.last_frame else {
            return;
        };

        match save_snapshot(frame, &self.snapshot_dir) {
            Ok(path) => info!("snapshot saved to {}", path.display()),
            Err(e) => warn!("snapshot failed: {}", e),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }
}

/// Log the layout of the raw capture data
fn describe_first_frame(frame: &ImageFrame) {
    let (h, w, c) = frame.shape();
    info!("Type: u8");
    info!("Dimensions: 3");
    info!("Shape: ({}, {}, {})", h, w, c);
    info!("Size: {}", frame.element_count());
    info!("Press <ESC> or q to close video window.");
}
