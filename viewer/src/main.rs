mod app;
mod camera;
mod error;
mod mock_frame_generator;
mod snapshot;
mod video_config;
mod window;

use crate::app::{App, StopReason};
use crate::camera::{Camera, FrameSource};
use crate::error::ViewerError;
use crate::mock_frame_generator::MockFrameGenerator;
use crate::video_config::{Args, VideoConfig};
use crate::window::MinifbWindow;
use clap::Parser;
use common::display_config::DisplayConfig;
use common::logger;
use std::error::Error;
use tracing::{error, info};

/// Entry point for the USB microscope viewer
///
/// Opens the capture device (or a test pattern with `--mock`), shows it in
/// a window and reacts to single-key commands until `q` / Esc, the window
/// is closed, or the device stops delivering frames.
///
/// ```bash
/// cargo run --bin usb-microscope -- --device /dev/video2
/// ```
fn main() -> Result<(), Box<dyn Error>> {
    let config = VideoConfig::from(Args::parse());
    logger::init(&config.logger)?;

    let result = match config.mock {
        Some(pattern) => {
            info!("using {} test pattern", pattern);
            MockFrameGenerator::new(
                config.camera_width as usize,
                config.camera_height as usize,
                config.mock_fps,
                pattern,
                config.frame_limit,
            )
            .and_then(|source| run_viewer(source, &config))
        }
        None => Camera::open(&config.device, config.camera_width, config.camera_height)
            .and_then(|source| run_viewer(source, &config)),
    };

    match result {
        Ok(reason) => {
            info!("viewer closed ({:?})", reason);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

/// Open the window at the source's scaled size and run the loop.
/// `source` and the window are dropped before this returns.
fn run_viewer<S: FrameSource>(source: S, config: &VideoConfig) -> Result<StopReason, ViewerError> {
    let (w, h) = source.dimensions();
    let display = DisplayConfig::new(w, h);
    let (scaled_w, scaled_h) = display.scaled_size();

    let window = MinifbWindow::open(&config.title, scaled_w, scaled_h, config.fullscreen_size)?;

    App::new(
        source,
        window,
        display,
        config.snapshot_dir.clone(),
        config.poll_timeout,
    )
    .run()
}
