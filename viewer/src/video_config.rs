use crate::mock_frame_generator::PatternType;
use clap::Parser;
use common::logger::{LogLevel, LoggerConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Live viewer for USB microscopes and other video-capture devices
///
/// Keys: + / - scale, f fullscreen, m menu, b brightness, c contrast,
/// e false color, i invert, r rotate, s blur, Ctrl+s snapshot, q / Esc quit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Capture device: an index, or /dev/videoN on Linux
    #[arg(short, long, default_value = "0")]
    pub device: String,

    /// Requested capture width
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Window title
    #[arg(short, long, default_value = "USB-Microscope")]
    pub title: String,

    /// How long to wait for a key press after each frame, in milliseconds
    #[arg(long, default_value_t = 5)]
    pub poll_ms: u64,

    /// Window size used in fullscreen mode
    #[arg(long, default_value_t = 1920)]
    pub fullscreen_width: u32,

    #[arg(long, default_value_t = 1080)]
    pub fullscreen_height: u32,

    /// Directory snapshots are written to
    #[arg(long, default_value = ".")]
    pub snapshot_dir: PathBuf,

    /// Use a generated test pattern (checkerboard, moving-line) instead of a camera
    #[arg(long)]
    pub mock: Option<PatternType>,

    /// Frame rate of the test pattern
    #[arg(long, default_value_t = 30)]
    pub mock_fps: u32,

    /// Stop the test pattern after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Minimum log level (trace, debug, info, warning, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Settings for one viewer session
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub device: String,
    pub camera_width: u32,
    pub camera_height: u32,
    pub title: String,
    pub poll_timeout: Duration,
    pub fullscreen_size: (u32, u32),
    pub snapshot_dir: PathBuf,
    pub mock: Option<PatternType>,
    pub mock_fps: u32,
    pub frame_limit: Option<u64>,
    pub logger: LoggerConfig,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            camera_width: 640,
            camera_height: 480,
            title: "USB-Microscope".to_string(),
            poll_timeout: Duration::from_millis(5),
            fullscreen_size: (1920, 1080),
            snapshot_dir: PathBuf::from("."),
            mock: None,
            mock_fps: 30,
            frame_limit: None,
            logger: LoggerConfig::default(),
        }
    }
}

impl From<Args> for VideoConfig {
    fn from(args: Args) -> Self {
        Self {
            device: args.device,
            camera_width: args.width,
            camera_height: args.height,
            title: args.title,
            poll_timeout: Duration::from_millis(args.poll_ms),
            fullscreen_size: (args.fullscreen_width, args.fullscreen_height),
            snapshot_dir: args.snapshot_dir,
            mock: args.mock,
            mock_fps: args.mock_fps,
            frame_limit: args.frames,
            logger: LoggerConfig {
                log_file: args.log_file,
                min_level: args.log_level,
            },
        }
    }
}
