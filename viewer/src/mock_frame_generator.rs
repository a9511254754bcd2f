use crate::camera::FrameSource;
use crate::error::ViewerError;
use common::image_frame::ImageFrame;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Side length of one checkerboard cell, in pixels
const CELL_SIZE: usize = 40;
/// Thickness of the moving line, in pixels
const LINE_THICKNESS: usize = 8;

const DARK: [u8; 3] = [20, 20, 20];
const LIGHT: [u8; 3] = [230, 230, 230];
const LINE: [u8; 3] = [255, 64, 32];

/// Test patterns for running without a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    Checkerboard,
    MovingLine,
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkerboard" => Ok(PatternType::Checkerboard),
            "moving-line" | "line" => Ok(PatternType::MovingLine),
            other => Err(format!(
                "unknown pattern '{other}' (expected checkerboard or moving-line)"
            )),
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternType::Checkerboard => write!(f, "checkerboard"),
            PatternType::MovingLine => write!(f, "moving-line"),
        }
    }
}

/// Factory for "fake" frames, a stand-in for the camera.
pub struct MockFrameGenerator {
    /// width of generated frames
    w: usize,
    /// height of generated frames
    h: usize,
    /// counter to determine how the pattern should look temporally
    frame_counter: u64,
    /// end the stream after this many frames
    frame_limit: Option<u64>,
    /// determine current time
    last_frame_time: Instant,
    /// how long to wait to create a new frame (effectively FPS)
    frame_delay: Duration,
    /// pattern to generate
    pattern_type: PatternType,
}

impl MockFrameGenerator {
    pub fn new(
        w: usize,
        h: usize,
        fps: u32,
        pattern_type: PatternType,
        frame_limit: Option<u64>,
    ) -> Result<Self, ViewerError> {
        if w == 0 || h == 0 {
            return Err(ViewerError::MockSource(format!(
                "frame size must be non-zero (got {w}x{h})"
            )));
        }
        if fps < 1 {
            return Err(ViewerError::MockSource("fps must be at least 1".into()));
        }

        let frame_delay = Duration::from_micros(1_000_000 / fps as u64);

        Ok(MockFrameGenerator {
            w,
            h,
            frame_counter: 0,
            frame_limit,
            last_frame_time: Instant::now(),
            frame_delay,
            pattern_type,
        })
    }

    /// Generate a mock frame, pacing calls to the configured frame rate
    pub fn generate_frame(&mut self) -> Result<ImageFrame, ViewerError> {
        if let Some(limit) = self.frame_limit {
            if self.frame_counter >= limit {
                return Err(ViewerError::SourceExhausted(limit));
            }
        }

        let elapsed = self.last_frame_time.elapsed();
        if elapsed < self.frame_delay {
            std::thread::sleep(self.frame_delay - elapsed);
        }
        self.last_frame_time = Instant::now();

        let mut frame = ImageFrame::new(self.w, self.h)?;

        match self.pattern_type {
            PatternType::Checkerboard => self.generate_checkerboard(&mut frame),
            PatternType::MovingLine => self.generate_moving_line(&mut frame),
        }

        self.frame_counter += 1;

        Ok(frame)
    }

    /// Checkerboard whose phase flips every five frames
    fn generate_checkerboard(&self, frame: &mut ImageFrame) {
        let pattern_offset = ((self.frame_counter / 5) % 2) as usize;

        for y in 0..self.h {
            for x in 0..self.w {
                let is_odd = (x / CELL_SIZE + y / CELL_SIZE) % 2;
                let rgb = if (is_odd + pattern_offset) % 2 == 0 {
                    DARK
                } else {
                    LIGHT
                };
                frame.set_pixel(x, y, rgb);
            }
        }
    }

    /// Horizontal bar that moves down one row per frame
    fn generate_moving_line(&self, frame: &mut ImageFrame) {
        frame.fill_rect(0, 0, self.w, self.h, DARK);

        let line_pos = (self.frame_counter % self.h as u64) as usize;
        frame.fill_rect(0, line_pos, self.w, LINE_THICKNESS, LINE);
    }
}

impl FrameSource for MockFrameGenerator {
    fn capture_frame(&mut self) -> Result<ImageFrame, ViewerError> {
        self.generate_frame()
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }
}
