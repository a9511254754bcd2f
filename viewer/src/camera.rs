use crate::error::ViewerError;
use common::image_frame::ImageFrame;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use tracing::{debug, info, warn};

/// Frame rate asked of the device; the driver picks the closest it has
const REQUESTED_FPS: u32 = 30;

/// Anything the viewer loop can pull frames from
pub trait FrameSource {
    /// Read the next frame. Any error ends the stream.
    fn capture_frame(&mut self) -> Result<ImageFrame, ViewerError>;

    /// Size of the frames this source delivers
    fn dimensions(&self) -> (u32, u32);
}

/// A capture device opened through nokhwa. The stream is stopped when the
/// `Camera` is dropped.
pub struct Camera {
    /// Device index actually opened
    index: CameraIndex,
    /// Resolution negotiated with the device
    w: u32,
    h: u32,
    inner: nokhwa::Camera,
}

impl Camera {
    /// Open `device` and start streaming, asking for `w`x`h` RGB frames
    pub fn open(device: &str, w: u32, h: u32) -> Result<Self, ViewerError> {
        let index = camera_index(device)?;
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(w, h), FrameFormat::MJPEG, REQUESTED_FPS),
        ));

        let mut inner = nokhwa::Camera::new(index.clone(), requested)?;
        inner.open_stream()?;

        let resolution = inner.resolution();
        info!(
            "opened camera {} ({}) at {}x{}",
            index,
            inner.info().human_name(),
            resolution.width(),
            resolution.height()
        );

        Ok(Camera {
            index,
            w: resolution.width(),
            h: resolution.height(),
            inner,
        })
    }
}

impl FrameSource for Camera {
    fn capture_frame(&mut self) -> Result<ImageFrame, ViewerError> {
        let buffer = self.inner.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (w, h) = (decoded.width() as usize, decoded.height() as usize);

        Ok(ImageFrame::from_raw(w, h, decoded.into_raw())?)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.w, self.h)
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        // release the device when Camera is dropped
        if let Err(e) = self.inner.stop_stream() {
            warn!("failed to stop camera {}: {}", self.index, e);
        } else {
            debug!("camera {} released", self.index);
        }
    }
}

/// Resolve the device string for the current OS: Linux opens V4L devices
/// by path (`/dev/video2`, or a bare `2`), other systems by index.
pub fn camera_index(device: &str) -> Result<CameraIndex, ViewerError> {
    let index = if cfg!(target_os = "linux") {
        parse_device_path(device)
    } else {
        device.trim().parse::<u32>().ok()
    };

    index
        .map(CameraIndex::Index)
        .ok_or_else(|| ViewerError::Device(device.to_string()))
}

/// Parse `/dev/videoN` (or `N`) into `N`
fn parse_device_path(device: &str) -> Option<u32> {
    let device = device.trim();
    if let Ok(index) = device.parse::<u32>() {
        return Some(index);
    }

    let digits = device.strip_prefix("/dev/video")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
