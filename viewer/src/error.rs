use common::error::FrameError;
use nokhwa::NokhwaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("camera error: {0}")]
    Camera(#[from] NokhwaError),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("unsupported capture device '{0}' (expected an index or /dev/videoN)")]
    Device(String),

    #[error("frame source exhausted after {0} frames")]
    SourceExhausted(u64),

    #[error("invalid mock source: {0}")]
    MockSource(String),
}
