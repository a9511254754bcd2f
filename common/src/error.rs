use thiserror::Error;

/// Errors raised while building or reshaping an `ImageFrame`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("dimensions must be greater than zero (got {w}x{h})")]
    ZeroDimension { w: usize, h: usize },

    #[error("buffer size mismatch: expected {expected} bytes but got {actual}")]
    BufferSize { expected: usize, actual: usize },
}
