use crate::error::FrameError;
use image::RgbImage;

/// usually 3 (RGB)
pub const BYTES_PER_PIXEL: usize = 3;

/// Frame received from the capture device, stored as row-major 8-bit RGB
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFrame {
    /// width of image
    pub w: usize,
    /// height of image
    pub h: usize,
    /// always `BYTES_PER_PIXEL`
    pub bytes_per_pixel: usize,
    /// frame data
    buffer: Vec<u8>,
}

impl ImageFrame {
    /// Create an all-black frame
    pub fn new(w: usize, h: usize) -> Result<Self, FrameError> {
        Self::from_raw(w, h, vec![0; w * h * BYTES_PER_PIXEL])
    }

    /// Wrap raw RGB bytes, checking them against the given dimensions
    pub fn from_raw(w: usize, h: usize, buffer: Vec<u8>) -> Result<Self, FrameError> {
        if w == 0 || h == 0 {
            return Err(FrameError::ZeroDimension { w, h });
        }

        let expected = w * h * BYTES_PER_PIXEL;
        if buffer.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }

        Ok(Self {
            w,
            h,
            bytes_per_pixel: BYTES_PER_PIXEL,
            buffer,
        })
    }

    pub fn from_rgb_image(image: RgbImage) -> Result<Self, FrameError> {
        let (w, h) = image.dimensions();
        Self::from_raw(w as usize, h as usize, image.into_raw())
    }

    pub fn into_rgb_image(self) -> Result<RgbImage, FrameError> {
        let actual = self.buffer.len();
        RgbImage::from_raw(self.w as u32, self.h as u32, self.buffer).ok_or(
            FrameError::BufferSize {
                expected: self.w * self.h * BYTES_PER_PIXEL,
                actual,
            },
        )
    }

    /// Return raw image data
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Return raw, mutable image data
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// (height, width, channels), the order array libraries report
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.h, self.w, self.bytes_per_pixel)
    }

    /// Total number of `u8` elements in the buffer
    pub fn element_count(&self) -> usize {
        self.buffer.len()
    }

    /// Get pixel RGB values, with bounds checking
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.w || y >= self.h {
            return None;
        }

        let i = (y * self.w + x) * self.bytes_per_pixel;
        Some([self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) -> bool {
        if x >= self.w || y >= self.h {
            return false;
        }

        let i = (y * self.w + x) * self.bytes_per_pixel;
        self.buffer[i..i + 3].copy_from_slice(&rgb);
        true
    }

    /// Fill a rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgb: [u8; 3]) {
        let x_end = (x + w).min(self.w);
        let y_end = (y + h).min(self.h);

        for row in y.min(self.h)..y_end {
            for col in x.min(self.w)..x_end {
                let i = (row * self.w + col) * self.bytes_per_pixel;
                self.buffer[i..i + 3].copy_from_slice(&rgb);
            }
        }
    }

    /// Pack pixels as `0x00RRGGBB`, the layout framebuffer windows expect
    pub fn to_argb(&self) -> Vec<u32> {
        self.buffer
            .chunks_exact(self.bytes_per_pixel)
            .map(|px| (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32)
            .collect()
    }
}
