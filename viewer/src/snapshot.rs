use crate::error::ViewerError;
use chrono::Local;
use common::image_frame::ImageFrame;
use std::path::{Path, PathBuf};

/// Write `frame` as `snapshot_<timestamp>.png` into `dir`, returning the path
pub fn save_snapshot(frame: &ImageFrame, dir: &Path) -> Result<PathBuf, ViewerError> {
    let name = Local::now()
        .format("snapshot_%Y%m%d_%H%M%S_%3f.png")
        .to_string();
    let path = dir.join(name);

    frame.clone().into_rgb_image()?.save(&path)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_readable_png() {
        let dir = std::env::temp_dir().join(format!("viewer-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut frame = ImageFrame::new(4, 3).unwrap();
        frame.set_pixel(1, 2, [10, 20, 30]);

        let path = save_snapshot(&frame, &dir).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 2).0, [10, 20, 30]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("viewer-snapshot-missing/nested/dir");
        let frame = ImageFrame::new(2, 2).unwrap();
        assert!(matches!(
            save_snapshot(&frame, &dir),
            Err(ViewerError::Image(_))
        ));
    }
}
