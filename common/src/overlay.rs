use crate::display_config::DisplayConfig;
use crate::image_frame::ImageFrame;
use font8x8::{BASIC_FONTS, UnicodeFonts};

/// Vertical distance between text lines, in pixels
pub const LINE_HEIGHT: usize = 14;
/// Left margin of every text line
pub const MARGIN_X: usize = 10;
/// Minimum side of the background box
pub const MIN_BOX_SIZE: usize = 160;

const GLYPH_SIZE: usize = 8;
const TEXT_COLOR: [u8; 3] = [255, 255, 0];
const BACKGROUND: [u8; 3] = [0, 0, 0];

/// Status readout lines, top to bottom
pub fn overlay_lines(config: &DisplayConfig) -> Vec<String> {
    vec![
        format!("Scale (+/-): {}", config.scale()),
        format!("Blur (s): {}", config.blur_radius()),
        format!("Bright (b): {:.1}", config.offset()),
        format!("Contrast (c): {:.1}", config.gain()),
        format!("Rotate (r): {}", config.rotation_degrees()),
        format!("Invert (i): {}", config.inverted()),
        format!("False color (e): {}", config.swap_channels()),
        format!("Menu (m): {}", config.overlay_visible()),
        "Snapshot (CTRL+s)".to_string(),
        "Close (ESC or q)".to_string(),
    ]
}

/// Size of the opaque box drawn behind `lines`
pub fn box_size(lines: &[String]) -> (usize, usize) {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let w = (2 * MARGIN_X + longest * GLYPH_SIZE).max(MIN_BOX_SIZE);
    let h = ((lines.len() + 1) * LINE_HEIGHT + 6).max(MIN_BOX_SIZE);
    (w, h)
}

/// Draw an opaque box in the top-left corner and the given lines on it
pub fn draw_overlay(frame: &mut ImageFrame, lines: &[String]) {
    let (w, h) = box_size(lines);
    frame.fill_rect(0, 0, w, h, BACKGROUND);

    for (i, line) in lines.iter().enumerate() {
        // baseline of line i sits at (i + 1) * LINE_HEIGHT
        let top = (i + 1) * LINE_HEIGHT - GLYPH_SIZE;
        draw_text(frame, MARGIN_X, top, line);
    }
}

fn draw_text(frame: &mut ImageFrame, x: usize, y: usize, text: &str) {
    for (n, c) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c) else {
            continue;
        };
        let origin_x = x + n * GLYPH_SIZE;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // least significant bit is the leftmost pixel
                if bits & (1 << col) != 0 {
                    frame.set_pixel(origin_x + col, y + row, TEXT_COLOR);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_command::KeyCommand;

    #[test]
    fn default_readout() {
        let lines = overlay_lines(&DisplayConfig::new(640, 480));
        assert_eq!(
            lines,
            vec![
                "Scale (+/-): 2",
                "Blur (s): 0",
                "Bright (b): 0.0",
                "Contrast (c): 1.0",
                "Rotate (r): 0",
                "Invert (i): false",
                "False color (e): false",
                "Menu (m): true",
                "Snapshot (CTRL+s)",
                "Close (ESC or q)",
            ]
        );
    }

    #[test]
    fn readout_tracks_changes() {
        let config = DisplayConfig::new(640, 480).apply_all(
            "+sbcrie".chars().map(KeyCommand::from),
        );
        let lines = overlay_lines(&config);
        assert_eq!(lines[0], "Scale (+/-): 3");
        assert_eq!(lines[1], "Blur (s): 1");
        assert_eq!(lines[2], "Bright (b): 10.0");
        assert_eq!(lines[3], "Contrast (c): 1.1");
        assert_eq!(lines[4], "Rotate (r): 90");
        assert_eq!(lines[5], "Invert (i): true");
        assert_eq!(lines[6], "False color (e): true");
    }

    #[test]
    fn negative_brightness_is_formatted() {
        let config = DisplayConfig::new(640, 480)
            .apply_all(std::iter::repeat_n(KeyCommand::StepBrightness, 11));
        assert_eq!(overlay_lines(&config)[2], "Bright (b): -100.0");
    }

    #[test]
    fn box_fits_longest_line() {
        let lines = overlay_lines(&DisplayConfig::new(640, 480));
        let (w, h) = box_size(&lines);
        assert_eq!(w, 2 * MARGIN_X + "False color (e): false".len() * 8);
        assert!(h >= lines.len() * LINE_HEIGHT);
    }

    #[test]
    fn overlay_blacks_out_box_and_draws_text() {
        let mut frame = ImageFrame::from_raw(300, 200, vec![200; 300 * 200 * 3]).unwrap();
        let lines = overlay_lines(&DisplayConfig::new(150, 100));
        draw_overlay(&mut frame, &lines);

        let (w, h) = box_size(&lines);
        // outside the box is untouched
        assert_eq!(frame.get_pixel(w, h), Some([200, 200, 200]));

        let mut text = 0;
        let mut background = 0;
        for y in 0..h {
            for x in 0..w {
                match frame.get_pixel(x, y) {
                    Some(TEXT_COLOR) => text += 1,
                    Some(BACKGROUND) => background += 1,
                    other => panic!("unexpected pixel {other:?} at ({x}, {y})"),
                }
            }
        }
        assert!(text > 0);
        assert!(background > text);
    }

    #[test]
    fn overlay_is_clipped_on_small_frames() {
        let mut frame = ImageFrame::new(20, 10).unwrap();
        draw_overlay(&mut frame, &["Close (ESC or q)".to_string()]);
        assert_eq!(frame.element_count(), 20 * 10 * 3);
    }
}
