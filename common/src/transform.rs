use crate::display_config::DisplayConfig;
use crate::error::FrameError;
use crate::image_frame::ImageFrame;
use image::imageops::{self, FilterType};

/// Run the per-frame chain: rotate, levels, resize, blur, invert, swap.
///
/// The overlay is drawn separately, after this chain, so that snapshots
/// and tests can look at either stage.
pub fn apply_chain(frame: ImageFrame, config: &DisplayConfig) -> Result<ImageFrame, FrameError> {
    let mut frame = rotate(frame, config.rotation())?;
    adjust_levels(&mut frame, config.gain(), config.offset());

    let (w, h) = config.scaled_size();
    let mut frame = resize(frame, w, h)?;

    if config.blur_radius() > 0 {
        box_blur(&mut frame, config.blur_radius() as usize);
    }
    if config.inverted() {
        invert(&mut frame);
    }
    if config.swap_channels() {
        swap_channels(&mut frame);
    }

    Ok(frame)
}

/// Rotate clockwise by `quarter_turns` × 90°
pub fn rotate(frame: ImageFrame, quarter_turns: u8) -> Result<ImageFrame, FrameError> {
    let turns = quarter_turns % 4;
    if turns == 0 {
        return Ok(frame);
    }

    let image = frame.into_rgb_image()?;
    let rotated = match turns {
        1 => imageops::rotate90(&image),
        2 => imageops::rotate180(&image),
        _ => imageops::rotate270(&image),
    };
    ImageFrame::from_rgb_image(rotated)
}

/// `pixel' = clamp(round(pixel * gain + offset), 0, 255)` on every channel
pub fn adjust_levels(frame: &mut ImageFrame, gain: f32, offset: f32) {
    if gain == 1.0 && offset == 0.0 {
        return;
    }

    // only 256 possible inputs, so map through a table
    let mut table = [0u8; 256];
    for (value, out) in table.iter_mut().enumerate() {
        let v = (value as f32 * gain + offset).round();
        *out = v.clamp(0.0, 255.0) as u8;
    }

    for byte in frame.buffer_mut() {
        *byte = table[*byte as usize];
    }
}

/// Resample to `w`×`h` using bicubic (Catmull-Rom) interpolation
pub fn resize(frame: ImageFrame, w: u32, h: u32) -> Result<ImageFrame, FrameError> {
    if frame.w == w as usize && frame.h == h as usize {
        return Ok(frame);
    }

    let image = frame.into_rgb_image()?;
    ImageFrame::from_rgb_image(imageops::resize(&image, w, h, FilterType::CatmullRom))
}

/// Normalized `ksize`×`ksize` box filter. The anchor is the kernel centre
/// and borders reflect without repeating the edge pixel (`gfedcb|abcdefgh|gfedcba`).
pub fn box_blur(frame: &mut ImageFrame, ksize: usize) {
    if ksize <= 1 {
        return;
    }

    let (w, h, bpp) = (frame.w, frame.h, frame.bytes_per_pixel);
    let before = (ksize / 2) as isize;
    let after = (ksize - 1) as isize - before;

    // horizontal sums, kept unnormalized until the vertical pass
    let src = frame.buffer();
    let mut rows = vec![0u32; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            for c in 0..bpp {
                let mut sum = 0u32;
                for dx in -before..=after {
                    let sx = reflect_101(x as isize + dx, w);
                    sum += src[(y * w + sx) * bpp + c] as u32;
                }
                rows[(y * w + x) * bpp + c] = sum;
            }
        }
    }

    let area = (ksize * ksize) as u32;
    let dst = frame.buffer_mut();
    for y in 0..h {
        for x in 0..w {
            for c in 0..bpp {
                let mut sum = 0u32;
                for dy in -before..=after {
                    let sy = reflect_101(y as isize + dy, h);
                    sum += rows[(sy * w + x) * bpp + c];
                }
                dst[(y * w + x) * bpp + c] = ((sum + area / 2) / area) as u8;
            }
        }
    }
}

/// `255 - pixel` on every channel
pub fn invert(frame: &mut ImageFrame) {
    for byte in frame.buffer_mut() {
        *byte = 255 - *byte;
    }
}

/// Swap the first and third channel (RGB <-> BGR)
pub fn swap_channels(frame: &mut ImageFrame) {
    let bpp = frame.bytes_per_pixel;
    for px in frame.buffer_mut().chunks_exact_mut(bpp) {
        px.swap(0, 2);
    }
}

fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }

    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        }
        if i >= n {
            i = 2 * (n - 1) - i;
        }
    }
    i as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_command::KeyCommand;

    fn frame_from(w: usize, h: usize, pixels: &[[u8; 3]]) -> ImageFrame {
        ImageFrame::from_raw(w, h, pixels.concat()).unwrap()
    }

    fn uniform(w: usize, h: usize, rgb: [u8; 3]) -> ImageFrame {
        frame_from(w, h, &vec![rgb; w * h])
    }

    #[test]
    fn levels_scale_offset_and_clamp() {
        let mut frame = frame_from(3, 1, &[[0, 100, 200], [10, 20, 30], [255, 1, 2]]);
        adjust_levels(&mut frame, 1.5, -10.0);
        assert_eq!(
            frame.buffer(),
            &[0, 140, 255, 5, 20, 35, 255, 0, 0]
        );
    }

    #[test]
    fn levels_identity_is_untouched() {
        let mut frame = frame_from(2, 1, &[[1, 2, 3], [250, 251, 252]]);
        let before = frame.clone();
        adjust_levels(&mut frame, 1.0, 0.0);
        assert_eq!(frame, before);
    }

    #[test]
    fn zero_gain_leaves_only_offset() {
        let mut frame = uniform(2, 2, [200, 10, 99]);
        adjust_levels(&mut frame, 0.0, 40.0);
        assert!(frame.buffer().iter().all(|&b| b == 40));
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise() {
        // 2x1: red | blue  ->  1x2: red over blue
        let frame = frame_from(2, 1, &[[255, 0, 0], [0, 0, 255]]);
        let rotated = rotate(frame, 1).unwrap();
        assert_eq!((rotated.w, rotated.h), (1, 2));
        assert_eq!(rotated.get_pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(rotated.get_pixel(0, 1), Some([0, 0, 255]));
    }

    #[test]
    fn rotate_three_quarters_is_counter_clockwise() {
        let frame = frame_from(2, 1, &[[255, 0, 0], [0, 0, 255]]);
        let rotated = rotate(frame, 3).unwrap();
        assert_eq!(rotated.get_pixel(0, 0), Some([0, 0, 255]));
        assert_eq!(rotated.get_pixel(0, 1), Some([255, 0, 0]));
    }

    #[test]
    fn four_quarter_turns_restore_frame() {
        let frame = frame_from(3, 2, &[[1; 3], [2; 3], [3; 3], [4; 3], [5; 3], [6; 3]]);
        let mut turned = frame.clone();
        for _ in 0..4 {
            turned = rotate(turned, 1).unwrap();
        }
        assert_eq!(turned, frame);
    }

    #[test]
    fn resize_hits_target_size() {
        let frame = uniform(4, 3, [80, 90, 100]);
        let resized = resize(frame, 8, 6).unwrap();
        assert_eq!((resized.w, resized.h), (8, 6));
        // flat input stays flat, give or take rounding
        for (i, &b) in resized.buffer().iter().enumerate() {
            let expected = [80i16, 90, 100][i % 3];
            assert!((b as i16 - expected).abs() <= 1, "byte {i} = {b}");
        }
    }

    #[test]
    fn blur_radius_one_is_identity() {
        let mut frame = frame_from(2, 1, &[[0; 3], [255; 3]]);
        let before = frame.clone();
        box_blur(&mut frame, 1);
        assert_eq!(frame, before);
    }

    #[test]
    fn blur_averages_neighbourhood() {
        // single bright pixel in the middle of a 3x3 black image
        let mut pixels = vec![[0u8; 3]; 9];
        pixels[4] = [90, 90, 90];
        let mut frame = frame_from(3, 3, &pixels);
        box_blur(&mut frame, 3);
        assert_eq!(frame.get_pixel(1, 1), Some([10, 10, 10]));
        // the corner window reflects onto the centre four times
        assert_eq!(frame.get_pixel(0, 0), Some([40, 40, 40]));
    }

    #[test]
    fn blur_keeps_flat_image_flat() {
        let mut frame = uniform(5, 4, [33, 66, 99]);
        box_blur(&mut frame, 4);
        assert_eq!(frame, uniform(5, 4, [33, 66, 99]));
    }

    #[test]
    fn reflect_101_mirrors_without_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
        assert_eq!(reflect_101(-3, 2), 1);
    }

    #[test]
    fn invert_complements() {
        let mut frame = frame_from(1, 1, &[[0, 128, 255]]);
        invert(&mut frame);
        assert_eq!(frame.buffer(), &[255, 127, 0]);
    }

    #[test]
    fn swap_exchanges_red_and_blue() {
        let mut frame = frame_from(1, 1, &[[1, 2, 3]]);
        swap_channels(&mut frame);
        assert_eq!(frame.buffer(), &[3, 2, 1]);
    }

    #[test]
    fn chain_uses_scaled_and_rotated_size() {
        let config = DisplayConfig::new(4, 2).apply(KeyCommand::Rotate).0;
        let frame = uniform(4, 2, [10, 20, 30]);
        let out = apply_chain(frame, &config).unwrap();
        assert_eq!((out.w, out.h), (4, 8));
    }

    #[test]
    fn chain_applies_invert_then_swap() {
        let config = DisplayConfig::new(1, 1)
            .apply_all([
                KeyCommand::ScaleDown,
                KeyCommand::ToggleInvert,
                KeyCommand::ToggleSwap,
            ]);
        let out = apply_chain(frame_from(1, 1, &[[0, 100, 200]]), &config).unwrap();
        assert_eq!(out.buffer(), &[55, 155, 255]);
    }
}
