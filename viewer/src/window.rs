use crate::error::ViewerError;
use common::image_frame::ImageFrame;
use common::key_command::{CTRL_S, ESCAPE};
use minifb::{InputCallback, Key, KeyRepeat, Scale, ScaleMode, Window, WindowOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long to sleep between event pumps while waiting for a key
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The display surface the viewer loop draws into
pub trait ViewerWindow {
    /// Show `frame`, scaled to the window if sizes differ
    fn present(&mut self, frame: &ImageFrame) -> Result<(), ViewerError>;

    /// Wait up to `timeout` for a key, returning its character code
    fn poll_key(&mut self, timeout: Duration) -> Option<u32>;

    fn resize(&mut self, w: u32, h: u32) -> Result<(), ViewerError>;

    /// Enter or leave fullscreen; `w`x`h` is the windowed size to return to
    fn set_fullscreen(&mut self, enabled: bool, w: u32, h: u32) -> Result<(), ViewerError>;

    /// `false` once the user closed the window
    fn is_open(&self) -> bool;
}

/// Characters typed into the window, in order
type KeyQueue = Rc<RefCell<VecDeque<u32>>>;

struct QueueInput(KeyQueue);

impl InputCallback for QueueInput {
    fn add_char(&mut self, uni_char: u32) {
        self.0.borrow_mut().push_back(uni_char);
    }
}

/// A minifb window.
///
/// minifb windows cannot change size or go fullscreen after creation, so
/// both are done by reopening the window with new options.
pub struct MinifbWindow {
    title: String,
    window: Window,
    keys: KeyQueue,
    fullscreen_size: (u32, u32),
    /// reused `0x00RRGGBB` buffer
    pixels: Vec<u32>,
}

impl MinifbWindow {
    pub fn open(
        title: &str,
        w: u32,
        h: u32,
        fullscreen_size: (u32, u32),
    ) -> Result<Self, ViewerError> {
        let keys = KeyQueue::default();
        let window = Self::create(title, w, h, false, &keys)?;

        Ok(MinifbWindow {
            title: title.to_string(),
            window,
            keys,
            fullscreen_size,
            pixels: Vec::new(),
        })
    }

    fn create(
        title: &str,
        w: u32,
        h: u32,
        fullscreen: bool,
        keys: &KeyQueue,
    ) -> Result<Window, minifb::Error> {
        let options = WindowOptions {
            borderless: fullscreen,
            topmost: fullscreen,
            resize: !fullscreen,
            scale: Scale::X1,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };

        let mut window = Window::new(title, w as usize, h as usize, options)?;
        window.set_input_callback(Box::new(QueueInput(Rc::clone(keys))));
        debug!("window '{}' opened at {}x{} (fullscreen: {})", title, w, h, fullscreen);

        Ok(window)
    }

    fn reopen(&mut self, w: u32, h: u32, fullscreen: bool) -> Result<(), ViewerError> {
        self.window = Self::create(&self.title, w, h, fullscreen, &self.keys)?;
        Ok(())
    }

    fn ctrl_down(&self) -> bool {
        self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl)
    }

    /// Next key from this event pump, if any
    fn next_key(&mut self) -> Option<u32> {
        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            return Some(ESCAPE);
        }

        // some platforms send no character for Ctrl+S, others send 's' or DC3
        if self.ctrl_down() && self.window.is_key_pressed(Key::S, KeyRepeat::No) {
            self.keys
                .borrow_mut()
                .retain(|&c| c != 's' as u32 && c != CTRL_S);
            return Some(CTRL_S);
        }

        self.keys.borrow_mut().pop_front()
    }
}

impl ViewerWindow for MinifbWindow {
    fn present(&mut self, frame: &ImageFrame) -> Result<(), ViewerError> {
        self.pixels = frame.to_argb();
        self.window
            .update_with_buffer(&self.pixels, frame.w, frame.h)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<u32> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(code) = self.next_key() {
                return Some(code);
            }
            if !self.window.is_open() || Instant::now() >= deadline {
                return None;
            }
            thread::sleep(POLL_INTERVAL);
            self.window.update();
        }
    }

    fn resize(&mut self, w: u32, h: u32) -> Result<(), ViewerError> {
        self.reopen(w, h, false)
    }

    fn set_fullscreen(&mut self, enabled: bool, w: u32, h: u32) -> Result<(), ViewerError> {
        if enabled {
            let (fw, fh) = self.fullscreen_size;
            self.reopen(fw, fh, true)
        } else {
            self.reopen(w, h, false)
        }
    }

    fn is_open(&self) -> bool {
        self.window.is_open()
    }
}

impl Drop for MinifbWindow {
    fn drop(&mut self) {
        debug!("closing window '{}'", self.title);
    }
}
