use crate::key_command::KeyCommand;

pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 5;
pub const DEFAULT_SCALE: u32 = 2;

/// Gain is kept in tenths so stepping by 0.1 never drifts
pub const MAX_GAIN_TENTHS: u8 = 30;
pub const DEFAULT_GAIN_TENTHS: u8 = 10;

pub const MIN_OFFSET: i16 = -100;
pub const MAX_OFFSET: i16 = 100;
pub const OFFSET_STEP: i16 = 10;

pub const MAX_BLUR_RADIUS: u8 = 5;

/// What the window has to do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    None,
    /// Resize the (non-fullscreen) window to the new scaled size
    ResizeWindow { w: u32, h: u32 },
    /// Enter or leave fullscreen; `w`/`h` is the windowed size to return to
    SetFullscreen { enabled: bool, w: u32, h: u32 },
    Snapshot,
    Quit,
    Unrecognized(u32),
}

/// User-adjustable view parameters, read on every frame.
///
/// All mutation goes through [`DisplayConfig::apply`], which keeps every
/// field inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    scale: u32,
    gain_tenths: u8,
    offset: i16,
    blur_radius: u8,
    rotation: u8,
    inverted: bool,
    swap_channels: bool,
    overlay_visible: bool,
    fullscreen: bool,
    /// logical frame width before scaling, swapped on every rotation step
    base_w: u32,
    base_h: u32,
}

impl DisplayConfig {
    pub fn new(base_w: u32, base_h: u32) -> Self {
        Self {
            scale: DEFAULT_SCALE,
            gain_tenths: DEFAULT_GAIN_TENTHS,
            offset: 0,
            blur_radius: 0,
            rotation: 0,
            inverted: false,
            swap_channels: false,
            overlay_visible: true,
            fullscreen: false,
            base_w,
            base_h,
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Contrast multiplier, 0.0 to 3.0
    pub fn gain(&self) -> f32 {
        self.gain_tenths as f32 / 10.0
    }

    /// Brightness offset, -100 to 100
    pub fn offset(&self) -> f32 {
        self.offset as f32
    }

    pub fn blur_radius(&self) -> u8 {
        self.blur_radius
    }

    /// Clockwise quarter turns, 0 to 3
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn rotation_degrees(&self) -> u32 {
        self.rotation as u32 * 90
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn swap_channels(&self) -> bool {
        self.swap_channels
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn base_size(&self) -> (u32, u32) {
        (self.base_w, self.base_h)
    }

    /// Output size: base size times scale
    pub fn scaled_size(&self) -> (u32, u32) {
        (self.base_w * self.scale, self.base_h * self.scale)
    }

    /// Handle one key command, returning the new configuration and what
    /// the window must do about it
    #[must_use]
    pub fn apply(mut self, command: KeyCommand) -> (Self, Reaction) {
        let reaction = match command {
            KeyCommand::ScaleUp => {
                self.scale = (self.scale + 1).min(MAX_SCALE);
                self.resize_reaction()
            }
            KeyCommand::ScaleDown => {
                self.scale = self.scale.saturating_sub(1).max(MIN_SCALE);
                self.resize_reaction()
            }
            KeyCommand::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                let (w, h) = self.scaled_size();
                Reaction::SetFullscreen {
                    enabled: self.fullscreen,
                    w,
                    h,
                }
            }
            KeyCommand::ToggleOverlay => {
                self.overlay_visible = !self.overlay_visible;
                Reaction::None
            }
            KeyCommand::StepBrightness => {
                self.offset += OFFSET_STEP;
                if self.offset > MAX_OFFSET {
                    self.offset = MIN_OFFSET;
                }
                Reaction::None
            }
            KeyCommand::StepContrast => {
                self.gain_tenths += 1;
                if self.gain_tenths > MAX_GAIN_TENTHS {
                    self.gain_tenths = 0;
                }
                Reaction::None
            }
            KeyCommand::ToggleSwap => {
                self.swap_channels = !self.swap_channels;
                Reaction::None
            }
            KeyCommand::ToggleInvert => {
                self.inverted = !self.inverted;
                Reaction::None
            }
            KeyCommand::Rotate => {
                self.rotation = (self.rotation + 1) % 4;
                std::mem::swap(&mut self.base_w, &mut self.base_h);
                self.resize_reaction()
            }
            KeyCommand::StepBlur => {
                self.blur_radius = (self.blur_radius + 1) % (MAX_BLUR_RADIUS + 1);
                Reaction::None
            }
            KeyCommand::Snapshot => Reaction::Snapshot,
            KeyCommand::Quit => Reaction::Quit,
            KeyCommand::Unknown(code) => Reaction::Unrecognized(code),
        };

        (self, reaction)
    }

    /// Apply a sequence of commands, discarding the reactions
    pub fn apply_all<I>(self, commands: I) -> Self
    where
        I: IntoIterator<Item = KeyCommand>,
    {
        commands
            .into_iter()
            .fold(self, |config, command| config.apply(command).0)
    }

    fn resize_reaction(&self) -> Reaction {
        if self.fullscreen {
            return Reaction::None;
        }
        let (w, h) = self.scaled_size();
        Reaction::ResizeWindow { w, h }
    }
}
