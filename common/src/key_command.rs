/// ASCII escape, reported by the window for the Esc key
pub const ESCAPE: u32 = 27;
/// ASCII DC3, the control code produced by Ctrl+S
pub const CTRL_S: u32 = 19;

/// Actions the user can trigger from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ScaleUp,
    ScaleDown,
    ToggleFullscreen,
    ToggleOverlay,
    StepBrightness,
    StepContrast,
    ToggleSwap,
    ToggleInvert,
    Rotate,
    StepBlur,
    Snapshot,
    Quit,
    /// Anything else, carrying the raw key code
    Unknown(u32),
}

impl KeyCommand {
    /// Decode a character code. Matching is case-sensitive.
    pub fn from_code(code: u32) -> Self {
        if code == ESCAPE {
            return KeyCommand::Quit;
        }
        if code == CTRL_S {
            return KeyCommand::Snapshot;
        }

        match char::from_u32(code) {
            Some('+') => KeyCommand::ScaleUp,
            Some('-') => KeyCommand::ScaleDown,
            Some('f') => KeyCommand::ToggleFullscreen,
            Some('m') => KeyCommand::ToggleOverlay,
            Some('b') => KeyCommand::StepBrightness,
            Some('c') => KeyCommand::StepContrast,
            Some('e') => KeyCommand::ToggleSwap,
            Some('i') => KeyCommand::ToggleInvert,
            Some('r') => KeyCommand::Rotate,
            Some('s') => KeyCommand::StepBlur,
            Some('q') => KeyCommand::Quit,
            _ => KeyCommand::Unknown(code),
        }
    }
}

impl From<char> for KeyCommand {
    fn from(c: char) -> Self {
        KeyCommand::from_code(c as u32)
    }
}
