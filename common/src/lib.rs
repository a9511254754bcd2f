pub mod display_config;
pub mod error;
pub mod image_frame;
pub mod key_command;
pub mod logger;
pub mod overlay;
pub mod transform;
