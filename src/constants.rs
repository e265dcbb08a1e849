//! Application constants and configuration

pub const APP_NAME: &str = "Formal Letter Generator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Signature canvas size in pixels
pub const SIGNATURE_WIDTH: u32 = 400;
pub const SIGNATURE_HEIGHT: u32 = 150;
pub const SIGNATURE_STROKE_WIDTH: f32 = 2.0;

/// Closing line above the signature
pub const VALEDICTION: &str = "YOURS FAITHFULLY";

/// Print copies kept in the print folder; older ones are deleted
pub const PRINT_COPIES_KEPT: usize = 5;

/// How long toast messages stay visible
pub const TOAST_SECONDS: f32 = 3.0;
