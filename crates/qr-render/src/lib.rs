//! QR code rendering with transparent-background output.
//!
//! Encodes a payload at the strongest error-correction level, rasterizes
//! the modules, and knocks out the light background so the code can be
//! composited onto artwork using its own alpha channel as the mask.

pub mod qr;

// Re-exports for convenience
pub use qr::{BACKGROUND_THRESHOLD, DEFAULT_QR_SIZE, QrError, knock_out_background, render_qr};
