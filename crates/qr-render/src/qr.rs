//! QR code generation with background knockout and high-quality resize.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

/// Default edge length of the rendered QR image in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Pixels whose R, G and B channels all exceed this value are treated as
/// background and made transparent.
pub const BACKGROUND_THRESHOLD: u8 = 200;

/// Edge length of one QR module before resizing.
const MODULE_SIZE: u32 = 10;

/// Quiet zone width in modules around the code.
const QUIET_ZONE: u32 = 1;

/// Errors that can occur while rendering a QR code.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR encode error: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Render `payload` as a QR code with a transparent background.
///
/// The code is encoded at error-correction level H. Dark modules stay
/// opaque black; near-white background pixels become fully transparent so
/// the result can be pasted with its own alpha as the mask. The image is
/// resized to `target_size` square using Lanczos3.
///
/// Fails if the payload does not fit at level H. Pure transform, no side
/// effects.
pub fn render_qr(payload: &str, target_size: u32) -> Result<RgbaImage, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let img_size = (module_count + QUIET_ZONE * 2) * MODULE_SIZE;
    let mut img = RgbaImage::from_pixel(img_size, img_size, Rgba([255, 255, 255, 255]));

    for (i, color) in modules.iter().enumerate() {
        if *color == Color::Dark {
            let px = ((i as u32) % module_count + QUIET_ZONE) * MODULE_SIZE;
            let py = ((i as u32) / module_count + QUIET_ZONE) * MODULE_SIZE;
            for dy in 0..MODULE_SIZE {
                for dx in 0..MODULE_SIZE {
                    img.put_pixel(px + dx, py + dy, Rgba([0, 0, 0, 255]));
                }
            }
        }
    }

    knock_out_background(&mut img);

    debug!(module_count, img_size, target_size, "Rendered QR modules");

    Ok(image::imageops::resize(
        &img,
        target_size,
        target_size,
        FilterType::Lanczos3,
    ))
}

/// Make near-white pixels fully transparent, keeping dark modules opaque.
///
/// A pixel is background when all three color channels exceed
/// [`BACKGROUND_THRESHOLD`], regardless of its original alpha.
pub fn knock_out_background(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let [r, g, b, _] = px.0;
        if r > BACKGROUND_THRESHOLD && g > BACKGROUND_THRESHOLD && b > BACKGROUND_THRESHOLD {
            *px = Rgba([255, 255, 255, 0]);
        }
    }
}
