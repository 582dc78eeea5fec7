//! Ticket compositing: identifier stamp and QR overlay on the template.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, warn};

use qr_render::render_qr;

use crate::TicketError;
use crate::config::TicketConfig;
use crate::log::{TicketLog, TicketRecord};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render and persist one ticket, then log it.
///
/// Pipeline: load the template, stamp the identifier text, overlay the
/// transparent-background QR at its fixed position, flatten to RGB, and
/// save as `output_dir/ticket_<id>.png`. The log row is appended only
/// after the image is safely on disk; there is no rollback of a saved
/// image if the append fails.
pub fn generate_ticket(
    config: &TicketConfig,
    prefix: &str,
    number: u64,
) -> Result<TicketRecord, TicketError> {
    let ticket_id = format!("{prefix}{number}");

    let qr = render_qr(
        &format!("{}{}", config.url_prefix, ticket_id),
        config.qr_size,
    )?;

    let mut img = load_template(&config.template_path)?;
    let font = load_font(&config.font_path)?;

    draw_text_mut(
        &mut img,
        WHITE,
        config.text_pos.0,
        config.text_pos.1,
        PxScale::from(config.font_size),
        &font,
        &ticket_id,
    );

    overlay_with_alpha(&mut img, &qr, config.qr_pos.0, config.qr_pos.1);

    // Flatten to RGB before saving
    let flat = image::DynamicImage::ImageRgba8(img).to_rgb8();
    let out_path = config.output_dir.join(format!("ticket_{ticket_id}.png"));
    flat.save(&out_path)
        .map_err(|source| TicketError::ImageWrite {
            path: out_path.display().to_string(),
            source,
        })?;
    debug!(ticket_id = %ticket_id, path = %out_path.display(), "Saved ticket image");

    let record = TicketRecord::now(prefix, number);
    TicketLog::new(&config.log_path).append(&record)?;
    Ok(record)
}

/// Paste `top` onto `base` at (x, y), using the top image's own alpha as
/// the mask so transparent background pixels leave the base untouched.
pub fn overlay_with_alpha(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x >= base.width() || target_y >= base.height() {
            continue;
        }
        let alpha = pixel[3] as f32 / 255.0;
        if alpha > 0.99 {
            base.put_pixel(target_x, target_y, *pixel);
        } else if alpha > 0.01 {
            let bg = base.get_pixel(target_x, target_y);
            let blended = blend_pixel(bg, pixel, alpha);
            base.put_pixel(target_x, target_y, blended);
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}

fn load_template(path: &Path) -> Result<RgbaImage, TicketError> {
    let img = image::open(path).map_err(|source| TicketError::Template {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Load the configured font, falling back to system fonts when it is
/// missing or unparseable. Degraded rendering is preferred over aborting
/// the batch.
fn load_font(configured: &Path) -> Result<FontVec, TicketError> {
    if let Some(font) = try_load_font(configured) {
        return Ok(font);
    }
    warn!(
        path = %configured.display(),
        "Configured font unavailable, falling back to system fonts"
    );
    for candidate in system_font_candidates() {
        if let Some(font) = try_load_font(Path::new(candidate)) {
            debug!(path = candidate, "Using system font for identifier stamp");
            return Ok(font);
        }
    }
    Err(TicketError::Font)
}

fn try_load_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec(data).ok()
}

pub(crate) fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arialbd.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ]
    }
}

/// Whether any fallback font exists on this host. Compositing tests need
/// a parseable font and are skipped on fontless machines.
#[cfg(test)]
pub(crate) fn host_has_font() -> bool {
    system_font_candidates()
        .iter()
        .any(|p| Path::new(p).exists())
}
