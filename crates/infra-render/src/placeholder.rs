// Loading placeholder served while a job is still pending

use std::f32::consts::TAU;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use genart_core::port::ProduceError;

use crate::canvas::{Canvas, CanvasConfig, DEFAULT_PALETTE};

pub const PLACEHOLDER_MEDIA_TYPE: &str = "image/jpeg";

/// Render the "still loading" image as JPEG bytes
///
/// A ring of dots fading from opaque to faint, centered on the canvas.
pub fn render_loading_placeholder(width: u32, height: u32) -> Result<Vec<u8>, ProduceError> {
    let config = CanvasConfig::default().with_size(width, height);
    let mut canvas = Canvas::new(&config);

    let (cx, cy) = (canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0);
    let ring = cx.min(cy) * 0.25;
    let dot = (ring / 5.0).max(1.0);
    let dots = 12;
    for i in 0..dots {
        let theta = i as f32 / dots as f32 * TAU;
        let alpha = 1.0 - i as f32 / dots as f32 * 0.85;
        canvas.fill_circle(
            cx + ring * theta.cos(),
            cy + ring * theta.sin(),
            dot,
            DEFAULT_PALETTE[3],
            alpha,
        );
    }

    let rgb = DynamicImage::ImageRgba8(canvas.into_image()).into_rgb8();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .map_err(|e| ProduceError::Encode(e.to_string()))?;
    Ok(bytes)
}
