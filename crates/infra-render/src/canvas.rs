// Canvas - RGBA pixel buffer with the few primitives the drawings need

use image::{Rgba, RgbaImage};

pub const NAVAJO_WHITE: Rgba<u8> = Rgba([0xFF, 0xDE, 0xAD, 0xFF]);
pub const ORANGE: Rgba<u8> = Rgba([0xFF, 0xA5, 0x00, 0xFF]);

/// Default five-color palette
pub const DEFAULT_PALETTE: [Rgba<u8>; 5] = [
    Rgba([0xCF, 0x2B, 0x34, 0xFF]),
    Rgba([0xF0, 0x8F, 0x46, 0xFF]),
    Rgba([0xF0, 0xC1, 0x29, 0xFF]),
    Rgba([0x19, 0x6E, 0x94, 0xFF]),
    Rgba([0x35, 0x3A, 0x57, 0xFF]),
];

/// Canvas size and colors shared by every drawing
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    pub line_color: Rgba<u8>,
    pub line_width: f32,
    pub palette: Vec<Rgba<u8>>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            background: NAVAJO_WHITE,
            line_color: ORANGE,
            line_width: 1.0,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl CanvasConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }
}

pub struct Canvas {
    image: RgbaImage,
    config: CanvasConfig,
}

impl Canvas {
    /// New canvas filled with the configured background
    pub fn new(config: &CanvasConfig) -> Self {
        let image = RgbaImage::from_pixel(config.width, config.height, config.background);
        Self {
            image,
            config: config.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Palette color by index, wrapping around
    pub fn palette(&self, index: usize) -> Rgba<u8> {
        let palette = &self.config.palette;
        if palette.is_empty() {
            self.config.line_color
        } else {
            palette[index % palette.len()]
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Alpha-blend `color` over the pixel at (x, y); `alpha` in [0, 1]
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let mixed = color[c] as f32 * a + dst[c] as f32 * (1.0 - a);
            dst[c] = mixed.round() as u8;
        }
        dst[3] = 0xFF;
    }

    /// Line of the configured width (DDA stepping, square brush)
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>, alpha: f32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let half = (self.config.line_width / 2.0).floor() as i64;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (x0 + dx * t).round() as i64;
            let y = (y0 + dy * t).round() as i64;
            for ox in -half..=half {
                for oy in -half..=half {
                    self.blend(x + ox, y + oy, color, alpha);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>, alpha: f32) {
        let r = radius.max(0.0);
        let (x_min, x_max) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
        let (y_min, y_max) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);
        let r2 = r * r;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let (fx, fy) = (x as f32 - cx, y as f32 - cy);
                if fx * fx + fy * fy <= r2 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>, alpha: f32) {
        let segments = ((radius * std::f32::consts::TAU).ceil() as usize).max(8);
        let mut prev = (cx + radius, cy);
        for i in 1..=segments {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            let next = (cx + radius * theta.cos(), cy + radius * theta.sin());
            self.line(prev.0, prev.1, next.0, next.1, color, alpha);
            prev = next;
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>, alpha: f32) {
        for py in y.floor() as i64..(y + h).ceil() as i64 {
            for px in x.floor() as i64..(x + w).ceil() as i64 {
                self.blend(px, py, color, alpha);
            }
        }
    }
}
