// Procedural drawings, one per generator name

use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::canvas::Canvas;

/// A named generator routine
pub trait Drawing: Send + Sync {
    fn name(&self) -> &'static str;

    /// Paint onto a canvas that already holds the background
    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng);
}

/// Every built-in drawing
pub fn default_drawings() -> Vec<Box<dyn Drawing>> {
    vec![
        Box::new(Maze { step: 10 }),
        Box::new(Julia {
            c: (-0.1, 0.651),
            max_iter: 40,
            x_range: 1.5,
            y_range: 1.5,
        }),
        Box::new(RandCircle {
            count: 30,
            min_radius: 10.0,
            max_radius: 80.0,
        }),
        Box::new(BlackHole {
            rings: 200,
            radius: 400.0,
            noise: 0.01,
        }),
        Box::new(Janus { layers: 5, decay: 10.0 }),
        Box::new(RandomShape { shapes: 150 }),
        Box::new(SilkSky { columns: 15, rows: 5 }),
        Box::new(ColorCircle { circles: 30 }),
    ]
}

/// Diagonal-tile maze
pub struct Maze {
    pub step: u32,
}

impl Drawing for Maze {
    fn name(&self) -> &'static str {
        "maze"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let step = self.step.max(2) as f32;
        let color = canvas.config().line_color;
        let mut y = 0.0;
        while y < canvas.height() as f32 {
            let mut x = 0.0;
            while x < canvas.width() as f32 {
                if rng.gen_bool(0.5) {
                    canvas.line(x, y, x + step, y + step, color, 1.0);
                } else {
                    canvas.line(x + step, y, x, y + step, color, 1.0);
                }
                x += step;
            }
            y += step;
        }
    }
}

/// Escape-time Julia set for z^2 + c
pub struct Julia {
    pub c: (f32, f32),
    pub max_iter: usize,
    pub x_range: f32,
    pub y_range: f32,
}

impl Drawing for Julia {
    fn name(&self) -> &'static str {
        "julia"
    }

    fn draw(&self, canvas: &mut Canvas, _rng: &mut StdRng) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        for py in 0..canvas.height() {
            for px in 0..canvas.width() {
                let mut zr = (px as f32 / w * 2.0 - 1.0) * self.x_range;
                let mut zi = (py as f32 / h * 2.0 - 1.0) * self.y_range;
                let mut iter = 0;
                while iter < self.max_iter && zr * zr + zi * zi <= 4.0 {
                    let next = zr * zr - zi * zi + self.c.0;
                    zi = 2.0 * zr * zi + self.c.1;
                    zr = next;
                    iter += 1;
                }
                if iter < self.max_iter && iter > 1 {
                    let color = canvas.palette(iter);
                    canvas.put(px as i64, py as i64, color);
                }
            }
        }
    }
}

/// Randomly placed stroked circles
pub struct RandCircle {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Drawing for RandCircle {
    fn name(&self) -> &'static str {
        "randcicle"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        for i in 0..self.count {
            let cx = rng.gen_range(0.0..w);
            let cy = rng.gen_range(0.0..h);
            let r = rng.gen_range(self.min_radius..self.max_radius.max(self.min_radius + 1.0));
            let color = canvas.palette(i);
            canvas.fill_circle(cx, cy, r, color, 0.2);
            canvas.stroke_circle(cx, cy, r, color, 0.9);
        }
    }
}

/// Jittered concentric rings around the center
pub struct BlackHole {
    pub rings: usize,
    pub radius: f32,
    pub noise: f32,
}

impl Drawing for BlackHole {
    fn name(&self) -> &'static str {
        "blackhole"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let (cx, cy) = (canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0);
        let max_r = self.radius.min(cx.min(cy) * 0.95);
        let line = canvas.config().line_color;
        for ring in 0..self.rings {
            let base = max_r * (ring as f32 + 1.0) / self.rings as f32;
            let points = 90;
            let mut prev: Option<(f32, f32)> = None;
            let mut first = (0.0, 0.0);
            for p in 0..points {
                let theta = p as f32 / points as f32 * TAU;
                let jitter = 1.0 + rng.gen_range(-1.0..1.0) * self.noise * ring as f32 / 10.0;
                let point = (cx + base * jitter * theta.cos(), cy + base * jitter * theta.sin());
                match prev {
                    Some((x, y)) => canvas.line(x, y, point.0, point.1, line, 0.15),
                    None => first = point,
                }
                prev = Some(point);
            }
            if let Some((x, y)) = prev {
                canvas.line(x, y, first.0, first.1, line, 0.15);
            }
        }
    }
}

/// Two mirrored stacks of half-discs
pub struct Janus {
    pub layers: usize,
    pub decay: f32,
}

impl Drawing for Janus {
    fn name(&self) -> &'static str {
        "janus"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let (cx, cy) = (canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0);
        let mut radius = cx.min(cy) * 0.9;
        for layer in 0..self.layers {
            let left = canvas.palette(layer);
            let right = canvas.palette(layer + 2);
            let offset = rng.gen_range(0.0..self.decay);
            for y in (cy - radius) as i64..=(cy + radius) as i64 {
                for x in (cx - radius) as i64..=(cx + radius) as i64 {
                    let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                    if dx * dx + dy * dy > radius * radius {
                        continue;
                    }
                    if dx < 0.0 {
                        canvas.blend(x - offset as i64, y, left, 0.6);
                    } else {
                        canvas.blend(x + offset as i64, y, right, 0.6);
                    }
                }
            }
            radius -= self.decay * 2.0;
            if radius <= 0.0 {
                break;
            }
        }
    }
}

/// Scattered rectangles and circles
pub struct RandomShape {
    pub shapes: usize,
}

impl Drawing for RandomShape {
    fn name(&self) -> &'static str {
        "random"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        for _ in 0..self.shapes {
            let color = canvas.palette(rng.gen_range(0..canvas.config().palette.len().max(1)));
            let x = rng.gen_range(0.0..w);
            let y = rng.gen_range(0.0..h);
            let size = rng.gen_range(4.0..40.0);
            if rng.gen_bool(0.5) {
                canvas.fill_rect(x, y, size, size * rng.gen_range(0.5..2.0), color, 0.7);
            } else {
                canvas.fill_circle(x, y, size / 2.0, color, 0.7);
            }
        }
    }
}

/// Grid of translucent overlapping circles
pub struct SilkSky {
    pub columns: usize,
    pub rows: usize,
}

impl Drawing for SilkSky {
    fn name(&self) -> &'static str {
        "silksky"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let cell_w = canvas.width() as f32 / self.columns.max(1) as f32;
        let cell_h = canvas.height() as f32 / self.rows.max(1) as f32;
        for row in 0..self.rows {
            for col in 0..self.columns {
                let cx = (col as f32 + 0.5) * cell_w;
                let cy = (row as f32 + 0.5) * cell_h;
                let r = cell_w.max(cell_h) * rng.gen_range(0.6..1.2);
                let color = canvas.palette(row + col);
                canvas.fill_circle(cx, cy, r, color, 0.08);
            }
        }
    }
}

/// Circles built from radial strokes
pub struct ColorCircle {
    pub circles: usize,
}

impl Drawing for ColorCircle {
    fn name(&self) -> &'static str {
        "circles"
    }

    fn draw(&self, canvas: &mut Canvas, rng: &mut StdRng) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        for i in 0..self.circles {
            let cx = rng.gen_range(0.0..w);
            let cy = rng.gen_range(0.0..h);
            let r = rng.gen_range(10.0..60.0);
            let color = canvas.palette(i);
            let spokes = 24;
            for s in 0..spokes {
                let theta = s as f32 / spokes as f32 * TAU + rng.gen_range(0.0..PI / 12.0);
                canvas.line(cx, cy, cx + r * theta.cos(), cy + r * theta.sin(), color, 0.5);
            }
        }
    }
}
