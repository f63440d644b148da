// PNG artifact producer
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use genart_core::domain::{ArtifactHandle, GeneratorName};
use genart_core::port::{ArtifactProducer, ProduceError};

use crate::canvas::{Canvas, CanvasConfig};
use crate::drawings::{default_drawings, Drawing};

/// Renders procedural drawings to PNG files under one output directory
pub struct PngArtifactProducer {
    output_dir: PathBuf,
    canvas: CanvasConfig,
    drawings: HashMap<&'static str, Box<dyn Drawing>>,
}

impl PngArtifactProducer {
    /// Create a producer with every built-in drawing
    ///
    /// # Arguments
    /// * `output_dir` - Directory artifacts are written to (created if missing)
    /// * `canvas` - Size and colors for every render
    ///
    /// # Example
    /// ```ignore
    /// let producer = PngArtifactProducer::new("./generated", CanvasConfig::default())?;
    /// let handle = producer.produce("maze")?;
    /// ```
    pub fn new(output_dir: impl Into<PathBuf>, canvas: CanvasConfig) -> io::Result<Self> {
        Self::with_drawings(output_dir, canvas, default_drawings())
    }

    pub fn with_drawings(
        output_dir: impl Into<PathBuf>,
        canvas: CanvasConfig,
        drawings: Vec<Box<dyn Drawing>>,
    ) -> io::Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        let drawings = drawings.into_iter().map(|d| (d.name(), d)).collect();
        Ok(Self {
            output_dir,
            canvas,
            drawings,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ArtifactProducer for PngArtifactProducer {
    fn generators(&self) -> Vec<GeneratorName> {
        let mut names: Vec<GeneratorName> = self.drawings.keys().map(|n| n.to_string()).collect();
        names.sort();
        names
    }

    fn produce(&self, generator: &str) -> Result<ArtifactHandle, ProduceError> {
        let drawing = self
            .drawings
            .get(generator)
            .ok_or_else(|| ProduceError::UnknownGenerator(generator.to_string()))?;

        let mut rng = StdRng::from_entropy();
        let mut canvas = Canvas::new(&self.canvas);
        drawing.draw(&mut canvas, &mut rng);

        // Random suffix keeps concurrent renders of the same generator apart
        let file_name = format!("{}_{:016x}.png", generator, rng.gen::<u64>());
        let path = self.output_dir.join(file_name);
        canvas
            .into_image()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(io) => ProduceError::from(io),
                other => ProduceError::Encode(other.to_string()),
            })?;

        debug!(generator, path = %path.display(), "Rendered artifact");
        Ok(ArtifactHandle::new(path))
    }
}
