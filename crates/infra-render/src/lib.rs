// Genart Infrastructure - Rendering Adapter
// Implements: ArtifactProducer (procedural drawings encoded as PNG)

pub mod canvas;
pub mod drawings;
pub mod placeholder;
pub mod producer;

pub use canvas::{Canvas, CanvasConfig};
pub use drawings::{default_drawings, Drawing};
pub use placeholder::{render_loading_placeholder, PLACEHOLDER_MEDIA_TYPE};
pub use producer::PngArtifactProducer;
