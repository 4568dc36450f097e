/// Linviz Core Library - Linear transformation state engine
///
/// This library applies 3×3 matrices to a unit cube, a basis triad and a
/// coordinate grid, animates between the before and after poses, models an
/// orbit camera, and hands matrices from input surfaces to the simulation tick.

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mailbox;
pub mod math;
pub mod parse;
pub mod presets;
pub mod transform;
pub mod visualizer;

// Re-export commonly used types
pub use animation::{ease, AnimationDriver};
pub use camera::{OrbitCamera, ScreenPoint, ScreenProjector};
pub use config::VisualizerConfig;
pub use error::{ConfigError, GeometryError, InvalidMatrixError, LinvizError, ParseError};
pub use geometry::{BasisTriad, Cube, GeometrySet, GridLines, LineSegment};
pub use mailbox::{MatrixMailbox, MatrixPublisher};
pub use parse::{format_matrix, parse_matrix};
pub use presets::Preset;
pub use transform::{classify, Classification, TransformationModel};
pub use visualizer::Visualizer;
