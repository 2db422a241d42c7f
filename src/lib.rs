pub mod assets;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod core;
pub mod logging;
pub mod traits;
pub mod types;
pub mod window;

pub use assets::SketchAssets;
pub use compositor::{Compositor, RenderError};
pub use config::SketchConfig;
pub use crate::core::{AnimationDriver, BrushPool, DriverState, PointerTracker, Route, SurfaceManager};
