pub mod brush_pool;
pub mod clock;
pub mod driver;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod pointer;
pub mod surface;

pub use brush_pool::{BrushInstance, BrushParams, BrushPool, PoolError};
pub use clock::{AnimationClock, Clock, TimeMode};
pub use driver::{AnimationDriver, DriverState, Route, StartError};
pub use frame::FrameParams;
pub use gpu_context::GpuContext;
pub use input_adapter::{InputAction, WinitInput};
pub use pointer::PointerTracker;
pub use surface::{OrthoProjection, SurfaceManager};
