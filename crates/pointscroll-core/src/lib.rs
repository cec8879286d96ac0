pub mod ambient;
pub mod animator;
pub mod camera;
pub mod constants;
pub mod device;
pub mod easing;
pub mod error;
pub mod generators;
pub mod loading;
pub mod motion;
pub mod points;
pub mod render;
pub mod resources;
pub mod sampler;
pub mod scene;
pub mod scroll;
pub mod shape;
pub mod timeline;
pub mod vertex_cache;

pub use animator::{Layer, ShapeAnimator, Transform, UpdateOutcome};
pub use camera::Camera;
pub use device::{DeviceProfile, ParticleBudget};
pub use error::{SampleError, ShapeError};
pub use generators::Geometry;
pub use loading::LoadQueue;
pub use motion::{AnimationKind, Choreography, MotionTable};
pub use points::{Bounds, PointCloud};
pub use render::{CloudKey, CloudRole, CloudView, FrameView, RenderSurface, Upload, UploadCache};
pub use resources::{RenderResources, Sprite};
pub use scene::{FrameOutcome, Scene, SceneConfig};
pub use scroll::{ScrollChannel, ScrollMetrics, ScrollSource, SubscriptionId};
pub use shape::{LoadState, ShapeId, ShapeSource, ShapeSpec};
pub use timeline::{AnimationWindow, ScrollLayout, WindowPhase};
