pub mod climb_controller;
pub mod collision;
pub mod constants;
pub mod controller;
pub mod events;
pub mod input;
pub mod layers;
pub mod ledge;
pub mod ledge_detection_manager;
pub mod ledge_detector;
pub mod math;
pub mod rig;
pub mod scheduler;
pub mod wall_climber;

#[cfg(test)]
mod testing;

pub use climb_controller::{ClimbController, ClimbControllerConfig, ClimbState};
pub use collision::{
    ColliderShapeDef, ShapeCastService, StaticWorld, Transform, Vec2, Vec3, WorldStaticDef,
};
pub use controller::{ControllerConfig, FirstPersonController, MovementState};
pub use events::{ControllerEvent, EventBus, FootSoundType, LedgeDetection};
pub use input::InputSnapshot;
pub use layers::{CollisionLayer, LayerMask};
pub use ledge::{GeometryError, LedgePoint, LedgeType};
pub use ledge_detection_manager::{LedgeDetectionConfig, LedgeDetectionManager};
pub use ledge_detector::{LedgeDetector, LedgeDetectorConfig};
pub use rig::{ParkourRig, RigConfig};
pub use scheduler::{Scheduler, TaskHandle};
pub use wall_climber::{WallClimber, WallClimberConfig};
