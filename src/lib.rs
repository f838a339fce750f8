// laser-planner: look-ahead motion planning and cycle time estimation for two-axis laser machines

pub mod config;
pub mod motion;
pub mod path;

pub use config::{Config, ConfigError, load_config};
pub use motion::{
    JunctionPoint, KinematicPrimitive, MachineSettings, MotionPlan, MotionPlanner, PlanError, Timeline, Vector2,
    Waypoint, plan,
};
pub use path::{PathError, load_path};
