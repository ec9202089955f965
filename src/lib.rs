pub mod camera;
pub mod config;
pub mod error;
pub mod gz_service;
pub mod launch;
pub mod logging;
pub mod pose;

pub use error::CameraError;

/// Package the launch description and this crate's binaries belong to.
pub const PACKAGE_NAME: &str = "my_robot_sim";
/// Name the robot model is spawned under in the simulator.
pub const ROBOT_NAME: &str = "my_robot";
