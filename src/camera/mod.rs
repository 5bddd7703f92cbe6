//! Camera system: an orthonormal view basis, perspective projection, and
//! pluggable navigation.
//!
//! [`Camera`] owns at most one [`CameraNavigator`]. Each frame
//! [`Camera::update`] runs the navigator, then rebuilds the view matrix from
//! the pose.

/// Core camera struct and GPU uniform types.
pub mod core;
/// WASD + mouse-look navigator.
pub mod free_flight;
/// Navigator trait.
pub mod navigator;

pub use self::core::{Camera, CameraUniform, ProjectionType};
pub use free_flight::FreeFlightNavigator;
pub use navigator::CameraNavigator;
