use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::KernelError;
use crate::math::{Vector3, SMALL_NUMBER};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and initial pose.
pub struct CameraOptions {
    /// Viewport aspect ratio (width / height).
    #[schemars(skip)]
    pub aspect_ratio: f32,
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 20.0, max = 120.0),
        extend("step" = 1.0)
    )]
    pub fov: f32,
    /// Near clipping plane distance.
    #[schemars(title = "Near Plane", range(min = 0.01, max = 100.0))]
    pub near: f32,
    /// Far clipping plane distance.
    #[schemars(title = "Far Plane", range(min = 1.0, max = 100_000.0))]
    pub far: f32,
    /// Yaw about a fixed world axis instead of the current up axis.
    #[schemars(title = "Fixed Yaw Axis")]
    pub yaw_fixed: bool,
    /// Initial eye position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Initial view direction; normalized on use.
    #[schemars(skip)]
    pub direction: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: 1024.0 / 768.0,
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            yaw_fixed: true,
            position: [0.0, 0.0, 0.0],
            direction: [0.0, 0.0, -1.0],
        }
    }
}

impl CameraOptions {
    /// Reject a projection the camera would refuse, a non-finite position,
    /// or a direction that cannot be normalized.
    pub fn validate(&self) -> Result<(), KernelError> {
        Camera::validate_projection(
            self.aspect_ratio,
            self.fov,
            self.near,
            self.far,
        )?;
        let position = Vector3::from(self.position);
        if position.contains_nan() {
            return Err(KernelError::InvalidOptions(format!(
                "camera.position must be finite, got {position}"
            )));
        }
        let direction = Vector3::from(self.direction);
        if direction.safe_normal(SMALL_NUMBER).is_zero() {
            return Err(KernelError::InvalidOptions(format!(
                "camera.direction must be a finite non-zero vector, \
                 got {direction}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CameraOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_pose() {
        let zero_direction = CameraOptions {
            direction: [0.0, 0.0, 0.0],
            ..CameraOptions::default()
        };
        assert!(matches!(
            zero_direction.validate(),
            Err(KernelError::InvalidOptions(_))
        ));

        let nan_position = CameraOptions {
            position: [f32::NAN, 0.0, 0.0],
            ..CameraOptions::default()
        };
        assert!(nan_position.validate().is_err());
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let options = CameraOptions {
            near: 10.0,
            far: 1.0,
            ..CameraOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(KernelError::InvalidProjection(_))
        ));
    }
}
