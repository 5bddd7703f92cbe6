use super::core::Camera;
use crate::input::InputListener;

/// Drives a [`Camera`] from latched input.
///
/// The camera owns its navigator. Each frame [`Camera::update`] detaches
/// the navigator and passes `&mut Camera` to [`update`](Self::update), so
/// the navigator never holds a long-lived reference to its camera.
pub trait CameraNavigator: InputListener {
    /// Called once when the navigator is installed on `camera`.
    fn on_attach(&mut self, camera: &Camera);

    /// Apply one frame of navigation to `camera`. The view is rebuilt by
    /// the camera after this returns.
    fn update(&mut self, camera: &mut Camera, delta_time: f32);
}
