//! Free-flight navigation: accelerate along the camera axes while movement
//! actions are held, damp to a stop when released, and turn the pointer
//! delta into yaw/pitch while look is held.

use super::core::Camera;
use super::navigator::CameraNavigator;
use crate::error::KernelError;
use crate::input::{InputKind, InputListener, NavAction, NavInput};
use crate::math::{Vector3, SMALL_NUMBER};
use crate::options::NavigatorOptions;

/// Latched action state, one flag per [`NavAction`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldActions {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fast: bool,
    look: bool,
}

impl HeldActions {
    fn set(&mut self, action: NavAction, pressed: bool) {
        let slot = match action {
            NavAction::MoveForward => &mut self.forward,
            NavAction::MoveBack => &mut self.back,
            NavAction::MoveLeft => &mut self.left,
            NavAction::MoveRight => &mut self.right,
            NavAction::MoveUp => &mut self.up,
            NavAction::MoveDown => &mut self.down,
            NavAction::FastMove => &mut self.fast,
            NavAction::Look => &mut self.look,
        };
        *slot = pressed;
    }

    /// Unnormalized sum of the camera axes selected by the movement flags.
    fn direction(self, camera: &Camera) -> Vector3 {
        let mut direction = Vector3::ZERO;
        let pairs = [
            (self.forward, camera.forward()),
            (self.back, -camera.forward()),
            (self.right, camera.right()),
            (self.left, -camera.right()),
            (self.up, camera.up()),
            (self.down, -camera.up()),
        ];
        for (held, axis) in pairs {
            if held {
                direction += axis;
            }
        }
        direction
    }
}

/// WASD-style free-flight navigator.
///
/// Input only latches state; all motion happens in
/// [`update`](CameraNavigator::update) so it is frame-rate independent.
#[derive(Debug, Clone)]
pub struct FreeFlightNavigator {
    held: HeldActions,
    velocity: Vector3,
    current_pointer: Option<(f32, f32)>,
    previous_pointer: Option<(f32, f32)>,
    options: NavigatorOptions,
}

impl Default for FreeFlightNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeFlightNavigator {
    /// Navigator with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            held: HeldActions::default(),
            velocity: Vector3::ZERO,
            current_pointer: None,
            previous_pointer: None,
            options: NavigatorOptions::default(),
        }
    }

    /// Navigator with the given tuning, rejected if
    /// [`NavigatorOptions::validate`] fails.
    pub fn from_options(
        options: NavigatorOptions,
    ) -> Result<Self, KernelError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    /// Current velocity in units/s.
    #[must_use]
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Tuning values.
    #[must_use]
    pub fn options(&self) -> &NavigatorOptions {
        &self.options
    }

    /// Replace the tuning values. Takes effect on the next update. Invalid
    /// tuning is rejected and the current values are kept.
    pub fn set_options(
        &mut self,
        options: NavigatorOptions,
    ) -> Result<(), KernelError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Drop all latched input and stop.
    pub fn reset(&mut self) {
        self.held = HeldActions::default();
        self.velocity = Vector3::ZERO;
        self.current_pointer = None;
        self.previous_pointer = None;
    }

    fn speed_cap(&self) -> f32 {
        if self.held.fast {
            self.options.max_speed * self.options.fast_multiplier
        } else {
            self.options.max_speed
        }
    }

    fn integrate_velocity(&mut self, direction: Vector3, delta_time: f32) {
        let direction = direction.safe_normal(SMALL_NUMBER);
        if direction.is_zero() {
            // Clamped so a long frame cannot reverse the velocity.
            let decay = (delta_time * self.options.damping).min(1.0);
            self.velocity -= self.velocity * decay;
        } else {
            let step = self.options.acceleration * delta_time;
            self.velocity += direction * step;
        }

        let cap = self.speed_cap();
        let speed = self.velocity.size();
        if speed > cap {
            self.velocity *= cap / speed;
        }

        if self.velocity.contains_nan() {
            log::error!("velocity became {}; stopping", self.velocity);
            self.velocity = Vector3::ZERO;
        } else if self.velocity.size_squared() < self.options.stop_threshold {
            self.velocity = Vector3::ZERO;
        }
    }

    /// Pointer motion since the last latched sample.
    fn pointer_delta(&self) -> Option<(f32, f32)> {
        let (px, py) = self.previous_pointer?;
        let (cx, cy) = self.current_pointer?;
        Some((cx - px, cy - py))
    }

    fn apply_look(&mut self, camera: &mut Camera) {
        let delta = self.pointer_delta().filter(|_| self.held.look);
        self.previous_pointer = self.current_pointer;

        let Some((dx, dy)) = delta else {
            return;
        };
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let sensitivity = self.options.look_sensitivity;
        camera.yaw(-dx * sensitivity);
        camera.pitch(-dy * sensitivity);
    }
}

impl InputListener for FreeFlightNavigator {
    fn capabilities(&self) -> &[InputKind] {
        &[InputKind::Action, InputKind::Pointer]
    }

    fn handle_input(&mut self, input: &NavInput) -> bool {
        match *input {
            NavInput::Action { action, pressed } => {
                self.held.set(action, pressed);
            }
            NavInput::PointerMoved { x, y } => {
                self.current_pointer = Some((x, y));
            }
        }
        true
    }
}

impl CameraNavigator for FreeFlightNavigator {
    fn on_attach(&mut self, camera: &Camera) {
        self.velocity = Vector3::ZERO;
        self.previous_pointer = self.current_pointer;
        log::debug!(
            "free-flight navigator attached at {}",
            camera.position()
        );
    }

    fn update(&mut self, camera: &mut Camera, delta_time: f32) {
        if !delta_time.is_finite() || delta_time < 0.0 {
            log::warn!("skipping navigator update, delta time {delta_time}");
            return;
        }
        let direction = self.held.direction(camera);
        self.integrate_velocity(direction, delta_time);
        if !self.velocity.is_zero() {
            camera.move_by(self.velocity * delta_time);
        }
        self.apply_look(camera);
    }
}
