use std::fmt;

use super::navigator::CameraNavigator;
use crate::error::KernelError;
use crate::input::{InputKind, InputListener, NavInput};
use crate::math::{Matrix4, Quaternion, Vector3, SMALL_NUMBER};
use crate::options::CameraOptions;

/// Projection model used by [`Camera::project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionType {
    /// Perspective frustum built from aspect ratio, FOV and clip planes.
    #[default]
    Perspective,
    /// Orthographic projection. Not implemented: requesting it leaves the
    /// projection matrix unchanged.
    Orthogonal,
}

/// Perspective camera with an orthonormal view basis and an optional
/// navigator that drives it each frame.
///
/// The pose is `position` plus a unit `direction`; the right/up triad is
/// re-derived from them with Gram-Schmidt on every rebuild, so repeated
/// incremental rotation cannot drift the basis away from orthonormal.
pub struct Camera {
    position: Vector3,
    direction: Vector3,
    right: Vector3,
    up: Vector3,

    aspect_ratio: f32,
    fov: f32,
    near: f32,
    far: f32,
    projection_type: ProjectionType,

    view: Matrix4,
    proj: Matrix4,
    view_valid: bool,

    yaw_fixed: bool,
    yaw_axis: Vector3,

    navigator: Option<Box<dyn CameraNavigator>>,
}

/// Largest elevation above or below the horizon that [`Camera::pitch`]
/// reaches in fixed-yaw mode (89.9°, in radians).
const MAX_PITCH: f32 = 1.569_051;

impl Camera {
    /// Reject projection parameters that would produce a non-finite or
    /// inverted frustum.
    pub fn validate_projection(
        ratio: f32,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Result<(), KernelError> {
        let invalid = |msg: String| Err(KernelError::InvalidProjection(msg));
        let finite = [ratio, fov, near, far].iter().all(|v| v.is_finite());
        if !finite {
            return invalid(format!(
                "non-finite parameters \
                 (ratio {ratio}, fov {fov}, near {near}, far {far})"
            ));
        }
        if ratio <= 0.0 {
            return invalid(format!(
                "aspect ratio must be positive, got {ratio}"
            ));
        }
        if fov <= 0.0 || fov >= 180.0 {
            return invalid(format!(
                "field of view must be in (0, 180) degrees, got {fov}"
            ));
        }
        if near <= 0.0 {
            return invalid(format!("near plane must be positive, got {near}"));
        }
        if near >= far {
            return invalid(format!(
                "near plane {near} must be closer than far plane {far}"
            ));
        }
        Ok(())
    }

    /// Camera at the origin looking down −Z with world up +Y, in fixed-yaw
    /// mode about +Y.
    ///
    /// `fov` is the vertical field of view in degrees. The projection and
    /// view matrices are built immediately.
    pub fn new(
        ratio: f32,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, KernelError> {
        Self::validate_projection(ratio, fov, near, far)?;
        let mut camera = Self {
            position: Vector3::ZERO,
            direction: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::X_AXIS,
            up: Vector3::UP,
            aspect_ratio: ratio,
            fov,
            near,
            far,
            projection_type: ProjectionType::Perspective,
            view: Matrix4::IDENTITY,
            proj: Matrix4::IDENTITY,
            view_valid: false,
            yaw_fixed: true,
            yaw_axis: Vector3::UP,
            navigator: None,
        };
        camera.project(ProjectionType::Perspective);
        camera.rebuild_view();
        Ok(camera)
    }

    /// Camera configured from options (projection, pose, yaw mode).
    ///
    /// The options are validated first, so a zero or non-finite direction
    /// is an error rather than a silently ignored pose. The view is rebuilt
    /// from the final pose before returning.
    pub fn from_options(
        options: &CameraOptions,
    ) -> Result<Self, KernelError> {
        options.validate()?;
        let mut camera = Self::new(
            options.aspect_ratio,
            options.fov,
            options.near,
            options.far,
        )?;
        camera.yaw_fixed = options.yaw_fixed;
        camera.position = options.position.into();
        camera.direction =
            Vector3::from(options.direction).safe_normal(SMALL_NUMBER);
        camera.rebuild_view();
        Ok(camera)
    }

    // ── Per-frame update ────────────────────────────────────────────────

    /// Advance one frame: run the attached navigator, then rebuild the view
    /// basis and matrix from the resulting pose.
    ///
    /// The navigator is detached for the duration of its own update and
    /// receives `&mut Camera` as its back-reference.
    pub fn update(&mut self, delta_time: f32) {
        if let Some(mut navigator) = self.navigator.take() {
            navigator.update(self, delta_time);
            if self.navigator.is_none() {
                self.navigator = Some(navigator);
            } else {
                log::warn!(
                    "navigator replaced itself during update; \
                     keeping the replacement"
                );
            }
        }
        self.rebuild_view();
    }

    /// Re-derive the orthonormal triad from the direction and rebuild the
    /// view matrix. Does not run the navigator.
    ///
    /// `z = normalize(−direction)`, `x = normalize(ref_up × z)`,
    /// `y = z × x`, where `ref_up` is the yaw axis in fixed-yaw mode and the
    /// current up vector otherwise. When `ref_up` is parallel to the view
    /// direction the previous right axis (projected off `z`) is used, then
    /// the world axes.
    pub fn rebuild_view(&mut self) {
        let z_axis = (-self.direction).safe_normal(SMALL_NUMBER);
        if z_axis.is_zero() {
            log::error!(
                "camera direction is degenerate ({}); view left unchanged",
                self.direction
            );
            return;
        }

        let reference_up = if self.yaw_fixed {
            self.yaw_axis
        } else {
            self.up
        };
        let mut x_axis = (reference_up ^ z_axis).safe_normal(SMALL_NUMBER);
        if x_axis.is_zero() {
            x_axis = self.fallback_right(z_axis);
            log::warn!(
                "view direction {} is parallel to up {}; \
                 using fallback right axis {}",
                self.direction,
                reference_up,
                x_axis
            );
        }
        let y_axis = z_axis ^ x_axis;

        self.right = x_axis;
        self.up = y_axis;
        self.direction = -z_axis;
        self.view =
            Matrix4::view_from_basis(x_axis, y_axis, z_axis, self.position);
        self.view_valid = true;
    }

    /// First of (previous right, world X, world Z) that survives projection
    /// off `z_axis`.
    fn fallback_right(&self, z_axis: Vector3) -> Vector3 {
        [self.right, Vector3::X_AXIS, Vector3::Z_AXIS]
            .into_iter()
            .map(|candidate| {
                (candidate - z_axis * (candidate | z_axis))
                    .safe_normal(SMALL_NUMBER)
            })
            .find(|candidate| !candidate.is_zero())
            .unwrap_or(Vector3::X_AXIS)
    }

    /// Rebuild the projection matrix for `projection_type` from the stored
    /// aspect ratio, FOV and clip planes.
    ///
    /// [`ProjectionType::Orthogonal`] is not implemented: the call is
    /// recorded, a warning is logged, and the projection matrix keeps its
    /// previous value.
    pub fn project(&mut self, projection_type: ProjectionType) {
        self.projection_type = projection_type;
        match projection_type {
            ProjectionType::Perspective => {
                self.proj = Matrix4::perspective(
                    self.aspect_ratio,
                    self.fov,
                    self.near,
                    self.far,
                );
            }
            ProjectionType::Orthogonal => {
                log::warn!(
                    "orthogonal projection is not implemented; \
                     projection matrix unchanged"
                );
            }
        }
    }

    // ── Movement & rotation ─────────────────────────────────────────────

    /// Translate the eye by `delta`. The view is rebuilt on the next
    /// [`update`](Self::update). A non-finite delta is ignored.
    pub fn move_by(&mut self, delta: Vector3) {
        if delta.contains_nan() {
            log::warn!("ignoring non-finite camera move {delta}");
            return;
        }
        self.position += delta;
        self.view_valid = false;
    }

    /// Rotate about the current right axis (radians).
    ///
    /// In fixed-yaw mode the elevation is clamped to ±89.9° from the plane
    /// perpendicular to the yaw axis, so pitching over the pole stops short
    /// instead of flipping the view upside down. A pose already past the
    /// limit (from [`set_direction`](Self::set_direction)) may pitch back
    /// toward the horizon. Free mode pitches without limit.
    pub fn pitch(&mut self, angle: f32) {
        let angle = if self.yaw_fixed {
            let elevation =
                (self.direction | self.yaw_axis).clamp(-1.0, 1.0).asin();
            let limit = MAX_PITCH.max(elevation.abs());
            (elevation + angle).clamp(-limit, limit) - elevation
        } else {
            angle
        };
        self.rotate(self.right, angle);
    }

    /// Rotate about the fixed yaw axis, or about the current up axis when
    /// yaw is not fixed (radians).
    pub fn yaw(&mut self, angle: f32) {
        let axis = if self.yaw_fixed { self.yaw_axis } else { self.up };
        self.rotate(axis, angle);
    }

    /// Rotate about the view direction (radians). In fixed-yaw mode the
    /// rebuild re-levels the camera against the yaw axis, so roll does not
    /// persist.
    pub fn roll(&mut self, angle: f32) {
        self.rotate(self.direction, angle);
    }

    /// Rotate the pose by `angle` radians about `axis`. A degenerate axis is
    /// ignored.
    pub fn rotate(&mut self, axis: Vector3, angle: f32) {
        let axis = axis.safe_normal(SMALL_NUMBER);
        if axis.is_zero() {
            log::warn!("camera rotation about a zero axis ignored");
            return;
        }
        self.rotate_quat(Quaternion::from_axis_angle(axis, angle));
    }

    /// Rotate the pose by a unit quaternion and rebuild the view.
    pub fn rotate_quat(&mut self, rotation: Quaternion) {
        self.direction = rotation.rotate_vector(self.direction);
        self.up = rotation.rotate_vector(self.up);
        self.right = rotation.rotate_vector(self.right);
        self.rebuild_view();
    }

    /// Point the camera at `target` and rebuild the view. Ignored when the
    /// target coincides with the eye.
    pub fn look_at(&mut self, target: Vector3) {
        self.set_direction(target - self.position);
    }

    // ── Navigator ownership ─────────────────────────────────────────────

    /// Install a navigator. The previous one, if any, is dropped first and a
    /// warning is logged. `None` is rejected and leaves the camera as it
    /// was.
    pub fn set_controller(
        &mut self,
        navigator: Option<Box<dyn CameraNavigator>>,
    ) -> Result<(), KernelError> {
        let Some(mut navigator) = navigator else {
            log::error!(
                "set_controller called without a navigator; camera unchanged"
            );
            return Err(KernelError::MissingNavigator);
        };
        if let Some(previous) = self.navigator.take() {
            log::warn!("replacing the attached camera navigator");
            drop(previous);
        }
        navigator.on_attach(self);
        self.navigator = Some(navigator);
        Ok(())
    }

    /// Detach and return the navigator.
    pub fn take_controller(&mut self) -> Option<Box<dyn CameraNavigator>> {
        self.navigator.take()
    }

    /// Whether a navigator is attached.
    #[must_use]
    pub fn has_controller(&self) -> bool {
        self.navigator.is_some()
    }

    /// The attached navigator.
    #[must_use]
    pub fn controller(&self) -> Option<&dyn CameraNavigator> {
        self.navigator.as_deref()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// View matrix (world → camera space).
    #[must_use]
    pub fn view(&self) -> Matrix4 {
        self.view
    }

    /// Projection matrix.
    #[must_use]
    pub fn proj(&self) -> Matrix4 {
        self.proj
    }

    /// `view * proj`: world space straight to clip space.
    #[must_use]
    pub fn view_proj(&self) -> Matrix4 {
        self.view * self.proj
    }

    /// Eye position.
    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Unit view direction.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Alias of [`direction`](Self::direction).
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.direction
    }

    /// Unit right axis.
    #[must_use]
    pub fn right(&self) -> Vector3 {
        self.right
    }

    /// Unit up axis.
    #[must_use]
    pub fn up(&self) -> Vector3 {
        self.up
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Near clip distance.
    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance.
    #[must_use]
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Width / height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Projection type of the last [`project`](Self::project) call.
    #[must_use]
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Whether yaw uses the fixed axis.
    #[must_use]
    pub fn is_yaw_fixed(&self) -> bool {
        self.yaw_fixed
    }

    /// Axis used for yaw in fixed mode.
    #[must_use]
    pub fn yaw_axis(&self) -> Vector3 {
        self.yaw_axis
    }

    /// Whether the view matrix reflects the current position.
    #[must_use]
    pub fn is_view_valid(&self) -> bool {
        self.view_valid
    }

    // ── Mutators ────────────────────────────────────────────────────────

    /// Move the eye to `position`. The view is rebuilt on the next update.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.view_valid = false;
    }

    /// Set the view direction (normalized here) and rebuild the view. Zero
    /// or non-finite directions are ignored.
    pub fn set_direction(&mut self, direction: Vector3) {
        let direction = direction.safe_normal(SMALL_NUMBER);
        if direction.is_zero() {
            log::warn!("ignoring degenerate camera direction");
            return;
        }
        self.direction = direction;
        self.rebuild_view();
    }

    /// Choose between fixed-axis yaw (no roll drift) and current-up yaw
    /// (free-flight roll).
    pub fn set_yaw_fixed(&mut self, fixed: bool) {
        self.yaw_fixed = fixed;
    }

    /// Set the fixed yaw axis. Zero axes are ignored.
    pub fn set_yaw_fixed_axis(&mut self, axis: Vector3) {
        let axis = axis.safe_normal(SMALL_NUMBER);
        if axis.is_zero() {
            log::warn!("ignoring zero yaw axis");
            return;
        }
        self.yaw_axis = axis;
    }

    /// Override the view matrix. The next pose rebuild replaces it.
    pub fn set_view(&mut self, view: Matrix4) {
        self.view = view;
    }

    /// Override the projection matrix. The next
    /// [`project`](Self::project) replaces it.
    pub fn set_proj(&mut self, proj: Matrix4) {
        self.proj = proj;
    }

    /// Mark the view stale without moving.
    pub fn invalidate_view(&mut self) {
        self.view_valid = false;
    }

    /// Store new projection parameters. Takes effect on the next
    /// [`project`](Self::project).
    pub fn set_projection_params(
        &mut self,
        ratio: f32,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Result<(), KernelError> {
        Self::validate_projection(ratio, fov, near, far)?;
        self.aspect_ratio = ratio;
        self.fov = fov;
        self.near = near;
        self.far = far;
        Ok(())
    }

    /// Store a new aspect ratio.
    pub fn set_aspect_ratio(
        &mut self,
        ratio: f32,
    ) -> Result<(), KernelError> {
        self.set_projection_params(ratio, self.fov, self.near, self.far)
    }

    /// Store a new vertical FOV in degrees.
    pub fn set_fov(&mut self, fov: f32) -> Result<(), KernelError> {
        let (ratio, near, far) = (self.aspect_ratio, self.near, self.far);
        self.set_projection_params(ratio, fov, near, far)
    }

    /// Store a new near plane.
    pub fn set_near(&mut self, near: f32) -> Result<(), KernelError> {
        let (ratio, fov, far) = (self.aspect_ratio, self.fov, self.far);
        self.set_projection_params(ratio, fov, near, far)
    }

    /// Store a new far plane.
    pub fn set_far(&mut self, far: f32) -> Result<(), KernelError> {
        let (ratio, fov, near) = (self.aspect_ratio, self.fov, self.near);
        self.set_projection_params(ratio, fov, near, far)
    }

    /// Adapt to a new viewport size and re-project. Zero-sized viewports
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return;
        }
        if self.set_aspect_ratio(width as f32 / height as f32).is_ok() {
            self.project(self.projection_type);
        }
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("right", &self.right)
            .field("up", &self.up)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("fov", &self.fov)
            .field("near", &self.near)
            .field("far", &self.far)
            .field("projection_type", &self.projection_type)
            .field("yaw_fixed", &self.yaw_fixed)
            .field("has_navigator", &self.navigator.is_some())
            .finish_non_exhaustive()
    }
}

/// A camera forwards navigation input to its navigator, and accepts none
/// when it has no navigator.
impl InputListener for Camera {
    fn capabilities(&self) -> &[InputKind] {
        match self.navigator.as_deref() {
            Some(navigator) => navigator.capabilities(),
            None => &[],
        }
    }

    fn handle_input(&mut self, input: &NavInput) -> bool {
        self.navigator.as_deref_mut().is_some_and(|navigator| {
            navigator.accepts(input.kind()) && navigator.handle_input(input)
        })
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera
/// metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix, row-major row-vector layout (reads
    /// as a column-major matrix in WGSL/GLSL).
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction for lighting.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::IDENTITY.to_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
            forward: [0.0, 0.0, -1.0],
            fov: 60.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.view_proj().to_array_2d();
        self.position = camera.position().to_array();
        self.aspect = camera.aspect_ratio();
        self.forward = camera.forward().to_array();
        self.fov = camera.fov();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::math::Vector4;

    const EPS: f32 = 1e-4;

    fn camera() -> Camera {
        Camera::new(1.0, 90.0, 1.0, 100.0).unwrap()
    }

    fn assert_orthonormal(camera: &Camera) {
        let (x, y, z) = (camera.right(), camera.up(), -camera.direction());
        assert!((x.size() - 1.0).abs() < EPS, "|right| = {}", x.size());
        assert!((y.size() - 1.0).abs() < EPS, "|up| = {}", y.size());
        assert!((z.size() - 1.0).abs() < EPS, "|dir| = {}", z.size());
        assert!((x | y).abs() < EPS);
        assert!((y | z).abs() < EPS);
        assert!((z | x).abs() < EPS);
        // Right-handed.
        assert!((x ^ y).equals(&z, 1e-3));
    }

    /// Records attach/update calls through shared counters.
    struct Recorder {
        attached: Rc<Cell<u32>>,
        updates: Rc<Cell<u32>>,
        step: Vector3,
    }

    impl InputListener for Recorder {
        fn capabilities(&self) -> &[InputKind] {
            &[InputKind::Pointer]
        }

        fn handle_input(&mut self, _input: &NavInput) -> bool {
            true
        }
    }

    impl CameraNavigator for Recorder {
        fn on_attach(&mut self, _camera: &Camera) {
            self.attached.set(self.attached.get() + 1);
        }

        fn update(&mut self, camera: &mut Camera, _delta_time: f32) {
            self.updates.set(self.updates.get() + 1);
            camera.move_by(self.step);
        }
    }

    type Counter = Rc<Cell<u32>>;

    fn recorder(step: Vector3) -> (Box<Recorder>, Counter, Counter) {
        let attached = Rc::new(Cell::new(0));
        let updates = Rc::new(Cell::new(0));
        let recorder = Recorder {
            attached: Rc::clone(&attached),
            updates: Rc::clone(&updates),
            step,
        };
        (Box::new(recorder), attached, updates)
    }

    #[test]
    fn new_rejects_bad_projection() {
        assert!(Camera::new(1.0, 60.0, 10.0, 1.0).is_err());
        assert!(Camera::new(1.0, 60.0, 5.0, 5.0).is_err());
        assert!(Camera::new(0.0, 60.0, 1.0, 10.0).is_err());
        assert!(Camera::new(1.0, 180.0, 1.0, 10.0).is_err());
        assert!(Camera::new(1.0, 60.0, 0.0, 10.0).is_err());
        assert!(Camera::new(f32::NAN, 60.0, 1.0, 10.0).is_err());
        let err = Camera::new(1.0, 60.0, 10.0, 1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidProjection(_)));
    }

    #[test]
    fn new_camera_looks_down_negative_z() {
        let cam = camera();
        assert_eq!(cam.direction(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(cam.right(), Vector3::X_AXIS);
        assert_eq!(cam.up(), Vector3::UP);
        assert!(cam.view().equals(&Matrix4::IDENTITY, 1e-6));
        assert!(cam.is_view_valid());
        assert_orthonormal(&cam);
    }

    #[test]
    fn projection_uses_stored_parameters() {
        let cam = camera();
        let expected = Matrix4::perspective(1.0, 90.0, 1.0, 100.0);
        assert!(cam.proj().equals(&expected, 1e-6));
        assert_eq!(cam.projection_type(), ProjectionType::Perspective);
    }

    #[test]
    fn orthogonal_projection_is_a_noop() {
        let mut cam = camera();
        let before = cam.proj();
        cam.project(ProjectionType::Orthogonal);
        assert_eq!(cam.proj(), before);
        assert_eq!(cam.projection_type(), ProjectionType::Orthogonal);
    }

    #[test]
    fn projection_setters_take_effect_on_project() {
        let mut cam = camera();
        cam.set_fov(60.0).unwrap();
        let wide = Matrix4::perspective(1.0, 90.0, 1.0, 100.0);
        assert!(cam.proj().equals(&wide, 1e-6));
        cam.project(ProjectionType::Perspective);
        let narrow = Matrix4::perspective(1.0, 60.0, 1.0, 100.0);
        assert!(cam.proj().equals(&narrow, 1e-6));
        assert!(cam.set_near(200.0).is_err());
        assert_eq!(cam.near(), 1.0);
    }

    #[test]
    fn resize_updates_aspect_and_projection() {
        let mut cam = camera();
        cam.resize(1600, 800);
        assert_eq!(cam.aspect_ratio(), 2.0);
        assert!((cam.proj().m[0][0] - 0.5).abs() < 1e-6);
        cam.resize(0, 800);
        assert_eq!(cam.aspect_ratio(), 2.0);
    }

    #[test]
    fn move_then_update_translates_view() {
        let mut cam = camera();
        cam.set_position(Vector3::new(2.0, -1.0, 4.0));
        cam.yaw(0.3);
        cam.update(0.016);
        let p0 = cam.position();

        cam.move_by(Vector3::new(1.0, 0.0, 0.0));
        assert!(!cam.is_view_valid());
        cam.update(0.016);
        assert!(cam.is_view_valid());

        let p = cam.position();
        assert_eq!(p, p0 + Vector3::new(1.0, 0.0, 0.0));

        let view = cam.view();
        let (x, y, z) = (cam.right(), cam.up(), -cam.direction());
        assert!((view.m[3][0] - (-p | x)).abs() < EPS);
        assert!((view.m[3][1] - (-p | y)).abs() < EPS);
        assert!((view.m[3][2] - (-p | z)).abs() < EPS);

        // The eye maps to the camera-space origin.
        let eye = view.transform_position(p);
        assert!(eye.equals(&Vector4::new(0.0, 0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn view_matches_look_at_for_same_pose() {
        let mut cam = camera();
        cam.set_position(Vector3::new(3.0, 2.0, 1.0));
        cam.set_yaw_fixed(true);
        let target = Vector3::new(-4.0, 0.0, 2.0);
        cam.look_at(target);
        let expected = Matrix4::look_at(cam.position(), target, Vector3::UP);
        assert!(cam.view().equals(&expected, EPS));
    }

    #[test]
    fn pitch_yaw_roll_rotate_direction() {
        let mut cam = camera();
        cam.yaw(FRAC_PI_2);
        assert!(cam.direction().equals(&Vector3::new(-1.0, 0.0, 0.0), EPS));

        let mut cam = camera();
        cam.pitch(FRAC_PI_2 * 0.5);
        let d = cam.direction();
        assert!(d.y > 0.7 && d.z < -0.7, "{d}");

        let mut cam = camera();
        cam.set_yaw_fixed(false);
        cam.roll(FRAC_PI_2);
        assert!(cam.direction().equals(&Vector3::new(0.0, 0.0, -1.0), EPS));
        assert!(cam.up().equals(&Vector3::X_AXIS, EPS));
        assert_orthonormal(&cam);
    }

    #[test]
    fn fixed_yaw_keeps_camera_level() {
        let mut cam = camera();
        assert!(cam.is_yaw_fixed());
        cam.roll(0.5);
        // Rebuilding against world up removes the roll.
        assert!(cam.right().y.abs() < EPS);
        cam.pitch(0.4);
        cam.yaw(1.3);
        assert!(cam.right().y.abs() < EPS);
        assert_orthonormal(&cam);
    }

    #[test]
    fn free_yaw_preserves_roll() {
        let mut cam = camera();
        cam.set_yaw_fixed(false);
        cam.roll(0.5);
        cam.update(0.016);
        assert!(cam.right().y.abs() > 0.4);
        assert_orthonormal(&cam);
    }

    #[test]
    fn many_small_rotations_stay_unit_length() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut cam = camera();
        for i in 0..10_000 {
            let a = rng.random_range(-0.01..0.01);
            match i % 3 {
                0 => cam.yaw(a),
                1 => cam.pitch(a),
                _ => cam.roll(a),
            }
        }
        assert!((cam.direction().size() - 1.0).abs() < 1e-4);
        assert_orthonormal(&cam);
        assert!(!cam.view().contains_nan());
    }

    #[test]
    fn looking_straight_up_uses_fallback_axis() {
        let mut cam = camera();
        cam.set_yaw_fixed(true);
        cam.set_direction(Vector3::UP);
        assert!(cam.direction().equals(&Vector3::UP, EPS));
        assert!(!cam.view().contains_nan());
        // The previous right axis is still perpendicular, so it survives.
        assert!(cam.right().equals(&Vector3::X_AXIS, EPS));
        assert_orthonormal(&cam);

        // Free mode rotates up along with the direction.
        let mut cam = camera();
        cam.set_yaw_fixed(false);
        cam.pitch(FRAC_PI_2);
        assert!(cam.direction().equals(&Vector3::UP, EPS));
        cam.update(0.016);
        assert_orthonormal(&cam);
    }

    #[test]
    fn degenerate_direction_is_ignored() {
        let mut cam = camera();
        cam.set_direction(Vector3::ZERO);
        cam.set_direction(Vector3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(cam.direction(), Vector3::new(0.0, 0.0, -1.0));
        cam.rotate(Vector3::ZERO, 1.0);
        assert_eq!(cam.direction(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn view_proj_is_view_then_proj() {
        let mut cam = camera();
        cam.set_position(Vector3::new(0.0, 0.0, 10.0));
        cam.update(0.0);
        assert_eq!(cam.view_proj(), cam.view() * cam.proj());
        let clip = cam.view_proj().transform_position(Vector3::ZERO);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn set_controller_none_is_rejected() {
        let mut cam = camera();
        let err = cam.set_controller(None).unwrap_err();
        assert!(matches!(err, KernelError::MissingNavigator));
        assert!(!cam.has_controller());

        let (nav, _, updates) = recorder(Vector3::ZERO);
        cam.set_controller(Some(nav)).unwrap();
        assert!(cam.set_controller(None).is_err());
        assert!(cam.has_controller());
        cam.update(0.1);
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn update_runs_navigator_before_rebuild() {
        let mut cam = camera();
        let (nav, attached, updates) = recorder(Vector3::new(0.0, 0.0, -1.0));
        cam.set_controller(Some(nav)).unwrap();
        assert_eq!(attached.get(), 1);

        cam.update(0.016);
        cam.update(0.016);
        assert_eq!(updates.get(), 2);
        assert_eq!(cam.position(), Vector3::new(0.0, 0.0, -2.0));
        assert!(cam.is_view_valid());
        let expected = -cam.position() | Vector3::Z_AXIS;
        assert!((cam.view().m[3][2] - expected).abs() < EPS);
    }

    #[test]
    fn replacing_controller_drops_the_old_one() {
        let mut cam = camera();
        let (first, _, first_updates) = recorder(Vector3::ZERO);
        let (second, second_attached, second_updates) =
            recorder(Vector3::ZERO);
        cam.set_controller(Some(first)).unwrap();
        cam.set_controller(Some(second)).unwrap();
        assert_eq!(second_attached.get(), 1);
        // Only the shared counters keep the old recorder's Rc alive now.
        assert_eq!(Rc::strong_count(&first_updates), 1);

        cam.update(0.016);
        assert_eq!(first_updates.get(), 0);
        assert_eq!(second_updates.get(), 1);

        assert!(cam.take_controller().is_some());
        assert!(!cam.has_controller());
    }

    #[test]
    fn camera_forwards_input_by_capability() {
        let mut cam = camera();
        let moved = NavInput::PointerMoved { x: 1.0, y: 1.0 };
        assert!(cam.capabilities().is_empty());
        assert!(!cam.handle_input(&moved));

        let (nav, _, _) = recorder(Vector3::ZERO);
        cam.set_controller(Some(nav)).unwrap();
        assert_eq!(cam.capabilities(), &[InputKind::Pointer]);
        assert!(cam.handle_input(&moved));
        let press = NavInput::Action {
            action: crate::input::NavAction::Look,
            pressed: true,
        };
        assert!(!cam.handle_input(&press));
    }

    #[test]
    fn from_options_applies_pose() {
        let options = CameraOptions {
            position: [1.0, 2.0, 3.0],
            direction: [0.0, 0.0, 2.0],
            yaw_fixed: true,
            ..CameraOptions::default()
        };
        let cam = Camera::from_options(&options).unwrap();
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(cam.position(), p);
        assert!(cam.direction().equals(&Vector3::Z_AXIS, EPS));
        assert!(cam.is_yaw_fixed());
        assert!(cam.is_view_valid());

        // The view already carries the configured eye, without an update.
        let view = cam.view();
        let (x, y, z) = (cam.right(), cam.up(), -cam.direction());
        assert!((view.m[3][0] - (-p | x)).abs() < EPS);
        assert!((view.m[3][1] - (-p | y)).abs() < EPS);
        assert!((view.m[3][2] - (-p | z)).abs() < EPS);
        let eye = view.transform_position(p);
        assert!(eye.equals(&Vector4::new(0.0, 0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn from_options_rejects_degenerate_direction() {
        for direction in [[0.0, 0.0, 0.0], [f32::NAN, 0.0, -1.0]] {
            let options = CameraOptions {
                position: [1.0, 2.0, 3.0],
                direction,
                ..CameraOptions::default()
            };
            let err = Camera::from_options(&options).unwrap_err();
            assert!(matches!(err, KernelError::InvalidOptions(_)), "{err}");
        }
    }

    #[test]
    fn fixed_yaw_pitch_stops_short_of_the_pole() {
        let mut cam = camera();
        cam.pitch(1.0);
        cam.pitch(1.0);
        let elevation = cam.direction().y.clamp(-1.0, 1.0).asin();
        assert!(elevation <= MAX_PITCH + 1e-3, "elevation {elevation}");
        assert!(elevation > 1.5);
        // Still facing -Z side with right unchanged: no flip over the top.
        assert!(cam.direction().z < 0.0);
        assert!(cam.right().equals(&Vector3::X_AXIS, EPS));
        assert!(cam.up().y > 0.0);

        cam.pitch(-4.0);
        let elevation = cam.direction().y.clamp(-1.0, 1.0).asin();
        assert!(elevation >= -MAX_PITCH - 1e-3, "elevation {elevation}");
        assert!(cam.right().equals(&Vector3::X_AXIS, EPS));
        assert_orthonormal(&cam);

        // Free mode keeps rotating through the pole.
        let mut cam = camera();
        cam.set_yaw_fixed(false);
        cam.pitch(2.0);
        assert!(cam.direction().z > 0.0);
    }

    #[test]
    fn non_finite_move_is_ignored() {
        let mut cam = camera();
        cam.move_by(Vector3::new(f32::NAN, 0.0, 1.0));
        cam.move_by(Vector3::new(0.0, f32::INFINITY, 0.0));
        assert_eq!(cam.position(), Vector3::ZERO);
        assert!(cam.is_view_valid());
    }

    #[test]
    fn uniform_tracks_camera() {
        let mut cam = camera();
        cam.set_position(Vector3::new(1.0, 2.0, 3.0));
        cam.update(0.0);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&cam);
        assert_eq!(uniform.position, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.forward, [0.0, 0.0, -1.0]);
        assert_eq!(uniform.view_proj, cam.view_proj().to_array_2d());
        assert_eq!(size_of::<CameraUniform>(), 96);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 96);
    }
}
