//! Free-look perspective camera
//!
//! Stores pose (position, facing, up) and intrinsics (field of view, aspect
//! ratio, clip planes). View and projection matrices are recomputed from the
//! current state on every call; nothing is cached between mutations.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};
use crate::error::{ConfigError, ConfigResult, GeometryError, GeometryResult};

/// Squared length of `facing × up` below which the two are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-10;

pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Point3<f32>,
    facing: Vector3<f32>,
    up: Vector3<f32>,
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            facing: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            fov: DEFAULT_FOV_DEGREES,
            aspect_ratio: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Sets the vertical field of view in degrees.
    ///
    /// # Errors
    /// Rejects values outside the open interval (0, 180).
    pub fn set_fov(&mut self, fov: f32) -> ConfigResult<()> {
        if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
            return Err(ConfigError::InvalidFieldOfView(fov));
        }
        self.fov = fov;
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> ConfigResult<()> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ConfigError::InvalidAspectRatio(aspect_ratio));
        }
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    /// Updates the aspect ratio from framebuffer dimensions
    pub fn resize_projection(&mut self, width: u32, height: u32) -> ConfigResult<()> {
        if height == 0 {
            return Err(ConfigError::InvalidAspectRatio(f32::INFINITY));
        }
        self.set_aspect_ratio(width as f32 / height as f32)
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    /// Sets the near plane, which must stay in (0, far).
    pub fn set_near(&mut self, near: f32) -> ConfigResult<()> {
        self.set_clip_planes(near, self.far)
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Sets the far plane, which must stay beyond the near plane.
    pub fn set_far(&mut self, far: f32) -> ConfigResult<()> {
        self.set_clip_planes(self.near, far)
    }

    /// Sets both clip planes at once, so a range can move past the current one.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> ConfigResult<()> {
        if !near.is_finite() || !far.is_finite() || near <= 0.0 || far <= near {
            return Err(ConfigError::InvalidClipPlanes { near, far });
        }
        self.near = near;
        self.far = far;
        Ok(())
    }

    /// Camera position in world space
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Unit facing direction in world space
    pub fn facing(&self) -> Vector3<f32> {
        self.facing
    }

    /// Sets the facing direction. The stored vector is normalized.
    pub fn set_facing(&mut self, facing: Vector3<f32>) -> ConfigResult<()> {
        self.facing = checked_direction("facing", facing)?.normalize();
        Ok(())
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn set_up(&mut self, up: Vector3<f32>) -> ConfigResult<()> {
        self.up = checked_direction("up", up)?;
        Ok(())
    }

    /// Unit vector pointing to the camera's right, if the basis is well defined
    pub fn right(&self) -> GeometryResult<Vector3<f32>> {
        let right = self.facing.cross(self.up.normalize());
        if right.magnitude2() < PARALLEL_EPSILON {
            return Err(GeometryError::InvalidCameraOrientation);
        }
        Ok(right.normalize())
    }

    /// Right-handed look-at transform from world space into camera space.
    ///
    /// # Errors
    /// [`GeometryError::InvalidCameraOrientation`] when the facing direction
    /// is parallel to the up vector.
    pub fn compute_view_matrix(&self) -> GeometryResult<Matrix4<f32>> {
        self.right()?;
        Ok(Matrix4::look_at_rh(
            self.position,
            self.position + self.facing,
            self.up,
        ))
    }

    /// Right-handed perspective projection in the OpenGL clip convention.
    ///
    /// View-space z = -near maps to NDC z = -1 and z = -far to +1. Use
    /// [`Camera::to_uniform`] for the matrix handed to wgpu, which expects
    /// depth in [0, 1].
    pub fn compute_projection_matrix(&self) -> Matrix4<f32> {
        perspective(Deg(self.fov), self.aspect_ratio, self.near, self.far)
    }

    /// Packs the camera state into the GPU uniform layout
    pub fn to_uniform(&self) -> GeometryResult<CameraUniform> {
        let view = self.compute_view_matrix()?;
        let proj = OPENGL_TO_WGPU_MATRIX * self.compute_projection_matrix();

        Ok(CameraUniform {
            view_position: [self.position.x, self.position.y, self.position.z, 1.0],
            view_proj: (proj * view).into(),
        })
    }
}

fn checked_direction(name: &'static str, v: Vector3<f32>) -> ConfigResult<Vector3<f32>> {
    let length2 = v.magnitude2();
    if !length2.is_finite() || length2 == 0.0 {
        return Err(ConfigError::InvalidDirection {
            name,
            x: v.x,
            y: v.y,
            z: v.z,
        });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};
    use rand::Rng;

    const EPSILON: f32 = 1e-5;

    fn camera_at(x: f32, y: f32, z: f32) -> Camera {
        let mut camera = Camera::new();
        camera.set_position(Point3::new(x, y, z));
        camera
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.fov(), 45.0);
        assert_eq!(camera.aspect_ratio(), 1.0);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 100.0);
        assert_eq!(camera.facing(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.up(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_view_maps_origin_in_front_of_camera() {
        let camera = camera_at(0.0, 0.0, 5.0);
        let view = camera.compute_view_matrix().unwrap();
        let p = view * Vector4::new(0.0, 0.0, 0.0, 1.0);

        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!((p.z + 5.0).abs() < EPSILON);
        assert!((p.w - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_view_uses_facing_not_origin() {
        let mut camera = camera_at(3.0, 0.0, 0.0);
        camera.set_facing(Vector3::new(1.0, 0.0, 0.0)).unwrap();
        let view = camera.compute_view_matrix().unwrap();

        // a point one unit ahead of the camera lands on the -Z axis
        let p = view * Vector4::new(4.0, 0.0, 0.0, 1.0);
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!((p.z + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_projection_near_plane_depth() {
        let mut camera = Camera::new();
        camera.set_fov(90.0).unwrap();
        camera.set_aspect_ratio(1.0).unwrap();
        camera.set_clip_planes(1.0, 100.0).unwrap();

        let clip = camera.compute_projection_matrix() * Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < EPSILON);

        let clip = camera.compute_projection_matrix() * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);

        // the wgpu-facing matrix puts the near plane at depth 0
        let clip = OPENGL_TO_WGPU_MATRIX
            * camera.compute_projection_matrix()
            * Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert!((clip.z / clip.w).abs() < EPSILON);
    }

    #[test]
    fn test_projection_fov_edge() {
        let mut camera = Camera::new();
        camera.set_fov(90.0).unwrap();
        camera.set_clip_planes(1.0, 100.0).unwrap();

        // with a 90 degree fov the top edge at distance d is at height d
        let clip = camera.compute_projection_matrix() * Vector4::new(0.0, 2.0, -2.0, 1.0);
        assert!((clip.y / clip.w - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_matrices_track_state_without_caching() {
        let mut camera = camera_at(0.0, 0.0, 5.0);
        let first = camera.compute_view_matrix().unwrap();
        let again = camera.compute_view_matrix().unwrap();
        assert_eq!(first, again);

        camera.set_position(Point3::new(1.0, 2.0, 5.0));
        let moved = camera.compute_view_matrix().unwrap();
        assert_ne!(first, moved);

        camera.set_position(Point3::new(0.0, 0.0, 5.0));
        assert_eq!(first, camera.compute_view_matrix().unwrap());

        let proj = camera.compute_projection_matrix();
        camera.set_fov(30.0).unwrap();
        assert_ne!(proj, camera.compute_projection_matrix());
    }

    #[test]
    fn test_parallel_facing_and_up_is_rejected() {
        let mut camera = Camera::new();
        camera.set_facing(Vector3::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(
            camera.compute_view_matrix(),
            Err(GeometryError::InvalidCameraOrientation)
        );
        assert!(camera.to_uniform().is_err());

        camera.set_facing(Vector3::new(0.0, -1.0, 0.0)).unwrap();
        assert_eq!(
            camera.compute_view_matrix(),
            Err(GeometryError::InvalidCameraOrientation)
        );
    }

    #[test]
    fn test_invalid_setters_leave_state_unchanged() {
        let mut camera = Camera::new();
        let before = camera;

        assert!(camera.set_fov(0.0).is_err());
        assert!(camera.set_fov(180.0).is_err());
        assert!(camera.set_fov(f32::NAN).is_err());
        assert!(camera.set_aspect_ratio(0.0).is_err());
        assert!(camera.set_aspect_ratio(-2.0).is_err());
        assert!(camera.set_near(0.0).is_err());
        assert!(camera.set_near(200.0).is_err());
        assert!(camera.set_far(0.05).is_err());
        assert!(camera.set_clip_planes(5.0, 5.0).is_err());
        assert!(camera.set_facing(Vector3::zero()).is_err());
        assert!(camera.set_up(Vector3::new(f32::NAN, 1.0, 0.0)).is_err());
        assert!(camera.resize_projection(800, 0).is_err());

        assert_eq!(camera, before);
    }

    #[test]
    fn test_clip_plane_setters() {
        let mut camera = Camera::new();
        camera.set_near(0.5).unwrap();
        camera.set_far(80.1).unwrap();
        assert_eq!((camera.near(), camera.far()), (0.5, 80.1));

        camera.set_clip_planes(200.0, 400.0).unwrap();
        assert_eq!((camera.near(), camera.far()), (200.0, 400.0));
    }

    #[test]
    fn test_facing_is_normalized() {
        let mut camera = Camera::new();
        camera.set_facing(Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((camera.facing().magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_resize_projection() {
        let mut camera = Camera::new();
        camera.resize_projection(1024, 768).unwrap();
        assert!((camera.aspect_ratio() - 1024.0 / 768.0).abs() < EPSILON);
    }

    #[test]
    fn test_view_basis_is_orthonormal_for_random_poses() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let mut camera = camera_at(
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
            );
            let facing = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-0.9..0.9),
                rng.random_range(-1.0..1.0),
            );
            if camera.set_facing(facing).is_err() || camera.right().is_err() {
                continue;
            }

            let view = camera.compute_view_matrix().unwrap();
            let eye = camera.position();
            let ahead = eye + camera.facing() * 2.0;
            let p = view * Vector4::new(ahead.x, ahead.y, ahead.z, 1.0);
            assert!(p.x.abs() < 1e-3);
            assert!(p.y.abs() < 1e-3);
            assert!((p.z + 2.0).abs() < 1e-3);
        }
    }
}
