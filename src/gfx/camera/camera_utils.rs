use cgmath::{Matrix4, SquareMatrix};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};

use super::{camera::Camera, camera_controller::CameraController};
use crate::error::{ConfigResult, GeometryResult};

/// Remaps OpenGL clip depth [-1, 1] to the [0, 1] range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Owns the scene camera together with the controller that drives it
pub struct CameraManager {
    pub camera: Camera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: Camera, mut controller: CameraController) -> Self {
        controller.look_along(camera.facing());
        Self { camera, controller }
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        self.controller.process_keyboard(event)
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        self.controller.process_mouse_button(button, state)
    }

    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) -> ConfigResult<()> {
        self.controller.process_mouse_motion(delta, &mut self.camera)
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) -> ConfigResult<()> {
        self.controller.process_scroll(delta, &mut self.camera)
    }

    /// Moves the camera according to held keys
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update_camera(&mut self.camera, delta_time);
    }

    pub fn uniform(&self) -> GeometryResult<CameraUniform> {
        self.camera.to_uniform()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Projection * view, already in wgpu clip space.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector4};

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_uniform_matches_camera() {
        let mut camera = Camera::new();
        camera.set_position(Point3::new(0.0, 0.0, 25.0));
        camera.set_clip_planes(0.1, 80.1).unwrap();

        let uniform = camera.to_uniform().unwrap();
        assert_eq!(uniform.view_position, [0.0, 0.0, 25.0, 1.0]);

        // the sun at the origin is visible with depth inside [0, 1]
        let view_proj = Matrix4::from(uniform.view_proj);
        let clip = view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0, "depth {depth}");
        assert!((clip.x / clip.w).abs() < 1e-6);
    }

    #[test]
    fn test_manager_syncs_controller_with_camera() {
        let mut camera = Camera::new();
        camera
            .set_facing(cgmath::Vector3::new(1.0, 0.0, 0.0))
            .unwrap();
        let manager = CameraManager::new(camera, CameraController::default());

        let facing = manager.controller.facing();
        assert!((facing.x - 1.0).abs() < 1e-5);
        assert!(facing.z.abs() < 1e-5);
    }
}
