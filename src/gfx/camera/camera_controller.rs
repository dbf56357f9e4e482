use cgmath::{InnerSpace, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::camera::Camera;
use crate::error::ConfigResult;

pub const MIN_ZOOM_FOV: f32 = 1.0;
pub const MAX_ZOOM_FOV: f32 = 45.0;
const MAX_PITCH_DEGREES: f32 = 89.0;
const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

/// First-person controller: WASD to move, drag with the left button to look,
/// scroll to zoom.
///
/// Yaw and pitch are kept in degrees. Yaw starts at -90 so the initial
/// facing direction is -Z.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Movement speed in world units per second
    pub speed: f32,
    /// Look sensitivity in degrees per pixel of mouse motion
    pub sensitivity: f32,
    /// Field-of-view change in degrees per scroll line
    pub zoom_speed: f32,
    yaw: f32,
    pitch: f32,
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
    is_mouse_pressed: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(10.0, 0.8)
    }
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            zoom_speed: 1.0,
            yaw: -90.0,
            pitch: 0.0,
            is_forward_pressed: false,
            is_backward_pressed: false,
            is_left_pressed: false,
            is_right_pressed: false,
            is_mouse_pressed: false,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Facing direction for the current yaw and pitch
    pub fn facing(&self) -> Vector3<f32> {
        direction_from_angles(self.yaw, self.pitch)
    }

    /// Re-derives yaw and pitch so that [`Self::facing`] matches `facing`
    pub fn look_along(&mut self, facing: Vector3<f32>) {
        if facing.magnitude2() < 1e-12 {
            return;
        }
        let facing = facing.normalize();
        self.yaw = facing.z.atan2(facing.x).to_degrees();
        self.pitch = facing
            .y
            .asin()
            .to_degrees()
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// Tracks movement key state. Returns true when the key was consumed.
    pub fn process_keyboard(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return false;
        };
        let is_pressed = event.state == ElementState::Pressed;

        match key_code {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.is_forward_pressed = is_pressed;
                true
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.is_backward_pressed = is_pressed;
                true
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.is_left_pressed = is_pressed;
                true
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.is_right_pressed = is_pressed;
                true
            }
            _ => false,
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        self.is_mouse_pressed = state == ElementState::Pressed;
        true
    }

    /// Rotates the view while the left button is held
    pub fn process_mouse_motion(
        &mut self,
        delta: (f64, f64),
        camera: &mut Camera,
    ) -> ConfigResult<()> {
        if !self.is_mouse_pressed {
            return Ok(());
        }
        self.rotate(delta.0 as f32, delta.1 as f32);
        camera.set_facing(self.facing())
    }

    /// Zooms by narrowing or widening the field of view
    pub fn process_scroll(
        &mut self,
        delta: &MouseScrollDelta,
        camera: &mut Camera,
    ) -> ConfigResult<()> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                *y as f32 / PIXELS_PER_SCROLL_LINE
            }
        };
        let fov = (camera.fov() - lines * self.zoom_speed).clamp(MIN_ZOOM_FOV, MAX_ZOOM_FOV);
        camera.set_fov(fov)
    }

    /// Moves the camera along its facing and right vectors for held keys
    pub fn update_camera(&self, camera: &mut Camera, delta_time: f32) {
        let step = self.speed * delta_time;
        let facing = camera.facing();
        let mut position = camera.position();

        if self.is_forward_pressed {
            position += facing * step;
        }
        if self.is_backward_pressed {
            position -= facing * step;
        }
        if self.is_left_pressed || self.is_right_pressed {
            // looking straight along the up vector leaves no strafe direction
            if let Ok(right) = camera.right() {
                if self.is_right_pressed {
                    position += right * step;
                }
                if self.is_left_pressed {
                    position -= right * step;
                }
            }
        }

        camera.set_position(position);
    }

    fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        // dragging down (positive dy) tilts the view up
        self.pitch =
            (self.pitch + dy * self.sensitivity).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// Returns true if currently dragging to look around
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed
    }
}

fn direction_from_angles(yaw_degrees: f32, pitch_degrees: f32) -> Vector3<f32> {
    let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
    let (sin_pitch, cos_pitch) = pitch_degrees.to_radians().sin_cos();
    Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
}
