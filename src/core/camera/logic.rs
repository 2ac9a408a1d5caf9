use crate::core::camera::components::FlyCamera;
use bevy::math::{Vec2, Vec3};

/// Pitch is kept inside this many degrees of straight up or down.
pub const PITCH_LIMIT: f32 = 89.0;

pub struct CameraInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub sprint: bool,
    /// Accumulated pointer motion in pixels, +y pointing down the screen.
    pub mouse_delta: Vec2,
}

pub struct CameraTransformUpdate {
    pub translation: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub front: Vec3,
}

/// View direction for yaw/pitch given in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
}

/// Calculate camera movement and look direction based on input
/// Movement uses the direction the camera faced at the start of the frame
pub fn calculate_camera_transform(
    current_translation: Vec3,
    camera: &FlyCamera,
    input: &CameraInput,
    delta_time: f32,
) -> CameraTransformUpdate {
    let mut translation = current_translation;

    let speed = if input.sprint {
        camera.sprint_speed
    } else {
        camera.speed
    };
    let step = speed * delta_time;

    let front = front_from_angles(camera.yaw, camera.pitch);
    let right = front.cross(Vec3::Y).normalize();

    if input.move_forward {
        translation += front * step;
    }
    if input.move_backward {
        translation -= front * step;
    }
    if input.move_left {
        translation -= right * step;
    }
    if input.move_right {
        translation += right * step;
    }

    // Screen y grows downwards, pitch grows upwards
    let yaw = camera.yaw + input.mouse_delta.x * camera.sensitivity;
    let pitch = (camera.pitch - input.mouse_delta.y * camera.sensitivity)
        .clamp(-PITCH_LIMIT, PITCH_LIMIT);

    CameraTransformUpdate {
        translation,
        yaw,
        pitch,
        front: front_from_angles(yaw, pitch),
    }
}
