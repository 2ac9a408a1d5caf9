use bevy::prelude::{Component, Reflect};

#[derive(Component, Reflect)]
pub struct MainCamera;

/// Free-fly camera state, angles in degrees.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sprint_speed: f32,
    pub sensitivity: f32,
}
