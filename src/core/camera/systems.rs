use crate::core::camera::components::{FlyCamera, MainCamera};
use crate::core::camera::logic::{CameraInput, calculate_camera_transform, front_from_angles};
use crate::core::config::DemoConfig;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::ButtonInput;
use bevy::input::mouse::MouseMotion;
use bevy::log::info;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::*;
use bevy::render::view::Hdr;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

pub fn spawn_camera(mut commands: Commands, config: Res<DemoConfig>) {
    let camera = &config.camera;
    let position = Vec3::from_array(camera.position);
    let front = front_from_angles(camera.yaw, camera.pitch);

    commands.spawn((
        Camera3d::default(),
        // Scene colour stays linear HDR until the post-process composite
        Hdr,
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(position).looking_to(front, Vec3::Y),
        MainCamera,
        FlyCamera {
            yaw: camera.yaw,
            pitch: camera.pitch,
            speed: camera.speed,
            sprint_speed: camera.sprint_speed,
            sensitivity: camera.sensitivity,
        },
    ));

    info!("Camera spawned at {position}");
}

pub fn camera_control(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    time: Res<Time>,
    cursor_q: Query<&CursorOptions, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &mut FlyCamera), With<MainCamera>>,
) {
    let dt = time.delta_secs();
    let Ok((mut transform, mut camera)) = camera_q.single_mut() else {
        return;
    };

    let mouse_delta = mouse_motion
        .read()
        .fold(Vec2::ZERO, |total, ev| total + ev.delta);
    // A released cursor belongs to the tuning panel
    let looking = cursor_q
        .single()
        .map_or(true, |cursor| cursor.grab_mode != CursorGrabMode::None);
    let mouse_delta = if looking { mouse_delta } else { Vec2::ZERO };

    let input = CameraInput {
        move_forward: keyboard_input.pressed(KeyCode::KeyW),
        move_backward: keyboard_input.pressed(KeyCode::KeyS),
        move_left: keyboard_input.pressed(KeyCode::KeyA),
        move_right: keyboard_input.pressed(KeyCode::KeyD),
        sprint: keyboard_input.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        mouse_delta,
    };

    let update = calculate_camera_transform(transform.translation, &camera, &input, dt);

    transform.translation = update.translation;
    transform.look_to(update.front, Vec3::Y);
    camera.yaw = update.yaw;
    camera.pitch = update.pitch;
}

pub fn cursor_options(captured: bool) -> CursorOptions {
    if captured {
        CursorOptions {
            grab_mode: CursorGrabMode::Locked,
            visible: false,
            ..default()
        }
    } else {
        CursorOptions::default()
    }
}

pub fn capture_cursor(mut cursor_q: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor_q.single_mut() {
        *cursor = cursor_options(true);
    }
}

pub fn exit_on_escape(keyboard_input: Res<ButtonInput<KeyCode>>, mut app_exit: MessageWriter<AppExit>) {
    if keyboard_input.just_pressed(KeyCode::Escape) {
        info!("Escape pressed, exiting");
        app_exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(DemoConfig::default())
            .add_systems(Startup, spawn_camera);
        app
    }

    #[test]
    fn test_main_camera_renders_linear_hdr() {
        let mut app = camera_app();
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(Has<Hdr>, &Tonemapping), With<MainCamera>>();
        let (hdr, tonemapping) = query.single(app.world()).unwrap();
        assert!(hdr);
        assert_eq!(*tonemapping, Tonemapping::None);
    }

    #[test]
    fn test_capture_cursor_locks_primary_window() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Startup, capture_cursor);
        let window = app
            .world_mut()
            .spawn((PrimaryWindow, CursorOptions::default()))
            .id();

        app.update();

        let cursor = app.world().get::<CursorOptions>(window).unwrap();
        assert_eq!(cursor.grab_mode, CursorGrabMode::Locked);
        assert!(!cursor.visible);
    }

    #[test]
    fn test_released_cursor_is_free() {
        let cursor = cursor_options(false);
        assert_eq!(cursor.grab_mode, CursorGrabMode::None);
        assert!(cursor.visible);
    }
}
