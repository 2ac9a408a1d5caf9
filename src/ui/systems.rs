use crate::core::camera::systems::cursor_options;
use crate::post::settings::PostProcessConfig;
use crate::sun::LightState;
use crate::sun::logic::{SunMotion, SunSettings};
use bevy::prelude::*;
use bevy::window::{CursorOptions, PrimaryWindow};
use bevy_egui::{EguiContexts, egui};

#[derive(Resource, Default)]
pub struct TuningPanel {
    pub open: bool,
}

/// F1 flips the panel and hands the cursor to it while open.
pub fn toggle_tuning_panel(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut panel: ResMut<TuningPanel>,
    mut cursor_q: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if !keyboard_input.just_pressed(KeyCode::F1) {
        return;
    }
    panel.open = !panel.open;
    if let Ok(mut cursor) = cursor_q.single_mut() {
        *cursor = cursor_options(!panel.open);
    }
}

pub fn render_tuning_panel(
    mut contexts: EguiContexts,
    panel: Res<TuningPanel>,
    light: Res<LightState>,
    mut sun: ResMut<SunSettings>,
    mut post: ResMut<PostProcessConfig>,
) {
    if !panel.open {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Sunset")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Sun");
            ui.label(format!("State: {}", motion_label(&light.motion)));
            ui.label(format!("Angle to horizon: {:.1}°", light.sun_angle));
            ui.label(format!("Angular velocity: {:.3} rad/s", light.angular_velocity));
            ui.label(format!("Exposure: {:.3}", light.exposure));
            ui.add_space(5.0);

            // Only write through when a widget actually changed, so change
            // detection stays quiet otherwise
            let mut settings = sun.clone();
            ui.checkbox(&mut settings.stationary, "Stationary");
            ui.label("Speed");
            ui.add(egui::Slider::new(&mut settings.desired_speed, 0.0..=2.0).step_by(0.01));
            ui.label("Idle time");
            ui.add(egui::Slider::new(&mut settings.idle_time, 0.0..=5.0).step_by(0.1));
            if settings != *sun {
                *sun = settings;
            }

            ui.add_space(10.0);
            ui.separator();
            ui.heading("Bloom");

            let mut blur_amount = post.blur_amount;
            ui.label("Blur passes");
            ui.add(egui::Slider::new(&mut blur_amount, 0..=200));
            if blur_amount != post.blur_amount {
                post.blur_amount = blur_amount;
            }
        });
}

fn motion_label(motion: &SunMotion) -> String {
    match motion {
        SunMotion::Moving(direction) => format!("moving {direction:?}"),
        SunMotion::Waiting { resume, elapsed } => {
            format!("waiting {elapsed:.1}s, then {resume:?}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::CursorGrabMode;

    #[test]
    fn test_opening_panel_releases_cursor() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<TuningPanel>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, toggle_tuning_panel);
        let window = app
            .world_mut()
            .spawn((PrimaryWindow, cursor_options(true)))
            .id();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::F1);

        app.update();

        assert!(app.world().resource::<TuningPanel>().open);
        let cursor = app.world().get::<CursorOptions>(window).unwrap();
        assert_eq!(cursor.grab_mode, CursorGrabMode::None);
        assert!(cursor.visible);
    }
}
