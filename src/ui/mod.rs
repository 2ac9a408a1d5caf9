mod systems;

use crate::core::state::AppState;
use crate::ui::systems::*;
use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

/// Runtime tuning window, toggled with F1.
pub(crate) struct TuningPanelPlugin;

impl Plugin for TuningPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<TuningPanel>()
            .add_systems(Update, toggle_tuning_panel)
            .add_systems(
                EguiPrimaryContextPass,
                render_tuning_panel.run_if(in_state(AppState::Running)),
            );
    }
}
