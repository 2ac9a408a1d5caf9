mod node;
pub(crate) mod pipeline;
pub(crate) mod settings;
mod systems;
pub(crate) mod targets;

use crate::core::camera::CameraSystems;
use crate::core::state::AppState;
use crate::post::node::{
    PostProcessLabel, PostProcessNode, PostProcessPipelines, prepare_post_process_targets,
};
use crate::post::settings::{PostProcessConfig, PostProcessImages, PostProcessSettings};
use crate::post::systems::*;
use crate::sun::SunSystems;
use bevy::core_pipeline::core_3d::graph::{Core3d, Node3d};
use bevy::prelude::*;
use bevy::render::extract_component::{ExtractComponentPlugin, UniformComponentPlugin};
use bevy::render::extract_resource::ExtractResourcePlugin;
use bevy::render::render_graph::{RenderGraphExt, ViewNodeRunner};
use bevy::render::{Render, RenderApp, RenderSystems};

/// Render layer shared by the sun and the terrain silhouette.
pub const BRIGHT_PASS_LAYER: usize = 1;

pub(crate) struct PostProcessPlugin;

impl Plugin for PostProcessPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<PostProcessSettings>::default(),
            UniformComponentPlugin::<PostProcessSettings>::default(),
            ExtractResourcePlugin::<PostProcessConfig>::default(),
            ExtractResourcePlugin::<PostProcessImages>::default(),
        ))
        .add_systems(Startup, init_post_process_config)
        .add_systems(
            Update,
            (
                spawn_bright_pass_view,
                update_post_process_settings
                    .after(CameraSystems)
                    .after(SunSystems),
            )
                .chain(),
        )
        .add_systems(OnEnter(AppState::Running), attach_lens_flare_textures);

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_systems(
                Render,
                prepare_post_process_targets.in_set(RenderSystems::PrepareResources),
            )
            .add_render_graph_node::<ViewNodeRunner<PostProcessNode>>(Core3d, PostProcessLabel)
            .add_render_graph_edges(
                Core3d,
                (
                    Node3d::Tonemapping,
                    PostProcessLabel,
                    Node3d::EndMainPassPostProcessing,
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<PostProcessPipelines>();
    }
}
