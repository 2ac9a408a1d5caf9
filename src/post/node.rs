use crate::post::pipeline::{
    BlurAxis, FullscreenPass, PassEncoder, PassError, PostProcessChain, TargetRole, validate_pass,
};
use crate::post::settings::{PostProcessConfig, PostProcessImages, PostProcessSettings};
use crate::post::targets::TargetLayout;
use bevy::core_pipeline::FullscreenShader;
use bevy::ecs::query::QueryItem;
use bevy::log::{error_once, info, warn, warn_once};
use bevy::prelude::*;
use bevy::render::extract_component::{ComponentUniforms, DynamicUniformIndex};
use bevy::render::render_asset::RenderAssets;
use bevy::render::render_graph::{NodeRunError, RenderGraphContext, RenderLabel, ViewNode};
use bevy::render::render_phase::TrackedRenderPass;
use bevy::render::render_resource::binding_types::{sampler, texture_2d, uniform_buffer};
use bevy::render::render_resource::*;
use bevy::render::renderer::{RenderContext, RenderDevice};
use bevy::render::texture::{FallbackImage, GpuImage};
use bevy::render::view::ViewTarget;
use bevy::shader::ShaderDefVal;

const DOWNSAMPLE_SHADER_PATH: &str = "shaders/downsample.wgsl";
const BLUR_SHADER_PATH: &str = "shaders/gaussian_blur.wgsl";
const COMPOSITE_SHADER_PATH: &str = "shaders/post_process.wgsl";

/// Format of every intermediate target.
const INTERMEDIATE_FORMAT: TextureFormat = TextureFormat::Rgba16Float;

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub(crate) struct PostProcessLabel;

/// One offscreen colour target owned by the chain.
pub(crate) struct OffscreenTarget {
    _texture: Texture,
    view: TextureView,
}

impl OffscreenTarget {
    fn new(render_device: &RenderDevice, label: &'static str, size: UVec2) -> Self {
        let texture = render_device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: INTERMEDIATE_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Downsample and ping-pong targets, created once.
#[derive(Resource)]
pub(crate) struct PostProcessTargets {
    downsample: OffscreenTarget,
    ping_pong: [OffscreenTarget; 2],
}

pub(crate) fn prepare_post_process_targets(
    mut commands: Commands,
    render_device: Res<RenderDevice>,
    config: Option<Res<PostProcessConfig>>,
    targets: Option<Res<PostProcessTargets>>,
) {
    if targets.is_some() {
        return;
    }
    let Some(config) = config else {
        return;
    };

    let layout = match TargetLayout::new(config.full_size, config.down_sample_factor) {
        Ok(layout) => layout,
        Err(err) => {
            warn!("Post-process targets incomplete ({err}), clamping sizes");
            TargetLayout::clamped(config.full_size, config.down_sample_factor)
        }
    };

    info!(
        "Post-process targets: full {}, downsample {} (factor {})",
        layout.full, layout.reduced, layout.factor
    );
    commands.insert_resource(PostProcessTargets {
        downsample: OffscreenTarget::new(&render_device, "post_downsample_texture", layout.reduced),
        ping_pong: [
            OffscreenTarget::new(&render_device, "post_ping_pong_a_texture", layout.full),
            OffscreenTarget::new(&render_device, "post_ping_pong_b_texture", layout.full),
        ],
    });
}

#[derive(Resource)]
pub(crate) struct PostProcessPipelines {
    source_layout: BindGroupLayout,
    composite_layout: BindGroupLayout,
    clamp_sampler: Sampler,
    repeat_sampler: Sampler,
    downsample_id: CachedRenderPipelineId,
    blur_horizontal_id: CachedRenderPipelineId,
    blur_vertical_id: CachedRenderPipelineId,
    composite_id: CachedRenderPipelineId,
}

struct CompiledPipelines<'a> {
    downsample: &'a RenderPipeline,
    blur_horizontal: &'a RenderPipeline,
    blur_vertical: &'a RenderPipeline,
    composite: &'a RenderPipeline,
}

impl PostProcessPipelines {
    fn compiled<'a>(&self, pipeline_cache: &'a PipelineCache) -> Option<CompiledPipelines<'a>> {
        let ids = [
            self.downsample_id,
            self.blur_horizontal_id,
            self.blur_vertical_id,
            self.composite_id,
        ];
        for id in ids {
            if let CachedPipelineState::Err(err) = pipeline_cache.get_render_pipeline_state(id) {
                error_once!("Post-process pipeline failed to compile: {err}");
            }
        }

        Some(CompiledPipelines {
            downsample: pipeline_cache.get_render_pipeline(self.downsample_id)?,
            blur_horizontal: pipeline_cache.get_render_pipeline(self.blur_horizontal_id)?,
            blur_vertical: pipeline_cache.get_render_pipeline(self.blur_vertical_id)?,
            composite: pipeline_cache.get_render_pipeline(self.composite_id)?,
        })
    }
}

impl FromWorld for PostProcessPipelines {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let source_layout = render_device.create_bind_group_layout(
            "post_source_bind_group_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                ),
            ),
        );

        let composite_layout = render_device.create_bind_group_layout(
            "post_composite_bind_group_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    // scene, bloom, flare source
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    // colour gradient, lens dirt, starburst
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                    sampler(SamplerBindingType::Filtering),
                    uniform_buffer::<PostProcessSettings>(true),
                ),
            ),
        );

        let clamp_sampler = render_device.create_sampler(&SamplerDescriptor {
            label: Some("post_clamp_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });
        let repeat_sampler = render_device.create_sampler(&SamplerDescriptor {
            label: Some("post_repeat_sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..default()
        });

        let vertex = world.resource::<FullscreenShader>().to_vertex_state();
        let downsample_shader = world.load_asset(DOWNSAMPLE_SHADER_PATH);
        let blur_shader: Handle<Shader> = world.load_asset(BLUR_SHADER_PATH);
        let composite_shader = world.load_asset(COMPOSITE_SHADER_PATH);

        let descriptor = |label: &'static str,
                          layout: &BindGroupLayout,
                          shader: Handle<Shader>,
                          shader_defs: Vec<ShaderDefVal>,
                          format: TextureFormat| RenderPipelineDescriptor {
            label: Some(label.into()),
            layout: vec![layout.clone()],
            vertex: vertex.clone(),
            fragment: Some(FragmentState {
                shader,
                shader_defs,
                targets: vec![Some(ColorTargetState {
                    format,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
                ..default()
            }),
            ..default()
        };

        let downsample = descriptor(
            "post_downsample_pipeline",
            &source_layout,
            downsample_shader,
            vec![],
            INTERMEDIATE_FORMAT,
        );
        let blur_horizontal = descriptor(
            "post_blur_horizontal_pipeline",
            &source_layout,
            blur_shader.clone(),
            vec!["BLUR_HORIZONTAL".into()],
            INTERMEDIATE_FORMAT,
        );
        let blur_vertical = descriptor(
            "post_blur_vertical_pipeline",
            &source_layout,
            blur_shader,
            vec![],
            INTERMEDIATE_FORMAT,
        );
        // The main view is HDR, so the composite writes an HDR target
        let composite = descriptor(
            "post_composite_pipeline",
            &composite_layout,
            composite_shader,
            vec![],
            ViewTarget::TEXTURE_FORMAT_HDR,
        );

        let pipeline_cache = world.resource_mut::<PipelineCache>();
        Self {
            source_layout,
            composite_layout,
            clamp_sampler,
            repeat_sampler,
            downsample_id: pipeline_cache.queue_render_pipeline(downsample),
            blur_horizontal_id: pipeline_cache.queue_render_pipeline(blur_horizontal),
            blur_vertical_id: pipeline_cache.queue_render_pipeline(blur_vertical),
            composite_id: pipeline_cache.queue_render_pipeline(composite),
        }
    }
}

/// Views sampled by the composite alongside the chain's own targets.
struct FlareViews<'a> {
    gradient: &'a TextureView,
    dirt: &'a TextureView,
    starburst: &'a TextureView,
}

/// Issues the chain's passes on the GPU.
struct GpuPassEncoder<'a, 'w> {
    render_context: &'a mut RenderContext<'w>,
    pipelines: &'a PostProcessPipelines,
    compiled: CompiledPipelines<'a>,
    targets: &'a PostProcessTargets,
    scene: &'a TextureView,
    display: &'a TextureView,
    bright_pass: &'a TextureView,
    flare: FlareViews<'a>,
    settings_binding: BindingResource<'a>,
    settings_offset: u32,
}

impl<'a> GpuPassEncoder<'a, '_> {
    fn view(&self, role: TargetRole) -> &'a TextureView {
        match role {
            TargetRole::SceneColor => self.scene,
            TargetRole::BrightPass => self.bright_pass,
            TargetRole::Downsample => &self.targets.downsample.view,
            TargetRole::PingPong(slot) => &self.targets.ping_pong[slot.index()].view,
            TargetRole::Display => self.display,
        }
    }

    fn draw_source_pass(
        &mut self,
        label: &'static str,
        pipeline: &'a RenderPipeline,
        source: TargetRole,
        target: TargetRole,
    ) {
        let bind_group = self.render_context.render_device().create_bind_group(
            label,
            &self.pipelines.source_layout,
            &BindGroupEntries::sequential((self.view(source), &self.pipelines.clamp_sampler)),
        );

        let mut render_pass = self.begin_pass(label, target);
        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }

    fn draw_composite(&mut self, scene: TargetRole, bloom: TargetRole, flare: TargetRole, target: TargetRole) {
        let bind_group = self.render_context.render_device().create_bind_group(
            "post_composite_bind_group",
            &self.pipelines.composite_layout,
            &BindGroupEntries::sequential((
                self.view(scene),
                self.view(bloom),
                self.view(flare),
                self.flare.gradient,
                self.flare.dirt,
                self.flare.starburst,
                &self.pipelines.clamp_sampler,
                &self.pipelines.repeat_sampler,
                self.settings_binding.clone(),
            )),
        );

        let pipeline = self.compiled.composite;
        let offset = self.settings_offset;
        let mut render_pass = self.begin_pass("post_composite_pass", target);
        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[offset]);
        render_pass.draw(0..3, 0..1);
    }

    fn begin_pass(&mut self, label: &'static str, target: TargetRole) -> TrackedRenderPass<'_> {
        let view = self.view(target);
        self.render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

impl PassEncoder for GpuPassEncoder<'_, '_> {
    fn draw_fullscreen(&mut self, pass: &FullscreenPass) -> Result<(), PassError> {
        validate_pass(pass)?;
        match *pass {
            FullscreenPass::Downsample { source, target } => {
                let pipeline = self.compiled.downsample;
                self.draw_source_pass("post_downsample_pass", pipeline, source, target);
            }
            FullscreenPass::Blur {
                axis,
                source,
                target,
            } => {
                let (label, pipeline) = match axis {
                    BlurAxis::Horizontal => ("post_blur_horizontal_pass", self.compiled.blur_horizontal),
                    BlurAxis::Vertical => ("post_blur_vertical_pass", self.compiled.blur_vertical),
                };
                self.draw_source_pass(label, pipeline, source, target);
            }
            FullscreenPass::Composite {
                scene,
                bloom,
                flare,
                target,
            } => self.draw_composite(scene, bloom, flare, target),
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct PostProcessNode;

impl ViewNode for PostProcessNode {
    type ViewQuery = (
        &'static ViewTarget,
        &'static PostProcessSettings,
        &'static DynamicUniformIndex<PostProcessSettings>,
    );

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, _settings, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let pipelines = world.resource::<PostProcessPipelines>();
        let pipeline_cache = world.resource::<PipelineCache>();
        let Some(compiled) = pipelines.compiled(pipeline_cache) else {
            return Ok(());
        };

        let (Some(config), Some(targets), Some(images)) = (
            world.get_resource::<PostProcessConfig>(),
            world.get_resource::<PostProcessTargets>(),
            world.get_resource::<PostProcessImages>(),
        ) else {
            return Ok(());
        };

        let gpu_images = world.resource::<RenderAssets<GpuImage>>();
        let Some(bright_pass) = gpu_images.get(&images.bright_pass) else {
            warn_once!("Bright-pass target not ready, skipping post-processing");
            return Ok(());
        };

        let fallback = world.resource::<FallbackImage>();
        let flare_view = |handle: &Option<Handle<Image>>| {
            handle
                .as_ref()
                .and_then(|handle| gpu_images.get(handle))
                .map_or(&fallback.d2.texture_view, |image| &image.texture_view)
        };

        let settings_uniforms = world.resource::<ComponentUniforms<PostProcessSettings>>();
        let Some(settings_binding) = settings_uniforms.uniforms().binding() else {
            return Ok(());
        };

        let post_process = view_target.post_process_write();
        let mut encoder = GpuPassEncoder {
            render_context,
            pipelines,
            compiled,
            targets,
            scene: post_process.source,
            display: post_process.destination,
            bright_pass: &bright_pass.texture_view,
            flare: FlareViews {
                gradient: flare_view(&images.color_gradient),
                dirt: flare_view(&images.lens_dirt),
                starburst: flare_view(&images.star_burst),
            },
            settings_binding,
            settings_offset: settings_index.index(),
        };

        if let Err(err) = PostProcessChain::new(config.blur_amount).record(&mut encoder) {
            warn_once!("Post-process chain aborted: {err}");
        }

        Ok(())
    }
}
