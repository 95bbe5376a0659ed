//! Composite pass: copies the scene or pick target onto the swapchain.

use crate::gpu::pipeline_helpers::{
    blit_bind_group, blit_bind_group_layout, create_screen_space_pipeline,
    nearest_sampler,
};
use crate::gpu::texture::RenderTarget;

/// Which offscreen target to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeSource {
    /// The shaded scene.
    Scene,
    /// The raw pick buffer (debug view).
    Pick,
}

/// Full-screen blit of an offscreen target.
pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    scene_bind_group: wgpu::BindGroup,
    pick_bind_group: wgpu::BindGroup,
}

impl CompositePass {
    /// Build the pipeline for a swapchain of `format`, bound to `scene`
    /// and `pick`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        scene: &RenderTarget,
        pick: &RenderTarget,
    ) -> Self {
        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Composite Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!(
                        "../../assets/shaders/screen/texture_draw.wgsl"
                    )
                    .into(),
                ),
            });
        let bind_group_layout =
            blit_bind_group_layout(device, "Composite Bind Group Layout");
        let pipeline = create_screen_space_pipeline(
            device,
            "Composite Pipeline",
            &shader,
            format,
            &[&bind_group_layout],
        );
        let sampler = nearest_sampler(device, "Composite Sampler");
        let scene_bind_group =
            blit_bind_group(device, &bind_group_layout, &scene.view, &sampler);
        let pick_bind_group =
            blit_bind_group(device, &bind_group_layout, &pick.view, &sampler);

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            scene_bind_group,
            pick_bind_group,
        }
    }

    /// Rebind after the targets were recreated.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        scene: &RenderTarget,
        pick: &RenderTarget,
    ) {
        let layout = &self.bind_group_layout;
        self.scene_bind_group =
            blit_bind_group(device, layout, &scene.view, &self.sampler);
        self.pick_bind_group =
            blit_bind_group(device, layout, &pick.view, &self.sampler);
    }

    /// Draw `source` over all of `output`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
        source: CompositeSource,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });
        let bind_group = match source {
            CompositeSource::Scene => &self.scene_bind_group,
            CompositeSource::Pick => &self.pick_bind_group,
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
