//! Offscreen render targets.

/// A color texture plus matching depth buffer, sized to the framebuffer.
///
/// The color texture is created with `RENDER_ATTACHMENT | TEXTURE_BINDING |
/// COPY_SRC` so it can be drawn into, composited to the screen, and read
/// back.
pub struct RenderTarget {
    /// Color texture.
    pub texture: wgpu::Texture,
    /// Full view of the color texture.
    pub view: wgpu::TextureView,
    /// Depth texture view.
    pub depth_view: wgpu::TextureView,
    /// Color format.
    pub format: wgpu::TextureFormat,
    /// Size in pixels.
    pub size: (u32, u32),
}

/// Depth format shared by every offscreen target.
pub const DEPTH_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Depth32Float;

impl RenderTarget {
    /// Create a target. Zero dimensions are clamped to one pixel.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
    ) -> Self {
        let size = (width.max(1), height.max(1));
        let extent = wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Depth")),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view =
            depth.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            depth_view,
            format,
            size,
        }
    }

    /// Begin a pass that clears color to `clear` and depth to 1.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        label: &str,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        })
    }
}
