//! Demo viewer: a handful of pickable boxes in a polyview window.
//!
//! Usage: `polyview [options.toml]`

use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use polyview::picking::index_to_color;
use polyview::screenshot::{ImageSink, ScreenshotImage};
use polyview::structure::{DrawContext, DrawPass, GpuPass, Structure};
use polyview::{Options, PolyviewError, Viewer};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

const FACE_NAMES: [&str; 6] = ["+X", "-X", "+Y", "-Y", "+Z", "-Z"];
const FACE_SHADE: [f32; 6] = [0.9, 0.6, 1.0, 0.45, 0.8, 0.7];

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

/// 36 vertices, six faces of two triangles each, in `FACE_NAMES` order.
fn box_vertices(
    center: Vec3,
    half: f32,
    color_of: impl Fn(usize) -> [f32; 4],
) -> Vec<Vertex> {
    let axes = [Vec3::X, Vec3::Y, Vec3::Z];
    let mut out = Vec::with_capacity(36);
    for face in 0..6 {
        let axis = face / 2;
        let sign = if face % 2 == 0 { 1.0 } else { -1.0 };
        let n = axes[axis] * sign * half;
        let u = axes[(axis + 1) % 3] * half;
        let v = axes[(axis + 2) % 3] * half;
        let corners = [n - u - v, n + u - v, n + u + v, n - u + v];
        let color = color_of(face);
        for i in [0, 1, 2, 0, 2, 3] {
            out.push(Vertex {
                position: (center + corners[i]).to_array(),
                color,
            });
        }
    }
    out
}

/// Lazily created GPU state, one pipeline per target format.
struct BoxGpu {
    shader: wgpu::ShaderModule,
    layout: wgpu::BindGroupLayout,
    pipelines: FxHashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BoxGpu {
    fn new(device: &wgpu::Device) -> Self {
        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Demo Box Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../assets/shaders/demo/flat_color.wgsl")
                        .into(),
                ),
            });
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Demo Box Camera Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Demo Box Camera"),
            size: 64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Demo Box Camera Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        Self {
            shader,
            layout,
            pipelines: FxHashMap::default(),
            camera_buffer,
            bind_group,
        }
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Demo Box Pipeline Layout"),
                bind_group_layouts: &[&self.layout],
                push_constant_ranges: &[],
            });
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Demo Box Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn draw(
        &mut self,
        gpu: &mut GpuPass<'_>,
        view_proj: glam::Mat4,
        vertices: &[Vertex],
    ) {
        if !self.pipelines.contains_key(&gpu.format) {
            let pipeline =
                self.create_pipeline(gpu.device, gpu.format, gpu.depth_format);
            let _ = self.pipelines.insert(gpu.format, pipeline);
        }
        let Some(pipeline) = self.pipelines.get(&gpu.format) else {
            return;
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&view_proj.to_cols_array()),
        );
        let buffer =
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Demo Box Vertices"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        gpu.pass.set_pipeline(pipeline);
        gpu.pass.set_bind_group(0, &self.bind_group, &[]);
        gpu.pass.set_vertex_buffer(0, buffer.slice(..));
        gpu.pass.draw(0..vertices.len() as u32, 0..1);
    }
}

/// An axis-aligned cube; each face is one pickable element.
struct DemoBox {
    name: String,
    center: Vec3,
    half_size: f32,
    color: [f32; 3],
    pick_start: Option<u64>,
    gpu: Option<BoxGpu>,
}

impl DemoBox {
    fn new(name: &str, center: Vec3, half_size: f32, color: [f32; 3]) -> Self {
        Self {
            name: name.to_owned(),
            center,
            half_size,
            color,
            pick_start: None,
            gpu: None,
        }
    }

    fn render(&mut self, ctx: &mut DrawContext<'_>) {
        let vertices = match ctx.pass {
            DrawPass::Scene => {
                let [r, g, b] = self.color;
                box_vertices(self.center, self.half_size, |face| {
                    let s = FACE_SHADE[face];
                    [r * s, g * s, b * s, 1.0]
                })
            }
            DrawPass::Pick => {
                let Some(start) = self.pick_start else {
                    return;
                };
                box_vertices(self.center, self.half_size, |face| {
                    let [r, g, b] = index_to_color(start + face as u64);
                    [r, g, b, 1.0]
                })
            }
        };
        let view_proj = ctx.view.projection * ctx.view.view;
        let Some(gpu) = ctx.gpu.as_mut() else {
            return;
        };
        let device = gpu.device;
        self.gpu
            .get_or_insert_with(|| BoxGpu::new(device))
            .draw(gpu, view_proj, &vertices);
    }
}

impl Structure for DemoBox {
    fn type_name(&self) -> &str {
        "Box"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.render(ctx);
    }

    fn draw_pick(&mut self, ctx: &mut DrawContext<'_>) {
        self.render(ctx);
    }

    fn draw_ui(&mut self, ui: &mut egui::Ui) {
        let _ = ui.horizontal(|ui| {
            let _ = ui.label("color");
            let _ = ui.color_edit_button_rgb(&mut self.color);
        });
        let _ = ui.add(
            egui::Slider::new(&mut self.half_size, 0.05..=2.0).text("size"),
        );
    }

    fn draw_pick_ui(&mut self, ui: &mut egui::Ui, local_index: u64) {
        let face = FACE_NAMES
            .get(local_index as usize)
            .copied()
            .unwrap_or("?");
        let _ = ui.label(format!("face {face}"));
        let _ = ui.label(format!(
            "center ({:.2}, {:.2}, {:.2})",
            self.center.x, self.center.y, self.center.z
        ));
    }

    fn bounding_box(&self) -> (Vec3, Vec3) {
        let half = Vec3::splat(self.half_size);
        (self.center - half, self.center + half)
    }

    fn length_scale(&self) -> f32 {
        2.0 * self.half_size * 3.0_f32.sqrt()
    }

    fn pick_element_count(&self) -> u64 {
        FACE_NAMES.len() as u64
    }

    fn set_pick_range(&mut self, start: u64) {
        self.pick_start = Some(start);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Writes screenshots as binary PAM next to the working directory.
struct PamSink;

impl ImageSink for PamSink {
    fn write_image(
        &mut self,
        name: &str,
        image: &ScreenshotImage,
    ) -> Result<(), PolyviewError> {
        let path = Path::new(name).with_extension("pam");
        let tuple_type = if image.channels == 4 {
            "RGB_ALPHA"
        } else {
            "RGB"
        };
        let mut file = BufWriter::new(File::create(&path)?);
        write!(
            file,
            "P7\nWIDTH {}\nHEIGHT {}\nDEPTH {}\nMAXVAL 255\n\
             TUPLTYPE {tuple_type}\nENDHDR\n",
            image.width, image.height, image.channels
        )?;
        file.write_all(&image.pixels)?;
        file.flush()?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

fn confirm_dialog(host: &mut polyview::Host, ctx: &egui::Context) {
    let mut close = false;
    let _ = egui::Window::new("Modal")
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let _ = ui.label(format!(
                "The scene is paused under this dialog (depth {}).",
                host.context_depth()
            ));
            if ui.button("Close").clicked() {
                close = true;
            }
        });
    if close {
        let _ = host.pop_context();
    }
}

fn run() -> Result<(), PolyviewError> {
    let options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };
    let mut host = Viewer::builder().with_options(options).build()?;
    host.set_image_sink(Box::new(PamSink));

    let boxes = [
        ("red", Vec3::new(-1.5, 0.0, 0.0), [0.85, 0.25, 0.2]),
        ("green", Vec3::new(0.0, 0.0, 0.0), [0.3, 0.75, 0.35]),
        ("blue", Vec3::new(1.5, 0.0, 0.0), [0.25, 0.4, 0.9]),
    ];
    for (name, center, color) in boxes {
        let _ = host
            .register_structure(
                Box::new(DemoBox::new(name, center, 0.5, color)),
                false,
            )
            .map_err(|rejected| rejected.error)?;
    }

    host.set_user_callback(Box::new(|host, ctx| {
        let _ = egui::Window::new("Demo").show(ctx, |ui| {
            if ui.button("Open modal").clicked() {
                let _ = host.push_context(Box::new(confirm_dialog));
            }
        });
    }));
    host.show()
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
