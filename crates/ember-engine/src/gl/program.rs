use std::collections::BTreeSet;

use super::error::{Error, Result};
use super::reflect;
use super::shader::{Shader, ShaderStage};

/// Fixed-function state supplied at link time.
#[derive(Debug, Clone)]
pub struct LinkOptions<'a> {
    /// Vertex buffer layouts, in slot order.
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Format of the color target the program renders into.
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    pub topology: wgpu::PrimitiveTopology,
}

impl<'a> LinkOptions<'a> {
    /// Triangle list, no blending, no vertex buffers.
    pub fn new(color_format: wgpu::TextureFormat) -> Self {
        Self {
            vertex_buffers: &[],
            color_format,
            blend: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
    }

    pub fn vertex_buffers(mut self, layouts: &'a [wgpu::VertexBufferLayout<'a>]) -> Self {
        self.vertex_buffers = layouts;
        self
    }

    pub fn blend(mut self, blend: wgpu::BlendState) -> Self {
        self.blend = Some(blend);
        self
    }

    pub fn topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }
}

/// Location of a uniform resource within a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

/// Copy of an attached shader; the program does not borrow the `Shader`.
#[derive(Debug, Clone)]
struct Stage {
    raw: wgpu::ShaderModule,
    ir: naga::Module,
    entry_point: String,
    label: String,
}

impl Stage {
    fn view(&self) -> StageView<'_> {
        StageView {
            ir: &self.ir,
            entry_point: &self.entry_point,
            label: &self.label,
        }
    }
}

/// Borrowed view of the parts of a stage that take part in link checks.
#[derive(Debug, Copy, Clone)]
struct StageView<'a> {
    ir: &'a naga::Module,
    entry_point: &'a str,
    label: &'a str,
}

impl From<&Shader> for Stage {
    fn from(shader: &Shader) -> Self {
        Self {
            raw: shader.raw().clone(),
            ir: shader.ir().clone(),
            entry_point: shader.entry_point().to_string(),
            label: shader.label().to_string(),
        }
    }
}

/// Collects shaders before linking.
///
/// Attaching a second shader for the same stage replaces the first.
#[derive(Debug)]
pub struct ProgramBuilder {
    label: String,
    vertex: Option<Stage>,
    fragment: Option<Stage>,
}

impl ProgramBuilder {
    pub fn attach(mut self, shader: &Shader) -> Self {
        let slot = match shader.stage() {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };
        if let Some(prev) = slot.replace(Stage::from(shader)) {
            log::debug!(
                "program `{}`: {} shader `{}` replaced by `{}`",
                self.label,
                shader.stage(),
                prev.label,
                shader.label()
            );
        }
        self
    }

    /// Checks the stage interfaces and creates the render pipeline.
    pub fn link(self, device: &wgpu::Device, options: &LinkOptions<'_>) -> Result<Program> {
        let problems = interface_problems(
            self.vertex.as_ref().map(Stage::view),
            self.fragment.as_ref().map(Stage::view),
            options.vertex_buffers,
        );

        let (Some(vertex), Some(fragment)) = (self.vertex, self.fragment) else {
            return Err(Error::Link {
                label: self.label,
                log: problems.join("\n"),
            });
        };

        if !problems.is_empty() {
            return Err(Error::Link {
                label: self.label,
                log: problems.join("\n"),
            });
        }

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&self.label),
            layout: None,
            vertex: wgpu::VertexState {
                module: &vertex.raw,
                entry_point: Some(&vertex.entry_point),
                compilation_options: Default::default(),
                buffers: options.vertex_buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment.raw,
                entry_point: Some(&fragment.entry_point),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: options.color_format,
                    blend: options.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: options.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "linked program `{}` ({} + {})",
            self.label,
            vertex.label,
            fragment.label
        );

        Ok(Program {
            label: self.label,
            pipeline,
            vertex,
            fragment,
        })
    }
}

/// Linked shader program: a vertex and fragment stage plus the native pipeline.
#[derive(Debug)]
pub struct Program {
    label: String,
    pipeline: wgpu::RenderPipeline,
    vertex: Stage,
    fragment: Stage,
}

impl Program {
    pub fn builder(label: &str) -> ProgramBuilder {
        ProgramBuilder {
            label: label.to_string(),
            vertex: None,
            fragment: None,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the native handle.
    #[inline]
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Looks up a uniform variable by name in either stage.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        [&self.vertex, &self.fragment]
            .into_iter()
            .find_map(|stage| reflect::uniform_binding(&stage.ir, name))
            .map(|(group, binding)| UniformLocation { group, binding })
            .ok_or_else(|| Error::UniformNotFound {
                name: name.to_string(),
            })
    }

    /// Bind group layout derived from the shaders for `group`.
    pub fn bind_group_layout(&self, group: u32) -> wgpu::BindGroupLayout {
        self.pipeline.get_bind_group_layout(group)
    }

    /// Makes this program current for subsequent draws in `rpass`.
    pub fn use_program(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
    }
}

/// Lists every reason the stages cannot be linked; empty means compatible.
fn interface_problems(
    vertex: Option<StageView<'_>>,
    fragment: Option<StageView<'_>>,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> Vec<String> {
    let mut problems = Vec::new();

    if vertex.is_none() {
        problems.push("no vertex shader attached".to_string());
    }
    if fragment.is_none() {
        problems.push("no fragment shader attached".to_string());
    }
    let (Some(vertex), Some(fragment)) = (vertex, fragment) else {
        return problems;
    };

    let provided: BTreeSet<u32> = buffers
        .iter()
        .flat_map(|layout| layout.attributes.iter().map(|a| a.shader_location))
        .collect();
    for location in reflect::input_locations(&vertex.ir, &vertex.entry_point) {
        if !provided.contains(&location) {
            problems.push(format!(
                "vertex input @location({location}) of `{}` has no vertex buffer attribute",
                vertex.label
            ));
        }
    }

    let written = reflect::output_locations(&vertex.ir, &vertex.entry_point);
    for location in reflect::input_locations(&fragment.ir, &fragment.entry_point) {
        if !written.contains(&location) {
            problems.push(format!(
                "fragment input @location({location}) of `{}` is not written by `{}`",
                fragment.label, vertex.label
            ));
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::shader::front_end;

    const VS: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) tint: vec4<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(pos, 0.0, 1.0);
    out.tint = vec4<f32>(1.0);
    return out;
}
"#;

    const FS_OK: &str = r#"
@fragment
fn fs_main(@location(0) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
"#;

    const FS_BAD: &str = r#"
@fragment
fn fs_main(@location(3) glow: vec4<f32>) -> @location(0) vec4<f32> {
    return glow;
}
"#;

    const POS_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn ir(stage: ShaderStage, src: &str) -> naga::Module {
        front_end(stage, "test", src, stage.default_entry_point()).unwrap()
    }

    // Link checks only read IR, so no device is needed.
    fn problems(
        vs: Option<&str>,
        fs: Option<&str>,
        buffers: &[wgpu::VertexBufferLayout<'_>],
    ) -> Vec<String> {
        let vs = vs.map(|s| ir(ShaderStage::Vertex, s));
        let fs = fs.map(|s| ir(ShaderStage::Fragment, s));
        interface_problems(
            vs.as_ref().map(|ir| StageView { ir, entry_point: "vs_main", label: "vs" }),
            fs.as_ref().map(|ir| StageView { ir, entry_point: "fs_main", label: "fs" }),
            buffers,
        )
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POS_ATTRS,
        }
    }

    #[test]
    fn matching_interfaces_link() {
        assert!(problems(Some(VS), Some(FS_OK), &[layout()]).is_empty());
    }

    #[test]
    fn missing_stages_are_reported() {
        let p = problems(None, None, &[]);
        assert_eq!(p.len(), 2);
        assert!(p[0].contains("vertex"));
        assert!(p[1].contains("fragment"));
    }

    #[test]
    fn unprovided_vertex_attribute_is_reported() {
        let p = problems(Some(VS), Some(FS_OK), &[]);
        assert_eq!(p.len(), 1);
        assert!(p[0].contains("@location(0)"));
    }

    #[test]
    fn unwritten_fragment_input_is_reported() {
        let p = problems(Some(VS), Some(FS_BAD), &[layout()]);
        assert_eq!(p.len(), 1);
        assert!(p[0].contains("@location(3)"));
    }
}
