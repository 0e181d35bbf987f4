use std::fmt;
use std::path::Path;

use super::error::{Error, Result};

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name used when none is given.
    pub const fn default_entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Compiled WGSL shader for a single stage.
///
/// Holds both the device module and its reflected IR; the IR is used by
/// [`Program`](super::Program) for link checks and uniform lookup.
#[derive(Debug)]
pub struct Shader {
    raw: wgpu::ShaderModule,
    ir: naga::Module,
    stage: ShaderStage,
    entry_point: String,
    label: String,
}

impl Shader {
    /// Compiles `source` using the stage's default entry point.
    pub fn compile(
        device: &wgpu::Device,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> Result<Self> {
        Self::compile_entry(device, stage, label, source, stage.default_entry_point())
    }

    /// Compiles `source`, requiring an entry point named `entry_point` for `stage`.
    pub fn compile_entry(
        device: &wgpu::Device,
        stage: ShaderStage,
        label: &str,
        source: &str,
        entry_point: &str,
    ) -> Result<Self> {
        let ir = front_end(stage, label, source, entry_point)?;

        let raw = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        log::debug!("compiled {stage} shader `{label}` (entry `{entry_point}`)");

        Ok(Self {
            raw,
            ir,
            stage,
            entry_point: entry_point.to_string(),
            label: label.to_string(),
        })
    }

    /// Runs the same checks as [`compile`](Self::compile) without a device.
    pub fn check(stage: ShaderStage, label: &str, source: &str) -> Result<()> {
        front_end(stage, label, source, stage.default_entry_point()).map(|_| ())
    }

    /// Returns the native handle.
    #[inline]
    pub fn raw(&self) -> &wgpu::ShaderModule {
        &self.raw
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn ir(&self) -> &naga::Module {
        &self.ir
    }
}

/// Reads a WGSL file and compiles it for `stage`. The path becomes the label.
pub fn load_shader(
    device: &wgpu::Device,
    stage: ShaderStage,
    path: impl AsRef<Path>,
) -> Result<Shader> {
    let path = path.as_ref();
    let source = read_source(path)?;
    Shader::compile(device, stage, &path.display().to_string(), &source)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses and validates WGSL, then checks the stage entry point exists.
///
/// Runs entirely on the CPU so failures carry a rendered diagnostic instead
/// of surfacing later through the device's error callback.
pub(crate) fn front_end(
    stage: ShaderStage,
    label: &str,
    source: &str,
    entry_point: &str,
) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| Error::Compile {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| Error::Compile {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    let naga_stage = stage.to_naga();
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry_point && ep.stage == naga_stage);

    if !found {
        return Err(Error::MissingEntryPoint {
            label: label.to_string(),
            stage,
            entry_point: entry_point.to_string(),
        });
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos, 0.0, 1.0);
}
"#;

    #[test]
    fn front_end_accepts_valid_vertex_shader() {
        let module = front_end(ShaderStage::Vertex, "vs", VS, "vs_main").unwrap();
        assert_eq!(module.entry_points.len(), 1);
    }

    #[test]
    fn syntax_error_reports_compile_log() {
        let err = front_end(ShaderStage::Vertex, "broken", "fn vs_main( {", "vs_main").unwrap_err();
        match err {
            Error::Compile { label, log } => {
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_reports_compile_log() {
        let src = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(x);
}
"#;
        assert!(matches!(
            front_end(ShaderStage::Vertex, "typed", src, "vs_main"),
            Err(Error::Compile { .. })
        ));
    }

    #[test]
    fn wrong_stage_is_missing_entry_point() {
        let err = front_end(ShaderStage::Fragment, "vs", VS, "vs_main").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingEntryPoint { stage: ShaderStage::Fragment, .. }
        ));
    }

    #[test]
    fn check_uses_default_entry_point() {
        assert!(Shader::check(ShaderStage::Vertex, "vs", VS).is_ok());
        assert!(Shader::check(ShaderStage::Fragment, "vs", VS).is_err());
    }

    #[test]
    fn custom_entry_point_name_is_checked() {
        assert!(front_end(ShaderStage::Vertex, "vs", VS, "main").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_source(Path::new("/nonexistent/ember/shader.wgsl")).unwrap_err();
        match err {
            Error::Io { path, .. } => assert!(path.ends_with("shader.wgsl")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn default_entry_points() {
        assert_eq!(ShaderStage::Vertex.default_entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.default_entry_point(), "fs_main");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
