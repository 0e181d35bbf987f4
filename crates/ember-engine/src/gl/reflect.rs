//! Interface reflection over validated shader IR.

use std::collections::BTreeSet;

/// `@location` indices consumed by an entry point's arguments.
pub(crate) fn input_locations(module: &naga::Module, entry_point: &str) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    let Some(ep) = find_entry(module, entry_point) else { return out };

    for arg in &ep.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// `@location` indices written by an entry point's return value.
pub(crate) fn output_locations(module: &naga::Module, entry_point: &str) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    let Some(ep) = find_entry(module, entry_point) else { return out };

    if let Some(result) = &ep.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Resource binding of the uniform-space global named `name`.
pub(crate) fn uniform_binding(module: &naga::Module, name: &str) -> Option<(u32, u32)> {
    module.global_variables.iter().find_map(|(_, var)| {
        if var.space != naga::AddressSpace::Uniform || var.name.as_deref() != Some(name) {
            return None;
        }
        var.binding.as_ref().map(|b| (b.group, b.binding))
    })
}

fn find_entry<'m>(module: &'m naga::Module, name: &str) -> Option<&'m naga::EntryPoint> {
    module.entry_points.iter().find(|ep| ep.name == name)
}

// Arguments and results either carry a binding directly or are structs whose
// members do.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> naga::Module {
        naga::front::wgsl::parse_str(src).unwrap()
    }

    const SRC: &str = r#"
struct Params {
    aspect: f32,
    point_size: f32,
};

@group(0) @binding(1)
var<uniform> params: Params;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) tint: vec4<f32>,
    @location(2) speed: f32,
};

@vertex
fn vs_main(@location(0) pos: vec2<f32>, @location(1) vel: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(pos.x / params.aspect, pos.y, 0.0, 1.0);
    out.tint = vec4<f32>(1.0);
    out.speed = length(vel);
    return out;
}

@fragment
fn fs_main(@location(0) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
"#;

    #[test]
    fn vertex_inputs_from_plain_arguments() {
        let m = parse(SRC);
        assert_eq!(input_locations(&m, "vs_main"), BTreeSet::from([0, 1]));
    }

    #[test]
    fn vertex_outputs_skip_builtins() {
        let m = parse(SRC);
        assert_eq!(output_locations(&m, "vs_main"), BTreeSet::from([0, 2]));
    }

    #[test]
    fn fragment_inputs_and_outputs() {
        let m = parse(SRC);
        assert_eq!(input_locations(&m, "fs_main"), BTreeSet::from([0]));
        assert_eq!(output_locations(&m, "fs_main"), BTreeSet::from([0]));
    }

    #[test]
    fn unknown_entry_point_has_no_locations() {
        let m = parse(SRC);
        assert!(input_locations(&m, "nope").is_empty());
    }

    #[test]
    fn uniform_binding_by_variable_name() {
        let m = parse(SRC);
        assert_eq!(uniform_binding(&m, "params"), Some((0, 1)));
        assert_eq!(uniform_binding(&m, "Params"), None);
    }
}
