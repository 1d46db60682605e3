//! WGSL sources for the trail renderer.
//!
//! All trail shaders share bind group 0: the viewport size in logical pixels
//! and the overlay color of the fade pass. Positions arrive in logical pixels
//! with the origin at the top left, like a 2D canvas.

/// Shared declarations prepended to every trail shader.
const COMMON: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

struct Overlay {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> viewport: Viewport;

@group(0) @binding(1)
var<uniform> overlay: Overlay;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = p / viewport.size * 2.0 - 1.0;
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}
"#;

const FADE: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return overlay.color;
}
"#;

const CIRCLE: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    // One extra pixel for the antialiased rim.
    let local = corners[vertex_index] * (radius + 1.0);

    var out: VertexOutput;
    out.clip_position = to_clip(center + local);
    out.local = local;
    out.radius = radius;
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius + 0.5 - length(in.local), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

const LINE: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) across: f32,
    @location(1) half_width: f32,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) from_pos: vec2<f32>,
    @location(1) to_pos: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
) -> VertexOutput {
    // x: along the segment (0 or 1), y: side (-1 or 1)
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0,  1.0),
    );
    let corner = corners[vertex_index];

    let delta = to_pos - from_pos;
    let len = length(delta);
    var dir = vec2<f32>(1.0, 0.0);
    if len > 0.0001 {
        dir = delta / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);

    // Hairlines are drawn one pixel wide and fainter instead of thinner.
    let half_width = max(width, 1.0) * 0.5;
    let across = corner.y * (half_width + 0.5);
    let pos = mix(from_pos, to_pos, corner.x) + normal * across;

    var out: VertexOutput;
    out.clip_position = to_clip(pos);
    out.across = across;
    out.half_width = half_width;
    out.color = vec4<f32>(color.rgb, color.a * min(width, 1.0));
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.half_width + 0.5 - abs(in.across), 0.0, 1.0);
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

/// Copies the trail texture onto the surface.
pub const BLIT: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0)
var trail: texture_2d<f32>;
@group(0) @binding(1)
var trail_sampler: sampler;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(trail, trail_sampler, in.uv);
    return vec4<f32>(color.rgb, 1.0);
}
"#;

pub fn fade_shader() -> String {
    format!("{COMMON}{FADE}")
}

pub fn circle_shader() -> String {
    format!("{COMMON}{CIRCLE}")
}

pub fn line_shader() -> String {
    format!("{COMMON}{LINE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_fade_shader_valid() {
        validate_wgsl(&fade_shader()).unwrap();
    }

    #[test]
    fn test_circle_shader_valid() {
        validate_wgsl(&circle_shader()).unwrap();
    }

    #[test]
    fn test_line_shader_valid() {
        validate_wgsl(&line_shader()).unwrap();
    }

    #[test]
    fn test_blit_shader_valid() {
        validate_wgsl(BLIT).unwrap();
    }
}
