/// Uniform blocks shared by every pipeline.
const COMMON: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    // x, y: framebuffer size in pixels; z: seconds since start
    viewport: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
"#;

const MODEL: &str = r#"
struct Model {
    model: mat4x4<f32>,
    color: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> node: Model;

struct SphereInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};
"#;

/// Unlit earth: sample the color map and recolor water and land.
const EARTH_BODY: &str = r#"
@group(2) @binding(0)
var surface_texture: texture_2d<f32>;
@group(2) @binding(1)
var surface_sampler: sampler;

struct EarthOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

const OCEAN_CYAN: vec3<f32> = vec3<f32>(0.18, 0.52, 0.62);

@vertex
fn vs_earth(vertex: SphereInput) -> EarthOutput {
    var out: EarthOutput;
    out.clip_position = frame.view_proj * node.model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_earth(in: EarthOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(surface_texture, surface_sampler, in.uv);
    let is_ocean = (texel.r + 0.05 < texel.b) && (texel.g < texel.b + 0.1);
    let ocean = mix(texel.rgb * 1.15, OCEAN_CYAN, 0.45);
    let land = texel.rgb * 1.4;
    let color = select(land, ocean, is_ocean);
    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

/// Constant-color shell; blending and culling come from the pipeline.
const HALO_BODY: &str = r#"
@vertex
fn vs_halo(vertex: SphereInput) -> @builtin(position) vec4<f32> {
    return frame.view_proj * node.model * vec4<f32>(vertex.position, 1.0);
}

@fragment
fn fs_halo() -> @location(0) vec4<f32> {
    return node.color;
}
"#;

/// Camera-facing star sprites, one instance per star.
const STAR_BODY: &str = r#"
struct StarInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec3<f32>,
    @location(3) fade: f32,
    @location(4) speed: f32,
};

struct StarOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) sprite_uv: vec2<f32>,
    @location(2) fade: f32,
};

@vertex
fn vs_star(@builtin(vertex_index) vertex_index: u32, star: StarInput) -> StarOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[vertex_index];

    let view_pos = frame.view * vec4<f32>(star.position, 1.0);
    let depth = max(-view_pos.z, 0.001);
    let pulse = 3.0 + sin(frame.viewport.z * star.speed + 100.0);
    let size_px = star.size * (30.0 / depth) * pulse;

    let clip = frame.view_proj * vec4<f32>(star.position, 1.0);
    let offset = corner * size_px * 2.0 / frame.viewport.xy;

    var out: StarOutput;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.z, clip.w);
    out.color = star.color;
    out.sprite_uv = corner + vec2<f32>(0.5, 0.5);
    out.fade = star.fade;
    return out;
}

@fragment
fn fs_star(in: StarOutput) -> @location(0) vec4<f32> {
    var opacity = 1.0;
    if (in.fade > 0.5) {
        let d = distance(in.sprite_uv, vec2<f32>(0.5, 0.5));
        opacity = 1.0 / (1.0 + exp(16.0 * (d - 0.25)));
    }
    return vec4<f32>(in.color, opacity);
}
"#;

pub(crate) fn earth_shader() -> String {
    [COMMON, MODEL, EARTH_BODY].concat()
}

pub(crate) fn halo_shader() -> String {
    [COMMON, MODEL, HALO_BODY].concat()
}

pub(crate) fn star_shader() -> String {
    [COMMON, STAR_BODY].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_declare_their_entry_points() {
        let earth = earth_shader();
        assert!(earth.contains("fn vs_earth") && earth.contains("fn fs_earth"));
        let halo = halo_shader();
        assert!(halo.contains("fn vs_halo") && halo.contains("fn fs_halo"));
        let stars = star_shader();
        assert!(stars.contains("fn vs_star") && stars.contains("fn fs_star"));
        assert!(!stars.contains("struct Model"));
    }

    #[test]
    fn earth_rule_uses_surface_constants() {
        use globeview_scene::surface;
        let earth = earth_shader();
        assert!(earth.contains(&format!("texel.r + {} < texel.b", surface::OCEAN_RED_MARGIN)));
        assert!(earth.contains(&format!("texel.b + {}", surface::OCEAN_GREEN_MARGIN)));
        assert!(earth.contains(&format!("texel.rgb * {}", surface::LAND_BRIGHTEN)));
        assert!(earth.contains(&format!("OCEAN_CYAN, {}", surface::OCEAN_BLEND)));
    }
}
