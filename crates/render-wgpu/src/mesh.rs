use bytemuck::{Pod, Zeroable};
use globeview_scene::{SkyField, SphereGeometry};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct SphereVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct StarInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub fade: f32,
    pub speed: f32,
}

/// Generate a UV sphere. Row 0 is the north pole (+Y) and maps to the top
/// row of the texture; the seam column is duplicated so `u` runs 0..=1.
pub(crate) fn sphere_mesh(geometry: &SphereGeometry) -> (Vec<SphereVertex>, Vec<u32>) {
    let ws = geometry.width_segments.max(3);
    let hs = geometry.height_segments.max(2);
    let r = geometry.radius;

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        // Pole rows put each vertex under the middle of its triangle.
        let u_offset = if iy == 0 {
            0.5 / ws as f32
        } else if iy == hs {
            -0.5 / ws as f32
        } else {
            0.0
        };
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_t, cos_t) = (v * PI).sin_cos();
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            vertices.push(SphereVertex {
                position: [-r * cos_p * sin_t, r * cos_t, r * sin_p * sin_t],
                uv: [u + u_offset, v],
            });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity(geometry.index_count() as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    (vertices, indices)
}

/// Flatten all star layers into one instance list.
pub(crate) fn star_instances(sky: &SkyField) -> Vec<StarInstance> {
    sky.layers()
        .iter()
        .flat_map(|layer| {
            let spec = *layer.spec();
            layer.stars().iter().map(move |star| StarInstance {
                position: star.position.to_array(),
                size: star.size,
                color: star.color.to_array(),
                fade: if spec.fade { 1.0 } else { 0.0 },
                speed: spec.speed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn sphere_counts_match_geometry() {
        let geometry = SphereGeometry::unit(128);
        let (vertices, indices) = sphere_mesh(&geometry);
        assert_eq!(vertices.len() as u32, geometry.vertex_count());
        assert_eq!(indices.len() as u32, geometry.index_count());
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let (vertices, _) = sphere_mesh(&SphereGeometry::unit(16));
        for v in &vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5);
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        assert!((vertices[0].position[1] - 1.0).abs() < 1e-6);
        assert!((vertices.last().unwrap().position[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn triangles_face_outward() {
        let (vertices, indices) = sphere_mesh(&SphereGeometry::unit(8));
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn star_instances_cover_every_layer() {
        let sky = SkyField::generate(5);
        let instances = star_instances(&sky);
        assert_eq!(instances.len(), 18_000);
        assert_eq!(instances[0].speed, 0.5);
        assert_eq!(instances[8000].speed, 0.3);
        assert_eq!(instances[17_999].speed, 0.2);
        assert!(instances.iter().all(|s| s.fade == 1.0));
    }
}
