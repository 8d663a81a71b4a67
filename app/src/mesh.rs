use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use locomotion_core::host::MeshBuilder;
use locomotion_core::math::{Rgba8, Vertex};

const RING_SEGMENTS: u32 = 32;

/// Triangle-list mesh generation for the windowed front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleMeshBuilder;

/// Two triangles over `bl, br, tr, tl` (counter-clockwise).
fn push_quad(out: &mut Vec<Vertex>, [bl, br, tr, tl]: [Vec3; 4], color: Rgba8) {
    out.extend_from_slice(&[
        Vertex::new(bl, color, Vec2::new(0.0, 0.0)),
        Vertex::new(br, color, Vec2::new(1.0, 0.0)),
        Vertex::new(tr, color, Vec2::new(1.0, 1.0)),
        Vertex::new(bl, color, Vec2::new(0.0, 0.0)),
        Vertex::new(tr, color, Vec2::new(1.0, 1.0)),
        Vertex::new(tl, color, Vec2::new(0.0, 1.0)),
    ]);
}

/// Faces of `mins..maxs` in +x, -x, +y, -y, +z, -z order, viewed from outside.
fn box_faces(mins: Vec3, maxs: Vec3) -> [[Vec3; 4]; 6] {
    let (a, b) = (mins, maxs);
    [
        [Vec3::new(b.x, a.y, a.z), Vec3::new(b.x, b.y, a.z), Vec3::new(b.x, b.y, b.z), Vec3::new(b.x, a.y, b.z)],
        [Vec3::new(a.x, b.y, a.z), Vec3::new(a.x, a.y, a.z), Vec3::new(a.x, a.y, b.z), Vec3::new(a.x, b.y, b.z)],
        [Vec3::new(b.x, b.y, a.z), Vec3::new(a.x, b.y, a.z), Vec3::new(a.x, b.y, b.z), Vec3::new(b.x, b.y, b.z)],
        [Vec3::new(a.x, a.y, a.z), Vec3::new(b.x, a.y, a.z), Vec3::new(b.x, a.y, b.z), Vec3::new(a.x, a.y, b.z)],
        [Vec3::new(b.x, a.y, b.z), Vec3::new(b.x, b.y, b.z), Vec3::new(a.x, b.y, b.z), Vec3::new(a.x, a.y, b.z)],
        [Vec3::new(a.x, a.y, a.z), Vec3::new(a.x, b.y, a.z), Vec3::new(b.x, b.y, a.z), Vec3::new(b.x, a.y, a.z)],
    ]
}

fn sphere_point(radius: f32, longitude: f32, latitude: f32) -> Vec3 {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat) * radius
}

impl MeshBuilder for TriangleMeshBuilder {
    fn cube(&self, half_extents: Vec3, face_colors: [Rgba8; 6]) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(36);
        for (face, color) in box_faces(-half_extents, half_extents).into_iter().zip(face_colors) {
            push_quad(&mut out, face, color);
        }
        out
    }

    fn uv_sphere(&self, radius: f32, color: Rgba8, slices: u32) -> Vec<Vertex> {
        let slices = slices.max(3);
        let stacks = (slices / 2).max(2);
        let mut out = Vec::with_capacity((slices * stacks * 6) as usize);

        for stack in 0..stacks {
            let v0 = stack as f32 / stacks as f32;
            let v1 = (stack + 1) as f32 / stacks as f32;
            let lat0 = -0.5 * PI + v0 * PI;
            let lat1 = -0.5 * PI + v1 * PI;

            for slice in 0..slices {
                let u0 = slice as f32 / slices as f32;
                let u1 = (slice + 1) as f32 / slices as f32;
                let (lon0, lon1) = (u0 * TAU, u1 * TAU);

                let bl = Vertex::new(sphere_point(radius, lon0, lat0), color, Vec2::new(u0, v0));
                let br = Vertex::new(sphere_point(radius, lon1, lat0), color, Vec2::new(u1, v0));
                let tr = Vertex::new(sphere_point(radius, lon1, lat1), color, Vec2::new(u1, v1));
                let tl = Vertex::new(sphere_point(radius, lon0, lat1), color, Vec2::new(u0, v1));
                out.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
            }
        }
        out
    }

    fn aabb3(&self, mins: Vec3, maxs: Vec3, color: Rgba8) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(36);
        for face in box_faces(mins, maxs) {
            push_quad(&mut out, face, color);
        }
        out
    }

    fn aabb2(&self, mins: Vec2, maxs: Vec2, color: Rgba8) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(6);
        push_quad(
            &mut out,
            [
                mins.extend(0.0),
                Vec3::new(maxs.x, mins.y, 0.0),
                maxs.extend(0.0),
                Vec3::new(mins.x, maxs.y, 0.0),
            ],
            color,
        );
        out
    }

    fn ring2d(&self, center: Vec2, radius: f32, thickness: f32, color: Rgba8) -> Vec<Vertex> {
        let inner = (radius - thickness * 0.5).max(0.0);
        let outer = radius + thickness * 0.5;
        let step = TAU / RING_SEGMENTS as f32;

        let mut out = Vec::with_capacity((RING_SEGMENTS * 6) as usize);
        for i in 0..RING_SEGMENTS {
            let d0 = Vec2::from_angle(i as f32 * step);
            let d1 = Vec2::from_angle((i + 1) as f32 * step);
            push_quad(
                &mut out,
                [
                    (center + d0 * inner).extend(0.0),
                    (center + d0 * outer).extend(0.0),
                    (center + d1 * outer).extend(0.0),
                    (center + d1 * inner).extend(0.0),
                ],
                color,
            );
        }
        out
    }
}
