//! Full-screen quad geometry.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RenderCtx;

/// Interleaved quad vertex: clip-space position + texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl QuadVertex {
    /// Attribute 0 = position (3 floats, offset 0),
    /// attribute 1 = texture coordinate (2 floats, offset 3 floats).
    pub const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // tex_coord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// Texture v grows downwards in wgpu, so the top edge samples row 0 and the
// image appears upright.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [1.0, 1.0, 0.0], tex_coord: [1.0, 0.0] },   // top right
    QuadVertex { position: [1.0, -1.0, 0.0], tex_coord: [1.0, 1.0] },  // bottom right
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coord: [0.0, 1.0] }, // bottom left
    QuadVertex { position: [-1.0, 1.0, 0.0], tex_coord: [0.0, 0.0] },  // top left
];

/// Two triangles sharing the bottom-right/top-left diagonal.
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

/// Vertex + index buffers for the quad. Immutable after creation.
pub struct GeometryBuffers {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GeometryBuffers {
    pub fn upload(ctx: &RenderCtx<'_>) -> Self {
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(i: u32) -> [f32; 2] {
        let p = QUAD_VERTICES[i as usize].position;
        [p[0], p[1]]
    }

    fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])) * 0.5
    }

    fn inside(p: [f32; 2], tri: &[u32]) -> bool {
        let (a, b, c) = (xy(tri[0]), xy(tri[1]), xy(tri[2]));
        let d0 = signed_area(a, b, p);
        let d1 = signed_area(b, c, p);
        let d2 = signed_area(c, a, p);
        let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
        let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
        !(has_neg && has_pos)
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn stride_is_five_floats() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 5 * 4);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn attributes_match_shader_locations() {
        let [position, tex_coord] = QuadVertex::ATTRS;
        assert_eq!(position.shader_location, 0);
        assert_eq!(position.format, wgpu::VertexFormat::Float32x3);
        assert_eq!(position.offset, 0);
        assert_eq!(tex_coord.shader_location, 1);
        assert_eq!(tex_coord.format, wgpu::VertexFormat::Float32x2);
        assert_eq!(tex_coord.offset, 3 * 4);
    }

    // ── coverage ──────────────────────────────────────────────────────────

    #[test]
    fn vertices_are_the_four_clip_space_corners() {
        let mut corners: Vec<[i32; 2]> = (0..4)
            .map(|i| {
                let [x, y] = xy(i);
                [x as i32, y as i32]
            })
            .collect();
        corners.sort();
        assert_eq!(corners, vec![[-1, -1], [-1, 1], [1, -1], [1, 1]]);
        assert!(QUAD_VERTICES.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn indices_use_every_corner() {
        let mut used = QUAD_INDICES.to_vec();
        used.sort();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2, 3]);
    }

    #[test]
    fn triangles_tile_the_square_without_overlap() {
        let (first, second) = QUAD_INDICES.split_at(3);
        let area: f32 = [first, second]
            .iter()
            .map(|t| signed_area(xy(t[0]), xy(t[1]), xy(t[2])).abs())
            .sum();
        assert_eq!(area, 4.0);

        // Sample off the shared diagonal: every point in exactly one triangle.
        let steps = 16;
        for i in 0..steps {
            for j in 0..steps {
                let p = [
                    -1.0 + (i as f32 + 0.37) * 2.0 / steps as f32,
                    -1.0 + (j as f32 + 0.71) * 2.0 / steps as f32,
                ];
                let hits = inside(p, first) as u32 + inside(p, second) as u32;
                assert_eq!(hits, 1, "point {p:?} covered {hits} times");
            }
        }
    }

    #[test]
    fn texture_corners_follow_positions() {
        for v in QUAD_VERTICES {
            let u = (v.position[0] + 1.0) * 0.5;
            let t = (1.0 - v.position[1]) * 0.5;
            assert_eq!(v.tex_coord, [u, t]);
        }
    }
}
