use wgpu::util::DeviceExt;

/// Plane vertex in pixel units, `uv.y = 0` along the top edge.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl PlaneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Two triangles covering `width x height`, centred on the origin.
pub fn plane_vertices(width: f32, height: f32) -> [PlaneVertex; 6] {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let v = |x: f32, y: f32, u: f32, t: f32| PlaneVertex {
        position: [x, y],
        uv: [u, t],
    };
    [
        v(-hw, -hh, 0.0, 1.0),
        v(hw, -hh, 1.0, 1.0),
        v(hw, hh, 1.0, 0.0),
        v(-hw, -hh, 0.0, 1.0),
        v(hw, hh, 1.0, 0.0),
        v(-hw, hh, 0.0, 0.0),
    ]
}

pub struct PlaneGeometry {
    buffer: wgpu::Buffer,
}

impl PlaneGeometry {
    pub fn new(device: &wgpu::Device, label: &str, width: f32, height: f32) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&plane_vertices(width, height)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..6, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_size_with_top_left_uv_origin() {
        let verts = plane_vertices(800.0, 450.0);
        let top_left = verts.iter().find(|v| v.uv == [0.0, 0.0]).unwrap();
        assert_eq!(top_left.position, [-400.0, 225.0]);
        let bottom_right = verts.iter().find(|v| v.uv == [1.0, 1.0]).unwrap();
        assert_eq!(bottom_right.position, [400.0, -225.0]);
    }

    #[test]
    fn triangles_are_counter_clockwise() {
        for tri in plane_vertices(2.0, 2.0).chunks(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }
}
