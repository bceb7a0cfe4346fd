use cgmath::{Matrix4, SquareMatrix, Vector3};

/// Shader-side camera block.
///
/// Matches `CameraUniform` in `particle.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// Projection * view.
    pub view_proj: [[f32; 4]; 4],

    /// View matrix alone, used to orient billboards.
    pub view: [[f32; 4]; 4],

    /// Camera world position. The fourth channel is reserved for shader use
    /// and is always zero.
    pub camera_position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
            view: convert_matrix4_to_array(Matrix4::identity()),
            camera_position: [0.0; 4],
        }
    }
}

impl CameraUniform {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, camera_position: [f32; 4]) -> Self {
        Self {
            view_proj: convert_matrix4_to_array(projection * view),
            view: convert_matrix4_to_array(view),
            camera_position,
        }
    }
}

// The shader reads the position as a vec4<f32>; the conversion below relies
// on a 3-component cgmath vector being exactly three packed f32s.
const _: () = assert!(std::mem::size_of::<Vector3<f32>>() == 3 * std::mem::size_of::<f32>());
const _: () = assert!(std::mem::size_of::<[f32; 4]>() == 16);

/// Widens a world position to the 4-component layout the shader expects.
///
/// The extra channel is set to zero.
pub fn to_shader_position(position: Vector3<f32>) -> [f32; 4] {
    [position.x, position.y, position.z, 0.0]
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
