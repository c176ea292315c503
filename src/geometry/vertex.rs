/// 几何体顶点定义模块
///
/// 定义网格侧使用的顶点结构，包含位置、法线和两套UV坐标。

use bytemuck::{Pod, Zeroable};

/// 网格顶点
///
/// 第二套UV供细节纹理（模型文件中的 `tex2`）使用。
/// 内存布局与GPU兼容，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)
/// - normal: 12 bytes (3 * f32)
/// - texcoord: 8 bytes (2 * f32)
/// - texcoord2: 8 bytes (2 * f32)
/// - **总计**: 40 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],

    /// 第一套纹理坐标 (u, v)
    pub texcoord: [f32; 2],

    /// 第二套纹理坐标 (u, v)
    pub texcoord2: [f32; 2],
}

impl Vertex {
    /// 创建一个新的顶点
    #[inline]
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        texcoord: [f32; 2],
        texcoord2: [f32; 2],
    ) -> Self {
        Self {
            position,
            normal,
            texcoord,
            texcoord2,
        }
    }
}
