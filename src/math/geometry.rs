//! 几何数学工具模块
//!
//! 提供网格后处理使用的数学函数：
//! - 法线重建（从三角形面计算顶点法线）
//! - 坐标轴转换

use crate::geometry::vertex::Vertex;
use super::{Matrix4, matrix};

/// 从三角形面重建顶点法线
///
/// 遍历所有三角形，计算每个面的法线（未归一化，按面积加权），
/// 累加到该面的三个顶点，最后归一化。
///
/// 越界的索引会被跳过。
pub fn reconstruct_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for vertex in vertices.iter_mut() {
        vertex.normal = [0.0, 0.0, 0.0];
    }

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;

        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }

        let p0 = vertices[i0].position;
        let p1 = vertices[i1].position;
        let p2 = vertices[i2].position;

        let edge1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
        let edge2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];

        let face_normal = cross(edge1, edge2);

        for &i in &[i0, i1, i2] {
            vertices[i].normal[0] += face_normal[0];
            vertices[i].normal[1] += face_normal[1];
            vertices[i].normal[2] += face_normal[2];
        }
    }

    for vertex in vertices.iter_mut() {
        vertex.normal = normalize(vertex.normal);
    }
}

/// 对所有顶点应用变换矩阵（位置与法线）
pub fn transform_vertices(vertices: &mut [Vertex], transform: &Matrix4) {
    for vertex in vertices.iter_mut() {
        vertex.position = matrix::transform_point(transform, vertex.position);
        vertex.normal = normalize(matrix::transform_vector(transform, vertex.normal));
    }
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 归一化3D向量，零向量保持为零
#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();

    if length < 1e-6 {
        [0.0, 0.0, 0.0]
    } else {
        let inv_length = 1.0 / length;
        [v[0] * inv_length, v[1] * inv_length, v[2] * inv_length]
    }
}
