//! 数学工具模块
//!
//! 基于 `nalgebra` 提供向量/矩阵类型别名，以及模型数据去重所需的容差比较。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector3, Matrix4
//! - **常量**：FUZZY_TOLERANCE 等
//! - **工具函数**：approx_eq, approx_eq_slice
//! - **矩阵辅助函数**：坐标轴转换
//! - **几何处理**：法线重建（见 geometry 子模块）

pub use nalgebra::{Matrix4 as Mat4, Point3, Vector3 as Vec3};

pub type Vector3 = Vec3<f32>;
pub type Matrix4 = Mat4<f32>;

/// 数学常量
pub mod constants {
    /// 模型顶点和材质比较使用的容差
    pub const FUZZY_TOLERANCE: f32 = 1e-5;

    /// π/2
    pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
}

/// 数学工具函数
pub mod utils {
    /// 检查两个浮点数是否近似相等（差值不超过 `epsilon`）
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() <= epsilon
    }

    /// 逐分量比较两个等长数组
    pub fn approx_eq_slice(a: &[f32], b: &[f32], epsilon: f32) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| approx_eq(x, y, epsilon))
    }
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 创建绕 X 轴旋转的矩阵
    pub fn rotation_x(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// Z 轴向上 → Y 轴向上（绕 X 轴旋转 -90°）
    pub fn z_up_to_y_up() -> Matrix4 {
        rotation_x(-constants::HALF_PI)
    }

    /// 变换一个点
    pub fn transform_point(m: &Matrix4, p: [f32; 3]) -> [f32; 3] {
        let r = m.transform_point(&Point3::new(p[0], p[1], p[2]));
        [r.x, r.y, r.z]
    }

    /// 变换一个方向（忽略平移）
    pub fn transform_vector(m: &Matrix4, v: [f32; 3]) -> [f32; 3] {
        let r = m.transform_vector(&Vector3::new(v[0], v[1], v[2]));
        [r.x, r.y, r.z]
    }
}

pub mod geometry;

#[cfg(test)]
mod tests {
    use super::*;
    use constants::FUZZY_TOLERANCE;

    #[test]
    fn test_approx_eq() {
        assert!(utils::approx_eq(1.0, 1.0 + 0.5e-5, FUZZY_TOLERANCE));
        assert!(!utils::approx_eq(1.0, 1.0 + 2e-5, FUZZY_TOLERANCE));
    }

    #[test]
    fn test_approx_eq_slice_length_mismatch() {
        assert!(!utils::approx_eq_slice(&[0.0, 0.0], &[0.0], FUZZY_TOLERANCE));
        assert!(utils::approx_eq_slice(&[0.0, 1.0], &[0.0, 1.0], FUZZY_TOLERANCE));
    }

    #[test]
    fn test_z_up_to_y_up() {
        let m = matrix::z_up_to_y_up();
        // +Z 变为 +Y
        let up = matrix::transform_vector(&m, [0.0, 0.0, 1.0]);
        assert!((up[1] - 1.0).abs() < 1e-6);
        assert!(up[0].abs() < 1e-6 && up[2].abs() < 1e-6);

        // +Y 变为 -Z
        let fwd = matrix::transform_point(&m, [0.0, 1.0, 0.0]);
        assert!((fwd[2] + 1.0).abs() < 1e-6);
    }
}
