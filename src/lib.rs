//! txt_model - 文本模型格式编解码
//!
//! 读写按行组织的文本三角形模型（版本 1）：每个三角形带三个顶点、材质、
//! 两个纹理名、LOD 级别和渲染状态。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `math`: 数学工具（容差比较、坐标轴转换、法线重建）
//! - `model`: 模型数据、读写和网格转换
//! - `geometry`: CPU 侧网格与加载器（OBJ、文本模型）
//!
//! # 使用示例
//!
//! ```no_run
//! use txt_model::model::Model;
//!
//! let model = Model::load("wheel.txt")?;
//! for lod in model.lod_levels() {
//!     println!("LOD {}: {} 个三角形", lod, model.triangles_for_lod(lod).len());
//! }
//! model.save("wheel_copy.txt")?;
//! # Ok::<(), txt_model::core::Error>(())
//! ```

pub mod core;
pub mod math;
pub mod model;
pub mod geometry;

pub use model::{Material, Model, ModelVertex, Triangle};
