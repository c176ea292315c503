//! 文本模型数据模块
//!
//! 模型文件（版本 1）的内存表示：一个有序的三角形列表，每个三角形带三个顶点、
//! 一个材质、一个 LOD 标记。
//!
//! # 模块结构
//!
//! - `reader`: 解析文本模型文件
//! - `writer`: 写出文本模型文件
//! - `convert`: 模型与 `MeshData` 之间的转换
//!
//! # 相等性
//!
//! `ModelVertex` 和 `Material` 的比较带容差（`FUZZY_TOLERANCE`），
//! 用于对浮点处理后的顶点、材质去重。

use std::collections::HashSet;
use std::path::Path;

use crate::core::error::Result;
use crate::math::constants::FUZZY_TOLERANCE;
use crate::math::utils::approx_eq_slice;

pub mod convert;
pub mod reader;
pub mod writer;

pub use convert::{model_to_meshes, ExportDefaults, LodMesh};
pub use reader::{read_model, read_model_from};
pub use writer::write_model;

/// 唯一支持的格式版本
pub const FORMAT_VERSION: i32 = 1;

/// 模型文件中的顶点
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelVertex {
    /// 位置
    pub coord: [f32; 3],
    /// 法线
    pub normal: [f32; 3],
    /// 第一套纹理坐标
    pub t1: [f32; 2],
    /// 第二套纹理坐标
    pub t2: [f32; 2],
}

impl PartialEq for ModelVertex {
    fn eq(&self, other: &Self) -> bool {
        approx_eq_slice(&self.coord, &other.coord, FUZZY_TOLERANCE)
            && approx_eq_slice(&self.normal, &other.normal, FUZZY_TOLERANCE)
            && approx_eq_slice(&self.t1, &other.t1, FUZZY_TOLERANCE)
            && approx_eq_slice(&self.t2, &other.t2, FUZZY_TOLERANCE)
    }
}

/// 模型文件中的材质
#[derive(Debug, Clone, Default)]
pub struct Material {
    /// 漫反射颜色 (RGBA)
    pub diffuse: [f32; 4],
    /// 环境光颜色 (RGBA)
    pub ambient: [f32; 4],
    /// 高光颜色 (RGBA)
    pub specular: [f32; 4],
    /// 第一纹理文件名，可为空
    pub tex1: String,
    /// 第二纹理文件名，可为空
    pub tex2: String,
    /// 第二纹理在运行时可替换
    pub var_tex2: bool,
    /// 渲染状态，由渲染器解释
    pub state: i32,
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        approx_eq_slice(&self.diffuse, &other.diffuse, FUZZY_TOLERANCE)
            && approx_eq_slice(&self.ambient, &other.ambient, FUZZY_TOLERANCE)
            && approx_eq_slice(&self.specular, &other.specular, FUZZY_TOLERANCE)
            && self.tex1 == other.tex1
            && self.tex2 == other.tex2
            && self.var_tex2 == other.var_tex2
            && self.state == other.state
    }
}

impl Material {
    /// 该材质使用的纹理对
    pub fn tex_pair(&self) -> TexPair {
        TexPair {
            tex1: self.tex1.clone(),
            tex2: self.tex2.clone(),
        }
    }
}

/// 一对纹理文件名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TexPair {
    pub tex1: String,
    pub tex2: String,
}

/// 三角形
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Triangle {
    /// 三个顶点，顺序即绕序
    pub p: [ModelVertex; 3],
    pub mat: Material,
    pub lod_level: i32,
}

/// LOD 级别
///
/// 文件中以整数保存；未知的值在 `Triangle::lod_level` 中原样保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum LodLevel {
    /// 任何距离都可见
    Constant = 0,
    /// 最远距离可见
    Low = 1,
    /// 中等距离可见
    Medium = 2,
    /// 最近距离可见
    High = 3,
}

impl TryFrom<i32> for LodLevel {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, i32> {
        match value {
            0 => Ok(LodLevel::Constant),
            1 => Ok(LodLevel::Low),
            2 => Ok(LodLevel::Medium),
            3 => Ok(LodLevel::High),
            other => Err(other),
        }
    }
}

impl LodLevel {
    pub fn name(self) -> &'static str {
        match self {
            LodLevel::Constant => "constant",
            LodLevel::Low => "low",
            LodLevel::Medium => "medium",
            LodLevel::High => "high",
        }
    }
}

/// 文本模型
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub version: i32,
    pub triangles: Vec<Triangle>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// 创建一个空的版本 1 模型
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            triangles: Vec::new(),
        }
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("load_model", path = %path.display()).entered();

        let file = std::fs::File::open(path)?;
        read_model_from(std::io::BufReader::new(file))
    }

    /// 保存到文件（覆盖）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let mut out = std::io::BufWriter::new(file);
        write_model(self, &mut out)?;
        std::io::Write::flush(&mut out)?;

        crate::codec_info!(
            path = %path.display(),
            triangles = self.triangles.len(),
            "Model written"
        );
        Ok(())
    }

    /// 序列化为字符串
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // 写入 Vec 不会失败
        if write_model(self, &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// 模型中出现过的 LOD 级别（去重，按首次出现顺序）
    pub fn lod_levels(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.triangles
            .iter()
            .map(|t| t.lod_level)
            .filter(|lod| seen.insert(*lod))
            .collect()
    }

    /// 模型中出现过的纹理对（去重，按首次出现顺序）
    pub fn tex_pairs(&self) -> Vec<TexPair> {
        let mut seen = HashSet::new();
        self.triangles
            .iter()
            .map(|t| t.mat.tex_pair())
            .filter(|pair| seen.insert(pair.clone()))
            .collect()
    }

    /// 指定 LOD 的三角形
    pub fn triangles_for_lod(&self, lod_level: i32) -> Vec<&Triangle> {
        self.triangles
            .iter()
            .filter(|t| t.lod_level == lod_level)
            .collect()
    }

    /// 指定 LOD 的顶点，按容差去重
    pub fn vertices_for_lod(&self, lod_level: i32) -> Vec<ModelVertex> {
        let mut vertices: Vec<ModelVertex> = Vec::new();
        for t in self.triangles_for_lod(lod_level) {
            for p in &t.p {
                if !vertices.contains(p) {
                    vertices.push(*p);
                }
            }
        }
        vertices
    }

    /// 指定 LOD 的材质，按容差去重
    pub fn materials_for_lod(&self, lod_level: i32) -> Vec<Material> {
        let mut materials: Vec<Material> = Vec::new();
        for t in self.triangles_for_lod(lod_level) {
            if !materials.contains(&t.mat) {
                materials.push(t.mat.clone());
            }
        }
        materials
    }
}
