/// 文本模型加载器
///
/// 把文本模型当作网格加载，用于预览和校验。只保留最高细节的几何：
/// `Constant` 级别的三角形加上出现过的最精细 LOD 级别（High > Medium > Low）。
use super::{LoadedMesh, MeshLoader};
use crate::core::error::{MeshLoadError, Result};
use crate::model::convert::triangles_to_mesh;
use crate::model::{read_model, LodLevel, Model};
use std::path::Path;

/// 文本模型格式加载器
pub struct TxtModelLoader;

impl MeshLoader for TxtModelLoader {
    fn load_from_file(path: &Path) -> Result<LoadedMesh> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let model = Model::load(path)?;
        let mut loaded = finest_mesh(&model);
        loaded.mesh.name = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
        Ok(loaded)
    }

    fn load_from_memory(data: &[u8]) -> Result<LoadedMesh> {
        let text = std::str::from_utf8(data)
            .map_err(|e| MeshLoadError::ParseError(format!("模型文件不是有效的 UTF-8: {}", e)))?;

        let model = read_model(text)?;
        Ok(finest_mesh(&model))
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["txt"]
    }
}

/// 模型中最精细的非 `Constant` LOD 级别
pub fn finest_lod(model: &Model) -> Option<LodLevel> {
    model
        .lod_levels()
        .into_iter()
        .filter_map(|lod| LodLevel::try_from(lod).ok())
        .filter(|lod| *lod != LodLevel::Constant)
        .max()
}

fn finest_mesh(model: &Model) -> LoadedMesh {
    let finest = finest_lod(model).map(|lod| lod as i32);

    let triangles: Vec<_> = model
        .triangles
        .iter()
        .filter(|t| t.lod_level == LodLevel::Constant as i32 || Some(t.lod_level) == finest)
        .collect();

    tracing::debug!(
        kept = triangles.len(),
        total = model.triangle_count(),
        finest = ?finest,
        "Selected preview triangles"
    );

    let (mesh, materials) = triangles_to_mesh(&triangles);
    LoadedMesh { mesh, materials }
}
