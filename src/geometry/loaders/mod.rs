/// 模型加载器模块
///
/// 提供统一的网格加载接口和各种格式的具体实现。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate），导出到文本模型的来源
/// - **TXT**: 文本模型格式，用于预览和校验
///
/// # 使用示例
///
/// ```rust,no_run
/// use txt_model::geometry::loaders::load_mesh;
/// use std::path::Path;
///
/// let loaded = load_mesh(Path::new("model.obj"))?;
/// println!("{} 个三角形", loaded.mesh.triangle_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshData;
use crate::model::Material;
use std::path::Path;

pub mod obj_loader;
pub mod txt_loader;

pub use obj_loader::ObjLoader;
pub use txt_loader::TxtModelLoader;

/// 加载结果：网格和按 `Subset::id` 索引的材质列表
#[derive(Debug, Clone, Default)]
pub struct LoadedMesh {
    pub mesh: MeshData,
    pub materials: Vec<Material>,
}

/// 网格加载器 trait
///
/// 所有格式的加载器都实现此 trait。加载器是无状态的，返回 CPU 侧数据。
pub trait MeshLoader {
    /// 从文件路径加载网格
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    /// - 数据验证失败
    fn load_from_file(path: &Path) -> Result<LoadedMesh>;

    /// 从内存数据加载网格
    fn load_from_memory(data: &[u8]) -> Result<LoadedMesh>;

    /// 支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_mesh(path: &Path) -> Result<LoadedMesh> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path)
    } else if TxtModelLoader::supported_extensions().contains(&extension.as_str()) {
        TxtModelLoader::load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_supported_extensions() {
        assert!(ObjLoader::supported_extensions().contains(&"obj"));
        assert!(TxtModelLoader::supported_extensions().contains(&"txt"));
    }

    #[test]
    fn test_unknown_extension() {
        let result = load_mesh(Path::new("model.fbx"));
        assert!(matches!(
            result,
            Err(Error::MeshLoading(MeshLoadError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_missing_extension() {
        assert!(load_mesh(Path::new("model")).is_err());
    }
}
