/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 格式的3D模型，作为文本模型导出的网格来源。
/// 支持顶点位置、法线、纹理坐标和 MTL 材质，缺失的法线会自动重建。
use super::{LoadedMesh, MeshLoader};
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::{MeshData, Subset};
use crate::geometry::vertex::Vertex;
use crate::math::geometry::reconstruct_normals;
use crate::model::Material;
use std::path::Path;

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化
/// - UV 坐标翻转（V轴：1.0 - v），与文本模型的左上角原点一致
/// - 每个 OBJ 对象一个子网格，子网格 id 为材质下标
/// - 没有材质的对象使用追加在末尾的白色默认材质
pub struct ObjLoader;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<LoadedMesh> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, materials) = tobj::load_obj(path, &load_options())
            .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        let materials = materials.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "无法加载 MTL 材质，使用默认材质");
            Vec::new()
        });

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");

        build_mesh(name, &models, &materials)
    }

    fn load_from_memory(data: &[u8]) -> Result<LoadedMesh> {
        let mut reader = std::io::BufReader::new(data);

        // 内存中没有 MTL 文件可以引用
        let (models, _) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        build_mesh("Unnamed", &models, &[])
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

fn build_mesh(name: &str, models: &[tobj::Model], obj_materials: &[tobj::Material]) -> Result<LoadedMesh> {
    if models.is_empty() {
        return Err(MeshLoadError::ValidationError("OBJ 文件不包含任何模型".to_string()).into());
    }

    let mut materials: Vec<Material> = obj_materials.iter().map(convert_material).collect();
    let mut fallback_material: Option<u32> = None;

    let mut mesh_data = MeshData::with_name(name);
    let mut rebuilt_objects = 0usize;

    for model in models {
        let mesh = &model.mesh;

        let vertex_start = mesh_data.vertices.len() as u32;
        let face_start = mesh_data.triangle_count() as u32;

        let positions = &mesh.positions;
        let normals = &mesh.normals;
        let texcoords = &mesh.texcoords;

        if positions.len() % 3 != 0 {
            return Err(MeshLoadError::InvalidGeometry(
                format!("顶点位置数据不完整: {} 个浮点数", positions.len())
            ).into());
        }

        let vertex_count = positions.len() / 3;
        let mut vertices = Vec::with_capacity(vertex_count);

        for i in 0..vertex_count {
            let position = [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

            let normal = if normals.len() >= (i + 1) * 3 {
                [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
            } else {
                [0.0, 0.0, 0.0]
            };

            let texcoord = if texcoords.len() >= (i + 1) * 2 {
                [texcoords[i * 2], 1.0 - texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };

            vertices.push(Vertex::new(position, normal, texcoord, [0.0, 0.0]));
        }

        // 只重建缺少法线的对象，索引相对于该对象自身的顶点
        if normals.len() < vertex_count * 3 {
            reconstruct_normals(&mut vertices, &mesh.indices);
            rebuilt_objects += 1;
        }

        mesh_data.vertices.extend(vertices);
        mesh_data
            .indices
            .extend(mesh.indices.iter().map(|&index| vertex_start + index));

        let material_id = match mesh.material_id {
            Some(id) if id < materials.len() => id as u32,
            _ => *fallback_material.get_or_insert_with(|| {
                materials.push(default_material());
                (materials.len() - 1) as u32
            }),
        };

        let face_count = (mesh.indices.len() / 3) as u32;
        mesh_data.subsets.push(Subset::new(material_id, face_start, face_count));
    }

    if rebuilt_objects > 0 {
        tracing::info!(objects = rebuilt_objects, "OBJ 对象缺少法线数据，已重建");
    }

    mesh_data
        .validate()
        .map_err(MeshLoadError::ValidationError)?;

    tracing::info!(
        "成功加载 OBJ 文件: {} 个顶点, {} 个三角形, {} 个材质",
        mesh_data.vertex_count(),
        mesh_data.triangle_count(),
        materials.len()
    );

    Ok(LoadedMesh {
        mesh: mesh_data,
        materials,
    })
}

fn default_material() -> Material {
    Material {
        diffuse: [1.0, 1.0, 1.0, 1.0],
        ambient: [0.5, 0.5, 0.5, 1.0],
        ..Material::default()
    }
}

/// MTL 材质 → 模型材质
///
/// 透明度 (`d`) 写入漫反射和环境光的 alpha；纹理只保留文件名。
fn convert_material(m: &tobj::Material) -> Material {
    let alpha = m.dissolve.unwrap_or(1.0);
    let rgba = |c: Option<[f32; 3]>, a: f32| {
        let c = c.unwrap_or([0.0, 0.0, 0.0]);
        [c[0], c[1], c[2], a]
    };

    Material {
        diffuse: rgba(m.diffuse, alpha),
        ambient: rgba(m.ambient, alpha),
        specular: rgba(m.specular, 1.0),
        tex1: m.diffuse_texture.as_deref().map(texture_basename).unwrap_or_default(),
        ..Material::default()
    }
}

fn texture_basename(path: &str) -> String {
    let path = path.replace('\\', "/");
    Path::new(&path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
o tri
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";

    #[test]
    fn test_supported_extensions() {
        assert_eq!(ObjLoader::supported_extensions(), &["obj"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_memory() {
        let loaded = ObjLoader::load_from_memory(TRIANGLE_OBJ.as_bytes()).unwrap();

        assert_eq!(loaded.mesh.triangle_count(), 1);
        assert_eq!(loaded.mesh.vertex_count(), 3);
        // 无材质时追加一个默认材质
        assert_eq!(loaded.materials.len(), 1);
        assert_eq!(loaded.mesh.subsets, vec![Subset::new(0, 0, 1)]);

        // V 轴翻转
        assert_eq!(loaded.mesh.vertices[2].texcoord, [0.0, 0.0]);
        assert_eq!(loaded.mesh.vertices[0].texcoord, [0.0, 1.0]);

        // 法线被重建为 +Z
        for v in &loaded.mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_authored_normals_kept_when_other_object_lacks_them() {
        // 第一个对象的法线故意与几何朝向相反
        let obj = "\
o authored
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 -1
f 1//1 2//1 3//1
o bare
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let loaded = ObjLoader::load_from_memory(obj.as_bytes()).unwrap();

        assert_eq!(loaded.mesh.vertex_count(), 6);
        assert_eq!(loaded.mesh.subsets.len(), 2);
        for v in &loaded.mesh.vertices[..3] {
            assert_eq!(v.normal, [0.0, 0.0, -1.0]);
        }
        for v in &loaded.mesh.vertices[3..] {
            assert!((v.normal[2] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_convert_material() {
        let m = tobj::Material {
            diffuse: Some([0.8, 0.4, 0.2]),
            ambient: Some([0.1, 0.1, 0.1]),
            dissolve: Some(0.5),
            diffuse_texture: Some("textures\\wall.png".to_string()),
            ..Default::default()
        };

        let mat = convert_material(&m);
        assert_eq!(mat.diffuse, [0.8, 0.4, 0.2, 0.5]);
        assert_eq!(mat.ambient[3], 0.5);
        assert_eq!(mat.specular, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mat.tex1, "wall.png");
        assert_eq!(mat.tex2, "");
    }

    #[test]
    fn test_texture_basename() {
        assert_eq!(texture_basename("a/b/c.png"), "c.png");
        assert_eq!(texture_basename("c.png"), "c.png");
        assert_eq!(texture_basename(""), "");
    }
}
