/// 模型与网格之间的转换
///
/// 导出方向：`MeshData` + 材质列表 → 追加到 `Model`。
/// 导入方向：`Model` → 每个 LOD 一个索引网格，顶点和材质按容差去重。
///
/// 两侧的纹理坐标都以左上角为原点，转换时不翻转 V。

use super::{Material, Model, ModelVertex, Triangle};
use crate::core::config::ExportConfig;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::{MeshData, Subset};
use crate::geometry::vertex::Vertex;

/// 导出默认值
///
/// 网格来源不携带 LOD、可变纹理和渲染状态，导出的每个三角形都使用这些值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportDefaults {
    pub lod_level: i32,
    pub var_tex2: bool,
    pub state: i32,
}

impl From<&ExportConfig> for ExportDefaults {
    fn from(config: &ExportConfig) -> Self {
        Self {
            lod_level: config.lod_level,
            var_tex2: config.var_tex2,
            state: config.state,
        }
    }
}

/// 单个 LOD 级别的网格
#[derive(Debug, Clone)]
pub struct LodMesh {
    pub lod_level: i32,
    pub mesh: MeshData,
    /// 按 `Subset::id` 索引
    pub materials: Vec<Material>,
}

impl From<&Vertex> for ModelVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            coord: v.position,
            normal: v.normal,
            t1: v.texcoord,
            t2: v.texcoord2,
        }
    }
}

impl From<&ModelVertex> for Vertex {
    fn from(v: &ModelVertex) -> Self {
        Vertex::new(v.coord, v.normal, v.t1, v.t2)
    }
}

impl Model {
    /// 将网格的所有三角形追加到模型末尾
    ///
    /// `materials` 按 `Subset::id` 索引；找不到的材质使用默认材质。
    /// 返回追加的三角形数量。
    pub fn append_mesh(
        &mut self,
        mesh: &MeshData,
        materials: &[Material],
        defaults: &ExportDefaults,
    ) -> Result<usize> {
        mesh.validate().map_err(MeshLoadError::ValidationError)?;

        let mut missing_material = false;
        let count = mesh.triangle_count();
        self.triangles.reserve(count);

        for (face, idx) in mesh.indices.chunks_exact(3).enumerate() {
            let material_id = mesh.material_of(face as u32) as usize;
            let mut mat = match materials.get(material_id) {
                Some(m) => m.clone(),
                None => {
                    missing_material = true;
                    Material::default()
                }
            };
            mat.var_tex2 = defaults.var_tex2;
            mat.state = defaults.state;

            let p = [
                ModelVertex::from(&mesh.vertices[idx[0] as usize]),
                ModelVertex::from(&mesh.vertices[idx[1] as usize]),
                ModelVertex::from(&mesh.vertices[idx[2] as usize]),
            ];

            self.triangles.push(Triangle {
                p,
                mat,
                lod_level: defaults.lod_level,
            });
        }

        if missing_material {
            tracing::warn!(
                mesh = mesh.name.as_deref().unwrap_or("unnamed"),
                "Some faces reference a missing material, default material used"
            );
        }

        tracing::debug!(triangles = count, lod_level = defaults.lod_level, "Mesh appended to model");
        Ok(count)
    }
}

/// 将模型拆分为每个 LOD 一个网格（LOD 按首次出现顺序）
pub fn model_to_meshes(model: &Model) -> Vec<LodMesh> {
    model
        .lod_levels()
        .into_iter()
        .map(|lod_level| {
            let triangles = model.triangles_for_lod(lod_level);
            let (mut mesh, materials) = triangles_to_mesh(&triangles);
            mesh.name = Some(format!("lod_{}", lod_level));
            LodMesh {
                lod_level,
                mesh,
                materials,
            }
        })
        .collect()
}

/// 将一组三角形转换为索引网格
///
/// 顶点、材质按容差去重；三角形按材质稳定排序，每个材质一个连续的子网格。
pub fn triangles_to_mesh(triangles: &[&Triangle]) -> (MeshData, Vec<Material>) {
    let mut vertices: Vec<ModelVertex> = Vec::new();
    let mut materials: Vec<Material> = Vec::new();
    let mut faces: Vec<(u32, [u32; 3])> = Vec::with_capacity(triangles.len());

    for t in triangles {
        let material_id = index_of_or_push(&mut materials, &t.mat);
        let mut idx = [0u32; 3];
        for (slot, p) in idx.iter_mut().zip(&t.p) {
            *slot = index_of_or_push(&mut vertices, p);
        }
        faces.push((material_id, idx));
    }

    faces.sort_by_key(|(material_id, _)| *material_id);

    let mut mesh = MeshData::new();
    mesh.vertices = vertices.iter().map(Vertex::from).collect();
    mesh.indices = faces.iter().flat_map(|(_, idx)| idx.iter().copied()).collect();

    for (face, (material_id, _)) in faces.iter().enumerate() {
        match mesh.subsets.last_mut() {
            Some(subset) if subset.id == *material_id => subset.face_count += 1,
            _ => mesh.subsets.push(Subset::new(*material_id, face as u32, 1)),
        }
    }

    (mesh, materials)
}

fn index_of_or_push<T: PartialEq + Clone>(items: &mut Vec<T>, item: &T) -> u32 {
    match items.iter().position(|x| x == item) {
        Some(i) => i as u32,
        None => {
            items.push(item.clone());
            (items.len() - 1) as u32
        }
    }
}
