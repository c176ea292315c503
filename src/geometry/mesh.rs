/// 网格数据结构模块
///
/// 定义CPU侧的索引网格，是模型文件与外部网格来源（OBJ 文件、宿主程序）之间的交换格式。

use super::vertex::Vertex;

/// 子网格描述符
///
/// 描述使用同一材质的一段连续三角形。`id` 为材质在材质列表中的下标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    /// 材质下标
    pub id: u32,

    /// 起始面索引（以三角形为单位）
    pub face_start: u32,

    /// 三角形数量
    pub face_count: u32,
}

impl Subset {
    #[inline]
    pub fn new(id: u32, face_start: u32, face_count: u32) -> Self {
        Self {
            id,
            face_start,
            face_count,
        }
    }

    /// 索引起始位置（以索引数量计）
    #[inline]
    pub fn index_start(&self) -> u32 {
        self.face_start * 3
    }

    /// 索引数量
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.face_count * 3
    }
}

/// CPU侧网格数据
///
/// 顶点、三角形索引和子网格。不包含材质本身，材质列表由调用方单独持有，
/// 通过 `Subset::id` 关联。
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 三角形顶点索引，每3个索引定义一个三角形
    pub indices: Vec<u32>,

    /// 子网格列表，为空时所有三角形使用材质 0
    pub subsets: Vec<Subset>,

    /// 网格名称（可选）
    pub name: Option<String>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 第 `face` 个三角形使用的材质下标
    pub fn material_of(&self, face: u32) -> u32 {
        self.subsets
            .iter()
            .find(|s| face >= s.face_start && face - s.face_start < s.face_count)
            .map_or(0, |s| s.id)
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是3的倍数
    /// - 所有索引都在有效范围内
    /// - 子网格的面范围有效
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len() as u32;
        for (i, &index) in self.indices.iter().enumerate() {
            if index >= vertex_count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (共 {} 个顶点)",
                    i, index, vertex_count
                ));
            }
        }

        let triangle_count = self.triangle_count() as u32;
        for (i, subset) in self.subsets.iter().enumerate() {
            let in_bounds = subset
                .face_start
                .checked_add(subset.face_count)
                .is_some_and(|end| end <= triangle_count);
            if !in_bounds {
                return Err(format!(
                    "子网格 {} 的面范围超出边界: start={}, count={}, total={}",
                    i, subset.face_start, subset.face_count, triangle_count
                ));
            }
        }

        Ok(())
    }
}
