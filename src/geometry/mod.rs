/// 几何体模块
///
/// 文本模型与外部网格来源之间的 CPU 侧网格表示。
///
/// # 模块结构
///
/// - `vertex`: 顶点数据结构定义
/// - `mesh`: 网格数据和子网格结构
/// - `loaders`: 各种格式的网格加载器
///
/// # 数据流
///
/// ```text
/// OBJ 文件 ──ObjLoader──► MeshData + 材质 ──append_mesh──► Model ──► .txt
/// .txt ──► Model ──model_to_meshes──► 每个 LOD 一个 MeshData
/// ```

pub mod vertex;
pub mod mesh;
pub mod loaders;

pub use vertex::Vertex;
pub use mesh::{MeshData, Subset};
