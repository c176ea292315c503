/// OBJ → 文本模型导出示例
///
/// 演示如何使用 geometry 模块加载 OBJ 文件，再导出为文本模型并读回。
///
/// 运行方式：
/// ```
/// cargo run --example load_obj -- assets/sphere.obj
/// ```

use std::path::Path;
use txt_model::geometry::loaders::{MeshLoader, ObjLoader};
use txt_model::model::{model_to_meshes, read_model, ExportDefaults, LodLevel, Model};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let input = std::env::args().nth(1).unwrap_or_else(|| "assets/sphere.obj".to_string());
    let obj_path = Path::new(&input);

    println!("=== OBJ → 文本模型 ===\n");
    println!("正在加载: {}", obj_path.display());

    let loaded = match ObjLoader::load_from_file(obj_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n✗ 加载失败: {}", e);
            std::process::exit(1);
        }
    };

    println!("  顶点数: {}", loaded.mesh.vertex_count());
    println!("  三角形数: {}", loaded.mesh.triangle_count());
    println!("  材质数: {}", loaded.materials.len());

    let mut model = Model::new();
    let defaults = ExportDefaults {
        lod_level: LodLevel::High as i32,
        ..ExportDefaults::default()
    };
    if let Err(e) = model.append_mesh(&loaded.mesh, &loaded.materials, &defaults) {
        eprintln!("\n✗ 导出失败: {}", e);
        std::process::exit(1);
    }

    let text = model.to_text();
    println!("\n文本模型（前 12 行）:");
    for line in text.lines().take(12) {
        println!("  {}", line);
    }

    match read_model(&text) {
        Ok(parsed) if parsed == model => println!("\n✓ 读写往返一致"),
        Ok(_) => println!("\n✗ 读写往返不一致"),
        Err(e) => println!("\n✗ 读回失败: {}", e),
    }

    for lod in model_to_meshes(&model) {
        println!(
            "LOD {}: {} 个唯一顶点, {} 个子网格",
            lod.lod_level,
            lod.mesh.vertex_count(),
            lod.mesh.subsets.len()
        );
    }

    println!("\n=== 示例完成 ===");
}
