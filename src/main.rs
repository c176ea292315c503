//! txt_model - 文本模型命令行工具
//!
//! # 使用方法
//!
//! ```bash
//! # 查看模型信息
//! txt_model info model.txt
//!
//! # 解析并验证读写往返
//! txt_model check model.txt
//!
//! # 从 OBJ 导出（可追加到已有模型）
//! txt_model export mesh.obj model.txt --lod 3 --state 0 --append
//! ```
//!
//! 配置从当前目录的 `txt_model.toml` 读取（可选），命令行参数覆盖配置。

use anyhow::{bail, Context};
use std::path::Path;
use tracing::{error, info};

use txt_model::core::{log, Config};
use txt_model::geometry::loaders::load_mesh;
use txt_model::math::{geometry::transform_vertices, matrix};
use txt_model::model::{model_to_meshes, read_model, ExportDefaults, LodLevel, Model};

const USAGE: &str = "\
usage:
  txt_model info <model.txt>
  txt_model check <model.txt>
  txt_model export <mesh.obj> <model.txt> [--append] [--lod N] [--state N] [--var-tex2] [--z-up]

options:
  --log <level>   trace, debug, info, warn, error";

/// 带值的参数，取位置参数时需要跳过其后的值
const VALUE_FLAGS: &[&str] = &["--lod", "--state", "--log"];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("txt_model.toml");

    // 2. 应用命令行参数
    config.apply_args(&args);

    // 3. 验证配置
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 4. 初始化日志系统
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    if let Err(e) = log::init_logger(config.logging.level, config.logging.file_output, log_file) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let positional = positional_args(&args);
    let Some((command, paths)) = positional.split_first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    if let Err(e) = run(command, paths, &config) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: &str, paths: &[String], config: &Config) -> anyhow::Result<()> {
    match (command, paths) {
        ("info", [model]) => info_command(Path::new(model)),
        ("check", [model]) => check_command(Path::new(model)),
        ("export", [input, output]) => export_command(Path::new(input), Path::new(output), config),
        _ => bail!("invalid arguments\n{}", USAGE),
    }
}

fn info_command(path: &Path) -> anyhow::Result<()> {
    let model = Model::load(path).with_context(|| format!("failed to read {}", path.display()))?;

    println!("file:       {}", path.display());
    println!("version:    {}", model.version);
    println!("triangles:  {}", model.triangle_count());

    for lod in model_to_meshes(&model) {
        let name = LodLevel::try_from(lod.lod_level).map_or("unknown", LodLevel::name);
        println!(
            "lod {} ({}): {} triangles, {} unique vertices, {} materials",
            lod.lod_level,
            name,
            lod.mesh.triangle_count(),
            lod.mesh.vertex_count(),
            lod.materials.len()
        );
    }

    for pair in model.tex_pairs() {
        let tex1 = if pair.tex1.is_empty() { "-" } else { pair.tex1.as_str() };
        let tex2 = if pair.tex2.is_empty() { "-" } else { pair.tex2.as_str() };
        println!("textures:   {} / {}", tex1, tex2);
    }

    Ok(())
}

fn check_command(path: &Path) -> anyhow::Result<()> {
    let model = Model::load(path).with_context(|| format!("failed to read {}", path.display()))?;

    let reparsed = read_model(&model.to_text()).context("re-reading serialized model failed")?;
    if reparsed != model {
        bail!("round trip mismatch for {}", path.display());
    }

    info!(path = %path.display(), triangles = model.triangle_count(), "Model OK");
    println!("{}: OK ({} triangles)", path.display(), model.triangle_count());
    Ok(())
}

fn export_command(input: &Path, output: &Path, config: &Config) -> anyhow::Result<()> {
    let mut loaded = load_mesh(input).with_context(|| format!("failed to load {}", input.display()))?;

    if config.convert.z_up {
        transform_vertices(&mut loaded.mesh.vertices, &matrix::z_up_to_y_up());
    }

    let mut model = if config.export.append && output.exists() {
        Model::load(output).with_context(|| format!("failed to read {} for appending", output.display()))?
    } else {
        Model::new()
    };
    let existing = model.triangle_count();

    let defaults = ExportDefaults::from(&config.export);
    let added = model.append_mesh(&loaded.mesh, &loaded.materials, &defaults)?;

    model
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        existing,
        added,
        lod_level = defaults.lod_level,
        "Export finished"
    );
    println!("{} -> {}: {} triangles written", input.display(), output.display(), model.triangle_count());
    Ok(())
}

/// 去掉 `--flag` 及带值参数的值，剩下命令和路径
fn positional_args(args: &[String]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            positional.push(arg.clone());
        }
    }
    positional
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_args() {
        let args = strings(&["export", "--lod", "2", "a.obj", "--append", "b.txt", "--log", "debug"]);
        assert_eq!(positional_args(&args), strings(&["export", "a.obj", "b.txt"]));
    }

    #[test]
    fn test_run_rejects_bad_arguments() {
        let config = Config::default();
        assert!(run("info", &[], &config).is_err());
        assert!(run("frobnicate", &strings(&["x"]), &config).is_err());
    }
}
