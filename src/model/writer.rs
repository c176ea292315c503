/// 文本模型写出
///
/// 浮点数使用 `Display` 的最短可往返表示，读回后逐位相同。

use std::io::Write;

use super::{Model, ModelVertex, Triangle};
use crate::core::error::Result;

/// 将模型写入任意 `Write`
///
/// 只有底层 IO 会失败。
pub fn write_model<W: Write>(model: &Model, out: &mut W) -> Result<()> {
    writeln!(out, "# Colobot text model")?;
    writeln!(out)?;

    writeln!(out, "### HEAD")?;
    writeln!(out, "version {}", model.version)?;
    writeln!(out, "total_triangles {}", model.triangles.len())?;
    writeln!(out)?;
    writeln!(out, "### TRIANGLES")?;

    for t in &model.triangles {
        write_triangle(t, out)?;
    }

    tracing::trace!(triangles = model.triangles.len(), "Model serialized");
    Ok(())
}

fn write_triangle<W: Write>(t: &Triangle, out: &mut W) -> std::io::Result<()> {
    for (i, p) in t.p.iter().enumerate() {
        write!(out, "p{}", i + 1)?;
        write_vertex(p, out)?;
        writeln!(out)?;
    }

    write!(out, "mat")?;
    write_floats(out, " dif", &t.mat.diffuse)?;
    write_floats(out, " amb", &t.mat.ambient)?;
    write_floats(out, " spc", &t.mat.specular)?;
    writeln!(out)?;

    write_name(out, "tex1", &t.mat.tex1)?;
    write_name(out, "tex2", &t.mat.tex2)?;
    writeln!(out, "var_tex2 {}", if t.mat.var_tex2 { "Y" } else { "N" })?;
    writeln!(out, "lod_level {}", t.lod_level)?;
    writeln!(out, "state {}", t.mat.state)?;
    writeln!(out)
}

fn write_vertex<W: Write>(p: &ModelVertex, out: &mut W) -> std::io::Result<()> {
    write_floats(out, " c", &p.coord)?;
    write_floats(out, " n", &p.normal)?;
    write_floats(out, " t1", &p.t1)?;
    write_floats(out, " t2", &p.t2)
}

// 空名称不带尾随空格
fn write_name<W: Write>(out: &mut W, tag: &str, name: &str) -> std::io::Result<()> {
    if name.is_empty() {
        writeln!(out, "{}", tag)
    } else {
        writeln!(out, "{} {}", tag, name)
    }
}

fn write_floats<W: Write>(out: &mut W, tag: &str, values: &[f32]) -> std::io::Result<()> {
    out.write_all(tag.as_bytes())?;
    for v in values {
        write!(out, " {}", v)?;
    }
    Ok(())
}
