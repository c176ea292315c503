/// 文本模型读取
///
/// 文件按行切分，空白行和第一列为 `#` 的行在任何位置都被跳过，其余行按空白分词。
/// 缩进的 `#` 不是注释。
/// 每条记录必须按固定顺序出现：
///
/// ```text
/// version 1
/// total_triangles <n>
/// p1 c <x> <y> <z> n <x> <y> <z> t1 <u> <v> t2 <u> <v>
/// p2 ...
/// p3 ...
/// mat dif <r> <g> <b> <a> amb <r> <g> <b> <a> spc <r> <g> <b> <a>
/// tex1 <name>
/// tex2 <name>
/// var_tex2 <Y|N>
/// lod_level <int>
/// state <int>
/// ```
///
/// `total_triangles` 决定读取多少条三角形记录，之后的内容被忽略。

use std::io::Read;
use std::str::FromStr;

use super::{Material, Model, ModelVertex, Triangle, FORMAT_VERSION};
use crate::core::error::{ParseError, Result};

/// 从字符串解析模型
pub fn read_model(text: &str) -> Result<Model> {
    let mut lines = Lines::new(text);

    let mut header = lines.expect("version")?;
    let version: i64 = header.number("version")?;
    if version != i64::from(FORMAT_VERSION) {
        crate::codec_error!(version, "Unsupported model version");
        return Err(ParseError::UnsupportedVersion(version).into());
    }

    let mut header = lines.expect("total_triangles")?;
    let total: usize = header.number("total_triangles")?;

    let mut model = Model::new();
    // 声明的数量不可信，预分配设上限
    model.triangles.reserve(total.min(4096));

    for _ in 0..total {
        model.triangles.push(read_triangle(&mut lines)?);
    }

    if lines.has_more() {
        crate::codec_warn!(
            declared = total,
            "Trailing records after the declared triangle count were ignored"
        );
    }

    tracing::debug!(triangles = model.triangles.len(), "Model parsed");
    Ok(model)
}

/// 从任意 `Read` 解析模型
///
/// 整个输入被读入内存。非 UTF-8 内容作为 IO 错误返回。
pub fn read_model_from<R: Read>(mut reader: R) -> Result<Model> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    read_model(&text)
}

fn read_triangle(lines: &mut Lines<'_>) -> Result<Triangle> {
    let p1 = read_vertex(&mut lines.expect("p1")?)?;
    let p2 = read_vertex(&mut lines.expect("p2")?)?;
    let p3 = read_vertex(&mut lines.expect("p3")?)?;

    let mut mat = read_material(&mut lines.expect("mat")?)?;

    mat.tex1 = lines.expect("tex1")?.rest_or_empty().to_string();
    mat.tex2 = lines.expect("tex2")?.rest_or_empty().to_string();

    let mut record = lines.expect("var_tex2")?;
    mat.var_tex2 = record.value("var_tex2")? == "Y";

    let mut record = lines.expect("lod_level")?;
    let lod_level = record.number("lod_level")?;

    let mut record = lines.expect("state")?;
    mat.state = record.number("state")?;

    Ok(Triangle {
        p: [p1, p2, p3],
        mat,
        lod_level,
    })
}

fn read_vertex(record: &mut Record<'_>) -> std::result::Result<ModelVertex, ParseError> {
    record.tag("c")?;
    let coord = record.floats("c")?;
    record.tag("n")?;
    let normal = record.floats("n")?;
    record.tag("t1")?;
    let t1 = record.floats("t1")?;
    record.tag("t2")?;
    let t2 = record.floats("t2")?;

    Ok(ModelVertex { coord, normal, t1, t2 })
}

fn read_material(record: &mut Record<'_>) -> std::result::Result<Material, ParseError> {
    record.tag("dif")?;
    let diffuse = record.floats("dif")?;
    record.tag("amb")?;
    let ambient = record.floats("amb")?;
    record.tag("spc")?;
    let specular = record.floats("spc")?;

    Ok(Material {
        diffuse,
        ambient,
        specular,
        ..Material::default()
    })
}

/// 跳过空行和注释行的行迭代器
///
/// 预读一条记录，以便知道当前记录是否为输入中的最后一条。
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    peeked: Option<Record<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines = Self {
            inner: text.lines().enumerate(),
            peeked: None,
        };
        lines.peeked = lines.scan();
        lines
    }

    fn scan(&mut self) -> Option<Record<'a>> {
        for (index, line) in &mut self.inner {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            return Some(Record {
                line: index + 1,
                tokens: line.split_whitespace().collect(),
                pos: 1,
                at_end: false,
            });
        }
        None
    }

    fn next_record(&mut self) -> Option<Record<'a>> {
        let mut record = self.peeked.take()?;
        self.peeked = self.scan();
        record.at_end = self.peeked.is_none();
        Some(record)
    }

    /// 读取下一条记录并检查关键字
    fn expect(&mut self, keyword: &str) -> std::result::Result<Record<'a>, ParseError> {
        let record = self.next_record().ok_or_else(|| ParseError::UnexpectedEof {
            expected: keyword.to_string(),
        })?;

        if record.keyword() != keyword {
            return Err(ParseError::UnexpectedKeyword {
                line: record.line,
                expected: keyword.to_string(),
                found: record.keyword().to_string(),
            });
        }

        Ok(record)
    }

    fn has_more(&self) -> bool {
        self.peeked.is_some()
    }
}

/// 一行已分词的记录，`pos` 指向下一个未读取的 token
struct Record<'a> {
    line: usize,
    tokens: Vec<&'a str>,
    pos: usize,
    /// 之后没有其他记录，缺少的 token 视为输入被截断
    at_end: bool,
}

impl<'a> Record<'a> {
    fn keyword(&self) -> &'a str {
        // scan 只产生非空行
        self.tokens[0]
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn rest_or_empty(&mut self) -> &'a str {
        self.next_token().unwrap_or("")
    }

    fn field_name(&self, field: &str) -> String {
        if field == self.keyword() {
            field.to_string()
        } else {
            format!("{}.{}", self.keyword(), field)
        }
    }

    fn tag(&mut self, expected: &str) -> std::result::Result<(), ParseError> {
        match self.next_token() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(ParseError::UnexpectedKeyword {
                line: self.line,
                expected: self.field_name(expected),
                found: token.to_string(),
            }),
            None => Err(self.missing(expected)),
        }
    }

    fn value(&mut self, field: &str) -> std::result::Result<&'a str, ParseError> {
        self.next_token().ok_or_else(|| self.missing(field))
    }

    fn missing(&self, field: &str) -> ParseError {
        if self.at_end {
            ParseError::UnexpectedEof {
                expected: self.field_name(field),
            }
        } else {
            ParseError::MissingValue {
                line: self.line,
                field: self.field_name(field),
            }
        }
    }

    fn number<T: FromStr>(&mut self, field: &str) -> std::result::Result<T, ParseError> {
        let token = self.value(field)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            field: self.field_name(field),
            value: token.to_string(),
        })
    }

    fn floats<const N: usize>(&mut self, field: &str) -> std::result::Result<[f32; N], ParseError> {
        let mut out = [0.0; N];
        for slot in out.iter_mut() {
            *slot = self.number(field)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    const ONE_ZERO_TRIANGLE: &str = "\
# Colobot text model

### HEAD
version 1
total_triangles 1

### TRIANGLES
p1 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0
p2 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0
p3 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0
mat dif 0 0 0 0 amb 0 0 0 0 spc 0 0 0 0
tex1
tex2
var_tex2 N
lod_level 0
state 0

";

    fn parse_error(text: &str) -> ParseError {
        match read_model(text) {
            Err(Error::Parse(e)) => e,
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_zero_triangle() {
        let model = read_model(ONE_ZERO_TRIANGLE).unwrap();

        assert_eq!(model.version, 1);
        assert_eq!(model.triangles.len(), 1);

        let t = &model.triangles[0];
        assert_eq!(t.mat.tex1, "");
        assert_eq!(t.mat.tex2, "");
        assert!(!t.mat.var_tex2);
        assert_eq!(t.lod_level, 0);
        assert_eq!(t.mat.state, 0);
        assert_eq!(t.p[2].coord, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_values() {
        let text = "version 1\ntotal_triangles 1\n\
            p1 c 1 2 3 n 0 1 0 t1 0.5 0.25 t2 0 1\n\
            p2 c -1 -2.5 1e-3 n 0 0 1 t1 1 1 t2 0 0\n\
            p3 c 4 5 6 n 1 0 0 t1 0 0 t2 0 0\n\
            mat dif 1 0.5 0.25 1 amb 0.1 0.1 0.1 1 spc 0 0 0 0.5\n\
            tex1 base.png\ntex2 dirty01.png\nvar_tex2 Y\nlod_level 2\nstate 8192\n";

        let model = read_model(text).unwrap();
        let t = &model.triangles[0];

        assert_eq!(t.p[0].coord, [1.0, 2.0, 3.0]);
        assert_eq!(t.p[0].t1, [0.5, 0.25]);
        assert_eq!(t.p[0].t2, [0.0, 1.0]);
        assert_eq!(t.p[1].coord, [-1.0, -2.5, 1e-3]);
        assert_eq!(t.p[2].normal, [1.0, 0.0, 0.0]);
        assert_eq!(t.mat.diffuse, [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(t.mat.specular[3], 0.5);
        assert_eq!(t.mat.tex1, "base.png");
        assert_eq!(t.mat.tex2, "dirty01.png");
        assert!(t.mat.var_tex2);
        assert_eq!(t.lod_level, 2);
        assert_eq!(t.mat.state, 8192);
    }

    #[test]
    fn test_comments_and_blank_lines_between_records() {
        let text = ONE_ZERO_TRIANGLE
            .replace("p2 ", "# a comment\n\n   \n\t\n#another\np2 ")
            .replace("state 0", "\n\n# before state\nstate 0");

        let model = read_model(&text).unwrap();
        assert_eq!(model.triangles.len(), 1);
        assert_eq!(model.triangles[0].mat.state, 0);
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        let text = ONE_ZERO_TRIANGLE.replace("p2 ", "  # indented\np2 ");
        match parse_error(&text) {
            ParseError::UnexpectedKeyword { line, expected, found } => {
                assert_eq!(line, 9);
                assert_eq!(expected, "p2");
                assert_eq!(found, "#");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = ONE_ZERO_TRIANGLE.replace('\n', "\r\n");
        let model = read_model(&text).unwrap();
        assert_eq!(model.triangles.len(), 1);
    }

    #[test]
    fn test_unsupported_version() {
        let text = ONE_ZERO_TRIANGLE.replace("version 1", "version 2");
        let err = parse_error(&text);
        assert_eq!(err, ParseError::UnsupportedVersion(2));
        assert!(err.to_string().contains("unsupported format version"));
    }

    #[test]
    fn test_truncated_input() {
        let text = ONE_ZERO_TRIANGLE.replace("total_triangles 1", "total_triangles 2");
        let err = parse_error(&text);
        assert_eq!(err, ParseError::UnexpectedEof { expected: "p1".to_string() });
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn test_truncated_inside_record() {
        let text = "version 1\ntotal_triangles 1\np1 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0\n";
        assert_eq!(parse_error(text), ParseError::UnexpectedEof { expected: "p2".to_string() });
    }

    #[test]
    fn test_input_cut_mid_line() {
        let text = "version 1\ntotal_triangles 1\n\
            p1 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0\n\
            p2 c 0 0 0 n 0 0 0 t1 0 0 t2 0 0\n\
            p3 c 0 0 0 n 0";
        let err = parse_error(text);
        assert_eq!(err, ParseError::UnexpectedEof { expected: "p3.n".to_string() });
        assert!(err.to_string().contains("unexpected end of input"));

        let cut = ONE_ZERO_TRIANGLE.trim_end().strip_suffix(" 0").unwrap();
        assert_eq!(parse_error(cut), ParseError::UnexpectedEof { expected: "state".to_string() });

        // 之后只有注释和空行，同样算截断
        let cut = ONE_ZERO_TRIANGLE.replace("state 0", "state\n# trailing comment\n\n");
        assert_eq!(parse_error(&cut), ParseError::UnexpectedEof { expected: "state".to_string() });

        // 后面还有记录时仍然是缺值
        let short = ONE_ZERO_TRIANGLE.replace("lod_level 0", "lod_level");
        assert!(matches!(parse_error(&short), ParseError::MissingValue { line: 15, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_error("# only a comment\n\n"), ParseError::UnexpectedEof {
            expected: "version".to_string(),
        });
    }

    #[test]
    fn test_keyword_mismatch_names_expected_field() {
        let text = ONE_ZERO_TRIANGLE.replace("p1 c", "px c");
        let err = parse_error(&text);

        match &err {
            ParseError::UnexpectedKeyword { line, expected, found } => {
                assert_eq!(*line, 8);
                assert_eq!(expected, "p1");
                assert_eq!(found, "px");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("'p1'"));
    }

    #[test]
    fn test_missing_header() {
        let text = ONE_ZERO_TRIANGLE.replace("version 1\n", "");
        match parse_error(&text) {
            ParseError::UnexpectedKeyword { expected, found, .. } => {
                assert_eq!(expected, "version");
                assert_eq!(found, "total_triangles");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_vertex_sub_tag_mismatch() {
        let text = ONE_ZERO_TRIANGLE.replacen("n 0 0 0 t1", "x 0 0 0 t1", 1);
        match parse_error(&text) {
            ParseError::UnexpectedKeyword { expected, found, .. } => {
                assert_eq!(expected, "p1.n");
                assert_eq!(found, "x");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_material_sub_tag_mismatch() {
        let text = ONE_ZERO_TRIANGLE.replace("amb", "ambient");
        match parse_error(&text) {
            ParseError::UnexpectedKeyword { expected, .. } => assert_eq!(expected, "mat.amb"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_short_vertex_line() {
        let text = ONE_ZERO_TRIANGLE.replacen(" t2 0 0", " t2 0", 1);
        assert_eq!(parse_error(&text), ParseError::MissingValue {
            line: 8,
            field: "p1.t2".to_string(),
        });
    }

    #[test]
    fn test_invalid_number() {
        let text = ONE_ZERO_TRIANGLE.replace("lod_level 0", "lod_level high");
        match parse_error(&text) {
            ParseError::InvalidNumber { field, value, .. } => {
                assert_eq!(field, "lod_level");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_negative_triangle_count() {
        let text = ONE_ZERO_TRIANGLE.replace("total_triangles 1", "total_triangles -1");
        assert!(matches!(parse_error(&text), ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_var_tex2_requires_value() {
        let text = ONE_ZERO_TRIANGLE.replace("var_tex2 N", "var_tex2");
        assert!(matches!(parse_error(&text), ParseError::MissingValue { .. }));
    }

    #[test]
    fn test_trailing_records_ignored() {
        let text = ONE_ZERO_TRIANGLE.replace("total_triangles 1", "total_triangles 0");
        let model = read_model(&text).unwrap();
        assert!(model.triangles.is_empty());
    }

    #[test]
    fn test_read_from_reader() {
        let model = read_model_from(ONE_ZERO_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(model.triangles.len(), 1);

        let bad: &[u8] = &[0xff, 0xfe, 0x00];
        assert!(matches!(read_model_from(bad), Err(Error::Io(_))));
    }
}
