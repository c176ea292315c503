//! 错误处理模块
//!
//! 定义了 crate 中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 手动实现 `Display` 和 `Error` trait
//! - 为每种错误类型提供清晰的上下文信息（字段名、行号）
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, Error>;

/// 顶层错误类型
#[derive(Debug)]
pub enum Error {
    /// 配置错误
    Config(ConfigError),

    /// 模型文件格式错误
    Parse(ParseError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 文本模型文件的解析错误
///
/// 读取操作遇到任何一种都会整体失败，不返回部分结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 记录尚未读完就到达了文件末尾
    UnexpectedEof { expected: String },

    /// 关键字与期望的字段不符
    UnexpectedKeyword {
        line: usize,
        expected: String,
        found: String,
    },

    /// 关键字后缺少数值
    MissingValue { line: usize, field: String },

    /// 数值无法解析
    InvalidNumber {
        line: usize,
        field: String,
        value: String,
    },

    /// 不支持的格式版本
    UnsupportedVersion(i64),
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 几何数据无效
    InvalidGeometry(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Parse(e) => write!(f, "Model format error: {}", e),
            Error::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input while expecting '{}'", expected)
            }
            ParseError::UnexpectedKeyword { line, expected, found } => write!(
                f,
                "line {}: expected '{}', found '{}'",
                line, expected, found
            ),
            ParseError::MissingValue { line, field } => {
                write!(f, "line {}: missing value for '{}'", line, field)
            }
            ParseError::InvalidNumber { line, field, value } => write!(
                f,
                "line {}: invalid number '{}' for '{}'",
                line, value, field
            ),
            ParseError::UnsupportedVersion(version) => {
                write!(f, "unsupported format version {}", version)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
            MeshLoadError::InvalidGeometry(msg) => write!(f, "Invalid geometry data: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::MeshLoading(e) => Some(e),
            Error::Log(_) => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for ParseError {}
impl std::error::Error for MeshLoadError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<MeshLoadError> for Error {
    fn from(err: MeshLoadError) -> Self {
        Error::MeshLoading(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_expected_field() {
        let err = ParseError::UnexpectedKeyword {
            line: 7,
            expected: "p1".to_string(),
            found: "mat".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'p1'"));
        assert!(msg.contains("line 7"));
    }

    #[test]
    fn test_eof_message() {
        let err: Error = ParseError::UnexpectedEof { expected: "p2".to_string() }.into();
        assert!(err.to_string().contains("unexpected end of input"));
        assert!(matches!(err, Error::Parse(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_io_error_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
