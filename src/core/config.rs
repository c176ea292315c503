//! 配置管理模块
//!
//! 提供工具配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (txt_model.toml)
//!
//! ```toml
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! log_file = "txt_model.log"
//!
//! [export]
//! lod_level = 0       # 0 = constant, 1 = low, 2 = medium, 3 = high
//! var_tex2 = false
//! state = 0
//! append = false
//!
//! [convert]
//! z_up = false        # 源网格为 Z 轴向上时旋转到 Y 轴向上
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};
use crate::model::LodLevel;

/// 工具配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 导出默认值
    #[serde(default)]
    pub export: ExportConfig,

    /// 坐标转换配置
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// 导出配置
///
/// 源网格没有携带 LOD、render state 等元数据时使用的默认值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 默认 LOD 级别
    #[serde(default)]
    pub lod_level: i32,

    /// 第二纹理是否可变
    #[serde(default)]
    pub var_tex2: bool,

    /// 默认渲染状态
    #[serde(default)]
    pub state: i32,

    /// 追加到已有模型文件而不是覆盖
    #[serde(default)]
    pub append: bool,
}

/// 坐标转换配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// 源网格为 Z 轴向上
    #[serde(default)]
    pub z_up: bool,
}

// 默认值函数
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "txt_model.log".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            lod_level: LodLevel::Constant as i32,
            var_tex2: false,
            state: 0,
            append: false,
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    ///
    /// 成功返回 `Config` 实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--append`: 追加到已有模型文件
    /// - `--var-tex2`: 第二纹理可变
    /// - `--z-up`: 源网格为 Z 轴向上
    /// - `--lod <value>`: 默认 LOD 级别
    /// - `--state <value>`: 默认渲染状态
    /// - `--log <level>`: 日志级别
    ///
    /// 无法解析的数值会被忽略，保留原值。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if args.iter().any(|a| a == "--append") {
            self.export.append = true;
        }

        if args.iter().any(|a| a == "--var-tex2") {
            self.export.var_tex2 = true;
        }

        if args.iter().any(|a| a == "--z-up") {
            self.convert.z_up = true;
        }

        if let Some(lod) = value_after(&args, "--lod").and_then(|s| s.parse().ok()) {
            self.export.lod_level = lod;
        }

        if let Some(state) = value_after(&args, "--state").and_then(|s| s.parse().ok()) {
            self.export.state = state;
        }

        if let Some(level) = value_after(&args, "--log").and_then(LogLevel::from_name) {
            self.logging.level = level;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if LodLevel::try_from(self.export.lod_level).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "export.lod_level".to_string(),
                reason: format!("LOD level must be 0..=3, got {}", self.export.lod_level),
            }.into());
        }

        if self.export.state < 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.state".to_string(),
                reason: "Render state must not be negative".to_string(),
            }.into());
        }

        Ok(())
    }
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).map(String::as_str)
}

impl LogLevel {
    /// 从小写名称解析
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
