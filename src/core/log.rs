//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 使用示例
//!
//! ```no_run
//! use txt_model::core::log;
//! use txt_model::core::config::LogLevel;
//!
//! log::init_logger(LogLevel::Info, false, None)?;
//!
//! tracing::info!(triangles = 12, "Model loaded");
//! # Ok::<(), txt_model::core::Error>(())
//! ```

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;
use super::error::{Error, Result};

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。`RUST_LOG` 环境变量存在时优先于 `level`。
/// 全局 subscriber 已经设置过时返回 `Error::Log`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "txt_model.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    if file_output {
        // 解析日志文件路径
        let log_path = log_file_path.unwrap_or("txt_model.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("txt_model.log");

        // 每天滚动
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| Error::Log(e.to_string()))
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| Error::Log(e.to_string()))
    }
}

impl LogLevel {
    /// EnvFilter 使用的指令字符串
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 编解码日志 - Info 级别
#[macro_export]
macro_rules! codec_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "txt_model::codec", $($arg)*)
    };
}

/// 编解码日志 - Warn 级别
#[macro_export]
macro_rules! codec_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "txt_model::codec", $($arg)*)
    };
}

/// 编解码日志 - Error 级别
#[macro_export]
macro_rules! codec_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "txt_model::codec", $($arg)*)
    };
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
