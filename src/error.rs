//! 定义了整个 `ttml-cues` 库的错误类型 `CueHelperError`。

use std::io;
use thiserror::Error;

use crate::converter::types::ConvertError;

/// `ttml-cues` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum CueHelperError {
    /// TTML 解码或编码失败
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 配置相关的错误，例如找不到配置目录
    #[error("配置错误: {0}")]
    Config(String),
}

/// `CueHelperError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, CueHelperError>;
