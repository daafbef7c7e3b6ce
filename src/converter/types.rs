//! 定义了 TTML 编解码中使用的核心数据类型。

use std::{fmt, io, path::Path};

use quick_xml::{
    Error as QuickXmlErrorMain, encoding::EncodingError,
    events::attributes::AttrError as QuickXmlAttrError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 定义 TTML 解码和编码过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 当前环境没有提供可用的 XML 解析能力。
    #[error("XML 解析器不可用")]
    MarkupParserUnavailable,
    /// XML 解析或生成错误，通常来自 `quick-xml` 库。
    #[error("XML 错误: {0}")]
    Xml(#[from] QuickXmlErrorMain),
    /// XML 属性解析错误，通常来自 `quick-xml` 库。
    #[error("XML 属性错误: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// XML 文本编码或解码错误。
    #[error("文本编码或解码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 文档结构不完整，例如存在未闭合的元素。
    #[error("XML 结构无效: {0}")]
    Markup(String),
    /// 读取输入等 IO 错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// 生成结果不是合法的 UTF-8。
    #[error("UTF-8 转换错误: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    /// 行索引超出范围。
    #[error("无效的行索引 {index}（共 {len} 行）")]
    InvalidRowIndex {
        /// 调用方传入的索引。
        index: usize,
        /// 当前的行数。
        len: usize,
    },
    /// 结束时间没有严格大于上一次记录的结束时间。
    #[error("结束时间 {end_ms}ms 必须大于上一条的结束时间 {cursor_ms}ms")]
    NonMonotonicEnd {
        /// 调用方传入的结束时间。
        end_ms: i64,
        /// 上一次记录的结束时间。
        cursor_ms: i64,
    },
    /// 该行已经记录过时间。
    #[error("第 {index} 行已经写入过时间")]
    RowAlreadyWritten {
        /// 重复写入的行索引。
        index: usize,
    },
    /// 跳过了前面尚未记录的行。
    #[error("第 {index} 行不能先于第 {expected} 行记录")]
    RowOutOfOrder {
        /// 调用方传入的索引。
        index: usize,
        /// 下一个应当记录的行号。
        expected: usize,
    },
    /// 仍有行没有记录时间，无法生成。
    #[error("TTML 尚未就绪：还有 {pending} 行没有时间")]
    NotReady {
        /// 尚未记录时间的行数。
        pending: usize,
    },
}

//=============================================================================
// 2. 常量
//=============================================================================

/// TTML 根元素使用的命名空间。
pub const TTML_NAMESPACE: &str = "http://www.w3.org/ns/ttml";

/// TTML 文档的媒体类型。
pub const TTML_MEDIA_TYPE: &str = "application/ttml+xml";

//=============================================================================
// 3. 解码输入
//=============================================================================

/// 解码器的输入：已经在内存中的文本，或者一个需要完整读取的异步数据源。
pub enum MarkupSource {
    /// TTML 文本。
    Text(String),
    /// 任意异步可读对象，例如 `tokio::fs::File`。内容必须是 UTF-8。
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl MarkupSource {
    /// 用一个异步可读对象创建输入。
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::Reader(Box::new(reader))
    }

    /// 取得完整的文本内容。对于 `Reader` 会一直读到 EOF。
    ///
    /// # Errors
    ///
    /// 读取失败或内容不是合法 UTF-8 时返回 `ConvertError::Io`。
    pub async fn into_text(self) -> Result<String, ConvertError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Reader(mut reader) => {
                let mut text = String::new();
                reader.read_to_string(&mut text).await?;
                Ok(text)
            }
        }
    }
}

impl fmt::Debug for MarkupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<String> for MarkupSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MarkupSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

//=============================================================================
// 4. 编码选项与输出
//=============================================================================

/// 控制编码器是否在首尾插入静音行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceOptions {
    /// 在正文前插入一个空行。
    pub start: bool,
    /// 在正文后插入一个空行。
    pub end: bool,
}

impl Default for SilenceOptions {
    fn default() -> Self {
        Self {
            start: true,
            end: true,
        }
    }
}

impl SilenceOptions {
    /// 不插入任何静音行。
    #[must_use]
    pub const fn none() -> Self {
        Self {
            start: false,
            end: false,
        }
    }
}

/// 带媒体类型标记的二进制 TTML 输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtmlBlob {
    media_type: &'static str,
    bytes: Vec<u8>,
}

impl TtmlBlob {
    /// 将生成好的 TTML 文本打包。
    #[must_use]
    pub fn new(xml: String) -> Self {
        Self {
            media_type: TTML_MEDIA_TYPE,
            bytes: xml.into_bytes(),
        }
    }

    /// 媒体类型，固定为 `application/ttml+xml`。
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// 字节内容。
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 字节长度。
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 是否为空。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 取出内部的字节。
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// 将内容写入文件，已存在的文件会被覆盖。
    ///
    /// # Errors
    ///
    /// 写入失败时返回 `ConvertError::Io`。
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}

impl AsRef<[u8]> for TtmlBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
