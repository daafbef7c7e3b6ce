//! TTML 编解码核心模块

pub mod generators;
pub mod parsers;
pub mod types;
pub mod utils;

pub use generators::{ttml_generator::generate_ttml, ttml_writer::TtmlWriter};
pub use parsers::{
    markup::{MarkupDocument, MarkupElement, MarkupNode, MarkupParser, QuickXmlMarkupParser},
    ttml_parser::TtmlParser,
};
pub use types::{ConvertError, MarkupSource, SilenceOptions, TtmlBlob};
pub use utils::{format_duration, parse_duration};

use crate::model::cue::{Cue, CueAction};

// ==========================================================
//  顶级编解码入口
// ==========================================================

/// 使用默认的 `quick-xml` 解析器解码 TTML。
///
/// # 参数
///
/// * `source` - TTML 文本，或需要完整读取的异步数据源。
///
/// # 返回
///
/// * `Result<Vec<Cue>, ConvertError>` - 按文档顺序排列的条目。
///
/// # Errors
///
/// 读取失败或文档格式错误时返回 `ConvertError`。
pub async fn parse(source: impl Into<MarkupSource>) -> Result<Vec<Cue>, ConvertError> {
    TtmlParser::new().parse(source.into()).await
}

/// 使用默认的 `quick-xml` 解析器解码 TTML，并对每条候选 `Cue` 调用 `on_cue`。
///
/// # Errors
///
/// 同 [`parse`]。
pub async fn parse_with<F>(
    source: impl Into<MarkupSource>,
    on_cue: F,
) -> Result<Vec<Cue>, ConvertError>
where
    F: FnMut(&Cue) -> CueAction,
{
    TtmlParser::new().parse_with(source.into(), on_cue).await
}

/// 创建一个增量 TTML 编写器。
///
/// # 参数
///
/// * `text` - 正文，每行对应一个 `<p>`。
/// * `silence` - 是否在首尾插入静音行。
#[must_use]
pub fn write(text: &str, silence: SilenceOptions) -> TtmlWriter {
    TtmlWriter::new(text, silence)
}
