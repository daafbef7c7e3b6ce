//! # TTML 生成器
//!
//! 输出固定结构的文档：`tt > body > div > p*`，每个 `<p>` 带有
//! `HH:MM:SS.mmm` 格式的 `begin` / `end` 属性。

use std::io::Cursor;

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesText, Event},
};
use tracing::debug;

use crate::{
    converter::{
        types::{ConvertError, TTML_NAMESPACE},
        utils::format_duration,
    },
    model::cue::Cue,
};

/// TTML 生成的主入口函数。
///
/// # 参数
/// * `cues` - 要写入的条目，按给定顺序输出。
///
/// # 返回
///
/// * `Ok(String)` - 两个空格缩进的 TTML 文本。
///
/// # Errors
///
/// 写入 XML 失败或结果不是合法 UTF-8 时返回 `ConvertError`。
pub fn generate_ttml(cues: &[Cue]) -> Result<String, ConvertError> {
    let mut buffer = Vec::with_capacity(128 + cues.len() * 64);
    let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element("tt")
        .with_attribute(("xmlns", TTML_NAMESPACE))
        .write_inner_content(|writer| {
            writer
                .create_element("body")
                .write_inner_content(|writer| {
                    writer
                        .create_element("div")
                        .write_inner_content(|writer| write_paragraphs(writer, cues))?;
                    Ok(())
                })?;
            Ok(())
        })?;

    debug!("已生成 {} 个 <p> 元素", cues.len());
    String::from_utf8(buffer).map_err(ConvertError::FromUtf8)
}

/// 写入每一条 `<p>`。文本只转义 `&`、`<`、`>`。
fn write_paragraphs<W: std::io::Write>(
    writer: &mut Writer<W>,
    cues: &[Cue],
) -> std::io::Result<()> {
    for cue in cues {
        writer
            .create_element("p")
            .with_attribute(("begin", format_duration(cue.start_ms).as_str()))
            .with_attribute(("end", format_duration(cue.end_ms).as_str()))
            .write_text_content(BytesText::from_escaped(partial_escape(cue.text.as_str())))?;
    }
    Ok(())
}
