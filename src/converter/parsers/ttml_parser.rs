//! # TTML 解析器
//!
//! 把扁平的 `<p begin=".." end="..">` 列表解码为 `Cue` 序列。
//! 不处理样式、区域、嵌套计时等其它 TTML 特性。

use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    converter::{
        parsers::markup::{MarkupElement, MarkupParser, QuickXmlMarkupParser},
        types::{ConvertError, MarkupSource},
        utils::parse_duration,
    },
    model::cue::{Cue, CueAction},
};

const TAG_P: &str = "p";
const ATTR_BEGIN: &str = "begin";
const ATTR_END: &str = "end";
const ATTR_DUR: &str = "dur";
const DEFAULT_TIME: &str = "0s";

/// TTML 解码器。
///
/// 持有一个可替换的 XML 解析能力；没有该能力时所有解码调用都会返回
/// [`ConvertError::MarkupParserUnavailable`]。
#[derive(Clone)]
pub struct TtmlParser {
    markup_parser: Option<Arc<dyn MarkupParser>>,
}

impl Default for TtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TtmlParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtmlParser")
            .field("has_markup_parser", &self.markup_parser.is_some())
            .finish()
    }
}

impl TtmlParser {
    /// 使用基于 `quick-xml` 的默认解析器。
    #[must_use]
    pub fn new() -> Self {
        Self::with_markup_parser(Arc::new(QuickXmlMarkupParser))
    }

    /// 使用指定的 XML 解析器。
    #[must_use]
    pub fn with_markup_parser(markup_parser: Arc<dyn MarkupParser>) -> Self {
        Self {
            markup_parser: Some(markup_parser),
        }
    }

    /// 由宿主环境决定是否提供 XML 解析能力。
    #[must_use]
    pub fn from_capability(markup_parser: Option<Arc<dyn MarkupParser>>) -> Self {
        Self { markup_parser }
    }

    /// 解码 TTML 文本。
    ///
    /// # Errors
    ///
    /// 没有 XML 解析能力或文档格式错误时返回 `ConvertError`。
    pub fn parse_str(&self, xml: &str) -> Result<Vec<Cue>, ConvertError> {
        self.parse_str_with(xml, |_| CueAction::Keep)
    }

    /// 解码 TTML 文本，并对每条候选 `Cue` 调用 `on_cue`。
    ///
    /// # 参数
    /// * `xml` - TTML 文本。
    /// * `on_cue` - 返回 `Keep` 保留候选条目，`Replace` 替换，`Omit` 跳过。
    ///
    /// # 返回
    /// 按文档顺序排列的 `Cue` 列表。失败时不返回任何部分结果。
    ///
    /// # Errors
    ///
    /// 没有 XML 解析能力或文档格式错误时返回 `ConvertError`。
    pub fn parse_str_with<F>(&self, xml: &str, mut on_cue: F) -> Result<Vec<Cue>, ConvertError>
    where
        F: FnMut(&Cue) -> CueAction,
    {
        let markup_parser = self.markup_parser()?;
        let document = markup_parser.parse_document(xml)?;

        let elements = document.elements_by_tag_name(TAG_P);
        let mut cues = Vec::with_capacity(elements.len());
        let mut omitted = 0usize;

        for element in elements {
            let candidate = cue_from_element(element);
            match on_cue(&candidate) {
                CueAction::Keep => cues.push(candidate),
                CueAction::Replace(replacement) => cues.push(replacement),
                CueAction::Omit => omitted += 1,
            }
        }

        debug!("TTML 解码完成，共 {} 条，跳过 {} 条", cues.len(), omitted);
        Ok(cues)
    }

    /// 解码文本或异步数据源。
    ///
    /// # Errors
    ///
    /// 与 [`parse_with`](Self::parse_with) 相同。
    pub async fn parse(&self, source: MarkupSource) -> Result<Vec<Cue>, ConvertError> {
        self.parse_with(source, |_| CueAction::Keep).await
    }

    /// 解码文本或异步数据源，并对每条候选 `Cue` 调用 `on_cue`。
    ///
    /// 数据源会先被完整读取，然后同步解析。
    ///
    /// # Errors
    ///
    /// 没有 XML 解析能力时在读取之前就返回 `MarkupParserUnavailable`；
    /// 读取失败返回 `Io`；文档格式错误返回对应的 XML 错误。
    pub async fn parse_with<F>(
        &self,
        source: MarkupSource,
        on_cue: F,
    ) -> Result<Vec<Cue>, ConvertError>
    where
        F: FnMut(&Cue) -> CueAction,
    {
        self.markup_parser()?;
        let xml = source.into_text().await?;
        self.parse_str_with(&xml, on_cue)
    }

    /// 读取并解码一个 TTML 文件。
    ///
    /// # Errors
    ///
    /// 文件无法打开时返回 `Io`，其余同 [`parse_with`](Self::parse_with)。
    pub async fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Cue>, ConvertError> {
        self.markup_parser()?;
        let file = tokio::fs::File::open(path).await?;
        self.parse(MarkupSource::from_reader(file)).await
    }

    fn markup_parser(&self) -> Result<&dyn MarkupParser, ConvertError> {
        self.markup_parser
            .as_deref()
            .ok_or(ConvertError::MarkupParserUnavailable)
    }
}

/// 从一个 `<p>` 元素构造候选 `Cue`。
///
/// 有 `end` 时直接使用；否则用 `begin + dur`，超出范围时取 `i64` 的边界。
/// 缺失的属性按 `"0s"` 处理。
fn cue_from_element(element: &MarkupElement) -> Cue {
    let start_ms = parse_duration(element.attribute(ATTR_BEGIN).unwrap_or(DEFAULT_TIME));

    let end_ms = match element.attribute(ATTR_END).filter(|v| !v.is_empty()) {
        Some(end) => parse_duration(end),
        None => {
            let dur_ms = parse_duration(element.attribute(ATTR_DUR).unwrap_or(DEFAULT_TIME));
            start_ms.saturating_add(dur_ms)
        }
    };

    Cue {
        start_ms,
        end_ms,
        text: element.text_content().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_wins_over_dur() {
        let element = MarkupElement::new("p")
            .with_attribute("begin", "1s")
            .with_attribute("end", "3s")
            .with_attribute("dur", "10s");
        assert_eq!(cue_from_element(&element), Cue::new(1000, 3000, ""));
    }

    #[test]
    fn test_dur_is_relative_to_begin() {
        let element = MarkupElement::new("p")
            .with_attribute("begin", "1s")
            .with_attribute("dur", "500ms")
            .with_text("  hi  ");
        assert_eq!(cue_from_element(&element), Cue::new(1000, 1500, "hi"));
    }

    // 空的 end 属性与缺失等价
    #[test]
    fn test_empty_end_falls_back_to_dur() {
        let element = MarkupElement::new("p")
            .with_attribute("begin", "2s")
            .with_attribute("end", "")
            .with_attribute("dur", "1s");
        assert_eq!(cue_from_element(&element), Cue::new(2000, 3000, ""));
    }

    // 超大的时间值在 i64 范围内饱和，不会溢出
    #[test]
    fn test_huge_begin_plus_dur_saturates() {
        let element = MarkupElement::new("p")
            .with_attribute("begin", "1e300s")
            .with_attribute("dur", "1e300s")
            .with_text("x");
        assert_eq!(cue_from_element(&element), Cue::new(i64::MAX, i64::MAX, "x"));

        let element = MarkupElement::new("p")
            .with_attribute("begin", "-1e300s")
            .with_attribute("dur", "-1e300s");
        assert_eq!(cue_from_element(&element), Cue::new(i64::MIN, i64::MIN, ""));
    }

    #[test]
    fn test_missing_attributes_are_zero() {
        let element = MarkupElement::new("p").with_text("\n\t ");
        assert_eq!(cue_from_element(&element), Cue::new(0, 0, ""));
    }
}
