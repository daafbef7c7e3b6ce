//! # 通用 XML 文档树
//!
//! 解码器只需要“把文本解析成可以按标签名和属性查询的树”这一种能力，
//! 这里把它抽象为 [`MarkupParser`]，默认实现基于 `quick-xml` 的拉取式读取器。

use quick_xml::{
    Reader,
    events::{BytesRef, BytesStart, Event},
};
use tracing::warn;

use crate::converter::types::ConvertError;

/// 将 XML 文本解析为 [`MarkupDocument`] 的能力。
///
/// 测试中可以替换为返回固定文档树的实现。
pub trait MarkupParser: Send + Sync {
    /// 解析完整的 XML 文本。格式错误时返回错误，不返回部分结果。
    fn parse_document(&self, markup: &str) -> Result<MarkupDocument, ConvertError>;
}

/// 一个已解析的 XML 文档。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupDocument {
    /// 根元素。空文档没有根元素。
    pub root: Option<MarkupElement>,
}

/// 元素的子节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// 子元素。
    Element(MarkupElement),
    /// 文本，实体已解码。
    Text(String),
}

/// XML 元素。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupElement {
    /// 限定名，例如 `p` 或 `tt:p`。
    pub name: String,
    /// 属性，保持文档中的顺序，值已解码。
    pub attributes: Vec<(String, String)>,
    /// 子节点。
    pub children: Vec<MarkupNode>,
}

impl MarkupDocument {
    /// 按文档顺序返回所有标签名为 `name` 的元素（包括根元素）。
    #[must_use]
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&MarkupElement> {
        let mut found = Vec::new();
        if let Some(root) = &self.root {
            root.collect_by_tag_name(name, &mut found);
        }
        found
    }
}

impl MarkupElement {
    /// 创建一个没有属性和子节点的元素。
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 添加一个属性。
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// 添加一个子元素。
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    /// 添加一段文本。
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(MarkupNode::Text(text.into()));
        self
    }

    /// 取属性值。
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 所有后代文本按顺序拼接的结果。
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut output = String::new();
        self.append_text(&mut output);
        output
    }

    /// 按文档顺序返回所有标签名为 `name` 的后代元素（不包括自身）。
    #[must_use]
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        for child in &self.children {
            if let MarkupNode::Element(element) = child {
                element.collect_by_tag_name(name, &mut found);
            }
        }
        found
    }

    fn collect_by_tag_name<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            if let MarkupNode::Element(element) = child {
                element.collect_by_tag_name(name, found);
            }
        }
    }

    fn append_text(&self, output: &mut String) {
        for child in &self.children {
            match child {
                MarkupNode::Text(text) => output.push_str(text),
                MarkupNode::Element(element) => element.append_text(output),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(MarkupNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(MarkupNode::Text(text.to_owned()));
        }
    }
}

/// 基于 `quick-xml` 的默认解析器。
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickXmlMarkupParser;

impl MarkupParser for QuickXmlMarkupParser {
    fn parse_document(&self, markup: &str) -> Result<MarkupDocument, ConvertError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<MarkupElement> = Vec::new();
        let mut root: Option<MarkupElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(ConvertError::Markup("文档包含多个根元素".to_string()));
                    }
                    stack.push(read_element_start(&e, &reader)?);
                }
                Event::End(_) => {
                    // 标签名是否匹配由 reader 检查
                    let element = stack
                        .pop()
                        .ok_or_else(|| ConvertError::Markup("多余的结束标签".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(MarkupNode::Element(element)),
                        None => root = Some(element),
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&e.xml_content()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&reader.decoder().decode(&e)?);
                    }
                }
                Event::GeneralRef(e) => {
                    if let Some(current) = stack.last_mut()
                        && let Some(decoded) = resolve_entity(&e)?
                    {
                        let mut buf = [0u8; 4];
                        current.push_text(decoded.encode_utf8(&mut buf));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = stack.last() {
            return Err(ConvertError::Markup(format!(
                "元素 <{}> 没有闭合",
                unclosed.name
            )));
        }

        Ok(MarkupDocument { root })
    }
}

/// 读取开始标签的名称和全部属性。
fn read_element_start(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<MarkupElement, ConvertError> {
    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.decode_and_unescape_value(reader.decoder())?.into_owned();
        attributes.push((key, value));
    }
    Ok(MarkupElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// 解码文本中的实体引用，未知的命名实体会被丢弃。
fn resolve_entity(e: &BytesRef<'_>) -> Result<Option<char>, ConvertError> {
    let entity_name = std::str::from_utf8(e)
        .map_err(|err| ConvertError::Markup(format!("无法将实体名解码为UTF-8: {err}")))?;

    if let Some(num_str) = entity_name.strip_prefix('#') {
        let (radix, code_point_str) = num_str
            .strip_prefix('x')
            .map_or((10, num_str), |stripped| (16, stripped));

        let decoded = u32::from_str_radix(code_point_str, radix)
            .ok()
            .and_then(char::from_u32);
        if decoded.is_none() {
            warn!("无法解析无效的XML数字实体 '&{entity_name};'");
        }
        return Ok(decoded);
    }

    let decoded = match entity_name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            warn!("忽略了未知的XML实体 '&{entity_name};'");
            None
        }
    };
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(markup: &str) -> MarkupDocument {
        QuickXmlMarkupParser.parse_document(markup).unwrap()
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = parse(
            r#"<root><p id="1"/><div><p id="2"><p id="3"/></p></div><p id="4"/></root>"#,
        );
        let ids: Vec<_> = doc
            .elements_by_tag_name("p")
            .iter()
            .filter_map(|p| p.attribute("id"))
            .collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_element_search_excludes_itself() {
        let doc = parse(r#"<div><div id="a"><span/><div id="b"/></div></div>"#);
        let root = doc.root.as_ref().unwrap();

        let nested: Vec<_> = root
            .elements_by_tag_name("div")
            .iter()
            .filter_map(|div| div.attribute("id"))
            .collect();
        assert_eq!(nested, ["a", "b"]);
        assert_eq!(doc.elements_by_tag_name("div").len(), 3);
        assert!(root.elements_by_tag_name("p").is_empty());
    }

    #[test]
    fn test_text_content_resolves_entities_and_cdata() {
        let doc = parse("<p>a &lt; b &amp;&#32;c &gt; d<![CDATA[ <raw> ]]><span>!</span></p>");
        let p = doc.root.as_ref().unwrap();
        assert_eq!(p.text_content(), "a < b & c > d <raw> !");
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let doc = parse(r#"<p title="x &amp; y"/>"#);
        let p = doc.root.as_ref().unwrap();
        assert_eq!(p.attribute("title"), Some("x & y"));
        assert_eq!(p.attribute("missing"), None);
    }

    #[test]
    fn test_prefixed_names_are_kept() {
        let doc = parse(r#"<tt:tt xmlns:tt="urn:x"><tt:p/></tt:tt>"#);
        assert_eq!(doc.elements_by_tag_name("tt:p").len(), 1);
        assert!(doc.elements_by_tag_name("p").is_empty());
    }

    #[test]
    fn test_empty_input_has_no_root() {
        assert_eq!(parse(""), MarkupDocument::default());
        assert_eq!(parse("<?xml version=\"1.0\"?>\n"), MarkupDocument::default());
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        assert!(QuickXmlMarkupParser.parse_document("<a><b></a>").is_err());
        assert!(QuickXmlMarkupParser.parse_document("<a><b>").is_err());
        assert!(QuickXmlMarkupParser.parse_document("<a/><b/>").is_err());
    }
}
