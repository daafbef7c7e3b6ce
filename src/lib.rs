#![warn(missing_docs)]

//! # TTML Cues
//!
//! 在 TTML（一种受限的 XML 字幕方言）与扁平的带时间文本列表之间双向转换。
//!
//! ## 主要功能
//!
//! - **解码**: 从 TTML 文本或任意异步数据源中提取每个 `<p>` 的开始、结束时间和文本，
//!   支持逐条保留、替换或跳过。
//! - **编码**: 先给出正文，再随着播放进度逐行记录结束时间，全部完成后生成 TTML。
//! - **时间码**: `500ms`、`1.5s`、`HH:MM:SS.mmm` 三种写法与毫秒之间的转换。
//!
//! ## 编码与解码
//!
//! ```rust
//! use ttml_cues::{Cue, CueAction, SilenceOptions, TtmlParser, write};
//!
//! # fn main() -> Result<(), ttml_cues::ConvertError> {
//! let mut writer = write("Hello\nWorld", SilenceOptions::none());
//! assert_eq!(writer.rows(), ["Hello", "World"]);
//!
//! writer.record(0, 1500)?;
//! writer.record(1, 3000)?;
//! let xml = writer.render()?;
//!
//! let parser = TtmlParser::new();
//! let cues = parser.parse_str(&xml)?;
//! assert_eq!(cues[1], Cue::new(1500, 3000, "World"));
//!
//! let upper = parser.parse_str_with(&xml, |cue| {
//!     CueAction::Replace(Cue {
//!         text: cue.text.to_uppercase(),
//!         ..cue.clone()
//!     })
//! })?;
//! assert_eq!(upper[0].text, "HELLO");
//! # Ok(())
//! # }
//! ```
//!
//! ## 从文件解码
//!
//! ```rust,no_run
//! use ttml_cues::{MarkupSource, TtmlParser};
//!
//! async {
//!     let file = tokio::fs::File::open("subtitles.ttml").await.unwrap();
//!     match TtmlParser::new().parse(MarkupSource::from_reader(file)).await {
//!         Ok(cues) => println!("解码成功！共 {} 条。", cues.len()),
//!         Err(e) => eprintln!("解码失败: {}", e),
//!     }
//! };
//! ```
pub mod config;
pub mod converter;
pub mod error;
pub mod model;

pub use crate::{
    config::CueConfig,
    converter::{
        ConvertError, MarkupDocument, MarkupElement, MarkupNode, MarkupParser, MarkupSource,
        QuickXmlMarkupParser, SilenceOptions, TtmlBlob, TtmlParser, TtmlWriter, format_duration,
        generate_ttml, parse, parse_duration, parse_with, write,
    },
    error::{CueHelperError, Result},
    model::cue::{Cue, CueAction},
};
