//! # 增量 TTML 编写器
//!
//! 调用方先给出全部正文，然后随着播放进度逐行记录结束时间，
//! 全部记录完成后再生成 TTML。
//!
//! 记录必须按行号顺序进行：每一行的开始时间等于上一行的结束时间，
//! 各行之间既没有空隙也不会重叠。

use tracing::{debug, trace};

use crate::{
    converter::{
        generators::ttml_generator::generate_ttml,
        types::{ConvertError, SilenceOptions, TtmlBlob},
    },
    model::cue::Cue,
};

/// 一行正文及其时间。
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowNode {
    text: String,
    /// `(start_ms, end_ms)`，未记录时为 `None`。
    timing: Option<(i64, i64)>,
}

impl RowNode {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timing: None,
        }
    }
}

/// 逐行记录时间并生成 TTML 的编写器。
#[derive(Debug, Clone)]
pub struct TtmlWriter {
    rows: Vec<RowNode>,
    /// 上一次记录的结束时间。
    cursor_ms: i64,
}

impl TtmlWriter {
    /// 按行拆分 `text`（接受 `\n` 与 `\r\n`），并根据 `silence` 在首尾插入空行。
    ///
    /// 行文本原样写入 TTML，但解码时会去掉首尾空白，XML 也会把行内单独的
    /// `\r` 规范化为 `\n`。因此只有不带首尾空白、不含单独 `\r` 的行
    /// 才能在生成后原样解码回来。
    #[must_use]
    pub fn new(text: &str, silence: SilenceOptions) -> Self {
        let mut rows = Vec::new();
        if silence.start {
            rows.push(RowNode::new(""));
        }
        rows.extend(
            text.split('\n')
                .map(|line| RowNode::new(line.strip_suffix('\r').unwrap_or(line))),
        );
        if silence.end {
            rows.push(RowNode::new(""));
        }

        debug!("TTML 编写器已创建，共 {} 行", rows.len());
        Self { rows, cursor_ms: 0 }
    }

    /// 每一行的文本，包括插入的静音行。
    #[must_use]
    pub fn rows(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.text.as_str()).collect()
    }

    /// 总行数，也就是需要调用 [`record`](Self::record) 的次数。
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 是否没有任何行。拆分总会产生至少一行，所以通常为 `false`。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 上一次记录的结束时间，初始为 0。
    #[must_use]
    pub const fn cursor_ms(&self) -> i64 {
        self.cursor_ms
    }

    /// 第一个尚未记录时间的行号，全部完成时为 `None`。
    #[must_use]
    pub fn next_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.timing.is_none())
    }

    /// 是否所有行都已记录时间。
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.pending_rows() == 0
    }

    /// 记录第 `index` 行的结束时间，开始时间取上一次的结束时间。
    ///
    /// # Errors
    ///
    /// 依次检查：
    /// * `InvalidRowIndex` - 行号超出范围。
    /// * `NonMonotonicEnd` - `end_ms` 没有严格大于上一次的结束时间。
    /// * `RowAlreadyWritten` - 该行已经记录过。
    /// * `RowOutOfOrder` - 前面还有没记录的行。
    ///
    /// 出错时状态不变。
    pub fn record(&mut self, index: usize, end_ms: i64) -> Result<(), ConvertError> {
        let len = self.rows.len();
        let cursor_ms = self.cursor_ms;
        let row = self
            .rows
            .get(index)
            .ok_or(ConvertError::InvalidRowIndex { index, len })?;

        if end_ms <= cursor_ms {
            return Err(ConvertError::NonMonotonicEnd { end_ms, cursor_ms });
        }

        if row.timing.is_some() {
            return Err(ConvertError::RowAlreadyWritten { index });
        }

        if let Some(expected) = self.next_row()
            && expected < index
        {
            return Err(ConvertError::RowOutOfOrder { index, expected });
        }

        let row = &mut self.rows[index];
        row.timing = Some((cursor_ms, end_ms));
        self.cursor_ms = end_ms;
        trace!("第 {index} 行: {cursor_ms}ms -> {end_ms}ms");
        Ok(())
    }

    /// 以 `Cue` 的形式返回所有行。
    ///
    /// # Errors
    ///
    /// 仍有行没有时间时返回 `NotReady`。
    pub fn cues(&self) -> Result<Vec<Cue>, ConvertError> {
        self.rows
            .iter()
            .map(|row| {
                row.timing
                    .map(|(start_ms, end_ms)| Cue::new(start_ms, end_ms, row.text.as_str()))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ConvertError::NotReady {
                pending: self.pending_rows(),
            })
    }

    /// 生成 TTML 文本。多次调用得到相同的结果。
    ///
    /// # Errors
    ///
    /// 仍有行没有时间时返回 `NotReady`。
    pub fn render(&self) -> Result<String, ConvertError> {
        generate_ttml(&self.cues()?)
    }

    /// 生成 TTML 并打包为带媒体类型的二进制数据。
    ///
    /// # Errors
    ///
    /// 与 [`render`](Self::render) 相同。
    pub fn render_blob(&self) -> Result<TtmlBlob, ConvertError> {
        self.render().map(TtmlBlob::new)
    }

    fn pending_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.timing.is_none()).count()
    }
}
