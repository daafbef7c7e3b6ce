//! 定义了解码结果的核心数据模型：字幕条目 `Cue` 及其变换动作 `CueAction`。

use serde::{Deserialize, Serialize};

/// 一条带时间的字幕文本。
///
/// 时间均为毫秒。解码器不会校验 `end_ms >= start_ms`，
/// 格式错误的输入会原样透传。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cue {
    /// 开始时间（毫秒）。
    pub start_ms: i64,
    /// 结束时间（毫秒）。
    pub end_ms: i64,
    /// 去除首尾空白后的文本。
    pub text: String,
}

impl Cue {
    /// 创建一个新的字幕条目。
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// 条目持续的毫秒数，结束早于开始时为 0。
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms).max(0)
    }
}

/// 逐条变换回调的返回值。
///
/// 解码器每构造出一条候选 `Cue`，就会交给回调决定如何处理。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CueAction {
    /// 保留候选条目。
    #[default]
    Keep,
    /// 用给定的条目替换候选条目。
    Replace(Cue),
    /// 跳过该元素，不加入结果。
    Omit,
}

impl From<Option<Cue>> for CueAction {
    /// `Some` 视为替换，`None` 视为保留。
    fn from(value: Option<Cue>) -> Self {
        value.map_or(Self::Keep, Self::Replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_never_negative() {
        assert_eq!(Cue::new(1000, 2500, "a").duration_ms(), 1500);
        assert_eq!(Cue::new(3000, 1000, "b").duration_ms(), 0);
        assert_eq!(Cue::new(-1000, i64::MAX, "c").duration_ms(), i64::MAX);
        assert_eq!(Cue::new(i64::MAX, i64::MIN, "d").duration_ms(), 0);
    }

    #[test]
    fn test_action_from_option() {
        assert_eq!(CueAction::from(None), CueAction::Keep);
        let cue = Cue::new(0, 1, "x");
        assert_eq!(CueAction::from(Some(cue.clone())), CueAction::Replace(cue));
    }
}
