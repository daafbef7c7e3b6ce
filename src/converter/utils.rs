//! 包含时间码解析与格式化等工具函数的模块。

use tracing::warn;

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1000;

/// 将 TTML 时长字符串解析为毫秒。
///
/// 支持三种写法：
/// * `"500ms"` - 毫秒
/// * `"10s"` / `"1.5s"` - 秒
/// * `"HH:MM:SS"` / `"HH:MM:SS.mmm"` - 时钟时间，必须正好三段
///
/// 无法识别的写法返回 `0` 而不是报错，单个损坏的属性不应导致整个文档解码失败。
/// 结果四舍五入到整数毫秒。
#[must_use]
pub fn parse_duration(value: &str) -> i64 {
    let parsed = if let Some(number) = value.strip_suffix("ms") {
        parse_leading_float(number)
    } else if let Some(number) = value.strip_suffix('s') {
        parse_leading_float(number).map(|seconds| seconds * 1000.0)
    } else if value.contains(':') {
        parse_clock_time(value)
    } else {
        None
    };

    parsed.map_or_else(
        || {
            warn!("无法识别的时长 '{value}'，按 0 处理");
            0
        },
        |ms| ms.round() as i64,
    )
}

/// 将毫秒格式化为 `HH:MM:SS.mmm`。负数按 0 处理。
///
/// # 参数
/// * `ms` - 需要格式化的总毫秒数。
///
/// # 返回
/// `String` - 例如 `62500` -> `"00:01:02.500"`。
#[must_use]
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// 解析 `HH:MM:SS[.mmm]`，段数不是三段时返回 `None`。
fn parse_clock_time(value: &str) -> Option<f64> {
    let mut fields = value.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    let hours = parse_whole_field(hours)?;
    let minutes = parse_whole_field(minutes)?;
    let seconds = parse_leading_float(seconds)?;

    Some(hours * 3_600_000.0 + minutes * 60_000.0 + seconds * 1000.0)
}

/// 整段必须是数字，空段视为 0。
fn parse_whole_field(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 读取字符串开头最长的十进制数字前缀，忽略其后的任何内容。
///
/// 例如 `" 12.5abc"` -> `12.5`，`"abc"` -> `None`。
fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |mut pos: usize| {
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        pos
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }

    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_pos = end + 1;
        if matches!(bytes.get(exp_pos), Some(b'+' | b'-')) {
            exp_pos += 1;
        }
        let exp_end = digits_from(exp_pos);
        if exp_end > exp_pos {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_and_milliseconds() {
        assert_eq!(parse_duration("10s"), 10_000);
        assert_eq!(parse_duration("1.5s"), 1500);
        assert_eq!(parse_duration("500ms"), 500);
        assert_eq!(parse_duration("0s"), 0);
        assert_eq!(parse_duration("-2s"), -2000);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_duration("00:01:02.500"), 62_500);
        assert_eq!(parse_duration("01:00:00"), 3_600_000);
        assert_eq!(parse_duration("00:00:01.001"), 1001);
        // 小时可以超过两位
        assert_eq!(parse_duration("100:00:00.000"), 360_000_000);
    }

    // 不认识的写法一律返回 0
    #[test]
    fn test_unrecognized_falls_back_to_zero() {
        assert_eq!(parse_duration("garbage"), 0);
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("abcs"), 0);
        assert_eq!(parse_duration("01:30"), 0);
        assert_eq!(parse_duration("1:2:3:4"), 0);
        assert_eq!(parse_duration("aa:00:01"), 0);
        assert_eq!(parse_duration("42"), 0);
    }

    #[test]
    fn test_numeric_prefix_ignores_trailing_text() {
        assert_eq!(parse_duration("12xms"), 12);
        assert_eq!(parse_duration(" 3s"), 3000);
        assert_eq!(parse_duration(".5s"), 500);
        assert_eq!(parse_duration("1e3ms"), 1000);
    }

    // "ms" 必须优先于 "s" 判断
    #[test]
    fn test_ms_suffix_takes_precedence() {
        assert_eq!(parse_duration("250ms"), 250);
        assert_ne!(parse_duration("250ms"), 250_000);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(62_500), "00:01:02.500");
        assert_eq!(format_duration(0), "00:00:00.000");
        assert_eq!(format_duration(-5), "00:00:00.000");
        assert_eq!(format_duration(3_723_456), "01:02:03.456");
        assert_eq!(format_duration(360_000_000), "100:00:00.000");
    }

    #[test]
    fn test_format_then_parse_is_exact() {
        for ms in [0, 1, 999, 1001, 59_999, 60_000, 62_500, 3_599_999, 86_400_123] {
            assert_eq!(parse_duration(&format_duration(ms)), ms, "{ms}");
        }
    }
}
