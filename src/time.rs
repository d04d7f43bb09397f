use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 默认展示时区：北京时间 (UTC+8)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// 按小时数构造展示时区，超出范围时回退为 UTC
pub fn display_offset(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// 将 UTC 时间转换为指定时区的人类友好格式
pub fn to_display_string(dt: &DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format(DATETIME_FORMAT).to_string()
}

/// 解析 `Last-Modified` 响应头：
/// - 优先 IMF-fixdate（`Sun, 06 Nov 1994 08:49:37 GMT`）
/// - 兼容过时的 RFC 850 与 asctime 格式（均按 GMT 解释）
/// - 最后尝试 RFC3339，部分静态服务器会这样返回
pub fn parse_last_modified(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// tracing_subscriber 自定义时间格式：与界面上的“最后更新”使用同一时区
pub struct DisplayTimer {
    offset: FixedOffset,
}

impl DisplayTimer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl tracing_subscriber::fmt::time::FormatTime for DisplayTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let s = to_display_string(&Utc::now(), self.offset);
        write!(w, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_last_modified_accepts_imf_fixdate() {
        let dt = parse_last_modified("Tue, 20 Jan 2026 10:20:30 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 20, 10, 20, 30).unwrap());
    }

    #[test]
    fn parse_last_modified_accepts_rfc850() {
        let dt = parse_last_modified("Tuesday, 20-Jan-26 10:20:30 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 20, 10, 20, 30).unwrap());
    }

    #[test]
    fn parse_last_modified_accepts_asctime() {
        let dt = parse_last_modified("Tue Jan 20 10:20:30 2026").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 20, 10, 20, 30).unwrap());
    }

    #[test]
    fn parse_last_modified_rejects_garbage() {
        assert!(parse_last_modified("yesterday").is_none());
        assert!(parse_last_modified("").is_none());
    }

    #[test]
    fn display_string_uses_offset() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 20, 10, 20, 30).unwrap();
        assert_eq!(to_display_string(&dt, display_offset(8)), "2026-01-20 18:20:30");
        assert_eq!(to_display_string(&dt, display_offset(0)), "2026-01-20 10:20:30");
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(display_offset(48), Utc.fix());
    }
}
