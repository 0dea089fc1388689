// ==========================================
// 出货检验追踪系统 - 日期文本格式
// ==========================================
// 存储格式: YYYY/MM/DD (文档中的规范形式)
// 编辑格式: YYYY-MM-DD (日期输入控件的原生格式)
// 红线: 所有写入必须转换为斜线形式
// ==========================================

use chrono::{DateTime, Local, NaiveDate, Utc};

/// 存储格式
pub const CANONICAL_FORMAT: &str = "%Y/%m/%d";

/// 编辑控件格式
pub const WIDGET_FORMAT: &str = "%Y-%m-%d";

/// 编辑输入 → 存储形式（`-` 全部替换为 `/`）
pub fn to_canonical(input: &str) -> String {
    input.replace('-', "/")
}

/// 存储形式 → 编辑控件形式（`/` 全部替换为 `-`）
pub fn to_widget(stored: &str) -> String {
    stored.replace('/', "-")
}

/// 指定日期的存储形式
pub fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// 今天（本地时区）的存储形式
pub fn today_canonical() -> String {
    canonical(Local::now().date_naive())
}

/// 取 ISO-8601 时间戳的日期前缀（`T` 之前部分）
///
/// 用于目录的日期区间过滤,按字符串比较
pub fn date_prefix(iso_timestamp: &str) -> &str {
    iso_timestamp.split('T').next().unwrap_or("")
}

/// 将 ISO-8601 时间戳格式化为 YYYY/MM/DD 用于显示
///
/// 无法解析时返回空字符串
pub fn display_date(iso_timestamp: &str) -> String {
    let trimmed = iso_timestamp.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return canonical(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(date_prefix(trimmed), WIDGET_FORMAT) {
        return canonical(d);
    }
    String::new()
}

/// 解析 ISO-8601 时间戳（用于排序）
pub fn parse_timestamp(iso_timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso_timestamp.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 当前时间的 ISO-8601 字符串（毫秒精度,UTC）
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
