// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持繁体中文（默认）、英文、越南文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::Language;

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["zh-TW", "en", "vi"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-TW" / "en" / "vi"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 当前语言对应的检验规范文字语言
pub fn current_language() -> Language {
    Language::from_locale(&current_locale())
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use inspection_tracker::i18n::t;
/// let msg = t("editor.next_step");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use inspection_tracker::i18n::t_with_args;
/// let msg = t_with_args("editor.delete_prompt", &[("wo", "WO-02")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 涉及翻译文字的测试共用此锁串行化。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
