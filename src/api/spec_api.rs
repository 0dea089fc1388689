// ==========================================
// 出货检验追踪系统 - 检验规范 API
// ==========================================
// 只读: 检验标准目录 + 关卡目录
// ==========================================

use crate::domain::spec_catalog::{localized_specs, LocalizedSpec};
use crate::domain::step::{StepTemplate, STEP_CATALOG};
use crate::domain::types::Language;
use crate::i18n;

/// 按当前语言取出检验标准
pub fn current_specs() -> Vec<LocalizedSpec> {
    localized_specs(i18n::current_language())
}

/// 按指定语言取出检验标准
pub fn specs_for(lang: Language) -> Vec<LocalizedSpec> {
    localized_specs(lang)
}

/// 关卡目录（顺序即关卡序号）
pub fn steps_catalog() -> &'static [StepTemplate] {
    &STEP_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LOCALE_TEST_LOCK;

    #[test]
    fn test_specs_follow_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        i18n::set_locale("en");
        assert_eq!(current_specs()[0].category, "Package");
        i18n::set_locale("zh-TW");
        assert_eq!(current_specs()[0].category, specs_for(Language::Cn)[0].category);
    }

    #[test]
    fn test_steps_catalog() {
        let steps = steps_catalog();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3].title, "Completed package");
    }
}
