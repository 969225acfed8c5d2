//! バイナリに同梱されるコア翻訳テーブル

use std::sync::{
    Arc,
    LazyLock,
};

use crate::input::translation::TranslationTable;
use crate::types::Language;

/// 同梱の英語コアテーブル
const CORE_EN: &str = include_str!("../../locales/core/en.json");
/// 同梱のベンガル語コアテーブル
const CORE_BN: &str = include_str!("../../locales/core/bn.json");

/// Parsed once on first use
static BUNDLED: LazyLock<CoreTables> = LazyLock::new(|| CoreTables {
    en: parse_bundled(Language::En, CORE_EN),
    bn: parse_bundled(Language::Bn, CORE_BN),
});

/// 同梱 JSON をパースする
///
/// 壊れた同梱データでもパニックせず、空のテーブルに縮退する。
fn parse_bundled(language: Language, text: &str) -> Arc<TranslationTable> {
    match TranslationTable::from_json_text(text) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            tracing::error!(%language, "Bundled core translations are invalid: {e}");
            Arc::new(TranslationTable::new())
        }
    }
}

/// Synchronously available core tables, one per [`Language`].
///
/// A field per language keeps the "every language has a core table"
/// guarantee in the type.
#[derive(Debug, Clone)]
pub struct CoreTables {
    /// English
    en: Arc<TranslationTable>,
    /// Bangla
    bn: Arc<TranslationTable>,
}

impl CoreTables {
    /// 明示的に指定したテーブルから作成
    #[must_use]
    pub fn new(en: TranslationTable, bn: TranslationTable) -> Self {
        Self { en: Arc::new(en), bn: Arc::new(bn) }
    }

    /// 同梱のコアテーブル
    #[must_use]
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    /// 指定言語のコアテーブル
    #[must_use]
    pub const fn get(&self, language: Language) -> &Arc<TranslationTable> {
        match language {
            Language::En => &self.en,
            Language::Bn => &self.bn,
        }
    }

    /// 指定言語のテーブルだけを差し替える
    #[must_use]
    pub fn with_table(mut self, language: Language, table: TranslationTable) -> Self {
        let slot = match language {
            Language::En => &mut self.en,
            Language::Bn => &mut self.bn,
        };
        *slot = Arc::new(table);
        self
    }
}

impl Default for CoreTables {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use googletest::prelude::*;

    use super::*;
    use crate::lookup::lookup_in;

    #[googletest::test]
    fn bundled_tables_parse() {
        for language in Language::ALL {
            expect_that!(CoreTables::bundled().get(language).is_empty(), eq(false));
        }
    }

    #[googletest::test]
    fn bundled_tables_share_keys() {
        let tables = CoreTables::bundled();
        let en: BTreeSet<String> = tables.get(Language::En).flatten().into_keys().collect();
        let bn: BTreeSet<String> = tables.get(Language::Bn).flatten().into_keys().collect();

        expect_that!(en == bn, eq(true));
    }

    #[googletest::test]
    fn bundled_tables_resolve_placeholders() {
        let tables = CoreTables::bundled();

        expect_that!(
            lookup_in(tables.get(Language::En), "placeholders.name", "fb"),
            eq("Enter your name")
        );
        expect_that!(
            lookup_in(tables.get(Language::Bn), "placeholders.name", "fb"),
            eq("আপনার নাম লিখুন")
        );
    }

    #[googletest::test]
    fn with_table_replaces_one_language() {
        let mut custom = TranslationTable::new();
        custom.insert("only", "custom");

        let tables = CoreTables::bundled().with_table(Language::Bn, custom);

        expect_that!(lookup_in(tables.get(Language::Bn), "only", "fb"), eq("custom"));
        expect_that!(lookup_in(tables.get(Language::En), "only", "fb"), eq("fb"));
    }
}
