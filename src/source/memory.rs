//! メモリ上の翻訳ソース

use std::collections::HashMap;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{
    FetchError,
    TranslationSource,
};
use crate::input::translation::TranslationTable;
use crate::types::Language;

/// 事前に用意したテーブルを返すソース
///
/// 分割バンドルやテストで使う。
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    /// 言語ごとのフルテーブル
    tables: HashMap<Language, TranslationTable>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 言語のテーブルを登録
    #[must_use]
    pub fn with_table(mut self, language: Language, table: TranslationTable) -> Self {
        self.tables.insert(language, table);
        self
    }
}

impl TranslationSource for StaticSource {
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<TranslationTable, FetchError>> {
        let result = self.tables.get(&language).cloned().ok_or(FetchError::NotFound(language));
        futures::future::ready(result).boxed()
    }
}
