//! セッションの翻訳状態

use std::collections::HashMap;
use std::sync::Arc;

use crate::input::bundle::CoreTables;
use crate::input::translation::TranslationTable;
use crate::types::Language;

/// Progress of the full-table load for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadStatus {
    /// No fetch has been started in this session
    #[default]
    NotRequested,
    /// A fetch is in flight
    Loading,
    /// The full table is available
    Loaded,
    /// The fetch failed; the core table keeps being served
    Failed,
}

/// セッションの翻訳状態
///
/// ストアだけが書き込み、ビューには読み取り専用で公開される。
/// フルテーブルは言語ごとに保持するので、言語を切り替えても
/// 別の言語のフルテーブルが表示されることはない。
#[derive(Debug, Clone)]
pub struct SessionState {
    /// 選択中の言語
    language: Language,
    /// 同梱のコアテーブル
    core: CoreTables,
    /// 読み込み済みのフルテーブル
    full_tables: HashMap<Language, Arc<TranslationTable>>,
    /// 言語ごとの読み込み状況
    statuses: HashMap<Language, LoadStatus>,
}

impl SessionState {
    /// アプリ起動時の状態
    pub(crate) fn new(language: Language, core: CoreTables) -> Self {
        Self { language, core, full_tables: HashMap::new(), statuses: HashMap::new() }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// 現在表示すべきテーブル
    ///
    /// 選択中の言語のフルテーブルがあればそれを、なければコアテーブルを返す。
    #[must_use]
    pub fn current_table(&self) -> Arc<TranslationTable> {
        self.full_tables
            .get(&self.language)
            .unwrap_or_else(|| self.core.get(self.language))
            .clone()
    }

    /// 選択中の言語のフルテーブル
    #[must_use]
    pub fn full_table(&self) -> Option<&Arc<TranslationTable>> {
        self.full_tables.get(&self.language)
    }

    #[must_use]
    pub fn core_table(&self, language: Language) -> &Arc<TranslationTable> {
        self.core.get(language)
    }

    /// 選択中の言語のフルテーブルを取得中か
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load_status(self.language) == LoadStatus::Loading
    }

    #[must_use]
    pub fn load_status(&self, language: Language) -> LoadStatus {
        self.statuses.get(&language).copied().unwrap_or_default()
    }

    /// Returns `true` when the language actually changed.
    pub(crate) fn set_language(&mut self, language: Language) -> bool {
        if self.language == language {
            return false;
        }
        self.language = language;
        true
    }

    /// `NotRequested` の言語だけを `Loading` にする
    ///
    /// 重複取得を防ぐ唯一の仕組み。`true` のとき呼び出し側が取得を開始する。
    pub(crate) fn begin_load(&mut self, language: Language) -> bool {
        if self.load_status(language) != LoadStatus::NotRequested {
            return false;
        }
        self.statuses.insert(language, LoadStatus::Loading);
        true
    }

    pub(crate) fn complete_load(&mut self, language: Language, table: TranslationTable) {
        self.full_tables.insert(language, Arc::new(table));
        self.statuses.insert(language, LoadStatus::Loaded);
    }

    pub(crate) fn fail_load(&mut self, language: Language) {
        self.statuses.insert(language, LoadStatus::Failed);
    }
}
