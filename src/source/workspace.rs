//! ディレクトリからフル翻訳テーブルを読み込むソース
use std::path::{
    Path,
    PathBuf,
};

use futures::FutureExt;
use futures::future::BoxFuture;
use globset::{
    GlobBuilder,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use super::{
    FetchError,
    TranslationSource,
};
use crate::config::TranslationFilesConfig;
use crate::input::translation::{
    TranslationTable,
    detect_language_from_path,
    detect_namespace_from_path,
};
use crate::types::Language;

/// ファイルシステム上の翻訳ファイル群
///
/// ディレクトリ配下の JSON ファイルを走査し、パスから言語と名前空間を推定する。
///
/// - `en.json` → 英語のルートテーブル
/// - `bn/forms.json` → ベンガル語の `forms` 名前空間
/// - `forms/en.json` → 英語の `forms` 名前空間
#[derive(Debug, Clone)]
pub struct FsTranslationSource {
    /// 翻訳ファイルのルートディレクトリ
    directory: PathBuf,
    /// ディレクトリからの相対パスに適用するパターン
    file_set: GlobSet,
}

impl FsTranslationSource {
    /// 新しいソースを作成
    ///
    /// # Errors
    /// パターンが不正な場合
    pub fn new(directory: impl Into<PathBuf>, file_pattern: &str) -> Result<Self, FetchError> {
        let pattern_error = |e: globset::Error| FetchError::Pattern {
            pattern: file_pattern.to_string(),
            message: e.to_string(),
        };
        let glob =
            GlobBuilder::new(file_pattern).literal_separator(true).build().map_err(pattern_error)?;
        let file_set = GlobSetBuilder::new().add(glob).build().map_err(pattern_error)?;

        Ok(Self { directory: directory.into(), file_set })
    }

    /// 設定から作成
    ///
    /// 相対ディレクトリは `workspace_root` を基準に解決する。
    ///
    /// # Errors
    /// パターンが不正な場合
    pub fn from_config(
        config: &TranslationFilesConfig,
        workspace_root: Option<&Path>,
    ) -> Result<Self, FetchError> {
        let directory = match workspace_root {
            Some(root) if config.directory.is_relative() => root.join(&config.directory),
            _ => config.directory.clone(),
        };
        Self::new(directory, &config.file_pattern)
    }

    /// ルートディレクトリ
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 言語に対応する翻訳ファイルを検索
    ///
    /// 結果はパス順にソートされる。
    fn find_translation_files(&self, language: Language) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(&self.directory)
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Ok(relative_path) = entry.path().strip_prefix(&self.directory) else {
                continue;
            };
            if !self.file_set.is_match(relative_path) {
                continue;
            }
            if detect_language_from_path(relative_path) != Some(language) {
                continue;
            }

            found_files.push(relative_path.to_path_buf());
        }

        found_files.sort();
        found_files
    }

    /// 言語のフルテーブルを組み立てる
    async fn load(&self, language: Language) -> Result<TranslationTable, FetchError> {
        let source = self.clone();
        let files = tokio::task::spawn_blocking(move || source.find_translation_files(language))
            .await
            .map_err(|e| FetchError::Other(format!("Translation file discovery failed: {e}")))?;

        if files.is_empty() {
            return Err(FetchError::NotFound(language));
        }

        let mut table = TranslationTable::new();
        for relative_path in files {
            let path = self.directory.join(&relative_path);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| FetchError::Io { path: path.clone(), source })?;
            let file_table = TranslationTable::from_json_text(&content)
                .map_err(|source| FetchError::Parse { path: path.clone(), source })?;

            match detect_namespace_from_path(&relative_path) {
                Some(namespace) => table.insert_namespace(&namespace, file_table),
                None => table.merge(file_table),
            }
            tracing::debug!(%language, path = %path.display(), "Loaded translation file");
        }

        Ok(table)
    }
}

impl TranslationSource for FsTranslationSource {
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<TranslationTable, FetchError>> {
        self.load(language).boxed()
    }
}
