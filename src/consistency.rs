//! コアテーブルとフルテーブルの整合性チェック
//!
//! フルテーブルはコアテーブルの上位集合でなければならない。コアに存在する
//! キーはフルテーブルでも同じ文字列に解決される必要がある。

use std::fmt;

use crate::input::translation::TranslationTable;
use crate::types::Language;

/// 整合性チェックで検出された問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// コアのキーがフルテーブルで文字列に解決されない
    Missing {
        /// ドット区切りのキー
        key: String,
    },
    /// コアとフルで値が異なる
    Contradiction {
        /// ドット区切りのキー
        key: String,
        /// コアテーブルの値
        core_value: String,
        /// フルテーブルの値
        full_value: String,
    },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "Core key '{key}' is missing from the full table"),
            Self::Contradiction { key, core_value, full_value } => write!(
                f,
                "Key '{key}' differs between core ('{core_value}') and full ('{full_value}')"
            ),
        }
    }
}

/// コアテーブルを基準にフルテーブルを検査する
///
/// # Arguments
/// * `core` - 同梱のコアテーブル
/// * `full` - 取得したフルテーブル
///
/// # Returns
/// キー順に並んだ問題のリスト（問題がなければ空）
#[must_use]
pub fn check_consistency(core: &TranslationTable, full: &TranslationTable) -> Vec<ConsistencyIssue> {
    let full_keys = full.flatten();

    core.flatten()
        .into_iter()
        .filter_map(|(key, core_value)| match full_keys.get(&key) {
            None => Some(ConsistencyIssue::Missing { key }),
            Some(full_value) if *full_value != core_value => {
                Some(ConsistencyIssue::Contradiction {
                    key,
                    core_value,
                    full_value: full_value.clone(),
                })
            }
            Some(_) => None,
        })
        .collect()
}

/// フルテーブルをコアテーブルに合わせて補正する
///
/// 欠けているキーと型の食い違うキーはコアから補完し、文字列の矛盾は警告ログに
/// 出す（フルの値を残す）。
/// 表示中の文字列が後から別の文字列に変わるのはこの矛盾の場合だけになる。
pub fn reconcile(
    language: Language,
    core: &TranslationTable,
    full: &mut TranslationTable,
) -> Vec<ConsistencyIssue> {
    let issues = check_consistency(core, full);
    if issues.is_empty() {
        return issues;
    }

    let backfilled = full.backfill_from(core);
    if !backfilled.is_empty() {
        tracing::debug!(%language, count = backfilled.len(), "Backfilled core keys into full table");
    }

    for issue in &issues {
        match issue {
            ConsistencyIssue::Missing { .. } => tracing::debug!(%language, "{issue}"),
            ConsistencyIssue::Contradiction { .. } => tracing::warn!(%language, "{issue}"),
        }
    }

    issues
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::lookup::lookup_in;

    fn table(value: serde_json::Value) -> TranslationTable {
        TranslationTable::try_from(value).unwrap()
    }

    #[googletest::test]
    fn test_superset_has_no_issues() {
        let core = table(json!({ "common": { "save": "Save" } }));
        let full = table(json!({ "common": { "save": "Save", "confirm": "Confirm" } }));

        expect_that!(check_consistency(&core, &full), is_empty());
    }

    #[googletest::test]
    fn test_detects_missing_and_contradiction() {
        let core = table(json!({
            "common": { "save": "Save", "cancel": "Cancel" },
            "nav": { "home": "Home" }
        }));
        let full = table(json!({
            "common": { "save": "Save changes" },
            "nav": { "home": 1 }
        }));

        let issues = check_consistency(&core, &full);

        assert_eq!(
            issues,
            vec![
                ConsistencyIssue::Missing { key: "common.cancel".to_string() },
                ConsistencyIssue::Contradiction {
                    key: "common.save".to_string(),
                    core_value: "Save".to_string(),
                    full_value: "Save changes".to_string(),
                },
                ConsistencyIssue::Missing { key: "nav.home".to_string() },
            ]
        );
    }

    #[googletest::test]
    fn test_reconcile_backfills_but_keeps_contradictions() {
        let core = table(json!({ "common": { "save": "Save", "cancel": "Cancel" } }));
        let mut full = table(json!({ "common": { "save": "Save changes" }, "extra": "Extra" }));

        let issues = reconcile(Language::En, &core, &mut full);

        expect_that!(issues.len(), eq(2));
        expect_that!(lookup_in(&full, "common.cancel", "fb"), eq("Cancel"));
        expect_that!(lookup_in(&full, "common.save", "fb"), eq("Save changes"));
        expect_that!(lookup_in(&full, "extra", "fb"), eq("Extra"));
    }

    #[googletest::test]
    fn test_issue_display() {
        let issue = ConsistencyIssue::Missing { key: "a.b".to_string() };

        expect_that!(issue.to_string(), contains_substring("'a.b'"));
    }

    #[googletest::test]
    fn test_reconcile_restores_core_strings_hidden_by_type_mismatch() {
        let core = table(json!({ "nav": { "home": "Home" }, "title": "Intake" }));
        let mut full = table(json!({ "nav": "flat", "title": 5, "extra": "Extra" }));

        let issues = reconcile(Language::En, &core, &mut full);

        expect_that!(issues.len(), eq(2));
        expect_that!(lookup_in(&full, "nav.home", "fb"), eq("Home"));
        expect_that!(lookup_in(&full, "title", "fb"), eq("Intake"));
        expect_that!(lookup_in(&full, "extra", "fb"), eq("Extra"));
        expect_that!(check_consistency(&core, &full), is_empty());
    }
}
