//! ドット区切りパスによる安全な翻訳キー検索
//!
//! どの失敗（キーの欠落、型の不一致）も呼び出し元が渡したフォールバックに
//! 置き換えられ、エラーやパニックにはならない。

use crate::input::translation::{
    TranslationTable,
    TranslationValue,
};

/// Prefix of form placeholder strings
const PLACEHOLDER_PREFIX: &str = "placeholders.";

/// 任意の値をルートとしてパスを解決する
///
/// `path` を `.` で分割し、各セグメントを順にたどる。途中で `Node` 以外に
/// 到達するかキーが存在しなければ、その時点で `fallback` を返す。
/// 最後に到達した値が `Text` であればそれを返し、それ以外は `fallback`。
///
/// 空のパスはセグメント 0 個として扱い、ルート自身を解決結果とする。
///
/// # Examples
/// ```
/// use portal_i18n::input::translation::TranslationValue;
/// use portal_i18n::lookup::lookup;
///
/// let root = TranslationValue::from(serde_json::json!({ "nested": { "key": "value" } }));
/// assert_eq!(lookup(&root, "nested.key", "fb"), "value");
/// assert_eq!(lookup(&root, "nested.missing", "fb"), "fb");
/// ```
#[must_use]
pub fn lookup<'a>(root: &'a TranslationValue, path: &str, fallback: &'a str) -> &'a str {
    let segments = (!path.is_empty()).then(|| path.split('.')).into_iter().flatten();
    resolve(root, segments, fallback)
}

/// テーブルをルートとしてパスを解決する
///
/// ルートは常にテーブルなので、空のパスは必ず `fallback` になる。
#[must_use]
pub fn lookup_in<'a>(table: &'a TranslationTable, path: &str, fallback: &'a str) -> &'a str {
    if path.is_empty() {
        return fallback;
    }

    let mut segments = path.split('.');
    let Some(first) = segments.next().and_then(|segment| table.get(segment)) else {
        return fallback;
    };
    resolve(first, segments, fallback)
}

/// Walk `segments` starting at `start`, stopping at the first miss.
fn resolve<'a, 's>(
    start: &'a TranslationValue,
    segments: impl Iterator<Item = &'s str>,
    fallback: &'a str,
) -> &'a str {
    let mut current = start;
    for segment in segments {
        let TranslationValue::Node(table) = current else {
            return fallback;
        };
        let Some(next) = table.get(segment) else {
            return fallback;
        };
        current = next;
    }

    match current {
        TranslationValue::Text(text) => text,
        TranslationValue::Node(_) | TranslationValue::Opaque => fallback,
    }
}

/// フォームのプレースホルダー文字列を取得
///
/// `lookup_in(table, "placeholders." + key, fallback)` と等価。
#[must_use]
pub fn get_placeholder<'a>(table: &'a TranslationTable, key: &str, fallback: &'a str) -> &'a str {
    lookup_in(table, &format!("{PLACEHOLDER_PREFIX}{key}"), fallback)
}
