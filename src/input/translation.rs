//! Translation table definitions

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::Path;

use serde::{
    Deserialize,
    Deserializer,
};
use serde_json::Value;
use thiserror::Error;

use crate::types::Language;

/// Errors raised while turning JSON text into a [`TranslationTable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableParseError {
    /// JSON (or JSONC) syntax error
    #[error("Failed to parse translation JSON: {0}")]
    Syntax(String),
    /// The document contained no value at all
    #[error("Translation document is empty")]
    Empty,
    /// The root value was not an object
    #[error("Translation root must be an object, found {found}")]
    NotAnObject {
        /// JSON type name of the root value
        found: &'static str,
    },
}

/// A single node in a translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationValue {
    /// Leaf string
    Text(String),
    /// Nested table
    Node(TranslationTable),
    /// Any other JSON value (number, bool, null, array).
    /// Never resolvable by a lookup.
    Opaque,
}

/// Read-only, tree-shaped mapping from keys to nested tables or strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    /// Entries ordered by key
    entries: BTreeMap<String, TranslationValue>,
}

impl From<Value> for TranslationValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(map) => Self::Node(TranslationTable {
                entries: map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            }),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => Self::Opaque,
        }
    }
}

impl From<&str> for TranslationValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<TranslationTable> for TranslationValue {
    fn from(table: TranslationTable) -> Self {
        Self::Node(table)
    }
}

impl TryFrom<Value> for TranslationTable {
    type Error = TableParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let found = json_type_name(&value);
        match TranslationValue::from(value) {
            TranslationValue::Node(table) => Ok(table),
            TranslationValue::Text(_) | TranslationValue::Opaque => {
                Err(TableParseError::NotAnObject { found })
            }
        }
    }
}

impl<'de> Deserialize<'de> for TranslationTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl<K: Into<String>, V: Into<TranslationValue>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// JSON type name used in error messages
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TranslationTable {
    /// 空のテーブルを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON テキストからテーブルを作成
    ///
    /// コメントと末尾カンマを許容する (JSONC)。
    ///
    /// # Errors
    /// - 構文エラー
    /// - ルートがオブジェクトでない
    pub fn from_json_text(text: &str) -> Result<Self, TableParseError> {
        let value = jsonc_parser::parse_to_serde_value(text, &jsonc_parser::ParseOptions::default())
            .map_err(|e| TableParseError::Syntax(e.to_string()))?
            .ok_or(TableParseError::Empty)?;
        Self::try_from(value)
    }

    /// 直下のエントリを取得
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        self.entries.get(key)
    }

    /// エントリを追加（既存のエントリは置き換える）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TranslationValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// 直下のエントリ数
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TranslationValue> {
        self.entries.iter()
    }

    /// Flatten the tree into a dot-separated key map of its string leaves.
    ///
    /// Opaque values are skipped since no lookup can resolve them.
    ///
    /// # Examples
    /// ```
    /// use portal_i18n::input::translation::TranslationTable;
    ///
    /// let table = TranslationTable::from_json_text(r#"{"common": {"save": "Save"}}"#).unwrap();
    /// let flattened = table.flatten();
    /// assert_eq!(flattened.get("common.save"), Some(&"Save".to_string()));
    /// ```
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        flatten_table(self, None, &mut result);
        result
    }

    /// Deep-merge `other` into `self`. Leaves from `other` win.
    pub fn merge(&mut self, other: Self) {
        for (key, incoming) in other.entries {
            let incoming = match incoming {
                TranslationValue::Node(incoming) => incoming,
                leaf => {
                    self.entries.insert(key, leaf);
                    continue;
                }
            };
            if let Some(TranslationValue::Node(existing)) = self.entries.get_mut(&key) {
                existing.merge(incoming);
                continue;
            }
            self.entries.insert(key, TranslationValue::Node(incoming));
        }
    }

    /// 名前空間ファイルをトップレベルのキー配下にマージ
    pub fn insert_namespace(&mut self, namespace: &str, table: Self) {
        let mut wrapper = Self::new();
        wrapper.insert(namespace, table);
        self.merge(wrapper);
    }

    /// Copy every entry of `core` that does not resolve the same way in `self`.
    ///
    /// Missing entries are added. An entry whose shape differs from core
    /// (a subtree where core has a string, a string or non-string value where
    /// core has a subtree) is replaced by the core value. Differing strings are
    /// kept. Returns the dotted paths that were added or replaced.
    pub fn backfill_from(&mut self, core: &Self) -> Vec<String> {
        let mut added = Vec::new();
        backfill_table(self, core, None, &mut added);
        added
    }
}

impl<'a> IntoIterator for &'a TranslationTable {
    type Item = (&'a String, &'a TranslationValue);
    type IntoIter = btree_map::Iter<'a, String, TranslationValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Join a key onto an optional dotted prefix
fn join_key(prefix: Option<&str>, key: &str) -> String {
    prefix.map_or_else(|| key.to_string(), |p| format!("{p}.{key}"))
}

fn flatten_table(
    table: &TranslationTable,
    prefix: Option<&str>,
    result: &mut BTreeMap<String, String>,
) {
    for (key, value) in table {
        let full_key = join_key(prefix, key);
        match value {
            TranslationValue::Text(s) => {
                result.insert(full_key, s.clone());
            }
            TranslationValue::Node(nested) => flatten_table(nested, Some(&full_key), result),
            TranslationValue::Opaque => {}
        }
    }
}

fn backfill_table(
    target: &mut TranslationTable,
    core: &TranslationTable,
    prefix: Option<&str>,
    added: &mut Vec<String>,
) {
    for (key, core_value) in core {
        let full_key = join_key(prefix, key);
        match (target.entries.get_mut(key), core_value) {
            (None, _) => {
                target.entries.insert(key.clone(), core_value.clone());
                added.push(full_key);
            }
            (Some(TranslationValue::Node(nested)), TranslationValue::Node(core_nested)) => {
                backfill_table(nested, core_nested, Some(&full_key), added);
            }
            // 文字列同士の食い違いは整合性チェックで警告する
            (Some(TranslationValue::Text(_)), TranslationValue::Text(_))
            | (Some(_), TranslationValue::Opaque) => {}
            // 型が違えばコアの値を解決できなくなるのでコアで置き換える
            (Some(slot), _) => {
                *slot = core_value.clone();
                added.push(full_key);
            }
        }
    }
}

/// Parent directory names that never denote a namespace
const COMMON_PARENTS: [&str; 8] =
    ["locales", "messages", "translations", "i18n", "lang", "langs", "full", "core"];

/// Whether `part` is a language tag for a supported language.
///
/// The primary subtag must be a supported code and any further subtag must be
/// a 2-4 character region or script (`bn-BD`, `en_US`).
fn parse_language_tag(part: &str) -> Option<Language> {
    let mut subtags = part.split(['-', '_']);
    let language = subtags.next()?.parse::<Language>().ok()?;
    subtags
        .all(|s| (2..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(language)
}

/// Detect language from a translation file path
///
/// Splits the path by '/' and '.', then searches backwards for a part that is
/// a supported language tag.
///
/// # Examples
/// - `full/en.json` → `en`
/// - `bn/forms.json` → `bn`
/// - `full/bn-BD.json` → `bn`
pub(crate) fn detect_language_from_path(file_path: &Path) -> Option<Language> {
    let path_str = file_path.to_string_lossy().replace('\\', "/");
    path_str.split(['/', '.']).rev().find_map(parse_language_tag)
}

/// Detect namespace from a translation file path.
///
/// # Examples
/// - `en/forms.json` -> Some("forms") (file name is namespace)
/// - `forms/en.json` -> Some("forms") (directory name is namespace)
/// - `en.json` -> None (single file)
pub(crate) fn detect_namespace_from_path(file_path: &Path) -> Option<String> {
    let file_stem = file_path.file_stem()?.to_string_lossy().to_string();

    if parse_language_tag(&file_stem).is_none() {
        return Some(file_stem);
    }

    let parent_name = file_path.parent()?.file_name()?.to_string_lossy().to_string();
    if parse_language_tag(&parent_name).is_none()
        && !COMMON_PARENTS.contains(&parent_name.to_lowercase().as_str())
    {
        return Some(parent_name);
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn table(value: Value) -> TranslationTable {
        TranslationTable::try_from(value).unwrap()
    }

    #[googletest::test]
    fn test_from_json_text_accepts_comments_and_trailing_commas() {
        let text = r#"{
            // header strings
            "header": { "title": "Patient intake", },
        }"#;

        let result = TranslationTable::from_json_text(text).unwrap();

        expect_that!(
            result.flatten().get("header.title"),
            some(eq(&"Patient intake".to_string()))
        );
    }

    #[rstest]
    #[case::array("[1, 2]", "array")]
    #[case::string(r#""hello""#, "string")]
    #[case::number("42", "number")]
    fn test_from_json_text_rejects_non_object_root(
        #[case] text: &str,
        #[case] found: &'static str,
    ) {
        let result = TranslationTable::from_json_text(text);

        assert_eq!(result, Err(TableParseError::NotAnObject { found }));
    }

    #[googletest::test]
    fn test_from_json_text_errors() {
        assert_eq!(TranslationTable::from_json_text(""), Err(TableParseError::Empty));
        assert!(matches!(
            TranslationTable::from_json_text("{ \"a\": "),
            Err(TableParseError::Syntax(_))
        ));
    }

    #[googletest::test]
    fn test_non_string_values_become_opaque() {
        let result = table(json!({ "count": 3, "flag": true, "none": null, "list": ["a"] }));

        for key in ["count", "flag", "none", "list"] {
            expect_that!(result.get(key), some(eq(&TranslationValue::Opaque)));
        }
    }

    #[googletest::test]
    fn test_flatten_nested_skips_opaque() {
        let result = table(json!({
            "common": { "save": "Save", "cancel": "Cancel" },
            "errors": { "required": "Required", "limit": 10 }
        }))
        .flatten();

        expect_that!(result.get("common.save"), some(eq(&"Save".to_string())));
        expect_that!(result.get("errors.required"), some(eq(&"Required".to_string())));
        expect_that!(result.get("errors.limit"), none());
        expect_that!(result.len(), eq(3));
    }

    #[googletest::test]
    fn test_deserialize_via_serde() {
        let result: TranslationTable =
            serde_json::from_str(r#"{"a": {"b": "c"}}"#).unwrap();
        expect_that!(result.flatten().get("a.b"), some(eq(&"c".to_string())));

        let not_object = serde_json::from_str::<TranslationTable>(r#""c""#);
        expect_true!(not_object.is_err());
    }

    #[googletest::test]
    fn test_merge_is_deep_and_incoming_wins() {
        let mut base = table(json!({ "form": { "name": "Name", "age": "Age" } }));
        base.merge(table(json!({ "form": { "age": "Age (years)", "sex": "Sex" } })));

        let flat = base.flatten();
        expect_that!(flat.get("form.name"), some(eq(&"Name".to_string())));
        expect_that!(flat.get("form.age"), some(eq(&"Age (years)".to_string())));
        expect_that!(flat.get("form.sex"), some(eq(&"Sex".to_string())));
    }

    #[googletest::test]
    fn test_insert_namespace_merges_under_key() {
        let mut base = table(json!({ "forms": { "title": "Forms" } }));
        base.insert_namespace("forms", table(json!({ "submit": "Submit" })));

        let flat = base.flatten();
        expect_that!(flat.get("forms.title"), some(eq(&"Forms".to_string())));
        expect_that!(flat.get("forms.submit"), some(eq(&"Submit".to_string())));
    }

    #[googletest::test]
    fn test_backfill_adds_only_missing_entries() {
        let core = table(json!({
            "app": { "name": "Portal", "tagline": "Collect data" },
            "nav": { "home": "Home" }
        }));
        let mut full = table(json!({
            "app": { "name": "Clinical Portal" },
            "nav": "flat"
        }));

        let added = full.backfill_from(&core);

        expect_that!(added, elements_are![eq("app.tagline"), eq("nav")]);
        let flat = full.flatten();
        expect_that!(flat.get("app.name"), some(eq(&"Clinical Portal".to_string())));
        expect_that!(flat.get("app.tagline"), some(eq(&"Collect data".to_string())));
        expect_that!(flat.get("nav.home"), some(eq(&"Home".to_string())));
        expect_that!(flat.get("nav"), none());
    }

    #[googletest::test]
    fn test_backfill_replaces_mismatched_shapes() {
        let core = table(json!({
            "title": "Intake",
            "status": "Active",
            "forms": { "village": "Village" }
        }));
        let mut full = table(json!({
            "title": 5,
            "status": { "active": "Active", "closed": "Closed" },
            "forms": { "village": { "label": "Village name" } }
        }));

        let added = full.backfill_from(&core);

        expect_that!(added, elements_are![eq("forms.village"), eq("status"), eq("title")]);
        let flat = full.flatten();
        expect_that!(flat.get("title"), some(eq(&"Intake".to_string())));
        expect_that!(flat.get("status"), some(eq(&"Active".to_string())));
        expect_that!(flat.get("forms.village"), some(eq(&"Village".to_string())));
        expect_that!(flat.len(), eq(3));
    }

    #[rstest]
    #[case("full/en.json", Some(Language::En))]
    #[case("full/bn.json", Some(Language::Bn))]
    #[case("bn/forms.json", Some(Language::Bn))]
    #[case("forms/en.json", Some(Language::En))]
    #[case("full/bn-BD.json", Some(Language::Bn))]
    #[case("full/en_US/forms.json", Some(Language::En))]
    #[case("full/en-trans.json", None)]
    #[case("full/hoge/forms.json", None)]
    // When multiple language names are included, the last match is returned
    #[case("en/bn.json", Some(Language::Bn))]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<Language>) {
        assert_eq!(detect_language_from_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case("en/forms.json", Some("forms"))]
    #[case("bn/dashboard.json", Some("dashboard"))]
    #[case("forms/en.json", Some("forms"))]
    #[case("en.json", None)]
    #[case("full/bn.json", None)]
    #[case("locales/en.json", None)]
    fn test_detect_namespace_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_namespace_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }
}
