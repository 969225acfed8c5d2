//! portal-i18n
//!
//! 臨床データ収集ポータル向けの遅延読み込み型バイリンガル翻訳ストア。
//! ドット区切りパスによる安全な検索と、初回描画を妨げないフルテーブルの
//! バックグラウンド取得を提供する。

pub mod config;
pub mod consistency;
pub mod input;
pub mod lookup;
pub mod source;
pub mod store;
pub mod types;

pub use input::bundle::CoreTables;
pub use input::translation::{
    TranslationTable,
    TranslationValue,
};
pub use lookup::{
    get_placeholder,
    lookup,
    lookup_in,
};
pub use store::{
    TranslationStore,
    TranslationView,
};
pub use types::Language;
