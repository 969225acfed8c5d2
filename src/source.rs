//! フル翻訳テーブルの取得元
mod memory;
mod types;
mod workspace;

pub use memory::StaticSource;
pub use types::{
    FetchError,
    TranslationSource,
};
pub use workspace::FsTranslationSource;
