//! セッション単位の翻訳ストア
mod session;
mod state;
mod view;

pub use session::{
    MountHandle,
    StoreOptions,
    TranslationStore,
};
pub use state::{
    LoadStatus,
    SessionState,
};
pub use view::TranslationView;
