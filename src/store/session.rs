//! 翻訳ストア本体
//!
//! 初回描画はコアテーブルだけで行い、フルテーブルはマウント後に遅延して
//! バックグラウンドで取得する。

use std::sync::{
    Arc,
    Weak,
};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::state::{
    LoadStatus,
    SessionState,
};
use super::view::TranslationView;
use crate::config::PortalSettings;
use crate::consistency;
use crate::input::bundle::CoreTables;
use crate::input::translation::TranslationTable;
use crate::source::{
    FetchError,
    TranslationSource,
};
use crate::types::Language;

/// ストアの動作設定
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// セッション開始時の言語
    pub initial_language: Language,
    /// マウントからフルテーブル取得開始までの遅延
    pub full_load_delay: Duration,
    /// 取得したフルテーブルをコアテーブルと照合するか
    pub consistency_check: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from(&PortalSettings::default())
    }
}

impl From<&PortalSettings> for StoreOptions {
    fn from(settings: &PortalSettings) -> Self {
        Self {
            initial_language: settings.default_language,
            full_load_delay: settings.full_load_delay(),
            consistency_check: settings.consistency_check,
        }
    }
}

/// State shared with background tasks through a `Weak` reference.
struct StoreInner {
    /// 唯一の書き込み口
    state: watch::Sender<SessionState>,
    /// フルテーブルの取得元
    source: Arc<dyn TranslationSource>,
    /// 動作設定
    options: StoreOptions,
}

/// Owner of one session's translation state.
///
/// The store is the single writer. Rendering code gets read-only
/// [`TranslationView`]s. Background tasks only hold a weak reference, so
/// once the store is dropped a late fetch result is discarded instead of
/// being applied.
pub struct TranslationStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationStore")
            .field("state", &*self.inner.state.borrow())
            .field("source", &"<dyn TranslationSource>")
            .field("options", &self.inner.options)
            .finish()
    }
}

impl TranslationStore {
    /// 新しいストアを作成
    ///
    /// # Arguments
    /// * `core` - 同期的に利用できるコアテーブル
    /// * `source` - フルテーブルの取得元
    /// * `options` - 動作設定
    #[must_use]
    pub fn new(core: CoreTables, source: Arc<dyn TranslationSource>, options: StoreOptions) -> Self {
        let (state, _) = watch::channel(SessionState::new(options.initial_language, core));
        tracing::debug!(language = %options.initial_language, "Translation store created");
        Self { inner: Arc::new(StoreInner { state, source, options }) }
    }

    /// 読み取り専用ビューを取得
    #[must_use]
    pub fn view(&self) -> TranslationView {
        TranslationView::new(self.inner.state.subscribe())
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.inner.state.borrow().language()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    #[must_use]
    pub fn load_status(&self, language: Language) -> LoadStatus {
        self.inner.state.borrow().load_status(language)
    }

    /// 現在表示すべきテーブル
    #[must_use]
    pub fn current_table(&self) -> Arc<TranslationTable> {
        self.inner.state.borrow().current_table()
    }

    /// 言語を切り替える
    ///
    /// フルテーブルは言語ごとに保持しているので、切り替え先のフルテーブルが
    /// 未取得の間はそのコアテーブルが表示される。
    pub fn set_language(&self, language: Language) {
        let changed = self.inner.state.send_if_modified(|state| state.set_language(language));
        if changed {
            tracing::debug!(%language, "Language changed");
        }
    }

    /// 選択中の言語のフルテーブル取得を開始する
    ///
    /// 言語ごとにセッション中 1 回だけ取得する。既に取得中・取得済み・失敗済み
    /// の場合は何もしない。
    ///
    /// # Returns
    /// 新たに取得を開始した場合は `true`
    pub fn request_full_load(&self) -> bool {
        let language = self.language();
        self.inner.start_load(language)
    }

    /// UI スコープのマウントを通知する
    ///
    /// 遅延の後にフルテーブルの取得を開始し、以後は言語が変わるたびに同じ遅延を
    /// 置いて取得する。返されたハンドルを破棄するとタイマーも止まる。
    #[must_use = "dropping the handle cancels the deferred load"]
    pub fn mount(&self) -> MountHandle {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No Tokio runtime; full translations will not be loaded");
            return MountHandle { task: None };
        };

        let weak = Arc::downgrade(&self.inner);
        let receiver = self.inner.state.subscribe();
        let delay = self.inner.options.full_load_delay;
        let task = runtime.spawn(run_deferred_loads(weak, receiver, delay));

        MountHandle { task: Some(task) }
    }
}

impl StoreInner {
    /// 取得タスクを起動する
    fn start_load(self: &Arc<Self>, language: Language) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(%language, "No Tokio runtime; cannot load full translations");
            return false;
        };

        if !self.state.send_if_modified(|state| state.begin_load(language)) {
            tracing::debug!(%language, "Full translations already requested");
            return false;
        }

        tracing::debug!(%language, "Loading full translations");
        let weak = Arc::downgrade(self);
        let source = Arc::clone(&self.source);
        runtime.spawn(async move {
            let result = source.fetch(language).await;
            // 取得中にストアが破棄された場合は結果を捨てる
            let Some(inner) = weak.upgrade() else {
                tracing::debug!(%language, "Store dropped before full translations arrived");
                return;
            };
            inner.finish_load(language, result);
        });

        true
    }

    fn finish_load(&self, language: Language, result: Result<TranslationTable, FetchError>) {
        match result {
            Ok(mut table) => {
                if self.options.consistency_check {
                    let core = Arc::clone(self.state.borrow().core_table(language));
                    consistency::reconcile(language, &core, &mut table);
                }
                self.state.send_modify(|state| state.complete_load(language, table));
                tracing::info!(%language, "Full translations loaded");
            }
            Err(e) => {
                self.state.send_modify(|state| state.fail_load(language));
                tracing::warn!(%language, error = %e, "Failed to load full translations; using core translations");
            }
        }
    }
}

/// 遅延取得ループ
///
/// 言語が変わるたびに `delay` だけ待ってから取得を要求する。ストアが破棄される
/// と終了する。
async fn run_deferred_loads(
    weak: Weak<StoreInner>,
    mut receiver: watch::Receiver<SessionState>,
    delay: Duration,
) {
    let mut requested: Option<Language> = None;
    loop {
        let language = receiver.borrow_and_update().language();
        if requested != Some(language) {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // 待機中に切り替わっていれば新しい言語を取得する
            let current = inner.state.borrow().language();
            inner.start_load(current);
            requested = Some(current);
            continue;
        }

        if receiver.changed().await.is_err() {
            return;
        }
    }
}

/// Handle for a mounted UI scope.
///
/// Dropping it cancels the pending deferred load. A fetch that has already
/// started keeps running and is applied only while the store is alive.
#[derive(Debug)]
pub struct MountHandle {
    task: Option<JoinHandle<()>>,
}

impl MountHandle {
    /// スコープを破棄する
    pub fn unmount(self) {
        drop(self);
    }

    /// 遅延取得ループが終了しているか
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
