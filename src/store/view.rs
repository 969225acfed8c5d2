//! Read-only handle to the session translation state.

use std::sync::Arc;

use tokio::sync::watch;

use super::state::{
    LoadStatus,
    SessionState,
};
use crate::input::translation::TranslationTable;
use crate::lookup::{
    get_placeholder,
    lookup_in,
};
use crate::types::Language;

/// Cheap, cloneable, read-only view handed to rendering code.
///
/// Views never write. They keep working after the store is dropped and keep
/// showing the last published state.
#[derive(Debug, Clone)]
pub struct TranslationView {
    receiver: watch::Receiver<SessionState>,
}

impl TranslationView {
    pub(crate) const fn new(receiver: watch::Receiver<SessionState>) -> Self {
        Self { receiver }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.receiver.borrow().language()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_loading()
    }

    #[must_use]
    pub fn load_status(&self, language: Language) -> LoadStatus {
        self.receiver.borrow().load_status(language)
    }

    /// Table currently used for rendering
    #[must_use]
    pub fn current_table(&self) -> Arc<TranslationTable> {
        self.receiver.borrow().current_table()
    }

    /// Translate `path` against the current table.
    #[must_use]
    pub fn t(&self, path: &str, fallback: &str) -> String {
        lookup_in(&self.current_table(), path, fallback).to_string()
    }

    /// Form placeholder for `key` in the current table.
    #[must_use]
    pub fn placeholder(&self, key: &str, fallback: &str) -> String {
        get_placeholder(&self.current_table(), key, fallback).to_string()
    }

    /// Wait until the state changes.
    ///
    /// Returns `false` once the store has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until the full load for `language` has finished, successfully
    /// or not.
    ///
    /// Returns `None` if the store was dropped first.
    pub async fn load_finished(&mut self, language: Language) -> Option<LoadStatus> {
        self.receiver
            .wait_for(|state| {
                matches!(state.load_status(language), LoadStatus::Loaded | LoadStatus::Failed)
            })
            .await
            .ok()
            .map(|state| state.load_status(language))
    }
}
