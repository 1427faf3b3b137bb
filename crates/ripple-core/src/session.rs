//! Session: owns the settings store and wires commits to their effects
//!
//! One session exists per page. It hydrates from storage, runs every
//! effect once, and from then on re-runs only the effects whose inputs
//! changed. Pending edits never reach the sink or the storage.

use crate::effects::{self, PresentationSink};
use crate::escape;
use crate::persist::{self, KeyValueStore, PersistedSettings};
use crate::settings::{ChangeSet, SettingChange, SettingsStore};
use crate::types::ResetScope;

pub struct Session<P, S> {
    store: SettingsStore,
    sink: P,
    storage: Option<S>,
}

impl<P: PresentationSink, S: KeyValueStore> Session<P, S> {
    /// Hydrate from `storage` (if any) and present the result.
    ///
    /// Without storage the session runs on defaults and never persists.
    pub fn start(sink: P, storage: Option<S>) -> Self {
        let store = hydrate(storage.as_ref());
        let mut session = Self { store, sink, storage };
        session.dispatch(ChangeSet::ALL);
        session
    }

    /// Hydrate from `storage` and present the result without keeping the
    /// storage, so nothing is ever written back.
    pub fn read_only(sink: P, storage: &S) -> Self {
        let store = hydrate(Some(storage));
        let mut session = Self {
            store,
            sink,
            storage: None,
        };
        session.dispatch(ChangeSet::ALL);
        session
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    pub fn set_pending(&mut self, change: SettingChange) {
        self.store.set_pending(change);
    }

    pub fn commit(&mut self) -> ChangeSet {
        let changes = self.store.commit();
        self.dispatch(changes);
        changes
    }

    pub fn reset(&mut self, scope: ResetScope) -> ChangeSet {
        let changes = self.store.reset(scope);
        self.dispatch(changes);
        changes
    }

    pub fn set_show_dev_func(&mut self, show: bool) -> ChangeSet {
        let changes = self.store.set_show_dev_func(show);
        self.dispatch(changes);
        changes
    }

    /// Escape URL for a key press against the applied settings.
    pub fn escape_target(&self, key: &str) -> Option<&str> {
        escape::escape_target(self.store.applied(), key)
    }

    fn dispatch(&mut self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }
        effects::apply_changes(&mut self.sink, self.store.applied(), changes);
        if let Some(storage) = self.storage.as_mut() {
            persist::save(storage, &PersistedSettings::from_store(&self.store));
        }
    }
}

fn hydrate<S: KeyValueStore>(storage: Option<&S>) -> SettingsStore {
    match storage.and_then(|s| persist::load(s)) {
        Some(snapshot) => {
            log::info!("restored saved settings");
            snapshot.into_store()
        }
        None => SettingsStore::new(),
    }
}
