//! Ripple Core Library
//!
//! Settings state for the Ripple front-end, kept free of any DOM
//! dependency so it can be driven from the browser bindings, the CLI, or
//! plain unit tests.
//!
//! # Architecture
//!
//! Edits are staged in a pending snapshot and copied into the applied
//! snapshot by a single commit. Only applied state reaches the outside:
//! presentation effects write it to a [`PresentationSink`] and the
//! persistence adapter writes it to a [`KeyValueStore`].
//!
//! # Modules
//!
//! - `types`: themes, cloaks, accent colors and other enums
//! - `settings`: the pending/applied configuration store
//! - `persist`: key-value persistence with per-field default merging
//! - `effects`: title, favicon, theme class and accent effects
//! - `escape`: panic key lookup
//! - `session`: wires the store to its effects

pub mod effects;
pub mod escape;
pub mod persist;
pub mod session;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use effects::{DocumentModel, PresentationSink};
pub use persist::{KeyValueStore, MemoryStore, PersistedSettings, StorageError};
pub use session::Session;
pub use settings::{ChangeSet, SettingChange, Settings, SettingsStore};
pub use types::{accent_hex, AccentColor, AdVariant, Cloak, ParseError, ResetScope, Theme};
