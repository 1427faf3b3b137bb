//! Configuration store with staged (pending) and applied snapshots
//!
//! Every edit lands in the pending snapshot. `commit` swaps the whole
//! pending snapshot into applied in one assignment, so no consumer ever
//! sees a half-applied configuration. `show_dev_func` lives beside the
//! applied snapshot and is written directly; it has no pending stage.

use serde::Serialize;

use crate::types::{AccentColor, Cloak, ParseError, ResetScope, Theme};

pub const DEFAULT_ESCAPE_KEY: &str = "=";
pub const DEFAULT_ESCAPE_URL: &str = "https://google.com";

// =============================================================================
// Settings Snapshot
// =============================================================================

/// One complete set of stageable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Settings {
    pub theme: Theme,
    pub cloak: Cloak,
    pub accent_color: AccentColor,
    pub escape_key_enabled: bool,
    pub escape_key: String,
    pub escape_url: String,
    #[serde(rename = "displaySnipeShield")]
    pub display_shield: bool,
    pub snipe_secure_enabled: bool,
    pub ads_enabled: bool,
    pub wide_display_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            cloak: Cloak::None,
            accent_color: AccentColor::Blue,
            escape_key_enabled: false,
            escape_key: DEFAULT_ESCAPE_KEY.to_string(),
            escape_url: DEFAULT_ESCAPE_URL.to_string(),
            display_shield: true,
            snipe_secure_enabled: false,
            ads_enabled: true,
            wide_display_enabled: false,
        }
    }
}

impl Settings {
    /// Write a single field.
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::Theme(v) => self.theme = v,
            SettingChange::Cloak(v) => self.cloak = v,
            SettingChange::AccentColor(v) => self.accent_color = v,
            SettingChange::EscapeKeyEnabled(v) => self.escape_key_enabled = v,
            SettingChange::EscapeKey(v) => self.escape_key = v,
            SettingChange::EscapeUrl(v) => self.escape_url = v,
            SettingChange::DisplayShield(v) => self.display_shield = v,
            SettingChange::SnipeSecureEnabled(v) => self.snipe_secure_enabled = v,
            SettingChange::AdsEnabled(v) => self.ads_enabled = v,
            SettingChange::WideDisplayEnabled(v) => self.wide_display_enabled = v,
        }
    }

    /// Restore the fields covered by `scope` to their defaults.
    pub fn reset(&mut self, scope: ResetScope) {
        let defaults = Settings::default();
        match scope {
            ResetScope::Appearance => {
                self.theme = defaults.theme;
                self.accent_color = defaults.accent_color;
            }
            ResetScope::Cloaking => {
                self.cloak = defaults.cloak;
            }
            ResetScope::Security => {
                self.escape_key_enabled = defaults.escape_key_enabled;
                self.escape_key = defaults.escape_key;
                self.escape_url = defaults.escape_url;
                self.display_shield = defaults.display_shield;
                self.snipe_secure_enabled = defaults.snipe_secure_enabled;
            }
            ResetScope::All => *self = defaults,
        }
    }
}

// =============================================================================
// Setting Changes
// =============================================================================

/// A typed write to one stageable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Theme(Theme),
    Cloak(Cloak),
    AccentColor(AccentColor),
    EscapeKeyEnabled(bool),
    EscapeKey(String),
    EscapeUrl(String),
    DisplayShield(bool),
    SnipeSecureEnabled(bool),
    AdsEnabled(bool),
    WideDisplayEnabled(bool),
}

impl SettingChange {
    /// Keys accepted by [`SettingChange::parse`], same as the persisted names.
    pub const KEYS: [&'static str; 10] = [
        "theme",
        "cloak",
        "accentColor",
        "escapeKeyEnabled",
        "escapeKey",
        "escapeUrl",
        "displaySnipeShield",
        "snipeSecureEnabled",
        "adsEnabled",
        "wideDisplayEnabled",
    ];

    /// Parse a change from its persisted key and a string value.
    ///
    /// The panic key and URL must be non-empty: a stored empty string
    /// loads back as the default.
    pub fn parse(key: &str, value: &str) -> Result<Self, ParseError> {
        let change = match key {
            "theme" => SettingChange::Theme(value.parse()?),
            "cloak" => SettingChange::Cloak(value.parse()?),
            "accentColor" => SettingChange::AccentColor(value.parse()?),
            "escapeKeyEnabled" => SettingChange::EscapeKeyEnabled(parse_bool(key, value)?),
            "escapeKey" => SettingChange::EscapeKey(non_empty(key, value)?),
            "escapeUrl" => SettingChange::EscapeUrl(non_empty(key, value)?),
            "displaySnipeShield" => SettingChange::DisplayShield(parse_bool(key, value)?),
            "snipeSecureEnabled" => SettingChange::SnipeSecureEnabled(parse_bool(key, value)?),
            "adsEnabled" => SettingChange::AdsEnabled(parse_bool(key, value)?),
            "wideDisplayEnabled" => SettingChange::WideDisplayEnabled(parse_bool(key, value)?),
            _ => return Err(ParseError::UnknownSetting(key.to_string())),
        };
        Ok(change)
    }

    /// Persisted key of the field this change writes.
    pub fn key(&self) -> &'static str {
        match self {
            SettingChange::Theme(_) => "theme",
            SettingChange::Cloak(_) => "cloak",
            SettingChange::AccentColor(_) => "accentColor",
            SettingChange::EscapeKeyEnabled(_) => "escapeKeyEnabled",
            SettingChange::EscapeKey(_) => "escapeKey",
            SettingChange::EscapeUrl(_) => "escapeUrl",
            SettingChange::DisplayShield(_) => "displaySnipeShield",
            SettingChange::SnipeSecureEnabled(_) => "snipeSecureEnabled",
            SettingChange::AdsEnabled(_) => "adsEnabled",
            SettingChange::WideDisplayEnabled(_) => "wideDisplayEnabled",
        }
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ParseError> {
    if value.is_empty() {
        return Err(ParseError::EmptyValue(key.to_string()));
    }
    Ok(value.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// =============================================================================
// Change Sets
// =============================================================================

bitflags::bitflags! {
    /// Which dependency groups of the applied state changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeSet: u8 {
        const THEME = 1 << 0;
        const ACCENT = 1 << 1;
        const CLOAK = 1 << 2;
        /// Panic key, shield and premium toggles
        const BEHAVIOR = 1 << 3;
        const DEV_FLAG = 1 << 4;

        const APPEARANCE = Self::THEME.bits() | Self::ACCENT.bits();
        const ALL = Self::APPEARANCE.bits()
            | Self::CLOAK.bits()
            | Self::BEHAVIOR.bits()
            | Self::DEV_FLAG.bits();
    }
}

impl ChangeSet {
    /// Groups that differ between two snapshots.
    pub fn between(old: &Settings, new: &Settings) -> Self {
        let mut changes = ChangeSet::empty();
        if old.theme != new.theme {
            changes |= ChangeSet::THEME;
        }
        if old.accent_color != new.accent_color {
            changes |= ChangeSet::ACCENT;
        }
        if old.cloak != new.cloak {
            changes |= ChangeSet::CLOAK;
        }
        if old.escape_key_enabled != new.escape_key_enabled
            || old.escape_key != new.escape_key
            || old.escape_url != new.escape_url
            || old.display_shield != new.display_shield
            || old.snipe_secure_enabled != new.snipe_secure_enabled
            || old.ads_enabled != new.ads_enabled
            || old.wide_display_enabled != new.wide_display_enabled
        {
            changes |= ChangeSet::BEHAVIOR;
        }
        changes
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// Applied and pending settings plus the developer flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    applied: Settings,
    pending: Settings,
    show_dev_func: bool,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose applied and pending snapshots both start at `settings`.
    pub fn hydrated(settings: Settings, show_dev_func: bool) -> Self {
        Self {
            pending: settings.clone(),
            applied: settings,
            show_dev_func,
        }
    }

    pub fn applied(&self) -> &Settings {
        &self.applied
    }

    pub fn pending(&self) -> &Settings {
        &self.pending
    }

    pub fn show_dev_func(&self) -> bool {
        self.show_dev_func
    }

    /// True when pending holds edits not yet committed.
    pub fn has_uncommitted(&self) -> bool {
        self.pending != self.applied
    }

    /// Stage a change. Applied state is untouched.
    pub fn set_pending(&mut self, change: SettingChange) {
        log::debug!("staging {}", change.key());
        self.pending.apply(change);
    }

    /// Copy pending into applied and report what changed.
    pub fn commit(&mut self) -> ChangeSet {
        let changes = ChangeSet::between(&self.applied, &self.pending);
        self.applied = self.pending.clone();
        log::debug!("committed settings: {:?}", changes);
        changes
    }

    pub fn reset_appearance(&mut self) {
        self.pending.reset(ResetScope::Appearance);
    }

    pub fn reset_cloaking(&mut self) {
        self.pending.reset(ResetScope::Cloaking);
    }

    pub fn reset_security(&mut self) {
        self.pending.reset(ResetScope::Security);
    }

    /// Reset pending, applied and the developer flag at once.
    ///
    /// Unlike the scoped resets this takes effect immediately; no commit
    /// is needed.
    pub fn reset_all(&mut self) -> ChangeSet {
        let defaults = Settings::default();
        let mut changes = ChangeSet::between(&self.applied, &defaults);
        if self.show_dev_func {
            changes |= ChangeSet::DEV_FLAG;
        }
        self.pending = defaults.clone();
        self.applied = defaults;
        self.show_dev_func = false;
        changes
    }

    /// Dispatch a reset by scope. Only `All` touches applied state.
    pub fn reset(&mut self, scope: ResetScope) -> ChangeSet {
        log::info!("resetting {:?} settings", scope);
        match scope {
            ResetScope::Appearance => self.reset_appearance(),
            ResetScope::Cloaking => self.reset_cloaking(),
            ResetScope::Security => self.reset_security(),
            ResetScope::All => return self.reset_all(),
        }
        ChangeSet::empty()
    }

    /// Write the developer flag directly, bypassing pending/commit.
    pub fn set_show_dev_func(&mut self, show: bool) -> ChangeSet {
        if self.show_dev_func == show {
            return ChangeSet::empty();
        }
        self.show_dev_func = show;
        ChangeSet::DEV_FLAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_change() -> Vec<SettingChange> {
        vec![
            SettingChange::Theme(Theme::LowProfile),
            SettingChange::Cloak(Cloak::Teams),
            SettingChange::AccentColor(AccentColor::Purple),
            SettingChange::EscapeKeyEnabled(true),
            SettingChange::EscapeKey("`".to_string()),
            SettingChange::EscapeUrl("https://classroom.google.com".to_string()),
            SettingChange::DisplayShield(false),
            SettingChange::SnipeSecureEnabled(true),
            SettingChange::AdsEnabled(false),
            SettingChange::WideDisplayEnabled(true),
        ]
    }

    fn expected_after_every_change() -> Settings {
        Settings {
            theme: Theme::LowProfile,
            cloak: Cloak::Teams,
            accent_color: AccentColor::Purple,
            escape_key_enabled: true,
            escape_key: "`".to_string(),
            escape_url: "https://classroom.google.com".to_string(),
            display_shield: false,
            snipe_secure_enabled: true,
            ads_enabled: false,
            wide_display_enabled: true,
        }
    }

    #[test]
    fn staged_changes_do_not_touch_applied() {
        let mut store = SettingsStore::new();
        store.set_pending(SettingChange::Theme(Theme::Light));
        assert_eq!(store.pending().theme, Theme::Light);
        assert_eq!(store.applied().theme, Theme::Default);
        assert!(store.has_uncommitted());
    }

    #[test]
    fn commit_applies_every_field() {
        let mut store = SettingsStore::new();
        for change in every_change() {
            store.set_pending(change);
        }
        let changes = store.commit();
        assert_eq!(store.applied(), &expected_after_every_change());
        assert_eq!(changes, ChangeSet::APPEARANCE | ChangeSet::CLOAK | ChangeSet::BEHAVIOR);
        assert!(!store.has_uncommitted());
    }

    #[test]
    fn commit_is_independent_of_staging_order() {
        let mut forward = SettingsStore::new();
        for change in every_change() {
            forward.set_pending(change);
        }
        forward.commit();

        let mut reverse = SettingsStore::new();
        for change in every_change().into_iter().rev() {
            reverse.set_pending(change);
        }
        reverse.commit();

        assert_eq!(forward.applied(), reverse.applied());
    }

    #[test]
    fn commit_each_field_individually() {
        for change in every_change() {
            let mut store = SettingsStore::new();
            let key = change.key();
            store.set_pending(change.clone());
            store.commit();
            let mut expected = Settings::default();
            expected.apply(change);
            assert_eq!(store.applied(), &expected, "field {key}");
        }
    }

    #[test]
    fn commit_leaves_dev_flag_alone() {
        let mut store = SettingsStore::new();
        store.set_show_dev_func(true);
        store.set_pending(SettingChange::AdsEnabled(false));
        store.commit();
        assert!(store.show_dev_func());
    }

    #[test]
    fn commit_without_edits_reports_nothing() {
        let mut store = SettingsStore::new();
        assert!(store.commit().is_empty());
    }

    #[test]
    fn reset_appearance_only_touches_theme_and_accent() {
        let mut store = SettingsStore::new();
        for change in every_change() {
            store.set_pending(change);
        }
        store.reset_appearance();

        let mut expected = expected_after_every_change();
        expected.theme = Theme::Default;
        expected.accent_color = AccentColor::Blue;
        assert_eq!(store.pending(), &expected);
        assert_eq!(store.applied(), &Settings::default());
    }

    #[test]
    fn reset_cloaking_only_touches_cloak() {
        let mut store = SettingsStore::new();
        for change in every_change() {
            store.set_pending(change);
        }
        store.reset_cloaking();

        let mut expected = expected_after_every_change();
        expected.cloak = Cloak::None;
        assert_eq!(store.pending(), &expected);
    }

    #[test]
    fn reset_security_keeps_ads_and_wide_display() {
        let mut store = SettingsStore::new();
        for change in every_change() {
            store.set_pending(change);
        }
        store.reset_security();

        let pending = store.pending();
        assert!(!pending.escape_key_enabled);
        assert_eq!(pending.escape_key, DEFAULT_ESCAPE_KEY);
        assert_eq!(pending.escape_url, DEFAULT_ESCAPE_URL);
        assert!(pending.display_shield);
        assert!(!pending.snipe_secure_enabled);
        assert!(!pending.ads_enabled);
        assert!(pending.wide_display_enabled);
        assert_eq!(pending.theme, Theme::LowProfile);
    }

    #[test]
    fn reset_all_takes_effect_without_commit() {
        let mut store = SettingsStore::new();
        for change in every_change() {
            store.set_pending(change);
        }
        store.commit();
        store.set_show_dev_func(true);
        store.set_pending(SettingChange::Theme(Theme::Matte));

        let changes = store.reset(ResetScope::All);

        assert_eq!(store.pending(), &Settings::default());
        assert_eq!(store.applied(), &Settings::default());
        assert!(!store.show_dev_func());
        assert!(changes.contains(ChangeSet::DEV_FLAG | ChangeSet::CLOAK | ChangeSet::THEME));
    }

    #[test]
    fn scoped_resets_report_no_applied_change() {
        let mut store = SettingsStore::new();
        store.set_pending(SettingChange::Cloak(Cloak::Google));
        store.commit();
        assert!(store.reset(ResetScope::Cloaking).is_empty());
        assert_eq!(store.applied().cloak, Cloak::Google);
        assert_eq!(store.pending().cloak, Cloak::None);
    }

    #[test]
    fn dev_flag_change_is_reported_once() {
        let mut store = SettingsStore::new();
        assert_eq!(store.set_show_dev_func(true), ChangeSet::DEV_FLAG);
        assert!(store.set_show_dev_func(true).is_empty());
        assert!(!store.has_uncommitted());
    }

    #[test]
    fn parses_changes_from_strings() {
        assert_eq!(
            SettingChange::parse("theme", "White").unwrap(),
            SettingChange::Theme(Theme::Light)
        );
        assert_eq!(
            SettingChange::parse("adsEnabled", "off").unwrap(),
            SettingChange::AdsEnabled(false)
        );
        assert_eq!(
            SettingChange::parse("accentColor", "teal"),
            Err(ParseError::UnknownAccent("teal".to_string()))
        );
        assert!(matches!(
            SettingChange::parse("escapeKeyEnabled", "maybe"),
            Err(ParseError::InvalidBool { .. })
        ));
        assert!(matches!(
            SettingChange::parse("showDevFunc", "true"),
            Err(ParseError::UnknownSetting(_))
        ));
        for key in SettingChange::KEYS {
            assert!(!matches!(
                SettingChange::parse(key, "x"),
                Err(ParseError::UnknownSetting(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_escape_key_and_url() {
        assert_eq!(
            SettingChange::parse("escapeKey", ""),
            Err(ParseError::EmptyValue("escapeKey".to_string()))
        );
        assert_eq!(
            SettingChange::parse("escapeUrl", ""),
            Err(ParseError::EmptyValue("escapeUrl".to_string()))
        );
        assert_eq!(
            SettingChange::parse("escapeKey", " ").unwrap(),
            SettingChange::EscapeKey(" ".to_string())
        );
    }
}
