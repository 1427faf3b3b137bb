//! Panic key lookup

use crate::settings::Settings;

/// URL to flee to when `key` is pressed, if the panic key is armed.
pub fn escape_target<'a>(settings: &'a Settings, key: &str) -> Option<&'a str> {
    if !settings.escape_key_enabled || settings.escape_key.is_empty() {
        return None;
    }
    (settings.escape_key == key).then_some(settings.escape_url.as_str())
}
