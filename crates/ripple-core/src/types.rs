//! Core type definitions for the Ripple front-end
//!
//! The serialized names match the values stored by earlier releases, so
//! a snapshot written by any version of the front-end still loads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for values that fail to parse at the string boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
    #[error("Unknown cloak: {0}")]
    UnknownCloak(String),
    #[error("Unknown accent color: {0}")]
    UnknownAccent(String),
    #[error("Unknown ad variant: {0}")]
    UnknownAdVariant(String),
    #[error("Unknown reset scope: {0}")]
    UnknownResetScope(String),
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),
    #[error("Invalid boolean for {key}: {value}")]
    InvalidBool { key: String, value: String },
    #[error("{0} must not be empty")]
    EmptyValue(String),
}

// =============================================================================
// Theme
// =============================================================================

/// Visual skin applied to the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Theme {
    #[default]
    #[serde(rename = "Ripple")]
    Default,
    #[serde(rename = "Ripple Matte")]
    Matte,
    #[serde(rename = "White")]
    Light,
    #[serde(rename = "Low Profile")]
    LowProfile,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Matte, Theme::Light, Theme::LowProfile];

    /// Every marker class any theme may put on the root element.
    pub const MARKER_CLASSES: [&'static str; 4] =
        ["theme-ripple", "theme-ripple-matte", "light-mode", "low-profile"];

    /// Root class that marks this theme as active.
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Default => "theme-ripple",
            Theme::Matte => "theme-ripple-matte",
            Theme::Light => "light-mode",
            Theme::LowProfile => "low-profile",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "Ripple",
            Theme::Matte => "Ripple Matte",
            Theme::Light => "White",
            Theme::LowProfile => "Low Profile",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ripple" | "default" => Ok(Theme::Default),
            "Ripple Matte" | "matte" => Ok(Theme::Matte),
            "White" | "light" => Ok(Theme::Light),
            "Low Profile" | "low-profile" => Ok(Theme::LowProfile),
            _ => Err(ParseError::UnknownTheme(s.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cloak
// =============================================================================

/// Identity the browser tab presents (title + favicon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Cloak {
    /// No disguise: Ripple's own title and icon
    #[default]
    #[serde(rename = "Ripple")]
    None,
    #[serde(rename = "Google")]
    Google,
    #[serde(rename = "Teams")]
    Teams,
    /// Blank title and a transparent icon
    #[serde(rename = "Ghost")]
    Blank,
}

/// Fixed (title, icon) pair shown for a cloak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloakIdentity {
    pub title: &'static str,
    pub icon: &'static str,
}

/// 1x1 transparent PNG.
pub const BLANK_ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

impl Cloak {
    pub const ALL: [Cloak; 4] = [Cloak::None, Cloak::Google, Cloak::Teams, Cloak::Blank];

    pub fn identity(self) -> CloakIdentity {
        match self {
            Cloak::None => CloakIdentity {
                title: "Ripple",
                icon: "https://i.ibb.co/KzftD25N/download-3.png",
            },
            Cloak::Google => CloakIdentity {
                title: "Google",
                icon: "https://www.google.com/favicon.ico",
            },
            Cloak::Teams => CloakIdentity {
                title: "Microsoft Teams",
                icon: "https://teams.microsoft.com/favicon.ico",
            },
            Cloak::Blank => CloakIdentity {
                title: " ",
                icon: BLANK_ICON,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cloak::None => "Ripple",
            Cloak::Google => "Google",
            Cloak::Teams => "Teams",
            Cloak::Blank => "Ghost",
        }
    }
}

impl FromStr for Cloak {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ripple" | "none" => Ok(Cloak::None),
            "Google" | "google" => Ok(Cloak::Google),
            "Teams" | "teams" => Ok(Cloak::Teams),
            "Ghost" | "blank" => Ok(Cloak::Blank),
            _ => Err(ParseError::UnknownCloak(s.to_string())),
        }
    }
}

impl fmt::Display for Cloak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Accent Color
// =============================================================================

/// UI accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AccentColor {
    #[default]
    Blue,
    Red,
    Green,
    Orange,
    Purple,
}

impl AccentColor {
    pub const ALL: [AccentColor; 5] = [
        AccentColor::Blue,
        AccentColor::Red,
        AccentColor::Green,
        AccentColor::Orange,
        AccentColor::Purple,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            AccentColor::Blue => "#3b82f6",
            AccentColor::Red => "#ef4444",
            AccentColor::Green => "#10b981",
            AccentColor::Orange => "#f59e0b",
            AccentColor::Purple => "#8b5cf6",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccentColor::Blue => "blue",
            AccentColor::Red => "red",
            AccentColor::Green => "green",
            AccentColor::Orange => "orange",
            AccentColor::Purple => "purple",
        }
    }
}

/// Hex code for an accent color name. Unrecognized names resolve to blue.
pub fn accent_hex(name: &str) -> &'static str {
    name.parse::<AccentColor>().unwrap_or_default().hex()
}

impl FromStr for AccentColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(AccentColor::Blue),
            "red" => Ok(AccentColor::Red),
            "green" => Ok(AccentColor::Green),
            "orange" => Ok(AccentColor::Orange),
            "purple" => Ok(AccentColor::Purple),
            _ => Err(ParseError::UnknownAccent(s.to_string())),
        }
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Ad Variant
// =============================================================================

/// Display size of an ad slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdVariant {
    Small,
    #[default]
    Medium,
    Large,
    Vertical,
}

impl FromStr for AdVariant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(AdVariant::Small),
            "medium" => Ok(AdVariant::Medium),
            "large" => Ok(AdVariant::Large),
            "vertical" => Ok(AdVariant::Vertical),
            _ => Err(ParseError::UnknownAdVariant(s.to_string())),
        }
    }
}

// =============================================================================
// Reset Scope
// =============================================================================

/// Group of settings restored by a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// theme, accent color
    Appearance,
    /// cloak
    Cloaking,
    /// panic key, shield, SnipeSecure
    Security,
    /// Everything, applied state included
    All,
}

impl FromStr for ResetScope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appearance" => Ok(ResetScope::Appearance),
            "cloaking" => Ok(ResetScope::Cloaking),
            "security" => Ok(ResetScope::Security),
            "all" => Ok(ResetScope::All),
            _ => Err(ParseError::UnknownResetScope(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_hex_is_total() {
        assert_eq!(accent_hex("blue"), "#3b82f6");
        assert_eq!(accent_hex("red"), "#ef4444");
        assert_eq!(accent_hex("green"), "#10b981");
        assert_eq!(accent_hex("orange"), "#f59e0b");
        assert_eq!(accent_hex("purple"), "#8b5cf6");
        assert_eq!(accent_hex("magenta"), "#3b82f6");
        assert_eq!(accent_hex(""), "#3b82f6");
        assert_eq!(accent_hex("Blue"), "#3b82f6");
    }

    #[test]
    fn theme_classes_are_distinct_markers() {
        for theme in Theme::ALL {
            assert!(Theme::MARKER_CLASSES.contains(&theme.class_name()));
        }
        assert_eq!(Theme::Light.class_name(), "light-mode");
    }

    #[test]
    fn serialized_names_match_stored_values() {
        assert_eq!(serde_json::to_string(&Theme::Matte).unwrap(), "\"Ripple Matte\"");
        assert_eq!(serde_json::to_string(&Cloak::Blank).unwrap(), "\"Ghost\"");
        assert_eq!(serde_json::to_string(&AccentColor::Orange).unwrap(), "\"orange\"");
        for cloak in Cloak::ALL {
            let json = serde_json::to_string(&cloak).unwrap();
            assert_eq!(json, format!("\"{}\"", cloak.as_str()));
            assert_eq!(cloak.as_str().parse::<Cloak>().unwrap(), cloak);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "Sepia".parse::<Theme>(),
            Err(ParseError::UnknownTheme("Sepia".to_string()))
        );
        assert!("Bing".parse::<Cloak>().is_err());
        assert!("huge".parse::<AdVariant>().is_err());
        assert!("display".parse::<ResetScope>().is_err());
    }

    #[test]
    fn blank_identity_uses_space_title() {
        let identity = Cloak::Blank.identity();
        assert_eq!(identity.title, " ");
        assert!(identity.icon.starts_with("data:image/png;base64,"));
    }
}
