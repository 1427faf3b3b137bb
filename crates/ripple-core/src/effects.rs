//! Presentation effects driven by the applied settings
//!
//! The effects only ever see applied state. Each one touches its own
//! outputs, so effects fired by the same commit may run in any order.

use std::collections::BTreeMap;

use crate::settings::{ChangeSet, Settings};
use crate::types::Theme;

/// CSS custom property carrying the accent color.
pub const ACCENT_PROPERTY: &str = "--accent-color";

/// Document-facing outputs the effects write to.
pub trait PresentationSink {
    fn remove_root_class(&mut self, class: &str);
    fn add_root_class(&mut self, class: &str);
    fn set_style_property(&mut self, name: &str, value: &str);
    fn set_title(&mut self, title: &str);
    /// Whether a favicon link element exists.
    fn has_favicon(&self) -> bool;
    fn update_favicon(&mut self, href: &str);
    fn create_favicon(&mut self, href: &str);
}

/// Swap the theme marker class and set the accent property.
pub fn apply_theme<P: PresentationSink + ?Sized>(sink: &mut P, settings: &Settings) {
    for class in Theme::MARKER_CLASSES {
        sink.remove_root_class(class);
    }
    sink.add_root_class(settings.theme.class_name());
    sink.set_style_property(ACCENT_PROPERTY, settings.accent_color.hex());
}

/// Present the cloak identity: title and favicon.
pub fn apply_cloak<P: PresentationSink + ?Sized>(sink: &mut P, settings: &Settings) {
    let identity = settings.cloak.identity();
    sink.set_title(identity.title);
    if sink.has_favicon() {
        sink.update_favicon(identity.icon);
    } else {
        sink.create_favicon(identity.icon);
    }
}

/// Run the document effects whose dependencies are in `changes`.
pub fn apply_changes<P: PresentationSink + ?Sized>(
    sink: &mut P,
    settings: &Settings,
    changes: ChangeSet,
) {
    if changes.intersects(ChangeSet::APPEARANCE) {
        log::debug!("applying theme {} / accent {}", settings.theme, settings.accent_color);
        apply_theme(sink, settings);
    }
    if changes.contains(ChangeSet::CLOAK) {
        log::debug!("applying cloak {}", settings.cloak);
        apply_cloak(sink, settings);
    }
}

// =============================================================================
// In-memory Document
// =============================================================================

/// Document state kept in memory, for previews and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentModel {
    pub title: String,
    pub favicon: Option<String>,
    pub root_classes: Vec<String>,
    pub style: BTreeMap<String, String>,
    /// Number of favicon elements created so far.
    pub favicons_created: usize,
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document that already carries a favicon link.
    pub fn with_favicon(href: &str) -> Self {
        Self {
            favicon: Some(href.to_string()),
            ..Self::default()
        }
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }
}

impl PresentationSink for DocumentModel {
    fn remove_root_class(&mut self, class: &str) {
        self.root_classes.retain(|c| c != class);
    }

    fn add_root_class(&mut self, class: &str) {
        if !self.root_classes.iter().any(|c| c == class) {
            self.root_classes.push(class.to_string());
        }
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.insert(name.to_string(), value.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn has_favicon(&self) -> bool {
        self.favicon.is_some()
    }

    fn update_favicon(&mut self, href: &str) {
        self.favicon = Some(href.to_string());
    }

    fn create_favicon(&mut self, href: &str) {
        self.favicons_created += 1;
        self.favicon = Some(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccentColor, Cloak, BLANK_ICON};

    fn with_cloak(cloak: Cloak) -> Settings {
        Settings {
            cloak,
            ..Settings::default()
        }
    }

    #[test]
    fn theme_effect_leaves_exactly_one_marker() {
        let mut doc = DocumentModel::new();
        doc.root_classes = vec!["light-mode".to_string(), "app".to_string()];

        let settings = Settings {
            theme: Theme::Matte,
            accent_color: AccentColor::Green,
            ..Settings::default()
        };
        apply_theme(&mut doc, &settings);

        assert_eq!(doc.root_classes, vec!["app", "theme-ripple-matte"]);
        assert_eq!(doc.style_property(ACCENT_PROPERTY), Some("#10b981"));
    }

    #[test]
    fn blank_cloak_then_site_then_neutral() {
        let mut doc = DocumentModel::with_favicon("/favicon.ico");

        apply_cloak(&mut doc, &with_cloak(Cloak::Blank));
        assert_eq!(doc.title, " ");
        assert_eq!(doc.favicon.as_deref(), Some(BLANK_ICON));

        apply_cloak(&mut doc, &with_cloak(Cloak::Google));
        assert_eq!(doc.title, "Google");
        assert_eq!(doc.favicon.as_deref(), Some("https://www.google.com/favicon.ico"));

        apply_cloak(&mut doc, &with_cloak(Cloak::None));
        assert_eq!(doc.title, "Ripple");
        assert_eq!(
            doc.favicon.as_deref(),
            Some("https://i.ibb.co/KzftD25N/download-3.png")
        );
        assert_eq!(doc.favicons_created, 0);
    }

    #[test]
    fn missing_favicon_is_created_once() {
        let mut doc = DocumentModel::new();
        apply_cloak(&mut doc, &with_cloak(Cloak::Teams));
        apply_cloak(&mut doc, &with_cloak(Cloak::Blank));

        assert_eq!(doc.favicons_created, 1);
        assert_eq!(doc.title, " ");
    }

    #[test]
    fn apply_changes_skips_untouched_groups() {
        let mut doc = DocumentModel::new();
        apply_changes(&mut doc, &with_cloak(Cloak::Teams), ChangeSet::BEHAVIOR);
        assert_eq!(doc, DocumentModel::new());

        apply_changes(&mut doc, &with_cloak(Cloak::Teams), ChangeSet::CLOAK);
        assert_eq!(doc.title, "Microsoft Teams");
        assert!(doc.root_classes.is_empty());

        apply_changes(&mut doc, &with_cloak(Cloak::Teams), ChangeSet::ACCENT);
        assert_eq!(doc.root_classes, vec!["theme-ripple"]);
    }
}
