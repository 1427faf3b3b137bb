//! SnipePlus entitlement gate
//!
//! Decides, from the login and subscription flags, whether the user sees
//! the upgrade prompt or the premium settings, and whether the premium
//! toggles accept input. Toggle requests are checked here so that a
//! locked toggle never reaches the settings store.

use std::fmt;
use std::str::FromStr;

use ripple_core::{ParseError, SettingChange, Settings};

use crate::markup::Markup;

/// Checkout page for the SnipePlus subscription.
pub const CHECKOUT_URL: &str = "https://buy.stripe.com/test_00g5lL0Ht2Hl0QU000";

const PITCH: &str =
    "Unlock premium features including SnipeSecure, ad controls, and Wide-Display mode.";

/// Rows of the free vs. SnipePlus comparison table.
const COMPARISON: [&str; 4] = [
    "SnipeSecure Protection",
    "Ad Controls",
    "Wide-Display Mode",
    "Priority Support",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Not logged in")]
    NoSettingsView,
    #[error("{0} requires SnipePlus")]
    NotEntitled(PremiumFeature),
}

// =============================================================================
// Premium Features
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PremiumFeature {
    SnipeSecure,
    Ads,
    WideDisplay,
}

impl PremiumFeature {
    pub const ALL: [PremiumFeature; 3] = [
        PremiumFeature::SnipeSecure,
        PremiumFeature::Ads,
        PremiumFeature::WideDisplay,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PremiumFeature::SnipeSecure => "SnipeSecure",
            PremiumFeature::Ads => "Ads",
            PremiumFeature::WideDisplay => "Ripple Wide-Display",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PremiumFeature::SnipeSecure => "Protects your identity and blocks unrequired cookies",
            PremiumFeature::Ads => "Enable or disable advertisements",
            PremiumFeature::WideDisplay => {
                "Adds a \"Widen\" button on app pages that opens the app in a new about:blank tab"
            }
        }
    }

    /// Settings key the toggle writes.
    pub fn key(self) -> &'static str {
        match self {
            PremiumFeature::SnipeSecure => "snipeSecureEnabled",
            PremiumFeature::Ads => "adsEnabled",
            PremiumFeature::WideDisplay => "wideDisplayEnabled",
        }
    }

    pub fn is_enabled(self, settings: &Settings) -> bool {
        match self {
            PremiumFeature::SnipeSecure => settings.snipe_secure_enabled,
            PremiumFeature::Ads => settings.ads_enabled,
            PremiumFeature::WideDisplay => settings.wide_display_enabled,
        }
    }

    /// Pending-field write for a new toggle state.
    pub fn change(self, checked: bool) -> SettingChange {
        match self {
            PremiumFeature::SnipeSecure => SettingChange::SnipeSecureEnabled(checked),
            PremiumFeature::Ads => SettingChange::AdsEnabled(checked),
            PremiumFeature::WideDisplay => SettingChange::WideDisplayEnabled(checked),
        }
    }
}

impl FromStr for PremiumFeature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PremiumFeature::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| ParseError::UnknownSetting(s.to_string()))
    }
}

impl fmt::Display for PremiumFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// =============================================================================
// Gate Evaluation
// =============================================================================

/// Flags supplied by the account layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entitlement {
    pub logged_in: bool,
    pub entitled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumToggle {
    pub feature: PremiumFeature,
    pub checked: bool,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Logged out: sales pitch only
    UpgradePrompt,
    Settings {
        upgrade_banner: bool,
        toggles: [PremiumToggle; 3],
    },
}

/// Select the view for the current flags and pending settings.
pub fn evaluate(entitlement: Entitlement, pending: &Settings) -> GateView {
    if !entitlement.logged_in {
        return GateView::UpgradePrompt;
    }
    let interactive = entitlement.entitled;
    GateView::Settings {
        upgrade_banner: !interactive,
        toggles: PremiumFeature::ALL.map(|feature| PremiumToggle {
            feature,
            checked: feature.is_enabled(pending),
            interactive,
        }),
    }
}

impl GateView {
    pub fn toggles(&self) -> &[PremiumToggle] {
        match self {
            GateView::UpgradePrompt => &[],
            GateView::Settings { toggles, .. } => toggles,
        }
    }

    /// Turn a toggle click into a pending change, or refuse it.
    pub fn request_toggle(
        &self,
        feature: PremiumFeature,
        checked: bool,
    ) -> Result<SettingChange, GateError> {
        let toggle = self
            .toggles()
            .iter()
            .find(|t| t.feature == feature)
            .ok_or(GateError::NoSettingsView)?;
        if !toggle.interactive {
            log::debug!("rejected {} toggle without SnipePlus", feature);
            return Err(GateError::NotEntitled(feature));
        }
        Ok(feature.change(checked))
    }
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render_gate(view: &GateView) -> String {
    let mut m = Markup::new();
    match view {
        GateView::UpgradePrompt => {
            m.open("div", &[("class", "snipe-plus")]);
            render_upgrade_card(&mut m, true);
            m.close("div");
        }
        GateView::Settings { upgrade_banner, toggles } => {
            m.open("div", &[("class", "snipe-plus")])
                .element("h3", &[("class", "snipe-plus__heading")], "SnipePlus Features");
            if *upgrade_banner {
                render_upgrade_card(&mut m, false);
            }
            m.open("div", &[("class", "snipe-plus__toggles")]);
            for toggle in toggles {
                render_toggle(&mut m, toggle);
            }
            m.close("div").close("div");
        }
    }
    m.finish()
}

fn render_upgrade_card(m: &mut Markup, with_table: bool) {
    m.open("div", &[("class", "snipe-plus__upgrade")])
        .element("h3", &[], "Upgrade to SnipePlus")
        .element("p", &[], PITCH);

    if with_table {
        m.open("table", &[("class", "snipe-plus__comparison")])
            .open("thead", &[])
            .open("tr", &[])
            .element("th", &[("scope", "col")], "Feature")
            .element("th", &[("scope", "col")], "Free")
            .element("th", &[("scope", "col")], "SnipePlus")
            .close("tr")
            .close("thead")
            .open("tbody", &[]);
        for row in COMPARISON {
            m.open("tr", &[])
                .element("td", &[], row)
                .element("td", &[], "❌")
                .element("td", &[], "✅")
                .close("tr");
        }
        m.close("tbody").close("table");
    }

    m.element(
        "a",
        &[
            ("href", CHECKOUT_URL),
            ("target", "_blank"),
            ("rel", "noopener noreferrer"),
            ("class", "snipe-plus__buy"),
        ],
        "Upgrade Now",
    )
    .close("div");
}

fn render_toggle(m: &mut Markup, toggle: &PremiumToggle) {
    let mut input: Vec<(&str, &str)> = vec![
        ("type", "checkbox"),
        ("data-setting", toggle.feature.key()),
    ];
    if toggle.checked {
        input.push(("checked", ""));
    }
    let label_class = if toggle.interactive {
        "snipe-plus__switch"
    } else {
        input.push(("disabled", ""));
        "snipe-plus__switch snipe-plus__switch--locked"
    };

    m.open("div", &[("class", "snipe-plus__feature")])
        .element("h3", &[], toggle.feature.title())
        .open("label", &[("class", label_class)])
        .void("input", &input)
        .close("label")
        .element("p", &[], toggle.feature.description());
    if !toggle.interactive {
        m.element("p", &[("class", "snipe-plus__required")], "SnipePlus required");
    }
    m.close("div");
}
