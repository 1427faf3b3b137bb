//! Ripple Widget Rendering
//!
//! Stateless views: the SnipeAd slot and the SnipePlus entitlement gate.
//! Each view is a pure function of its inputs and renders to an HTML
//! fragment the page inserts as-is.

pub mod ad;
pub mod gate;
pub mod markup;

pub use ad::{render_ad, AD_LISTING_URL};
pub use gate::{evaluate, render_gate, Entitlement, GateError, GateView, PremiumFeature, CHECKOUT_URL};
