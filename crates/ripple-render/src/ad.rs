//! SnipeAd slot

use ripple_core::AdVariant;

use crate::markup::Markup;

/// Auction listing every ad slot links to.
pub const AD_LISTING_URL: &str = "https://www.ebay.co.uk/itm/167506178840?itmmeta=01JTXX3B02MB2MV1R1YVJVPDDY&hash=item2700257318:g:YbsAAOSwDntoH613";

const LINK_ATTRS: [(&str, &str); 4] = [
    ("href", AD_LISTING_URL),
    ("target", "_blank"),
    ("rel", "noopener noreferrer"),
    ("class", "snipe-ad__open"),
];

/// Render the ad slot for a display size.
pub fn render_ad(variant: AdVariant) -> String {
    let mut m = Markup::new();
    match variant {
        AdVariant::Small => {
            m.open("div", &[("class", "snipe-ad snipe-ad--small")])
                .element("span", &[], "Need a PC? Bid now")
                .open("div", &[("class", "snipe-ad__actions")])
                .element("a", &LINK_ATTRS, "Open")
                .close("div")
                .close("div");
        }
        AdVariant::Medium => {
            m.open("div", &[("class", "snipe-ad snipe-ad--medium")])
                .element("p", &[("class", "snipe-ad__label")], "SnipeAd")
                .element("p", &[], "Need a PC? Bid, bid, bid:")
                .open("div", &[("class", "snipe-ad__actions")])
                .element("a", &LINK_ATTRS, "Open")
                .close("div")
                .close("div");
        }
        AdVariant::Large => {
            m.open("div", &[("class", "snipe-ad snipe-ad--large")])
                .element("p", &[("class", "snipe-ad__label")], "SnipeAd")
                .element("p", &[("class", "snipe-ad__headline")], "Need a PC? Bid, bid, bid:")
                .element(
                    "p",
                    &[],
                    "High-performance gaming PC available now on eBay. Limited time offer!",
                )
                .open("div", &[("class", "snipe-ad__actions")])
                .element("a", &LINK_ATTRS, "Open")
                .close("div")
                .close("div");
        }
        AdVariant::Vertical => {
            m.open("div", &[("class", "snipe-ad snipe-ad--vertical")])
                .element("p", &[("class", "snipe-ad__label")], "SnipeAd")
                .element("p", &[], "Need a PC? Bid now on eBay:")
                .open("div", &[("class", "snipe-ad__actions")])
                .element("a", &LINK_ATTRS, "Open")
                .close("div")
                .close("div");
        }
    }
    m.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::escape;

    #[test]
    fn every_variant_links_to_listing_once() {
        let href = format!("href=\"{}\"", escape(AD_LISTING_URL));
        for variant in [AdVariant::Small, AdVariant::Medium, AdVariant::Large, AdVariant::Vertical] {
            let html = render_ad(variant);
            assert_eq!(html.matches(&href).count(), 1, "{variant:?}");
            assert!(html.contains("rel=\"noopener noreferrer\""));
            assert!(html.contains("target=\"_blank\""));
        }
    }

    #[test]
    fn default_variant_is_medium() {
        assert_eq!(render_ad(AdVariant::default()), render_ad(AdVariant::Medium));
    }

    #[test]
    fn small_slot_has_no_label() {
        assert!(!render_ad(AdVariant::Small).contains("SnipeAd"));
        assert!(render_ad(AdVariant::Vertical).contains("SnipeAd"));
        assert!(render_ad(AdVariant::Large).contains("Limited time offer!"));
    }
}
