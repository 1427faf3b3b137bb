//! `web-sys` presentation sink

use ripple_core::PresentationSink;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

const FAVICON_SELECTOR: &str = "link[rel=\"icon\"]";

/// Writes presentation effects to the live document.
///
/// DOM calls that fail (detached head, missing body during teardown) are
/// skipped; the next effect run repairs the state.
pub struct DomSink {
    document: Document,
}

impl DomSink {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Sink for the current window's document, if there is one.
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }
}

impl PresentationSink for DomSink {
    fn remove_root_class(&mut self, class: &str) {
        if let Some(body) = self.document.body() {
            let _ = body.class_list().remove_1(class);
        }
    }

    fn add_root_class(&mut self, class: &str) {
        if let Some(body) = self.document.body() {
            let _ = body.class_list().add_1(class);
        }
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        let root = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(root) = root {
            let _ = root.style().set_property(name, value);
        }
    }

    fn set_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn has_favicon(&self) -> bool {
        matches!(self.document.query_selector(FAVICON_SELECTOR), Ok(Some(_)))
    }

    fn update_favicon(&mut self, href: &str) {
        if let Ok(Some(link)) = self.document.query_selector(FAVICON_SELECTOR) {
            let _ = link.set_attribute("href", href);
        }
    }

    fn create_favicon(&mut self, href: &str) {
        let Some(head) = self.document.head() else {
            log::warn!("document has no <head>; favicon not set");
            return;
        };
        let Ok(link) = self.document.create_element("link") else {
            return;
        };
        let _ = link.set_attribute("rel", "icon");
        let _ = link.set_attribute("href", href);
        let _ = head.append_child(&link);
    }
}
