//! WebAssembly bindings for the Ripple front-end

mod console;
mod dom;
mod storage;

use std::cell::RefCell;
use std::fmt::Display;

use ripple_core::persist::PersistedSettings;
use ripple_core::{accent_hex as lookup_accent_hex, AdVariant, ResetScope, SettingChange, Session};
use ripple_render::{evaluate, Entitlement, PremiumFeature};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use dom::DomSink;
pub use storage::LocalStore;

type PageSession = Session<DomSink, LocalStore>;

thread_local! {
    static SESSION: RefCell<Option<PageSession>> = const { RefCell::new(None) };
    static ESCAPE_LISTENER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> =
        const { RefCell::new(None) };
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn with_session<R>(f: impl FnOnce(&mut PageSession) -> R) -> Result<R, JsValue> {
    SESSION.with(|cell| {
        let mut guard = cell.borrow_mut();
        let session = guard
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Not initialized. Call init() first."))?;
        Ok(f(session))
    })
}

/// Hydrate settings from `localStorage` and present them on the page.
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    if is_initialized() {
        return Err(JsValue::from_str("Already initialized. Reload the page to reinitialize."));
    }

    console::install(log::LevelFilter::Info);

    let sink = DomSink::from_window().ok_or_else(|| JsValue::from_str("No document available"))?;
    let storage = LocalStore::open();
    if storage.is_none() {
        log::info!("localStorage unavailable; settings will not persist");
    }

    let session = Session::start(sink, storage);
    SESSION.with(|cell| *cell.borrow_mut() = Some(session));
    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    SESSION.with(|cell| cell.borrow().is_some())
}

/// `error`, `warn`, `info`, `debug`, `trace` or `off`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter: log::LevelFilter = level.parse().map_err(js_error)?;
    console::install(filter);
    Ok(())
}

/// `{ applied, pending, showDevFunc, hasUncommitted }`
#[wasm_bindgen]
pub fn get_settings() -> Result<JsValue, JsValue> {
    let json = with_session(|session| {
        let store = session.store();
        serde_json::json!({
            "applied": PersistedSettings::from_store(store),
            "pending": store.pending(),
            "showDevFunc": store.show_dev_func(),
            "hasUncommitted": store.has_uncommitted(),
        })
        .to_string()
    })?;
    js_sys::JSON::parse(&json)
}

/// Stage one setting. `value` is a string or a boolean.
#[wasm_bindgen]
pub fn set_pending(field: &str, value: JsValue) -> Result<(), JsValue> {
    let text = value
        .as_bool()
        .map(|b| b.to_string())
        .or_else(|| value.as_string())
        .ok_or_else(|| JsValue::from_str("Setting value must be a string or boolean"))?;
    let change = SettingChange::parse(field, &text).map_err(js_error)?;
    with_session(|session| session.set_pending(change))
}

#[wasm_bindgen]
pub fn commit() -> Result<(), JsValue> {
    with_session(|session| {
        session.commit();
    })
}

/// `appearance`, `cloaking`, `security` or `all`.
#[wasm_bindgen]
pub fn reset(scope: &str) -> Result<(), JsValue> {
    let scope: ResetScope = scope.parse().map_err(js_error)?;
    with_session(|session| {
        session.reset(scope);
    })
}

#[wasm_bindgen]
pub fn set_show_dev_func(show: bool) -> Result<(), JsValue> {
    with_session(|session| {
        session.set_show_dev_func(show);
    })
}

#[wasm_bindgen]
pub fn accent_hex(color: &str) -> String {
    lookup_accent_hex(color).to_string()
}

/// Markup for an ad slot; unknown variants render the medium slot.
#[wasm_bindgen]
pub fn render_ad(variant: Option<String>) -> String {
    let variant = variant
        .as_deref()
        .and_then(|v| v.parse::<AdVariant>().ok())
        .unwrap_or_default();
    ripple_render::render_ad(variant)
}

/// Markup for the SnipePlus panel, reflecting pending settings.
#[wasm_bindgen]
pub fn render_gate(logged_in: bool, entitled: bool) -> Result<String, JsValue> {
    with_session(|session| {
        let view = evaluate(Entitlement { logged_in, entitled }, session.store().pending());
        ripple_render::render_gate(&view)
    })
}

/// Stage a premium toggle, refusing it when the account lacks SnipePlus.
#[wasm_bindgen]
pub fn toggle_premium(
    feature: &str,
    checked: bool,
    logged_in: bool,
    entitled: bool,
) -> Result<(), JsValue> {
    let feature: PremiumFeature = feature.parse().map_err(js_error)?;
    with_session(|session| {
        let view = evaluate(Entitlement { logged_in, entitled }, session.store().pending());
        let change = view.request_toggle(feature, checked).map_err(js_error)?;
        session.set_pending(change);
        Ok::<(), JsValue>(())
    })?
}

/// Listen for the panic key and leave the page when it is pressed.
#[wasm_bindgen]
pub fn install_escape_listener() -> Result<(), JsValue> {
    if ESCAPE_LISTENER.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

    let closure = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
        move |event: web_sys::KeyboardEvent| {
            let target = SESSION.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .and_then(|session| session.escape_target(&event.key()).map(str::to_string))
            });
            let Some(url) = target else {
                return;
            };
            event.prevent_default();
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().replace(&url) {
                    log::warn!("panic redirect failed: {:?}", e);
                }
            }
        },
    );

    window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    ESCAPE_LISTENER.with(|cell| *cell.borrow_mut() = Some(closure));
    Ok(())
}
